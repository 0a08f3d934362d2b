use std::str::FromStr;

/// Host operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
    Macos,
    Linux,
    Windows,
    Other,
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "ios" => Self::Ios,
            "android" => Self::Android,
            "macos" => Self::Macos,
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            _ => Self::Other,
        })
    }
}

/// Platform plus device kind, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub is_physical_device: bool,
}

impl PlatformProfile {
    pub fn new(platform: Platform, is_physical_device: bool) -> Self {
        Self {
            platform,
            is_physical_device,
        }
    }

    /// Profile of the running process, assuming a physical device.
    pub fn current() -> Self {
        let platform = std::env::consts::OS
            .parse()
            .unwrap_or(Platform::Other);
        Self::new(platform, true)
    }

    /// `false` for the iOS simulator, which does not deliver scheduled local
    /// notifications reliably.
    pub fn delivers_local_notifications(&self) -> bool {
        !(self.platform == Platform::Ios && !self.is_physical_device)
    }
}
