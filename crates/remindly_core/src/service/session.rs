//! Local user session.
//!
//! # Responsibility
//! - Hold the single user's display name for the running process.
//! - Persist it so onboarding happens once per install.
//!
//! # Invariants
//! - `set_user` writes storage before updating memory.
//! - An empty name is the "not onboarded" signal.
//! - `clear` is only used by logout and wipes task persistence too.
//! - The held user never outlives its persisted slot.

use crate::model::user::User;
use crate::repo::gateway::PersistenceGateway;
use crate::repo::kv_store::StorageResult;
use log::info;

pub struct SessionHolder {
    gateway: PersistenceGateway,
    user: User,
}

impl SessionHolder {
    /// Loads the persisted user; absent or corrupt data yields an empty user.
    pub async fn open(gateway: PersistenceGateway) -> StorageResult<Self> {
        let user = gateway.load_user().await?.unwrap_or_default();
        info!(
            "event=session_open module=session status=ok onboarded={}",
            user.is_onboarded()
        );
        Ok(Self { gateway, user })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn is_onboarded(&self) -> bool {
        self.user.is_onboarded()
    }

    pub async fn set_user(&mut self, user: User) -> StorageResult<()> {
        self.gateway.save_user(&user).await?;
        self.user = user;
        info!("event=session_set module=session status=ok");
        Ok(())
    }

    /// Logout half of the session: erases both the `user` and `tasks` slots
    /// and resets to the empty user. The task store's in-memory copy is the
    /// caller's to reset.
    ///
    /// Memory follows each slot as it goes: when only the `user` slot is
    /// erased, the held user is already empty and the tasks are untouched.
    pub async fn clear(&mut self) -> StorageResult<()> {
        self.gateway.clear_user().await?;
        self.user = User::default();
        self.gateway.clear_tasks().await?;
        info!("event=session_clear module=session status=ok");
        Ok(())
    }
}
