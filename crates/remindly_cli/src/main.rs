//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `remindly_core` linkage.
//! - Report what the configured database holds without touching reminders.

use remindly_core::{
    init_from_config, CoreConfig, PersistenceGateway, SessionHolder, SqliteKeyValueStore,
    TaskStore,
};
use std::error::Error;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn Error>> {
    println!("remindly_core ping={}", remindly_core::ping());
    println!("remindly_core version={}", remindly_core::core_version());

    let config = CoreConfig::from_env();
    init_from_config(&config)?;

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    runtime.block_on(async {
        let storage = SqliteKeyValueStore::open(&config.db_path)?;
        let gateway = PersistenceGateway::new(Arc::new(storage));
        let session = SessionHolder::open(gateway.clone()).await?;
        let tasks = TaskStore::open(gateway).await?;

        println!("db_path={}", config.db_path.display());
        println!("onboarded={}", session.is_onboarded());
        println!("tasks={}", tasks.len());
        Ok::<(), Box<dyn Error>>(())
    })
}
