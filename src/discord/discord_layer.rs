// Discord layer - cogs, commands and event handlers.

#[path = "cogs/cog_registry.rs"]
pub mod cogs;

#[path = "commands/command_catalog.rs"]
pub mod commands;

pub mod embeds;

pub mod lifecycle;

use crate::core::config::BotConfig;
use crate::core::prefixes::PrefixService;
use crate::core::readiness::ReadinessTracker;
use crate::infra::prefixes::JsonPrefixStore;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio_cron_scheduler::JobScheduler;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shared context handed to every command and event handler.
///
/// Built once in `main`; cloning only bumps reference counts.
#[derive(Clone)]
pub struct Data {
    pub config: Arc<BotConfig>,
    pub prefixes: Arc<PrefixService<JsonPrefixStore>>,
    pub readiness: Arc<ReadinessTracker>,
    pub scheduler: JobScheduler,
    /// Set once the one-time startup announcement has run.
    pub announced: Arc<AtomicBool>,
    pub started_at: DateTime<Utc>,
}
