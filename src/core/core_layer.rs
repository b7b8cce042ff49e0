// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "config/mod.rs"]
pub mod config;

#[path = "prefixes/mod.rs"]
pub mod prefixes;

#[path = "presence/mod.rs"]
pub mod presence;

#[path = "readiness/mod.rs"]
pub mod readiness;
