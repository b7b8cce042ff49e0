pub mod prefix_models;
pub mod prefix_service;
pub mod prefix_store;

pub use prefix_models::{GuildPrefixMap, DEFAULT_PREFIX};
pub use prefix_service::{PrefixError, PrefixService};
pub use prefix_store::{PrefixStore, StoreError};
