pub mod presence_template;

pub use presence_template::{ActivityKind, Presence, PresenceError, PresenceStats, PresenceTemplate};
