// Discord commands module.
// Each group of related commands gets its own file; cogs decide which of
// them are registered.

pub mod admin;

pub mod help;

pub mod info;

pub mod prefix;

// Bot presence management
pub mod presence;
