// ABOUTME: Command module aggregator for the ebdeploy CLI.
// ABOUTME: Re-exports deploy and status command handlers.

mod deploy;
mod options;
mod status;

pub use deploy::deploy;
pub use status::status;
