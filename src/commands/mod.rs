// ABOUTME: Command module aggregator for the stable-galaxy CLI.
// ABOUTME: Re-exports rollback, current, and deploy command handlers.

mod current;
mod deploy;
mod rollback;

pub use current::current;
pub use deploy::deploy;
pub use rollback::rollback;
