// Public library interface for nestpack-rs
// The CLI and the debug-pack diagnostic tool both drive these modules

pub mod config;
pub mod driver;
pub mod error;
pub mod fitness;
pub mod layout;
pub mod search;
pub mod tree;

pub use config::Config;
pub use driver::{run, run_with, RunReport};
pub use error::{Error, Result};
