pub mod config;
pub mod error;
pub mod extract;
pub mod finder;
pub mod git;
pub mod io;
pub mod paths;
pub mod record;
pub mod rollup;
pub mod sections;
pub mod session;
pub mod standup;
pub mod templates;
pub mod vault;

pub use error::{Result, VaultError};
