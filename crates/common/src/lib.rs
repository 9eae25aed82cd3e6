pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;
