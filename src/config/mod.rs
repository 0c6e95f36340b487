//! Configuration for the signer: the JSON signer file and the
//! environment-driven application settings.

mod config_file;
pub use config_file::*;

mod app_config;
pub use app_config::*;
