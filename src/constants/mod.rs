mod signature;
pub use signature::*;

mod logging;
pub use logging::*;

mod config;
pub use config::*;
