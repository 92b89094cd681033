//! Local CLI command handlers.

pub mod complete;
pub mod config;
pub mod info;
pub mod scan;
pub mod watch;

pub use complete::run_complete;
pub use config::{ConfigFormatArg, run_config_check, run_config_show};
pub use info::run_info;
pub use scan::run_scan;
pub use watch::run_watch;
