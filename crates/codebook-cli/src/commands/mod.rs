//! Command implementations.

pub mod init_config;
pub mod rules;
pub mod scan;

pub use self::init_config::execute_init_config;
pub use self::rules::execute_rules;
pub use self::scan::execute_scan;
