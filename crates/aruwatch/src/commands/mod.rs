//! Command handlers: bridge CLI args -> core Monitor calls -> output.

pub mod clients;
pub mod config_cmd;
pub mod networks;
pub mod util;
