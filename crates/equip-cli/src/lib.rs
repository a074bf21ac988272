//! CLI library components for the equipment dataset tool.

pub mod logging;
pub mod session;
