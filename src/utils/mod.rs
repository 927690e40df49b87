//! Utility modules

pub mod clock;
pub mod path;
pub mod shell_detect;
pub mod strings;
