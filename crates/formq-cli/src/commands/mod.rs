pub mod common;
pub mod completions;
pub mod config;
pub mod queue;
pub mod regions;
pub mod resync;
pub mod submit;
pub mod watch;
