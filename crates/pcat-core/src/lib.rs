pub mod config;
pub mod logging;

pub mod catalog;
pub mod clock;
pub mod fetch;
pub mod plugin;
pub mod store;
