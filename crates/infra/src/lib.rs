pub mod bridge;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod push;
pub mod state;
