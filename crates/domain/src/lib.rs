pub mod commands;
pub mod entity;
pub mod enum_value;
pub mod error;
pub mod events;
pub mod export;
pub mod field;
pub mod message;
pub mod ports;
pub mod project;
pub mod root;
pub mod store;
pub mod util;
pub mod views;

pub type DomainResult<T> = Result<T, error::DomainError>;
