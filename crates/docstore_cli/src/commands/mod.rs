//! CLI command implementations.

pub mod demo;
pub mod get;
pub mod inspect;
pub mod verify;
