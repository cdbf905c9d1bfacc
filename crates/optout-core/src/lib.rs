pub mod action;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod host;
pub mod platform;

pub use error::{OptOutError, Result};
