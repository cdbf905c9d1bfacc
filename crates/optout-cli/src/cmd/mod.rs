pub mod list;
pub mod platform;
pub mod run;
