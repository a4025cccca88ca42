pub mod debug;
pub mod log;
pub mod login;
pub mod setup;
