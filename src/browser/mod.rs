pub mod session;
pub mod wait;

pub use session::Session;
