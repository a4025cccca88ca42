pub mod auth;
pub mod entry;
pub mod logic;
pub mod popup;
pub mod rows;
pub mod selectors;
