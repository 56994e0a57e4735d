pub mod conversation;
pub mod health_checks;
pub mod message;
pub mod user;

pub use health_checks::*;
