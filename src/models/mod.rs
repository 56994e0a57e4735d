mod class;
mod conversation;
mod message;
mod participant;
mod user;

pub use class::*;
pub use conversation::*;
pub use message::*;
pub use participant::*;
pub use user::*;
