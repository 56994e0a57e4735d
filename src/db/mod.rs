pub mod class;
pub mod conversation;
pub mod message;
pub mod participant;
pub mod user;
