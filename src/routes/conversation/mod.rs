mod add;
mod delete;
mod get;
mod participant;

pub use add::*;
pub use delete::*;
pub use get::*;
pub use participant::*;
