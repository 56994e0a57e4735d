pub mod messaging;

pub use messaging::{MessagingError, MessagingService};
