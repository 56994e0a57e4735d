//! Collaborator Connectors
//!
//! Adapters for the services messaging depends on but does not own: the user
//! directory, the class directory and file storage.
//!
//! ## Architecture Pattern
//!
//! 1. Define a trait per collaborator → allows mocking in tests
//! 2. Implement it against the shared database (or configuration) in the same file
//! 3. Inject `Arc<dyn Trait>` into the service → the service never depends on the backend
//!
//! ## Testing
//!
//! ```ignore
//! let users = Arc::new(MockUserDirectory::with_users(vec![alice, bob]));
//! let service = MessagingService::new(store, users, classes, files);
//! ```

pub mod class_directory;
pub mod errors;
pub mod file_storage;
pub mod mock;
pub mod user_directory;

pub use class_directory::{ClassDirectory, PgClassDirectory};
pub use errors::ConnectorError;
pub use file_storage::{FileStorage, LinkFileStorage};
pub use mock::{MockClassDirectory, MockUserDirectory};
pub use user_directory::{PgUserDirectory, UserDirectory};
