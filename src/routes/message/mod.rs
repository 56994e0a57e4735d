mod get;
mod read;
mod send;

pub use get::*;
pub use read::*;
pub use send::*;
