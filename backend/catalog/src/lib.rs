//! # Catalog
//!
//! Document models shared by the server and the seed tool.
//!
//! ## Collections
//!
//! - `books`: keyed by the client supplied book `id`, allow-listed writes
//! - `tasks`: keyed by a server generated UUID v4, unknown fields ignored
//!
//! Both documents serialize with camelCase keys, the same shape the browser
//! clients read and write.
//!
//! ## Validation
//!
//! Writes go through three gates, in order:
//! 1. Allow-list: any key outside the permitted set is rejected outright
//! 2. Immutable keys: updates may not carry `id`
//! 3. Schema: every field rule runs and all failures are reported together
//!
//! Duplicate keys are the store's concern, see `server::database`.
pub mod book;
pub mod fixtures;
pub mod pricing;
pub mod task;
pub mod validation;

pub use book::{ALLOWED_FIELDS, Book, CURRENCY, VALID_GENRES};
pub use task::{Priority, Status, Task, TaskInput};
pub use validation::{Fields, ValidationError};

/// Collection holding book documents.
pub const BOOKS: &str = "books";

/// Collection holding task documents.
pub const TASKS: &str = "tasks";
