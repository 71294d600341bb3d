//! # Storage
//!
//! Documents live in one of two backends, picked by `STORE_BACKEND`.
//!
//! ## Redis
//!
//! - One hash per collection: `books`, `tasks`
//! - Field is the document id, value is the JSON document
//! - Creates use `HSETNX` so a taken id is refused atomically
//! - Deletes read and remove in one pipeline
//! - Connection through a connection manager with retries and a timeout
//!
//! ## Memory
//!
//! - Collections held in process behind an async lock
//! - Seeded with the samples when `SEED_ON_START` is set and a collection is empty
//! - Lost on restart
//!
//! ## Notes
//! - Listing order is decided by the handlers, not the store
//! - Books sort by `createdAt` then `id`, tasks by `createdAt` newest first
