//! # Coursework Documentation
//!
//! Notes behind the coursework services: a book catalog, a task manager, a calculator
//! and a presence demo, all served by one backend.
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//!
//!
//! # Layout
//! - `backend`: binary, calls into `server`
//! - `backend/server`: axum router, document store, presence hub
//! - `backend/catalog`: book/task schemas, validation, pricing, sample data
//! - `backend/seed`: wipes and refills a Redis store with the sample data
//!
//!
//!
//! # Running
//!
//! In-memory, seeded on start.
//! ```sh
//! RUST_LOG=info cargo run -p backend
//! ```
//!
//! Against Redis.
//! ```sh
//! STORE_BACKEND=redis REDIS_URL=redis://127.0.0.1:6379 cargo run -p backend
//! ```
//!
//! Reset Redis to the samples.
//! ```sh
//! cargo run -p seed -- --collection all
//! ```

pub mod api;
pub mod storage;
