//! # Client Payloads
//!
//! What the frontends send and receive.
//!
//! ## Envelope
//!
//! Books and tasks wrap every reply.
//! ```json
//! { "statusCode": 200, "data": { }, "message": "Book retrieved successfully" }
//! ```
//! - Validation failures add `errors`, a list of messages in the order the rules ran
//! - Internal failures add `error`, `data` is `null`
//!
//! ## Books
//!
//! Request fields: `id`, `title`, `author`, `year`, `genre`, `summary`, `price`.
//! Anything else is rejected before the body is looked at further.
//!
//! - `id` only on create, never on update
//! - `year` and `price` may be numbers or numeric strings
//! - `price` comes back as text with its decimals kept, `currency` is always `AUD`
//! - `createdAt` and `updatedAt` are set by the server
//!
//! ## Tasks
//!
//! Request fields: `taskName`, `description`, `assignedTo`, `priority`, `status`,
//! `estimatedHours`, `technology`. Unknown fields are dropped.
//!
//! - `priority`: `Low`, `Medium`, `High`, `Critical`
//! - `status`: `To Do`, `In Progress`, `Testing`, `Completed`
//! - `id` is a UUID, listing is newest first
//!
//! ## Calculator
//!
//! No envelope.
//! ```json
//! { "success": true, "operation": "addition", "num1": 5, "num2": 3, "result": 8 }
//! { "success": false, "error": "Cannot divide by zero" }
//! ```
//!
//! ## Presence
//!
//! Text frames on `/ws`, shaped `{ "event": name, "data": { } }`.
//!
//! From server
//! - `welcome`: `message`, `yourName`, only to the new client
//! - `usersOnline`: `count`, `users`, to everyone on join and leave
//! - `recipeActivity`: `user`, `recipe`, `action`, to everyone except the sender
//!
//! From client
//! - `viewingRecipe`: `recipeName`
