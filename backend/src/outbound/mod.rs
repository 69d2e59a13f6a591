//! Outbound adapters implementing domain ports for storage.
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic: validation and
//! not-found handling live in the domain services.
//!
//! - **memory**: in-process record and credential stores

pub mod memory;
