//! Persistence adapters for the document collections.
//!
//! The in-memory adapters are the reference implementations of the storage
//! contract: they provide the atomic single-document read-modify-write the
//! domain assumes, and the query execution semantics the pagination
//! invariants are specified against. A database-backed adapter replaces them
//! by implementing the same ports.

mod memory_garage_repository;
mod memory_user_repository;

pub use memory_garage_repository::MemoryGarageRepository;
pub use memory_user_repository::MemoryUserRepository;
