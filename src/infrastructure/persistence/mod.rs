//! Repository implementations.
//!
//! # Repositories
//!
//! - [`InMemoryLinkRepository`] - Links and click history held in process memory

pub mod memory_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
