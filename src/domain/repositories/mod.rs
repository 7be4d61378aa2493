//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.

pub mod link_repository;

pub use link_repository::{LinkRepository, LinkStats};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
