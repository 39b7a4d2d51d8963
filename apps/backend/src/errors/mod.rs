//! Error handling for the Bisca backend.

pub mod domain;

pub use domain::DomainError;
