//! Registry and collaborator seams consumed by the engine actor.

pub mod history;
pub mod registry;
