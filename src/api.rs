//! Data access: the remote story API and the local stores
//!
//! Models fold every transport failure into a short user-facing
//! [`ModelFailure`] message.

pub use story_api::*;
