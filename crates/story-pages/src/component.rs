//! View tree primitives.
//!
//! Views and chrome build [`View`] trees; the lifecycle manager composes and
//! mounts them into a [`MountTarget`](crate::dom::MountTarget).

mod into_view;

pub use into_view::{ElementView, IntoView, View};
