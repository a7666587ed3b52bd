//! Visual transition around DOM updates.

use crate::lifecycle::NavigationOutcome;
use futures::future::BoxFuture;

/// Wraps the DOM update of a navigation in an atomic visual transition.
///
/// Implementations must run `update` exactly once and return its outcome;
/// observable behavior is the same with or without a transition primitive.
pub trait ViewTransition: Send + Sync {
	fn run<'a>(
		&'a self,
		update: BoxFuture<'a, NavigationOutcome>,
	) -> BoxFuture<'a, NavigationOutcome>;
}

/// Runs the update directly, for platforms without view transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughTransition;

impl ViewTransition for PassThroughTransition {
	fn run<'a>(
		&'a self,
		update: BoxFuture<'a, NavigationOutcome>,
	) -> BoxFuture<'a, NavigationOutcome> {
		update
	}
}
