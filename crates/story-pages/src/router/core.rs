//! Route table and matcher.

use super::params::Params;
use super::pattern::PathPattern;
use crate::error::{NavigationError, RouterError};
use crate::handle::ViewHandle;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

/// Produces the view for a matched route.
pub type ViewFactory =
	Arc<dyn Fn(Params) -> BoxFuture<'static, Result<ViewHandle, NavigationError>> + Send + Sync>;

/// A single route definition.
#[derive(Clone)]
pub struct Route {
	pattern: PathPattern,
	factory: ViewFactory,
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("pattern", &self.pattern.as_str())
			.finish()
	}
}

impl Route {
	/// Creates a new route from an async view factory.
	pub fn new<F, Fut>(pattern: &str, factory: F) -> Result<Self, RouterError>
	where
		F: Fn(Params) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<ViewHandle, NavigationError>> + Send + 'static,
	{
		Ok(Self {
			pattern: PathPattern::parse(pattern)?,
			factory: Arc::new(move |params| factory(params).boxed()),
		})
	}

	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	pub fn is_catch_all(&self) -> bool {
		self.pattern.is_catch_all()
	}

	/// Invokes the view factory.
	pub fn render(&self, params: Params) -> BoxFuture<'static, Result<ViewHandle, NavigationError>> {
		(self.factory)(params)
	}
}

/// A matched route with extracted parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch {
	/// The matched route.
	pub route: Route,
	/// Extracted path parameters.
	pub params: Params,
}

impl RouteMatch {
	/// Whether no declared route matched.
	pub fn is_catch_all(&self) -> bool {
		self.route.is_catch_all()
	}
}

/// An immutable route table with a mandatory catch-all.
#[derive(Clone)]
pub struct Router {
	routes: Vec<Route>,
	catch_all: Route,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Router")
			.field(
				"routes",
				&self.routes.iter().map(|r| r.pattern.as_str()).collect::<Vec<_>>(),
			)
			.finish()
	}
}

impl Router {
	pub fn builder() -> RouterBuilder {
		RouterBuilder::default()
	}

	/// Matches a path against the declared routes, in declaration order.
	///
	/// Falls back to the catch-all when nothing else matches.
	pub fn match_path(&self, path: &str) -> RouteMatch {
		for route in &self.routes {
			if let Some(params) = route.pattern.matches(path) {
				return RouteMatch {
					route: route.clone(),
					params,
				};
			}
		}

		RouteMatch {
			route: self.catch_all.clone(),
			params: Params::default(),
		}
	}

	/// Declared routes, catch-all excluded.
	pub fn routes(&self) -> &[Route] {
		&self.routes
	}
}

/// Builder for [`Router`].
///
/// Pattern errors are deferred to [`build`](Self::build) so routes chain.
#[derive(Default)]
pub struct RouterBuilder {
	routes: Vec<Route>,
	catch_all: Option<Route>,
	error: Option<RouterError>,
}

impl RouterBuilder {
	/// Adds a route. A `*` pattern declares the catch-all, which is always
	/// evaluated last wherever it is declared; a second one replaces the first.
	pub fn route<F, Fut>(mut self, pattern: &str, factory: F) -> Self
	where
		F: Fn(Params) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<ViewHandle, NavigationError>> + Send + 'static,
	{
		match Route::new(pattern, factory) {
			Ok(route) if route.is_catch_all() => self.catch_all = Some(route),
			Ok(route) => self.routes.push(route),
			Err(e) => {
				if self.error.is_none() {
					self.error = Some(e);
				}
			}
		}
		self
	}

	pub fn build(self) -> Result<Router, RouterError> {
		if let Some(e) = self.error {
			return Err(e);
		}
		let catch_all = self.catch_all.ok_or(RouterError::MissingCatchAll)?;
		tracing::debug!(routes = self.routes.len(), "route table built");
		Ok(Router {
			routes: self.routes,
			catch_all,
		})
	}
}
