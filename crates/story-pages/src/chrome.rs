//! Page chrome around routed content: skip link, header, footer, fallback.

use crate::component::View;

/// Builds the chrome composed around every routed view.
pub trait Layout: Send + Sync {
	/// Link jumping to the content region.
	fn skip_link(&self, target_id: &str) -> View;

	/// Site header; the logout control is present only when signed in.
	fn header(&self, authenticated: bool) -> View;

	fn footer(&self) -> View;

	/// View rendered when routing fails.
	fn fallback(&self, content_id: &str) -> View;
}

/// The story client's chrome.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

impl Layout for DefaultLayout {
	fn skip_link(&self, target_id: &str) -> View {
		View::element("a")
			.attr("href", format!("#{}", target_id))
			.attr("class", "skip-link")
			.child("Skip to content")
			.into()
	}

	fn header(&self, authenticated: bool) -> View {
		let mut links = View::element("ul")
			.child(nav_item("#/stories", "Stories"))
			.child(nav_item("#/add-story", "Add Story"));
		if authenticated {
			links = links.child(
				View::element("li").attr("id", "logout-li").child(
					View::element("button")
						.attr("id", "logout-button")
						.child("Logout"),
				),
			);
		}
		View::element("header")
			.child(View::element("nav").child(links))
			.into()
	}

	fn footer(&self) -> View {
		View::element("footer")
			.child(View::element("p").child("Story App"))
			.into()
	}

	fn fallback(&self, content_id: &str) -> View {
		not_found(content_id)
	}
}

fn nav_item(href: &'static str, label: &'static str) -> View {
	View::element("li")
		.child(
			View::element("a")
				.attr("href", href)
				.attr("data-nav", "header")
				.child(label),
		)
		.into()
}

/// The "404 Not Found" page.
pub fn not_found(content_id: &str) -> View {
	View::element("main")
		.attr("id", content_id.to_string())
		.attr("class", "error-page")
		.child(View::element("h1").child("404 Not Found"))
		.child(View::element("p").child("The page you're looking for doesn't exist."))
		.child(
			View::element("a")
				.attr("href", "#/")
				.attr("class", "home-link")
				.child("Go to Home"),
		)
		.into()
}
