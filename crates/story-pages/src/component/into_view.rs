//! IntoView trait and View enum for view composition.

use std::borrow::Cow;

/// A unified representation of renderable content.
///
/// View is the core abstraction for all UI elements mounted by the router.
/// It can represent elements, text nodes or fragments.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
	/// An element.
	Element(ElementView),
	/// A text node.
	Text(Cow<'static, str>),
	/// A fragment containing multiple views (no wrapper element).
	Fragment(Vec<View>),
	/// An empty view. Not attachable: a view factory returning it has failed.
	Empty,
}

/// Represents an element in the view tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
	/// The tag name (e.g., "div", "main").
	tag: Cow<'static, str>,
	/// HTML attributes, in insertion order.
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	/// Child views.
	children: Vec<View>,
	/// Whether this is a void element (no closing tag).
	is_void: bool,
}

impl ElementView {
	/// Creates a new element view.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = matches!(
			tag.as_ref(),
			"area"
				| "base" | "br"
				| "col" | "embed"
				| "hr" | "img"
				| "input" | "link"
				| "meta" | "source"
				| "track" | "wbr"
		);
		Self {
			tag,
			attrs: Vec::new(),
			children: Vec::new(),
			is_void,
		}
	}

	/// Adds an attribute.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Adds an attribute only when `condition` holds.
	pub fn attr_if(
		self,
		condition: bool,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		if condition {
			self.attr(name, value)
		} else {
			self
		}
	}

	/// Adds a child view.
	pub fn child(mut self, child: impl IntoView) -> Self {
		self.children.push(child.into_view());
		self
	}

	/// Adds multiple child views.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoView>) -> Self {
		self.children
			.extend(children.into_iter().map(|c| c.into_view()));
		self
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the attributes.
	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// Returns an attribute value.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_ref())
	}

	/// Sets an attribute, replacing an existing value.
	pub fn set_attr(
		&mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) {
		let name = name.into();
		let value = value.into();
		match self.attrs.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = value,
			None => self.attrs.push((name, value)),
		}
	}

	/// Returns the `id` attribute.
	pub fn id(&self) -> Option<&str> {
		self.get_attr("id")
	}

	/// Whether the `class` attribute lists `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.get_attr("class")
			.is_some_and(|c| c.split_whitespace().any(|c| c == class))
	}

	/// Returns the child views.
	pub fn child_views(&self) -> &[View] {
		&self.children
	}

	/// Returns whether this is a void element.
	pub fn is_void(&self) -> bool {
		self.is_void
	}

	/// Whether the element takes keyboard focus: `button`, `a[href]`, `input`,
	/// `select`, `textarea`, or anything with a `tabindex` other than `-1`.
	pub fn is_focusable(&self) -> bool {
		if let Some(tabindex) = self.get_attr("tabindex") {
			return tabindex.trim() != "-1";
		}
		match self.tag.as_ref() {
			"button" | "input" | "select" | "textarea" => true,
			"a" => self.get_attr("href").is_some(),
			_ => false,
		}
	}
}

impl View {
	/// Creates an element view.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> ElementView {
		ElementView::new(tag)
	}

	/// Creates a text view.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a fragment view.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoView>) -> Self {
		Self::Fragment(children.into_iter().map(|c| c.into_view()).collect())
	}

	/// Creates an empty view.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// Whether the view can be attached to a mount target.
	pub fn is_attachable(&self) -> bool {
		!matches!(self, View::Empty)
	}

	/// Depth-first search for the element with the given id.
	pub fn find_by_id(&self, id: &str) -> Option<&ElementView> {
		self.find(&|el: &ElementView| el.id() == Some(id))
	}

	/// Depth-first search for the first element with the given tag.
	pub fn find_by_tag(&self, tag: &str) -> Option<&ElementView> {
		self.find(&|el: &ElementView| el.tag_name() == tag)
	}

	/// Depth-first search for the first focusable element.
	pub fn first_focusable(&self) -> Option<&ElementView> {
		self.find(&ElementView::is_focusable)
	}

	/// Depth-first search with a predicate.
	pub fn find(&self, predicate: &dyn Fn(&ElementView) -> bool) -> Option<&ElementView> {
		match self {
			View::Element(el) => {
				if predicate(el) {
					return Some(el);
				}
				el.children.iter().find_map(|c| c.find(predicate))
			}
			View::Fragment(children) => children.iter().find_map(|c| c.find(predicate)),
			View::Text(_) | View::Empty => None,
		}
	}

	/// Mutable depth-first search for the first element with the given tag.
	pub fn find_by_tag_mut(&mut self, tag: &str) -> Option<&mut ElementView> {
		match self {
			View::Element(el) => {
				if el.tag == tag {
					return Some(el);
				}
				el.children.iter_mut().find_map(|c| c.find_by_tag_mut(tag))
			}
			View::Fragment(children) => children.iter_mut().find_map(|c| c.find_by_tag_mut(tag)),
			View::Text(_) | View::Empty => None,
		}
	}

	/// Concatenated text of the view, without markup.
	pub fn text_content(&self) -> String {
		let mut output = String::new();
		self.text_content_inner(&mut output);
		output
	}

	fn text_content_inner(&self, output: &mut String) {
		match self {
			View::Element(el) => el.children.iter().for_each(|c| c.text_content_inner(output)),
			View::Text(text) => output.push_str(text),
			View::Fragment(children) => children.iter().for_each(|c| c.text_content_inner(output)),
			View::Empty => {}
		}
	}

	/// Renders the view to an HTML string.
	pub fn render_to_string(&self) -> String {
		let mut output = String::new();
		self.render_to_string_inner(&mut output);
		output
	}

	fn render_to_string_inner(&self, output: &mut String) {
		match self {
			View::Element(el) => {
				output.push('<');
				output.push_str(el.tag_name());

				for (name, value) in el.attrs() {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&html_escape(value));
					output.push('"');
				}

				if el.is_void() {
					output.push_str(" />");
				} else {
					output.push('>');
					for child in el.child_views() {
						child.render_to_string_inner(output);
					}
					output.push_str("</");
					output.push_str(el.tag_name());
					output.push('>');
				}
			}
			View::Text(text) => {
				output.push_str(&html_escape(text));
			}
			View::Fragment(children) => {
				for child in children {
					child.render_to_string_inner(output);
				}
			}
			View::Empty => {}
		}
	}
}

/// Trait for types that can be converted into a View.
pub trait IntoView {
	/// Converts self into a View.
	fn into_view(self) -> View;
}

impl IntoView for View {
	fn into_view(self) -> View {
		self
	}
}

impl IntoView for ElementView {
	fn into_view(self) -> View {
		View::Element(self)
	}
}

impl From<ElementView> for View {
	fn from(el: ElementView) -> Self {
		View::Element(el)
	}
}

impl IntoView for String {
	fn into_view(self) -> View {
		View::Text(Cow::Owned(self))
	}
}

impl IntoView for &'static str {
	fn into_view(self) -> View {
		View::Text(Cow::Borrowed(self))
	}
}

impl<T: IntoView> IntoView for Option<T> {
	fn into_view(self) -> View {
		match self {
			Some(v) => v.into_view(),
			None => View::Empty,
		}
	}
}

impl<T: IntoView> IntoView for Vec<T> {
	fn into_view(self) -> View {
		View::Fragment(self.into_iter().map(|v| v.into_view()).collect())
	}
}

impl IntoView for () {
	fn into_view(self) -> View {
		View::Empty
	}
}

impl<A: IntoView, B: IntoView> IntoView for (A, B) {
	fn into_view(self) -> View {
		View::Fragment(vec![self.0.into_view(), self.1.into_view()])
	}
}

impl<A: IntoView, B: IntoView, C: IntoView> IntoView for (A, B, C) {
	fn into_view(self) -> View {
		View::Fragment(vec![
			self.0.into_view(),
			self.1.into_view(),
			self.2.into_view(),
		])
	}
}

/// Escapes HTML special characters.
fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}
