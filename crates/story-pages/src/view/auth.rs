//! Login and registration views.

use super::{AuthViewContract, Handler, MessageView, Messages, field};
use crate::component::View;
use crate::form::{LoginForm, MIN_PASSWORD_LEN, RegisterForm, ValidationError};
use parking_lot::Mutex;

fn input(kind: &'static str, id: &'static str) -> View {
	View::element("input")
		.attr("type", kind)
		.attr("id", id)
		.attr("name", id)
		.attr("required", "required")
		.into()
}

fn password_input(id: &'static str) -> View {
	View::element("input")
		.attr("type", "password")
		.attr("id", id)
		.attr("name", id)
		.attr("required", "required")
		.attr("minlength", MIN_PASSWORD_LEN.to_string())
		.into()
}

#[derive(Default)]
pub struct LoginView {
	messages: Messages,
	on_login: Mutex<Option<Handler<LoginForm>>>,
}

impl LoginView {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bind_login(&self, handler: Handler<LoginForm>) {
		*self.on_login.lock() = Some(handler);
	}

	pub fn messages(&self) -> &Messages {
		&self.messages
	}

	/// Validates the form and hands it to the bound handler.
	pub async fn submit(&self, email: &str, password: &str) -> Result<(), ValidationError> {
		let form = LoginForm {
			email: email.to_string(),
			password: password.to_string(),
		};
		self.messages.clear();
		if let Err(e) = form.validate() {
			self.messages.show_error(&e.to_string());
			return Err(e);
		}

		let handler = self.on_login.lock().clone();
		match handler {
			Some(handler) => handler(form).await,
			None => tracing::warn!("login submitted without a bound handler"),
		}
		Ok(())
	}

	pub fn render(&self) -> View {
		View::element("main")
			.attr("class", "auth-page")
			.child(View::element("h2").child("Login"))
			.child(
				View::element("form")
					.attr("id", "login-form")
					.child(field("email", "Email", input("email", "email")))
					.child(field("password", "Password", password_input("password")))
					.child(View::element("button").attr("type", "submit").child("Login")),
			)
			.child(
				View::element("p")
					.child("Don't have an account? ")
					.child(View::element("a").attr("href", "#/register").child("Register here")),
			)
			.child(self.messages.render())
			.into()
	}
}

impl MessageView for LoginView {
	fn show_error(&self, message: &str) {
		self.messages.show_error(message);
	}

	fn show_success(&self, message: &str) {
		self.messages.show_success(message);
	}
}

impl AuthViewContract for LoginView {}

#[derive(Default)]
pub struct RegisterView {
	messages: Messages,
	on_register: Mutex<Option<Handler<RegisterForm>>>,
}

impl RegisterView {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn bind_register(&self, handler: Handler<RegisterForm>) {
		*self.on_register.lock() = Some(handler);
	}

	pub fn messages(&self) -> &Messages {
		&self.messages
	}

	/// Validates the form, password confirmation included, and hands it to
	/// the bound handler.
	pub async fn submit(&self, form: RegisterForm) -> Result<(), ValidationError> {
		self.messages.clear();
		if let Err(e) = form.validate() {
			self.messages.show_error(&e.to_string());
			return Err(e);
		}

		let handler = self.on_register.lock().clone();
		match handler {
			Some(handler) => handler(form).await,
			None => tracing::warn!("registration submitted without a bound handler"),
		}
		Ok(())
	}

	pub fn render(&self) -> View {
		View::element("main")
			.attr("class", "auth-page")
			.child(View::element("h2").child("Register"))
			.child(
				View::element("form")
					.attr("id", "register-form")
					.child(field("name", "Name", input("text", "name")))
					.child(field("email", "Email", input("email", "email")))
					.child(field("password", "Password", password_input("password")))
					.child(field(
						"confirm-password",
						"Confirm Password",
						password_input("confirm-password"),
					))
					.child(View::element("button").attr("type", "submit").child("Register")),
			)
			.child(
				View::element("p")
					.child("Already have an account? ")
					.child(View::element("a").attr("href", "#/login").child("Login here")),
			)
			.child(self.messages.render())
			.into()
	}
}

impl MessageView for RegisterView {
	fn show_error(&self, message: &str) {
		self.messages.show_error(message);
	}

	fn show_success(&self, message: &str) {
		self.messages.show_success(message);
	}
}

impl AuthViewContract for RegisterView {}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::ElementView;
	use futures::future::BoxFuture;
	use rstest::rstest;
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};

	#[rstest]
	#[tokio::test]
	async fn test_invalid_login_never_reaches_handler() {
		let view = LoginView::new();
		let calls = Arc::new(AtomicUsize::new(0));
		let counter = calls.clone();
		view.bind_login(Arc::new(move |_form: LoginForm| -> BoxFuture<'static, ()> {
			counter.fetch_add(1, Ordering::SeqCst);
			Box::pin(async {})
		}));

		let result = view.submit("user@example.com", "short").await;

		assert!(result.is_err());
		assert_eq!(calls.load(Ordering::SeqCst), 0);
		assert_eq!(
			view.messages().error().as_deref(),
			Some("Password must be at least 8 characters")
		);

		view.submit("user@example.com", "long-enough").await.unwrap();
		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(view.messages().error(), None);
	}

	#[rstest]
	fn test_login_page_links_to_registration() {
		let view = LoginView::new().render();
		assert_eq!(
			view.find(&|e: &ElementView| e.get_attr("href") == Some("#/register")).map(|e| e.tag_name()),
			Some("a")
		);
		assert_eq!(view.first_focusable().and_then(|e| e.id()), Some("email"));
	}
}
