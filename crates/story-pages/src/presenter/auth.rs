//! Login and registration.

use super::Presenter;
use crate::form::{LoginForm, RegisterForm};
use crate::navigator::Navigator;
use crate::state::AppState;
use crate::view::{AuthViewContract, Handler};
use futures::future::BoxFuture;
use std::sync::Arc;
use story_api::AuthModel;

pub struct AuthPresenter {
	auth: Arc<AuthModel>,
	state: Arc<AppState>,
	navigator: Navigator,
	view: Arc<dyn AuthViewContract>,
}

impl AuthPresenter {
	pub fn new(
		auth: Arc<AuthModel>,
		state: Arc<AppState>,
		navigator: Navigator,
		view: Arc<dyn AuthViewContract>,
	) -> Arc<Self> {
		Arc::new(Self {
			auth,
			state,
			navigator,
			view,
		})
	}

	/// On success publishes the signed-in state, then goes to the story list.
	/// The flag is set first so the next page composes the signed-in header.
	pub async fn handle_login(&self, form: LoginForm) -> bool {
		match self.auth.login(&form.email, &form.password).await {
			Ok(_) => {
				self.state.set_authenticated(true);
				self.navigator.navigate_to("/stories");
				true
			}
			Err(failure) => {
				self.view.show_error(&failure.message);
				false
			}
		}
	}

	/// On success confirms and goes to the login page.
	pub async fn handle_register(&self, form: RegisterForm) -> bool {
		match self
			.auth
			.register(&form.name, &form.email, &form.password)
			.await
		{
			Ok(()) => {
				self.view.show_success("Registration successful. Please login.");
				self.navigator.navigate_to("/login");
				true
			}
			Err(failure) => {
				self.view.show_error(&failure.message);
				false
			}
		}
	}

	/// Handler for [`LoginView::bind_login`](crate::view::LoginView::bind_login).
	pub fn login_handler(self: &Arc<Self>) -> Handler<LoginForm> {
		let presenter = Arc::downgrade(self);
		Arc::new(move |form: LoginForm| -> BoxFuture<'static, ()> {
			let presenter = presenter.clone();
			Box::pin(async move {
				if let Some(presenter) = presenter.upgrade() {
					presenter.handle_login(form).await;
				}
			})
		})
	}

	/// Handler for [`RegisterView::bind_register`](crate::view::RegisterView::bind_register).
	pub fn register_handler(self: &Arc<Self>) -> Handler<RegisterForm> {
		let presenter = Arc::downgrade(self);
		Arc::new(move |form: RegisterForm| -> BoxFuture<'static, ()> {
			let presenter = presenter.clone();
			Box::pin(async move {
				if let Some(presenter) = presenter.upgrade() {
					presenter.handle_register(form).await;
				}
			})
		})
	}
}

impl Presenter for AuthPresenter {}
