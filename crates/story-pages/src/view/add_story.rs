//! Add-story view: camera capture, location picking, upload form.

use super::{AddStoryViewContract, Handler, MessageView, Messages, field};
use crate::component::View;
use crate::form::{StoryForm, ValidationError};
use crate::platform::{Camera, CameraDevice, CameraStream, Position, ResourceError};
use crate::presenter::MapPresenter;
use crate::state::{AppEvent, AppState, Subscription};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use story_api::{Photo, StoryDraft};
use story_conf::MapSettings;

/// Map container id inside the add-story view.
pub const ADD_STORY_MAP_ID: &str = "map";

#[derive(Debug, Default)]
struct FormState {
	active: bool,
	photo: Option<Photo>,
	location: Option<Position>,
	location_status: Option<String>,
	devices: Vec<CameraDevice>,
	selected_device: Option<String>,
}

pub struct AddStoryView {
	camera: Arc<dyn Camera>,
	map: Arc<MapPresenter>,
	map_settings: MapSettings,
	stream: Mutex<Option<Box<dyn CameraStream>>>,
	state: Mutex<FormState>,
	messages: Messages,
	on_submit: Mutex<Option<Handler<StoryDraft>>>,
	header_listener: Mutex<Option<Subscription>>,
}

impl std::fmt::Debug for AddStoryView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AddStoryView")
			.field("state", &*self.state.lock())
			.field("camera_active", &self.camera_active())
			.finish()
	}
}

impl AddStoryView {
	pub fn new(camera: Arc<dyn Camera>, map: Arc<MapPresenter>, map_settings: MapSettings) -> Self {
		Self {
			camera,
			map,
			map_settings,
			stream: Mutex::new(None),
			state: Mutex::new(FormState::default()),
			messages: Messages::default(),
			on_submit: Mutex::new(None),
			header_listener: Mutex::new(None),
		}
	}

	/// Stops the camera whenever a header link is followed.
	pub fn listen(self: &Arc<Self>, state: &Arc<AppState>) {
		let view = Arc::downgrade(self);
		let subscription = state.subscribe(move |event| {
			if *event == AppEvent::HeaderNavigation {
				if let Some(view) = view.upgrade() {
					view.stop_camera();
				}
			}
		});
		*self.header_listener.lock() = Some(subscription);
	}

	pub fn bind_add_story(&self, handler: Handler<StoryDraft>) {
		*self.on_submit.lock() = Some(handler);
	}

	pub fn messages(&self) -> &Messages {
		&self.messages
	}

	pub fn is_active(&self) -> bool {
		self.state.lock().active
	}

	pub fn camera_active(&self) -> bool {
		self.stream.lock().is_some()
	}

	pub fn photo(&self) -> Option<Photo> {
		self.state.lock().photo.clone()
	}

	pub fn location(&self) -> Option<Position> {
		self.state.lock().location
	}

	pub fn location_status(&self) -> Option<String> {
		self.state.lock().location_status.clone()
	}

	pub fn devices(&self) -> Vec<CameraDevice> {
		self.state.lock().devices.clone()
	}

	/// Opens the camera, on the selected device when there is one.
	///
	/// A failure with a device constraint is retried once without it.
	pub async fn start_camera(&self) -> bool {
		if !self.is_active() {
			return false;
		}
		self.stop_camera();

		let device = self.state.lock().selected_device.clone();
		let opened = match self.camera.open(device.as_deref()).await {
			Ok(stream) => Ok(stream),
			Err(e) => {
				self.messages.show_error(&format!("Camera error: {}", e));
				match device {
					Some(device) => {
						tracing::warn!(device = %device, error = %e, "retrying camera without device constraint");
						self.camera.open(None).await
					}
					None => Err(e),
				}
			}
		};

		match opened {
			Ok(mut stream) => {
				if !self.is_active() {
					stream.stop();
					return false;
				}
				let previous = self.stream.lock().replace(stream);
				if let Some(mut previous) = previous {
					previous.stop();
				}
				true
			}
			Err(e) => {
				self.messages.show_error(&format!("Camera error: {}", e));
				false
			}
		}
	}

	pub fn stop_camera(&self) {
		let stream = self.stream.lock().take();
		if let Some(mut stream) = stream {
			stream.stop();
			tracing::debug!("camera stopped");
		}
	}

	/// Switches to another device and restarts the camera on it.
	pub async fn select_device(&self, device_id: &str) -> bool {
		self.state.lock().selected_device = Some(device_id.to_string());
		self.start_camera().await
	}

	/// Captures a frame as the story photo and stops the camera.
	pub fn capture_photo(&self) -> bool {
		let captured = match self.stream.lock().as_mut() {
			Some(stream) => stream.capture(),
			None => Err(ResourceError::Failed("camera is not running".to_string())),
		};

		match captured {
			Ok(photo) => {
				self.state.lock().photo = Some(photo);
				self.stop_camera();
				true
			}
			Err(e) => {
				self.messages.show_error(&format!("Camera error: {}", e));
				false
			}
		}
	}

	/// Discards the photo and restarts the camera.
	pub async fn retake(&self) -> bool {
		self.state.lock().photo = None;
		self.start_camera().await
	}

	/// Map click: the clicked point becomes the story location.
	pub fn select_location(&self, lat: f64, lng: f64) {
		let at = Position::new(lat, lng);
		self.set_location(at);
		self.map
			.handle_location_selection(at, self.map_settings.location_zoom);
		self.messages.show_success("Location selected on map!");
	}

	/// Uses the device position as the story location.
	pub async fn use_current_location(&self) -> bool {
		match self.map.current_location().await {
			Ok(at) => {
				self.set_location(at);
				self.map.add_marker(at, "Current location");
				self.map.set_view(at, self.map_settings.location_zoom);
				self.messages.show_success("Current location obtained!");
				true
			}
			Err(e) => {
				self.messages.show_error(&format!("Location error: {}", e));
				false
			}
		}
	}

	fn set_location(&self, at: Position) {
		let mut state = self.state.lock();
		state.location = Some(at);
		state.location_status = Some(format!("Location set: {:.4}, {:.4}", at.lat, at.lng));
	}

	/// Validates photo, description and location, then hands the draft to
	/// the bound handler.
	pub async fn submit(&self, description: &str) -> Result<(), ValidationError> {
		let form = {
			let state = self.state.lock();
			StoryForm {
				description: description.to_string(),
				photo: state.photo.clone(),
				lat: state.location.map(|p| p.lat),
				lon: state.location.map(|p| p.lng),
			}
		};
		let draft = match form.into_draft() {
			Ok(draft) => draft,
			Err(e) => {
				self.messages.show_error(&e.to_string());
				return Err(e);
			}
		};

		let handler = self.on_submit.lock().clone();
		match handler {
			Some(handler) => handler(draft).await,
			None => tracing::warn!("story submitted without a bound handler"),
		}
		Ok(())
	}

	async fn refresh_devices(&self) {
		match self.camera.devices().await {
			Ok(devices) => {
				let mut state = self.state.lock();
				if state.selected_device.is_none() {
					state.selected_device = devices.first().map(|d| d.id.clone());
				}
				state.devices = devices;
			}
			Err(e) => tracing::warn!(error = %e, "cannot enumerate cameras"),
		}
	}

	pub fn render(&self) -> View {
		let state = self.state.lock();
		let camera = match &state.photo {
			Some(_) => View::fragment(vec![
				View::element("img")
					.attr("id", "photo-preview")
					.attr("alt", "Captured photo"),
				View::element("button")
					.attr("type", "button")
					.attr("id", "retake-button")
					.child("Retake"),
			]),
			None => View::fragment(vec![
				View::element("video")
					.attr("id", "camera-preview")
					.attr("autoplay", "autoplay")
					.attr("playsinline", "playsinline"),
				View::element("select")
					.attr("id", "camera-select")
					.attr("aria-label", "Camera")
					.children(state.devices.iter().map(|d| {
						View::element("option")
							.attr("value", d.id.clone())
							.attr_if(
								state.selected_device.as_deref() == Some(d.id.as_str()),
								"selected",
								"selected",
							)
							.child(d.label.clone())
					})),
				View::element("button")
					.attr("type", "button")
					.attr("id", "capture-button")
					.child("Take Photo"),
			]),
		};

		View::element("main")
			.attr("class", "add-story")
			.child(View::element("h1").child("Add New Story"))
			.child(
				View::element("form")
					.attr("id", "add-story-form")
					.child(View::element("section").attr("class", "camera-section").child(camera))
					.child(field(
						"description",
						"Description",
						View::element("textarea")
							.attr("id", "description")
							.attr("name", "description")
							.attr("required", "required")
							.into(),
					))
					.child(
						View::element("section")
							.attr("class", "location-section")
							.child(
								View::element("div")
									.attr("id", ADD_STORY_MAP_ID)
									.attr("class", "add-story-map"),
							)
							.child(
								View::element("button")
									.attr("type", "button")
									.attr("id", "get-location")
									.child("Use Current Location"),
							)
							.child(
								View::element("p")
									.attr("id", "location-status")
									.child(state.location_status.clone()),
							),
					)
					.child(View::element("button").attr("type", "submit").child("Share Story")),
			)
			.child(self.messages.render())
			.into()
	}
}

impl MessageView for AddStoryView {
	fn show_error(&self, message: &str) {
		self.messages.show_error(message);
	}

	fn show_success(&self, message: &str) {
		self.messages.show_success(message);
	}
}

#[async_trait]
impl AddStoryViewContract for AddStoryView {
	async fn activate(&self) {
		self.state.lock().active = true;
		let center = Position::new(self.map_settings.default_lat, self.map_settings.default_lng);
		self.map
			.initialize_map(ADD_STORY_MAP_ID, center, self.map_settings.default_zoom);
		self.refresh_devices().await;
		self.start_camera().await;
	}

	fn cleanup(&self) {
		self.state.lock().active = false;
		self.stop_camera();
		self.map.remove();
		self.header_listener.lock().take();
	}
}
