//! Map widget glue shared by the detail and add-story views.

use super::Presenter;
use crate::platform::{Geolocation, MapInstance, MapWidget, Position, ResourceError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Owns at most one live map and the last known device position.
pub struct MapPresenter {
	widget: Arc<dyn MapWidget>,
	geolocation: Arc<dyn Geolocation>,
	timeout: Duration,
	map: Mutex<Option<Box<dyn MapInstance>>>,
	position: Mutex<Option<Position>>,
}

impl std::fmt::Debug for MapPresenter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MapPresenter")
			.field("initialized", &self.is_initialized())
			.field("position", &*self.position.lock())
			.finish()
	}
}

impl MapPresenter {
	pub fn new(
		widget: Arc<dyn MapWidget>,
		geolocation: Arc<dyn Geolocation>,
		geolocation_timeout: Duration,
	) -> Self {
		Self {
			widget,
			geolocation,
			timeout: geolocation_timeout,
			map: Mutex::new(None),
			position: Mutex::new(None),
		}
	}

	pub fn is_initialized(&self) -> bool {
		self.map.lock().is_some()
	}

	/// Creates the map, replacing any previous one. Returns `false` on failure.
	pub fn initialize_map(&self, container_id: &str, center: Position, zoom: u8) -> bool {
		self.remove();
		match self.widget.create(container_id, center, zoom) {
			Ok(map) => {
				*self.map.lock() = Some(map);
				true
			}
			Err(e) => {
				tracing::error!(container = container_id, error = %e, "map initialization failed");
				false
			}
		}
	}

	/// Asks the device for its position, bounded by the geolocation timeout.
	pub async fn current_location(&self) -> Result<Position, ResourceError> {
		let position = tokio::time::timeout(self.timeout, self.geolocation.current_position())
			.await
			.map_err(|_| ResourceError::Timeout)??;
		*self.position.lock() = Some(position);
		Ok(position)
	}

	/// Recenters on the device, reusing a known position.
	pub async fn center_to_current_location(&self, zoom: u8) -> Result<Position, ResourceError> {
		let known = *self.position.lock();
		let position = match known {
			Some(position) => position,
			None => self.current_location().await?,
		};
		self.set_view(position, zoom);
		Ok(position)
	}

	pub fn set_view(&self, center: Position, zoom: u8) {
		if let Some(map) = self.map.lock().as_mut() {
			map.set_view(center, zoom);
		}
	}

	/// Returns `false` when no map is live.
	pub fn add_marker(&self, at: Position, popup: &str) -> bool {
		match self.map.lock().as_mut() {
			Some(map) => {
				map.add_marker(at, popup);
				true
			}
			None => false,
		}
	}

	pub fn clear_markers(&self) {
		if let Some(map) = self.map.lock().as_mut() {
			map.clear_markers();
		}
	}

	/// Replaces the markers with one at the chosen spot and zooms onto it.
	pub fn handle_location_selection(&self, at: Position, zoom: u8) {
		self.clear_markers();
		self.add_marker(at, "Selected Location");
		self.set_view(at, zoom);
	}

	/// Destroys the live map, if any.
	pub fn remove(&self) {
		let map = self.map.lock().take();
		if let Some(mut map) = map {
			map.remove();
		}
	}
}

impl Presenter for MapPresenter {
	fn cleanup(&self) {
		self.remove();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{FakeGeolocation, MapCall, RecordingMap};
	use rstest::rstest;

	fn presenter(geolocation: FakeGeolocation) -> (MapPresenter, Arc<RecordingMap>) {
		let map = Arc::new(RecordingMap::default());
		let presenter = MapPresenter::new(map.clone(), Arc::new(geolocation), Duration::from_millis(50));
		(presenter, map)
	}

	#[rstest]
	fn test_location_selection_replaces_markers() {
		let (presenter, map) = presenter(FakeGeolocation::at(Position::new(0.0, 0.0)));
		assert!(presenter.initialize_map("map", Position::new(-6.2088, 106.8456), 12));

		presenter.handle_location_selection(Position::new(-6.3, 106.9), 15);

		assert_eq!(
			map.calls(),
			vec![
				MapCall::Create {
					container: "map".to_string(),
					center: Position::new(-6.2088, 106.8456),
					zoom: 12
				},
				MapCall::ClearMarkers,
				MapCall::Marker {
					at: Position::new(-6.3, 106.9),
					popup: "Selected Location".to_string()
				},
				MapCall::SetView {
					center: Position::new(-6.3, 106.9),
					zoom: 15
				},
			]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_geolocation_times_out() {
		let (presenter, _map) = presenter(FakeGeolocation::hanging());

		assert_eq!(presenter.current_location().await, Err(ResourceError::Timeout));
	}

	#[rstest]
	#[tokio::test]
	async fn test_center_reuses_known_position() {
		let (presenter, map) = presenter(FakeGeolocation::at(Position::new(1.0, 2.0)));
		presenter.initialize_map("map", Position::new(0.0, 0.0), 12);

		presenter.center_to_current_location(15).await.unwrap();
		presenter.center_to_current_location(15).await.unwrap();

		assert_eq!(map.calls().len(), 3);
	}

	#[rstest]
	fn test_cleanup_removes_map_once() {
		let (presenter, map) = presenter(FakeGeolocation::at(Position::new(0.0, 0.0)));
		presenter.initialize_map("story-map", Position::new(0.0, 0.0), 13);

		presenter.cleanup();
		presenter.cleanup();

		assert_eq!(map.calls().last(), Some(&MapCall::Remove));
		assert_eq!(map.calls().iter().filter(|c| **c == MapCall::Remove).count(), 1);
		assert!(!presenter.add_marker(Position::new(0.0, 0.0), "late"));
	}
}
