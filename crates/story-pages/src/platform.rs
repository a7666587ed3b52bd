//! Device and widget collaborators: map, camera, geolocation.

use async_trait::async_trait;
use story_api::Photo;
use thiserror::Error;

/// Failure acquiring or driving a device resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
	#[error("{0} is not supported on this device")]
	Unsupported(&'static str),
	#[error("permission denied")]
	PermissionDenied,
	#[error("timed out")]
	Timeout,
	#[error("map container #{0} not found")]
	ContainerMissing(String),
	#[error("{0}")]
	Failed(String),
}

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
	pub lat: f64,
	pub lng: f64,
	pub accuracy: Option<f64>,
}

impl Position {
	pub fn new(lat: f64, lng: f64) -> Self {
		Self {
			lat,
			lng,
			accuracy: None,
		}
	}
}

/// Creates interactive maps inside a container element.
pub trait MapWidget: Send + Sync {
	fn create(
		&self,
		container_id: &str,
		center: Position,
		zoom: u8,
	) -> Result<Box<dyn MapInstance>, ResourceError>;
}

/// One live map.
pub trait MapInstance: Send {
	fn set_view(&mut self, center: Position, zoom: u8);
	fn add_marker(&mut self, at: Position, popup: &str);
	fn clear_markers(&mut self);
	/// Destroys the map; the instance is unusable afterwards.
	fn remove(&mut self);
}

#[async_trait]
pub trait Geolocation: Send + Sync {
	async fn current_position(&self) -> Result<Position, ResourceError>;
}

/// A video input device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
	pub id: String,
	pub label: String,
}

#[async_trait]
pub trait Camera: Send + Sync {
	async fn devices(&self) -> Result<Vec<CameraDevice>, ResourceError>;

	/// Opens a stream, on the given device when `device_id` is set.
	async fn open(&self, device_id: Option<&str>) -> Result<Box<dyn CameraStream>, ResourceError>;
}

/// A running camera stream.
pub trait CameraStream: Send {
	/// Grabs the current frame as a JPEG.
	fn capture(&mut self) -> Result<Photo, ResourceError>;
	/// Releases the device.
	fn stop(&mut self);
}
