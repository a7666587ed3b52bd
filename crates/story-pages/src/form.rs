//! Client-side form validation.
//!
//! Validation runs before any request: a form that fails never reaches its
//! presenter.

use story_api::{Photo, StoryDraft};
use thiserror::Error;

/// Minimum password length accepted by the API.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	#[error("{field} is required")]
	Required { field: &'static str },
	#[error("{field} must be at least {min} characters")]
	TooShort { field: &'static str, min: usize },
	#[error("Please enter a valid email address")]
	InvalidEmail,
	#[error("Passwords don't match!")]
	PasswordMismatch,
	#[error("Please take a photo first")]
	MissingPhoto,
	#[error("Please enter a description")]
	MissingDescription,
	#[error("Please select a location")]
	MissingLocation,
}

fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() {
		return Err(ValidationError::Required { field });
	}
	Ok(())
}

fn email(value: &str) -> Result<(), ValidationError> {
	required("Email", value)?;
	match value.split_once('@') {
		Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
		_ => Err(ValidationError::InvalidEmail),
	}
}

fn password(field: &'static str, value: &str) -> Result<(), ValidationError> {
	required(field, value)?;
	if value.chars().count() < MIN_PASSWORD_LEN {
		return Err(ValidationError::TooShort {
			field,
			min: MIN_PASSWORD_LEN,
		});
	}
	Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
	pub email: String,
	pub password: String,
}

impl LoginForm {
	pub fn validate(&self) -> Result<(), ValidationError> {
		email(&self.email)?;
		password("Password", &self.password)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterForm {
	pub name: String,
	pub email: String,
	pub password: String,
	pub confirm_password: String,
}

impl RegisterForm {
	/// Field constraints first, then the confirmation match.
	pub fn validate(&self) -> Result<(), ValidationError> {
		required("Name", &self.name)?;
		email(&self.email)?;
		password("Password", &self.password)?;
		password("Confirm Password", &self.confirm_password)?;
		if self.password != self.confirm_password {
			return Err(ValidationError::PasswordMismatch);
		}
		Ok(())
	}
}

/// Add-story input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryForm {
	pub description: String,
	pub photo: Option<Photo>,
	pub lat: Option<f64>,
	pub lon: Option<f64>,
}

impl StoryForm {
	/// Photo, then description, then location.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.photo.is_none() {
			return Err(ValidationError::MissingPhoto);
		}
		if self.description.trim().is_empty() {
			return Err(ValidationError::MissingDescription);
		}
		if self.lat.is_none() || self.lon.is_none() {
			return Err(ValidationError::MissingLocation);
		}
		Ok(())
	}

	/// Validates and converts into an upload draft.
	pub fn into_draft(self) -> Result<StoryDraft, ValidationError> {
		self.validate()?;
		Ok(StoryDraft {
			description: self.description.trim().to_string(),
			photo: self.photo,
			lat: self.lat,
			lon: self.lon,
		})
	}
}
