//! Path parameters bound by a match.

use crate::error::PathError;
use std::str::FromStr;

/// Placeholder name to raw segment, rebuilt for every navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
	values: Vec<(String, String)>,
}

impl Params {
	pub(super) fn insert(&mut self, name: &str, value: &str) {
		match self.values.iter_mut().find(|(n, _)| n == name) {
			Some(slot) => slot.1 = value.to_string(),
			None => self.values.push((name.to_string(), value.to_string())),
		}
	}

	/// Raw value of a placeholder.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.values
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	/// Raw value of a placeholder the route is known to declare.
	pub fn require(&self, name: &str) -> Result<&str, PathError> {
		self.get(name).ok_or_else(|| PathError::Missing {
			name: name.to_string(),
		})
	}

	/// Typed value of a placeholder.
	///
	/// ```
	/// # use story_pages::router::PathPattern;
	/// let params = PathPattern::parse("/page/:n").unwrap().matches("/page/3").unwrap();
	/// assert_eq!(params.get_as::<u32>("n").unwrap(), 3);
	/// assert!(params.get_as::<u32>("missing").is_err());
	/// ```
	pub fn get_as<T>(&self, name: &str) -> Result<T, PathError>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		let raw = self.require(name)?;
		raw.parse::<T>().map_err(|e| PathError::ParseError {
			name: name.to_string(),
			param_type: std::any::type_name::<T>(),
			raw_value: raw.to_string(),
			reason: e.to_string(),
		})
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.values.iter().map(|(n, v)| (n.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = Params::default();
		for (k, v) in iter {
			let (k, v) = (k.into(), v.into());
			params.insert(&k, &v);
		}
		params
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_parse_error_names_the_parameter() {
		let params: Params = [("id", "abc")].into_iter().collect();

		let err = params.get_as::<i64>("id").unwrap_err();

		match err {
			PathError::ParseError {
				name, raw_value, ..
			} => {
				assert_eq!(name, "id");
				assert_eq!(raw_value, "abc");
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn test_later_binding_wins() {
		let params: Params = [("id", "1"), ("id", "2")].into_iter().collect();
		assert_eq!(params.len(), 1);
		assert_eq!(params.get("id"), Some("2"));
	}
}
