//! Route patterns: literal segments, `:name` placeholders, and `*`.

use super::params::Params;
use crate::error::RouterError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
	Literal(String),
	Param(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
	CatchAll,
	Segments(Vec<Segment>),
}

/// A parsed route pattern.
///
/// Patterns and paths are split on `/` without normalisation, so
/// `/stories` and `/stories/` have different segment counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
	raw: String,
	shape: Shape,
}

impl PathPattern {
	/// Parses a pattern. `*` is the catch-all.
	pub fn parse(pattern: &str) -> Result<Self, RouterError> {
		if pattern == "*" {
			return Ok(Self {
				raw: pattern.to_string(),
				shape: Shape::CatchAll,
			});
		}

		let segments = pattern
			.split('/')
			.map(|segment| match segment.strip_prefix(':') {
				Some("") => Err(RouterError::InvalidPattern {
					pattern: pattern.to_string(),
					reason: "placeholder without a name",
				}),
				Some(name) => Ok(Segment::Param(name.to_string())),
				None => Ok(Segment::Literal(segment.to_string())),
			})
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			raw: pattern.to_string(),
			shape: Shape::Segments(segments),
		})
	}

	/// The pattern as declared.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	pub fn is_catch_all(&self) -> bool {
		matches!(self.shape, Shape::CatchAll)
	}

	/// Names of the placeholders, in declaration order.
	pub fn param_names(&self) -> Vec<&str> {
		match &self.shape {
			Shape::CatchAll => Vec::new(),
			Shape::Segments(segments) => segments
				.iter()
				.filter_map(|s| match s {
					Segment::Param(name) => Some(name.as_str()),
					Segment::Literal(_) => None,
				})
				.collect(),
		}
	}

	/// Matches a path, binding placeholders.
	///
	/// Segment counts must be equal; placeholders bind any segment, the empty
	/// one included; literals compare exactly. The catch-all always matches.
	pub fn matches(&self, path: &str) -> Option<Params> {
		let segments = match &self.shape {
			Shape::CatchAll => return Some(Params::default()),
			Shape::Segments(segments) => segments,
		};

		let parts: Vec<&str> = path.split('/').collect();
		if parts.len() != segments.len() {
			return None;
		}

		let mut params = Params::default();
		for (segment, part) in segments.iter().zip(parts) {
			match segment {
				Segment::Param(name) => params.insert(name, part),
				Segment::Literal(literal) if literal == part => {}
				Segment::Literal(_) => return None,
			}
		}
		Some(params)
	}
}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.raw)
	}
}
