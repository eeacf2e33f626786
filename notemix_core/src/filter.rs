use globset::GlobBuilder;
use globset::GlobMatcher;

use crate::NotemixError;
use crate::NotemixResult;
use crate::store::Document;

/// Drops documents whose path matches a single exclusion glob.
///
/// `*` stays within one path component and `**` spans directories. A
/// pattern without a `/` is matched against the final path component only,
/// so `*.draft.md` excludes drafts at any depth.
///
/// Wildcards never match a dot-prefixed path component: a path such as
/// `.trash/old.md` is only excluded by a pattern that names a dot-prefixed
/// component itself, like `.trash/**`.
#[derive(Debug, Clone)]
pub struct ExcludeFilter {
	pattern: String,
	matcher: Option<GlobMatcher>,
	match_base: bool,
	explicit_dot: bool,
}

impl ExcludeFilter {
	/// Compile `pattern`. An empty pattern excludes nothing.
	pub fn new(pattern: &str) -> NotemixResult<Self> {
		if pattern.is_empty() {
			return Ok(Self::none());
		}

		let glob = GlobBuilder::new(pattern)
			.literal_separator(true)
			.build()
			.map_err(|e| {
				NotemixError::InvalidGlob {
					pattern: pattern.to_string(),
					reason: e.kind().to_string(),
				}
			})?;

		Ok(Self {
			pattern: pattern.to_string(),
			matcher: Some(glob.compile_matcher()),
			match_base: !pattern.contains('/'),
			explicit_dot: pattern.split('/').any(is_hidden_component),
		})
	}

	/// A filter that keeps everything.
	pub fn none() -> Self {
		Self {
			pattern: String::new(),
			matcher: None,
			match_base: false,
			explicit_dot: false,
		}
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn is_empty(&self) -> bool {
		self.matcher.is_none()
	}

	/// Whether `path` survives the filter.
	pub fn keep(&self, path: &str) -> bool {
		let Some(matcher) = &self.matcher else {
			return true;
		};

		let candidate = if self.match_base {
			path.rsplit('/').next().unwrap_or(path)
		} else {
			path
		};

		if !self.explicit_dot && candidate.split('/').any(is_hidden_component) {
			return true;
		}

		!matcher.is_match(candidate)
	}

	/// Retain the documents that survive the filter, preserving their order.
	pub fn apply(&self, mut documents: Vec<Document>) -> Vec<Document> {
		documents.retain(|document| {
			let keep = self.keep(&document.path);
			if !keep {
				tracing::debug!(path = %document.path, pattern = %self.pattern, "excluded note");
			}
			keep
		});
		documents
	}
}

fn is_hidden_component(component: &str) -> bool {
	component.starts_with('.')
}

/// Whether `path` survives the exclusion `pattern`.
pub fn keep(path: &str, pattern: &str) -> NotemixResult<bool> {
	Ok(ExcludeFilter::new(pattern)?.keep(path))
}
