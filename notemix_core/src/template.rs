use chrono::DateTime;
use chrono::FixedOffset;
use derive_more::Deref;

use crate::date_format::Clock;
use crate::date_format::format_moment;

/// Replaced with the name of the mixed folder.
pub const FOLDER_NAME_PLACEHOLDER: &str = "{foldername}";
/// Replaced with the current moment in the configured date format.
pub const DATE_PLACEHOLDER: &str = "{date}";
/// Suffix every destination document ends with.
pub const MARKDOWN_SUFFIX: &str = ".md";

/// A piece of a file name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	Literal(String),
	/// `{foldername}`
	FolderName,
	/// `{date}`
	Date,
	/// Any other `{pattern}`, formatted as a date with `pattern`.
	Format(String),
}

/// A parsed template, rendered left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct Segments(Vec<Segment>);

impl Segments {
	pub fn render(&self, context: &TemplateContext<'_>) -> String {
		let mut output = String::new();
		for segment in &self.0 {
			match segment {
				Segment::Literal(text) => output.push_str(text),
				Segment::FolderName => output.push_str(context.folder_name),
				Segment::Date => output.push_str(&format_moment(&context.now, context.date_format)),
				Segment::Format(pattern) => output.push_str(&format_moment(&context.now, pattern)),
			}
		}
		output
	}

	fn push_literal(&mut self, text: &str) {
		if text.is_empty() {
			return;
		}

		if let Some(Segment::Literal(last)) = self.0.last_mut() {
			last.push_str(text);
		} else {
			self.0.push(Segment::Literal(text.to_string()));
		}
	}
}

/// Values a template is rendered against. `now` is captured once so every
/// date placeholder of one expansion agrees.
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
	pub folder_name: &'a str,
	pub date_format: &'a str,
	pub now: DateTime<FixedOffset>,
}

/// The substitution passes, in the order they run. Each pass parses the
/// output of the previous one, so text inserted by an earlier pass (such as
/// a folder name containing `{...}`) is seen by the later passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
	FolderName,
	Date,
	Format,
}

impl Pass {
	pub const ALL: [Pass; 3] = [Pass::FolderName, Pass::Date, Pass::Format];

	pub fn parse(self, text: &str) -> Segments {
		match self {
			Self::FolderName => parse_placeholder(text, FOLDER_NAME_PLACEHOLDER, &Segment::FolderName),
			Self::Date => parse_placeholder(text, DATE_PLACEHOLDER, &Segment::Date),
			Self::Format => parse_format_spans(text),
		}
	}
}

/// Split `text` on every literal occurrence of `placeholder`.
pub fn parse_placeholder(text: &str, placeholder: &str, segment: &Segment) -> Segments {
	let mut segments = Segments::default();
	let mut last = 0;

	for (index, _) in text.match_indices(placeholder) {
		segments.push_literal(&text[last..index]);
		segments.0.push(segment.clone());
		last = index + placeholder.len();
	}

	segments.push_literal(&text[last..]);
	segments
}

/// Split `text` on every `{...}` span. A span runs from a `{` to the next
/// `}` and must not be empty; braces are not nested.
pub fn parse_format_spans(text: &str) -> Segments {
	let mut segments = Segments::default();
	let mut rest = text;

	while let Some(open) = rest.find('{') {
		let after_open = &rest[open + 1..];
		let Some(close) = after_open.find('}') else {
			break;
		};

		if close == 0 {
			// `{}` is literal text; keep scanning after the `{`.
			segments.push_literal(&rest[..=open]);
			rest = after_open;
			continue;
		}

		segments.push_literal(&rest[..open]);
		segments
			.0
			.push(Segment::Format(after_open[..close].to_string()));
		rest = &after_open[close + 1..];
	}

	segments.push_literal(rest);
	segments
}

/// Expand a file name template into a concrete file name ending in `.md`.
pub fn expand_file_name(
	template: &str,
	folder_name: &str,
	date_format: &str,
	now: DateTime<FixedOffset>,
) -> String {
	let context = TemplateContext {
		folder_name,
		date_format,
		now,
	};

	let expanded = Pass::ALL
		.iter()
		.fold(template.to_string(), |text, pass| {
			pass.parse(&text).render(&context)
		});

	ensure_markdown_extension(&expanded)
}

/// [`expand_file_name`] at the moment read from `clock`.
pub fn expand_file_name_with_clock(
	template: &str,
	folder_name: &str,
	date_format: &str,
	clock: &dyn Clock,
) -> String {
	expand_file_name(template, folder_name, date_format, clock.now())
}

/// Append `.md` unless `path` already ends with it (case-sensitive).
pub fn ensure_markdown_extension(path: &str) -> String {
	if path.ends_with(MARKDOWN_SUFFIX) {
		path.to_string()
	} else {
		format!("{path}{MARKDOWN_SUFFIX}")
	}
}
