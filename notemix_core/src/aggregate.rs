use std::cmp::Ordering;
use std::path::Path;

use chrono::DateTime;
use chrono::FixedOffset;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::NotemixError;
use crate::NotemixResult;
use crate::collector::collect_documents;
use crate::date_format::Clock;
use crate::filter::ExcludeFilter;
use crate::settings::Settings;
use crate::store::ContentStore;
use crate::store::Document;
use crate::store::Folder;
use crate::store::NodeKind;
use crate::template::MARKDOWN_SUFFIX;
use crate::template::ensure_markdown_extension;
use crate::template::expand_file_name;

/// Receives the short status messages of a run.
pub trait Notifier {
	fn notify(&self, message: &str);
}

impl<F: Fn(&str)> Notifier for F {
	fn notify(&self, message: &str) {
		self(message);
	}
}

/// Drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
	fn notify(&self, _message: &str) {}
}

/// Everything one mix needs, resolved from the settings at call time.
#[derive(Debug, Clone)]
pub struct AggregationRequest {
	pub folder: Folder,
	pub exclude_glob: String,
	pub file_name_template: String,
	pub date_format: String,
	pub export_path: String,
	/// Explicit destination. When `None` the destination is derived from
	/// `export_path` and the file name template.
	pub destination: Option<String>,
}

impl AggregationRequest {
	pub fn from_settings(folder: Folder, settings: &Settings) -> Self {
		Self {
			folder,
			exclude_glob: settings.exclude_glob.clone(),
			file_name_template: settings.file_name_template.clone(),
			date_format: settings.date_format.clone(),
			export_path: settings.default_export_path.clone(),
			destination: None,
		}
	}

	#[must_use]
	pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
		self.destination = Some(destination.into());
		self
	}
}

/// How the destination was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
	/// A new document was created in the store.
	Created,
	/// An existing document was overwritten in place.
	Updated,
	/// The text was written to an absolute path outside the store.
	Exported,
}

/// The result of every step before the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationPlan {
	pub destination: String,
	/// The mixed documents in output order.
	pub documents: Vec<Document>,
	pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
	pub folder: String,
	pub destination: String,
	pub documents: Vec<String>,
	pub bytes_written: usize,
	pub outcome: WriteOutcome,
}

/// Compare two names the way a human-facing sorted list expects.
///
/// Names are decomposed so that accented letters sort with their base
/// letter. Base characters compare first without regard to case, with
/// punctuation ahead of digits and digits ahead of letters. Ties are broken
/// by accents (unaccented first), then by case (lower before upper) and
/// finally by code point.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
	let left = collation_elements(a);
	let right = collation_elements(b);

	left.iter()
		.map(CollationElement::primary)
		.cmp(right.iter().map(CollationElement::primary))
		.then_with(|| {
			left.iter()
				.map(|element| &element.marks)
				.cmp(right.iter().map(|element| &element.marks))
		})
		.then_with(|| {
			left.iter()
				.map(|element| element.upper)
				.cmp(right.iter().map(|element| element.upper))
		})
		.then_with(|| a.cmp(b))
}

/// One base character together with the combining marks that follow it.
struct CollationElement {
	class: u8,
	base: char,
	marks: Vec<char>,
	upper: bool,
}

impl CollationElement {
	fn new(ch: char) -> Self {
		let class = if ch.is_alphabetic() {
			2
		} else if ch.is_numeric() {
			1
		} else {
			0
		};

		Self {
			class,
			base: ch.to_lowercase().next().unwrap_or(ch),
			marks: Vec::new(),
			upper: ch.is_uppercase(),
		}
	}

	fn primary(&self) -> (u8, char) {
		(self.class, self.base)
	}
}

fn collation_elements(text: &str) -> Vec<CollationElement> {
	let mut elements: Vec<CollationElement> = Vec::with_capacity(text.len());

	for ch in text.nfd() {
		match elements.last_mut() {
			Some(last) if is_combining_mark(ch) => last.marks.push(ch),
			_ => elements.push(CollationElement::new(ch)),
		}
	}

	elements
}

/// Stable ascending sort by base name.
pub fn sort_documents(documents: &mut [Document]) {
	documents.sort_by(|a, b| locale_compare(&a.base_name, &b.base_name));
}

/// Collect, filter and sort the markdown documents below `folder`.
pub fn select_documents(folder: &Folder, exclude_glob: &str) -> NotemixResult<Vec<Document>> {
	let filter = ExcludeFilter::new(exclude_glob)?;
	let mut documents = filter.apply(collect_documents(folder));
	sort_documents(&mut documents);
	Ok(documents)
}

/// Read every document and join them between start and end markers.
pub fn concatenate<S: ContentStore + ?Sized>(
	store: &S,
	documents: &[Document],
) -> NotemixResult<String> {
	let mut combined = String::new();
	for document in documents {
		let content = store.read(document)?;
		combined.push_str(&format!(
			"<!-- Start: {name} -->\n{content}\n<!-- End: {name} -->\n\n",
			name = document.base_name
		));
	}
	Ok(combined)
}

/// Where a mix goes when the user does not name a destination.
///
/// Without an export path the file lands next to the mixed notes. An export
/// path ending in `.md` is the destination itself; any other export path is
/// treated as a directory. The file name is always joined below the
/// directory, even when it starts with a separator, and `.` and `..`
/// components are folded. Relative results follow the store's path rules.
pub fn default_destination<S: ContentStore + ?Sized>(
	store: &S,
	folder: &Folder,
	export_path: &str,
	file_name: &str,
) -> String {
	if export_path.is_empty() {
		return store.normalize(&join_lexically(&folder.path, file_name));
	}

	if Path::new(export_path).is_absolute() {
		return if export_path.ends_with(MARKDOWN_SUFFIX) {
			export_path.to_string()
		} else {
			join_lexically(export_path, file_name)
		};
	}

	let export_path = store.normalize(export_path);
	if export_path.ends_with(MARKDOWN_SUFFIX) {
		export_path
	} else {
		store.normalize(&join_lexically(&export_path, file_name))
	}
}

/// Join two `/`-separated paths, dropping empty and `.` components and
/// resolving `..` against the components before it. `..` never climbs above
/// the start of the path.
fn join_lexically(base: &str, name: &str) -> String {
	let mut parts: Vec<&str> = Vec::new();
	for part in base.split('/').chain(name.split('/')) {
		match part {
			"" | "." => {}
			".." => {
				parts.pop();
			}
			part => parts.push(part),
		}
	}

	let joined = parts.join("/");
	if base.starts_with('/') {
		format!("/{joined}")
	} else {
		joined
	}
}

/// Run every step of a mix except the write.
pub fn plan_aggregation<S: ContentStore + ?Sized>(
	store: &S,
	request: &AggregationRequest,
	now: DateTime<FixedOffset>,
) -> NotemixResult<AggregationPlan> {
	let documents = select_documents(&request.folder, &request.exclude_glob)?;
	let content = concatenate(store, &documents)?;

	let destination = match &request.destination {
		Some(destination) => destination.clone(),
		None => {
			let file_name = expand_file_name(
				&request.file_name_template,
				&request.folder.name,
				&request.date_format,
				now,
			);
			default_destination(store, &request.folder, &request.export_path, &file_name)
		}
	};

	Ok(AggregationPlan {
		destination: ensure_markdown_extension(&destination),
		documents,
		content,
	})
}

/// Write `content` to `destination`, replacing whatever is there.
///
/// Absolute paths are written straight to the filesystem. Anything else is a
/// store path: an existing document is modified, otherwise a new one is
/// created. Missing parent folders make the write fail.
pub fn write_destination<S: ContentStore + ?Sized>(
	store: &mut S,
	destination: &str,
	content: &str,
) -> NotemixResult<WriteOutcome> {
	if Path::new(destination).is_absolute() {
		std::fs::write(destination, content)?;
		return Ok(WriteOutcome::Exported);
	}

	let path = store.normalize(destination);
	if store.kind(&path)? == Some(NodeKind::Document) {
		store.modify(&Document::from_path(&path), content)?;
		return Ok(WriteOutcome::Updated);
	}

	store.create(&path, content)?;
	Ok(WriteOutcome::Created)
}

/// Mix the notes of `request.folder` into a single document.
///
/// Read failures abort the run before anything is written. Write failures
/// are reported through `notifier` and returned as
/// [`NotemixError::Write`].
pub fn aggregate<S: ContentStore + ?Sized>(
	store: &mut S,
	request: &AggregationRequest,
	clock: &dyn Clock,
	notifier: &dyn Notifier,
) -> NotemixResult<AggregationReport> {
	notifier.notify(&format!("Mixing notes from {}...", request.folder.path));

	let plan = plan_aggregation(store, request, clock.now())?;

	let outcome = match write_destination(store, &plan.destination, &plan.content) {
		Ok(outcome) => outcome,
		Err(error) => {
			notifier.notify(&format!("Error creating file: {error}"));
			tracing::error!(destination = %plan.destination, error = ?error, "failed to write mixed notes");
			return Err(NotemixError::write(plan.destination, error));
		}
	};

	let verb = match outcome {
		WriteOutcome::Updated => "Updated",
		WriteOutcome::Created | WriteOutcome::Exported => "Created",
	};
	notifier.notify(&format!("{verb}: {}", plan.destination));
	tracing::info!(
		folder = %request.folder.path,
		destination = %plan.destination,
		notes = plan.documents.len(),
		bytes = plan.content.len(),
		"mixed notes"
	);

	Ok(AggregationReport {
		folder: request.folder.path.clone(),
		destination: plan.destination,
		documents: plan
			.documents
			.into_iter()
			.map(|document| document.path)
			.collect(),
		bytes_written: plan.content.len(),
		outcome,
	})
}
