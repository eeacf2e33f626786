use std::cell::RefCell;
use std::path::Path;

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::TimeZone;

use crate::AggregationRequest;
use crate::ContentStore;
use crate::FixedClock;
use crate::Folder;
use crate::MemoryStore;
use crate::Notifier;
use crate::Settings;

/// 2023-10-27 10:30:45 UTC, a Friday.
pub fn reference_instant() -> DateTime<FixedOffset> {
	FixedOffset::east_opt(0)
		.and_then(|offset| offset.with_ymd_and_hms(2023, 10, 27, 10, 30, 45).single())
		.unwrap_or_else(|| panic!("invalid reference instant"))
}

pub fn reference_clock() -> FixedClock {
	FixedClock(reference_instant())
}

/// A folder with two notes, a nested note and an image.
pub fn sample_store() -> MemoryStore {
	MemoryStore::new()
		.with_document("folder/note1.md", "# Note 1\nContent 1")
		.with_document("folder/secret.md", "# Secret\nDo not share")
		.with_document("folder/sub/note2.md", "# Note 2\nContent 2")
		.with_document("folder/image.png", "not really a png")
}

pub fn folder_of(store: &impl ContentStore, path: &str) -> Folder {
	store
		.folder(path)
		.unwrap_or_else(|e| panic!("folder `{path}`: {e}"))
}

pub fn sample_request(store: &MemoryStore) -> AggregationRequest {
	AggregationRequest::from_settings(folder_of(store, "folder"), &Settings::default())
}

pub fn write_file(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

/// Keeps every notification for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
	messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
	pub fn messages(&self) -> Vec<String> {
		self.messages.borrow().clone()
	}
}

impl Notifier for RecordingNotifier {
	fn notify(&self, message: &str) {
		self.messages.borrow_mut().push(message.to_string());
	}
}
