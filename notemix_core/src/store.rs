use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::NotemixError;
use crate::NotemixResult;

/// Store path of the root folder.
pub const ROOT_PATH: &str = "/";

/// Extension of the documents that take part in a mix.
pub const MARKDOWN_EXTENSION: &str = "md";

/// A leaf entry of the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
	/// Store-relative path, unique within the store.
	pub path: String,
	/// Final path component.
	pub name: String,
	/// File name without its extension.
	pub base_name: String,
	/// Lower-cased suffix after the final `.` of the file name.
	pub extension: String,
}

impl Document {
	pub fn from_path(path: &str) -> Self {
		let name = file_name(path).to_string();
		let (base_name, extension) = match name.rfind('.') {
			Some(index) => (name[..index].to_string(), name[index + 1..].to_lowercase()),
			None => (name.clone(), String::new()),
		};

		Self {
			path: path.to_string(),
			name,
			base_name,
			extension,
		}
	}

	pub fn is_markdown(&self) -> bool {
		self.extension == MARKDOWN_EXTENSION
	}
}

/// A container entry of the content store together with its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
	pub path: String,
	pub name: String,
	/// Children in the order the store listed them.
	pub children: Vec<TreeNode>,
}

impl Folder {
	pub fn new(path: &str, children: Vec<TreeNode>) -> Self {
		let name = if path == ROOT_PATH {
			String::new()
		} else {
			file_name(path).to_string()
		};

		Self {
			path: path.to_string(),
			name,
			children,
		}
	}

	pub fn is_root(&self) -> bool {
		self.path == ROOT_PATH
	}

	/// This folder followed by every folder below it, in pre-order.
	pub fn folders(&self) -> Vec<&Folder> {
		let mut folders = vec![self];
		for child in &self.children {
			if let TreeNode::Folder(folder) = child {
				folders.extend(folder.folders());
			}
		}
		folders
	}
}

/// A node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
	Document(Document),
	Folder(Folder),
}

impl TreeNode {
	pub fn path(&self) -> &str {
		match self {
			Self::Document(document) => &document.path,
			Self::Folder(folder) => &folder.path,
		}
	}
}

/// What sits at a store path, without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	Document,
	Folder,
}

/// The hierarchical document repository that notes are mixed from and
/// written back to.
pub trait ContentStore {
	/// Find the entry at `path`. Folders are returned with their full subtree.
	fn lookup(&self, path: &str) -> NotemixResult<Option<TreeNode>>;

	/// What kind of entry sits at `path`, if any. Stores that load subtrees
	/// eagerly should override this with a cheaper check.
	fn kind(&self, path: &str) -> NotemixResult<Option<NodeKind>> {
		Ok(self.lookup(path)?.map(|node| {
			match node {
				TreeNode::Document(_) => NodeKind::Document,
				TreeNode::Folder(_) => NodeKind::Folder,
			}
		}))
	}

	/// Read the full text of a document.
	fn read(&self, document: &Document) -> NotemixResult<String>;

	/// Create a new document. Parent folders are never created.
	fn create(&mut self, path: &str, content: &str) -> NotemixResult<Document>;

	/// Replace the content of an existing document.
	fn modify(&mut self, document: &Document, content: &str) -> NotemixResult<()>;

	/// Normalize a path according to the store's path rules.
	fn normalize(&self, path: &str) -> String {
		normalize_store_path(path)
	}

	fn root(&self) -> NotemixResult<Folder> {
		self.folder(ROOT_PATH)
	}

	/// Resolve `path` to a folder, failing when nothing or a document is
	/// found there.
	fn folder(&self, path: &str) -> NotemixResult<Folder> {
		let path = self.normalize(path);
		match self.lookup(&path)? {
			Some(TreeNode::Folder(folder)) => Ok(folder),
			Some(TreeNode::Document(_)) => Err(NotemixError::NotAFolder(path)),
			None => Err(NotemixError::MissingFolder(path)),
		}
	}
}

/// Normalize a store path: backslashes become `/`, repeated separators
/// collapse, leading and trailing separators are dropped and non-breaking
/// spaces become plain spaces. An empty path is the root.
pub fn normalize_store_path(path: &str) -> String {
	let replaced: String = path
		.chars()
		.map(|ch| {
			match ch {
				'\\' => '/',
				'\u{00A0}' | '\u{202F}' => ' ',
				other => other,
			}
		})
		.collect();
	let normalized = replaced
		.split('/')
		.filter(|part| !part.is_empty())
		.collect::<Vec<_>>()
		.join("/");

	if normalized.is_empty() {
		ROOT_PATH.to_string()
	} else {
		normalized
	}
}

/// Join a child name onto a store path.
pub fn join_store_path(parent: &str, name: &str) -> String {
	if parent == ROOT_PATH || parent.is_empty() {
		name.to_string()
	} else {
		format!("{parent}/{name}")
	}
}

fn file_name(path: &str) -> &str {
	path.rsplit('/').next().unwrap_or(path)
}

fn parent_path(path: &str) -> &str {
	path.rsplit_once('/').map_or(ROOT_PATH, |(parent, _)| parent)
}

fn is_hidden_name(name: &str) -> bool {
	name.starts_with('.')
}

/// A content store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct FsStore {
	root: PathBuf,
}

impl FsStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// The directory this store is rooted at.
	pub fn root_dir(&self) -> &Path {
		&self.root
	}

	fn absolute(&self, path: &str) -> PathBuf {
		let normalized = normalize_store_path(path);
		if normalized == ROOT_PATH {
			self.root.clone()
		} else {
			self.root.join(normalized)
		}
	}

	fn load_folder(&self, path: &str, dir: &Path) -> NotemixResult<Folder> {
		let mut entries = Vec::new();
		for entry in std::fs::read_dir(dir)? {
			let entry = entry?;
			let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
				continue;
			};
			if is_hidden_name(&name) {
				continue;
			}
			entries.push((name, entry));
		}
		entries.sort_by(|a, b| a.0.cmp(&b.0));

		let mut children = Vec::with_capacity(entries.len());
		for (name, entry) in entries {
			let child_path = join_store_path(path, &name);
			// Symlinked directories are not followed so the tree stays acyclic.
			if entry.file_type()?.is_dir() {
				children.push(TreeNode::Folder(
					self.load_folder(&child_path, &entry.path())?,
				));
			} else if entry.path().is_file() {
				children.push(TreeNode::Document(Document::from_path(&child_path)));
			}
		}

		Ok(Folder::new(path, children))
	}
}

impl ContentStore for FsStore {
	fn lookup(&self, path: &str) -> NotemixResult<Option<TreeNode>> {
		let path = normalize_store_path(path);
		let absolute = self.absolute(&path);

		if absolute.is_dir() {
			return Ok(Some(TreeNode::Folder(self.load_folder(&path, &absolute)?)));
		}

		if absolute.is_file() {
			return Ok(Some(TreeNode::Document(Document::from_path(&path))));
		}

		Ok(None)
	}

	fn kind(&self, path: &str) -> NotemixResult<Option<NodeKind>> {
		let absolute = self.absolute(path);

		Ok(if absolute.is_dir() {
			Some(NodeKind::Folder)
		} else if absolute.is_file() {
			Some(NodeKind::Document)
		} else {
			None
		})
	}

	fn read(&self, document: &Document) -> NotemixResult<String> {
		std::fs::read_to_string(self.absolute(&document.path)).map_err(|e| {
			NotemixError::Read {
				path: document.path.clone(),
				reason: e.to_string(),
			}
		})
	}

	fn create(&mut self, path: &str, content: &str) -> NotemixResult<Document> {
		let path = normalize_store_path(path);
		let absolute = self.absolute(&path);

		if absolute.exists() {
			return Err(NotemixError::AlreadyExists(path));
		}

		if !absolute.parent().is_some_and(Path::is_dir) {
			return Err(NotemixError::MissingParent(path));
		}

		let mut file = OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(&absolute)?;
		file.write_all(content.as_bytes())?;

		Ok(Document::from_path(&path))
	}

	fn modify(&mut self, document: &Document, content: &str) -> NotemixResult<()> {
		let absolute = self.absolute(&document.path);
		if !absolute.is_file() {
			return Err(NotemixError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("note `{}` no longer exists", document.path),
			)));
		}

		std::fs::write(absolute, content)?;
		Ok(())
	}
}

/// A content store held entirely in memory.
///
/// Folders are explicit entries: [`MemoryStore::with_document`] creates the
/// missing ancestors of a document, while [`ContentStore::create`] refuses to
/// write into a folder that does not exist, like [`FsStore`].
#[derive(Debug, Clone)]
pub struct MemoryStore {
	folders: BTreeSet<String>,
	documents: BTreeMap<String, String>,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self {
			folders: BTreeSet::from([ROOT_PATH.to_string()]),
			documents: BTreeMap::new(),
		}
	}

	#[must_use]
	pub fn with_folder(mut self, path: &str) -> Self {
		self.insert_folder(&normalize_store_path(path));
		self
	}

	#[must_use]
	pub fn with_document(mut self, path: &str, content: &str) -> Self {
		let path = normalize_store_path(path);
		self.insert_folder(parent_path(&path));
		self.documents.insert(path, content.to_string());
		self
	}

	/// The stored content of the document at `path`, if any.
	pub fn content(&self, path: &str) -> Option<&str> {
		self.documents
			.get(&normalize_store_path(path))
			.map(String::as_str)
	}

	fn insert_folder(&mut self, path: &str) {
		let mut current = String::new();
		for part in path.split('/').filter(|part| !part.is_empty()) {
			current = join_store_path(&current, part);
			self.folders.insert(current.clone());
		}
	}

	fn build_folder(&self, path: &str) -> Folder {
		let mut children: Vec<(String, TreeNode)> = Vec::new();

		for folder in &self.folders {
			if folder != ROOT_PATH && parent_path(folder) == path {
				children.push((
					file_name(folder).to_string(),
					TreeNode::Folder(self.build_folder(folder)),
				));
			}
		}

		for document in self.documents.keys() {
			if parent_path(document) == path {
				children.push((
					file_name(document).to_string(),
					TreeNode::Document(Document::from_path(document)),
				));
			}
		}

		children.sort_by(|a, b| a.0.cmp(&b.0));
		Folder::new(path, children.into_iter().map(|(_, node)| node).collect())
	}
}

impl ContentStore for MemoryStore {
	fn lookup(&self, path: &str) -> NotemixResult<Option<TreeNode>> {
		let path = normalize_store_path(path);

		if self.folders.contains(&path) {
			return Ok(Some(TreeNode::Folder(self.build_folder(&path))));
		}

		Ok(self
			.documents
			.contains_key(&path)
			.then(|| TreeNode::Document(Document::from_path(&path))))
	}

	fn kind(&self, path: &str) -> NotemixResult<Option<NodeKind>> {
		let path = normalize_store_path(path);

		Ok(if self.folders.contains(&path) {
			Some(NodeKind::Folder)
		} else if self.documents.contains_key(&path) {
			Some(NodeKind::Document)
		} else {
			None
		})
	}

	fn read(&self, document: &Document) -> NotemixResult<String> {
		self.documents
			.get(&document.path)
			.cloned()
			.ok_or_else(|| {
				NotemixError::Read {
					path: document.path.clone(),
					reason: "note does not exist".to_string(),
				}
			})
	}

	fn create(&mut self, path: &str, content: &str) -> NotemixResult<Document> {
		let path = normalize_store_path(path);

		if self.folders.contains(&path) || self.documents.contains_key(&path) {
			return Err(NotemixError::AlreadyExists(path));
		}

		if !self.folders.contains(parent_path(&path)) {
			return Err(NotemixError::MissingParent(path));
		}

		self.documents.insert(path.clone(), content.to_string());
		Ok(Document::from_path(&path))
	}

	fn modify(&mut self, document: &Document, content: &str) -> NotemixResult<()> {
		let Some(existing) = self.documents.get_mut(&document.path) else {
			return Err(NotemixError::Io(std::io::Error::new(
				std::io::ErrorKind::NotFound,
				format!("note `{}` no longer exists", document.path),
			)));
		};

		content.clone_into(existing);
		Ok(())
	}
}
