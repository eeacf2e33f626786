use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum NotemixError {
	#[error(transparent)]
	#[diagnostic(code(notemix::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse settings file `{path}`: {reason}")]
	#[diagnostic(
		code(notemix::config_parse),
		help("check that the settings file is valid TOML, or run `notemix init` to create one")
	)]
	ConfigParse { path: String, reason: String },

	#[error("failed to save settings to `{path}`: {reason}")]
	#[diagnostic(code(notemix::config_save))]
	ConfigSave { path: String, reason: String },

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(notemix::invalid_glob),
		help("use a single glob such as `**/Secret/**` or `**/*.draft.md`")
	)]
	InvalidGlob { pattern: String, reason: String },

	#[error("no folder found at `{0}`")]
	#[diagnostic(
		code(notemix::missing_folder),
		help("run `notemix folders` to list the folders of this vault")
	)]
	MissingFolder(String),

	#[error("`{0}` is a note, not a folder")]
	#[diagnostic(code(notemix::not_a_folder))]
	NotAFolder(String),

	#[error("an entry already exists at `{0}`")]
	#[diagnostic(code(notemix::already_exists))]
	AlreadyExists(String),

	#[error("parent folder of `{0}` does not exist")]
	#[diagnostic(
		code(notemix::missing_parent),
		help("create the destination folder first; notemix never creates folders")
	)]
	MissingParent(String),

	#[error("failed to read note `{path}`: {reason}")]
	#[diagnostic(code(notemix::read))]
	Read { path: String, reason: String },

	#[error("failed to write `{path}`: {source}")]
	#[diagnostic(code(notemix::write))]
	Write {
		path: String,
		#[source]
		source: Box<NotemixError>,
	},

	#[error("unknown setting: `{0}`")]
	#[diagnostic(
		code(notemix::unknown_setting),
		help("available settings: exclude_glob, default_export_path, file_name_template, date_format")
	)]
	UnknownSetting(String),
}

impl NotemixError {
	/// Wrap a store or filesystem failure that happened while writing the
	/// destination document.
	pub fn write(path: impl Into<String>, source: NotemixError) -> Self {
		Self::Write {
			path: path.into(),
			source: Box::new(source),
		}
	}
}

pub type NotemixResult<T> = Result<T, NotemixError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
