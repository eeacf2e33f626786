use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::NotemixError;
use crate::NotemixResult;

/// Supported settings file locations in discovery order (highest precedence
/// first).
pub const SETTINGS_FILE_CANDIDATES: [&str; 3] =
	["notemix.toml", ".notemix.toml", ".config/notemix.toml"];

pub const DEFAULT_FILE_NAME_TEMPLATE: &str = "{foldername}_{YYYY.MM.DD HH.mm.ss}.md";
pub const DEFAULT_DATE_FORMAT: &str = "YYYY.MM.DD HH.mm.ss";

/// Settings loaded from a `notemix.toml` file.
///
/// Missing fields fall back to their defaults, so a partial file (or no file
/// at all) is always valid:
///
/// ```toml
/// exclude_glob = "**/Secret/**"
/// default_export_path = "Exports"
/// file_name_template = "{foldername}_{YYYY.MM.DD HH.mm.ss}.md"
/// date_format = "YYYY.MM.DD HH.mm.ss"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Notes whose path matches this glob are left out of the mix.
	#[serde(alias = "excludeGlob")]
	pub exclude_glob: String,
	/// Reserved. Not read by the mixing pipeline.
	#[serde(alias = "ignoreRootFiles")]
	pub ignore_root_files: bool,
	/// Where mixed notes go when no destination is given. Either an absolute
	/// filesystem path or a vault path; a value ending in `.md` is used as the
	/// destination file itself.
	#[serde(alias = "defaultExportPath")]
	pub default_export_path: String,
	/// Template for the generated file name.
	#[serde(alias = "fileNameTemplate")]
	pub file_name_template: String,
	/// Format of the `{date}` placeholder.
	#[serde(alias = "dateFormat")]
	pub date_format: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			exclude_glob: String::new(),
			ignore_root_files: false,
			default_export_path: String::new(),
			file_name_template: DEFAULT_FILE_NAME_TEMPLATE.to_string(),
			date_format: DEFAULT_DATE_FORMAT.to_string(),
		}
	}
}

impl Settings {
	pub fn get(&self, key: SettingKey) -> &str {
		match key {
			SettingKey::ExcludeGlob => &self.exclude_glob,
			SettingKey::DefaultExportPath => &self.default_export_path,
			SettingKey::FileNameTemplate => &self.file_name_template,
			SettingKey::DateFormat => &self.date_format,
		}
	}

	pub fn set(&mut self, key: SettingKey, value: impl Into<String>) {
		let value = value.into();
		match key {
			SettingKey::ExcludeGlob => self.exclude_glob = value,
			SettingKey::DefaultExportPath => self.default_export_path = value,
			SettingKey::FileNameTemplate => self.file_name_template = value,
			SettingKey::DateFormat => self.date_format = value,
		}
	}

	/// Serialize to the TOML written by [`TomlSettingsStore::save`].
	pub fn to_toml(&self) -> NotemixResult<String> {
		toml::to_string_pretty(self).map_err(|e| {
			NotemixError::ConfigSave {
				path: String::new(),
				reason: e.to_string(),
			}
		})
	}
}

/// The user-editable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
	ExcludeGlob,
	DefaultExportPath,
	FileNameTemplate,
	DateFormat,
}

impl SettingKey {
	pub const ALL: [SettingKey; 4] = [
		SettingKey::ExcludeGlob,
		SettingKey::DefaultExportPath,
		SettingKey::FileNameTemplate,
		SettingKey::DateFormat,
	];

	/// The key as it appears in the settings file.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ExcludeGlob => "exclude_glob",
			Self::DefaultExportPath => "default_export_path",
			Self::FileNameTemplate => "file_name_template",
			Self::DateFormat => "date_format",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::ExcludeGlob => "Exclude Glob Pattern",
			Self::DefaultExportPath => "Default Export Path",
			Self::FileNameTemplate => "File Name Template",
			Self::DateFormat => "Date Format",
		}
	}

	pub fn description(self) -> &'static str {
		match self {
			Self::ExcludeGlob => {
				"Files matching this glob pattern will be excluded. Example: **/*.draft.md"
			}
			Self::DefaultExportPath => {
				"Absolute path or relative vault path to save combined notes by default. If \
				 empty, defaults to folder location."
			}
			Self::FileNameTemplate => {
				"Template for the generated file name. Use {foldername} for the folder name, \
				 {date} for formatted date, or {FormatString} for moment.js date format (e.g. \
				 {YYYY-MM-DD})."
			}
			Self::DateFormat => "Format to use for the {date} placeholder.",
		}
	}

	pub fn placeholder(self) -> &'static str {
		match self {
			Self::ExcludeGlob => "**/Secret/**",
			Self::DefaultExportPath => "C:/Users/Name/Documents/",
			Self::FileNameTemplate => DEFAULT_FILE_NAME_TEMPLATE,
			Self::DateFormat => DEFAULT_DATE_FORMAT,
		}
	}
}

impl fmt::Display for SettingKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SettingKey {
	type Err = NotemixError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"exclude_glob" | "excludeGlob" | "exclude-glob" => Ok(Self::ExcludeGlob),
			"default_export_path" | "defaultExportPath" | "default-export-path" => {
				Ok(Self::DefaultExportPath)
			}
			"file_name_template" | "fileNameTemplate" | "file-name-template" => {
				Ok(Self::FileNameTemplate)
			}
			"date_format" | "dateFormat" | "date-format" => Ok(Self::DateFormat),
			other => Err(NotemixError::UnknownSetting(other.to_string())),
		}
	}
}

/// Persistence for [`Settings`].
pub trait SettingsStore {
	/// Load the stored settings merged over the defaults.
	fn load(&self) -> NotemixResult<Settings>;

	/// Overwrite the stored settings.
	fn save(&self, settings: &Settings) -> NotemixResult<()>;
}

/// Settings stored as TOML in the vault.
#[derive(Debug, Clone)]
pub struct TomlSettingsStore {
	path: PathBuf,
}

impl TomlSettingsStore {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Use the first existing candidate below `root`, or `root/notemix.toml`
	/// when there is none yet.
	pub fn discover(root: &Path) -> Self {
		let path =
			Self::resolve_path(root).unwrap_or_else(|| root.join(SETTINGS_FILE_CANDIDATES[0]));
		Self { path }
	}

	/// Resolve the settings path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		SETTINGS_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn exists(&self) -> bool {
		self.path.is_file()
	}
}

impl SettingsStore for TomlSettingsStore {
	fn load(&self) -> NotemixResult<Settings> {
		if !self.exists() {
			return Ok(Settings::default());
		}

		let content = std::fs::read_to_string(&self.path)?;
		toml::from_str(&content).map_err(|e| {
			NotemixError::ConfigParse {
				path: self.path.display().to_string(),
				reason: e.to_string(),
			}
		})
	}

	fn save(&self, settings: &Settings) -> NotemixResult<()> {
		let content = settings.to_toml().map_err(|e| {
			match e {
				NotemixError::ConfigSave { reason, .. } => {
					NotemixError::ConfigSave {
						path: self.path.display().to_string(),
						reason,
					}
				}
				other => other,
			}
		})?;

		std::fs::write(&self.path, content).map_err(|e| {
			NotemixError::ConfigSave {
				path: self.path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		tracing::debug!(path = %self.path.display(), "saved settings");
		Ok(())
	}
}

/// Change one setting and persist the result immediately.
pub fn update_setting(
	store: &dyn SettingsStore,
	key: SettingKey,
	value: &str,
) -> NotemixResult<Settings> {
	let mut settings = store.load()?;
	settings.set(key, value);
	store.save(&settings)?;
	Ok(settings)
}

/// The commented settings file written by `notemix init`, listing every
/// setting at its default value.
pub fn default_settings_file() -> String {
	let settings = Settings::default();
	let mut content = String::from("# notemix settings\n");

	for key in SettingKey::ALL {
		let value = toml::Value::String(settings.get(key).to_string());
		content.push_str(&format!(
			"\n# {}: {}\n{key} = {value}\n",
			key.label(),
			key.description()
		));
	}

	content
}
