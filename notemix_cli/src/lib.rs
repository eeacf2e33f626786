use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Mix every markdown note in a folder into a single document.",
	long_about = "notemix collects the markdown notes of a folder (and all of its subfolders), \
	              sorts them by name and writes them into one document, each note wrapped in \
	              `<!-- Start: name -->` and `<!-- End: name -->` markers.\n\nQuick start:\n  \
	              notemix init            Create a notemix.toml settings file\n  notemix folders   \
	              List the folders of the vault\n  notemix mix <FOLDER>    Mix the notes of a \
	              folder"
)]
pub struct NotemixCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the vault root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Mix the markdown notes of a folder into a single document.
	///
	/// Every `.md` note below the folder is collected, notes matching the
	/// exclusion pattern are dropped, and the rest are sorted by name and
	/// concatenated. Without `--dest` the document is named after the file
	/// name template and saved next to the folder, or below the default
	/// export path when one is configured.
	Mix(MixArgs),
	/// List the folders of the vault.
	Folders {
		/// Only show folders whose path contains this text (case-insensitive).
		query: Option<String>,
	},
	/// Show or change the stored settings.
	Config {
		#[command(subcommand)]
		command: ConfigCommand,
	},
	/// Create a `notemix.toml` settings file in the vault root.
	///
	/// The file lists every setting with its default value. If a settings
	/// file already exists this command leaves it untouched.
	Init,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
	/// Print every setting with its current value.
	Show,
	/// Print the value of one setting.
	Get {
		/// Setting name, e.g. `exclude_glob` or `date_format`.
		key: String,
	},
	/// Change one setting. The settings file is saved immediately.
	Set {
		/// Setting name, e.g. `exclude_glob` or `date_format`.
		key: String,
		/// New value. Pass an empty string to clear the setting.
		value: String,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

#[derive(Args)]
pub struct MixArgs {
	/// Vault path of the folder to mix. Use `.` or `/` for the vault root.
	pub folder: String,

	/// Destination document. An absolute path is written outside the vault;
	/// anything else is a vault path. `.md` is appended when missing.
	#[arg(long, short)]
	pub dest: Option<String>,

	/// Exclusion glob used for this run instead of the configured one.
	#[arg(long, short)]
	pub exclude: Option<String>,

	/// File name template used for this run instead of the configured one.
	#[arg(long, short)]
	pub template: Option<String>,

	/// Format of the `{date}` placeholder for this run.
	#[arg(long)]
	pub date_format: Option<String>,

	/// Show the destination and the notes that would be mixed without
	/// writing anything.
	#[arg(long, default_value_t = false)]
	pub dry_run: bool,

	/// Output format. Use `text` for human-readable output or `json` for
	/// programmatic consumption.
	#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,
}
