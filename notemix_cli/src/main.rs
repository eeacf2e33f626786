use std::path::PathBuf;
use std::process;

use clap::Parser;
use notemix_cli::Commands;
use notemix_cli::ConfigCommand;
use notemix_cli::MixArgs;
use notemix_cli::NotemixCli;
use notemix_cli::OutputFormat;
use notemix_core::AggregationRequest;
use notemix_core::AnyEmptyResult;
use notemix_core::Clock;
use notemix_core::ContentStore;
use notemix_core::FsStore;
use notemix_core::Notifier;
use notemix_core::ROOT_PATH;
use notemix_core::SettingKey;
use notemix_core::SettingsStore;
use notemix_core::SilentNotifier;
use notemix_core::SystemClock;
use notemix_core::TomlSettingsStore;
use notemix_core::aggregate;
use notemix_core::collect_documents;
use notemix_core::default_settings_file;
use notemix_core::plan_aggregation;
use notemix_core::update_setting;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "NOTEMIX_LOG";
const VERBOSE_FILTER: &str = "warn,notemix=debug,notemix_core=debug";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = NotemixCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminals without color.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Mix(mix)) => run_mix(&args, mix),
		Some(Commands::Folders { query }) => run_folders(&args, query.as_deref()),
		Some(Commands::Config { command }) => run_config(&args, command),
		Some(Commands::Init) => run_init(&args),
		None => {
			eprintln!("No subcommand specified. Run `notemix --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<notemix_core::NotemixError>() {
			Ok(notemix_err) => {
				let report: miette::Report = (*notemix_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new(VERBOSE_FILTER)
	} else {
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &NotemixCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// `.` selects the vault root.
fn folder_path(folder: &str) -> &str {
	if folder == "." { ROOT_PATH } else { folder }
}

/// Prints notifications as plain status lines.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
	fn notify(&self, message: &str) {
		println!("{message}");
	}
}

#[derive(Serialize)]
struct DryRunOutput<'a> {
	dry_run: bool,
	folder: &'a str,
	destination: &'a str,
	documents: Vec<&'a str>,
	bytes: usize,
}

fn run_mix(args: &NotemixCli, mix: &MixArgs) -> AnyEmptyResult {
	let root = resolve_root(args);
	tracing::debug!(root = %root.display(), folder = %mix.folder, "mixing");

	let mut settings = TomlSettingsStore::discover(&root).load()?;
	if let Some(exclude) = &mix.exclude {
		settings.exclude_glob.clone_from(exclude);
	}
	if let Some(template) = &mix.template {
		settings.file_name_template.clone_from(template);
	}
	if let Some(date_format) = &mix.date_format {
		settings.date_format.clone_from(date_format);
	}

	let mut store = FsStore::new(&root);
	let folder = store.folder(folder_path(&mix.folder))?;
	let mut request = AggregationRequest::from_settings(folder, &settings);
	if let Some(dest) = &mix.dest {
		request = request.with_destination(dest.clone());
	}

	if mix.dry_run {
		let plan = plan_aggregation(&store, &request, SystemClock.now())?;
		match mix.format {
			OutputFormat::Json => {
				let output = DryRunOutput {
					dry_run: true,
					folder: &request.folder.path,
					destination: &plan.destination,
					documents: plan
						.documents
						.iter()
						.map(|document| document.path.as_str())
						.collect(),
					bytes: plan.content.len(),
				};
				println!("{}", serde_json::to_string_pretty(&output)?);
			}
			OutputFormat::Text => {
				println!(
					"Would mix {} note(s) from {} into {}",
					plan.documents.len(),
					request.folder.path,
					colored!(plan.destination, bold)
				);
				for document in &plan.documents {
					println!("  {}", document.path);
				}
			}
		}
		return Ok(());
	}

	match mix.format {
		OutputFormat::Json => {
			let report = aggregate(&mut store, &request, &SystemClock, &SilentNotifier)?;
			println!("{}", serde_json::to_string_pretty(&report)?);
		}
		OutputFormat::Text => {
			let report = aggregate(&mut store, &request, &SystemClock, &ConsoleNotifier)?;
			println!(
				"{} {} note(s), {} bytes",
				colored!("Mixed", green),
				report.documents.len(),
				report.bytes_written
			);
		}
	}

	Ok(())
}

fn run_folders(args: &NotemixCli, query: Option<&str>) -> AnyEmptyResult {
	let store = FsStore::new(resolve_root(args));
	let root = store.root()?;
	let query = query.map(str::to_lowercase);

	for folder in root.folders() {
		if query
			.as_deref()
			.is_some_and(|query| !folder.path.to_lowercase().contains(query))
		{
			continue;
		}

		let notes = collect_documents(folder).len();
		println!("{:<40} {notes} note(s)", folder.path);
	}

	Ok(())
}

fn run_config(args: &NotemixCli, command: &ConfigCommand) -> AnyEmptyResult {
	let store = TomlSettingsStore::discover(&resolve_root(args));

	match command {
		ConfigCommand::Show => {
			let settings = store.load()?;
			let state = if store.exists() {
				""
			} else {
				" (not created yet)"
			};
			println!(
				"{} {}{state}",
				colored!("Settings file:", bold),
				store.path().display()
			);
			for key in SettingKey::ALL {
				println!("{:<22} {:?}", key.as_str(), settings.get(key));
			}
		}
		ConfigCommand::Get { key } => {
			let key: SettingKey = key.parse()?;
			println!("{}", store.load()?.get(key));
		}
		ConfigCommand::Set { key, value } => {
			let key: SettingKey = key.parse()?;
			update_setting(&store, key, value)?;
			println!("Updated {key} in {}", store.path().display());
		}
	}

	Ok(())
}

fn run_init(args: &NotemixCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = TomlSettingsStore::resolve_path(&root) {
		println!("Settings file already exists: {}", existing.display());
		return Ok(());
	}

	let path = TomlSettingsStore::discover(&root).path().to_path_buf();
	std::fs::write(&path, default_settings_file())?;
	println!("Created settings file: {}", path.display());
	println!();
	println!("Next steps:");
	println!("  1. Run `notemix folders` to find the folder to mix");
	println!("  2. Run `notemix mix <FOLDER>` to mix its notes");

	Ok(())
}
