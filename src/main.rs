use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pairrule::config::{Settings, default_settings_path, load_settings};

#[derive(Parser)]
#[command(name = "pairrule")]
#[command(
	author,
	version,
	about = "Pick the rule that applies to a freshly recorded audio/text pair"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// Settings file (defaults to setting.toml in the user config directory)
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Report every rule considered and why it was rejected
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Find the rule that applies to an audio file and its paired .txt
	Find {
		/// Path of the audio file
		audio: PathBuf,

		/// Also print the paired text decoded in the rule's encoding
		#[arg(long)]
		text: bool,
	},
	/// List the directories referenced by rules, one per line
	Dirs,
	/// Settings management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the loaded settings and every compiled rule
	Show,
	/// Check the settings file for errors without matching anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_tracing(verbose: bool) {
	let default_level = if verbose { "info" } else { "warn" };
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
		)
		.with_writer(std::io::stderr)
		.without_time()
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	let settings_path = match cli.config {
		Some(path) => path,
		None => default_settings_path().context("Failed to locate settings file")?,
	};

	match cli.command {
		Commands::Find { audio, text } => handle_find(&settings_path, &audio, text, cli.verbose),
		Commands::Dirs => handle_dirs(&settings_path),
		Commands::Config { action } => match action {
			ConfigAction::Show => handle_config_show(&settings_path),
			ConfigAction::Validate => Ok(handle_config_validate(&settings_path)),
		},
	}
}

fn load(settings_path: &Path) -> Result<Settings> {
	load_settings(settings_path)
		.with_context(|| format!("Failed to load settings: {}", settings_path.display()))
}

fn handle_find(
	settings_path: &Path,
	audio: &Path,
	show_text: bool,
	verbose: bool,
) -> Result<ExitCode> {
	let settings = load(settings_path)?;

	let found = settings
		.find(audio, verbose)
		.with_context(|| format!("Failed to match {}", audio.display()))?;

	let Some(found) = found else {
		println!("No matching rule.");
		return Ok(ExitCode::SUCCESS);
	};

	println!("rule: {}", found.index + 1);
	println!("file: {}", found.file());
	println!("encoding: {}", found.encoding());
	println!("layer: {}", found.layer());
	for (key, value) in &found.rule.extra {
		println!("{key}: {value}");
	}
	if show_text {
		println!("text:");
		println!("{}", found.text());
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_dirs(settings_path: &Path) -> Result<ExitCode> {
	let settings = load(settings_path)?;
	for dir in settings.dirs() {
		println!("{dir}");
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(settings_path: &Path) -> Result<ExitCode> {
	let settings = load(settings_path)?;

	println!("# Source: {}", settings_path.display());
	println!("# basedir: {}", settings.base_dir);
	println!("# delta: {}", settings.delta);
	println!("# freshness: {}", settings.freshness);
	println!("# rules: {}", settings.rules.len());
	println!();

	for (i, rule) in settings.rules.iter().enumerate() {
		println!("  Rule {}:", i + 1);
		println!("    dir: {}", rule.dir);
		println!("    file: {}", rule.file);
		if let Some(ref text) = rule.text_regex {
			println!("    text: {}", text);
		}
		println!("    encoding: {}", rule.encoding);
		println!("    layer: {}", rule.layer);
		for (key, value) in &rule.extra {
			println!("    {key}: {value}");
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(settings_path: &Path) -> ExitCode {
	match load_settings(settings_path) {
		Ok(settings) => {
			println!(
				"Settings are valid: {} ({} rules)",
				settings_path.display(),
				settings.rules.len()
			);
			ExitCode::SUCCESS
		}
		Err(e) => {
			eprintln!("Settings error: {}", e);
			ExitCode::FAILURE
		}
	}
}
