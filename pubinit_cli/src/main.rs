use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use pubinit_cli::Commands;
use pubinit_cli::OutputFormat;
use pubinit_cli::PubInitCli;
use pubinit_core::CONFIG_FILE_CANDIDATES;
use pubinit_core::Diagnostic;
use pubinit_core::PubInitConfig;
use pubinit_core::PubInitError;
use pubinit_core::expand_source;
use pubinit_core::project::ProjectExpansion;
use pubinit_core::project::normalize_line_endings;
use pubinit_core::project::scan_project;
use pubinit_core::project::write_expansions;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

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

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
	let args = PubInitCli::parse();

	// Respect NO_COLOR, --no-color and terminals without color support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

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
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Expand { file, diff }) => run_expand(&args, file, *diff),
		Some(Commands::Check { format }) => run_check(&args, *format),
		Some(Commands::Generate { out_dir }) => run_generate(&args, out_dir),
		None => {
			eprintln!("No subcommand specified. Run `pubinit --help` for usage.");
			process::exit(2);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			// Render through miette for error codes and help text.
			match e.downcast::<PubInitError>() {
				Ok(error) => {
					let report: miette::Report = (*error).into();
					eprintln!("{report:?}");
				}
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool, use_color: bool) {
	let directive = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_ansi(use_color)
		.with_writer(std::io::stderr)
		.with_target(false)
		.compact()
		.try_init();
}

fn resolve_root(args: &PubInitCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> CliResult<PubInitConfig> {
	Ok(PubInitConfig::load_or_default(root)?)
}

fn run_init(args: &PubInitCli) -> CliResult<bool> {
	let root = resolve_root(args);

	if let Some(existing) = PubInitConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(true);
	}

	let sample_config = "# pubinit configuration\n\n# Extra attribute names, added to the \
	                     built-in @PublicInit,\n# @PublicInitIgnored and @PublicInitEscaping.\n# \
	                     [attributes]\n# expand = [\"MemberwiseInit\"]\n# exclude = \
	                     [\"InitIgnored\"]\n# escaping = [\"InitEscaping\"]\n\n[format]\n# Number \
	                     of spaces, or a literal string such as \"\\t\".\nindent = 4\n\n[resolution]\n# \
	                     \"error\" reports fields without a resolvable type, \"omit\" leaves them \
	                     out.\nunresolved = \"error\"\n\n[scan]\nextensions = [\"swift\"]\n# exclude \
	                     = [\"Generated/**\"]\n";

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Mark a public struct or class with @PublicInit");
	println!("  2. Run `pubinit check` to find declarations that cannot be expanded");
	println!("  3. Run `pubinit expand <FILE>` to see the generated initializer");

	Ok(true)
}

fn run_expand(args: &PubInitCli, file: &Path, show_diff: bool) -> CliResult<bool> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let source = normalize_line_endings(&std::fs::read_to_string(file)?);
	let expansion = expand_source(&source, &config)?;

	tracing::debug!(
		path = %file.display(),
		expanded = expansion.expanded_count,
		"expanded file"
	);

	if show_diff {
		print_diff(&source, &expansion.output);
	} else {
		print!("{}", expansion.output);
	}

	let name = file.display().to_string();
	for diagnostic in &expansion.diagnostics {
		print_diagnostic(diagnostic, &name, &source);
	}

	Ok(expansion.is_ok())
}

fn run_check(args: &PubInitCli, format: OutputFormat) -> CliResult<bool> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let project = scan_project(&root, &config)?;

	match format {
		OutputFormat::Json => print_check_json(&project, &root)?,
		OutputFormat::Github => {
			for (file, diagnostic) in project.diagnostics() {
				println!(
					"::error file={},line={},col={}::{}",
					file.relative_path.display(),
					diagnostic.position.start.line,
					diagnostic.position.start.column,
					diagnostic.message()
				);
			}
			for failure in &project.failures {
				println!(
					"::error file={}::{}",
					make_relative(&failure.path, &root),
					failure.error
				);
			}
			eprintln!("{}", check_summary(&project));
		}
		OutputFormat::Text => {
			for (file, diagnostic) in project.diagnostics() {
				print_diagnostic(
					diagnostic,
					&file.relative_path.display().to_string(),
					&file.original,
				);
			}
			for failure in &project.failures {
				eprintln!(
					"{} {}: {}",
					colored!("error:", red),
					make_relative(&failure.path, &root),
					failure.error
				);
			}

			if project.is_ok() {
				println!("{}", colored!(check_summary(&project), green));
			} else {
				eprintln!("{}", colored!(check_summary(&project), bold));
			}
		}
	}

	Ok(project.is_ok())
}

fn print_check_json(project: &ProjectExpansion, root: &Path) -> CliResult<()> {
	let diagnostics: Vec<serde_json::Value> = project
		.diagnostics()
		.map(|(file, diagnostic)| {
			serde_json::json!({
				"file": file.relative_path,
				"line": diagnostic.position.start.line,
				"column": diagnostic.position.start.column,
				"kind": diagnostic.kind,
				"code": diagnostic.kind.code(),
				"target": diagnostic.target,
				"message": diagnostic.message(),
			})
		})
		.collect();
	let failures: Vec<serde_json::Value> = project
		.failures
		.iter()
		.map(|failure| {
			serde_json::json!({
				"file": make_relative(&failure.path, root),
				"message": failure.error.to_string(),
			})
		})
		.collect();

	let output = serde_json::json!({
		"ok": project.is_ok(),
		"expanded": project.expanded_count(),
		"diagnostics": diagnostics,
		"failures": failures,
	});
	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

fn check_summary(project: &ProjectExpansion) -> String {
	if project.is_ok() {
		return format!(
			"Check passed: {} declaration(s) can be expanded.",
			project.expanded_count()
		);
	}

	let mut parts = vec![];
	let rejected = project.diagnostics().count();
	if rejected > 0 {
		parts.push(format!("{rejected} diagnostic(s)"));
	}
	if !project.failures.is_empty() {
		parts.push(format!("{} file(s) could not be processed", project.failures.len()));
	}

	format!("Check failed: {}.", parts.join(" and "))
}

fn run_generate(args: &PubInitCli, out_dir: &Path) -> CliResult<bool> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	let project = scan_project(&root, &config)?;
	let written = write_expansions(&project, out_dir)?;

	for path in &written {
		println!("  wrote {}", path.display());
	}
	println!("Generated {} file(s).", written.len());

	if project.is_ok() {
		return Ok(true);
	}

	for (file, diagnostic) in project.diagnostics() {
		print_diagnostic(
			diagnostic,
			&file.relative_path.display().to_string(),
			&file.original,
		);
	}
	for failure in &project.failures {
		eprintln!(
			"{} {}: {}",
			colored!("error:", red),
			make_relative(&failure.path, &root),
			failure.error
		);
	}

	let report: miette::Report = PubInitError::ExpansionFailed {
		count: project.problem_count(),
	}
	.into();
	eprintln!("{report:?}");

	Ok(false)
}

/// Render a diagnostic with its source snippet on stderr.
fn print_diagnostic(diagnostic: &Diagnostic, file_name: &str, source: &str) {
	let report = miette::Report::new(diagnostic.to_report(file_name, source));
	eprintln!("{report:?}");
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("{}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("{}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!(" {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
