use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Synthesize public memberwise initializers for Swift structs and classes.",
	long_about = "pubinit expands `@PublicInit` on public Swift structs and classes into a \
	              `public init` that assigns every stored property.\n\nSwift only generates an \
	              internal memberwise initializer, so public types used from other modules need \
	              one written by hand. pubinit writes it for you.\n\nQuick start:\n  pubinit init    \
	                      Create a pubinit.toml\n  pubinit expand FILE     Print the expanded \
	              file\n  pubinit check           Report declarations that cannot be \
	              expanded\n  pubinit generate -o DIR Write expanded copies of annotated files"
)]
pub struct PubInitCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. Configuration is read from here.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output. Raises the log level to `debug` unless
	/// `RUST_LOG` is set.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `pubinit.toml` in the project root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Expand a single file and print the result.
	///
	/// Every declaration marked with the expand attribute receives a
	/// `public init` before its closing brace and loses the marker. Rejected
	/// declarations are reported on stderr and the command exits with status
	/// 1.
	Expand {
		/// The Swift file to expand.
		file: PathBuf,

		/// Print a unified diff against the input instead of the expanded
		/// source.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Check that every annotated declaration in the project can be
	/// expanded.
	///
	/// Scans the project for files that use the expand attribute and reports
	/// every declaration that would be rejected, along with files that could
	/// not be read or parsed. Exits with a non-zero status code when anything
	/// is reported. Ideal for CI pipelines.
	Check {
		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations that appear inline on PRs.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Write expanded copies of every annotated file.
	///
	/// Output paths mirror the paths relative to the project root. Source
	/// files are never modified.
	Generate {
		/// Directory that receives the expanded files.
		#[arg(long, short)]
		out_dir: PathBuf,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each entry includes the
	/// file path, position, kind and message.
	Json,
	/// GitHub Actions annotation format. Emits `::error` annotations that
	/// appear inline on pull request diffs.
	Github,
}
