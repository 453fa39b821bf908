use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum PubInitError {
	#[error(transparent)]
	#[diagnostic(code(pubinit::io_error))]
	Io(#[from] std::io::Error),

	#[error("unbalanced `{delimiter}` at {line}:{column}")]
	#[diagnostic(
		code(pubinit::unbalanced_delimiter),
		help("every `(`, `[` and `{{` must be closed before the end of the file")
	)]
	UnbalancedDelimiter {
		delimiter: char,
		line: usize,
		column: usize,
	},

	#[error("expected a body for `{name}` at {line}:{column}")]
	#[diagnostic(
		code(pubinit::expected_body),
		help("type declarations must be followed by a `{{ ... }}` member block")
	)]
	ExpectedBody {
		name: String,
		line: usize,
		column: usize,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(pubinit::config_parse),
		help("check that pubinit.toml is valid TOML with [attributes], [format], [resolution] and/or [scan] sections")
	)]
	ConfigParse(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(code(pubinit::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(pubinit::file_too_large),
		help("increase `max_file_size` under [scan] in pubinit.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("{count} declaration(s) could not be expanded")]
	#[diagnostic(
		code(pubinit::expansion_failed),
		help("run `pubinit check` to see every diagnostic")
	)]
	ExpansionFailed { count: usize },
}

pub type PubInitResult<T> = Result<T, PubInitError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
