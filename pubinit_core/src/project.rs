use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;

use crate::AttributeRole;
use crate::Diagnostic;
use crate::PubInitConfig;
use crate::PubInitError;
use crate::PubInitResult;
use crate::SourceExpansion;
use crate::engine::expand_source;

/// One scanned file that carries at least one expand marker.
#[derive(Debug, Clone)]
pub struct FileExpansion {
	pub path: PathBuf,
	/// The path relative to the scanned root.
	pub relative_path: PathBuf,
	/// The source with line endings normalized to LF.
	pub original: String,
	pub expansion: SourceExpansion,
}

impl FileExpansion {
	pub fn is_ok(&self) -> bool {
		self.expansion.is_ok()
	}
}

/// A file that could not be expanded at all.
#[derive(Debug)]
pub struct FileFailure {
	pub path: PathBuf,
	pub error: PubInitError,
}

/// The result of expanding every annotated file under a project root.
#[derive(Debug, Default)]
pub struct ProjectExpansion {
	/// Expanded files in path order.
	pub files: Vec<FileExpansion>,
	/// Files that were skipped because of an error.
	pub failures: Vec<FileFailure>,
}

impl ProjectExpansion {
	/// Returns true when no file failed and no declaration was rejected.
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty() && self.files.iter().all(FileExpansion::is_ok)
	}

	/// Every diagnostic paired with the file it was reported in.
	pub fn diagnostics(&self) -> impl Iterator<Item = (&FileExpansion, &Diagnostic)> {
		self.files
			.iter()
			.flat_map(|file| file.expansion.diagnostics.iter().map(move |diagnostic| (file, diagnostic)))
	}

	pub fn expanded_count(&self) -> usize {
		self.files.iter().map(|file| file.expansion.expanded_count).sum()
	}

	/// Number of declarations that could not be expanded plus failed files.
	pub fn problem_count(&self) -> usize {
		self.diagnostics().count() + self.failures.len()
	}
}

/// Expand every annotated source file under `root`.
///
/// Files are filtered by extension, `.gitignore` (unless disabled) and the
/// `[scan] exclude` globs. Files that never mention an expand marker are
/// skipped without parsing. Read and parse failures are collected per file
/// so one broken file does not stop the scan.
pub fn scan_project(root: &Path, config: &PubInitConfig) -> PubInitResult<ProjectExpansion> {
	let exclude = build_exclude_set(&config.scan.exclude)?;
	let markers: Vec<String> = config
		.registry()
		.names_for(AttributeRole::Expand)
		.map(|name| format!("@{name}"))
		.collect();

	let mut project = ProjectExpansion::default();

	for path in collect_files(root, config, &exclude) {
		match expand_file(root, &path, config, &markers) {
			Ok(Some(file)) => project.files.push(file),
			Ok(None) => {}
			Err(error) => {
				tracing::warn!(path = %path.display(), %error, "skipping file");
				project.failures.push(FileFailure { path, error });
			}
		}
	}

	tracing::debug!(
		files = project.files.len(),
		failures = project.failures.len(),
		"scanned project"
	);

	Ok(project)
}

fn expand_file(
	root: &Path,
	path: &Path,
	config: &PubInitConfig,
	markers: &[String],
) -> PubInitResult<Option<FileExpansion>> {
	let size = std::fs::metadata(path)?.len();
	if size > config.scan.max_file_size {
		return Err(PubInitError::FileTooLarge {
			path: path.display().to_string(),
			size,
			limit: config.scan.max_file_size,
		});
	}

	let original = normalize_line_endings(&std::fs::read_to_string(path)?);
	if !markers.iter().any(|marker| original.contains(marker.as_str())) {
		return Ok(None);
	}

	let expansion = expand_source(&original, config)?;
	if !expansion.has_changes() {
		return Ok(None);
	}

	let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
	tracing::debug!(
		path = %relative_path.display(),
		expanded = expansion.expanded_count,
		diagnostics = expansion.diagnostics.len(),
		"expanded file"
	);

	Ok(Some(FileExpansion {
		path: path.to_path_buf(),
		relative_path,
		original,
		expansion,
	}))
}

/// Build a `GlobSet` from the `[scan] exclude` patterns. Patterns are matched
/// against paths relative to the project root.
fn build_exclude_set(patterns: &[String]) -> PubInitResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			PubInitError::InvalidPattern {
				pattern: pattern.clone(),
				reason: e.kind().to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| {
		PubInitError::InvalidPattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Collect candidate files in sorted order.
fn collect_files(root: &Path, config: &PubInitConfig, exclude: &GlobSet) -> Vec<PathBuf> {
	let respect_gitignore = !config.scan.disable_gitignore;
	let walker = WalkBuilder::new(root)
		.git_ignore(respect_gitignore)
		.git_exclude(respect_gitignore)
		.git_global(false)
		.require_git(false)
		.build();

	let mut files: Vec<PathBuf> = walker
		.filter_map(Result::ok)
		.filter(|entry| entry.file_type().is_some_and(|kind| kind.is_file()))
		.map(ignore::DirEntry::into_path)
		.filter(|path| has_scanned_extension(path, &config.scan.extensions))
		.filter(|path| {
			let relative = path.strip_prefix(root).unwrap_or(path);
			!exclude.is_match(relative)
		})
		.collect();

	files.sort();
	files
}

fn has_scanned_extension(path: &Path, extensions: &[String]) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| extensions.iter().any(|allowed| allowed.trim_start_matches('.') == ext))
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}

/// Write the expanded text of every file that received an initializer under
/// `out_dir`, mirroring the paths relative to the scanned root. Returns the
/// written paths.
pub fn write_expansions(project: &ProjectExpansion, out_dir: &Path) -> PubInitResult<Vec<PathBuf>> {
	let mut written = vec![];

	for file in &project.files {
		if file.expansion.expanded_count == 0 {
			continue;
		}

		let target = out_dir.join(&file.relative_path);
		if let Some(parent) = target.parent() {
			std::fs::create_dir_all(parent)?;
		}

		std::fs::write(&target, &file.expansion.output)?;
		tracing::debug!(path = %target.display(), "wrote expansion");
		written.push(target);
	}

	Ok(written)
}
