use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::AttributeRegistry;
use crate::AttributeRole;
use crate::PubInitError;
use crate::PubInitResult;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["pubinit.toml", ".pubinit.toml", ".config/pubinit.toml"];

/// Configuration loaded from a `pubinit.toml` file.
///
/// ```toml
/// [attributes]
/// expand = ["MemberwiseInit"]
/// exclude = ["InitIgnored"]
/// escaping = ["InitEscaping"]
///
/// [format]
/// indent = 4
///
/// [resolution]
/// unresolved = "omit"
///
/// [scan]
/// extensions = ["swift"]
/// exclude = ["Generated/**"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PubInitConfig {
	/// Extra attribute spellings, added to the built-in ones.
	#[serde(default)]
	pub attributes: AttributesConfig,
	/// Layout of the generated code.
	#[serde(default)]
	pub format: FormatConfig,
	/// How fields without a resolvable type are handled.
	#[serde(default)]
	pub resolution: ResolutionConfig,
	/// Which files a project scan considers.
	#[serde(default)]
	pub scan: ScanConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributesConfig {
	#[serde(default)]
	pub expand: Vec<String>,
	#[serde(default)]
	pub exclude: Vec<String>,
	#[serde(default)]
	pub escaping: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatConfig {
	#[serde(default)]
	pub indent: IndentValue,
}

/// The indent unit for generated code.
///
/// - `4` - four spaces.
/// - `"\t"` - a literal string, used as is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum IndentValue {
	Spaces(u32),
	Literal(String),
}

impl IndentValue {
	pub fn unit(&self) -> String {
		match self {
			Self::Spaces(count) => " ".repeat(*count as usize),
			Self::Literal(text) => text.clone(),
		}
	}
}

impl Default for IndentValue {
	fn default() -> Self {
		Self::Spaces(4)
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolutionConfig {
	#[serde(default)]
	pub unresolved: UnresolvedPolicy,
}

/// What to do with a stored field whose parameter type cannot be worked out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
	/// Report an `UnresolvedType` diagnostic and emit no initializer.
	#[default]
	Error,
	/// Leave the field out of the initializer without reporting it.
	Omit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
	/// File extensions (without the dot) that are scanned.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
	/// Gitignore-style glob patterns, relative to the project root.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// Files larger than this are skipped with an error. Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for ScanConfig {
	fn default() -> Self {
		Self {
			extensions: default_extensions(),
			exclude: vec![],
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
		}
	}
}

fn default_extensions() -> Vec<String> {
	vec!["swift".to_string()]
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

/// Everything the engine needs to expand a single declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionOptions {
	pub registry: AttributeRegistry,
	pub unresolved: UnresolvedPolicy,
	/// Indent unit used when rendering the initializer.
	pub indent: String,
}

impl Default for ExpansionOptions {
	fn default() -> Self {
		PubInitConfig::default().expansion_options()
	}
}

impl PubInitConfig {
	/// Return the first config file that exists under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from `root`. Returns `Ok(None)` when no config file
	/// exists.
	pub fn load(root: &Path) -> PubInitResult<Option<PubInitConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Load the config from `root`, falling back to defaults.
	pub fn load_or_default(root: &Path) -> PubInitResult<PubInitConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	pub fn from_toml(content: &str) -> PubInitResult<PubInitConfig> {
		toml::from_str(content).map_err(|e| PubInitError::ConfigParse(e.to_string()))
	}

	/// The built-in attributes plus every configured alias.
	pub fn registry(&self) -> AttributeRegistry {
		let mut registry = AttributeRegistry::default();
		let aliases = [
			(&self.attributes.expand, AttributeRole::Expand),
			(&self.attributes.exclude, AttributeRole::Exclude),
			(&self.attributes.escaping, AttributeRole::Escaping),
		];

		for (names, role) in aliases {
			for name in names {
				registry.register(name, role);
			}
		}

		registry
	}

	pub fn expansion_options(&self) -> ExpansionOptions {
		ExpansionOptions {
			registry: self.registry(),
			unresolved: self.resolution.unresolved,
			indent: self.format.indent.unit(),
		}
	}
}
