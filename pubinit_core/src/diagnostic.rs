use std::fmt::Display;

use miette::NamedSource;
use miette::SourceSpan;
use serde::Serialize;
use thiserror::Error;

use crate::Position;

/// Why a declaration could not be expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
	/// The declaration is not `public`.
	NotPublic,
	/// The declaration is not a `struct` or `class`.
	NotAggregateKind,
	/// A stored field has neither a type annotation nor an initializer whose
	/// type can be read off the literal.
	UnresolvedType,
}

impl DiagnosticKind {
	/// Stable error code, matching the `pubinit::` namespace used by
	/// [`PubInitError`](crate::PubInitError).
	pub fn code(self) -> &'static str {
		match self {
			Self::NotPublic => "pubinit::not_public",
			Self::NotAggregateKind => "pubinit::not_aggregate_kind",
			Self::UnresolvedType => "pubinit::unresolved_type",
		}
	}

	pub fn help(self) -> &'static str {
		match self {
			Self::NotPublic => "add the `public` modifier to the declaration",
			Self::NotAggregateKind => "attach the attribute to a struct or class instead",
			Self::UnresolvedType => "add an explicit type annotation, e.g. `name: Type`",
		}
	}
}

/// Diagnostics are always errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	#[default]
	Error,
}

/// What a diagnostic points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiagnosticTarget {
	/// The whole type declaration, attributes included.
	Declaration { name: String },
	/// A single member of the declaration.
	Member { declaration: String, name: String },
}

/// A structured report explaining why no initializer was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
	pub kind: DiagnosticKind,
	pub severity: Severity,
	pub target: DiagnosticTarget,
	pub position: Position,
}

impl Diagnostic {
	pub fn declaration(kind: DiagnosticKind, name: impl Into<String>, position: Position) -> Self {
		Self {
			kind,
			severity: Severity::Error,
			target: DiagnosticTarget::Declaration { name: name.into() },
			position,
		}
	}

	pub fn member(
		kind: DiagnosticKind,
		declaration: impl Into<String>,
		name: impl Into<String>,
		position: Position,
	) -> Self {
		Self {
			kind,
			severity: Severity::Error,
			target: DiagnosticTarget::Member {
				declaration: declaration.into(),
				name: name.into(),
			},
			position,
		}
	}

	pub fn message(&self) -> String {
		match (&self.kind, &self.target) {
			(DiagnosticKind::NotPublic, _) => {
				"PublicInit can only be applied to public declarations".to_string()
			}
			(DiagnosticKind::NotAggregateKind, _) => {
				"PublicInit can only be applied to a struct or class".to_string()
			}
			(DiagnosticKind::UnresolvedType, DiagnosticTarget::Member { name, .. }) => {
				format!("cannot infer a parameter type for `{name}`")
			}
			(DiagnosticKind::UnresolvedType, DiagnosticTarget::Declaration { name }) => {
				format!("cannot infer a parameter type for a member of `{name}`")
			}
		}
	}

	/// Attach the source text so the diagnostic renders with a labelled
	/// snippet.
	pub fn to_report(&self, file_name: impl AsRef<str>, source: impl Into<String>) -> DiagnosticReport {
		let label = match &self.target {
			DiagnosticTarget::Declaration { name } => format!("`{name}` declared here"),
			DiagnosticTarget::Member { name, .. } => format!("`{name}` declared here"),
		};

		DiagnosticReport {
			message: self.message(),
			code: self.kind.code(),
			help: self.kind.help(),
			label,
			src: NamedSource::new(file_name, source.into()),
			span: self.position.into(),
		}
	}
}

impl Display for Diagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.position.start, self.message())
	}
}

/// A [`Diagnostic`] paired with its source, ready for `miette` rendering.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DiagnosticReport {
	message: String,
	code: &'static str,
	help: &'static str,
	label: String,
	src: NamedSource<String>,
	span: SourceSpan,
}

impl miette::Diagnostic for DiagnosticReport {
	fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
		Some(Box::new(self.code))
	}

	fn severity(&self) -> Option<miette::Severity> {
		Some(miette::Severity::Error)
	}

	fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
		Some(Box::new(self.help))
	}

	fn source_code(&self) -> Option<&dyn miette::SourceCode> {
		Some(&self.src)
	}

	fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
		Some(Box::new(std::iter::once(miette::LabeledSpan::new_with_span(
			Some(self.label.clone()),
			self.span,
		))))
	}
}
