use crate::AttributeRole;
use crate::Diagnostic;
use crate::DiagnosticKind;
use crate::ExpansionOptions;
use crate::PubInitConfig;
use crate::PubInitResult;
use crate::SynthesizedInitializer;
use crate::TypeDeclaration;
use crate::UnresolvedPolicy;
use crate::classifier::stored_fields;
use crate::parser::parse;
use crate::resolver::resolve;
use crate::validator::validate;

/// The outcome of expanding one declaration: either one initializer and no
/// diagnostics, or no initializer and at least one diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
	pub initializers: Vec<SynthesizedInitializer>,
	pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
	/// Returns true if an initializer was produced.
	pub fn is_ok(&self) -> bool {
		self.diagnostics.is_empty()
	}

	fn rejected(diagnostics: Vec<Diagnostic>) -> Self {
		Self {
			initializers: vec![],
			diagnostics,
		}
	}
}

/// Synthesize a public initializer for `declaration`.
///
/// This is a pure function of its input: the declaration is not modified and
/// nothing is kept between calls.
pub fn expand(declaration: &TypeDeclaration, options: &ExpansionOptions) -> Expansion {
	if let Err(kind) = validate(declaration) {
		tracing::debug!(declaration = %declaration.name, ?kind, "declaration rejected");
		return Expansion::rejected(vec![Diagnostic::declaration(
			kind,
			&declaration.name,
			declaration.position,
		)]);
	}

	let fields = stored_fields(&declaration.members, &options.registry);
	let mut resolved = Vec::with_capacity(fields.len());
	let mut diagnostics = vec![];

	for field in &fields {
		match resolve(field, &options.registry) {
			Some(descriptor) => resolved.push(descriptor),
			None if options.unresolved == UnresolvedPolicy::Omit => {
				tracing::debug!(member = field.name, "omitting field without a resolvable type");
			}
			None => {
				diagnostics.push(Diagnostic::member(
					DiagnosticKind::UnresolvedType,
					&declaration.name,
					field.name,
					field.position,
				));
			}
		}
	}

	if !diagnostics.is_empty() {
		tracing::debug!(
			declaration = %declaration.name,
			unresolved = diagnostics.len(),
			"declaration rejected"
		);
		return Expansion::rejected(diagnostics);
	}

	tracing::debug!(
		declaration = %declaration.name,
		parameters = resolved.len(),
		"synthesized initializer"
	);

	Expansion {
		initializers: vec![SynthesizedInitializer::new(resolved)],
		diagnostics,
	}
}

/// Result of expanding every marked declaration in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExpansion {
	/// The source with markers removed and initializers inserted.
	pub output: String,
	/// Diagnostics from every marked declaration, in source order.
	pub diagnostics: Vec<Diagnostic>,
	/// Number of declarations that received an initializer.
	pub expanded_count: usize,
	/// Number of declarations that carried the expand marker.
	pub marked_count: usize,
}

impl SourceExpansion {
	pub fn is_ok(&self) -> bool {
		self.diagnostics.is_empty()
	}

	pub fn has_changes(&self) -> bool {
		self.marked_count > 0
	}
}

/// A pending change to the source text.
#[derive(Debug)]
enum Edit {
	Remove { start: usize, end: usize },
	Replace { start: usize, end: usize, text: String },
}

impl Edit {
	fn offset(&self) -> usize {
		match self {
			Self::Remove { start, .. } | Self::Replace { start, .. } => *start,
		}
	}
}

/// Expand every declaration in `source` that carries the expand marker.
///
/// The marker attribute is removed and each synthesized initializer is
/// inserted before the closing brace of its declaration, indented like the
/// existing members. Rejected declarations keep their body unchanged.
pub fn expand_source(source: &str, config: &PubInitConfig) -> PubInitResult<SourceExpansion> {
	let file = parse(source)?;
	let options = config.expansion_options();

	let mut edits = vec![];
	let mut diagnostics = vec![];
	let mut expanded_count = 0;
	let mut marked_count = 0;

	for declaration in file.walk() {
		let Some(marker) = options
			.registry
			.find(&declaration.attributes, AttributeRole::Expand)
		else {
			continue;
		};

		marked_count += 1;
		let (start, end) = attribute_removal_range(source, marker.position.range());
		edits.push(Edit::Remove { start, end });

		let expansion = expand(declaration, &options);
		diagnostics.extend(expansion.diagnostics);

		for initializer in expansion.initializers {
			expanded_count += 1;
			edits.push(insertion(source, declaration, &initializer, &options.indent));
		}
	}

	// Apply from the end so earlier offsets stay valid.
	edits.sort_by_key(|edit| std::cmp::Reverse(edit.offset()));

	let mut output = source.to_string();
	for edit in edits {
		match edit {
			Edit::Remove { start, end } => output.replace_range(start..end, ""),
			Edit::Replace { start, end, text } => output.replace_range(start..end, &text),
		}
	}

	diagnostics.sort_by_key(|diagnostic| diagnostic.position.start.offset);

	Ok(SourceExpansion {
		output,
		diagnostics,
		expanded_count,
		marked_count,
	})
}

/// The range to delete for an attribute. An attribute alone on its line
/// takes the whole line with it; otherwise trailing spaces go too.
fn attribute_removal_range(source: &str, range: std::ops::Range<usize>) -> (usize, usize) {
	let line_start = line_start(source, range.start);
	let rest = &source[range.end..];
	let line_rest_len = rest.find('\n').unwrap_or(rest.len());
	let before_is_blank = source[line_start..range.start].trim().is_empty();
	let after_is_blank = rest[..line_rest_len].trim().is_empty();

	if before_is_blank && after_is_blank {
		let end = (range.end + line_rest_len + 1).min(source.len());
		return (line_start, end);
	}

	let trailing = rest.len() - rest.trim_start_matches([' ', '\t']).len();
	(range.start, range.end + trailing)
}

fn line_start(source: &str, offset: usize) -> usize {
	source[..offset].rfind('\n').map_or(0, |index| index + 1)
}

/// The leading whitespace of the line containing `offset`.
fn indentation_at(source: &str, offset: usize) -> &str {
	let start = line_start(source, offset);
	let line = &source[start..];
	let width = line.len() - line.trim_start_matches([' ', '\t']).len();
	&line[..width]
}

fn insertion(
	source: &str,
	declaration: &TypeDeclaration,
	initializer: &SynthesizedInitializer,
	indent: &str,
) -> Edit {
	// Members sharing a line with the opening brace say nothing about the
	// indentation of the body.
	let member_indent = declaration
		.members
		.first()
		.map(|member| member.position.start.offset)
		.filter(|offset| line_start(source, *offset) > declaration.body_start)
		.map_or_else(
			|| format!("{}{indent}", indentation_at(source, declaration.position.start.offset)),
			|offset| indentation_at(source, offset).to_string(),
		);

	let rendered = initializer
		.render(indent)
		.lines()
		.map(|line| {
			if line.is_empty() {
				String::new()
			} else {
				format!("{member_indent}{line}")
			}
		})
		.collect::<Vec<_>>()
		.join("\n");

	let close = declaration.body_end;
	let close_line = line_start(source, close);
	let brace_starts_line = source[close_line..close].trim().is_empty();
	let body_is_empty = source[declaration.body_start + 1..close].trim().is_empty();
	let separator = if body_is_empty { "" } else { "\n" };

	if brace_starts_line && close_line > declaration.body_start {
		Edit::Replace {
			start: close_line,
			end: close_line,
			text: format!("{separator}{rendered}\n"),
		}
	} else {
		// The closing brace moves to its own line, so spaces before it go.
		let start = source[..close].trim_end_matches([' ', '\t']).len();
		let closing_indent = indentation_at(source, declaration.position.start.offset);
		Edit::Replace {
			start,
			end: close,
			text: format!("\n{separator}{rendered}\n{closing_indent}"),
		}
	}
}
