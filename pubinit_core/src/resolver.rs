use serde::Serialize;

use crate::AttributeRegistry;
use crate::AttributeRole;
use crate::classifier::StoredField;
use crate::lexer::tokenize;
use crate::tokens::TokenKind;

pub const BOOL_TYPE: &str = "Bool";
pub const INT_TYPE: &str = "Int";
pub const FLOAT_TYPE: &str = "Double";
pub const STRING_TYPE: &str = "String";
/// The literal used as the default for optional parameters.
pub const ABSENT_VALUE: &str = "nil";
/// The attribute that marks a closure parameter as captured.
pub const ESCAPING_PREFIX: &str = "@escaping";

/// A stored field with its parameter type and default worked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
	pub name: String,
	pub parameter_type: String,
	pub default_value: Option<String>,
}

/// The category of an initializer expression whose type can be read off its
/// spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralCategory {
	Boolean,
	Integer,
	Float,
	String,
	/// `Type(...)`: the callee names the type.
	Call(String),
}

impl LiteralCategory {
	pub fn type_name(&self) -> &str {
		match self {
			Self::Boolean => BOOL_TYPE,
			Self::Integer => INT_TYPE,
			Self::Float => FLOAT_TYPE,
			Self::String => STRING_TYPE,
			Self::Call(callee) => callee,
		}
	}
}

/// Work out the parameter type and default value for `field`. Returns `None`
/// when the field has neither an annotation nor an initializer with a
/// recognisable category.
pub fn resolve(field: &StoredField<'_>, registry: &AttributeRegistry) -> Option<FieldDescriptor> {
	let variable = field.variable;

	let (parameter_type, default_value) = if let Some(annotation) = &variable.annotation {
		let parameter_type = if registry.has_role(&variable.attributes, AttributeRole::Escaping) {
			format!("{ESCAPING_PREFIX} {annotation}")
		} else {
			annotation.clone()
		};

		let default_value = match &variable.initializer {
			Some(initializer) => Some(initializer.clone()),
			None if is_optional_type(annotation) => Some(ABSENT_VALUE.to_string()),
			None => None,
		};

		(parameter_type, default_value)
	} else {
		let initializer = variable.initializer.as_ref()?;
		let category = literal_category(initializer)?;
		(category.type_name().to_string(), Some(initializer.clone()))
	};

	Some(FieldDescriptor {
		name: field.name.to_string(),
		parameter_type,
		default_value,
	})
}

/// Whether `annotation` spells an optional type: `T?`, `T!` or
/// `Optional<T>`.
pub fn is_optional_type(annotation: &str) -> bool {
	let annotation = annotation.trim();
	annotation.ends_with('?') || annotation.ends_with('!') || annotation.starts_with("Optional<")
}

/// Classify an initializer expression by its literal form.
pub fn literal_category(expression: &str) -> Option<LiteralCategory> {
	let expression = expression.trim().trim_start_matches('=').trim_start();
	let kinds = tokenize(expression).significant_kinds();

	let category = match kinds.as_slice() {
		[TokenKind::Ident] if matches!(expression, "true" | "false") => LiteralCategory::Boolean,
		[TokenKind::Integer] => LiteralCategory::Integer,
		[TokenKind::Float] => LiteralCategory::Float,
		[TokenKind::Operator, TokenKind::Integer] if is_sign(expression) => LiteralCategory::Integer,
		[TokenKind::Operator, TokenKind::Float] if is_sign(expression) => LiteralCategory::Float,
		[TokenKind::String] => LiteralCategory::String,
		_ => return call_callee(expression).map(LiteralCategory::Call),
	};

	Some(category)
}

fn is_sign(expression: &str) -> bool {
	expression.starts_with('-') || expression.starts_with('+')
}

/// The text before the first `(`. Implicit member expressions such as
/// `.init()` have no callee.
fn call_callee(expression: &str) -> Option<String> {
	let (callee, _) = expression.split_once('(')?;
	let callee = callee.trim();
	let callee = callee.strip_suffix(".init").unwrap_or(callee).trim_end();

	if callee.is_empty() || callee.starts_with('.') {
		return None;
	}

	Some(callee.to_string())
}
