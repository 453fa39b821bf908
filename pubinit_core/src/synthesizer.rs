use std::fmt::Display;

use serde::Serialize;

use crate::FieldDescriptor;

/// One `name: Type = default` entry of the parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
	pub name: String,
	pub parameter_type: String,
	pub default_value: Option<String>,
}

impl Display for Parameter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.name, self.parameter_type)?;
		if let Some(default_value) = &self.default_value {
			write!(f, " = {default_value}")?;
		}

		Ok(())
	}
}

/// A `self.name = name` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
	pub name: String,
}

impl Display for Assignment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "self.{0} = {0}", self.name)
	}
}

/// The generated `public init`.
///
/// Parameters and assignments follow declaration order. The assignments do
/// not depend on each other, so the order only affects how the generated code
/// reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynthesizedInitializer {
	pub parameters: Vec<Parameter>,
	pub body: Vec<Assignment>,
}

impl SynthesizedInitializer {
	/// Build the initializer from resolved fields.
	pub fn new(fields: Vec<FieldDescriptor>) -> Self {
		let mut initializer = Self::default();

		for field in fields {
			initializer.body.push(Assignment {
				name: field.name.clone(),
			});
			initializer.parameters.push(Parameter {
				name: field.name,
				parameter_type: field.parameter_type,
				default_value: field.default_value,
			});
		}

		initializer
	}

	/// The parameters joined one per line, without indentation.
	pub fn parameter_list(&self) -> String {
		self.parameters
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join(",\n")
	}

	/// Render the initializer as source text. `indent` is the unit used for
	/// parameters and statements; the first line is not indented.
	pub fn render(&self, indent: &str) -> String {
		if self.parameters.is_empty() {
			return "public init() {}".to_string();
		}

		let mut lines = vec!["public init(".to_string()];
		lines.extend(
			self.parameter_list()
				.lines()
				.map(|line| format!("{indent}{line}")),
		);
		lines.push(") {".to_string());
		lines.extend(self.body.iter().map(|statement| format!("{indent}{statement}")));
		lines.push("}".to_string());

		lines.join("\n")
	}
}
