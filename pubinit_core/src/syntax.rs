//! The declaration tree handed to the engine.
//!
//! Declaration and member shapes are closed enumerations so every stage can
//! pattern match on them instead of probing for node types.

use std::fmt::Display;

use serde::Serialize;

use crate::Position;
use crate::synthesizer::SynthesizedInitializer;

/// Every type declaration found in one source text, in source order. Nested
/// declarations live inside their parent's members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
	pub declarations: Vec<TypeDeclaration>,
}

impl SourceFile {
	/// Visit every declaration depth first, parents before their nested
	/// declarations.
	pub fn walk(&self) -> Vec<&TypeDeclaration> {
		let mut found = Vec::new();
		for declaration in &self.declarations {
			declaration.collect_into(&mut found);
		}
		found
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
	Struct,
	Class,
	Enum,
	Actor,
	Protocol,
	Extension,
}

impl DeclarationKind {
	pub fn from_keyword(keyword: &str) -> Option<Self> {
		let kind = match keyword {
			"struct" => Self::Struct,
			"class" => Self::Class,
			"enum" => Self::Enum,
			"actor" => Self::Actor,
			"protocol" => Self::Protocol,
			"extension" => Self::Extension,
			_ => return None,
		};

		Some(kind)
	}

	/// Structured types with named stored fields.
	pub fn is_aggregate(self) -> bool {
		matches!(self, Self::Struct | Self::Class)
	}
}

impl Display for DeclarationKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let keyword = match self {
			Self::Struct => "struct",
			Self::Class => "class",
			Self::Enum => "enum",
			Self::Actor => "actor",
			Self::Protocol => "protocol",
			Self::Extension => "extension",
		};

		write!(f, "{keyword}")
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
	Public,
	Open,
	Package,
	#[default]
	Internal,
	FilePrivate,
	Private,
}

impl Visibility {
	pub fn from_keyword(keyword: &str) -> Option<Self> {
		let visibility = match keyword {
			"public" => Self::Public,
			"open" => Self::Open,
			"package" => Self::Package,
			"internal" => Self::Internal,
			"fileprivate" => Self::FilePrivate,
			"private" => Self::Private,
			_ => return None,
		};

		Some(visibility)
	}

	/// The effective visibility declared by a modifier list. Setter-only
	/// modifiers such as `private(set)` do not count.
	pub fn from_modifiers(modifiers: &[Modifier]) -> Self {
		modifiers
			.iter()
			.filter(|modifier| modifier.detail.is_none())
			.find_map(|modifier| Self::from_keyword(&modifier.name))
			.unwrap_or_default()
	}
}

/// An `@Name` or `@Name(arguments)` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	/// The name without the leading `@`.
	pub name: String,
	/// The raw text between the parentheses, when present.
	pub arguments: Option<String>,
	pub position: Position,
}

/// A declaration modifier such as `public`, `static` or `private(set)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
	pub name: String,
	/// The parenthesised detail, e.g. `set` in `private(set)`.
	pub detail: Option<String>,
}

/// A `struct`, `class` or other type declaration together with its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
	pub kind: DeclarationKind,
	pub name: String,
	pub visibility: Visibility,
	pub attributes: Vec<Attribute>,
	pub modifiers: Vec<Modifier>,
	pub members: Vec<MemberDeclaration>,
	/// From the first attribute or modifier to the closing brace.
	pub position: Position,
	/// Byte offset of the opening `{` of the member block.
	pub body_start: usize,
	/// Byte offset of the closing `}` of the member block.
	pub body_end: usize,
}

impl TypeDeclaration {
	/// Append a synthesized initializer after the existing members. Existing
	/// members are never touched, and nothing checks for an earlier
	/// initializer.
	pub fn append_initializer(&mut self, initializer: SynthesizedInitializer) {
		let position = Position {
			start: self.position.end,
			end: self.position.end,
		};

		self.members.push(MemberDeclaration {
			member: Member::Synthesized(initializer),
			position,
		});
	}

	/// Initializers previously appended with [`Self::append_initializer`].
	pub fn synthesized_initializers(&self) -> impl Iterator<Item = &SynthesizedInitializer> {
		self.members.iter().filter_map(|member| {
			match &member.member {
				Member::Synthesized(initializer) => Some(initializer),
				_ => None,
			}
		})
	}

	fn collect_into<'a>(&'a self, found: &mut Vec<&'a TypeDeclaration>) {
		found.push(self);
		for member in &self.members {
			if let Member::Nested(nested) = &member.member {
				nested.collect_into(found);
			}
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDeclaration {
	pub member: Member,
	/// The whole member declaration including attributes and accessor block.
	pub position: Position,
}

/// The closed set of member shapes found inside a type body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
	/// A `let` or `var` binding.
	Variable(VariableDeclaration),
	/// A method, identified by name.
	Function(String),
	/// An `init` written in the source.
	Initializer,
	/// An initializer appended by the engine.
	Synthesized(SynthesizedInitializer),
	/// An enum `case`, with every name it declares.
	EnumCase(Vec<String>),
	Nested(Box<TypeDeclaration>),
	/// Anything else: subscripts, type aliases, `deinit`, directives.
	Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mutability {
	/// Declared with `let`.
	Constant,
	/// Declared with `var`.
	Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingPattern {
	Identifier(String),
	/// A tuple pattern such as `(x, y)`, kept as written.
	Destructured(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessorBlock {
	/// `{ get set }`, `{ return x }` and other computed bodies.
	Computed,
	/// `willSet` and `didSet` observers.
	Observers,
}

/// One binding of a `let`/`var` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
	pub pattern: BindingPattern,
	/// The type annotation after `:`, verbatim.
	pub annotation: Option<String>,
	/// The initializer expression after `=`, verbatim.
	pub initializer: Option<String>,
	pub accessor: Option<AccessorBlock>,
	pub attributes: Vec<Attribute>,
	pub modifiers: Vec<Modifier>,
	pub mutability: Mutability,
	/// Declared with `static` or `class`.
	pub is_type_member: bool,
}

impl VariableDeclaration {
	pub fn identifier(&self) -> Option<&str> {
		match &self.pattern {
			BindingPattern::Identifier(name) => Some(name),
			BindingPattern::Destructured(_) => None,
		}
	}
}
