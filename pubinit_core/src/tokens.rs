use std::fmt::Display;
use std::ops::Range;

use derive_more::Deref;

use crate::Position;

/// The kind of a lexed token. Literal values are not decoded; the parser and
/// resolver work with the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// `\n`
	Newline,
	/// `@Name`
	Attribute,
	/// `#if`, `#endif`, `#selector`
	Directive,
	/// `name`
	Ident,
	/// `` `default` ``
	EscapedIdent,
	/// `42`, `0xff`, `1_000`
	Integer,
	/// `1.5`, `2e10`
	Float,
	/// `"text"` or a triple quoted multi-line string.
	String,
	/// `{`
	LBrace,
	/// `}`
	RBrace,
	/// `(`
	LParen,
	/// `)`
	RParen,
	/// `[`
	LBracket,
	/// `]`
	RBracket,
	/// `->`
	Arrow,
	/// `=`
	Assign,
	/// `:`
	Colon,
	/// `;`
	Semicolon,
	/// `,`
	Comma,
	/// `.`
	Dot,
	/// `?`
	Question,
	/// `!`
	Bang,
	/// Any other run of operator characters, e.g. `==`, `<`, `&&`.
	Operator,
	/// Input the lexer does not recognise.
	Unknown,
}

impl TokenKind {
	/// Whether this token opens a nested group.
	pub fn is_open(self) -> bool {
		matches!(self, Self::LBrace | Self::LParen | Self::LBracket)
	}

	/// Whether this token closes a nested group.
	pub fn is_close(self) -> bool {
		matches!(self, Self::RBrace | Self::RParen | Self::RBracket)
	}

	/// The closing counterpart of an opening bracket.
	pub fn closing(self) -> Option<Self> {
		match self {
			Self::LBrace => Some(Self::RBrace),
			Self::LParen => Some(Self::RParen),
			Self::LBracket => Some(Self::RBracket),
			_ => None,
		}
	}

	/// Tokens that leave an expression or type incomplete when they end a
	/// line, so the declaration continues on the next line.
	pub fn continues_line(self) -> bool {
		matches!(
			self,
			Self::Arrow | Self::Assign | Self::Colon | Self::Comma | Self::Dot | Self::Operator
		)
	}

	/// Tokens that continue the previous line's declaration when they start a
	/// new line.
	pub fn continues_previous_line(self) -> bool {
		matches!(self, Self::Arrow | Self::Dot | Self::Operator | Self::LBrace)
	}

	pub fn is_identifier(self) -> bool {
		matches!(self, Self::Ident | Self::EscapedIdent)
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let text = match self {
			Self::Newline => "newline",
			Self::Attribute => "attribute",
			Self::Directive => "directive",
			Self::Ident | Self::EscapedIdent => "identifier",
			Self::Integer => "integer literal",
			Self::Float => "float literal",
			Self::String => "string literal",
			Self::LBrace => "{",
			Self::RBrace => "}",
			Self::LParen => "(",
			Self::RParen => ")",
			Self::LBracket => "[",
			Self::RBracket => "]",
			Self::Arrow => "->",
			Self::Assign => "=",
			Self::Colon => ":",
			Self::Semicolon => ";",
			Self::Comma => ",",
			Self::Dot => ".",
			Self::Question => "?",
			Self::Bang => "!",
			Self::Operator => "operator",
			Self::Unknown => "unknown input",
		};

		write!(f, "{text}")
	}
}

/// A token with its location in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub kind: TokenKind,
	/// The byte range of the token in the source.
	pub span: Range<usize>,
	pub position: Position,
}

impl Token {
	/// The source text of this token.
	pub fn text<'a>(&self, source: &'a str) -> &'a str {
		&source[self.span.clone()]
	}
}

/// The tokens of a single source text, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct TokenStream(Vec<Token>);

impl TokenStream {
	pub fn new(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}

	/// Token kinds with newlines removed. Handy for classifying short
	/// expressions.
	pub fn significant_kinds(&self) -> Vec<TokenKind> {
		self.0
			.iter()
			.map(|token| token.kind)
			.filter(|kind| *kind != TokenKind::Newline)
			.collect()
	}

	pub fn into_inner(self) -> Vec<Token> {
		self.0
	}
}
