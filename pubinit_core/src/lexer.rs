use logos::Logos;

use crate::Point;
use crate::Position;
use crate::tokens::Token;
use crate::tokens::TokenKind;
use crate::tokens::TokenStream;

/// Raw tokens produced by logos. Several spellings collapse into one
/// [`TokenKind`] once they leave the lexer.
#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
enum RawToken {
	#[token("\n")]
	Newline,
	#[regex(r"@[A-Za-z_][A-Za-z0-9_]*")]
	Attribute,
	#[regex(r"#[A-Za-z_][A-Za-z0-9_]*")]
	Directive,
	#[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
	Ident,
	#[regex(r"`[A-Za-z_][A-Za-z0-9_]*`")]
	EscapedIdent,
	#[regex(r"[0-9][0-9_]*")]
	Decimal,
	#[regex(r"0x[0-9a-fA-F][0-9a-fA-F_]*")]
	Hexadecimal,
	#[regex(r"0o[0-7][0-7_]*")]
	Octal,
	#[regex(r"0b[01][01_]*")]
	Binary,
	#[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?")]
	#[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*")]
	Float,
	#[token("\"", single_line_string)]
	SingleLineString,
	#[token("\"\"\"", multi_line_string)]
	MultiLineString,
	#[token("{")]
	LBrace,
	#[token("}")]
	RBrace,
	#[token("(")]
	LParen,
	#[token(")")]
	RParen,
	#[token("[")]
	LBracket,
	#[token("]")]
	RBracket,
	#[token("->")]
	Arrow,
	#[token("=")]
	Assign,
	#[token(":")]
	Colon,
	#[token(";")]
	Semicolon,
	#[token(",")]
	Comma,
	#[token(".")]
	Dot,
	#[token("?")]
	Question,
	#[token("!")]
	Bang,
	#[regex(r"[+\-*/%&|^~<>=!?.]+", priority = 1)]
	Operator,
}

fn single_line_string(lexer: &mut logos::Lexer<'_, RawToken>) -> bool {
	bump_string(lexer, false)
}

fn multi_line_string(lexer: &mut logos::Lexer<'_, RawToken>) -> bool {
	bump_string(lexer, true)
}

fn bump_string(lexer: &mut logos::Lexer<'_, RawToken>, multi_line: bool) -> bool {
	match string_length(lexer.remainder().as_bytes(), multi_line) {
		Some(length) => {
			lexer.bump(length);
			true
		}
		None => false,
	}
}

/// Length of a string body up to and including its closing quotes. `rest`
/// starts just after the opening quotes. Interpolations may contain nested
/// string literals and parentheses, so quotes inside `\( ... )` do not
/// close the string.
fn string_length(rest: &[u8], multi_line: bool) -> Option<usize> {
	let mut index = 0;

	while index < rest.len() {
		match rest[index] {
			b'\\' if rest.get(index + 1) == Some(&b'(') => {
				index += 2;
				index += interpolation_length(&rest[index..])?;
			}
			b'\\' => index += 2,
			b'"' if !multi_line => return Some(index + 1),
			b'"' if rest[index..].starts_with(b"\"\"\"") => return Some(index + 3),
			b'\n' if !multi_line => return None,
			_ => index += 1,
		}
	}

	None
}

/// Length of an interpolation body up to and including its closing `)`.
fn interpolation_length(rest: &[u8]) -> Option<usize> {
	let mut depth = 1_usize;
	let mut index = 0;

	while index < rest.len() {
		match rest[index] {
			b'(' => {
				depth += 1;
				index += 1;
			}
			b')' => {
				depth -= 1;
				index += 1;
				if depth == 0 {
					return Some(index);
				}
			}
			b'"' if rest[index..].starts_with(b"\"\"\"") => {
				index += 3;
				index += string_length(&rest[index..], true)?;
			}
			b'"' => {
				index += 1;
				index += string_length(&rest[index..], false)?;
			}
			_ => index += 1,
		}
	}

	None
}

impl From<RawToken> for TokenKind {
	fn from(raw: RawToken) -> Self {
		match raw {
			RawToken::Newline => Self::Newline,
			RawToken::Attribute => Self::Attribute,
			RawToken::Directive => Self::Directive,
			RawToken::Ident => Self::Ident,
			RawToken::EscapedIdent => Self::EscapedIdent,
			RawToken::Decimal | RawToken::Hexadecimal | RawToken::Octal | RawToken::Binary => {
				Self::Integer
			}
			RawToken::Float => Self::Float,
			RawToken::SingleLineString | RawToken::MultiLineString => Self::String,
			RawToken::LBrace => Self::LBrace,
			RawToken::RBrace => Self::RBrace,
			RawToken::LParen => Self::LParen,
			RawToken::RParen => Self::RParen,
			RawToken::LBracket => Self::LBracket,
			RawToken::RBracket => Self::RBracket,
			RawToken::Arrow => Self::Arrow,
			RawToken::Assign => Self::Assign,
			RawToken::Colon => Self::Colon,
			RawToken::Semicolon => Self::Semicolon,
			RawToken::Comma => Self::Comma,
			RawToken::Dot => Self::Dot,
			RawToken::Question => Self::Question,
			RawToken::Bang => Self::Bang,
			RawToken::Operator => Self::Operator,
		}
	}
}

/// Split `source` into tokens. Unrecognised input becomes
/// [`TokenKind::Unknown`] so tokenizing never fails.
pub fn tokenize(source: &str) -> TokenStream {
	let mut tokens = Vec::new();
	let mut point = Point::default();
	let mut lexer = RawToken::lexer(source);

	while let Some(result) = lexer.next() {
		let span = lexer.span();

		// Catch up over skipped whitespace and comments.
		point.advance_str(&source[point.offset..span.start]);
		let start = point;
		point.advance_str(lexer.slice());

		let kind = result.map_or(TokenKind::Unknown, TokenKind::from);
		tokens.push(Token {
			kind,
			span,
			position: Position { start, end: point },
		});
	}

	TokenStream::new(tokens)
}
