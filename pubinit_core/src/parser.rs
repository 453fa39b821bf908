use crate::AccessorBlock;
use crate::Attribute;
use crate::BindingPattern;
use crate::DeclarationKind;
use crate::Member;
use crate::MemberDeclaration;
use crate::Modifier;
use crate::Mutability;
use crate::Point;
use crate::Position;
use crate::PubInitError;
use crate::PubInitResult;
use crate::SourceFile;
use crate::TypeDeclaration;
use crate::VariableDeclaration;
use crate::Visibility;
use crate::lexer::tokenize;
use crate::tokens::Token;
use crate::tokens::TokenKind;

/// Keywords that may precede a declaration keyword without changing what is
/// being declared.
const MODIFIERS: &[&str] = &[
	"public",
	"open",
	"package",
	"internal",
	"fileprivate",
	"private",
	"static",
	"final",
	"lazy",
	"weak",
	"unowned",
	"override",
	"mutating",
	"nonmutating",
	"nonisolated",
	"isolated",
	"dynamic",
	"required",
	"convenience",
	"optional",
	"indirect",
	"prefix",
	"postfix",
	"infix",
	"consuming",
	"borrowing",
	"distributed",
];

/// Keywords after which `class` acts as a modifier rather than introducing a
/// class declaration.
const CLASS_MEMBER_KEYWORDS: &[&str] = &["var", "let", "func", "subscript", "typealias"];

/// Parse Swift source text into its type declarations.
pub fn parse(source: impl AsRef<str>) -> PubInitResult<SourceFile> {
	let source = source.as_ref();
	let tokens = tokenize(source).into_inner();
	check_balance(source, &tokens)?;

	let mut parser = Parser {
		source,
		tokens,
		cursor: 0,
	};

	let declarations = parser
		.parse_items(false)?
		.into_iter()
		.filter_map(|member| {
			match member.member {
				Member::Nested(declaration) => Some(*declaration),
				_ => None,
			}
		})
		.collect();

	Ok(SourceFile { declarations })
}

/// Verify that every bracket is closed by its own counterpart so the parser
/// can skip groups without running off the end.
fn check_balance(source: &str, tokens: &[Token]) -> PubInitResult<()> {
	let mut open: Vec<&Token> = vec![];

	for token in tokens {
		if token.kind.is_open() {
			open.push(token);
		} else if token.kind.is_close() {
			let matched = open
				.pop()
				.and_then(|opener| opener.kind.closing())
				.is_some_and(|closing| closing == token.kind);

			if !matched {
				return Err(unbalanced(source, token));
			}
		}
	}

	match open.pop() {
		Some(token) => Err(unbalanced(source, token)),
		None => Ok(()),
	}
}

fn unbalanced(source: &str, token: &Token) -> PubInitError {
	PubInitError::UnbalancedDelimiter {
		delimiter: token.text(source).chars().next().unwrap_or('?'),
		line: token.position.start.line,
		column: token.position.start.column,
	}
}

struct Parser<'a> {
	source: &'a str,
	tokens: Vec<Token>,
	cursor: usize,
}

impl<'a> Parser<'a> {
	fn peek(&self) -> Option<&Token> {
		self.tokens.get(self.cursor)
	}

	fn peek_kind(&self) -> Option<TokenKind> {
		self.peek().map(|token| token.kind)
	}

	fn peek_text(&self) -> Option<&'a str> {
		let source = self.source;
		self.peek().map(|token| token.text(source))
	}

	fn text_at(&self, index: usize) -> &'a str {
		self.tokens[index].text(self.source)
	}

	/// Whether the cursor is on a `(` written flush against byte `end`, as in
	/// `@available(iOS 17, *)` or `private(set)`.
	fn paren_follows(&self, end: usize) -> bool {
		self.peek()
			.is_some_and(|token| token.kind == TokenKind::LParen && token.span.start == end)
	}

	fn advance(&mut self) {
		self.cursor += 1;
	}

	/// Index of the first non-newline token at or after `index`.
	fn significant_from(&self, index: usize) -> Option<usize> {
		(index..self.tokens.len()).find(|&i| self.tokens[i].kind != TokenKind::Newline)
	}

	/// Index of the last non-newline token before `index`.
	fn significant_before(&self, index: usize) -> Option<usize> {
		(0..index)
			.rev()
			.find(|&i| self.tokens[i].kind != TokenKind::Newline)
	}

	fn skip_newlines(&mut self) {
		while matches!(
			self.peek_kind(),
			Some(TokenKind::Newline | TokenKind::Semicolon)
		) {
			self.advance();
		}
	}

	/// With the cursor on an opening bracket, move past its matching close
	/// and return the index of the close.
	fn skip_group(&mut self) -> usize {
		let mut depth = 0usize;

		while let Some(kind) = self.peek_kind() {
			self.advance();

			if kind.is_open() {
				depth += 1;
			} else if kind.is_close() {
				depth -= 1;
				if depth == 0 {
					return self.cursor - 1;
				}
			}
		}

		self.cursor.saturating_sub(1)
	}

	/// Whether the newline at `index` ends the current declaration.
	fn newline_ends_statement(&self, index: usize) -> bool {
		let previous_continues = self.significant_before(index).is_some_and(|i| {
			let token = &self.tokens[i];
			match token.kind {
				TokenKind::Operator => {
					!token
						.text(self.source)
						.ends_with(|ch: char| matches!(ch, '>' | '?' | '!'))
				}
				kind => kind.continues_line(),
			}
		});

		let next_continues = self
			.significant_from(index)
			.is_some_and(|i| self.tokens[i].kind.continues_previous_line());

		!(previous_continues || next_continues)
	}

	/// Change in generic nesting caused by the operator token at `index`.
	/// Only brackets written flush against the preceding token count, which
	/// separates `Array<Int>` from `a < b`.
	fn angle_delta(&self, index: usize, depth: usize) -> isize {
		let token = &self.tokens[index];
		if token.kind != TokenKind::Operator || index == 0 {
			return 0;
		}

		let previous = &self.tokens[index - 1];
		let flush = previous.span.end == token.span.start;
		let text = token.text(self.source);

		if text.starts_with('<') && flush && previous.kind.is_identifier() {
			return text.chars().take_while(|ch| *ch == '<').count() as isize;
		}

		// `>` may be lexed together with a trailing optional marker: `>?`.
		if depth > 0
			&& text.starts_with('>')
			&& text.chars().all(|ch| matches!(ch, '>' | '?' | '!'))
		{
			return -(text.chars().filter(|ch| *ch == '>').count() as isize);
		}

		0
	}

	/// Whether the block opened at the cursor holds `willSet`/`didSet`.
	fn block_is_observers(&self) -> bool {
		self.significant_from(self.cursor + 1)
			.is_some_and(|i| matches!(self.text_at(i), "willSet" | "didSet"))
	}

	/// Skip the rest of the current declaration, including any bodies.
	fn skip_declaration(&mut self) {
		while let Some(kind) = self.peek_kind() {
			match kind {
				TokenKind::Newline => {
					if self.newline_ends_statement(self.cursor) {
						return;
					}
					self.advance();
				}
				TokenKind::Semicolon | TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
					return;
				}
				kind if kind.is_open() => {
					self.skip_group();
				}
				_ => self.advance(),
			}
		}
	}

	/// Parse declarations until the end of input or, inside a body, until the
	/// closing brace (which is left for the caller).
	fn parse_items(&mut self, in_body: bool) -> PubInitResult<Vec<MemberDeclaration>> {
		let mut members = vec![];

		loop {
			self.skip_newlines();

			match self.peek_kind() {
				None => break,
				Some(TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket) => {
					if in_body {
						break;
					}
					self.advance();
				}
				Some(_) => {
					let start = self.cursor;
					members.extend(self.parse_item()?);

					if self.cursor == start {
						self.advance();
					}
				}
			}
		}

		Ok(members)
	}

	fn parse_item(&mut self) -> PubInitResult<Vec<MemberDeclaration>> {
		let Some(first) = self.peek() else {
			return Ok(vec![]);
		};
		let start = first.position.start;

		let attributes = self.parse_attributes();
		let modifiers = self.parse_modifiers();

		let Some(token) = self.peek() else {
			return Ok(vec![]);
		};

		if token.kind != TokenKind::Ident {
			self.skip_declaration();
			return Ok(vec![self.member(Member::Other, start)]);
		}

		let keyword = token.text(self.source);

		if let Some(kind) = DeclarationKind::from_keyword(keyword) {
			let declaration = self.parse_type(kind, attributes, modifiers, start)?;
			let position = declaration.position;
			return Ok(vec![MemberDeclaration {
				member: Member::Nested(Box::new(declaration)),
				position,
			}]);
		}

		let member = match keyword {
			"let" => return Ok(self.parse_variable(Mutability::Constant, attributes, modifiers, start)),
			"var" => return Ok(self.parse_variable(Mutability::Variable, attributes, modifiers, start)),
			"func" => {
				self.advance();
				let name = self.peek_text().unwrap_or_default().to_string();
				self.skip_declaration();
				Member::Function(name)
			}
			"init" => {
				self.skip_declaration();
				Member::Initializer
			}
			"case" => {
				self.advance();
				let names = self.parse_case_names();
				self.skip_declaration();
				Member::EnumCase(names)
			}
			_ => {
				self.skip_declaration();
				Member::Other
			}
		};

		Ok(vec![self.member(member, start)])
	}

	fn member(&self, member: Member, start: Point) -> MemberDeclaration {
		MemberDeclaration {
			member,
			position: Position {
				start,
				end: self.last_end(start),
			},
		}
	}

	/// End of the most recently consumed token, or `fallback` when nothing
	/// was consumed.
	fn last_end(&self, fallback: Point) -> Point {
		self.cursor
			.checked_sub(1)
			.and_then(|i| self.tokens.get(i))
			.map_or(fallback, |token| token.position.end)
	}

	fn parse_attributes(&mut self) -> Vec<Attribute> {
		let mut attributes = vec![];

		loop {
			self.skip_newlines();
			let Some(token) = self.peek() else {
				break;
			};
			if token.kind != TokenKind::Attribute {
				break;
			}

			let name = token.text(self.source)[1..].to_string();
			let mut position = token.position;
			let end = token.span.end;
			self.advance();

			let mut arguments = None;
			if self.paren_follows(end) {
				let open_index = self.cursor;
				let close_index = self.skip_group();
				arguments = Some(self.inner_text(open_index, close_index));
				position.end = self.tokens[close_index].position.end;
			}

			attributes.push(Attribute {
				name,
				arguments,
				position,
			});
		}

		attributes
	}

	fn parse_modifiers(&mut self) -> Vec<Modifier> {
		let mut modifiers = vec![];

		while let Some(token) = self.peek() {
			if token.kind != TokenKind::Ident {
				break;
			}

			let text = token.text(self.source);
			let is_modifier = MODIFIERS.contains(&text)
				|| (text == "class"
					&& self.significant_from(self.cursor + 1).is_some_and(|i| {
						let next = self.text_at(i);
						CLASS_MEMBER_KEYWORDS.contains(&next) || MODIFIERS.contains(&next)
					}));

			if !is_modifier {
				break;
			}

			let end = token.span.end;
			self.advance();

			let mut detail = None;
			if self.paren_follows(end) {
				let open_index = self.cursor;
				let close_index = self.skip_group();
				detail = Some(self.inner_text(open_index, close_index));
			}

			modifiers.push(Modifier {
				name: text.to_string(),
				detail,
			});
			self.skip_newlines();
		}

		modifiers
	}

	/// The trimmed source text strictly between two token indices.
	fn inner_text(&self, open: usize, close: usize) -> String {
		let start = self.tokens[open].span.end;
		let end = self.tokens[close].span.start;
		self.source[start..end.max(start)].trim().to_string()
	}

	/// The trimmed source text covering tokens `first..=last`.
	fn span_text(&self, first: usize, last: usize) -> String {
		let start = self.tokens[first].span.start;
		let end = self.tokens[last].span.end;
		self.source[start..end].trim().to_string()
	}

	fn parse_case_names(&mut self) -> Vec<String> {
		let mut names = vec![];

		while let Some(token) = self.peek() {
			match token.kind {
				kind if kind.is_identifier() => {
					names.push(token.text(self.source).to_string());
					self.advance();
				}
				TokenKind::Comma => self.advance(),
				kind if kind.is_open() => {
					self.skip_group();
				}
				_ => break,
			}
		}

		names
	}

	fn parse_type(
		&mut self,
		kind: DeclarationKind,
		attributes: Vec<Attribute>,
		modifiers: Vec<Modifier>,
		start: Point,
	) -> PubInitResult<TypeDeclaration> {
		let keyword = self.peek().map(|token| token.position.start).unwrap_or(start);
		self.advance();

		// A dotted path such as `Foundation.Date`. Any other identifier starts
		// a `where` clause or similar and is not part of the name.
		let mut name = String::new();
		let mut expect_identifier = true;
		while let Some(token) = self.peek() {
			match token.kind {
				kind if expect_identifier && kind.is_identifier() => expect_identifier = false,
				TokenKind::Dot if !expect_identifier => expect_identifier = true,
				_ => break,
			}
			name.push_str(token.text(self.source));
			self.advance();
		}

		// Generic parameters, inheritance and `where` clauses up to the body.
		let body_open = loop {
			match self.peek_kind() {
				Some(TokenKind::LBrace) => break self.cursor,
				Some(TokenKind::LParen | TokenKind::LBracket) => {
					self.skip_group();
				}
				Some(TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket | TokenKind::Semicolon)
				| None => {
					return Err(PubInitError::ExpectedBody {
						name,
						line: keyword.line,
						column: keyword.column,
					});
				}
				Some(_) => self.advance(),
			}
		};

		let body_start = self.tokens[body_open].span.start;
		self.advance();

		let members = self.parse_items(true)?;

		let Some(close) = self.peek().filter(|token| token.kind == TokenKind::RBrace) else {
			return Err(PubInitError::ExpectedBody {
				name,
				line: keyword.line,
				column: keyword.column,
			});
		};
		let body_end = close.span.start;
		let end = close.position.end;
		self.advance();

		Ok(TypeDeclaration {
			kind,
			name,
			visibility: Visibility::from_modifiers(&modifiers),
			attributes,
			modifiers,
			members,
			position: Position { start, end },
			body_start,
			body_end,
		})
	}

	fn parse_variable(
		&mut self,
		mutability: Mutability,
		attributes: Vec<Attribute>,
		modifiers: Vec<Modifier>,
		start: Point,
	) -> Vec<MemberDeclaration> {
		self.advance();

		let is_type_member = modifiers
			.iter()
			.any(|modifier| matches!(modifier.name.as_str(), "static" | "class"));
		let mut bindings = vec![];

		loop {
			self.skip_inline_newlines();

			let pattern = match self.peek() {
				Some(token) if token.kind.is_identifier() => {
					let name = token.text(self.source).to_string();
					self.advance();
					BindingPattern::Identifier(name)
				}
				Some(token) if token.kind == TokenKind::LParen => {
					let open = self.cursor;
					let close = self.skip_group();
					BindingPattern::Destructured(self.span_text(open, close))
				}
				_ => break,
			};

			let mut annotation = None;
			if self.peek_kind() == Some(TokenKind::Colon) {
				self.advance();
				annotation = self.collect_run(true);
			}

			let mut initializer = None;
			if self.peek_kind() == Some(TokenKind::Assign) {
				self.advance();
				initializer = self.collect_run(false);
			}

			let mut accessor = None;
			self.skip_inline_newlines();
			if self.peek_kind() == Some(TokenKind::LBrace) {
				accessor = Some(if self.block_is_observers() {
					AccessorBlock::Observers
				} else {
					AccessorBlock::Computed
				});
				self.skip_group();
			}

			bindings.push(VariableDeclaration {
				pattern,
				annotation,
				initializer,
				accessor,
				attributes: attributes.clone(),
				modifiers: modifiers.clone(),
				mutability,
				is_type_member,
			});

			if self.peek_kind() == Some(TokenKind::Comma) {
				self.advance();
				continue;
			}

			break;
		}

		self.skip_declaration();

		let position = Position {
			start,
			end: self.last_end(start),
		};

		bindings
			.into_iter()
			.map(|variable| {
				MemberDeclaration {
					member: Member::Variable(variable),
					position,
				}
			})
			.collect()
	}

	/// Skip newlines that do not end the statement, e.g. before a `{` that
	/// opens an accessor block on the following line.
	fn skip_inline_newlines(&mut self) {
		while self.peek_kind() == Some(TokenKind::Newline)
			&& !self.newline_ends_statement(self.cursor)
		{
			self.advance();
		}
	}

	/// Collect a type annotation (`in_type`) or an initializer expression and
	/// return its verbatim text. The run stops before a top level `,`, `=`
	/// (annotations only), accessor block, or the end of the statement.
	fn collect_run(&mut self, in_type: bool) -> Option<String> {
		let first = self.cursor;
		let mut last = None;
		let mut angle_depth = 0usize;

		while let Some(kind) = self.peek_kind() {
			match kind {
				TokenKind::Newline => {
					if self.newline_ends_statement(self.cursor) {
						break;
					}
					self.advance();
				}
				TokenKind::Semicolon | TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
					break;
				}
				TokenKind::Comma if angle_depth == 0 => break,
				TokenKind::Assign if in_type => break,
				TokenKind::LBrace if in_type || self.block_is_observers() => break,
				kind if kind.is_open() => {
					last = Some(self.skip_group());
				}
				_ => {
					let delta = self.angle_delta(self.cursor, angle_depth);
					angle_depth = angle_depth.saturating_add_signed(delta);
					last = Some(self.cursor);
					self.advance();
				}
			}
		}

		let last = last?;
		let text = self.span_text(first, last);
		(!text.is_empty()).then_some(text)
	}
}
