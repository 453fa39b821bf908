use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

/// A single location in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
	/// 1-indexed line number.
	pub line: usize,
	/// 1-indexed column number, counted in characters.
	pub column: usize,
	/// 0-indexed byte offset from the start of the source.
	pub offset: usize,
}

impl Point {
	pub const fn new(line: usize, column: usize, offset: usize) -> Self {
		Self {
			line,
			column,
			offset,
		}
	}

	/// Move the point forward over `text`, tracking newlines.
	pub fn advance_str(&mut self, text: &str) {
		for ch in text.chars() {
			if ch == '\n' {
				self.line += 1;
				self.column = 1;
			} else {
				self.column += 1;
			}

			self.offset += ch.len_utf8();
		}
	}
}

impl Default for Point {
	fn default() -> Self {
		Self::new(1, 1, 0)
	}
}

impl Display for Point {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}

/// The start and end of a region in a source file. The end is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
	pub start: Point,
	pub end: Point,
}

impl Position {
	pub const fn new(
		start_line: usize,
		start_column: usize,
		start_offset: usize,
		end_line: usize,
		end_column: usize,
		end_offset: usize,
	) -> Self {
		Self {
			start: Point::new(start_line, start_column, start_offset),
			end: Point::new(end_line, end_column, end_offset),
		}
	}

	/// The number of bytes covered.
	pub fn len(&self) -> usize {
		self.end.offset.saturating_sub(self.start.offset)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// The byte range covered, for slicing the original source.
	pub fn range(&self) -> std::ops::Range<usize> {
		self.start.offset..self.end.offset
	}
}

impl From<Position> for miette::SourceSpan {
	fn from(position: Position) -> Self {
		(position.start.offset, position.len()).into()
	}
}
