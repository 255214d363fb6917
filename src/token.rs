use std::fmt::{self, Display, Formatter};
use std::iter::Peekable;

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  pub line: usize,
  pub column: usize,
}

impl Position {
  pub const fn new(line: usize, column: usize) -> Self {
    Self { line, column }
  }
}

impl Display for Position {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}

/// A token produced by an external lexer.
///
/// `kind` is the name of the terminal it matches, `value` is handed to
/// semantic actions when the terminal is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<V> {
  pub kind: String,
  pub value: V,
  pub pos: Position,
}

impl<V> Token<V> {
  pub fn new(kind: impl Into<String>, value: V, pos: Position) -> Self {
    Self {
      kind: kind.into(),
      value,
      pos,
    }
  }
}

/// Source of tokens for the parser engine.
///
/// `peek` returning `None` signals end of input. An implementation fed
/// incrementally may block inside `peek` until a token or end of input is
/// available.
pub trait TokenStream<V> {
  fn peek(&mut self) -> Option<&Token<V>>;

  fn advance(&mut self) -> Option<Token<V>>;
}

impl<V, S> TokenStream<V> for &mut S
where
  S: TokenStream<V> + ?Sized,
{
  fn peek(&mut self) -> Option<&Token<V>> {
    (**self).peek()
  }

  fn advance(&mut self) -> Option<Token<V>> {
    (**self).advance()
  }
}

impl<V, I> TokenStream<V> for Peekable<I>
where
  I: Iterator<Item = Token<V>>,
{
  fn peek(&mut self) -> Option<&Token<V>> {
    Peekable::peek(self)
  }

  fn advance(&mut self) -> Option<Token<V>> {
    self.next()
  }
}
