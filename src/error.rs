//! Error types for grammar construction, table construction and parsing.
//!
//! Construction errors (`MalformedGrammarError`, `GrammarConflictError`)
//! prevent a parser from being produced at all. Parse errors are fatal to
//! one parse invocation only; the compiled parser stays usable.

use std::fmt::{self, Display, Formatter};
use thiserror::Error;
use crate::grammar::ProdId;
use crate::token::Position;

/// Name used for the end-of-input marker in diagnostics.
pub const END_MARKER: &str = "$";

/// Structural defects found while building the grammar model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedGrammarError {
  #[error("no start symbol declared")]
  NoStart,
  #[error("start symbol `{0}` is not a declared non-terminal")]
  UndeclaredStart(String),
  #[error("production for `{head}` references undeclared symbol `{symbol}`")]
  UndeclaredSymbol {
    head: String,
    symbol: String,
  },
  #[error("terminal `{0}` is used as a production head")]
  TerminalHead(String),
  #[error("non-terminal `{0}` has no productions")]
  NoProductions(String),
  #[error("`{0}` is declared both as a terminal and as a non-terminal")]
  DuplicateSymbol(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
  /// Both productions predict the lookahead through their FIRST sets.
  FirstFirst,
  /// At least one production predicts the lookahead because it is nullable
  /// and the lookahead is in FOLLOW of the non-terminal.
  FirstFollow,
}

/// Two productions claiming the same table cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conflict {
  pub kind: ConflictKind,
  pub nonterm: String,
  pub lookahead: String,
  /// The production that claimed the cell first.
  pub existing: String,
  pub competing: String,
  pub existing_prod: ProdId,
  pub competing_prod: ProdId,
}

impl Display for Conflict {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let kind = match self.kind {
      ConflictKind::FirstFirst => "FIRST/FIRST",
      ConflictKind::FirstFollow => "FIRST/FOLLOW",
    };
    write!(f, "{} conflict on `{}` for `{}`: `{}` vs `{}`",
      kind, self.lookahead, self.nonterm, self.existing, self.competing)
  }
}

/// The grammar is not LL(1).
///
/// `conflicts` is never empty, and its order only depends on the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("grammar is not LL(1): {}", render_conflicts(.conflicts))]
pub struct GrammarConflictError {
  pub conflicts: Vec<Conflict>,
}

fn render_conflicts(conflicts: &[Conflict]) -> String {
  match conflicts {
    [] => "no conflicts".to_owned(),
    [one] => one.to_string(),
    [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
  }
}

/// The input does not match the grammar at some token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected {}, expected one of: {}",
  render_found(.found, .pos), .expected.join(", "))]
pub struct SyntaxError {
  /// Kind of the offending token, `None` at end of input.
  pub found: Option<String>,
  /// Position of the offending token. At end of input, position of the
  /// last consumed token, `None` if there was none.
  pub pos: Option<Position>,
  /// Lookaheads the table accepts in the failing state: terminals in
  /// declaration order, then `$`.
  pub expected: Vec<String>,
}

/// The start symbol was fully derived but tokens remain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected trailing `{found}` at {pos}, expected end of input")]
pub struct TrailingInputError {
  pub found: String,
  pub pos: Position,
}

fn render_found(found: &Option<String>, pos: &Option<Position>) -> String {
  match (found, pos) {
    (Some(kind), Some(pos)) => format!("`{}` at {}", kind, pos),
    (Some(kind), None) => format!("`{}`", kind),
    (None, Some(pos)) => format!("end of input after {}", pos),
    (None, None) => "end of input".to_owned(),
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error(transparent)]
  Syntax(#[from] SyntaxError),
  #[error(transparent)]
  TrailingInput(#[from] TrailingInputError),
}

impl ParseError {
  /// Position of the offending token, see `SyntaxError::pos` for errors
  /// at end of input.
  pub fn pos(&self) -> Option<Position> {
    match self {
      ParseError::Syntax(err) => err.pos,
      ParseError::TrailingInput(err) => Some(err.pos),
    }
  }
}

/// Any error produced on the way from a grammar description to a parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error(transparent)]
  Malformed(#[from] MalformedGrammarError),
  #[error(transparent)]
  Conflict(#[from] GrammarConflictError),
  #[error(transparent)]
  Parse(#[from] ParseError),
}
