use crate::error::{END_MARKER, GrammarConflictError, ParseError};
use crate::grammar::{Grammar, ProdId, TermId};
use crate::token::TokenStream;

mod bitset;
mod engine;
mod sets;
mod table;

pub use sets::Sets;
pub use table::{ParseTable, TableDisplay};

/// A table column: a terminal, or the end-of-input marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookahead {
  Term(TermId),
  End,
}

impl Lookahead {
  pub(crate) fn index(self, num_terms: usize) -> usize {
    match self {
      Lookahead::Term(id) => id.index(),
      Lookahead::End => num_terms,
    }
  }

  pub(crate) fn from_index(ix: usize, num_terms: usize) -> Self {
    if ix == num_terms {
      Lookahead::End
    } else {
      Lookahead::Term(TermId(ix as u32))
    }
  }

  /// The terminal's name, or `$` for the end marker.
  pub fn name<V>(self, grammar: &Grammar<V>) -> &str {
    match self {
      Lookahead::Term(id) => grammar.term_name(id),
      Lookahead::End => END_MARKER,
    }
  }
}

/// A grammar compiled into an LL(1) parser.
///
/// The grammar, its sets and its table never change after construction, so
/// one `Parser` can serve any number of parses, including concurrent ones.
pub struct Parser<V> {
  grammar: Grammar<V>,
  sets: Sets,
  table: ParseTable,
}

impl<V> Parser<V> {
  pub fn new(grammar: Grammar<V>) -> Result<Self, GrammarConflictError> {
    let sets = sets::solve(&grammar);
    let table = table::gen_table(&grammar, &sets)?;
    Ok(Parser {
      grammar,
      sets,
      table,
    })
  }

  pub fn grammar(&self) -> &Grammar<V> {
    &self.grammar
  }

  pub fn sets(&self) -> &Sets {
    &self.sets
  }

  pub fn table(&self) -> &ParseTable {
    &self.table
  }

  /// Whether the non-terminal can derive the empty string. `None` if
  /// `nonterm` is not a non-terminal of the grammar.
  pub fn nullable(&self, nonterm: &str) -> Option<bool> {
    let id = self.grammar.nonterm_id(nonterm)?;
    Some(self.sets.is_nullable(id))
  }

  /// FIRST set of a non-terminal, terminals in declaration order.
  pub fn first(&self, nonterm: &str) -> Option<Vec<&str>> {
    let id = self.grammar.nonterm_id(nonterm)?;
    Some(self.names(self.sets.first(id)))
  }

  /// FIRST of a whitespace-separated string of symbols, and whether the
  /// string can derive the empty string. `None` if a name is not a symbol
  /// of the grammar.
  pub fn first_of(&self, symbols: &str) -> Option<(Vec<&str>, bool)> {
    let symbols = symbols.split_whitespace()
      .map(|name| self.grammar.symbol(name))
      .collect::<Option<Vec<_>>>()?;
    let (first, nullable) = self.sets.first_of(&symbols);
    Some((self.names(first.into_iter()), nullable))
  }

  /// FOLLOW set of a non-terminal, terminals in declaration order and `$`
  /// last for the end marker.
  pub fn follow(&self, nonterm: &str) -> Option<Vec<&str>> {
    let id = self.grammar.nonterm_id(nonterm)?;
    Some(self.names(self.sets.follow(id)))
  }

  /// Lookaheads with a table entry for the non-terminal.
  pub fn expected(&self, nonterm: &str) -> Option<Vec<&str>> {
    let id = self.grammar.nonterm_id(nonterm)?;
    Some(self.names(self.table.expected(id)))
  }

  fn names(&self, lookaheads: impl Iterator<Item = Lookahead>) -> Vec<&str> {
    lookaheads
      .map(|lookahead| lookahead.name(&self.grammar))
      .collect()
  }

  /// Parses the whole token stream and returns the result of the start
  /// symbol's semantic action.
  pub fn parse<S>(&self, mut tokens: S) -> Result<V, ParseError>
  where
    S: TokenStream<V>,
  {
    engine::run(&self.grammar, &self.table, &mut tokens, None)
  }

  /// Like `parse`, also returning the leftmost derivation: every applied
  /// production, in the order it was chosen.
  pub fn parse_traced<S>(&self, mut tokens: S) -> Result<(V, Vec<ProdId>), ParseError>
  where
    S: TokenStream<V>,
  {
    let mut derivation = vec![];
    let value = engine::run(&self.grammar, &self.table, &mut tokens, Some(&mut derivation))?;
    Ok((value, derivation))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::grammar::GrammarBuilder;
  use pretty_assertions::assert_eq;

  fn parser() -> Parser<()> {
    let grammar = GrammarBuilder::with_default_action(|_| ())
      .terminals(["+", "*", "(", ")", "id"])
      .rule("E", "T E'")
      .rule("E'", "+ T E'")
      .rule("E'", "")
      .rule("T", "F T'")
      .rule("T'", "* F T'")
      .rule("T'", "")
      .rule("F", "( E )")
      .rule("F", "id")
      .start("E")
      .build()
      .unwrap();
    Parser::new(grammar).unwrap()
  }

  #[test]
  fn sets_by_name() {
    let parser = parser();

    assert_eq!(parser.nullable("E"), Some(false));
    assert_eq!(parser.nullable("T'"), Some(true));
    assert_eq!(parser.nullable("id"), None);

    assert_eq!(parser.first("E"), Some(vec!["(", "id"]));
    assert_eq!(parser.first("E'"), Some(vec!["+"]));
    assert_eq!(parser.follow("E"), Some(vec![")", "$"]));
    assert_eq!(parser.follow("F"), Some(vec!["+", "*", ")", "$"]));
    assert_eq!(parser.follow("X"), None);
  }

  #[test]
  fn first_of_by_name() {
    let parser = parser();

    assert_eq!(parser.first_of("T' E'"), Some((vec!["+", "*"], true)));
    assert_eq!(parser.first_of("E' )"), Some((vec!["+", ")"], false)));
    assert_eq!(parser.first_of(""), Some((vec![], true)));
    assert_eq!(parser.first_of("E x"), None);
  }

  #[test]
  fn expected_by_name() {
    let parser = parser();

    assert_eq!(parser.expected("T'"), Some(vec!["+", "*", ")", "$"]));
    assert_eq!(parser.expected("F"), Some(vec!["(", "id"]));
  }

  #[test]
  fn lookahead_index() {
    assert_eq!(Lookahead::from_index(3, 3), Lookahead::End);
    assert_eq!(Lookahead::from_index(1, 3), Lookahead::Term(TermId(1)));
    assert_eq!(Lookahead::End.index(3), 3);
  }

  #[test]
  fn parser_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Parser<i64>>();
  }
}
