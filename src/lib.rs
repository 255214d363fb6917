//! An LL(1) parser generator.
//!
//! A [`Grammar`] is built with a [`GrammarBuilder`], compiled into a
//! [`Parser`] (nullability, FIRST/FOLLOW sets and the parse table), and the
//! parser then runs semantic actions over any [`TokenStream`].
//!
//! ```
//! use jiexi::{GrammarBuilder, Position, Token};
//!
//! let grammar = GrammarBuilder::<i64>::with_default_action(|_| 0)
//!   .terminals(["num", "+"])
//!   .production("E", "num E'", |v| v[0] + v[1])
//!   .production("E'", "+ num E'", |v| v[1] + v[2])
//!   .production("E'", "", |_| 0)
//!   .start("E")
//!   .build()
//!   .unwrap();
//! let parser = jiexi::build(grammar).unwrap();
//!
//! let tokens = vec![
//!   Token::new("num", 3, Position::new(1, 1)),
//!   Token::new("+", 0, Position::new(1, 3)),
//!   Token::new("num", 4, Position::new(1, 5)),
//! ];
//! assert_eq!(parser.parse(tokens.into_iter().peekable()), Ok(7));
//! ```

pub mod error;
pub mod grammar;
pub mod parser;
pub mod token;
#[cfg(test)]
mod bnf;

pub use error::{
  Conflict, ConflictKind, Error, GrammarConflictError, MalformedGrammarError,
  ParseError, SyntaxError, TrailingInputError,
};
pub use grammar::{Action, Grammar, GrammarBuilder, NontermId, ProdId, Symbol, TermId};
pub use parser::{Lookahead, ParseTable, Parser, Sets};
pub use token::{Position, Token, TokenStream};

pub fn build<V>(grammar: Grammar<V>) -> Result<Parser<V>, GrammarConflictError> {
  Parser::new(grammar)
}
