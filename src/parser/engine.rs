//! Table-driven LL(1) parsing.
//!
//! The derivation is driven by an explicit stack of frames instead of the
//! native call stack. A frame is a production being matched: `next` is the
//! index of the body symbol to process and `children` holds the results of
//! the symbols before it. The top frame is kept out of the stack in
//! `frame`; its parents wait in `stack`.

use std::iter;
use crate::error::{ParseError, SyntaxError, TrailingInputError};
use crate::grammar::{Grammar, NontermId, ProdId, Symbol};
use crate::token::{Position, Token, TokenStream};
use super::{Lookahead, ParseTable};

struct Frame<V> {
  prod: ProdId,
  next: usize,
  children: Vec<V>,
}

impl<V> Frame<V> {
  fn new(grammar: &Grammar<V>, prod: ProdId) -> Self {
    Frame {
      prod,
      next: 0,
      children: Vec::with_capacity(grammar.production(prod).body().len()),
    }
  }
}

pub(super) fn run<V, S>(
  grammar: &Grammar<V>,
  table: &ParseTable,
  tokens: &mut S,
  mut derivation: Option<&mut Vec<ProdId>>,
) -> Result<V, ParseError>
where
  S: TokenStream<V> + ?Sized,
{
  let mut last_pos = None;
  let start = expand(grammar, table, tokens, grammar.start(), last_pos)?;
  if let Some(derivation) = derivation.as_mut() {
    derivation.push(start);
  }
  let mut frame = Frame::new(grammar, start);
  let mut stack: Vec<Frame<V>> = vec![];

  let value = loop {
    match grammar.production(frame.prod).body().get(frame.next).copied() {
      Some(Symbol::Term(term)) => {
        if lookahead(grammar, tokens.peek()) != Some(Lookahead::Term(term)) {
          let expected = iter::once(Lookahead::Term(term));
          return Err(syntax_error(grammar, tokens.peek(), last_pos, expected));
        }
        match tokens.advance() {
          Some(token) => {
            log::trace!("Match {} at {}", token.kind, token.pos);
            last_pos = Some(token.pos);
            frame.children.push(token.value);
            frame.next += 1;
          }
          None => {
            let expected = iter::once(Lookahead::Term(term));
            return Err(syntax_error(grammar, None, last_pos, expected));
          }
        }
      }

      Some(Symbol::Nonterm(nonterm)) => {
        let prod = expand(grammar, table, tokens, nonterm, last_pos)?;
        if let Some(derivation) = derivation.as_mut() {
          derivation.push(prod);
        }
        let parent = std::mem::replace(&mut frame, Frame::new(grammar, prod));
        stack.push(parent);
      }

      None => {
        log::trace!("Reduce {}", grammar.display(frame.prod));
        let value = grammar.reduce(frame.prod, frame.children);
        match stack.pop() {
          Some(parent) => {
            frame = parent;
            frame.children.push(value);
            frame.next += 1;
          }
          None => break value,
        }
      }
    }
  };

  if let Some(token) = tokens.peek() {
    return Err(TrailingInputError {
      found: token.kind.clone(),
      pos: token.pos,
    }.into());
  }

  log::trace!("Accept");
  Ok(value)
}

/// Chooses the production for `nonterm` from the current lookahead without
/// consuming it.
fn expand<V, S>(
  grammar: &Grammar<V>,
  table: &ParseTable,
  tokens: &mut S,
  nonterm: NontermId,
  last_pos: Option<Position>,
) -> Result<ProdId, ParseError>
where
  S: TokenStream<V> + ?Sized,
{
  let prod = lookahead(grammar, tokens.peek())
    .and_then(|lookahead| table.get(nonterm, lookahead));
  match prod {
    Some(prod) => {
      log::trace!("Expand {}", grammar.display(prod));
      Ok(prod)
    }
    None => Err(syntax_error(grammar, tokens.peek(), last_pos, table.expected(nonterm))),
  }
}

/// `None` when the token kind is not a terminal of the grammar.
fn lookahead<V>(grammar: &Grammar<V>, token: Option<&Token<V>>) -> Option<Lookahead> {
  match token {
    Some(token) => grammar.term_id(&token.kind).map(Lookahead::Term),
    None => Some(Lookahead::End),
  }
}

/// At end of input the error points at the last consumed token, if any.
fn syntax_error<V>(
  grammar: &Grammar<V>,
  found: Option<&Token<V>>,
  last_pos: Option<Position>,
  expected: impl Iterator<Item = Lookahead>,
) -> ParseError {
  let err = SyntaxError {
    found: found.map(|token| token.kind.clone()),
    pos: found.map(|token| token.pos).or(last_pos),
    expected: expected.map(|lookahead| lookahead.name(grammar).to_owned()).collect(),
  };
  log::trace!("{}", err);
  err.into()
}
