//! Terse grammar fixtures for unit tests.
//!
//! One `A -> x Y` production per line. Every name that appears as a head is
//! a non-terminal, every other name is a terminal, and the first head is the
//! start symbol. Productions carry no actions.

use indexmap::IndexSet;
use crate::grammar::{Grammar, GrammarBuilder};

pub(crate) fn grammar(text: &str) -> Grammar<()> {
  let rules = text.lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(|line| match line.split_once("->") {
      Some((head, body)) => (head.trim(), body),
      None => panic!("malformed production `{}`", line),
    })
    .collect::<Vec<_>>();

  let heads = rules.iter().map(|&(head, _)| head).collect::<IndexSet<_>>();
  let terms = rules.iter()
    .flat_map(|&(_, body)| body.split_whitespace())
    .filter(|name| !heads.contains(name))
    .collect::<IndexSet<_>>();

  let mut builder = GrammarBuilder::with_default_action(|_| ())
    .terminals(terms);
  for &(head, body) in &rules {
    builder = builder.rule(head, body);
  }
  builder
    .start(rules[0].0)
    .build()
    .unwrap()
}
