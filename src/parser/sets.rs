//! Nullability, FIRST and FOLLOW sets.
//!
//! Every set is computed by iterating over all productions until a full
//! pass changes nothing. Lookahead sets have one bit per terminal plus the
//! end-of-input bit at index `num_terms`.

use crate::grammar::{Grammar, NontermId, Symbol};
use super::Lookahead;
use super::bitset::BitSet;

/// Nullability, FIRST and FOLLOW of every non-terminal of a grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sets {
  pub(crate) num_terms: usize,
  /// indexed by non-terminal
  pub(crate) nullable: Vec<bool>,
  /// indexed by non-terminal, never contains the end bit
  pub(crate) first: Vec<BitSet>,
  /// indexed by non-terminal
  pub(crate) follow: Vec<BitSet>,
}

impl Sets {
  pub fn solve<V>(grammar: &Grammar<V>) -> Self {
    solve(grammar)
  }

  pub fn is_nullable(&self, nonterm: NontermId) -> bool {
    self.nullable[nonterm.index()]
  }

  /// Never yields `Lookahead::End`; nullability is tracked separately.
  pub fn first(&self, nonterm: NontermId) -> impl Iterator<Item = Lookahead> + '_ {
    self.lookaheads(&self.first[nonterm.index()])
  }

  pub fn follow(&self, nonterm: NontermId) -> impl Iterator<Item = Lookahead> + '_ {
    self.lookaheads(&self.follow[nonterm.index()])
  }

  /// FIRST of a string of symbols, and whether the whole string derives
  /// the empty string. The empty string has no terminals and is nullable.
  pub fn first_of(&self, symbols: &[Symbol]) -> (Vec<Lookahead>, bool) {
    let mut buf = BitSet::new(self.num_terms + 1);
    let nullable = compute_first_for_symbols(&mut buf, &self.first, &self.nullable, symbols);
    let first = self.lookaheads(&buf).collect();
    (first, nullable)
  }

  fn lookaheads<'a>(&self, set: &'a BitSet) -> impl Iterator<Item = Lookahead> + 'a {
    let num_terms = self.num_terms;
    set.iter().map(move |ix| Lookahead::from_index(ix, num_terms))
  }
}

pub(crate) fn solve<V>(grammar: &Grammar<V>) -> Sets {
  let nullable = gen_nullable(grammar);
  let first = gen_first(grammar, &nullable);
  let follow = gen_follow(grammar, &nullable, &first);

  Sets {
    num_terms: grammar.num_terms(),
    nullable,
    first,
    follow,
  }
}

pub(super) fn gen_nullable<V>(
  grammar: &Grammar<V>,
) -> Vec<bool> {
  let mut nullable = vec![false; grammar.num_nonterms()];

  let mut passes = 0;
  loop {
    passes += 1;
    let mut changed = false;
    for prod in &grammar.prods {
      let nt_ix = prod.nonterm.index();
      if !nullable[nt_ix] && prod.symbols.iter().all(|sym| is_nullable(&nullable, sym)) {
        nullable[nt_ix] = true;
        changed = true;
      }
    }
    if !changed {
      break;
    }
  }

  log::debug!("nullable converged after {} passes", passes);
  nullable
}

fn is_nullable(nullable: &[bool], sym: &Symbol) -> bool {
  match sym {
    Symbol::Term(_) => false,
    Symbol::Nonterm(id) => nullable[id.index()],
  }
}

pub(super) fn gen_first<V>(
  grammar: &Grammar<V>,
  nullable: &[bool],
) -> Vec<BitSet> {
  let mut buf = BitSet::new(grammar.num_terms() + 1);
  let mut first = vec![buf.clone(); grammar.num_nonterms()];

  let mut passes = 0;
  loop {
    passes += 1;
    let mut changed = false;
    for prod in &grammar.prods {
      buf.clear();
      compute_first_for_symbols(&mut buf, &first, nullable, &prod.symbols);
      changed |= first[prod.nonterm.index()].union_with(&buf);
    }
    if !changed {
      break;
    }
  }

  log::debug!("FIRST converged after {} passes", passes);
  first
}

pub(super) fn gen_follow<V>(
  grammar: &Grammar<V>,
  nullable: &[bool],
  first: &[BitSet],
) -> Vec<BitSet> {
  let end = grammar.num_terms();
  let mut buf = BitSet::new(end + 1);
  let mut follow = vec![buf.clone(); grammar.num_nonterms()];
  follow[grammar.start().index()].insert(end);

  let mut passes = 0;
  loop {
    passes += 1;
    let mut changed = false;
    for prod in &grammar.prods {
      let head = prod.nonterm.index();
      for (i, sym) in prod.symbols.iter().enumerate() {
        let id = match sym {
          Symbol::Term(_) => continue,
          Symbol::Nonterm(id) => id.index(),
        };

        buf.clear();
        let rest_nullable = compute_first_for_symbols(
          &mut buf, first, nullable, &prod.symbols[i + 1..]);
        if rest_nullable && id != head {
          buf.union_with(&follow[head]);
        }
        changed |= follow[id].union_with(&buf);
      }
    }
    if !changed {
      break;
    }
  }

  log::debug!("FOLLOW converged after {} passes", passes);
  follow
}

/// Adds FIRST(symbols) to `result`; returns whether `symbols` is nullable.
pub(crate) fn compute_first_for_symbols(
  result: &mut BitSet,
  first: &[BitSet],
  nullable: &[bool],
  symbols: &[Symbol],
) -> bool {
  for sym in symbols {
    match sym {
      Symbol::Term(id) => {
        result.insert(id.index());
        return false;
      }
      Symbol::Nonterm(id) => {
        result.union_with(&first[id.index()]);
        if !nullable[id.index()] {
          return false;
        }
      }
    }
  }

  true
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::bnf;
  use crate::grammar::Grammar;
  use pretty_assertions::assert_eq;

  fn names(grammar: &Grammar<()>, set: &BitSet) -> Vec<String> {
    set.iter()
      .map(|ix| match grammar.terms().nth(ix) {
        Some((_, name)) => name.to_owned(),
        None => "$".to_owned(),
      })
      .collect()
  }

  fn simple() -> Grammar<()> {
    bnf::grammar(r#"
      Z -> d
      Z -> X Y Z
      Y ->
      Y -> c
      X -> Y
      X -> a
    "#)
  }

  /// Aho et al. grammar 4.28
  fn expr() -> Grammar<()> {
    bnf::grammar(r#"
      E -> T E'
      E' -> + T E'
      E' ->
      T -> F T'
      T' -> * F T'
      T' ->
      F -> ( E )
      F -> id
    "#)
  }

  #[test]
  fn simple_nullable() {
    let nullable = gen_nullable(&simple());
    assert_eq!(nullable, vec![false, true, true]);
  }

  #[test]
  fn simple_first() {
    let grammar = simple();
    let sets = solve(&grammar);

    let first = sets.first.iter()
      .map(|set| names(&grammar, set))
      .collect::<Vec<_>>();
    assert_eq!(first, vec![
      vec!["d", "c", "a"],
      vec!["c"],
      vec!["c", "a"],
    ]);
  }

  #[test]
  fn simple_follow() {
    let grammar = simple();
    let sets = solve(&grammar);

    let follow = sets.follow.iter()
      .map(|set| names(&grammar, set))
      .collect::<Vec<_>>();
    assert_eq!(follow, vec![
      vec!["$"],
      vec!["d", "c", "a"],
      vec!["d", "c", "a"],
    ]);
  }

  #[test]
  fn expr_sets() {
    let grammar = expr();
    let sets = solve(&grammar);
    let render = |sets: &[BitSet]| sets.iter()
      .map(|set| names(&grammar, set).join(" "))
      .collect::<Vec<_>>();

    assert_eq!(sets.nullable, vec![false, true, false, true, false]);
    assert_eq!(render(&sets.first[..]), vec!["( id", "+", "( id", "*", "( id"]);
    assert_eq!(render(&sets.follow[..]), vec![") $", ") $", "+ ) $", "+ ) $", "+ * ) $"]);
  }

  #[test]
  fn nullability_is_transitive() {
    let grammar = bnf::grammar(r#"
      A -> B C
      B -> C
      C -> D
      D ->
      D -> x
    "#);

    assert_eq!(gen_nullable(&grammar), vec![true, true, true, true]);
  }

  #[test]
  fn left_recursion_converges() {
    let grammar = bnf::grammar(r#"
      S -> S a
      S -> b
    "#);
    let sets = solve(&grammar);

    assert_eq!(names(&grammar, &sets.first[0]), vec!["b"]);
    assert_eq!(names(&grammar, &sets.follow[0]), vec!["a", "$"]);
  }

  #[test]
  fn first_of_symbol_strings() {
    let grammar = expr();
    let sets = solve(&grammar);
    let first_of = |names: &[&str]| {
      let symbols = names.iter()
        .map(|name| grammar.symbol(name).unwrap())
        .collect::<Vec<_>>();
      let (first, nullable) = sets.first_of(&symbols);
      let first = first.into_iter()
        .map(|lookahead| lookahead.name(&grammar).to_owned())
        .collect::<Vec<_>>();
      (first, nullable)
    };

    assert_eq!(first_of(&["T'", "E'"]), (vec!["+".to_owned(), "*".to_owned()], true));
    assert_eq!(first_of(&["T'", ")"]), (vec!["*".to_owned(), ")".to_owned()], false));
    assert_eq!(first_of(&["id", "E'"]), (vec!["id".to_owned()], false));
    assert_eq!(first_of(&[]), (vec![], true));
  }
}
