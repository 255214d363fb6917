use std::fmt::{self, Display, Formatter};
use crate::error::{Conflict, ConflictKind, GrammarConflictError};
use crate::grammar::{Grammar, NontermId, ProdId};
use super::Lookahead;
use super::bitset::BitSet;
use super::sets::{Sets, compute_first_for_symbols};

/// LL(1) parse table: (non-terminal, lookahead) -> production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTable {
  num_terms: usize,
  /// row-major, one row of `num_terms + 1` cells per non-terminal
  cells: Box<[Option<ProdId>]>,
}

#[derive(Clone, Copy)]
struct Cell {
  prod: ProdId,
  from_follow: bool,
}

pub(super) fn gen_table<V>(
  grammar: &Grammar<V>,
  sets: &Sets,
) -> Result<ParseTable, GrammarConflictError> {
  let num_terms = grammar.num_terms();
  let width = num_terms + 1;
  let mut cells: Vec<Option<Cell>> = vec![None; grammar.num_nonterms() * width];
  let mut conflicts = vec![];
  let mut buf = BitSet::new(width);

  for (nonterm, _) in grammar.nonterms() {
    let row = nonterm.index() * width;
    for (prod, production) in grammar.productions(nonterm) {
      buf.clear();
      let nullable = compute_first_for_symbols(
        &mut buf, &sets.first, &sets.nullable, production.body());

      let follow = &sets.follow[nonterm.index()];
      let predicted = buf.iter()
        .map(|ix| (ix, false))
        .chain(follow.iter().filter(|_| nullable).map(|ix| (ix, true)));

      for (ix, from_follow) in predicted {
        let cell = &mut cells[row + ix];
        match *cell {
          None => {
            *cell = Some(Cell {
              prod,
              from_follow,
            });
          }
          Some(existing) if existing.prod == prod => {}
          Some(existing) => {
            let kind = if existing.from_follow || from_follow {
              ConflictKind::FirstFollow
            } else {
              ConflictKind::FirstFirst
            };
            conflicts.push(Conflict {
              kind,
              nonterm: grammar.nonterm_name(nonterm).to_owned(),
              lookahead: Lookahead::from_index(ix, num_terms)
                .name(grammar)
                .to_owned(),
              existing: grammar.display(existing.prod).to_string(),
              competing: grammar.display(prod).to_string(),
              existing_prod: existing.prod,
              competing_prod: prod,
            });
          }
        }
      }
    }
  }

  if !conflicts.is_empty() {
    log::debug!("parse table has {} conflicts", conflicts.len());
    return Err(GrammarConflictError {
      conflicts,
    });
  }

  let cells = cells.into_iter()
    .map(|cell| cell.map(|cell| cell.prod))
    .collect::<Box<[_]>>();
  log::debug!("parse table built with {} entries",
    cells.iter().filter(|cell| cell.is_some()).count());

  Ok(ParseTable {
    num_terms,
    cells,
  })
}

impl ParseTable {
  /// Empty for a non-terminal outside the table.
  fn row(&self, nonterm: NontermId) -> &[Option<ProdId>] {
    let width = self.num_terms + 1;
    let start = nonterm.index() * width;
    self.cells.get(start..start + width).unwrap_or(&[])
  }

  /// `None` for an empty cell, and for ids the table has no cell for.
  pub fn get(&self, nonterm: NontermId, lookahead: Lookahead) -> Option<ProdId> {
    if let Lookahead::Term(id) = lookahead {
      if id.index() >= self.num_terms {
        return None;
      }
    }
    self.row(nonterm)
      .get(lookahead.index(self.num_terms))
      .copied()
      .flatten()
  }

  /// Lookaheads with an entry for `nonterm`, terminals in declaration order
  /// and the end marker last.
  pub fn expected(&self, nonterm: NontermId) -> impl Iterator<Item = Lookahead> + '_ {
    let num_terms = self.num_terms;
    self.row(nonterm).iter()
      .enumerate()
      .filter(|(_, cell)| cell.is_some())
      .map(move |(ix, _)| Lookahead::from_index(ix, num_terms))
  }

  /// Renders the defined entries, one line per cell, grouped by
  /// non-terminal.
  pub fn display<'a, V>(&'a self, grammar: &'a Grammar<V>) -> TableDisplay<'a, V> {
    TableDisplay {
      table: self,
      grammar,
    }
  }
}

pub struct TableDisplay<'a, V> {
  table: &'a ParseTable,
  grammar: &'a Grammar<V>,
}

impl<'a, V> Display for TableDisplay<'a, V> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    for (nonterm, name) in self.grammar.nonterms() {
      writeln!(f, "{}:", name)?;
      for lookahead in self.table.expected(nonterm) {
        if let Some(prod) = self.table.get(nonterm, lookahead) {
          writeln!(f, "  {} => {}",
            lookahead.name(self.grammar), self.grammar.display(prod))?;
        }
      }
    }
    Ok(())
  }
}
