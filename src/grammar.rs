use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;
use indexmap::{IndexMap, IndexSet};

mod builder;

pub use builder::GrammarBuilder;

/// Semantic action: folds the results of a production's children, in body
/// order, into one result.
pub type Action<V> = Arc<dyn Fn(Vec<V>) -> V + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NontermId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProdId(pub(crate) u32);

impl TermId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl NontermId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

impl ProdId {
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
  Term(TermId),
  Nonterm(NontermId),
}

pub struct Production<V> {
  pub(crate) nonterm: NontermId,
  pub(crate) symbols: Vec<Symbol>,
  pub(crate) action: Option<Action<V>>,
}

impl<V> Production<V> {
  pub fn head(&self) -> NontermId {
    self.nonterm
  }

  /// Empty for an epsilon production.
  pub fn body(&self) -> &[Symbol] {
    &self.symbols
  }

  pub fn has_action(&self) -> bool {
    self.action.is_some()
  }
}

impl<V> Clone for Production<V> {
  fn clone(&self) -> Self {
    Self {
      nonterm: self.nonterm,
      symbols: self.symbols.clone(),
      action: self.action.clone(),
    }
  }
}

impl<V> Debug for Production<V> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.debug_struct("Production")
      .field("nonterm", &self.nonterm)
      .field("symbols", &self.symbols)
      .field("action", &self.action.is_some())
      .finish()
  }
}

/// An immutable, validated context-free grammar.
///
/// Symbols are referred to by id everywhere; productions of a non-terminal
/// are listed in declaration order.
pub struct Grammar<V> {
  pub(crate) terms: IndexSet<String>,
  /// non-terminal name -> its productions, non-empty
  pub(crate) nonterms: IndexMap<String, Vec<ProdId>>,
  pub(crate) prods: Vec<Production<V>>,
  pub(crate) start: NontermId,
  pub(crate) default_action: Action<V>,
}

impl<V> Grammar<V> {
  pub fn start(&self) -> NontermId {
    self.start
  }

  pub fn num_terms(&self) -> usize {
    self.terms.len()
  }

  pub fn num_nonterms(&self) -> usize {
    self.nonterms.len()
  }

  pub fn terms(&self) -> impl Iterator<Item = (TermId, &str)> + '_ {
    self.terms.iter()
      .enumerate()
      .map(|(i, name)| (TermId(i as u32), name.as_str()))
  }

  /// Non-terminals in declaration order.
  pub fn nonterms(&self) -> impl Iterator<Item = (NontermId, &str)> + '_ {
    self.nonterms.keys()
      .enumerate()
      .map(|(i, name)| (NontermId(i as u32), name.as_str()))
  }

  pub fn term_id(&self, name: &str) -> Option<TermId> {
    self.terms.get_index_of(name).map(|i| TermId(i as u32))
  }

  pub fn nonterm_id(&self, name: &str) -> Option<NontermId> {
    self.nonterms.get_index_of(name).map(|i| NontermId(i as u32))
  }

  pub fn symbol(&self, name: &str) -> Option<Symbol> {
    self.term_id(name).map(Symbol::Term)
      .or_else(|| self.nonterm_id(name).map(Symbol::Nonterm))
  }

  pub fn is_terminal(&self, name: &str) -> bool {
    self.terms.contains(name)
  }

  pub fn is_nonterminal(&self, name: &str) -> bool {
    self.nonterms.contains_key(name)
  }

  /// Panics if `id` was not issued by this grammar.
  pub fn term_name(&self, id: TermId) -> &str {
    &self.terms[id.index()]
  }

  /// Panics if `id` was not issued by this grammar.
  pub fn nonterm_name(&self, id: NontermId) -> &str {
    match self.nonterms.get_index(id.index()) {
      Some((name, _)) => name,
      None => panic!("non-terminal {:?} out of range", id),
    }
  }

  pub fn symbol_name(&self, sym: Symbol) -> &str {
    match sym {
      Symbol::Term(id) => self.term_name(id),
      Symbol::Nonterm(id) => self.nonterm_name(id),
    }
  }

  /// Panics if `id` was not issued by this grammar.
  pub fn production(&self, id: ProdId) -> &Production<V> {
    &self.prods[id.index()]
  }

  /// Alternatives of a non-terminal, in declaration order. Panics if
  /// `nonterm` was not issued by this grammar.
  pub fn productions(
    &self,
    nonterm: NontermId,
  ) -> impl Iterator<Item = (ProdId, &Production<V>)> + '_ {
    self.nonterms[nonterm.index()].iter()
      .map(move |&id| (id, &self.prods[id.index()]))
  }

  /// All productions, grouped by head in declaration order.
  pub fn all_productions(&self) -> impl Iterator<Item = (ProdId, &Production<V>)> + '_ {
    self.nonterms.values()
      .flatten()
      .map(move |&id| (id, &self.prods[id.index()]))
  }

  /// Renders a production as `A -> x y`, or `A -> ε` for an empty body.
  pub fn display(&self, id: ProdId) -> ProductionDisplay<'_, V> {
    ProductionDisplay {
      grammar: self,
      id,
    }
  }

  /// Runs the production's action, or the default action when it has none.
  pub(crate) fn reduce(&self, id: ProdId, children: Vec<V>) -> V {
    match &self.prods[id.index()].action {
      Some(action) => action(children),
      None => (self.default_action)(children),
    }
  }
}

impl<V> Clone for Grammar<V> {
  fn clone(&self) -> Self {
    Self {
      terms: self.terms.clone(),
      nonterms: self.nonterms.clone(),
      prods: self.prods.clone(),
      start: self.start,
      default_action: self.default_action.clone(),
    }
  }
}

impl<V> Debug for Grammar<V> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.debug_struct("Grammar")
      .field("terms", &self.terms)
      .field("nonterms", &self.nonterms)
      .field("prods", &self.prods)
      .field("start", &self.start)
      .finish()
  }
}

pub struct ProductionDisplay<'a, V> {
  grammar: &'a Grammar<V>,
  id: ProdId,
}

impl<'a, V> Display for ProductionDisplay<'a, V> {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let prod = self.grammar.production(self.id);
    write!(f, "{} ->", self.grammar.nonterm_name(prod.nonterm))?;
    if prod.symbols.is_empty() {
      return write!(f, " ε");
    }
    for &sym in &prod.symbols {
      write!(f, " {}", self.grammar.symbol_name(sym))?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn expr() -> Grammar<i64> {
    GrammarBuilder::<i64>::with_default_action(|_| 0)
      .terminals(["plus", "num"])
      .production("E", "num E'", |v| v[0] + v[1])
      .production("E'", "plus num E'", |v| v[1] + v[2])
      .rule("E'", "")
      .start("E")
      .build()
      .unwrap()
  }

  #[test]
  fn structural_queries() {
    let grammar = expr();

    assert_eq!(grammar.num_terms(), 2);
    assert_eq!(
      grammar.nonterms().map(|(_, name)| name).collect::<Vec<_>>(),
      vec!["E", "E'"],
    );
    assert!(grammar.is_terminal("num"));
    assert!(!grammar.is_terminal("E"));
    assert!(grammar.is_nonterminal("E'"));
    assert_eq!(grammar.symbol("plus"), Some(Symbol::Term(TermId(0))));
    assert_eq!(grammar.symbol("E'"), Some(Symbol::Nonterm(NontermId(1))));
    assert_eq!(grammar.symbol("x"), None);
    assert_eq!(grammar.nonterm_name(grammar.start()), "E");

    let e_prime = grammar.nonterm_id("E'").unwrap();
    let alts = grammar.productions(e_prime)
      .map(|(id, _)| grammar.display(id).to_string())
      .collect::<Vec<_>>();
    assert_eq!(alts, vec!["E' -> plus num E'", "E' -> ε"]);
  }

  #[test]
  fn reduce_falls_back_to_default_action() {
    let grammar = expr();
    let e_prime = grammar.nonterm_id("E'").unwrap();
    let (with_action, without_action) = {
      let mut alts = grammar.productions(e_prime).map(|(id, _)| id);
      (alts.next().unwrap(), alts.next().unwrap())
    };

    assert!(grammar.production(with_action).has_action());
    assert!(!grammar.production(without_action).has_action());
    assert_eq!(grammar.reduce(with_action, vec![0, 4, 5]), 9);
    assert_eq!(grammar.reduce(without_action, vec![]), 0);
  }

  #[test]
  #[should_panic(expected = "out of range")]
  fn nonterm_name_rejects_foreign_id() {
    expr().nonterm_name(NontermId(7));
  }

  #[test]
  #[should_panic]
  fn term_name_rejects_foreign_id() {
    expr().term_name(TermId(7));
  }
}
