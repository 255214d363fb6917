use std::sync::Arc;
use indexmap::{IndexMap, IndexSet};
use crate::error::MalformedGrammarError;
use super::*;

struct RawProduction<V> {
  head: String,
  body: Vec<String>,
  action: Option<Action<V>>,
}

/// Collects symbols and productions, then validates them into a `Grammar`.
///
/// Production heads declare themselves as non-terminals; terminals must be
/// declared up front. The policy applied to productions without an action
/// is fixed when the builder is created.
pub struct GrammarBuilder<V> {
  terms: Vec<String>,
  nonterms: Vec<String>,
  prods: Vec<RawProduction<V>>,
  start: Option<String>,
  default_action: Action<V>,
}

impl<V> GrammarBuilder<V>
where
  V: From<Vec<V>> + 'static,
{
  /// A production without an action yields its child results as they are,
  /// through `V::from(children)`.
  pub fn new() -> Self {
    Self::with_default_action(V::from)
  }
}

impl<V> Default for GrammarBuilder<V>
where
  V: From<Vec<V>> + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<V> GrammarBuilder<V> {
  pub fn with_default_action(
    action: impl Fn(Vec<V>) -> V + Send + Sync + 'static,
  ) -> Self {
    Self {
      terms: vec![],
      nonterms: vec![],
      prods: vec![],
      start: None,
      default_action: Arc::new(action),
    }
  }

  pub fn default_action(
    mut self,
    action: impl Fn(Vec<V>) -> V + Send + Sync + 'static,
  ) -> Self {
    self.default_action = Arc::new(action);
    self
  }

  pub fn terminal(mut self, name: impl Into<String>) -> Self {
    self.terms.push(name.into());
    self
  }

  pub fn terminals<S: Into<String>>(
    mut self,
    names: impl IntoIterator<Item = S>,
  ) -> Self {
    self.terms.extend(names.into_iter().map(Into::into));
    self
  }

  /// Declares a non-terminal without giving it a production.
  pub fn nonterminal(mut self, name: impl Into<String>) -> Self {
    self.nonterms.push(name.into());
    self
  }

  pub fn nonterminals<S: Into<String>>(
    mut self,
    names: impl IntoIterator<Item = S>,
  ) -> Self {
    self.nonterms.extend(names.into_iter().map(Into::into));
    self
  }

  /// Adds `head -> body` with a semantic action. `body` is a
  /// whitespace-separated list of symbol names; a blank body is an epsilon
  /// production.
  pub fn production(
    self,
    head: impl Into<String>,
    body: &str,
    action: impl Fn(Vec<V>) -> V + Send + Sync + 'static,
  ) -> Self {
    self.add(head.into(), body, Some(Arc::new(action)))
  }

  /// Adds `head -> body` without a semantic action.
  pub fn rule(self, head: impl Into<String>, body: &str) -> Self {
    self.add(head.into(), body, None)
  }

  fn add(mut self, head: String, body: &str, action: Option<Action<V>>) -> Self {
    self.prods.push(RawProduction {
      head,
      body: body.split_whitespace().map(str::to_owned).collect(),
      action,
    });
    self
  }

  pub fn start(mut self, name: impl Into<String>) -> Self {
    self.start = Some(name.into());
    self
  }

  pub fn build(self) -> Result<Grammar<V>, MalformedGrammarError> {
    let start_name = self.start.ok_or(MalformedGrammarError::NoStart)?;

    let terms = self.terms.into_iter().collect::<IndexSet<_>>();

    let mut nonterms = IndexMap::<String, Vec<ProdId>>::new();
    let heads = self.prods.iter().map(|prod| &prod.head);
    for name in self.nonterms.iter().chain(heads) {
      if terms.contains(name) {
        return Err(if self.nonterms.contains(name) {
          MalformedGrammarError::DuplicateSymbol(name.clone())
        } else {
          MalformedGrammarError::TerminalHead(name.clone())
        });
      }
      nonterms.entry(name.clone()).or_default();
    }

    let start = match nonterms.get_index_of(&start_name) {
      Some(i) => NontermId(i as u32),
      None => return Err(MalformedGrammarError::UndeclaredStart(start_name)),
    };

    let mut prods = Vec::with_capacity(self.prods.len());
    for (i, raw) in self.prods.into_iter().enumerate() {
      let (nonterm_ix, _, alts) = match nonterms.get_full_mut(&raw.head) {
        Some(entry) => entry,
        None => unreachable!("production heads are declared above"),
      };
      alts.push(ProdId(i as u32));

      let symbols = raw.body.iter()
        .map(|name| {
          if let Some(ix) = terms.get_index_of(name) {
            Ok(Symbol::Term(TermId(ix as u32)))
          } else if let Some(ix) = nonterms.get_index_of(name) {
            Ok(Symbol::Nonterm(NontermId(ix as u32)))
          } else {
            Err(MalformedGrammarError::UndeclaredSymbol {
              head: raw.head.clone(),
              symbol: name.clone(),
            })
          }
        })
        .collect::<Result<Vec<_>, _>>()?;

      prods.push(Production {
        nonterm: NontermId(nonterm_ix as u32),
        symbols,
        action: raw.action,
      });
    }

    if let Some((name, _)) = nonterms.iter().find(|(_, alts)| alts.is_empty()) {
      return Err(MalformedGrammarError::NoProductions(name.clone()));
    }

    Ok(Grammar {
      terms,
      nonterms,
      prods,
      start,
      default_action: self.default_action,
    })
  }
}
