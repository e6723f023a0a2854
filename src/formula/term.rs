//! Terms, predicates and atoms
//!
//! Terms are flat identifiers. The tableau makes no syntactic distinction
//! between variables and constants: an identifier is a variable exactly where
//! a quantifier binds it, and a constant everywhere else.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A term identifier (variable or constant)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(String);

impl Term {
    pub fn new(name: impl Into<String>) -> Self {
        Term(name.into())
    }

    /// Create a term named `<prefix><index>`
    pub fn indexed(prefix: &str, index: usize) -> Self {
        Term(format!("{}{}", prefix, index))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::new(name)
    }
}

impl From<String> for Term {
    fn from(name: String) -> Self {
        Term(name)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A predicate symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Predicate {
    /// Predicate name
    pub name: String,
    /// Arity
    pub arity: usize,
}

impl Predicate {
    pub fn new(name: &str, arity: usize) -> Self {
        Predicate {
            name: name.to_string(),
            arity,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

/// An atomic formula (predicate applied to terms)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    /// The predicate
    pub predicate: Predicate,
    /// The arguments
    pub args: Vec<Term>,
}

impl Atom {
    pub fn new(name: &str, args: Vec<Term>) -> Self {
        Atom {
            predicate: Predicate::new(name, args.len()),
            args,
        }
    }

    /// A zero-arity atom (sentence letter)
    pub fn proposition(name: &str) -> Self {
        Atom::new(name, Vec::new())
    }

    /// Replace every argument equal to `var` with `term`
    pub fn substitute(&self, var: &Term, term: &Term) -> Atom {
        Atom {
            predicate: self.predicate.clone(),
            args: self
                .args
                .iter()
                .map(|a| if a == var { term.clone() } else { a.clone() })
                .collect(),
        }
    }

    pub fn mentions(&self, term: &Term) -> bool {
        self.args.iter().any(|a| a == term)
    }
}
