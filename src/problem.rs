//! Problem documents
//!
//! A problem is a list of signed premises, optionally followed by a
//! conclusion. The conclusion is asserted false, so a closed tree means the
//! argument is valid.
//!
//! ```json
//! {
//!   "premises": [
//!     { "formula": { "Forall": ["x", { "Atom": { "predicate": { "name": "P", "arity": 1 }, "args": ["x"] } }] } },
//!     { "formula": { "Atom": { "predicate": { "name": "P", "arity": 1 }, "args": ["a"] } }, "value": false }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TreeError};
use crate::formula::Formula;
use crate::tree::{Tableau, TreeOptions};

fn default_true() -> bool {
    true
}

/// A formula with the truth value it is assumed to have
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Premise {
    pub formula: Formula,
    #[serde(default = "default_true")]
    pub value: bool,
}

impl Premise {
    pub fn new(formula: Formula, value: bool) -> Self {
        Premise { formula, value }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub premises: Vec<Premise>,
    /// Asserted false after every premise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<Formula>,
}

impl Problem {
    /// An argument from `premises` to `conclusion`
    pub fn argument(premises: Vec<Formula>, conclusion: Formula) -> Self {
        Problem {
            premises: premises.into_iter().map(|f| Premise::new(f, true)).collect(),
            conclusion: Some(conclusion),
        }
    }

    pub fn from_json(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(TreeError::empty_input("problem"));
        }
        let problem: Problem = serde_json::from_str(input)?;
        problem.validate()?;
        Ok(problem)
    }

    /// All signed formulas in the order they enter the tree
    pub fn signed_formulas(&self) -> Vec<(Formula, bool)> {
        let mut all: Vec<(Formula, bool)> = self
            .premises
            .iter()
            .map(|p| (p.formula.clone(), p.value))
            .collect();
        if let Some(conclusion) = &self.conclusion {
            all.push((conclusion.clone(), false));
        }
        all
    }

    pub fn validate(&self) -> Result<()> {
        if self.premises.is_empty() && self.conclusion.is_none() {
            return Err(TreeError::empty_input("premises"));
        }
        for (index, (formula, _)) in self.signed_formulas().iter().enumerate() {
            check_arities(formula).map_err(|e| e.with_context("premise", index.to_string()))?;
        }
        Ok(())
    }

    /// Build the initial tree and run the closure checker once over it
    pub fn into_tableau(&self, options: TreeOptions) -> Result<Tableau> {
        self.validate()?;
        let mut signed = self.signed_formulas().into_iter();
        let (first, value) = signed
            .next()
            .ok_or_else(|| TreeError::empty_input("premises"))?;

        let mut tree = Tableau::with_options(first, value, options);
        for (formula, value) in signed {
            tree.assume(formula, value)?;
        }
        let root = tree.root();
        let closed = tree.check_closed(root)?;
        debug!(nodes = tree.node_count(), closed, "problem loaded");
        Ok(tree)
    }
}

fn check_arities(formula: &Formula) -> Result<()> {
    match formula {
        Formula::Atom(atom) => {
            if atom.predicate.arity != atom.args.len() {
                return Err(TreeError::invalid_input(format!(
                    "predicate {} applied to {} arguments",
                    atom.predicate,
                    atom.args.len()
                )));
            }
            Ok(())
        }
        Formula::Not(f) | Formula::Forall(_, f) | Formula::Exists(_, f) => check_arities(f),
        Formula::And(a, b) | Formula::Or(a, b) | Formula::Implies(a, b) | Formula::Iff(a, b) => {
            check_arities(a)?;
            check_arities(b)
        }
    }
}
