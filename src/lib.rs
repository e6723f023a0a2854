//! truthtree - semantic tableaux for first-order logic
//!
//! Builds truth trees incrementally from signed formulas (a formula together
//! with the truth value it is assumed to have). Each step develops one node
//! by the rule for its connective or quantifier, appending the results below
//! every open leaf the node dominates, and then checks the affected branches
//! for contradictions. Steps can be undone with [`Tableau::remove`].
//!
//! # Modules
//!
//! - [`formula`] - immutable first-order formulas and terms
//! - [`tree`] - the tableau arena, rules, term allocation, closure, removal
//! - [`prover`] - an automatic driver that develops a tree to completion
//! - [`problem`] - JSON problem documents
//! - [`config`] - TOML configuration with environment overrides
//! - [`error`] - structured errors
//!
//! # Example
//!
//! ```
//! use truthtree::{Formula, Tableau, TableauProver};
//!
//! // forall x. (P(x) -> Q(x)), P(a), ~Q(a)
//! let rule = Formula::forall(
//!     "x",
//!     Formula::implies(Formula::atom("P", &["x"]), Formula::atom("Q", &["x"])),
//! );
//! let mut tree = Tableau::new(rule, true);
//! tree.assume(Formula::atom("P", &["a"]), true).unwrap();
//! tree.assume(Formula::atom("Q", &["a"]), false).unwrap();
//!
//! let result = TableauProver::default().prove(&mut tree).unwrap();
//! assert!(result.is_closed());
//! ```

pub mod config;
pub mod error;
pub mod formula;
pub mod problem;
pub mod prover;
pub mod tree;

pub use config::TruthTreeConfig;
pub use error::{ErrorCode, Result, TreeError};
pub use formula::{Atom, Formula, Predicate, Term};
pub use problem::{Premise, Problem};
pub use prover::{ProverConfig, TableauProver, TableauResult};
pub use tree::{NodeId, NodeType, Tableau, TreeNode, TreeOptions, TreeSnapshot};
