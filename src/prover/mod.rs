//! Automatic tree construction
//!
//! [`TableauProver`] drives a [`Tableau`] to completion by repeatedly
//! developing worklist nodes. Non-reusable nodes are developed in worklist
//! order first. Once only reusable (universal or false existential) nodes
//! remain, the first one that can still produce a new instance is developed
//! and then moved to the back of the worklist, so every reusable node gets
//! its turn.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::tree::{NodeId, Tableau};

/// Limits for the automatic prover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// Maximum number of develop steps
    pub max_steps: usize,
    /// Maximum number of live nodes
    pub max_nodes: usize,
    /// Maximum instantiations of a single reusable node
    pub max_gamma_instances: usize,
}

impl Default for ProverConfig {
    fn default() -> Self {
        ProverConfig {
            max_steps: 10000,
            max_nodes: 10000,
            max_gamma_instances: 5,
        }
    }
}

/// Outcome of running the prover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TableauResult {
    /// Every branch closed: the premises are jointly unsatisfiable
    Closed { steps: usize, nodes: usize },
    /// Fully developed with open branches remaining
    Open { steps: usize, open_branches: usize },
    /// A resource limit was reached first
    Unknown { steps: usize, reason: String },
}

impl TableauResult {
    pub fn is_closed(&self) -> bool {
        matches!(self, TableauResult::Closed { .. })
    }

    pub fn is_open(&self) -> bool {
        matches!(self, TableauResult::Open { .. })
    }

    pub fn steps(&self) -> usize {
        match self {
            TableauResult::Closed { steps, .. }
            | TableauResult::Open { steps, .. }
            | TableauResult::Unknown { steps, .. } => *steps,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableauProver {
    config: ProverConfig,
}

impl TableauProver {
    pub fn new(config: ProverConfig) -> Self {
        TableauProver { config }
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    /// Develop `tree` until it closes, is saturated, or a limit is hit
    pub fn prove(&self, tree: &mut Tableau) -> Result<TableauResult> {
        let root = tree.root();
        tree.check_closed(root)?;

        let mut steps = 0;
        let result = loop {
            if tree.open_branches() == 0 {
                break TableauResult::Closed {
                    steps,
                    nodes: tree.node_count(),
                };
            }
            if steps >= self.config.max_steps {
                break TableauResult::Unknown {
                    steps,
                    reason: format!("Step limit {} reached", self.config.max_steps),
                };
            }
            if tree.node_count() >= self.config.max_nodes {
                break TableauResult::Unknown {
                    steps,
                    reason: format!("Node limit {} reached", self.config.max_nodes),
                };
            }

            let Some(id) = self.select(tree)? else {
                break self.finish(tree, steps)?;
            };
            let reusable = tree.node(id)?.node_type().is_reusable();
            debug!(step = steps, node = id, reusable, "developing");

            if !tree.develop(id, None)? {
                break TableauResult::Unknown {
                    steps,
                    reason: format!("Node {} could not be developed", id),
                };
            }
            steps += 1;
            if reusable {
                tree.defer(id)?;
            }
        };

        info!(result = ?result, nodes = tree.node_count(), "prover finished");
        Ok(result)
    }

    /// Pick the next node to develop
    fn select(&self, tree: &Tableau) -> Result<Option<NodeId>> {
        let worklist = tree.worklist();
        for &id in worklist {
            if !tree.node(id)?.node_type().is_reusable() {
                return Ok(Some(id));
            }
        }
        for &id in worklist {
            let node = tree.node(id)?;
            if node.used_terms().len() < self.config.max_gamma_instances
                && !tree.is_saturated(id)?
            {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Classify a tree with nothing left to select
    fn finish(&self, tree: &Tableau, steps: usize) -> Result<TableauResult> {
        for &id in tree.worklist() {
            if !tree.is_saturated(id)? {
                return Ok(TableauResult::Unknown {
                    steps,
                    reason: format!(
                        "Instance limit {} reached for node {}",
                        self.config.max_gamma_instances, id
                    ),
                });
            }
        }
        Ok(TableauResult::Open {
            steps,
            open_branches: tree.open_branches(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;

    fn premises(formulas: Vec<(Formula, bool)>) -> Tableau {
        let mut iter = formulas.into_iter();
        let (first, value) = iter.next().unwrap();
        let mut tree = Tableau::new(first, value);
        for (formula, value) in iter {
            tree.assume(formula, value).unwrap();
        }
        tree
    }

    #[test]
    fn test_modus_ponens_closes() {
        let a = Formula::prop("A");
        let b = Formula::prop("B");
        let mut tree = premises(vec![
            (Formula::implies(a.clone(), b.clone()), true),
            (a, true),
            (b, false),
        ]);
        let result = TableauProver::default().prove(&mut tree).unwrap();
        assert_eq!(result, TableauResult::Closed { steps: 1, nodes: 5 });
    }

    #[test]
    fn test_invalid_argument_stays_open() {
        // A | B, therefore A
        let a = Formula::prop("A");
        let mut tree = premises(vec![(Formula::or(a.clone(), Formula::prop("B")), true), (a, false)]);
        let result = TableauProver::default().prove(&mut tree).unwrap();
        assert_eq!(
            result,
            TableauResult::Open {
                steps: 1,
                open_branches: 1
            }
        );
        assert!(tree.is_finished());
    }

    #[test]
    fn test_syllogism_closes() {
        // forall x. (P(x) -> Q(x)), P(a), therefore Q(a)
        let mut tree = premises(vec![
            (
                Formula::forall(
                    "x",
                    Formula::implies(Formula::atom("P", &["x"]), Formula::atom("Q", &["x"])),
                ),
                true,
            ),
            (Formula::atom("P", &["a"]), true),
            (Formula::atom("Q", &["a"]), false),
        ]);
        let result = TableauProver::default().prove(&mut tree).unwrap();
        assert!(result.is_closed());
    }

    #[test]
    fn test_existential_meets_universal() {
        // exists x. P(x), forall x. ~P(x)
        let mut tree = premises(vec![
            (Formula::exists("x", Formula::atom("P", &["x"])), true),
            (Formula::forall("x", Formula::not(Formula::atom("P", &["x"]))), true),
        ]);
        let result = TableauProver::default().prove(&mut tree).unwrap();
        assert_eq!(result.steps(), 2);
        assert!(result.is_closed());
    }

    #[test]
    fn test_saturated_universal_is_open() {
        let mut tree = premises(vec![
            (Formula::forall("x", Formula::atom("P", &["x"])), true),
            (Formula::atom("P", &["a"]), true),
        ]);
        let result = TableauProver::default().prove(&mut tree).unwrap();
        assert!(result.is_open());
        let root = tree.root();
        assert!(tree.is_saturated(root).unwrap());
    }

    #[test]
    fn test_infinite_model_hits_instance_limit() {
        // forall x. exists y. R(x, y)
        let mut tree = premises(vec![(
            Formula::forall("x", Formula::exists("y", Formula::atom("R", &["x", "y"]))),
            true,
        )]);
        let prover = TableauProver::new(ProverConfig {
            max_gamma_instances: 3,
            ..ProverConfig::default()
        });
        match prover.prove(&mut tree).unwrap() {
            TableauResult::Unknown { steps, reason } => {
                assert_eq!(steps, 6);
                assert!(reason.contains("Instance limit 3"));
            }
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_step_limit() {
        let mut tree = premises(vec![(
            Formula::forall("x", Formula::exists("y", Formula::atom("R", &["x", "y"]))),
            true,
        )]);
        let prover = TableauProver::new(ProverConfig {
            max_steps: 4,
            ..ProverConfig::default()
        });
        let result = prover.prove(&mut tree).unwrap();
        assert_eq!(
            result,
            TableauResult::Unknown {
                steps: 4,
                reason: "Step limit 4 reached".to_string()
            }
        );
    }

    #[test]
    fn test_node_limit() {
        let p = |name: &str| Formula::prop(name);
        let mut tree = premises(vec![
            (Formula::or(p("A"), p("B")), true),
            (Formula::or(p("C"), p("D")), true),
        ]);
        let prover = TableauProver::new(ProverConfig {
            max_nodes: 4,
            ..ProverConfig::default()
        });
        match prover.prove(&mut tree).unwrap() {
            TableauResult::Unknown { reason, .. } => assert!(reason.contains("Node limit")),
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_result_json() {
        let result = TableauResult::Open {
            steps: 2,
            open_branches: 1,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["open_branches"], 1);
    }

    #[test]
    fn test_fresh_terms_do_not_collide_with_bound_names() {
        // forall x. exists t0. L(x, t0) with no reflexive L: a two-element cycle is a model
        let mut tree = premises(vec![
            (
                Formula::forall("x", Formula::exists("t0", Formula::atom("L", &["x", "t0"]))),
                true,
            ),
            (Formula::exists("u", Formula::atom("L", &["u", "u"])), false),
        ]);
        let result = TableauProver::default().prove(&mut tree).unwrap();
        assert!(!result.is_closed(), "{:?}", result);
    }

    #[test]
    fn test_instantiation_does_not_capture_constants() {
        // P(y) & forall x. exists y. L(x, y), and L is irreflexive
        let mut tree = premises(vec![
            (
                Formula::and(
                    Formula::atom("P", &["y"]),
                    Formula::forall("x", Formula::exists("y", Formula::atom("L", &["x", "y"]))),
                ),
                true,
            ),
            (Formula::exists("u", Formula::atom("L", &["u", "u"])), false),
        ]);
        let result = TableauProver::default().prove(&mut tree).unwrap();
        assert!(!result.is_closed(), "{:?}", result);
        let reflexive = tree
            .nodes()
            .filter(|n| n.truth_value())
            .any(|n| match n.formula().as_ref() {
                Formula::Atom(atom) => atom.args.len() == 2 && atom.args[0] == atom.args[1],
                _ => false,
            });
        assert!(!reflexive);
    }
}
