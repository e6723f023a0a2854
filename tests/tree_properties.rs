use proptest::prelude::*;
use std::collections::HashSet;
use truthtree::formula::{Atom, Formula, Term};
use truthtree::tree::{NodeId, NodeType, Tableau};

// ============================================================================
// Strategies
// ============================================================================

prop_compose! {
    fn any_term()(name in prop::sample::select(vec!["a", "b", "x", "y"])) -> Term {
        Term::new(name)
    }
}

prop_compose! {
    fn any_atom()(predicate in "[PQR]", args in prop::collection::vec(any_term(), 0..3)) -> Formula {
        Formula::Atom(Atom::new(&predicate, args))
    }
}

fn any_formula() -> impl Strategy<Value = Formula> {
    any_atom().prop_recursive(
        3,  // deep
        12, // max size
        2,  // items per collection
        |inner| {
            let var = prop::sample::select(vec!["x", "y"]);
            prop_oneof![
                inner.clone().prop_map(Formula::not),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Formula::and(a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Formula::or(a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Formula::implies(a, b)),
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Formula::iff(a, b)),
                (var.clone(), inner.clone()).prop_map(|(v, body)| Formula::forall(v, body)),
                (var, inner).prop_map(|(v, body)| Formula::exists(v, body)),
            ]
        },
    )
}

fn any_premises() -> impl Strategy<Value = Vec<(Formula, bool)>> {
    prop::collection::vec((any_formula(), any::<bool>()), 1..4)
}

#[derive(Debug, Clone)]
enum Op {
    Develop(usize),
    Remove(usize),
}

fn any_ops() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => any::<usize>().prop_map(Op::Develop),
            1 => any::<usize>().prop_map(Op::Remove),
        ],
        0..10,
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn build(premises: &[(Formula, bool)]) -> Tableau {
    let (first, value) = &premises[0];
    let mut tree = Tableau::new(first.clone(), *value);
    for (formula, value) in &premises[1..] {
        tree.assume(formula.clone(), *value).unwrap();
    }
    let root = tree.root();
    tree.check_closed(root).unwrap();
    tree
}

/// Leaves with no branch-closed node on their path to the root
fn count_open_leaves(tree: &Tableau) -> usize {
    tree.all_leaves(tree.root()).unwrap()
        .into_iter()
        .filter(|&leaf| {
            let mut current = Some(leaf);
            while let Some(id) = current {
                let node = tree.node(id).unwrap();
                if node.is_branch_closed() {
                    return false;
                }
                current = node.parent();
            }
            true
        })
        .count()
}

fn develop_from_worklist(tree: &mut Tableau, index: usize) {
    if let Some(&id) = tree.worklist().get(index % tree.worklist().len().max(1)) {
        tree.develop(id, None).unwrap();
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_negation_folds_at_construction(formula in any_formula()) {
        let tree = Tableau::new(Formula::not(formula.clone()), true);
        let root = tree.node(tree.root()).unwrap();
        prop_assert_eq!(root.formula().as_ref(), &formula);
        prop_assert!(!root.truth_value());
        prop_assert_eq!(root.node_type(), NodeType::of(&formula, false));
    }

    #[test]
    fn prop_open_count_matches_open_leaves(
        premises in any_premises(),
        picks in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let mut tree = build(&premises);
        prop_assert_eq!(tree.open_branches(), count_open_leaves(&tree));

        for pick in picks {
            develop_from_worklist(&mut tree, pick);
            prop_assert_eq!(tree.open_branches(), count_open_leaves(&tree));
        }
    }

    #[test]
    fn prop_branching_delta(premises in any_premises(), pick in any::<usize>()) {
        let mut tree = build(&premises);
        prop_assume!(!tree.worklist().is_empty());
        let id = tree.worklist()[pick % tree.worklist().len()];
        let branching = tree.node(id).unwrap().node_type().is_branching();
        let leaves = tree.open_leaves(id).unwrap().len();
        let open_before = tree.open_branches();
        let closed_before = tree.nodes().filter(|n| n.is_closed()).count();

        prop_assert!(leaves > 0);
        prop_assert!(tree.develop(id, None).unwrap());

        // every branch closed by this step leaves a closing witness behind
        let newly_closed = tree.nodes().filter(|n| n.is_closed()).count() - closed_before;
        let delta = if branching { leaves } else { 0 };
        prop_assert_eq!(tree.open_branches() + newly_closed, open_before + delta);
    }

    #[test]
    fn prop_ticked_is_monotonic(
        premises in any_premises(),
        picks in prop::collection::vec(any::<usize>(), 0..8),
    ) {
        let mut tree = build(&premises);
        let mut ticked: HashSet<NodeId> = HashSet::new();

        for pick in picks {
            develop_from_worklist(&mut tree, pick);
            for id in &ticked {
                prop_assert!(tree.node(*id).unwrap().is_ticked());
            }
            ticked.extend(tree.nodes().filter(|n| n.is_ticked()).map(|n| n.id()));
        }
    }

    #[test]
    fn prop_bookkeeping_under_develop_and_remove(premises in any_premises(), ops in any_ops()) {
        let mut tree = build(&premises);
        let root = tree.root();

        for op in ops {
            match op {
                Op::Develop(pick) => develop_from_worklist(&mut tree, pick),
                Op::Remove(pick) => {
                    let live: Vec<NodeId> = tree
                        .nodes()
                        .map(|n| n.id())
                        .filter(|&id| id != root)
                        .collect();
                    if !live.is_empty() {
                        prop_assert!(tree.remove(live[pick % live.len()]).unwrap());
                    }
                }
            }

            prop_assert_eq!(tree.node_count(), tree.nodes().count());
            prop_assert_eq!(tree.node_count(), tree.snapshot().size());
            prop_assert_eq!(tree.open_branches(), count_open_leaves(&tree));
            for node in tree.nodes() {
                for &child in node.children() {
                    prop_assert_eq!(tree.node(child).unwrap().parent(), Some(node.id()));
                }
            }
            for &id in tree.worklist() {
                prop_assert!(!tree.node(id).unwrap().is_ticked());
            }
        }
    }

    #[test]
    fn prop_remove_undoes_develop_on_single_branch(premises in any_premises(), pick in any::<usize>()) {
        prop_assume!(premises.len() >= 2);
        let mut tree = build(&premises);
        prop_assume!(tree.open_branches() == 1);

        // any premise below the root
        let path: Vec<NodeId> = tree.nodes().map(|n| n.id()).filter(|&id| id != tree.root()).collect();
        let id = path[pick % path.len()];
        let parent = tree.node(id).unwrap().parent().unwrap();
        let children = tree.node(id).unwrap().children().to_vec();
        let count = tree.node_count();

        tree.develop(id, None).unwrap();
        prop_assert!(tree.remove(id).unwrap());

        prop_assert_eq!(tree.node_count(), count - 1);
        prop_assert_eq!(tree.open_branches(), 1);
        prop_assert_eq!(tree.node(parent).unwrap().children(), children.as_slice());
    }
}
