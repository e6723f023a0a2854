//! First-order formulas consumed by the tableau
//!
//! Formulas are immutable and shared by reference between tree nodes. The
//! tableau only ever inspects their shape and builds new formulas through
//! [`Formula::substitute`] and [`Formula::negate`].

pub mod term;

use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

pub use term::{Atom, Predicate, Term};

/// A first-order formula
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    /// Atomic formula
    Atom(Atom),
    /// Negation
    Not(Rc<Formula>),
    /// Conjunction
    And(Rc<Formula>, Rc<Formula>),
    /// Disjunction
    Or(Rc<Formula>, Rc<Formula>),
    /// Implication
    Implies(Rc<Formula>, Rc<Formula>),
    /// Biconditional
    Iff(Rc<Formula>, Rc<Formula>),
    /// Universal quantifier
    Forall(Term, Rc<Formula>),
    /// Existential quantifier
    Exists(Term, Rc<Formula>),
}

/// Binary and unary connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connective {
    Negation,
    Conjunction,
    Disjunction,
    Implication,
    Biimplication,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    Universal,
    Existential,
}

/// Top-level shape of a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Atomic,
    Complex(Connective),
    Quantified(Quantifier),
}

impl Formula {
    pub fn atom(predicate: &str, args: &[&str]) -> Self {
        Formula::Atom(Atom::new(predicate, args.iter().map(|a| Term::new(*a)).collect()))
    }

    /// A sentence letter
    pub fn prop(name: &str) -> Self {
        Formula::Atom(Atom::proposition(name))
    }

    pub fn not(inner: Formula) -> Self {
        Formula::Not(Rc::new(inner))
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Formula::And(Rc::new(left), Rc::new(right))
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Formula::Or(Rc::new(left), Rc::new(right))
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Formula::Implies(Rc::new(left), Rc::new(right))
    }

    pub fn iff(left: Formula, right: Formula) -> Self {
        Formula::Iff(Rc::new(left), Rc::new(right))
    }

    pub fn forall(var: &str, body: Formula) -> Self {
        Formula::Forall(Term::new(var), Rc::new(body))
    }

    pub fn exists(var: &str, body: Formula) -> Self {
        Formula::Exists(Term::new(var), Rc::new(body))
    }

    pub fn shape(&self) -> Shape {
        match self {
            Formula::Atom(_) => Shape::Atomic,
            Formula::Not(_) => Shape::Complex(Connective::Negation),
            Formula::And(_, _) => Shape::Complex(Connective::Conjunction),
            Formula::Or(_, _) => Shape::Complex(Connective::Disjunction),
            Formula::Implies(_, _) => Shape::Complex(Connective::Implication),
            Formula::Iff(_, _) => Shape::Complex(Connective::Biimplication),
            Formula::Forall(_, _) => Shape::Quantified(Quantifier::Universal),
            Formula::Exists(_, _) => Shape::Quantified(Quantifier::Existential),
        }
    }

    pub fn is_atomic(&self) -> bool {
        matches!(self, Formula::Atom(_))
    }

    /// The negation of this formula
    pub fn negate(&self) -> Formula {
        Formula::Not(Rc::new(self.clone()))
    }

    /// Replace the free occurrences of `var` with `term`
    ///
    /// Sub-formulas in which `var` does not occur free are shared with the
    /// original rather than copied.
    pub fn substitute(&self, var: &Term, term: &Term) -> Formula {
        match self {
            Formula::Atom(atom) => Formula::Atom(atom.substitute(var, term)),
            Formula::Not(f) => Formula::Not(substitute_shared(f, var, term)),
            Formula::And(a, b) => Formula::And(
                substitute_shared(a, var, term),
                substitute_shared(b, var, term),
            ),
            Formula::Or(a, b) => Formula::Or(
                substitute_shared(a, var, term),
                substitute_shared(b, var, term),
            ),
            Formula::Implies(a, b) => Formula::Implies(
                substitute_shared(a, var, term),
                substitute_shared(b, var, term),
            ),
            Formula::Iff(a, b) => Formula::Iff(
                substitute_shared(a, var, term),
                substitute_shared(b, var, term),
            ),
            Formula::Forall(v, _) | Formula::Exists(v, _) if v == var => self.clone(),
            Formula::Forall(v, body) => {
                let (v, body) = avoid_capture(v, body, var, term);
                Formula::Forall(v, substitute_shared(&body, var, term))
            }
            Formula::Exists(v, body) => {
                let (v, body) = avoid_capture(v, body, var, term);
                Formula::Exists(v, substitute_shared(&body, var, term))
            }
        }
    }

    /// Every identifier in the formula, bound or free
    pub fn identifiers(&self) -> HashSet<Term> {
        let mut names = HashSet::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers(&self, names: &mut HashSet<Term>) {
        match self {
            Formula::Atom(atom) => names.extend(atom.args.iter().cloned()),
            Formula::Not(f) => f.collect_identifiers(names),
            Formula::And(a, b)
            | Formula::Or(a, b)
            | Formula::Implies(a, b)
            | Formula::Iff(a, b) => {
                a.collect_identifiers(names);
                b.collect_identifiers(names);
            }
            Formula::Forall(v, body) | Formula::Exists(v, body) => {
                names.insert(v.clone());
                body.collect_identifiers(names);
            }
        }
    }

    /// Whether `var` occurs free in this formula
    pub fn has_free(&self, var: &Term) -> bool {
        match self {
            Formula::Atom(atom) => atom.mentions(var),
            Formula::Not(f) => f.has_free(var),
            Formula::And(a, b)
            | Formula::Or(a, b)
            | Formula::Implies(a, b)
            | Formula::Iff(a, b) => a.has_free(var) || b.has_free(var),
            Formula::Forall(v, body) | Formula::Exists(v, body) => {
                v != var && body.has_free(var)
            }
        }
    }

    /// Identifiers occurring free, in first-occurrence order
    pub fn free_terms(&self) -> Vec<Term> {
        let mut terms = Vec::new();
        let mut bound = Vec::new();
        self.collect_free(&mut bound, &mut terms);
        terms
    }

    fn collect_free(&self, bound: &mut Vec<Term>, terms: &mut Vec<Term>) {
        match self {
            Formula::Atom(atom) => {
                for arg in &atom.args {
                    if !bound.contains(arg) && !terms.contains(arg) {
                        terms.push(arg.clone());
                    }
                }
            }
            Formula::Not(f) => f.collect_free(bound, terms),
            Formula::And(a, b)
            | Formula::Or(a, b)
            | Formula::Implies(a, b)
            | Formula::Iff(a, b) => {
                a.collect_free(bound, terms);
                b.collect_free(bound, terms);
            }
            Formula::Forall(v, body) | Formula::Exists(v, body) => {
                bound.push(v.clone());
                body.collect_free(bound, terms);
                bound.pop();
            }
        }
    }

    /// Number of connectives and quantifiers
    pub fn depth(&self) -> usize {
        match self {
            Formula::Atom(_) => 0,
            Formula::Not(f) | Formula::Forall(_, f) | Formula::Exists(_, f) => 1 + f.depth(),
            Formula::And(a, b)
            | Formula::Or(a, b)
            | Formula::Implies(a, b)
            | Formula::Iff(a, b) => 1 + a.depth().max(b.depth()),
        }
    }
}

/// Rename `bound` when it would capture `term` substituted for `var` in `body`
fn avoid_capture(bound: &Term, body: &Rc<Formula>, var: &Term, term: &Term) -> (Term, Rc<Formula>) {
    if bound != term || !body.has_free(var) {
        return (bound.clone(), Rc::clone(body));
    }
    let taken = body.identifiers();
    let mut name = format!("{}'", bound.name());
    let renamed = loop {
        let candidate = Term::new(name.clone());
        if !taken.contains(&candidate) && candidate != *var && candidate != *term {
            break candidate;
        }
        name.push('\'');
    };
    let body = Rc::new(body.substitute(bound, &renamed));
    (renamed, body)
}

fn substitute_shared(formula: &Rc<Formula>, var: &Term, term: &Term) -> Rc<Formula> {
    if formula.has_free(var) {
        Rc::new(formula.substitute(var, term))
    } else {
        Rc::clone(formula)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px() -> Formula {
        Formula::atom("P", &["x"])
    }

    #[test]
    fn test_shape() {
        assert_eq!(px().shape(), Shape::Atomic);
        assert_eq!(
            Formula::not(px()).shape(),
            Shape::Complex(Connective::Negation)
        );
        assert_eq!(
            Formula::iff(px(), px()).shape(),
            Shape::Complex(Connective::Biimplication)
        );
        assert_eq!(
            Formula::exists("x", px()).shape(),
            Shape::Quantified(Quantifier::Existential)
        );
    }

    #[test]
    fn test_substitute_free_occurrences() {
        let f = Formula::and(px(), Formula::atom("Q", &["x", "y"]));
        let result = f.substitute(&Term::new("x"), &Term::new("a"));
        assert_eq!(
            result,
            Formula::and(Formula::atom("P", &["a"]), Formula::atom("Q", &["a", "y"]))
        );
        // the original is untouched
        assert_eq!(f, Formula::and(px(), Formula::atom("Q", &["x", "y"])));
    }

    #[test]
    fn test_substitute_respects_rebinding() {
        // P(x) & forall x. Q(x)
        let f = Formula::and(px(), Formula::forall("x", Formula::atom("Q", &["x"])));
        let result = f.substitute(&Term::new("x"), &Term::new("a"));
        assert_eq!(
            result,
            Formula::and(
                Formula::atom("P", &["a"]),
                Formula::forall("x", Formula::atom("Q", &["x"]))
            )
        );
    }

    #[test]
    fn test_substitute_renames_capturing_binder() {
        // (exists y. L(x, y))[x := y] must not become exists y. L(y, y)
        let f = Formula::exists("y", Formula::atom("L", &["x", "y"]));
        let result = f.substitute(&Term::new("x"), &Term::new("y"));
        assert_eq!(result, Formula::exists("y'", Formula::atom("L", &["y", "y'"])));
        assert!(result.has_free(&Term::new("y")));

        // the new name also avoids names already used in the body
        let f = Formula::forall(
            "y",
            Formula::and(Formula::atom("L", &["x", "y"]), Formula::atom("P", &["y'"])),
        );
        let result = f.substitute(&Term::new("x"), &Term::new("y"));
        let expected = Formula::forall(
            "y''",
            Formula::and(Formula::atom("L", &["y", "y''"]), Formula::atom("P", &["y'"])),
        );
        assert_eq!(result, expected);
    }

    #[test]
    fn test_binder_kept_when_nothing_is_captured() {
        let f = Formula::exists("y", Formula::atom("P", &["y"]));
        assert_eq!(f.substitute(&Term::new("x"), &Term::new("y")), f);
    }

    #[test]
    fn test_identifiers_include_bound_names() {
        let f = Formula::forall("x", Formula::exists("t0", Formula::atom("L", &["x", "a"])));
        let names = f.identifiers();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&Term::new("t0")));
        assert!(names.contains(&Term::new("a")));
    }

    #[test]
    fn test_substitute_shares_untouched_subformulas() {
        let f = Formula::or(px(), Formula::atom("Q", &["b"]));
        let result = f.substitute(&Term::new("x"), &Term::new("a"));
        match (&f, &result) {
            (Formula::Or(_, old_right), Formula::Or(_, new_right)) => {
                assert!(Rc::ptr_eq(old_right, new_right));
            }
            _ => panic!("expected disjunctions"),
        }

        let untouched = f.substitute(&Term::new("z"), &Term::new("a"));
        assert_eq!(f, untouched);
    }

    #[test]
    fn test_free_terms() {
        // forall x. (R(x, a) -> exists y. R(y, b)) & P(a)
        let f = Formula::and(
            Formula::forall(
                "x",
                Formula::implies(
                    Formula::atom("R", &["x", "a"]),
                    Formula::exists("y", Formula::atom("R", &["y", "b"])),
                ),
            ),
            Formula::atom("P", &["a"]),
        );
        assert_eq!(f.free_terms(), vec![Term::new("a"), Term::new("b")]);
    }

    #[test]
    fn test_negate_and_depth() {
        let f = Formula::implies(px(), Formula::not(px()));
        let negated = f.negate();
        assert_eq!(negated, Formula::not(f.clone()));
        assert_eq!(f.depth(), 2);
        assert_eq!(negated.depth(), 3);
    }

    #[test]
    fn test_serde_round_trip() {
        let f = Formula::forall("x", Formula::or(px(), Formula::not(Formula::prop("A"))));
        let json = serde_json::to_string(&f).unwrap();
        let back: Formula = serde_json::from_str(&json).unwrap();
        assert_eq!(f, back);
    }
}
