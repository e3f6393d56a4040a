//! Builder patterns for clause construction
//!
//! Provides fluent APIs for constructing clauses, particularly useful for
//! tests.
//!
//! ## Example
//!
//! ```rust
//! use stratalog::ast::builders::{atom, var, ClauseBuilder};
//!
//! // Build a rule: path(x, z) :- path(x, y), edge(y, z).
//! let clause = ClauseBuilder::new(atom("path", [var("x"), var("z")]))
//!     .atom(atom("path", [var("x"), var("y")]))
//!     .atom(atom("edge", [var("y"), var("z")]))
//!     .build();
//! assert_eq!(clause.to_string(), "path(x, z) :- path(x, y), edge(y, z).");
//! ```

use super::{
    AggregateOp, Aggregator, Argument, Atom, BinaryConstraint, BinaryConstraintOp, Clause,
    ExecutionPlan, FunctorOp, IntrinsicFunctor, Literal, NumericType, QualifiedName, RecordInit,
    SrcLocation,
};

// Argument constructors
/// A named variable
pub fn var(name: impl Into<String>) -> Argument {
    Argument::Variable(name.into())
}

/// The anonymous wildcard `_`
pub fn unnamed() -> Argument {
    Argument::UnnamedVariable
}

/// A signed integer constant
pub fn int(value: i64) -> Argument {
    Argument::NumericConstant {
        spelling: value.to_string(),
        final_type: Some(NumericType::Int),
    }
}

/// An unsigned integer constant
pub fn uint(value: u64) -> Argument {
    Argument::NumericConstant {
        spelling: value.to_string(),
        final_type: Some(NumericType::Uint),
    }
}

/// A floating-point constant
pub fn float(value: f64) -> Argument {
    Argument::NumericConstant {
        spelling: value.to_string(),
        final_type: Some(NumericType::Float),
    }
}

/// A numeric constant from a raw spelling, e.g. `number("0xff", None)`
pub fn number(spelling: impl Into<String>, final_type: Option<NumericType>) -> Argument {
    Argument::NumericConstant {
        spelling: spelling.into(),
        final_type,
    }
}

/// A string constant
pub fn string(text: impl Into<String>) -> Argument {
    Argument::StringConstant(text.into())
}

/// The empty record `nil`
pub fn nil() -> Argument {
    Argument::NilConstant
}

/// A record constructor `[a, b, ...]`
pub fn record(args: impl IntoIterator<Item = Argument>) -> Argument {
    Argument::RecordInit(RecordInit::new(args.into_iter().collect()))
}

/// An intrinsic functor application with a resolved type
pub fn functor(
    op: FunctorOp,
    args: impl IntoIterator<Item = Argument>,
    final_type: NumericType,
) -> Argument {
    Argument::IntrinsicFunctor(IntrinsicFunctor::new(
        op,
        args.into_iter().collect(),
        Some(final_type),
    ))
}

/// An aggregator argument, e.g. `agg(AggregateOp::Count, None, [..])`
pub fn agg(
    op: AggregateOp,
    target: Option<Argument>,
    body: impl IntoIterator<Item = Literal>,
) -> Argument {
    Argument::Aggregator(Aggregator::new(op, target, body.into_iter().collect()))
}

/// An atom with the given arguments
pub fn atom(name: impl Into<QualifiedName>, args: impl IntoIterator<Item = Argument>) -> Atom {
    Atom::new(name, args.into_iter().collect())
}

// ClauseBuilder
/// Builder for constructing clauses
#[derive(Debug, Clone)]
pub struct ClauseBuilder {
    head: Atom,
    body: Vec<Literal>,
    plan: Option<ExecutionPlan>,
    src_loc: SrcLocation,
}

impl ClauseBuilder {
    /// Start a clause with the given head atom
    pub fn new(head: Atom) -> Self {
        ClauseBuilder {
            head,
            body: Vec::new(),
            plan: None,
            src_loc: SrcLocation::default(),
        }
    }

    /// Start a fact clause: head only
    pub fn fact(head: Atom) -> Clause {
        ClauseBuilder::new(head).build()
    }

    /// Append a positive body atom
    pub fn atom(mut self, atom: Atom) -> Self {
        self.body.push(Literal::Atom(atom));
        self
    }

    /// Append a negated body atom
    pub fn negation(mut self, atom: Atom) -> Self {
        self.body.push(Literal::Negation(atom));
        self
    }

    /// Append a binary constraint
    pub fn constraint(mut self, op: BinaryConstraintOp, lhs: Argument, rhs: Argument) -> Self {
        self.body
            .push(Literal::BinaryConstraint(BinaryConstraint::new(op, lhs, rhs)));
        self
    }

    /// Append an equality constraint, the common case
    pub fn eq(self, lhs: Argument, rhs: Argument) -> Self {
        self.constraint(BinaryConstraintOp::Eq, lhs, rhs)
    }

    /// Append any literal
    pub fn literal(mut self, literal: Literal) -> Self {
        self.body.push(literal);
        self
    }

    /// Impose an atom order (1-based positions) for a version
    pub fn plan_order(mut self, version: usize, order: impl IntoIterator<Item = usize>) -> Self {
        self.plan
            .get_or_insert_with(ExecutionPlan::new)
            .set_order(version, order.into_iter().collect());
        self
    }

    /// Attach a source location
    pub fn at(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.src_loc = SrcLocation::new(file, line, column);
        self
    }

    /// Finish the clause
    pub fn build(self) -> Clause {
        Clause {
            head: self.head,
            body: self.body,
            plan: self.plan,
            src_loc: self.src_loc,
        }
    }
}
