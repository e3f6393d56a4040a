//! Lowering diagnostics.
//!
//! Every condition here is either an upstream invariant violation (a
//! clause that parsing and typing should never have produced) or a
//! propagated translation failure. None of them leave partial state
//! behind: the only shared structure a lowering call mutates is the
//! symbol table, and interning is append-only and benign.

use crate::ast::SrcLocation;

/// Errors raised while lowering a clause
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LowerError {
    #[error("{location}: cannot lower a fact inside a recursive stratum")]
    RecursiveFact { location: SrcLocation },

    #[error("{location}: aggregator body must contain exactly one atom, found {found}")]
    AggregatorBodyAtoms { location: SrcLocation, found: usize },

    #[error("numeric constant `{spelling}` has no resolved type")]
    UntypedConstant { spelling: String },

    #[error("numeric constant `{spelling}` does not parse as {expected}")]
    MalformedConstant {
        spelling: String,
        expected: &'static str,
    },

    #[error("argument `{argument}` is not a constant")]
    NonConstantArgument { argument: String },

    #[error("intrinsic functor `{op}` has no resolved type")]
    UntypedFunctor { op: &'static str },

    #[error("variable `{name}` has no binding position in this clause")]
    UngroundedVariable { name: String },

    #[error("aggregator or multi-result functor was not registered as a generator")]
    UnindexedGenerator,

    #[error("record constructor has no definition point in this clause")]
    UnindexedRecord,

    #[error("unknown relation `{name}`")]
    UnknownRelation { name: String },

    #[error("relation `{relation}` declares {declared} auxiliary columns but the atom has arity {arity}")]
    AuxiliaryArityOutOfBounds {
        relation: String,
        declared: usize,
        arity: usize,
    },

    #[error("{location}: execution plan for version {version} is not a permutation of the {atoms} body atoms")]
    MalformedPlan {
        location: SrcLocation,
        version: usize,
        atoms: usize,
    },

    #[error("{location}: execution plan refers to version {version} but only {produced} versions were generated")]
    MissingPlanVersion {
        location: SrcLocation,
        version: usize,
        produced: usize,
    },
}
