//! RAM operation trees: the output of clause lowering.
//!
//! A RAM statement evaluates one clause bottom-up: nested loops
//! (`Scan`/`UnpackRecord`), generator nests (`Aggregate`/`NestedIntrinsic`),
//! filters, and an innermost projection into the head relation. Nodes own
//! their children exclusively, so every tree is a tree, never a DAG.
//!
//! Optimisation and execution of these trees happen downstream; this
//! module only defines the node kinds and a structural pretty printer.

use crate::ast::{AggregateOp, FunctorOp, NumericType};
use std::collections::BTreeSet;
use std::fmt;

/// The flat integer domain all RAM values live in
pub type RamDomain = i64;

// Expressions
/// Binary relation opcodes for `Constraint` conditions
///
/// `FEq` is float equality over bit-reinterpreted values; everything else
/// compares in the integer domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryRelOp {
    Eq,
    FEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryRelOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryRelOp::Eq => "=",
            BinaryRelOp::FEq => "f=",
            BinaryRelOp::Ne => "!=",
            BinaryRelOp::Lt => "<",
            BinaryRelOp::Le => "<=",
            BinaryRelOp::Gt => ">",
            BinaryRelOp::Ge => ">=",
        }
    }
}

/// A RAM value expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Column read from the tuple introduced at a nesting level
    TupleElement { level: usize, column: usize },
    /// Signed integer constant
    SignedConstant(i64),
    /// Unsigned integer constant
    UnsignedConstant(u64),
    /// Floating-point constant
    FloatConstant(f64),
    /// The undefined value: pads auxiliary columns and unused targets
    UndefValue,
    /// Pack translated children into a record reference
    PackRecord(Vec<Expression>),
    /// Single-result intrinsic functor over translated arguments
    Intrinsic {
        op: FunctorOp,
        ty: NumericType,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub fn tuple_element(level: usize, column: usize) -> Self {
        Expression::TupleElement { level, column }
    }

    pub fn is_undef(&self) -> bool {
        matches!(self, Expression::UndefValue)
    }

    /// The flat-domain representation, for constants only
    pub fn as_constant(&self) -> Option<RamDomain> {
        match self {
            Expression::SignedConstant(v) => Some(*v),
            Expression::UnsignedConstant(v) => Some(*v as RamDomain),
            Expression::FloatConstant(v) => Some(v.to_bits() as RamDomain),
            _ => None,
        }
    }

    fn collect_levels(&self, levels: &mut BTreeSet<usize>) {
        match self {
            Expression::TupleElement { level, .. } => {
                levels.insert(*level);
            }
            Expression::PackRecord(args) | Expression::Intrinsic { args, .. } => {
                for arg in args {
                    arg.collect_levels(levels);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::TupleElement { level, column } => write!(f, "t{level}.{column}"),
            Expression::SignedConstant(v) => write!(f, "{v}"),
            Expression::UnsignedConstant(v) => write!(f, "{v}u"),
            Expression::FloatConstant(v) => write!(f, "{v}f"),
            Expression::UndefValue => write!(f, "_"),
            Expression::PackRecord(args) => {
                write!(f, "[")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
            Expression::Intrinsic { op, args, .. } => {
                write!(f, "{}(", op.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

// Conditions
/// A RAM filter condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The trivially-true condition
    True,
    Conjunction(Box<Condition>, Box<Condition>),
    Negation(Box<Condition>),
    /// Relation holds no tuples
    EmptinessCheck { relation: String },
    /// Relation holds a tuple matching the values (undef matches anything)
    ExistenceCheck {
        relation: String,
        values: Vec<Expression>,
    },
    /// Binary comparison between two expressions
    Constraint {
        op: BinaryRelOp,
        lhs: Expression,
        rhs: Expression,
    },
}

impl Condition {
    /// Conjoin a term onto an optional accumulated condition
    pub fn conjoin(acc: Option<Condition>, term: Condition) -> Condition {
        match acc {
            Some(existing) => Condition::Conjunction(Box::new(existing), Box::new(term)),
            None => term,
        }
    }

    pub fn negate(self) -> Condition {
        Condition::Negation(Box::new(self))
    }

    fn collect_levels(&self, levels: &mut BTreeSet<usize>) {
        match self {
            Condition::Conjunction(lhs, rhs) => {
                lhs.collect_levels(levels);
                rhs.collect_levels(levels);
            }
            Condition::Negation(inner) => inner.collect_levels(levels),
            Condition::ExistenceCheck { values, .. } => {
                for value in values {
                    value.collect_levels(levels);
                }
            }
            Condition::Constraint { lhs, rhs, .. } => {
                lhs.collect_levels(levels);
                rhs.collect_levels(levels);
            }
            Condition::True | Condition::EmptinessCheck { .. } => {}
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::True => write!(f, "true"),
            Condition::Conjunction(lhs, rhs) => write!(f, "({lhs} and {rhs})"),
            Condition::Negation(inner) => write!(f, "not {inner}"),
            Condition::EmptinessCheck { relation } => write!(f, "empty({relation})"),
            Condition::ExistenceCheck { relation, values } => {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ") in {relation}")
            }
            Condition::Constraint { op, lhs, rhs } => {
                write!(f, "{lhs} {} {rhs}", op.symbol())
            }
        }
    }
}

// Operations
/// Nested multi-result intrinsic variants, selected by the functor's
/// final numeric type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedIntrinsicOp {
    Range,
    URange,
    FRange,
}

impl NestedIntrinsicOp {
    pub fn name(self) -> &'static str {
        match self {
            NestedIntrinsicOp::Range => "range",
            NestedIntrinsicOp::URange => "urange",
            NestedIntrinsicOp::FRange => "frange",
        }
    }
}

/// A RAM operation: one layer of the nested evaluation of a clause
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Insert the given values into a relation (innermost layer)
    Project {
        relation: String,
        values: Vec<Expression>,
    },
    /// Evaluate the inner operation only if the condition holds
    Filter {
        condition: Condition,
        inner: Box<Operation>,
    },
    /// Bind one tuple of a relation per iteration at the given level
    Scan {
        relation: String,
        level: usize,
        inner: Box<Operation>,
        /// Profiling annotation; empty unless profiling is enabled
        profile_text: String,
    },
    /// Stop the enclosing scan once the condition holds
    Break {
        condition: Condition,
        inner: Box<Operation>,
    },
    /// Destructure a record reference into a tuple at the given level
    UnpackRecord {
        level: usize,
        source: Expression,
        arity: usize,
        inner: Box<Operation>,
    },
    /// Bind the aggregate of a relation under a condition at the given level
    Aggregate {
        op: AggregateOp,
        relation: String,
        target: Expression,
        condition: Condition,
        level: usize,
        inner: Box<Operation>,
    },
    /// Bind each result of a multi-result intrinsic at the given level
    NestedIntrinsic {
        op: NestedIntrinsicOp,
        args: Vec<Expression>,
        level: usize,
        inner: Box<Operation>,
    },
}

impl Operation {
    /// Wrap this operation in a filter
    pub fn filtered(self, condition: Condition) -> Operation {
        Operation::Filter {
            condition,
            inner: Box::new(self),
        }
    }

    /// The operation nested inside this one, if any
    pub fn inner(&self) -> Option<&Operation> {
        match self {
            Operation::Project { .. } => None,
            Operation::Filter { inner, .. }
            | Operation::Scan { inner, .. }
            | Operation::Break { inner, .. }
            | Operation::UnpackRecord { inner, .. }
            | Operation::Aggregate { inner, .. }
            | Operation::NestedIntrinsic { inner, .. } => Some(inner),
        }
    }

    /// Every nesting level referenced by a `TupleElement` in this tree
    pub fn referenced_levels(&self) -> BTreeSet<usize> {
        let mut levels = BTreeSet::new();
        let mut current = Some(self);
        while let Some(op) = current {
            match op {
                Operation::Project { values, .. } => {
                    for value in values {
                        value.collect_levels(&mut levels);
                    }
                }
                Operation::Filter { condition, .. } | Operation::Break { condition, .. } => {
                    condition.collect_levels(&mut levels);
                }
                Operation::UnpackRecord { source, .. } => {
                    source.collect_levels(&mut levels);
                }
                Operation::Aggregate {
                    target, condition, ..
                } => {
                    target.collect_levels(&mut levels);
                    condition.collect_levels(&mut levels);
                }
                Operation::NestedIntrinsic { args, .. } => {
                    for arg in args {
                        arg.collect_levels(&mut levels);
                    }
                }
                Operation::Scan { .. } => {}
            }
            current = op.inner();
        }
        levels
    }

    /// Scans in this tree, outermost first, as (relation, level) pairs
    pub fn scans(&self) -> Vec<(&str, usize)> {
        let mut scans = Vec::new();
        let mut current = Some(self);
        while let Some(op) = current {
            if let Operation::Scan {
                relation, level, ..
            } = op
            {
                scans.push((relation.as_str(), *level));
            }
            current = op.inner();
        }
        scans
    }

    /// Filter conditions in this tree, outermost first
    pub fn filter_conditions(&self) -> Vec<&Condition> {
        let mut conditions = Vec::new();
        let mut current = Some(self);
        while let Some(op) = current {
            if let Operation::Filter { condition, .. } = op {
                conditions.push(condition);
            }
            current = op.inner();
        }
        conditions
    }

    /// Pretty print the operation tree for debugging
    pub fn pretty_print(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            Operation::Project { relation, values } => {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                format!("{prefix}Project({relation}, [{}])", values.join(", "))
            }
            Operation::Filter { condition, inner } => {
                format!(
                    "{}Filter({})\n{}",
                    prefix,
                    condition,
                    inner.pretty_print(indent + 1)
                )
            }
            Operation::Scan {
                relation,
                level,
                inner,
                ..
            } => {
                format!(
                    "{}Scan({}, t{})\n{}",
                    prefix,
                    relation,
                    level,
                    inner.pretty_print(indent + 1)
                )
            }
            Operation::Break { condition, inner } => {
                format!(
                    "{}Break({})\n{}",
                    prefix,
                    condition,
                    inner.pretty_print(indent + 1)
                )
            }
            Operation::UnpackRecord {
                level,
                source,
                arity,
                inner,
            } => {
                format!(
                    "{}UnpackRecord(t{} := {}, arity={})\n{}",
                    prefix,
                    level,
                    source,
                    arity,
                    inner.pretty_print(indent + 1)
                )
            }
            Operation::Aggregate {
                op,
                relation,
                target,
                condition,
                level,
                inner,
            } => {
                format!(
                    "{}Aggregate({} {} : {} where {}, t{})\n{}",
                    prefix,
                    op,
                    target,
                    relation,
                    condition,
                    level,
                    inner.pretty_print(indent + 1)
                )
            }
            Operation::NestedIntrinsic {
                op,
                args,
                level,
                inner,
            } => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                format!(
                    "{}{}([{}], t{})\n{}",
                    prefix,
                    op.name(),
                    args.join(", "),
                    level,
                    inner.pretty_print(indent + 1)
                )
            }
        }
    }
}

// Statements
/// A RAM statement: the lowered form of one clause
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Evaluate an operation tree once
    Query(Operation),
    /// Evaluate statements in order
    Sequence(Vec<Statement>),
    /// Time the inner statement against a relation when profiling
    LogRelationTimer {
        statement: Box<Statement>,
        message: String,
        relation: String,
    },
    /// Attach clause provenance text to the inner statement
    DebugInfo {
        statement: Box<Statement>,
        message: String,
    },
}

impl Statement {
    /// The operation if this statement is a bare query
    pub fn as_query(&self) -> Option<&Operation> {
        match self {
            Statement::Query(op) => Some(op),
            _ => None,
        }
    }

    /// Drill through sequences and annotation wrappers to the query inside
    pub fn innermost_query(&self) -> Option<&Operation> {
        match self {
            Statement::Query(op) => Some(op),
            Statement::Sequence(stmts) => stmts.first().and_then(Statement::innermost_query),
            Statement::LogRelationTimer { statement, .. }
            | Statement::DebugInfo { statement, .. } => statement.innermost_query(),
        }
    }

    /// Pretty print the statement for debugging
    pub fn pretty_print(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            Statement::Query(op) => {
                format!("{}Query\n{}", prefix, op.pretty_print(indent + 1))
            }
            Statement::Sequence(stmts) => {
                let mut out = format!("{prefix}Sequence\n");
                for stmt in stmts {
                    out.push_str(&stmt.pretty_print(indent + 1));
                    out.push('\n');
                }
                out
            }
            Statement::LogRelationTimer {
                statement,
                message,
                relation,
            } => {
                format!(
                    "{}LogRelationTimer({}, {})\n{}",
                    prefix,
                    relation,
                    message,
                    statement.pretty_print(indent + 1)
                )
            }
            Statement::DebugInfo { statement, .. } => {
                format!(
                    "{}DebugInfo\n{}",
                    prefix,
                    statement.pretty_print(indent + 1)
                )
            }
        }
    }
}
