//! # Clause AST
//!
//! Abstract syntax for typed, analysed Datalog clauses: the input of the
//! RAM lowering stage. Parsing and type analysis happen upstream; every
//! numeric constant and polymorphic functor arriving here already carries
//! its resolved final type.
//!
//! ## Builders
//!
//! For programmatic construction of clauses, see the [`builders`] module
//! which provides fluent APIs like `AtomBuilder` and `ClauseBuilder`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod builders;

// Names and source locations
/// Dot-separated qualified relation name, e.g. `graph.path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    parts: Vec<String>,
}

impl QualifiedName {
    /// Create a name from a single identifier
    pub fn new(name: impl Into<String>) -> Self {
        QualifiedName {
            parts: vec![name.into()],
        }
    }

    /// Create a name from components, outermost first
    pub fn from_parts(parts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        QualifiedName {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// The name components, outermost first
    pub fn parts(&self) -> &[String] {
        &self.parts
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

impl From<&str> for QualifiedName {
    fn from(name: &str) -> Self {
        QualifiedName::from_parts(name.split('.'))
    }
}

/// Position of a clause in its source file, carried into diagnostics and
/// debug annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SrcLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SrcLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        SrcLocation {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SrcLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

// Argument algebra
/// Resolved type of a numeric constant or polymorphic functor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericType {
    Int,
    Uint,
    Float,
}

/// Intrinsic functor operations
///
/// `Range` is the only multi-result operation: it produces one output
/// tuple per element of the range, so it is lowered as a nested generator
/// rather than an inline expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctorOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    /// String concatenation: `cat(a, b)`
    Cat,
    /// Ordinal of an interned symbol: `ord(s)`
    Ord,
    /// Range generator: `range(from, to)`
    Range,
}

impl FunctorOp {
    /// Infix symbol for arithmetic operations, `None` for named functors
    pub fn infix_symbol(self) -> Option<&'static str> {
        match self {
            FunctorOp::Add => Some("+"),
            FunctorOp::Sub => Some("-"),
            FunctorOp::Mul => Some("*"),
            FunctorOp::Div => Some("/"),
            FunctorOp::Mod => Some("%"),
            _ => None,
        }
    }

    /// Lower-case name used in prefix display
    pub fn name(self) -> &'static str {
        match self {
            FunctorOp::Add => "add",
            FunctorOp::Sub => "sub",
            FunctorOp::Mul => "mul",
            FunctorOp::Div => "div",
            FunctorOp::Mod => "mod",
            FunctorOp::Neg => "neg",
            FunctorOp::Cat => "cat",
            FunctorOp::Ord => "ord",
            FunctorOp::Range => "range",
        }
    }
}

/// Aggregation operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateOp {
    Count,
    Sum,
    Min,
    Max,
    Mean,
}

impl AggregateOp {
    /// True for operations that ignore their target expression
    pub fn ignores_target(self) -> bool {
        self == AggregateOp::Count
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateOp::Count => "count",
            AggregateOp::Sum => "sum",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Mean => "mean",
        };
        write!(f, "{name}")
    }
}

/// Fixed-arity nested tuple constructor: `[a, b, c]`
///
/// In a binding position (an atom argument) a record is unpacked at its
/// own nesting level; in a value position it packs its translated
/// children into a record reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordInit {
    pub args: Vec<Argument>,
}

impl RecordInit {
    pub fn new(args: Vec<Argument>) -> Self {
        RecordInit { args }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// Intrinsic functor application with its resolved overload
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntrinsicFunctor {
    pub op: FunctorOp,
    pub args: Vec<Argument>,
    /// Resolved numeric overload; `None` until type analysis has run
    pub final_type: Option<NumericType>,
}

impl IntrinsicFunctor {
    pub fn new(op: FunctorOp, args: Vec<Argument>, final_type: Option<NumericType>) -> Self {
        IntrinsicFunctor {
            op,
            args,
            final_type,
        }
    }

    /// True if this functor generates multiple result tuples
    pub fn is_multi_result(&self) -> bool {
        self.op == FunctorOp::Range
    }
}

/// Aggregator: `sum x : { account(_, x) }`
///
/// The body is a sub-clause that must contain exactly one atom; the
/// target expression is absent for operations that ignore it (`count`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Aggregator {
    pub op: AggregateOp,
    pub target: Option<Box<Argument>>,
    pub body: Vec<Literal>,
}

impl Aggregator {
    pub fn new(op: AggregateOp, target: Option<Argument>, body: Vec<Literal>) -> Self {
        Aggregator {
            op,
            target: target.map(Box::new),
            body,
        }
    }

    /// The positive atoms of the aggregator body, in source order
    pub fn body_atoms(&self) -> Vec<&Atom> {
        self.body.iter().filter_map(Literal::as_atom).collect()
    }
}

/// An argument of an atom, record, functor, or constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Argument {
    /// Named variable, e.g. `x`
    Variable(String),
    /// Anonymous wildcard `_`: matches anything, binds nothing
    UnnamedVariable,
    /// Numeric constant with its source spelling and resolved type
    NumericConstant {
        spelling: String,
        final_type: Option<NumericType>,
    },
    /// String constant, interned into the symbol table when coded
    StringConstant(String),
    /// The empty record `nil`
    NilConstant,
    /// Record constructor
    RecordInit(RecordInit),
    /// Intrinsic functor application
    IntrinsicFunctor(IntrinsicFunctor),
    /// Aggregator in argument position
    Aggregator(Aggregator),
}

impl Argument {
    /// Check if this argument is a named variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Argument::Variable(_))
    }

    /// Check if this argument is the anonymous wildcard
    pub fn is_unnamed(&self) -> bool {
        matches!(self, Argument::UnnamedVariable)
    }

    /// Check if this argument is a constant of any kind
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            Argument::NumericConstant { .. } | Argument::StringConstant(_) | Argument::NilConstant
        )
    }

    /// Get the variable name if this is a variable
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Argument::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Get the record if this is a record constructor
    pub fn as_record(&self) -> Option<&RecordInit> {
        match self {
            Argument::RecordInit(rec) => Some(rec),
            _ => None,
        }
    }

    /// Get the aggregator if this is an aggregator argument
    pub fn as_aggregator(&self) -> Option<&Aggregator> {
        match self {
            Argument::Aggregator(agg) => Some(agg),
            _ => None,
        }
    }
}

// Literals and clauses
/// Binary relation between two arguments, e.g. `x != y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryConstraintOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryConstraintOp {
    pub fn is_eq(self) -> bool {
        self == BinaryConstraintOp::Eq
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryConstraintOp::Eq => "=",
            BinaryConstraintOp::Ne => "!=",
            BinaryConstraintOp::Lt => "<",
            BinaryConstraintOp::Le => "<=",
            BinaryConstraintOp::Gt => ">",
            BinaryConstraintOp::Ge => ">=",
        }
    }
}

/// A binary constraint literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryConstraint {
    pub op: BinaryConstraintOp,
    pub lhs: Argument,
    pub rhs: Argument,
}

impl BinaryConstraint {
    pub fn new(op: BinaryConstraintOp, lhs: Argument, rhs: Argument) -> Self {
        BinaryConstraint { op, lhs, rhs }
    }
}

/// A predicate application: `path(x, y)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub name: QualifiedName,
    pub args: Vec<Argument>,
}

impl Atom {
    pub fn new(name: impl Into<QualifiedName>, args: Vec<Argument>) -> Self {
        Atom {
            name: name.into(),
            args,
        }
    }

    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// True if every argument is the anonymous wildcard
    pub fn all_args_unnamed(&self) -> bool {
        self.args.iter().all(Argument::is_unnamed)
    }
}

/// A body literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    /// Positive atom, lowered as a scan
    Atom(Atom),
    /// Negated atom, lowered as an existence/emptiness check
    Negation(Atom),
    /// Binary constraint, lowered as a filter condition
    BinaryConstraint(BinaryConstraint),
    /// Bare aggregator, lowered as a nest with no condition
    Aggregator(Aggregator),
}

impl Literal {
    /// Get the atom if this is a positive atom literal
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Literal::Atom(atom) => Some(atom),
            _ => None,
        }
    }

    /// Get the atom if this is a negated atom literal
    pub fn as_negation(&self) -> Option<&Atom> {
        match self {
            Literal::Negation(atom) => Some(atom),
            _ => None,
        }
    }
}

/// User-supplied execution plan: for each semi-naïve version, a 1-based
/// permutation of the body atom positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    orders: BTreeMap<usize, Vec<usize>>,
}

impl ExecutionPlan {
    pub fn new() -> Self {
        ExecutionPlan::default()
    }

    /// Set the atom order (1-based positions) for a version
    pub fn set_order(&mut self, version: usize, order: Vec<usize>) {
        self.orders.insert(version, order);
    }

    /// Get the atom order for a version, if one was supplied
    pub fn order_for(&self, version: usize) -> Option<&[usize]> {
        self.orders.get(&version).map(Vec::as_slice)
    }

    /// The highest version index any order refers to
    pub fn max_version(&self) -> Option<usize> {
        self.orders.keys().next_back().copied()
    }
}

/// A single Horn clause: fact (`p(1).`) or rule (`p(x) :- q(x).`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub head: Atom,
    pub body: Vec<Literal>,
    pub plan: Option<ExecutionPlan>,
    pub src_loc: SrcLocation,
}

impl Clause {
    pub fn new(head: Atom, body: Vec<Literal>) -> Self {
        Clause {
            head,
            body,
            plan: None,
            src_loc: SrcLocation::default(),
        }
    }

    /// A clause with an empty body is a ground fact
    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }

    /// Positive body atoms in source order
    pub fn body_atoms(&self) -> Vec<&Atom> {
        self.body.iter().filter_map(Literal::as_atom).collect()
    }

    /// All aggregators in the clause, depth-first pre-order, head before
    /// body, whether they occur as arguments or as bare literals
    pub fn aggregators(&self) -> Vec<&Aggregator> {
        let mut found = Vec::new();
        for arg in &self.head.args {
            collect_aggregators_in_argument(arg, &mut found);
        }
        for lit in &self.body {
            collect_aggregators_in_literal(lit, &mut found);
        }
        found
    }

    /// All intrinsic functors in the clause, depth-first, head before body
    pub fn intrinsic_functors(&self) -> Vec<&IntrinsicFunctor> {
        let mut found = Vec::new();
        self.visit_arguments(&mut |arg| {
            if let Argument::IntrinsicFunctor(func) = arg {
                found.push(func);
            }
        });
        found
    }

    /// All binary constraints, including those inside aggregator bodies
    pub fn binary_constraints(&self) -> Vec<&BinaryConstraint> {
        let mut found = Vec::new();
        self.visit_literals(&mut |lit| {
            if let Literal::BinaryConstraint(bc) = lit {
                found.push(bc);
            }
        });
        found
    }

    /// Depth-first pre-order walk over every argument in the clause,
    /// descending into records, functors, and aggregators.
    pub fn visit_arguments<'a>(&'a self, visit: &mut impl FnMut(&'a Argument)) {
        for arg in &self.head.args {
            visit_argument(arg, visit);
        }
        for lit in &self.body {
            visit_literal_arguments(lit, visit);
        }
    }

    /// Depth-first pre-order walk over every literal, descending into
    /// aggregator bodies.
    pub fn visit_literals<'a>(&'a self, visit: &mut impl FnMut(&'a Literal)) {
        for arg in &self.head.args {
            visit_argument_literals(arg, visit);
        }
        for lit in &self.body {
            visit_literal(lit, visit);
        }
    }
}

fn collect_aggregators_in_literal<'a>(lit: &'a Literal, out: &mut Vec<&'a Aggregator>) {
    match lit {
        Literal::Atom(atom) | Literal::Negation(atom) => {
            for arg in &atom.args {
                collect_aggregators_in_argument(arg, out);
            }
        }
        Literal::BinaryConstraint(bc) => {
            collect_aggregators_in_argument(&bc.lhs, out);
            collect_aggregators_in_argument(&bc.rhs, out);
        }
        Literal::Aggregator(agg) => collect_aggregator(agg, out),
    }
}

fn collect_aggregators_in_argument<'a>(arg: &'a Argument, out: &mut Vec<&'a Aggregator>) {
    match arg {
        Argument::RecordInit(rec) => {
            for inner in &rec.args {
                collect_aggregators_in_argument(inner, out);
            }
        }
        Argument::IntrinsicFunctor(func) => {
            for inner in &func.args {
                collect_aggregators_in_argument(inner, out);
            }
        }
        Argument::Aggregator(agg) => collect_aggregator(agg, out),
        _ => {}
    }
}

fn collect_aggregator<'a>(agg: &'a Aggregator, out: &mut Vec<&'a Aggregator>) {
    out.push(agg);
    if let Some(target) = &agg.target {
        collect_aggregators_in_argument(target, out);
    }
    for lit in &agg.body {
        collect_aggregators_in_literal(lit, out);
    }
}

fn visit_argument<'a>(arg: &'a Argument, visit: &mut impl FnMut(&'a Argument)) {
    visit(arg);
    match arg {
        Argument::RecordInit(rec) => {
            for inner in &rec.args {
                visit_argument(inner, visit);
            }
        }
        Argument::IntrinsicFunctor(func) => {
            for inner in &func.args {
                visit_argument(inner, visit);
            }
        }
        Argument::Aggregator(agg) => {
            if let Some(target) = &agg.target {
                visit_argument(target, visit);
            }
            for lit in &agg.body {
                visit_literal_arguments(lit, visit);
            }
        }
        _ => {}
    }
}

fn visit_literal_arguments<'a>(lit: &'a Literal, visit: &mut impl FnMut(&'a Argument)) {
    match lit {
        Literal::Atom(atom) | Literal::Negation(atom) => {
            for arg in &atom.args {
                visit_argument(arg, visit);
            }
        }
        Literal::BinaryConstraint(bc) => {
            visit_argument(&bc.lhs, visit);
            visit_argument(&bc.rhs, visit);
        }
        Literal::Aggregator(agg) => {
            if let Some(target) = &agg.target {
                visit_argument(target, visit);
            }
            for inner in &agg.body {
                visit_literal_arguments(inner, visit);
            }
        }
    }
}

fn visit_literal<'a>(lit: &'a Literal, visit: &mut impl FnMut(&'a Literal)) {
    visit(lit);
    match lit {
        Literal::Atom(atom) | Literal::Negation(atom) => {
            for arg in &atom.args {
                visit_argument_literals(arg, visit);
            }
        }
        Literal::BinaryConstraint(bc) => {
            visit_argument_literals(&bc.lhs, visit);
            visit_argument_literals(&bc.rhs, visit);
        }
        Literal::Aggregator(agg) => {
            for inner in &agg.body {
                visit_literal(inner, visit);
            }
        }
    }
}

fn visit_argument_literals<'a>(arg: &'a Argument, visit: &mut impl FnMut(&'a Literal)) {
    match arg {
        Argument::RecordInit(rec) => {
            for inner in &rec.args {
                visit_argument_literals(inner, visit);
            }
        }
        Argument::IntrinsicFunctor(func) => {
            for inner in &func.args {
                visit_argument_literals(inner, visit);
            }
        }
        Argument::Aggregator(agg) => {
            if let Some(target) = &agg.target {
                visit_argument_literals(target, visit);
            }
            for lit in &agg.body {
                visit_literal(lit, visit);
            }
        }
        _ => {}
    }
}

// Display
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Variable(name) => write!(f, "{name}"),
            Argument::UnnamedVariable => write!(f, "_"),
            Argument::NumericConstant { spelling, .. } => write!(f, "{spelling}"),
            Argument::StringConstant(text) => write!(f, "\"{text}\""),
            Argument::NilConstant => write!(f, "nil"),
            Argument::RecordInit(rec) => {
                write!(f, "[")?;
                for (i, arg) in rec.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
            Argument::IntrinsicFunctor(func) => {
                if let (Some(symbol), [lhs, rhs]) = (func.op.infix_symbol(), func.args.as_slice()) {
                    write!(f, "({lhs} {symbol} {rhs})")
                } else {
                    write!(f, "{}(", func.op.name())?;
                    for (i, arg) in func.args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ")")
                }
            }
            Argument::Aggregator(agg) => write!(f, "{agg}"),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        if let Some(target) = &self.target {
            write!(f, " {target}")?;
        }
        write!(f, " : {{ ")?;
        for (i, lit) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Atom(atom) => write!(f, "{atom}"),
            Literal::Negation(atom) => write!(f, "!{atom}"),
            Literal::BinaryConstraint(bc) => {
                write!(f, "{} {} {}", bc.lhs, bc.op.symbol(), bc.rhs)
            }
            Literal::Aggregator(agg) => write!(f, "{agg}"),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if !self.body.is_empty() {
            write!(f, " :- ")?;
            for (i, lit) in self.body.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{lit}")?;
            }
        }
        write!(f, ".")
    }
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Argument {
        Argument::Variable(name.to_string())
    }

    #[test]
    fn test_qualified_name_display() {
        assert_eq!(QualifiedName::new("edge").to_string(), "edge");
        assert_eq!(
            QualifiedName::from_parts(["graph", "path"]).to_string(),
            "graph.path"
        );
        assert_eq!(QualifiedName::from("graph.path").parts().len(), 2);
    }

    #[test]
    fn test_clause_display() {
        let clause = Clause::new(
            Atom::new("path", vec![var("x"), var("z")]),
            vec![
                Literal::Atom(Atom::new("path", vec![var("x"), var("y")])),
                Literal::Atom(Atom::new("edge", vec![var("y"), var("z")])),
            ],
        );
        assert_eq!(clause.to_string(), "path(x, z) :- path(x, y), edge(y, z).");
    }

    #[test]
    fn test_fact_display() {
        let fact = Clause::new(
            Atom::new(
                "p",
                vec![
                    Argument::NumericConstant {
                        spelling: "1".to_string(),
                        final_type: Some(NumericType::Int),
                    },
                    Argument::StringConstant("a".to_string()),
                ],
            ),
            vec![],
        );
        assert!(fact.is_fact());
        assert_eq!(fact.to_string(), "p(1, \"a\").");
    }

    #[test]
    fn test_negation_and_constraint_display() {
        let clause = Clause::new(
            Atom::new("p", vec![var("x")]),
            vec![
                Literal::Atom(Atom::new("q", vec![var("x")])),
                Literal::Negation(Atom::new("r", vec![var("x"), Argument::UnnamedVariable])),
                Literal::BinaryConstraint(BinaryConstraint::new(
                    BinaryConstraintOp::Lt,
                    var("x"),
                    Argument::NumericConstant {
                        spelling: "10".to_string(),
                        final_type: Some(NumericType::Int),
                    },
                )),
            ],
        );
        assert_eq!(clause.to_string(), "p(x) :- q(x), !r(x, _), x < 10.");
    }

    #[test]
    fn test_aggregator_collection() {
        let agg = Aggregator::new(
            AggregateOp::Count,
            None,
            vec![Literal::Atom(Atom::new(
                "q",
                vec![Argument::UnnamedVariable],
            ))],
        );
        let clause = Clause::new(
            Atom::new("p", vec![var("c")]),
            vec![Literal::BinaryConstraint(BinaryConstraint::new(
                BinaryConstraintOp::Eq,
                var("c"),
                Argument::Aggregator(agg),
            ))],
        );
        assert_eq!(clause.aggregators().len(), 1);
        assert_eq!(clause.binary_constraints().len(), 1);
        assert_eq!(clause.to_string(), "p(c) :- c = count : { q(_) }.");
    }

    #[test]
    fn test_multi_result_detection() {
        let range = IntrinsicFunctor::new(
            FunctorOp::Range,
            vec![var("a"), var("b")],
            Some(NumericType::Int),
        );
        assert!(range.is_multi_result());
        let add = IntrinsicFunctor::new(
            FunctorOp::Add,
            vec![var("a"), var("b")],
            Some(NumericType::Int),
        );
        assert!(!add.is_multi_result());
    }

    #[test]
    fn test_execution_plan_orders() {
        let mut plan = ExecutionPlan::new();
        plan.set_order(0, vec![2, 1]);
        plan.set_order(1, vec![1, 2]);
        assert_eq!(plan.order_for(0), Some(&[2, 1][..]));
        assert_eq!(plan.order_for(7), None);
        assert_eq!(plan.max_version(), Some(1));
    }

    #[test]
    fn test_all_args_unnamed() {
        let atom = Atom::new(
            "r",
            vec![Argument::UnnamedVariable, Argument::UnnamedVariable],
        );
        assert!(atom.all_args_unnamed());
        let atom = Atom::new("r", vec![Argument::UnnamedVariable, var("x")]);
        assert!(!atom.all_args_unnamed());
    }
}
