//! # RAM Builder
//!
//! Lowers one typed Datalog clause into a RAM operation tree that scans
//! the body relations, enforces the clause's constraints, and projects
//! derived tuples into the head relation.
//!
//! Two clause shapes are handled (ground facts and rules), and rules
//! lower in two modes: non-recursive evaluation over whole relations,
//! and semi-naïve evaluation inside a recursive stratum, where one body
//! atom at a time is swapped for its delta relation and already-derived
//! tuples are subtracted.
//!
//! ## Pipeline Position
//!
//! ```text
//! parse -> type analysis -> SCC analysis -> [RAM Builder] -> RAM optimizer -> evaluation
//! ```
//!
//! ## Levels
//!
//! Everything hangs off a single coordinate system: each scan, record
//! unpack, and generator owns one integer *level*, assigned during
//! indexing in the order the nodes are registered and consumed in
//! reverse while the tree is emitted bottom-up. Every value a clause
//! binds is addressed as `(level, column)`.

mod constraints;
mod value_index;
mod values;

pub use constraints::translate_constraint;
pub use value_index::{GeneratorSource, Location, ValueIndex};
pub use values::{constant_ram_representation, translate_constant, translate_value};

use crate::ast::{
    Aggregator, Argument, Atom, Clause, IntrinsicFunctor, NumericType, QualifiedName, RecordInit,
};
use crate::catalog::{concrete_name, delta_name, new_name, RelationCatalog};
use crate::error::LowerError;
use crate::ram::{
    BinaryRelOp, Condition, Expression, NestedIntrinsicOp, Operation, Statement,
};
use crate::symbol_table::SymbolTable;
use log::{debug, trace};
use std::collections::HashSet;

/// Shared state for lowering the clauses of one program
#[derive(Debug, Clone, Copy)]
pub struct LowerContext<'a> {
    pub catalog: &'a RelationCatalog,
    pub symbols: &'a SymbolTable,
    /// Decorates scans and recursive rules with profiling annotations.
    /// Read multiple times during one lowering call; callers must only
    /// change it between compilations.
    pub profile: bool,
}

impl<'a> LowerContext<'a> {
    pub fn new(catalog: &'a RelationCatalog, symbols: &'a SymbolTable) -> Self {
        LowerContext {
            catalog,
            symbols,
            profile: false,
        }
    }

    pub fn with_profiling(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }
}

/// A node that introduces a nesting level by binding a fresh tuple
#[derive(Debug, Clone, Copy)]
enum Operator<'a> {
    /// Body atom, bound by a relation scan
    Scan(&'a Atom),
    /// Nested record, bound by unpacking its reference
    Unpack(&'a RecordInit),
}

/// A node that generates its tuple instead of scanning for it
#[derive(Debug, Clone, Copy)]
enum Generator<'a> {
    Aggregate(&'a Aggregator),
    MultiResult(&'a IntrinsicFunctor),
}

/// Lowers a single clause. One instance per clause version: the value
/// index and level lists are rebuilt from scratch on every call and
/// discarded afterwards.
pub struct ClauseLowerer<'a> {
    context: &'a LowerContext<'a>,
    value_index: ValueIndex<'a>,
    operators: Vec<Operator<'a>>,
    generators: Vec<Generator<'a>>,
    delta_atom: Option<&'a Atom>,
    prevs: Vec<&'a Atom>,
    atom_order: Vec<&'a Atom>,
}

impl<'a> ClauseLowerer<'a> {
    pub fn new(context: &'a LowerContext<'a>) -> Self {
        ClauseLowerer {
            context,
            value_index: ValueIndex::new(),
            operators: Vec::new(),
            generators: Vec::new(),
            delta_atom: None,
            prevs: Vec::new(),
            atom_order: Vec::new(),
        }
    }

    /// Lower a fact or a non-recursive rule into a single statement
    pub fn lower(self, clause: &'a Clause) -> Result<Statement, LowerError> {
        self.translate_clause(clause, clause, 0)
    }

    /// Lower every semi-naïve version of a recursive clause.
    ///
    /// One version is produced per body atom whose relation lies in the
    /// clause's SCC: that atom becomes the delta, and the recursive atoms
    /// after it are subtracted through their delta relations. Each
    /// version is wrapped in profiling and debug annotations.
    pub fn lower_versions(
        context: &'a LowerContext<'a>,
        scc: &HashSet<QualifiedName>,
        clause: &'a Clause,
    ) -> Result<Vec<Statement>, LowerError> {
        let mut versions = Vec::new();
        let atoms = clause.body_atoms();

        let mut version = 0;
        for (delta_idx, atom) in atoms.iter().enumerate() {
            if !scc.contains(&atom.name) {
                continue;
            }
            debug!(
                "lowering version {version} of `{clause}` with delta {}",
                atom.name
            );
            let statement = ClauseLowerer::new(context)
                .generate_clause_version(scc, clause, delta_idx, version)?;
            versions.push(statement);
            version += 1;
        }

        // A plan referring to a version that was never generated means
        // the upstream recursion analysis and the plan disagree.
        if let Some(max_planned) = clause.plan.as_ref().and_then(|plan| plan.max_version()) {
            if version <= max_planned {
                return Err(LowerError::MissingPlanVersion {
                    location: clause.src_loc.clone(),
                    version: max_planned,
                    produced: version,
                });
            }
        }

        Ok(versions)
    }

    fn generate_clause_version(
        mut self,
        scc: &HashSet<QualifiedName>,
        clause: &'a Clause,
        delta_idx: usize,
        version: usize,
    ) -> Result<Statement, LowerError> {
        let atoms = clause.body_atoms();
        self.delta_atom = atoms.get(delta_idx).copied();
        self.prevs = atoms[delta_idx + 1..]
            .iter()
            .copied()
            .filter(|atom| scc.contains(&atom.name))
            .collect();

        let profile = self.context.profile;
        let mut rule = self.translate_clause(clause, clause, version)?;

        if profile {
            let message = format!(
                "@t-recursive-rule;{};{};{};{};",
                clause.head.name,
                version,
                clause.src_loc,
                stringify_for_log(&clause.to_string())
            );
            rule = Statement::LogRelationTimer {
                statement: Box::new(rule),
                message,
                relation: new_name(&clause.head.name),
            };
        }

        let message = format!("{clause}\nin file {}", clause.src_loc);
        rule = Statement::DebugInfo {
            statement: Box::new(rule),
            message,
        };

        Ok(Statement::Sequence(vec![rule]))
    }

    fn translate_clause(
        self,
        clause: &'a Clause,
        original: &'a Clause,
        version: usize,
    ) -> Result<Statement, LowerError> {
        if clause.is_fact() {
            return self.create_ram_fact_query(clause);
        }
        self.create_ram_rule_query(clause, original, version)
    }

    fn is_recursive(&self) -> bool {
        self.delta_atom.is_some()
    }

    /// Resolve the physical relation an atom reads or writes, by role:
    /// non-recursive atoms are concrete; in recursive mode the head
    /// writes the new relation and the designated delta atom reads the
    /// delta relation.
    fn clause_atom_name(&self, clause: &Clause, atom: &Atom) -> String {
        if !self.is_recursive() {
            return concrete_name(&atom.name);
        }
        if std::ptr::eq(&clause.head, atom) {
            return new_name(&atom.name);
        }
        if self
            .delta_atom
            .is_some_and(|delta| std::ptr::eq(delta, atom))
        {
            return delta_name(&atom.name);
        }
        concrete_name(&atom.name)
    }

    // Fact path
    fn create_ram_fact_query(&self, clause: &'a Clause) -> Result<Statement, LowerError> {
        if self.is_recursive() {
            return Err(LowerError::RecursiveFact {
                location: clause.src_loc.clone(),
            });
        }

        // No variables are permitted in a ground fact, so the head
        // translates against an empty index.
        let empty_index = ValueIndex::new();
        let values = clause
            .head
            .args
            .iter()
            .map(|arg| translate_value(self.context.symbols, &empty_index, arg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Statement::Query(Operation::Project {
            relation: self.clause_atom_name(clause, &clause.head),
            values,
        }))
    }

    // Rule path
    fn create_ram_rule_query(
        mut self,
        clause: &'a Clause,
        original: &'a Clause,
        version: usize,
    ) -> Result<Statement, LowerError> {
        self.atom_order = self.atom_ordering(clause, version)?;
        self.index_clause(clause)?;

        let mut op = self.create_projection(clause)?;
        op = self.add_variable_binding_constraints(op);
        op = self.add_body_literal_constraints(clause, op)?;
        op = self.add_generator_levels(op, clause)?;
        op = self.add_variable_introductions(clause, original, version, op)?;
        op = self.add_entry_point(original, op);
        Ok(Statement::Query(op))
    }

    /// Innermost layer: project the head values, guarded by an emptiness
    /// check for nullary heads so re-derivation is idempotent.
    fn create_projection(&self, clause: &'a Clause) -> Result<Operation, LowerError> {
        let head = &clause.head;
        let head_name = self.clause_atom_name(clause, head);

        let values = head
            .args
            .iter()
            .map(|arg| translate_value(self.context.symbols, &self.value_index, arg))
            .collect::<Result<Vec<_>, _>>()?;

        let mut project = Operation::Project {
            relation: head_name.clone(),
            values,
        };
        if head.arity() == 0 {
            project = project.filtered(Condition::EmptinessCheck {
                relation: head_name,
            });
        }
        Ok(project)
    }

    /// Equate every further occurrence of a variable with its first one.
    /// References at generator levels are values, not binding sites, and
    /// are skipped.
    fn add_variable_binding_constraints(&self, mut op: Operation) -> Operation {
        for (_, references) in self.value_index.variable_references() {
            let Some(first) = references.iter().next().copied() else {
                continue;
            };
            for &reference in references {
                if reference != first && !self.value_index.is_generator_level(reference.level) {
                    // TODO: use FEq once column types reach the lowerer
                    op = self.add_equality_check(
                        op,
                        Expression::tuple_element(first.level, first.column),
                        Expression::tuple_element(reference.level, reference.column),
                        false,
                    );
                }
            }
        }
        op
    }

    fn add_body_literal_constraints(
        &self,
        clause: &'a Clause,
        mut op: Operation,
    ) -> Result<Operation, LowerError> {
        for literal in &clause.body {
            if let Some(condition) = translate_constraint(
                self.context.catalog,
                self.context.symbols,
                &self.value_index,
                literal,
            )? {
                op = op.filtered(condition);
            }
        }

        if self.is_recursive() {
            // Subtract tuples this round has already produced, then
            // tuples the previous delta positions will re-derive.
            if clause.head.arity() > 0 {
                op = self.add_negation(&clause.head, new_name(&clause.head.name), op)?;
            }
            for prev in self.prevs.clone() {
                op = self.add_negation(prev, delta_name(&prev.name), op)?;
            }
        }

        Ok(op)
    }

    /// Negate an atom against the named physical relation, padding the
    /// auxiliary columns with the undefined value.
    fn add_negation(
        &self,
        atom: &'a Atom,
        relation: String,
        op: Operation,
    ) -> Result<Operation, LowerError> {
        let info = self.context.catalog.relation(&atom.name)?;
        let (user_arity, aux_arity) = constraints::split_arity(atom, info.aux_arity)?;

        if user_arity == 0 {
            return Ok(op.filtered(Condition::EmptinessCheck { relation }));
        }

        let mut values = Vec::with_capacity(atom.arity());
        for arg in &atom.args[..user_arity] {
            values.push(translate_value(
                self.context.symbols,
                &self.value_index,
                arg,
            )?);
        }
        values.extend(std::iter::repeat(Expression::UndefValue).take(aux_arity));

        Ok(op.filtered(Condition::ExistenceCheck { relation, values }.negate()))
    }

    // Generator layers
    fn add_generator_levels(
        &self,
        mut op: Operation,
        clause: &'a Clause,
    ) -> Result<Operation, LowerError> {
        let mut level = self.operators.len() + self.generators.len();
        for &generator in self.generators.iter().rev() {
            level -= 1;
            op = match generator {
                Generator::Aggregate(agg) => {
                    self.instantiate_aggregator(op, clause, agg, level)?
                }
                Generator::MultiResult(func) => {
                    self.instantiate_multi_result_functor(op, func, level)?
                }
            };
        }
        Ok(op)
    }

    fn instantiate_aggregator(
        &self,
        op: Operation,
        clause: &'a Clause,
        agg: &'a Aggregator,
        level: usize,
    ) -> Result<Operation, LowerError> {
        let mut agg_cond: Option<Condition> = None;

        // body literals become parts of the aggregation condition
        for literal in &agg.body {
            if let Some(condition) = translate_constraint(
                self.context.catalog,
                self.context.symbols,
                &self.value_index,
                literal,
            )? {
                agg_cond = Some(Condition::conjoin(agg_cond, condition));
            }
        }

        let body_atoms = agg.body_atoms();
        if body_atoms.len() != 1 {
            return Err(LowerError::AggregatorBodyAtoms {
                location: clause.src_loc.clone(),
                found: body_atoms.len(),
            });
        }
        let agg_atom = body_atoms[0];

        // equate the aggregated atom's columns with the values they must
        // carry, skipping self-referential variable bindings
        let add_agg_eq = |acc: Option<Condition>, value: Expression, column: usize| {
            if value.is_undef() {
                return acc;
            }
            // TODO: use FEq once column types reach the lowerer
            Some(Condition::conjoin(
                acc,
                Condition::Constraint {
                    op: BinaryRelOp::Eq,
                    lhs: Expression::tuple_element(level, column),
                    rhs: value,
                },
            ))
        };

        for (column, arg) in agg_atom.args.iter().enumerate() {
            if let Argument::Variable(name) = arg {
                if let Some(references) = self.value_index.references_of(name) {
                    for reference in references {
                        if reference.level != level || reference.column != column {
                            agg_cond = add_agg_eq(
                                agg_cond,
                                Expression::tuple_element(reference.level, reference.column),
                                column,
                            );
                            break;
                        }
                    }
                }
            } else {
                let value =
                    translate_value(self.context.symbols, &self.value_index, arg)?;
                agg_cond = add_agg_eq(agg_cond, value, column);
            }
        }

        let target = match &agg.target {
            Some(expr) => translate_value(self.context.symbols, &self.value_index, expr)?,
            None => Expression::UndefValue,
        };

        Ok(Operation::Aggregate {
            op: agg.op,
            relation: self.clause_atom_name(clause, agg_atom),
            target,
            condition: agg_cond.unwrap_or(Condition::True),
            level,
            inner: Box::new(op),
        })
    }

    fn instantiate_multi_result_functor(
        &self,
        op: Operation,
        func: &'a IntrinsicFunctor,
        level: usize,
    ) -> Result<Operation, LowerError> {
        let args = func
            .args
            .iter()
            .map(|arg| translate_value(self.context.symbols, &self.value_index, arg))
            .collect::<Result<Vec<_>, _>>()?;

        let nested_op = match func.final_type {
            Some(NumericType::Int) => NestedIntrinsicOp::Range,
            Some(NumericType::Uint) => NestedIntrinsicOp::URange,
            Some(NumericType::Float) => NestedIntrinsicOp::FRange,
            None => {
                return Err(LowerError::UntypedFunctor {
                    op: func.op.name(),
                })
            }
        };

        Ok(Operation::NestedIntrinsic {
            op: nested_op,
            args,
            level,
            inner: Box::new(op),
        })
    }

    // Operator layers
    fn add_variable_introductions(
        &self,
        clause: &'a Clause,
        original: &'a Clause,
        version: usize,
        mut op: Operation,
    ) -> Result<Operation, LowerError> {
        for level in (0..self.operators.len()).rev() {
            op = match self.operators[level] {
                Operator::Scan(atom) => {
                    self.add_atom_scan(op, atom, clause, original, level, version)?
                }
                Operator::Unpack(record) => self.add_record_unpack(op, record, level)?,
            };
        }
        Ok(op)
    }

    fn add_atom_scan(
        &self,
        mut op: Operation,
        atom: &'a Atom,
        clause: &'a Clause,
        original: &'a Clause,
        level: usize,
        version: usize,
    ) -> Result<Operation, LowerError> {
        let head = &clause.head;

        op = self.add_constant_constraints(level, &atom.args, op)?;

        let atom_name = self.clause_atom_name(clause, atom);
        op = op.filtered(
            Condition::EmptinessCheck {
                relation: atom_name.clone(),
            }
            .negate(),
        );

        // a nullary or all-wildcard atom needs no scan, only the
        // emptiness filter above
        if atom.arity() != 0 && !atom.all_args_unnamed() {
            if head.arity() == 0 {
                // stop iterating once the nullary head has been produced
                op = Operation::Break {
                    condition: Condition::EmptinessCheck {
                        relation: self.clause_atom_name(clause, head),
                    }
                    .negate(),
                    inner: Box::new(op),
                };
            }

            let mut profile_text = String::new();
            if self.context.profile {
                profile_text = format!(
                    "@frequency-atom;{};{};{};{};{};{};",
                    original.head.name,
                    version,
                    stringify_for_log(&clause.to_string()),
                    stringify_for_log(&atom.to_string()),
                    stringify_for_log(&original.to_string()),
                    level
                );
            }

            op = Operation::Scan {
                relation: atom_name,
                level,
                inner: Box::new(op),
                profile_text,
            };
        }

        Ok(op)
    }

    fn add_record_unpack(
        &self,
        mut op: Operation,
        record: &'a RecordInit,
        level: usize,
    ) -> Result<Operation, LowerError> {
        op = self.add_constant_constraints(level, &record.args, op)?;

        let definition = self
            .value_index
            .record_definition(record)
            .ok_or(LowerError::UnindexedRecord)?;

        Ok(Operation::UnpackRecord {
            level,
            source: Expression::tuple_element(definition.level, definition.column),
            arity: record.arity(),
            inner: Box::new(op),
        })
    }

    /// Match constant arguments of the tuple bound at `level` against
    /// their coded values
    fn add_constant_constraints(
        &self,
        level: usize,
        args: &'a [Argument],
        mut op: Operation,
    ) -> Result<Operation, LowerError> {
        for (column, arg) in args.iter().enumerate() {
            if !arg.is_constant() {
                continue;
            }
            let is_float = matches!(
                arg,
                Argument::NumericConstant {
                    final_type: Some(NumericType::Float),
                    ..
                }
            );
            let value = translate_constant(self.context.symbols, arg)?;
            op = self.add_equality_check(
                op,
                Expression::tuple_element(level, column),
                value,
                is_float,
            );
        }
        Ok(op)
    }

    fn add_equality_check(
        &self,
        op: Operation,
        lhs: Expression,
        rhs: Expression,
        is_float: bool,
    ) -> Operation {
        let eq_op = if is_float {
            BinaryRelOp::FEq
        } else {
            BinaryRelOp::Eq
        };
        op.filtered(Condition::Constraint {
            op: eq_op,
            lhs,
            rhs,
        })
    }

    // Entry point
    /// Skip the whole query once a nullary head has been produced
    fn add_entry_point(&self, original: &'a Clause, op: Operation) -> Operation {
        match self.create_condition(original) {
            Some(condition) => op.filtered(condition),
            None => op,
        }
    }

    fn create_condition(&self, original: &'a Clause) -> Option<Condition> {
        let head = &original.head;
        if head.arity() == 0 {
            return Some(Condition::EmptinessCheck {
                relation: self.clause_atom_name(original, head),
            });
        }
        None
    }

    // Atom ordering
    /// The body atoms in the order imposed by the clause's plan for this
    /// version, or source order without one
    fn atom_ordering(
        &self,
        clause: &'a Clause,
        version: usize,
    ) -> Result<Vec<&'a Atom>, LowerError> {
        let atoms = clause.body_atoms();

        let Some(order) = clause
            .plan
            .as_ref()
            .and_then(|plan| plan.order_for(version))
        else {
            return Ok(atoms);
        };

        // plans are 1-based permutations of the atom positions
        let mut seen = vec![false; atoms.len()];
        let mut reordered = Vec::with_capacity(atoms.len());
        for &position in order {
            let idx = position.wrapping_sub(1);
            if idx >= atoms.len() || seen[idx] {
                return Err(LowerError::MalformedPlan {
                    location: clause.src_loc.clone(),
                    version,
                    atoms: atoms.len(),
                });
            }
            seen[idx] = true;
            reordered.push(atoms[idx]);
        }
        if reordered.len() != atoms.len() {
            return Err(LowerError::MalformedPlan {
                location: clause.src_loc.clone(),
                version,
                atoms: atoms.len(),
            });
        }
        Ok(reordered)
    }

    // Indexing
    fn add_operator_level(&mut self, operator: Operator<'a>) -> usize {
        let level = self.operators.len() + self.generators.len();
        self.operators.push(operator);
        level
    }

    fn add_generator_level(&mut self, generator: Generator<'a>) -> usize {
        let level = self.operators.len() + self.generators.len();
        self.generators.push(generator);
        level
    }

    fn index_clause(&mut self, clause: &'a Clause) -> Result<(), LowerError> {
        // Atoms first: generator levels must sit strictly above every
        // scan and unpack level so that the reverse-order emission keeps
        // generators inside the scope their bindings resolve in.
        self.index_atoms();
        self.index_aggregators(clause)?;
        self.index_multi_result_functors(clause);
        trace!(
            "indexed `{clause}`: {} operator levels, {} generator levels",
            self.operators.len(),
            self.generators.len()
        );
        Ok(())
    }

    fn index_atoms(&mut self) {
        for atom in self.atom_order.clone() {
            let scan_level = self.add_operator_level(Operator::Scan(atom));
            self.index_node_arguments(scan_level, &atom.args);
        }
    }

    fn index_node_arguments(&mut self, level: usize, args: &'a [Argument]) {
        for (column, arg) in args.iter().enumerate() {
            match arg {
                Argument::Variable(name) => {
                    self.value_index
                        .add_var_reference(name, Location::new(level, column));
                }
                Argument::RecordInit(record) => {
                    self.value_index
                        .set_record_definition(record, Location::new(level, column));
                    // a nested record binds its own tuple one level down
                    let unpack_level = self.add_operator_level(Operator::Unpack(record));
                    self.index_node_arguments(unpack_level, &record.args);
                }
                _ => {}
            }
        }
    }

    fn index_generator(&mut self, generator: Generator<'a>) {
        let level = self.add_generator_level(generator);
        let source = match generator {
            Generator::Aggregate(agg) => GeneratorSource::Aggregator(agg),
            Generator::MultiResult(func) => GeneratorSource::Functor(func),
        };
        self.value_index
            .set_generator_loc(source, Location::new(level, 0));
    }

    fn index_aggregators(&mut self, clause: &'a Clause) -> Result<(), LowerError> {
        let aggregators = clause.aggregators();

        // first reserve a level per aggregator
        for &agg in &aggregators {
            self.index_generator(Generator::Aggregate(agg));
        }

        // then index the variables of each aggregator body
        for &agg in &aggregators {
            self.index_aggregator_body(clause, agg)?;
        }

        // finally, bind `v = <agg>` results into the outer scope
        for bc in clause.binary_constraints() {
            if !bc.op.is_eq() {
                continue;
            }
            let (Some(name), Some(agg)) = (bc.lhs.as_variable(), bc.rhs.as_aggregator()) else {
                continue;
            };
            if let Some(location) = self.value_index.aggregator_loc(agg) {
                self.value_index.add_var_reference(name, location);
            }
        }

        Ok(())
    }

    fn index_aggregator_body(
        &mut self,
        clause: &'a Clause,
        agg: &'a Aggregator,
    ) -> Result<(), LowerError> {
        let Some(location) = self.value_index.aggregator_loc(agg) else {
            return Err(LowerError::UnindexedGenerator);
        };

        let body_atoms = agg.body_atoms();
        if body_atoms.len() != 1 {
            return Err(LowerError::AggregatorBodyAtoms {
                location: clause.src_loc.clone(),
                found: body_atoms.len(),
            });
        }

        for (column, arg) in body_atoms[0].args.iter().enumerate() {
            if let Argument::Variable(name) = arg {
                self.value_index
                    .add_var_reference(name, Location::new(location.level, column));
            }
        }
        Ok(())
    }

    fn index_multi_result_functors(&mut self, clause: &'a Clause) {
        let functors: Vec<&IntrinsicFunctor> = clause
            .intrinsic_functors()
            .into_iter()
            .filter(|func| func.is_multi_result())
            .collect();

        for &func in &functors {
            self.index_generator(Generator::MultiResult(func));
        }

        // bind `v = range(..)` results into the outer scope
        for bc in clause.binary_constraints() {
            if !bc.op.is_eq() {
                continue;
            }
            let Some(name) = bc.lhs.as_variable() else {
                continue;
            };
            let Argument::IntrinsicFunctor(func) = &bc.rhs else {
                continue;
            };
            if !func.is_multi_result() {
                continue;
            }
            if let Some(location) = self.value_index.functor_loc(func) {
                self.value_index.add_var_reference(name, location);
            }
        }
    }
}

/// Escape a clause or atom rendering for the semicolon-delimited profile
/// log format: backslash, quote, semicolon, and newline are escaped.
pub fn stringify_for_log(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}
