//! End-to-end lowering tests: clause in, RAM statement out.

use std::collections::HashSet;

use stratalog::ast::builders::{agg, atom, functor, int, record, string, unnamed, var, ClauseBuilder};
use stratalog::ast::{AggregateOp, FunctorOp, NumericType, QualifiedName};
use stratalog::ram::{BinaryRelOp, Condition, Expression, NestedIntrinsicOp, Operation, Statement};
use stratalog::{ClauseLowerer, LowerContext, LowerError, RelationCatalog, SymbolTable};

fn catalog() -> RelationCatalog {
    let mut catalog = RelationCatalog::new();
    catalog.register_relation("p", 1);
    catalog.register_relation("q", 1);
    catalog.register_relation("r", 2);
    catalog.register_relation("edge", 2);
    catalog.register_relation("path", 2);
    catalog.register_relation("t", 2);
    catalog
}

fn scc(names: &[&str]) -> HashSet<QualifiedName> {
    names.iter().map(|n| QualifiedName::new(*n)).collect()
}

fn query(statement: &Statement) -> &Operation {
    statement.innermost_query().expect("statement has a query")
}

/// Equality filters between two tuple elements, outermost first
fn tuple_equalities(op: &Operation) -> Vec<&Condition> {
    op.filter_conditions()
        .into_iter()
        .filter(|condition| {
            matches!(
                condition,
                Condition::Constraint {
                    op: BinaryRelOp::Eq,
                    lhs: Expression::TupleElement { .. },
                    rhs: Expression::TupleElement { .. },
                }
            )
        })
        .collect()
}

// Ground facts
#[test]
fn test_fact_lowers_to_a_bare_projection() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(1, "a").
    let fact = ClauseBuilder::fact(atom("p", [int(1), string("a")]));
    let statement = ClauseLowerer::new(&context).lower(&fact).unwrap();

    let Statement::Query(op) = &statement else {
        panic!("expected a query");
    };
    assert_eq!(
        *op,
        Operation::Project {
            relation: "p".to_string(),
            values: vec![
                Expression::SignedConstant(1),
                // first interned symbol
                Expression::SignedConstant(0),
            ],
        }
    );
}

#[test]
fn test_fact_with_a_variable_is_rejected() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    let fact = ClauseBuilder::fact(atom("p", [var("x")]));
    let err = ClauseLowerer::new(&context).lower(&fact).unwrap_err();
    assert_eq!(
        err,
        LowerError::UngroundedVariable {
            name: "x".to_string()
        }
    );
}

// Non-recursive rules
#[test]
fn test_simple_join() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(x) :- q(x), r(x, x).
    let clause = ClauseBuilder::new(atom("p", [var("x")]))
        .atom(atom("q", [var("x")]))
        .atom(atom("r", [var("x"), var("x")]))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    // both atoms introduce scan levels in source order
    assert_eq!(op.scans(), vec![("q", 0), ("r", 1)]);
    // levels stay inside the operator range
    assert!(op.referenced_levels().iter().all(|&level| level < 2));

    // x occurs three times: two binding equalities back to t0.0
    let equalities = tuple_equalities(op);
    assert_eq!(equalities.len(), 2);
    for condition in equalities {
        let Condition::Constraint { lhs, .. } = condition else {
            unreachable!();
        };
        assert_eq!(*lhs, Expression::tuple_element(0, 0));
    }

    // the innermost layer projects t0.0 into p
    let mut innermost = op;
    while let Some(inner) = innermost.inner() {
        innermost = inner;
    }
    assert_eq!(
        *innermost,
        Operation::Project {
            relation: "p".to_string(),
            values: vec![Expression::tuple_element(0, 0)],
        }
    );
}

#[test]
fn test_emptiness_guards_on_every_atom() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    let clause = ClauseBuilder::new(atom("p", [var("x")]))
        .atom(atom("q", [var("x")]))
        .atom(atom("r", [var("x"), unnamed()]))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();

    let guards: Vec<String> = query(&statement)
        .filter_conditions()
        .into_iter()
        .filter_map(|condition| match condition {
            Condition::Negation(inner) => match &**inner {
                Condition::EmptinessCheck { relation } => Some(relation.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(guards, vec!["q".to_string(), "r".to_string()]);
}

#[test]
fn test_constant_match_filters_inside_the_scan() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(y) :- r(3, y).
    let clause = ClauseBuilder::new(atom("p", [var("y")]))
        .atom(atom("r", [int(3), var("y")]))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    assert_eq!(op.scans(), vec![("r", 0)]);
    let constant_filter = op
        .filter_conditions()
        .into_iter()
        .find(|condition| {
            matches!(
                condition,
                Condition::Constraint {
                    rhs: Expression::SignedConstant(3),
                    ..
                }
            )
        })
        .expect("constant filter present");
    assert_eq!(
        *constant_filter,
        Condition::Constraint {
            op: BinaryRelOp::Eq,
            lhs: Expression::tuple_element(0, 0),
            rhs: Expression::SignedConstant(3),
        }
    );
}

#[test]
fn test_float_constants_use_float_equality() {
    let mut catalog = catalog();
    catalog.register_relation("score", 1);
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    let clause = ClauseBuilder::new(atom("p", [var("x")]))
        .atom(atom("q", [var("x")]))
        .atom(atom(
            "score",
            [stratalog::ast::builders::float(1.5)],
        ))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();

    let has_float_eq = query(&statement).filter_conditions().into_iter().any(
        |condition| {
            matches!(
                condition,
                Condition::Constraint {
                    op: BinaryRelOp::FEq,
                    rhs: Expression::FloatConstant(_),
                    ..
                }
            )
        },
    );
    assert!(has_float_eq);
}

#[test]
fn test_negation_with_wildcard_pads_and_negates() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(x) :- q(x), !r(x, _).
    let clause = ClauseBuilder::new(atom("p", [var("x")]))
        .atom(atom("q", [var("x")]))
        .negation(atom("r", [var("x"), unnamed()]))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    // only q scans; the negation is a filter
    assert_eq!(op.scans(), vec![("q", 0)]);

    let negation = op
        .filter_conditions()
        .into_iter()
        .find_map(|condition| match condition {
            Condition::Negation(inner) => match &**inner {
                check @ Condition::ExistenceCheck { .. } => Some(check),
                _ => None,
            },
            _ => None,
        })
        .expect("negated existence check present");
    assert_eq!(
        *negation,
        Condition::ExistenceCheck {
            relation: "r".to_string(),
            values: vec![Expression::tuple_element(0, 0), Expression::UndefValue],
        }
    );
}

#[test]
fn test_all_wildcard_atom_needs_no_scan() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(x) :- q(x), r(_, _).
    let clause = ClauseBuilder::new(atom("p", [var("x")]))
        .atom(atom("q", [var("x")]))
        .atom(atom("r", [unnamed(), unnamed()]))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    // r is guarded by an emptiness filter but never scanned
    assert_eq!(op.scans(), vec![("q", 0)]);
    let guarded = op.filter_conditions().into_iter().any(|condition| {
        matches!(
            condition,
            Condition::Negation(inner)
                if matches!(&**inner, Condition::EmptinessCheck { relation } if relation == "r")
        )
    });
    assert!(guarded);
}

// Records
#[test]
fn test_record_argument_unpacks_at_its_own_level() {
    let mut catalog = catalog();
    catalog.register_relation("holds", 1);
    catalog.register_relation("pair", 2);
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // pair(x, y) :- holds([x, y]).
    let clause = ClauseBuilder::new(atom("pair", [var("x"), var("y")]))
        .atom(atom("holds", [record([var("x"), var("y")])]))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    assert_eq!(op.scans(), vec![("holds", 0)]);

    // the unpack binds level 1 from the record reference at t0.0
    let mut found_unpack = false;
    let mut current = Some(op);
    while let Some(node) = current {
        if let Operation::UnpackRecord {
            level,
            source,
            arity,
            ..
        } = node
        {
            found_unpack = true;
            assert_eq!(*level, 1);
            assert_eq!(*source, Expression::tuple_element(0, 0));
            assert_eq!(*arity, 2);
        }
        current = node.inner();
    }
    assert!(found_unpack);

    // head values read the unpacked columns
    let mut innermost = op;
    while let Some(inner) = innermost.inner() {
        innermost = inner;
    }
    assert_eq!(
        *innermost,
        Operation::Project {
            relation: "pair".to_string(),
            values: vec![
                Expression::tuple_element(1, 0),
                Expression::tuple_element(1, 1)
            ],
        }
    );
}

#[test]
fn test_record_in_head_packs() {
    let mut catalog = catalog();
    catalog.register_relation("boxed", 1);
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // boxed([x, y]) :- r(x, y).
    let clause = ClauseBuilder::new(atom("boxed", [record([var("x"), var("y")])]))
        .atom(atom("r", [var("x"), var("y")]))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();

    let mut innermost = query(&statement);
    while let Some(inner) = innermost.inner() {
        innermost = inner;
    }
    assert_eq!(
        *innermost,
        Operation::Project {
            relation: "boxed".to_string(),
            values: vec![Expression::PackRecord(vec![
                Expression::tuple_element(0, 0),
                Expression::tuple_element(0, 1),
            ])],
        }
    );
}

// Nullary heads
#[test]
fn test_nullary_head_is_idempotent_and_breaks() {
    let mut catalog = catalog();
    catalog.register_relation("triggered", 0);
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // triggered() :- q(x).
    let clause = ClauseBuilder::new(atom("triggered", []))
        .atom(atom("q", [var("x")]))
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    // outer entry-point filter skips the whole query once derived
    let Operation::Filter { condition, .. } = op else {
        panic!("expected the entry-point filter outermost");
    };
    assert_eq!(
        *condition,
        Condition::EmptinessCheck {
            relation: "triggered".to_string()
        }
    );

    // inner guard wraps the projection as well
    let emptiness_filters = op
        .filter_conditions()
        .into_iter()
        .filter(|c| {
            matches!(c, Condition::EmptinessCheck { relation } if relation == "triggered")
        })
        .count();
    assert_eq!(emptiness_filters, 2);

    // the scan stops as soon as the head holds
    let mut found_break = false;
    let mut current = Some(op);
    while let Some(node) = current {
        if let Operation::Break { condition, .. } = node {
            found_break = true;
            assert_eq!(
                *condition,
                Condition::EmptinessCheck {
                    relation: "triggered".to_string()
                }
                .negate()
            );
        }
        current = node.inner();
    }
    assert!(found_break);
}

// Aggregators
#[test]
fn test_count_aggregator_owns_the_nesting() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(c) :- c = count : { q(_) }.
    let clause = ClauseBuilder::new(atom("p", [var("c")]))
        .eq(
            var("c"),
            agg(
                AggregateOp::Count,
                None,
                [stratalog::ast::Literal::Atom(atom("q", [unnamed()]))],
            ),
        )
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    // no scans: the aggregator owns level 0
    assert_eq!(op.scans(), vec![]);
    let Operation::Aggregate {
        op: agg_op,
        relation,
        target,
        condition,
        level,
        ..
    } = op
    else {
        panic!("expected an aggregate outermost");
    };
    assert_eq!(*agg_op, AggregateOp::Count);
    assert_eq!(relation, "q");
    assert!(target.is_undef());
    assert_eq!(*condition, Condition::True);
    assert_eq!(*level, 0);

    // the projection reads the aggregator's output column
    let mut innermost = op;
    while let Some(inner) = innermost.inner() {
        innermost = inner;
    }
    assert_eq!(
        *innermost,
        Operation::Project {
            relation: "p".to_string(),
            values: vec![Expression::tuple_element(0, 0)],
        }
    );
}

#[test]
fn test_aggregator_condition_binds_outer_variables() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(x) :- q(x), x = count : { r(x, _) }.
    //
    // The aggregated atom's first column must equal the outer x.
    let clause = ClauseBuilder::new(atom("p", [var("x")]))
        .atom(atom("q", [var("x")]))
        .eq(
            var("x"),
            agg(
                AggregateOp::Count,
                None,
                [stratalog::ast::Literal::Atom(atom("r", [var("x"), unnamed()]))],
            ),
        )
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    // one scan for q at level 0, the aggregator at level 1
    assert_eq!(op.scans(), vec![("q", 0)]);
    let mut current = Some(op);
    let mut aggregate_condition = None;
    while let Some(node) = current {
        if let Operation::Aggregate {
            level, condition, ..
        } = node
        {
            assert_eq!(*level, 1);
            aggregate_condition = Some(condition.clone());
        }
        current = node.inner();
    }
    let condition = aggregate_condition.expect("aggregate layer present");
    assert_eq!(
        condition,
        Condition::Constraint {
            op: BinaryRelOp::Eq,
            lhs: Expression::tuple_element(1, 0),
            rhs: Expression::tuple_element(0, 0),
        }
    );
}

#[test]
fn test_aggregator_with_two_body_atoms_is_rejected() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    let clause = ClauseBuilder::new(atom("p", [var("c")]))
        .eq(
            var("c"),
            agg(
                AggregateOp::Count,
                None,
                [
                    stratalog::ast::Literal::Atom(atom("q", [unnamed()])),
                    stratalog::ast::Literal::Atom(atom("r", [unnamed(), unnamed()])),
                ],
            ),
        )
        .build();
    let err = ClauseLowerer::new(&context).lower(&clause).unwrap_err();
    assert!(matches!(
        err,
        LowerError::AggregatorBodyAtoms { found: 2, .. }
    ));
}

// Multi-result functors
#[test]
fn test_range_functor_nests() {
    let mut catalog = catalog();
    catalog.register_relation("idx", 1);
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // idx(i) :- i = range(0, 5).
    let clause = ClauseBuilder::new(atom("idx", [var("i")]))
        .eq(
            var("i"),
            functor(FunctorOp::Range, [int(0), int(5)], NumericType::Int),
        )
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    let op = query(&statement);

    let Operation::NestedIntrinsic {
        op: nested,
        args,
        level,
        ..
    } = op
    else {
        panic!("expected a nested intrinsic outermost");
    };
    assert_eq!(*nested, NestedIntrinsicOp::Range);
    assert_eq!(*level, 0);
    assert_eq!(
        *args,
        vec![Expression::SignedConstant(0), Expression::SignedConstant(5)]
    );
}

#[test]
fn test_scalar_functor_stays_inline() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(s) :- r(x, y), s = (x + y).
    let clause = ClauseBuilder::new(atom("p", [var("s")]))
        .atom(atom("r", [var("x"), var("y")]))
        .eq(
            var("s"),
            functor(FunctorOp::Add, [var("x"), var("y")], NumericType::Int),
        )
        .build();
    // s only occurs in the head and the constraint, so it has no binding
    // position: alias resolution upstream rewrites such clauses before
    // they reach the lowerer, and an unresolved one is reported.
    let err = ClauseLowerer::new(&context).lower(&clause).unwrap_err();
    assert_eq!(
        err,
        LowerError::UngroundedVariable {
            name: "s".to_string()
        }
    );
}

// Semi-naïve versions
#[test]
fn test_single_recursive_atom_yields_one_version() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // path(x, z) :- path(x, y), edge(y, z).  SCC = {path}
    let clause = ClauseBuilder::new(atom("path", [var("x"), var("z")]))
        .atom(atom("path", [var("x"), var("y")]))
        .atom(atom("edge", [var("y"), var("z")]))
        .build();
    let versions =
        ClauseLowerer::lower_versions(&context, &scc(&["path"]), &clause).unwrap();
    assert_eq!(versions.len(), 1);

    let op = query(&versions[0]);
    assert_eq!(op.scans(), vec![("@delta_path", 0), ("edge", 1)]);

    // only newly derivable tuples survive
    let negated: Vec<String> = op
        .filter_conditions()
        .into_iter()
        .filter_map(|condition| match condition {
            Condition::Negation(inner) => match &**inner {
                Condition::ExistenceCheck { relation, .. } => Some(relation.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(negated, vec!["@new_path".to_string()]);
}

#[test]
fn test_two_recursive_atoms_yield_two_versions() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // t(x, z) :- t(x, y), t(y, z).  SCC = {t}
    let clause = ClauseBuilder::new(atom("t", [var("x"), var("z")]))
        .atom(atom("t", [var("x"), var("y")]))
        .atom(atom("t", [var("y"), var("z")]))
        .build();
    let versions = ClauseLowerer::lower_versions(&context, &scc(&["t"]), &clause).unwrap();
    assert_eq!(versions.len(), 2);

    // each version wraps as Sequence[DebugInfo[Query]]
    for statement in &versions {
        let Statement::Sequence(stmts) = statement else {
            panic!("expected a sequence");
        };
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Statement::DebugInfo { .. }));
    }

    // version 0: first atom is the delta, second subtracts via prevs
    let first = query(&versions[0]);
    assert_eq!(first.scans(), vec![("@delta_t", 0), ("t", 1)]);
    let negated: Vec<String> = first
        .filter_conditions()
        .into_iter()
        .filter_map(|condition| match condition {
            Condition::Negation(inner) => match &**inner {
                Condition::ExistenceCheck { relation, .. } => Some(relation.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert!(negated.contains(&"@new_t".to_string()));
    assert!(negated.contains(&"@delta_t".to_string()));

    // version 1: second atom is the delta, no prevs remain
    let second = query(&versions[1]);
    assert_eq!(second.scans(), vec![("t", 0), ("@delta_t", 1)]);
    let negated: Vec<String> = second
        .filter_conditions()
        .into_iter()
        .filter_map(|condition| match condition {
            Condition::Negation(inner) => match &**inner {
                Condition::ExistenceCheck { relation, .. } => Some(relation.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(negated, vec!["@new_t".to_string()]);
}

#[test]
fn test_version_driver_skips_non_scc_clauses_entirely() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // no body atom lies in the SCC: nothing to iterate
    let clause = ClauseBuilder::new(atom("p", [var("x")]))
        .atom(atom("q", [var("x")]))
        .build();
    let versions =
        ClauseLowerer::lower_versions(&context, &scc(&["path"]), &clause).unwrap();
    assert!(versions.is_empty());
}

// Plans
#[test]
fn test_plan_reorders_scans() {
    let mut catalog = catalog();
    catalog.register_relation("a", 1);
    catalog.register_relation("b", 1);
    catalog.register_relation("c", 1);
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // p(x) :- a(x), b(x), c(x).  plan 0: c, a, b
    let clause = ClauseBuilder::new(atom("p", [var("x")]))
        .atom(atom("a", [var("x")]))
        .atom(atom("b", [var("x")]))
        .atom(atom("c", [var("x")]))
        .plan_order(0, [3, 1, 2])
        .build();
    let statement = ClauseLowerer::new(&context).lower(&clause).unwrap();
    assert_eq!(
        query(&statement).scans(),
        vec![("c", 0), ("a", 1), ("b", 2)]
    );
}

#[test]
fn test_plan_applies_per_version() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    // version 1 flips the atom order, so its delta scans first
    let clause = ClauseBuilder::new(atom("t", [var("x"), var("z")]))
        .atom(atom("t", [var("x"), var("y")]))
        .atom(atom("t", [var("y"), var("z")]))
        .plan_order(1, [2, 1])
        .build();
    let versions = ClauseLowerer::lower_versions(&context, &scc(&["t"]), &clause).unwrap();
    assert_eq!(versions.len(), 2);

    assert_eq!(query(&versions[0]).scans(), vec![("@delta_t", 0), ("t", 1)]);
    assert_eq!(query(&versions[1]).scans(), vec![("@delta_t", 0), ("t", 1)]);
}

#[test]
fn test_plan_for_a_missing_version_is_fatal() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    let clause = ClauseBuilder::new(atom("t", [var("x"), var("z")]))
        .atom(atom("t", [var("x"), var("y")]))
        .atom(atom("edge", [var("y"), var("z")]))
        .plan_order(1, [2, 1])
        .build();
    let err = ClauseLowerer::lower_versions(&context, &scc(&["t"]), &clause).unwrap_err();
    assert_eq!(
        err,
        LowerError::MissingPlanVersion {
            location: clause.src_loc.clone(),
            version: 1,
            produced: 1,
        }
    );
}

// Annotations
#[test]
fn test_profile_mode_decorates_scans_and_versions() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols).with_profiling(true);

    let clause = ClauseBuilder::new(atom("t", [var("x"), var("z")]))
        .atom(atom("t", [var("x"), var("y")]))
        .atom(atom("t", [var("y"), var("z")]))
        .at("rules.dl", 3, 1)
        .build();
    let versions = ClauseLowerer::lower_versions(&context, &scc(&["t"]), &clause).unwrap();

    // the timer sits between the debug wrapper and the query
    let Statement::Sequence(stmts) = &versions[0] else {
        panic!("expected a sequence");
    };
    let Statement::DebugInfo { statement, message } = &stmts[0] else {
        panic!("expected debug info");
    };
    assert_eq!(
        message,
        "t(x, z) :- t(x, y), t(y, z).\nin file rules.dl:3:1"
    );
    let Statement::LogRelationTimer {
        message, relation, ..
    } = &**statement
    else {
        panic!("expected a relation timer");
    };
    assert_eq!(relation, "@new_t");
    assert_eq!(
        message,
        "@t-recursive-rule;t;0;rules.dl:3:1;t(x, z) :- t(x, y), t(y, z).;"
    );

    // every scan carries the frequency annotation
    let op = query(&versions[0]);
    let mut current = Some(op);
    let mut checked = 0;
    while let Some(node) = current {
        if let Operation::Scan {
            profile_text,
            level,
            ..
        } = node
        {
            let atom_text = if *level == 0 { "t(x, y)" } else { "t(y, z)" };
            let expected = format!(
                "@frequency-atom;t;0;t(x, z) :- t(x, y), t(y, z).;{atom_text};t(x, z) :- t(x, y), t(y, z).;{level};"
            );
            assert_eq!(*profile_text, expected);
            checked += 1;
        }
        current = node.inner();
    }
    assert_eq!(checked, 2);
}

#[test]
fn test_without_profiling_scans_carry_no_annotation() {
    let catalog = catalog();
    let symbols = SymbolTable::new();
    let context = LowerContext::new(&catalog, &symbols);

    let clause = ClauseBuilder::new(atom("path", [var("x"), var("z")]))
        .atom(atom("path", [var("x"), var("y")]))
        .atom(atom("edge", [var("y"), var("z")]))
        .build();
    let versions =
        ClauseLowerer::lower_versions(&context, &scc(&["path"]), &clause).unwrap();

    let mut current = Some(query(&versions[0]));
    while let Some(node) = current {
        if let Operation::Scan { profile_text, .. } = node {
            assert!(profile_text.is_empty());
        }
        current = node.inner();
    }
    assert!(matches!(versions[0], Statement::Sequence(_)));
}
