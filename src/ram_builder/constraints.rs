//! Literal-to-condition translation.
//!
//! Positive atoms become scans and aggregators become nests, so neither
//! yields a condition here. Binary constraints translate directly;
//! negated atoms translate to emptiness or negated existence checks with
//! their auxiliary columns padded by the undefined value.

use crate::ast::{Atom, BinaryConstraintOp, Literal};
use crate::catalog::{concrete_name, RelationCatalog};
use crate::error::LowerError;
use crate::ram::{BinaryRelOp, Condition, Expression};
use crate::ram_builder::value_index::ValueIndex;
use crate::ram_builder::values::translate_value;
use crate::symbol_table::SymbolTable;

/// Translate a body literal into an optional filter condition
pub fn translate_constraint(
    catalog: &RelationCatalog,
    symbols: &SymbolTable,
    index: &ValueIndex<'_>,
    literal: &Literal,
) -> Result<Option<Condition>, LowerError> {
    match literal {
        Literal::Atom(_) | Literal::Aggregator(_) => Ok(None),
        Literal::BinaryConstraint(bc) => {
            let lhs = translate_value(symbols, index, &bc.lhs)?;
            let rhs = translate_value(symbols, index, &bc.rhs)?;
            Ok(Some(Condition::Constraint {
                op: rel_op(bc.op),
                lhs,
                rhs,
            }))
        }
        Literal::Negation(atom) => {
            translate_negation(catalog, symbols, index, atom).map(Some)
        }
    }
}

/// Translate a negated atom against its concrete relation
fn translate_negation(
    catalog: &RelationCatalog,
    symbols: &SymbolTable,
    index: &ValueIndex<'_>,
    atom: &Atom,
) -> Result<Condition, LowerError> {
    let info = catalog.relation(&atom.name)?;
    let name = concrete_name(&atom.name);
    let (user_arity, aux_arity) = split_arity(atom, info.aux_arity)?;

    if user_arity == 0 {
        // negating a nullary atom is a plain emptiness check
        return Ok(Condition::EmptinessCheck { relation: name });
    }

    let mut values = Vec::with_capacity(atom.arity());
    for arg in &atom.args[..user_arity] {
        values.push(translate_value(symbols, index, arg)?);
    }
    values.extend(std::iter::repeat(Expression::UndefValue).take(aux_arity));

    Ok(Condition::ExistenceCheck {
        relation: name,
        values,
    }
    .negate())
}

/// Split an atom's arity into user-visible and auxiliary column counts.
/// Atoms arrive carrying an argument for every column, auxiliary ones
/// included.
pub(super) fn split_arity(atom: &Atom, aux_arity: usize) -> Result<(usize, usize), LowerError> {
    if aux_arity > atom.arity() {
        return Err(LowerError::AuxiliaryArityOutOfBounds {
            relation: atom.name.to_string(),
            declared: aux_arity,
            arity: atom.arity(),
        });
    }
    Ok((atom.arity() - aux_arity, aux_arity))
}

fn rel_op(op: BinaryConstraintOp) -> BinaryRelOp {
    match op {
        BinaryConstraintOp::Eq => BinaryRelOp::Eq,
        BinaryConstraintOp::Ne => BinaryRelOp::Ne,
        BinaryConstraintOp::Lt => BinaryRelOp::Lt,
        BinaryConstraintOp::Le => BinaryRelOp::Le,
        BinaryConstraintOp::Gt => BinaryRelOp::Gt,
        BinaryConstraintOp::Ge => BinaryRelOp::Ge,
    }
}
