//! Argument-to-expression translation and constant coding.
//!
//! `translate_value` is total over well-indexed arguments: variables and
//! generator rvalues resolve through the value index, constants through
//! the coder, records pack their translated children, and scalar
//! functors become typed intrinsics. The constant coder maps every typed
//! constant into the flat integer RAM domain, interning strings on the
//! way.

use crate::ast::{Argument, NumericType};
use crate::error::LowerError;
use crate::ram::{Expression, RamDomain};
use crate::ram_builder::value_index::ValueIndex;
use crate::symbol_table::SymbolTable;

/// Translate a single argument into a RAM expression
pub fn translate_value(
    symbols: &SymbolTable,
    index: &ValueIndex<'_>,
    argument: &Argument,
) -> Result<Expression, LowerError> {
    match argument {
        Argument::Variable(name) => {
            let location =
                index
                    .first_reference(name)
                    .ok_or_else(|| LowerError::UngroundedVariable {
                        name: name.clone(),
                    })?;
            Ok(Expression::tuple_element(location.level, location.column))
        }
        Argument::UnnamedVariable => Ok(Expression::UndefValue),
        Argument::NumericConstant { .. }
        | Argument::StringConstant(_)
        | Argument::NilConstant => translate_constant(symbols, argument),
        Argument::RecordInit(record) => {
            let values = record
                .args
                .iter()
                .map(|arg| translate_value(symbols, index, arg))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expression::PackRecord(values))
        }
        Argument::IntrinsicFunctor(functor) => {
            if functor.is_multi_result() {
                let location = index
                    .functor_loc(functor)
                    .ok_or(LowerError::UnindexedGenerator)?;
                return Ok(Expression::tuple_element(location.level, location.column));
            }
            let ty = functor
                .final_type
                .ok_or(LowerError::UntypedFunctor {
                    op: functor.op.name(),
                })?;
            let args = functor
                .args
                .iter()
                .map(|arg| translate_value(symbols, index, arg))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expression::Intrinsic {
                op: functor.op,
                ty,
                args,
            })
        }
        Argument::Aggregator(aggregator) => {
            let location = index
                .aggregator_loc(aggregator)
                .ok_or(LowerError::UnindexedGenerator)?;
            Ok(Expression::tuple_element(location.level, location.column))
        }
    }
}

/// Translate a constant argument into a typed RAM constant expression
pub fn translate_constant(
    symbols: &SymbolTable,
    argument: &Argument,
) -> Result<Expression, LowerError> {
    match argument {
        Argument::NumericConstant {
            spelling,
            final_type,
        } => {
            let final_type = final_type.ok_or_else(|| LowerError::UntypedConstant {
                spelling: spelling.clone(),
            })?;
            match final_type {
                NumericType::Int => parse_ram_signed(spelling)
                    .map(Expression::SignedConstant)
                    .ok_or_else(|| malformed(spelling, "a signed integer")),
                NumericType::Uint => parse_ram_unsigned(spelling)
                    .map(Expression::UnsignedConstant)
                    .ok_or_else(|| malformed(spelling, "an unsigned integer")),
                NumericType::Float => parse_ram_float(spelling)
                    .map(Expression::FloatConstant)
                    .ok_or_else(|| malformed(spelling, "a float")),
            }
        }
        Argument::StringConstant(text) => Ok(Expression::SignedConstant(symbols.intern(text))),
        Argument::NilConstant => Ok(Expression::SignedConstant(0)),
        other => Err(LowerError::NonConstantArgument {
            argument: other.to_string(),
        }),
    }
}

/// The flat-domain representation of a constant argument
pub fn constant_ram_representation(
    symbols: &SymbolTable,
    argument: &Argument,
) -> Result<RamDomain, LowerError> {
    let expression = translate_constant(symbols, argument)?;
    // translate_constant only produces constant expressions
    expression
        .as_constant()
        .ok_or_else(|| LowerError::NonConstantArgument {
            argument: argument.to_string(),
        })
}

fn malformed(spelling: &str, expected: &'static str) -> LowerError {
    LowerError::MalformedConstant {
        spelling: spelling.to_string(),
        expected,
    }
}

// Auto-radix parsing: 0x/0X hex, 0o/0O octal, 0b/0B binary, decimal
// otherwise. The sign precedes the radix prefix.
fn split_radix(spelling: &str) -> (u32, &str) {
    if let Some(digits) = spelling
        .strip_prefix("0x")
        .or_else(|| spelling.strip_prefix("0X"))
    {
        (16, digits)
    } else if let Some(digits) = spelling
        .strip_prefix("0o")
        .or_else(|| spelling.strip_prefix("0O"))
    {
        (8, digits)
    } else if let Some(digits) = spelling
        .strip_prefix("0b")
        .or_else(|| spelling.strip_prefix("0B"))
    {
        (2, digits)
    } else {
        (10, spelling)
    }
}

fn parse_ram_signed(spelling: &str) -> Option<i64> {
    let (negative, body) = match spelling.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, spelling),
    };
    let (radix, digits) = split_radix(body);
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

fn parse_ram_unsigned(spelling: &str) -> Option<u64> {
    let (radix, digits) = split_radix(spelling);
    u64::from_str_radix(digits, radix).ok()
}

fn parse_ram_float(spelling: &str) -> Option<f64> {
    spelling.parse().ok()
}
