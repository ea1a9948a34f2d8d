//! Text parsing using pest: dimension strings, scalar text and calculator lines

mod ast;

pub use ast::{Ast, BinaryOp, Expr};

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::dimension::{DimensionVector, BASE_UNITS, SLOTS};
use crate::error::QuantityError;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub struct QuantraParser;

/// Parse a single calculator line
pub fn parse_line(input: &str) -> Result<Ast, String> {
    match QuantraParser::parse(Rule::line, input) {
        Ok(pairs) => ast::build_ast(pairs),
        Err(e) => Err(format!("Parse error: {}", e.variant.message())),
    }
}

/// Parse a generic SI dimension string such as `kg.m/s2`
pub fn parse_dimension(text: &str) -> Result<DimensionVector, QuantityError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(QuantityError::parse(text, "empty dimension string"));
    }
    let mut pairs = QuantraParser::parse(Rule::dimension, trimmed)
        .map_err(|e| QuantityError::parse(text, e.variant.message().to_string()))?;
    let root = pairs
        .next()
        .ok_or_else(|| QuantityError::parse(text, "empty parse"))?;

    let out_of_range = || QuantityError::parse(text, "exponent out of range");
    let mut exponents = [0i32; SLOTS];
    for part in root.into_inner() {
        match part.as_rule() {
            Rule::unity_over | Rule::dim_ratio => {
                for group in part.into_inner() {
                    let sign = if group.as_rule() == Rule::denominator {
                        -1
                    } else {
                        1
                    };
                    for factor in group.into_inner() {
                        let (slot, exp) = dimension_factor(factor, text)?;
                        exponents[slot] = exponents[slot]
                            .checked_add(sign * i32::from(exp))
                            .ok_or_else(out_of_range)?;
                    }
                }
            }
            Rule::dim_one | Rule::EOI => {}
            _ => return Err(QuantityError::parse(text, "unexpected token")),
        }
    }

    let mut result = [0i8; SLOTS];
    for (slot, value) in exponents.iter().enumerate() {
        result[slot] = i8::try_from(*value).map_err(|_| out_of_range())?;
    }
    Ok(DimensionVector::from_exponents(result))
}

fn dimension_factor(factor: Pair<'_, Rule>, text: &str) -> Result<(usize, i16), QuantityError> {
    let mut inner = factor.into_inner();
    let base = inner
        .next()
        .ok_or_else(|| QuantityError::parse(text, "missing base unit"))?
        .as_str();
    let slot = BASE_UNITS
        .iter()
        .find(|(symbol, _)| *symbol == base)
        .map(|(_, slot)| *slot)
        .ok_or_else(|| QuantityError::parse(text, format!("unknown base unit '{base}'")))?;
    let exp = match inner.next() {
        Some(e) => e
            .as_str()
            .parse::<i16>()
            .map_err(|_| QuantityError::parse(text, "invalid exponent"))?,
        None => 1,
    };
    Ok((slot, exp))
}

/// Split `"12.5 m/s"` into its numeric prefix and the trimmed unit text.
///
/// The split happens where the numeric literal stops matching; whitespace
/// between the number and the unit is optional.
pub fn split_scalar_text(text: &str) -> Result<(f64, &str), QuantityError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(QuantityError::parse(text, "empty input"));
    }
    let pairs = QuantraParser::parse(Rule::scalar_text, trimmed)
        .map_err(|_| QuantityError::parse(text, "no numeric value at start of text"))?;

    let mut number = None;
    let mut unit = "";
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::signed_number => {
                let value = pair
                    .as_str()
                    .parse::<f64>()
                    .map_err(|e| QuantityError::parse(text, e.to_string()))?;
                number = Some(value);
            }
            Rule::unit_text => unit = pair.as_str().trim(),
            _ => {}
        }
    }
    let number = number.ok_or_else(|| QuantityError::parse(text, "no numeric value"))?;
    Ok((number, unit))
}
