//! Abstract Syntax Tree definitions

use pest::iterators::{Pair, Pairs};

use super::Rule;

/// Top-level AST node for a line
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// Empty line
    Empty,
    /// Variable assignment: name = expr
    Assignment { name: String, expr: Box<Expr> },
    /// Expression to evaluate
    Expression(Expr),
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal with an optional unit abbreviation
    Quantity { amount: f64, unit: Option<String> },
    /// Variable reference
    Variable(String),
    /// Unary minus
    Negate(Box<Expr>),
    /// Binary operation
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Unit conversion: 36 km/h in m/s
    Conversion {
        value: Box<Expr>,
        target_unit: String,
    },
    /// Function call: min(), max(), abs(), recip()
    FunctionCall { name: String, args: Vec<Expr> },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Build AST from parsed pairs
pub fn build_ast(pairs: Pairs<'_, Rule>) -> Result<Ast, String> {
    for pair in pairs {
        if pair.as_rule() == Rule::line {
            for inner_pair in pair.into_inner() {
                match inner_pair.as_rule() {
                    Rule::assignment => return build_assignment(inner_pair.into_inner()),
                    Rule::expression => {
                        return Ok(Ast::Expression(build_expression(inner_pair.into_inner())?))
                    }
                    _ => {}
                }
            }
            return Ok(Ast::Empty);
        }
    }
    Ok(Ast::Empty)
}

fn build_assignment(mut pairs: Pairs<'_, Rule>) -> Result<Ast, String> {
    let name = pairs
        .next()
        .ok_or("Expected identifier")?
        .as_str()
        .to_string();

    let expr_pair = pairs.next().ok_or("Expected expression")?;
    let expr = build_expression(expr_pair.into_inner())?;

    Ok(Ast::Assignment {
        name,
        expr: Box::new(expr),
    })
}

fn build_expression(pairs: Pairs<'_, Rule>) -> Result<Expr, String> {
    let mut calculation = None;
    let mut target_unit = None;

    for pair in pairs {
        match pair.as_rule() {
            Rule::calculation => calculation = Some(build_calculation(pair.into_inner())?),
            Rule::conversion => {
                target_unit = pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::unit_symbol)
                    .map(|p| p.as_str().to_string());
            }
            _ => {}
        }
    }

    let expr = calculation.ok_or("Expected calculation")?;
    Ok(match target_unit {
        Some(target_unit) => Expr::Conversion {
            value: Box::new(expr),
            target_unit,
        },
        None => expr,
    })
}

fn build_calculation(mut pairs: Pairs<'_, Rule>) -> Result<Expr, String> {
    let first = pairs.next().ok_or("Expected term")?;
    let mut left = build_term(first.into_inner())?;

    while let Some(op_pair) = pairs.next() {
        let op = match op_pair.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            other => return Err(format!("Unknown operator: {other}")),
        };
        let right_pair = pairs.next().ok_or("Expected term after operator")?;
        let right = build_term(right_pair.into_inner())?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }

    Ok(left)
}

fn build_term(mut pairs: Pairs<'_, Rule>) -> Result<Expr, String> {
    let first = pairs.next().ok_or("Expected factor")?;
    let mut left = build_factor(first.into_inner())?;

    while let Some(op_pair) = pairs.next() {
        let op = match op_pair.as_str() {
            "*" | "×" => BinaryOp::Multiply,
            "/" | "÷" => BinaryOp::Divide,
            other => return Err(format!("Unknown operator: {other}")),
        };
        let right_pair = pairs.next().ok_or("Expected factor after operator")?;
        let right = build_factor(right_pair.into_inner())?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
    }

    Ok(left)
}

fn build_factor(pairs: Pairs<'_, Rule>) -> Result<Expr, String> {
    let mut negate = false;
    for pair in pairs {
        match pair.as_rule() {
            Rule::negate => negate = true,
            Rule::primary => {
                let expr = build_primary(pair)?;
                return Ok(if negate {
                    Expr::Negate(Box::new(expr))
                } else {
                    expr
                });
            }
            _ => {}
        }
    }
    Err("Expected value".to_string())
}

fn build_primary(pair: Pair<'_, Rule>) -> Result<Expr, String> {
    let inner = pair.into_inner().next().ok_or("Empty expression")?;
    match inner.as_rule() {
        Rule::calculation => build_calculation(inner.into_inner()),
        Rule::quantity => build_quantity(inner.into_inner()),
        Rule::variable => Ok(Expr::Variable(inner.as_str().to_string())),
        Rule::function_call => {
            let mut parts = inner.into_inner();
            let name = parts
                .next()
                .ok_or("Expected function name")?
                .as_str()
                .to_string();
            let args = parts
                .map(|arg| build_calculation(arg.into_inner()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::FunctionCall { name, args })
        }
        other => Err(format!("Unexpected {other:?}")),
    }
}

fn build_quantity(pairs: Pairs<'_, Rule>) -> Result<Expr, String> {
    let mut amount = None;
    let mut unit = None;
    for pair in pairs {
        match pair.as_rule() {
            Rule::unsigned_number => {
                amount = Some(pair.as_str().parse::<f64>().map_err(|e| e.to_string())?)
            }
            Rule::unit_symbol => unit = Some(pair.as_str().to_string()),
            _ => {}
        }
    }
    Ok(Expr::Quantity {
        amount: amount.ok_or("Expected number")?,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::super::parse_line;
    use super::*;
    use pretty_assertions::assert_eq;

    fn quantity(amount: f64, unit: &str) -> Box<Expr> {
        Box::new(Expr::Quantity {
            amount,
            unit: Some(unit.to_string()),
        })
    }

    #[test]
    fn test_conversion_ast() {
        let ast = parse_line("36 km/h in m/s").unwrap();
        assert_eq!(
            ast,
            Ast::Expression(Expr::Conversion {
                value: quantity(36.0, "km/h"),
                target_unit: "m/s".to_string(),
            })
        );
    }

    #[test]
    fn test_division_of_compound_units() {
        let ast = parse_line("5 m/s / 2 s").unwrap();
        assert_eq!(
            ast,
            Ast::Expression(Expr::BinaryOp {
                op: BinaryOp::Divide,
                left: quantity(5.0, "m/s"),
                right: quantity(2.0, "s"),
            })
        );
    }

    #[test]
    fn test_precedence() {
        let ast = parse_line("1 m + 2 m * 3").unwrap();
        let Ast::Expression(Expr::BinaryOp { op, right, .. }) = ast else {
            panic!("expected binary op");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(
            *right,
            Expr::BinaryOp {
                op: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn test_assignment_and_negation() {
        let ast = parse_line("x = -3 kg").unwrap();
        assert_eq!(
            ast,
            Ast::Assignment {
                name: "x".to_string(),
                expr: Box::new(Expr::Negate(quantity(3.0, "kg"))),
            }
        );
    }
}
