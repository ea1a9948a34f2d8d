//! Expression evaluation engine

use std::collections::HashMap;
use std::sync::Arc;

use crate::generic::{Classified, SiScalar};
use crate::parser::{Ast, BinaryOp, Expr};
use crate::registry::UnitRegistry;
use crate::scalar::{RelScalar, Relative};
use crate::types::{Unit, Value};

/// Evaluation context with variables and the unit registry
#[derive(Clone)]
pub struct EvalContext {
    pub(crate) variables: HashMap<String, Value>,
    pub(crate) registry: Arc<UnitRegistry>,
}

impl EvalContext {
    /// Context over a freshly bootstrapped registry
    pub fn new() -> Self {
        Self::with_registry(Arc::new(UnitRegistry::with_defaults()))
    }

    pub fn with_registry(registry: Arc<UnitRegistry>) -> Self {
        Self {
            variables: HashMap::new(),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<UnitRegistry> {
        &self.registry
    }

    /// Get a variable value
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Set a variable
    pub fn set_variable(&mut self, name: String, value: Value) {
        self.variables.insert(name, value);
    }

    /// Clear all variables
    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate an AST node
pub fn evaluate(ast: &Ast, ctx: &mut EvalContext) -> Value {
    match ast {
        Ast::Empty => Value::Empty,
        Ast::Assignment { name, expr } => {
            let value = eval_expr(expr, ctx);
            if !value.is_error() {
                ctx.set_variable(name.clone(), value.clone());
            }
            value
        }
        Ast::Expression(expr) => eval_expr(expr, ctx),
    }
}

fn eval_expr(expr: &Expr, ctx: &EvalContext) -> Value {
    match expr {
        Expr::Quantity { amount, unit: None } => Value::Number(*amount),
        Expr::Quantity {
            amount,
            unit: Some(abbreviation),
        } => eval_literal(*amount, abbreviation, ctx),

        Expr::Variable(name) => ctx
            .get_variable(name)
            .cloned()
            .unwrap_or_else(|| Value::Error(format!("Unknown variable: {name}"))),

        Expr::Negate(inner) => match eval_expr(inner, ctx) {
            Value::Number(n) => Value::Number(-n),
            Value::Scalar(s) => Value::Scalar(-s),
            Value::Generic(g) => Value::Generic(-g),
            other => other,
        },

        Expr::BinaryOp { op, left, right } => {
            let lval = eval_expr(left, ctx);
            if lval.is_error() {
                return lval;
            }
            let rval = eval_expr(right, ctx);
            if rval.is_error() {
                return rval;
            }
            eval_binary_op(*op, lval, rval, ctx)
        }

        Expr::Conversion { value, target_unit } => {
            let val = eval_expr(value, ctx);
            eval_conversion(val, target_unit, ctx)
        }

        Expr::FunctionCall { name, args } => {
            let evaluated_args: Vec<Value> = args.iter().map(|a| eval_expr(a, ctx)).collect();
            if let Some(error) = evaluated_args.iter().find(|v| v.is_error()) {
                return error.clone();
            }
            eval_function(name, &evaluated_args, ctx)
        }
    }
}

/// Number followed by a unit abbreviation, e.g. `36 km/h` or `9.81 kg.m/s2`.
///
/// Literals resolve to relative quantities; `0 degC` is a zero temperature difference.
fn eval_literal(amount: f64, abbreviation: &str, ctx: &EvalContext) -> Value {
    match ctx.registry.resolve_unit(abbreviation) {
        Some(unit) => unit_value(amount, &unit),
        None => Value::Error(format!("Unknown unit: {abbreviation}")),
    }
}

/// A value expressed in `unit`
fn unit_value(amount: f64, unit: &Unit) -> Value {
    if unit.quantity().is_generic() {
        return Value::Generic(SiScalar::new(unit.to_standard(amount), unit.dimension()));
    }
    match RelScalar::new(amount, unit) {
        Ok(scalar) => Value::Scalar(scalar),
        Err(e) => Value::Error(e.to_string()),
    }
}

/// The dimension-tagged SI form of a value
fn to_si(value: &Value) -> Option<SiScalar> {
    match value {
        Value::Number(n) => Some(SiScalar::dimensionless(*n)),
        Value::Scalar(s) => Some(s.to_generic()),
        Value::Generic(g) => Some(*g),
        Value::Empty | Value::Error(_) => None,
    }
}

/// Name the result through the registry; dimensionless results are plain numbers
fn classify(value: SiScalar, ctx: &EvalContext) -> Value {
    if value.dimension().is_dimensionless() {
        return Value::Number(value.si());
    }
    match value.classify(&ctx.registry) {
        Classified::Named(scalar) => Value::Scalar(scalar),
        Classified::Unclassified(generic) => {
            generic.unit(&ctx.registry);
            Value::Generic(generic)
        }
    }
}

fn eval_binary_op(op: BinaryOp, left: Value, right: Value, ctx: &EvalContext) -> Value {
    // Number × number and scaling keep their plain form
    match (op, &left, &right) {
        (_, Value::Number(l), Value::Number(r)) => return apply_numbers(op, *l, *r),
        (BinaryOp::Multiply, Value::Scalar(s), Value::Number(n))
        | (BinaryOp::Multiply, Value::Number(n), Value::Scalar(s)) => {
            return Value::Scalar(s * *n);
        }
        (BinaryOp::Divide, Value::Scalar(_), Value::Number(n)) if *n == 0.0 => {
            return Value::Error("Division by zero".to_string());
        }
        (BinaryOp::Divide, Value::Scalar(s), Value::Number(n)) => return Value::Scalar(s / *n),
        (BinaryOp::Add, Value::Scalar(l), Value::Scalar(r)) => {
            return (l + r).map_or_else(|e| Value::Error(e.to_string()), Value::Scalar);
        }
        (BinaryOp::Subtract, Value::Scalar(l), Value::Scalar(r)) => {
            return (l - r).map_or_else(|e| Value::Error(e.to_string()), Value::Scalar);
        }
        _ => {}
    }

    let (Some(l), Some(r)) = (to_si(&left), to_si(&right)) else {
        return Value::Error("Invalid operands".to_string());
    };
    let result = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Subtract => l - r,
        BinaryOp::Multiply => l.checked_mul(&r),
        BinaryOp::Divide if r.si() == 0.0 => return Value::Error("Division by zero".to_string()),
        BinaryOp::Divide => l.checked_div(&r),
    };
    match result {
        Ok(value) => classify(value, ctx),
        Err(e) => Value::Error(e.to_string()),
    }
}

fn apply_numbers(op: BinaryOp, l: f64, r: f64) -> Value {
    match op {
        BinaryOp::Add => Value::Number(l + r),
        BinaryOp::Subtract => Value::Number(l - r),
        BinaryOp::Multiply => Value::Number(l * r),
        BinaryOp::Divide if r == 0.0 => Value::Error("Division by zero".to_string()),
        BinaryOp::Divide => Value::Number(l / r),
    }
}

/// Target unit for a value of the given dimension: the value's own quantity
/// first, then any relative quantity of that dimension
fn target_unit(value: &Value, target: &str, ctx: &EvalContext) -> Option<Unit> {
    if let Value::Scalar(s) = value {
        if let Some(unit) = ctx.registry.unit_by_abbreviation(s.quantity().name(), target) {
            return Some(unit);
        }
    }
    let dimension = to_si(value)?.dimension();
    ctx.registry
        .resolve_unit_for_dimension(target, dimension)
        .or_else(|| ctx.registry.resolve_unit(target))
}

fn eval_conversion(value: Value, target: &str, ctx: &EvalContext) -> Value {
    let Some(unit) = target_unit(&value, target, ctx) else {
        if value.is_error() {
            return value;
        }
        return Value::Error(format!("Unknown target unit: {target}"));
    };

    match value {
        // Plain number → attach unit (e.g., "12 in km")
        Value::Number(n) => unit_value(n, &unit),
        Value::Scalar(ref s) if !unit.quantity().is_generic() => s
            .to_generic()
            .as_unit::<Relative>(&unit)
            .map_or_else(|e| Value::Error(e.to_string()), Value::Scalar),
        Value::Scalar(_) | Value::Generic(_) => {
            let Some(si) = to_si(&value) else {
                return value;
            };
            if unit.quantity().is_generic() {
                return if unit.dimension() == si.dimension() {
                    Value::Generic(si)
                } else {
                    Value::Error(format!(
                        "Cannot convert {} to {}",
                        si.dimension(),
                        unit.dimension()
                    ))
                };
            }
            si.as_unit::<Relative>(&unit)
                .map_or_else(|e| Value::Error(e.to_string()), Value::Scalar)
        }
        other => other,
    }
}

fn eval_function(name: &str, args: &[Value], ctx: &EvalContext) -> Value {
    match name.to_lowercase().as_str() {
        "min" => extreme(name, args, |a, b| b < a),
        "max" => extreme(name, args, |a, b| b > a),

        "abs" => match args {
            [Value::Number(n)] => Value::Number(n.abs()),
            [Value::Scalar(s)] => Value::Scalar(s.abs()),
            [Value::Generic(g)] => Value::Generic(g.abs()),
            _ => Value::Error(format!("{name} requires one value")),
        },

        "recip" => match args {
            [Value::Number(n)] if *n == 0.0 => Value::Error("Division by zero".to_string()),
            [value] => match to_si(value) {
                Some(si) if si.si() == 0.0 => Value::Error("Division by zero".to_string()),
                Some(si) => si
                    .checked_reciprocal()
                    .map_or_else(|e| Value::Error(e.to_string()), |r| classify(r, ctx)),
                None => Value::Error(format!("{name} requires one value")),
            },
            _ => Value::Error(format!("{name} requires one value")),
        },

        _ => Value::Error(format!("Unknown function: {name}")),
    }
}

/// The first argument that no later argument beats; all arguments must share a
/// dimension
fn extreme(name: &str, args: &[Value], beats: fn(&SiScalar, &SiScalar) -> bool) -> Value {
    let Some(first) = args.first() else {
        return Value::Error(format!("No values for {name}"));
    };
    let Some(mut best_si) = to_si(first) else {
        return Value::Error(format!("{name} requires values"));
    };
    let mut best = first;
    for arg in &args[1..] {
        let Some(si) = to_si(arg) else {
            return Value::Error(format!("{name} requires values"));
        };
        if si.dimension() != best_si.dimension() {
            return Value::Error(format!(
                "{name}: cannot compare {} with {}",
                best_si.dimension(),
                si.dimension()
            ));
        }
        if let (Value::Scalar(a), Value::Scalar(b)) = (best, arg) {
            if a.quantity() != b.quantity() {
                return Value::Error(format!(
                    "{name}: cannot compare {} with {}",
                    a.quantity(),
                    b.quantity()
                ));
            }
        }
        if beats(&best_si, &si) {
            best = arg;
            best_si = si;
        }
    }
    best.clone()
}
