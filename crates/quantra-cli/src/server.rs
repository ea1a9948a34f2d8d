//! JSON-RPC 2.0 server mode
//!
//! Reads one request per line from stdin and writes one response per line to
//! stdout. Logging goes to stderr.

use quantra_core::{Engine, Value};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

/// JSON-RPC 2.0 request
#[derive(Deserialize)]
struct Request {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Option<serde_json::Value>,
    id: serde_json::Value,
}

/// JSON-RPC 2.0 response
#[derive(Serialize)]
struct Response {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: serde_json::Value,
}

/// JSON-RPC error object
#[derive(Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Structured evaluation result
#[derive(Serialize)]
struct EvalResult {
    #[serde(rename = "type")]
    result_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    si: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    display: String,
}

#[derive(Deserialize)]
struct EvalParams {
    expr: String,
}

#[derive(Deserialize)]
struct EvalLinesParams {
    lines: Vec<String>,
}

#[derive(Deserialize)]
struct ListUnitsParams {
    quantity: String,
}

#[derive(Serialize)]
struct VariableInfo {
    name: String,
    value: EvalResult,
}

#[derive(Serialize)]
struct QuantityInfo {
    name: String,
    kind: &'static str,
    dimension: String,
    standard: String,
}

#[derive(Serialize)]
struct UnitInfo {
    abbreviation: String,
    name: String,
    aliases: Vec<String>,
    factor: f64,
    offset: f64,
}

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

impl Response {
    fn success(id: serde_json::Value, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(result) => Self {
                jsonrpc: "2.0",
                result: Some(result),
                error: None,
                id,
            },
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Cannot encode result: {e}")),
        }
    }

    fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }
}

/// Convert Value to structured EvalResult
fn value_to_result(value: &Value) -> EvalResult {
    let result_type = match value {
        Value::Number(_) => "number",
        Value::Scalar(_) => "scalar",
        Value::Generic(_) => "generic",
        Value::Empty => "empty",
        Value::Error(_) => "error",
    };
    EvalResult {
        result_type,
        value: value.as_f64(),
        si: value.as_si(),
        unit: value.unit(),
        quantity: value.quantity(),
        message: match value {
            Value::Error(msg) => Some(msg.clone()),
            _ => None,
        },
        display: value.to_string(),
    }
}

fn parse_params<P: for<'de> Deserialize<'de>>(
    params: Option<serde_json::Value>,
) -> Result<P, String> {
    match params {
        Some(p) => serde_json::from_value(p).map_err(|e| format!("Invalid params: {e}")),
        None => Err("Missing params".to_string()),
    }
}

/// Handle a single JSON-RPC request
fn handle_request(engine: &mut Engine, input: &str) -> Response {
    let request: Request = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => {
            return Response::error(
                serde_json::Value::Null,
                PARSE_ERROR,
                format!("Parse error: {e}"),
            );
        }
    };

    if request.jsonrpc != "2.0" {
        return Response::error(request.id, INVALID_REQUEST, "Invalid JSON-RPC version");
    }

    tracing::debug!(method = %request.method, "request");
    match request.method.as_str() {
        "eval" => handle_eval(engine, request.id, request.params),
        "eval_lines" => handle_eval_lines(engine, request.id, request.params),
        "clear" => handle_clear(engine, request.id),
        "get_variables" => handle_get_variables(engine, request.id),
        "list_quantities" => handle_list_quantities(engine, request.id),
        "list_units" => handle_list_units(engine, request.id, request.params),
        _ => Response::error(
            request.id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        ),
    }
}

/// Evaluate a single expression
fn handle_eval(
    engine: &mut Engine,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> Response {
    let params: EvalParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return Response::error(id, INVALID_PARAMS, e),
    };

    let value = engine.eval(&params.expr);
    Response::success(id, value_to_result(&value))
}

/// Evaluate several lines in order; variables carry over between them
fn handle_eval_lines(
    engine: &mut Engine,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> Response {
    let params: EvalLinesParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return Response::error(id, INVALID_PARAMS, e),
    };

    let results: Vec<EvalResult> = params
        .lines
        .iter()
        .map(|line| value_to_result(&engine.eval(line)))
        .collect();

    Response::success(id, results)
}

fn handle_clear(engine: &mut Engine, id: serde_json::Value) -> Response {
    engine.clear();
    Response::success(id, serde_json::json!({"message": "Cleared"}))
}

fn handle_get_variables(engine: &Engine, id: serde_json::Value) -> Response {
    let mut results: Vec<VariableInfo> = engine
        .variables()
        .iter()
        .map(|(name, value)| VariableInfo {
            name: name.clone(),
            value: value_to_result(value),
        })
        .collect();
    results.sort_by(|a, b| a.name.cmp(&b.name));
    Response::success(id, results)
}

fn handle_list_quantities(engine: &Engine, id: serde_json::Value) -> Response {
    let registry = engine.registry();
    let results: Vec<QuantityInfo> = registry
        .quantities()
        .iter()
        .map(|quantity| QuantityInfo {
            name: quantity.name().to_string(),
            kind: quantity.kind_name(),
            dimension: quantity.dimension().to_string(),
            standard: quantity.standard_spec().abbreviation.clone(),
        })
        .collect();
    Response::success(id, results)
}

fn handle_list_units(
    engine: &Engine,
    id: serde_json::Value,
    params: Option<serde_json::Value>,
) -> Response {
    let params: ListUnitsParams = match parse_params(params) {
        Ok(p) => p,
        Err(e) => return Response::error(id, INVALID_PARAMS, e),
    };

    match engine.registry().units(&params.quantity) {
        Ok(units) => {
            let results: Vec<UnitInfo> = units
                .iter()
                .map(|unit| UnitInfo {
                    abbreviation: unit.abbreviation().to_string(),
                    name: unit.name().to_string(),
                    aliases: unit.aliases().to_vec(),
                    factor: unit.scale().factor(),
                    offset: unit.scale().offset(),
                })
                .collect();
            Response::success(id, results)
        }
        Err(e) => Response::error(id, INVALID_PARAMS, e.to_string()),
    }
}

/// Run the JSON-RPC server loop
pub fn run_server(engine: &mut Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let response = handle_request(engine, &line);
        let json = serde_json::to_string(&response)?;
        writeln!(stdout, "{json}")?;
        stdout.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(engine: &mut Engine, request: serde_json::Value) -> serde_json::Value {
        let response = handle_request(engine, &request.to_string());
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_eval_result_fields() {
        let mut engine = Engine::new();
        let response = call(
            &mut engine,
            serde_json::json!({"jsonrpc": "2.0", "method": "eval", "params": {"expr": "5 m/s / 2 s"}, "id": 1}),
        );
        let result = &response["result"];
        assert_eq!(result["type"], "scalar");
        assert_eq!(result["quantity"], "Acceleration");
        assert_eq!(result["si"], 2.5);
    }

    #[test]
    fn test_unknown_method() {
        let mut engine = Engine::new();
        let response = call(
            &mut engine,
            serde_json::json!({"jsonrpc": "2.0", "method": "get_totals", "id": 7}),
        );
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(response["id"], 7);
    }

    #[test]
    fn test_bad_json() {
        let mut engine = Engine::new();
        let response = serde_json::to_value(handle_request(&mut engine, "{not json")).unwrap();
        assert_eq!(response["error"]["code"], PARSE_ERROR);
    }
}
