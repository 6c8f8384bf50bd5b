use odata_syntax::{CompareOp, Comparison, Expr, Literal};
use serde_json::{Map, Number, Value, json};

/// Turns a parsed expression into a query DSL node.
///
/// `and` becomes `bool.must`, `or` becomes `bool.should`; comparisons become
/// `match_phrase`, `bool.must_not` or `range` clauses keyed by the physical
/// field name.
pub fn lower_expr(expr: &Expr) -> Value {
    match expr {
        Expr::Comparison(comparison) => lower_comparison(comparison),
        Expr::And(parts) => json!({ "bool": { "must": lower_all(parts) } }),
        Expr::Or(parts) => json!({ "bool": { "should": lower_all(parts) } }),
    }
}

fn lower_all(parts: &[Expr]) -> Vec<Value> {
    parts.iter().map(lower_expr).collect()
}

fn lower_comparison(comparison: &Comparison) -> Value {
    let value = literal_value(&comparison.value);
    let range_key = match comparison.op {
        CompareOp::Eq => return match_phrase(&comparison.field, value),
        CompareOp::Ne => {
            return json!({ "bool": { "must_not": match_phrase(&comparison.field, value) } });
        }
        CompareOp::Gt => "gt",
        CompareOp::Ge => "gte",
        CompareOp::Lt => "lt",
        CompareOp::Le => "lte",
    };
    json!({ "range": single(&comparison.field, single(range_key, value)) })
}

fn match_phrase(field: &str, value: Value) -> Value {
    json!({ "match_phrase": single(field, value) })
}

fn single(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}

/// Whole numbers that fit an `i64` are written without a fraction (`42`, not
/// `42.0`).
pub fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::String(text) => Value::String(text.clone()),
        Literal::Number(number) => number_value(*number),
    }
}

fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number >= i64::MIN as f64 && number < i64::MAX as f64 {
        return Value::Number(Number::from(number as i64));
    }
    Number::from_f64(number).map_or(Value::Null, Value::Number)
}
