use axum::{Json, extract::rejection::JsonRejection};
use catalog::{Fields, TaskInput};
use serde_json::Value;
use tracing::debug;

use crate::error::AppError::{self, MalformedPayload};

/// Body must be a JSON object.
pub fn get_fields(body: Result<Json<Value>, JsonRejection>) -> Result<Fields, AppError> {
    let Json(value) = body.map_err(|e| {
        debug!("Rejected body: {e}");
        MalformedPayload
    })?;

    match value {
        Value::Object(fields) => Ok(fields),
        _ => Err(MalformedPayload),
    }
}

pub fn get_task_input(body: Result<Json<Value>, JsonRejection>) -> Result<TaskInput, AppError> {
    let fields = get_fields(body)?;

    serde_json::from_value(Value::Object(fields)).map_err(|e| {
        debug!("Rejected task payload: {e}");
        MalformedPayload
    })
}

/// Number from a JSON number or a numeric string.
pub fn number_from_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        _ => None,
    }
}

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
