use axum::{
    Json,
    extract::{Query, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::utils::{number_from_value, parse_number};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    #[error("Please provide valid numbers for num1 and num2")]
    InvalidNumbers,

    #[error("Cannot divide by zero")]
    DivideByZero,

    #[error("Invalid operation. Use: add, subtract, multiply, or divide")]
    InvalidOperation,
}

impl IntoResponse for CalcError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": self.to_string() })),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Self::Add),
            "subtract" => Some(Self::Subtract),
            "multiply" => Some(Self::Multiply),
            "divide" => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "addition",
            Self::Subtract => "subtraction",
            Self::Multiply => "multiplication",
            Self::Divide => "division",
        }
    }

    pub fn apply(self, num1: f64, num2: f64) -> Result<f64, CalcError> {
        match self {
            Self::Add => Ok(num1 + num2),
            Self::Subtract => Ok(num1 - num2),
            Self::Multiply => Ok(num1 * num2),
            Self::Divide if num2 == 0.0 => Err(CalcError::DivideByZero),
            Self::Divide => Ok(num1 / num2),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Calculation {
    pub success: bool,
    pub operation: &'static str,
    pub num1: f64,
    pub num2: f64,
    pub result: f64,
}

pub fn calculate(operation: Operation, num1: f64, num2: f64) -> Result<Calculation, CalcError> {
    Ok(Calculation {
        success: true,
        operation: operation.label(),
        num1,
        num2,
        result: operation.apply(num1, num2)?,
    })
}

#[derive(Deserialize)]
pub struct Operands {
    num1: Option<String>,
    num2: Option<String>,
}

fn from_query(operation: Operation, query: Operands) -> Result<Json<Calculation>, CalcError> {
    let num1 = query.num1.as_deref().and_then(parse_number);
    let num2 = query.num2.as_deref().and_then(parse_number);

    let (Some(num1), Some(num2)) = (num1, num2) else {
        return Err(CalcError::InvalidNumbers);
    };

    calculate(operation, num1, num2).map(Json)
}

pub async fn add(Query(query): Query<Operands>) -> Result<Json<Calculation>, CalcError> {
    from_query(Operation::Add, query)
}

pub async fn subtract(Query(query): Query<Operands>) -> Result<Json<Calculation>, CalcError> {
    from_query(Operation::Subtract, query)
}

pub async fn multiply(Query(query): Query<Operands>) -> Result<Json<Calculation>, CalcError> {
    from_query(Operation::Multiply, query)
}

pub async fn divide(Query(query): Query<Operands>) -> Result<Json<Calculation>, CalcError> {
    from_query(Operation::Divide, query)
}

#[derive(Deserialize)]
pub struct CalculateRequest {
    num1: Option<Value>,
    num2: Option<Value>,
    operation: Option<Value>,
}

pub async fn calculate_handler(
    body: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<Calculation>, CalcError> {
    let Json(request) = body.map_err(|_| CalcError::InvalidNumbers)?;

    let num1 = number_from_value(request.num1.as_ref());
    let num2 = number_from_value(request.num2.as_ref());
    let (Some(num1), Some(num2)) = (num1, num2) else {
        return Err(CalcError::InvalidNumbers);
    };

    let operation = request
        .operation
        .as_ref()
        .and_then(Value::as_str)
        .and_then(Operation::parse)
        .ok_or(CalcError::InvalidOperation)?;

    calculate(operation, num1, num2).map(Json)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::test_utils::TestApp;

    #[test]
    fn test_operations() {
        assert_eq!(Operation::Add.apply(5.0, 3.0), Ok(8.0));
        assert_eq!(Operation::Subtract.apply(10.0, 4.0), Ok(6.0));
        assert_eq!(Operation::Multiply.apply(6.0, 7.0), Ok(42.0));
        assert_eq!(Operation::Divide.apply(20.0, 4.0), Ok(5.0));
        assert_eq!(Operation::Divide.apply(1.0, 0.0), Err(CalcError::DivideByZero));
        assert_eq!(Operation::parse("modulo"), None);
    }

    #[tokio::test]
    async fn test_get_endpoints() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/api/add?num1=5&num2=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "operation": "addition", "num1": 5.0, "num2": 3.0, "result": 8.0 })
        );

        let (_, body) = app.get("/api/subtract?num1=10&num2=4").await;
        assert_eq!(body["result"], 6.0);

        let (_, body) = app.get("/api/multiply?num1=6&num2=7").await;
        assert_eq!(body["operation"], "multiplication");
        assert_eq!(body["result"], 42.0);

        let (_, body) = app.get("/api/divide?num1=20&num2=4").await;
        assert_eq!(body["result"], 5.0);
    }

    #[tokio::test]
    async fn test_get_errors() {
        let app = TestApp::new().await;

        let (status, body) = app.get("/api/add?num1=five&num2=3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Please provide valid numbers for num1 and num2" })
        );

        let (status, _) = app.get("/api/add?num1=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app.get("/api/divide?num1=1&num2=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot divide by zero");
    }

    #[tokio::test]
    async fn test_post_calculate() {
        let app = TestApp::new().await;

        let (status, body) = app
            .post("/api/calculate", json!({ "num1": "10", "num2": 5, "operation": "divide" }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["operation"], "division");
        assert_eq!(body["result"], 2.0);

        let (status, body) = app
            .post("/api/calculate", json!({ "num1": 1, "num2": 2, "operation": "power" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid operation. Use: add, subtract, multiply, or divide");

        let (status, body) = app
            .post("/api/calculate", json!({ "num1": 1, "num2": 2, "operation": 5 }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid operation. Use: add, subtract, multiply, or divide");

        let (status, body) = app
            .post("/api/calculate", json!({ "num1": null, "num2": 2, "operation": "add" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide valid numbers for num1 and num2");

        let (status, body) = app
            .post("/api/calculate", json!({ "num1": 3, "num2": 0, "operation": "divide" }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Cannot divide by zero");
    }
}
