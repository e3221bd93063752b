use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::core::mcp::{err as rpc_err, RpcResp};

/// JSON-RPC "internal error".
pub const INTERNAL_ERROR: i32 = -32603;

pub fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Json<RpcResp> {
    Json(rpc_err(id, code, message, None))
}

/// A JSON-RPC error envelope carried on an HTTP error status.
pub fn error_response(
    status: StatusCode,
    id: serde_json::Value,
    code: i32,
    message: impl Into<String>,
) -> axum::response::Response {
    (status, error(id, code, message)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    #[test]
    fn wraps_error_response_in_json_rpc_envelope() {
        let Json(resp) = error(Value::Null, -32601, "method not found");
        assert_eq!(resp.jsonrpc, "2.0");
        let err = resp.error;
        assert_eq!(err.code, -32601);
        assert!(err.message.contains("method not found"));
    }

    #[tokio::test]
    async fn error_response_carries_status_and_body() {
        let resp = error_response(StatusCode::BAD_GATEWAY, json!("x"), INTERNAL_ERROR, "down");
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let bytes = to_bytes(resp.into_body(), 1 << 16).await.unwrap();
        let v: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["id"], "x");
        assert_eq!(v["error"]["code"], INTERNAL_ERROR);
    }
}
