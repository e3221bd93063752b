//! JSON-RPC frames used by the proxy and the admin CLI.

use serde::Serialize;
use serde_json::Value as J;

/// Error response envelope; the proxy never synthesizes successful results.
#[derive(Serialize, Debug, Clone)]
pub struct RpcResp {
    pub jsonrpc: String,
    pub id: J,
    pub error: RpcErr,
}

#[derive(Serialize, Debug, Clone)]
pub struct RpcErr {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<J>,
}

pub fn err(id: J, code: i32, msg: impl Into<String>, data: Option<J>) -> RpcResp {
    RpcResp { jsonrpc: "2.0".into(), id, error: RpcErr { code, message: msg.into(), data } }
}

/// Build a JSON-RPC request frame. Used by the admin CLI probes.
pub fn request(id: J, method: &str, params: J) -> J {
    serde_json::json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_envelope_omits_result() {
        let v = serde_json::to_value(err(json!("x"), -32603, "boom", None)).unwrap();
        assert_eq!(v["jsonrpc"], "2.0");
        assert!(v.get("result").is_none());
        assert_eq!(v["id"], "x");
        assert_eq!(v["error"]["code"], -32603);
        assert!(v["error"].get("data").is_none());
    }
}
