use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::{
    CallToolResult, Content, JsonObject, ServerCapabilities, ServerInfo as ServerInfoModel,
};
use rmcp::ErrorData as McpError;
use serde_json::Value as JsonValue;

use crate::domain::{PriceLevel, SearchRequest};
use crate::infra::runtime::mcp_transport::ServerHandler;
use crate::tools::hello::{greeting, ServerInfo};
use crate::tools::restaurants::RestaurantSearch;

#[derive(Clone)]
pub struct FoodSvc {
    search: Arc<RestaurantSearch>,
    info: ServerInfo,
}

impl FoodSvc {
    pub fn new(search: Arc<RestaurantSearch>, info: ServerInfo) -> Self {
        Self { search, info }
    }
}

impl ServerHandler for FoodSvc {
    fn get_info(&self) -> ServerInfoModel {
        ServerInfoModel {
            instructions: Some(
                "Restaurant and coffee search. Call search_restaurants with a location; results are live when a places API key is configured, sample data otherwise.".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

fn invalid(msg: impl Into<String>) -> McpError {
    McpError::invalid_params(msg.into(), None)
}

fn opt_str<'a>(args: &'a JsonObject, key: &str) -> Result<Option<&'a str>, McpError> {
    match args.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(invalid(format!("{key} must be a string"))),
    }
}

fn opt_u32(args: &JsonObject, key: &str) -> Result<Option<u32>, McpError> {
    let n = match args.get(key) {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Number(n)) => n.as_u64(),
        Some(JsonValue::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };
    n.and_then(|n| u32::try_from(n).ok())
        .map(Some)
        .ok_or_else(|| invalid(format!("{key} must be a non-negative integer")))
}

fn opt_bool(args: &JsonObject, key: &str) -> Result<Option<bool>, McpError> {
    match args.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(JsonValue::String(s)) => s
            .trim()
            .parse::<bool>()
            .map(Some)
            .map_err(|_| invalid(format!("{key} must be a boolean"))),
        Some(_) => Err(invalid(format!("{key} must be a boolean"))),
    }
}

/// Build a [`SearchRequest`] from raw tool arguments, applying defaults.
pub fn search_request_from(args: &JsonObject) -> Result<SearchRequest, McpError> {
    let location = opt_str(args, "location")?
        .ok_or_else(|| invalid("missing required field: location"))?;
    let price_level = opt_str(args, "price_level")?
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<PriceLevel>())
        .transpose()
        .map_err(|e| invalid(e.to_string()))?;

    let req = SearchRequest::new(location.trim())
        .food_type(
            opt_str(args, "food_type")?
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(SearchRequest::DEFAULT_FOOD_TYPE),
        )
        .radius_meters(opt_u32(args, "radius_meters")?.unwrap_or(SearchRequest::DEFAULT_RADIUS_METERS))
        .price_level(price_level)
        .open_now(opt_bool(args, "open_now")?.unwrap_or(false));

    req.validate().map_err(|e| invalid(e.to_string()))?;
    Ok(req)
}

#[rmcp::tool_router]
impl FoodSvc {
    #[rmcp::tool(
        name = "search_restaurants",
        description = "Search for nearby restaurants based on location and food preferences. Arguments: location (address, city or \"lat,lng\"), food_type (default \"restaurant\"), radius_meters (default 5000), price_level (free|inexpensive|moderate|expensive|very_expensive), open_now (default false)"
    )]
    async fn search_restaurants(
        &self,
        params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<JsonValue>, McpError> {
        tracing::debug!(params = ?params.0, "search_restaurants invoked");
        let req = search_request_from(&params.0)?;
        let resp = self.search.search(&req).await;
        tracing::info!(
            location = %req.location,
            food_type = %req.food_type,
            data_type = ?resp.data_type,
            total_found = resp.total_found,
            "search_restaurants completed"
        );
        let payload = serde_json::to_value(&resp)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        tracing::trace!(payload = %payload, "search_restaurants returning payload");
        Ok(rmcp::Json(payload))
    }

    #[rmcp::tool(
        name = "greet",
        description = "Greet a user by name with a welcome message from the MCP server"
    )]
    async fn greet(&self, params: Parameters<JsonObject>) -> Result<CallToolResult, McpError> {
        let name = opt_str(&params.0, "name")?
            .ok_or_else(|| invalid("missing required field: name"))?;
        Ok(CallToolResult::success(vec![Content::text(greeting(name))]))
    }

    #[rmcp::tool(
        name = "get_server_info",
        description = "Get information about the MCP server including name, version, environment, and runtime version"
    )]
    async fn get_server_info(
        &self,
        _params: Parameters<JsonObject>,
    ) -> Result<rmcp::Json<JsonValue>, McpError> {
        let payload = serde_json::to_value(&self.info)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(rmcp::Json(payload))
    }
}

pub type FoodRouter = ToolRouter<FoodSvc>;

impl FoodSvc {
    pub fn router() -> FoodRouter {
        // Wrapper to expose the macro-generated private tool_router
        Self::tool_router()
    }
}

/// Factory shape required by the stdio and Streamable HTTP transports.
pub fn make_factory(
    search: Arc<RestaurantSearch>,
    info: ServerInfo,
) -> impl Fn() -> (FoodSvc, FoodRouter) + Clone + Send + Sync + 'static {
    move || (FoodSvc::new(search.clone(), info.clone()), FoodSvc::router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_svc() -> FoodSvc {
        FoodSvc::new(Arc::new(RestaurantSearch::new(None)), ServerInfo::new("test"))
    }

    fn args(v: JsonValue) -> JsonObject {
        match v {
            JsonValue::Object(m) => m,
            _ => panic!("args must be an object"),
        }
    }

    #[test]
    fn server_info_advertises_tools() {
        let info = sample_svc().get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("search_restaurants"));
    }

    #[test]
    fn router_contains_all_tools() {
        let names: Vec<String> = FoodSvc::router()
            .into_iter()
            .map(|r| r.name().to_string())
            .collect();
        for tool in ["search_restaurants", "greet", "get_server_info"] {
            assert!(names.iter().any(|n| n == tool), "missing tool '{tool}', got: {names:?}");
        }
    }

    #[test]
    fn request_defaults_are_applied() {
        let req = search_request_from(&args(json!({"location": " Boston "}))).unwrap();
        assert_eq!(req.location, "Boston");
        assert_eq!(req.food_type, "restaurant");
        assert_eq!(req.radius_meters, 5000);
        assert_eq!(req.price_level, None);
        assert!(!req.open_now);
    }

    #[test]
    fn request_accepts_string_encoded_scalars() {
        let req = search_request_from(&args(json!({
            "location": "Boston",
            "radius_meters": "1500",
            "open_now": "true",
            "price_level": "Moderate"
        })))
        .unwrap();
        assert_eq!(req.radius_meters, 1500);
        assert!(req.open_now);
        assert_eq!(req.price_level, Some(PriceLevel::Moderate));
    }

    #[test]
    fn request_rejects_bad_arguments() {
        for bad in [
            json!({}),
            json!({"location": 12}),
            json!({"location": "Boston", "price_level": "cheap"}),
            json!({"location": "Boston", "radius_meters": -5}),
            json!({"location": "Boston", "radius_meters": 60000}),
            json!({"location": "Boston", "open_now": "maybe"}),
        ] {
            let err = search_request_from(&args(bad.clone())).unwrap_err();
            assert_eq!(err.code.0, -32602, "expected invalid params for {bad}");
        }
    }

    #[tokio::test]
    async fn search_tool_returns_sample_envelope() {
        let svc = sample_svc();
        let rmcp::Json(val) = svc
            .search_restaurants(Parameters(args(json!({
                "location": "San Francisco, CA",
                "food_type": "coffee",
                "radius_meters": 2000
            }))))
            .await
            .expect("tool should succeed");

        assert_eq!(val["status"], "success");
        assert_eq!(val["data_type"], "sample_data");
        assert_eq!(val["total_found"], 2);
        let results = val["results"].as_array().expect("results array");
        assert!(results.iter().all(|r| r["name"].as_str().unwrap().contains("Coffee")));
        assert_eq!(val["search_params"]["radius_meters"], 2000);
    }

    #[tokio::test]
    async fn search_tool_missing_location_is_invalid_params() {
        let svc = sample_svc();
        let err = match svc.search_restaurants(Parameters(JsonObject::new())).await {
            Err(e) => e,
            Ok(_) => panic!("expected invalid params error, got Ok"),
        };
        assert_eq!(err.code.0, -32602);
        assert!(err.message.contains("location"));
    }

    #[tokio::test]
    async fn greet_returns_text_content() {
        let svc = sample_svc();
        let out = svc
            .greet(Parameters(args(json!({"name": "Sam"}))))
            .await
            .unwrap();
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["content"][0]["type"], "text");
        assert!(v["content"][0]["text"].as_str().unwrap().starts_with("Hello, Sam!"));
    }

    #[tokio::test]
    async fn server_info_echoes_environment() {
        let svc = sample_svc();
        let rmcp::Json(val) = svc.get_server_info(Parameters(JsonObject::new())).await.unwrap();
        assert_eq!(val["server_name"], crate::tools::hello::SERVER_NAME);
        assert_eq!(val["environment"], "test");
        assert!(val["version"].is_string());
    }
}
