//! Direct tool endpoints and the structured REST API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use rentdesk_lib::Order;
use rentdesk_mcp::tools::{try_call_tool, QUERY_ORDER, QUERY_STORES};
use rentdesk_service_shared::{
    extract_or_generate_request_id, from_tool_error, record_orders_returned,
    record_stores_returned, record_tool_call, AppState, NearbyStoresRequest,
    NearbyStoresResponse, OrdersByPhoneRequest, OrdersByPhoneResponse, ProblemDetails,
    ServiceResponse, Validate,
};

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success(ServiceResponse<T>),
    Error(ProblemDetails),
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            ApiResponse::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            ApiResponse::Error(problem) => problem.into_response(),
        }
    }
}

fn rejected_body(rejection: &JsonRejection, request_id: &str) -> ProblemDetails {
    ProblemDetails::bad_request(rejection.body_text(), request_id).with_code("INVALID_BODY")
}

fn direct_tool(
    state: &AppState,
    tool: &str,
    headers: &HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = extract_or_generate_request_id(headers);
    let arguments = match body {
        Ok(Json(arguments)) => arguments,
        Err(rejection) => return rejected_body(&rejection, request_id.as_str()).into_response(),
    };

    match try_call_tool(state.datastore(), tool, &arguments) {
        Ok(result) => {
            record_tool_call(tool, false, "http");
            Json(result).into_response()
        }
        Err(err) => {
            record_tool_call(tool, true, "http");
            info!(request_id = %request_id, tool, error = %err, "tool call rejected");
            from_tool_error(&err, request_id.as_str()).into_response()
        }
    }
}

/// Handle POST /query_order with the tool arguments as the body.
pub async fn query_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    direct_tool(&state, QUERY_ORDER, &headers, body)
}

/// Handle POST /query_stores with the tool arguments as the body.
pub async fn query_stores(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    direct_tool(&state, QUERY_STORES, &headers, body)
}

/// Handle POST /api/v1/orders/by-phone requests.
pub async fn orders_by_phone(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<OrdersByPhoneRequest>, JsonRejection>,
) -> ApiResponse<OrdersByPhoneResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return ApiResponse::Error(rejected_body(&rejection, request_id.as_str())),
    };

    if let Err(problem) = request.validate(request_id.as_str()) {
        return ApiResponse::Error(*problem);
    }

    let orders: Vec<Order> = state
        .datastore()
        .orders_by_phone(&request.phone)
        .into_iter()
        .cloned()
        .collect();
    record_orders_returned(orders.len());

    info!(request_id = %request_id, found = orders.len(), "orders by phone completed");

    ApiResponse::Success(ServiceResponse::new(OrdersByPhoneResponse::new(
        request.phone,
        orders,
    )))
}

/// Handle POST /api/v1/stores/nearby requests.
pub async fn nearby_stores(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<NearbyStoresRequest>, JsonRejection>,
) -> ApiResponse<NearbyStoresResponse> {
    let request_id = extract_or_generate_request_id(&headers);
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return ApiResponse::Error(rejected_body(&rejection, request_id.as_str())),
    };

    if let Err(problem) = request.validate(request_id.as_str()) {
        return ApiResponse::Error(*problem);
    }

    // Both present once validated.
    let (Some(latitude), Some(longitude)) = (request.latitude, request.longitude) else {
        return ApiResponse::Error(ProblemDetails::internal_error(
            "coordinates missing after validation",
            request_id.as_str(),
        ));
    };
    let limit = request.effective_limit();

    let stores = state.datastore().stores_by_location(latitude, longitude, limit);
    record_stores_returned(stores.len());

    info!(
        request_id = %request_id,
        latitude,
        longitude,
        limit,
        found = stores.len(),
        "nearby stores completed"
    );

    ApiResponse::Success(ServiceResponse::new(NearbyStoresResponse::new(
        latitude, longitude, limit, stores,
    )))
}
