use std::collections::HashMap;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use storeloc_core::{catchment_area, CatchmentError};

use super::{non_empty, ApiError, AppState, QueryArgs};

/// Kilometres from a `distance` query value. Only plain decimal digits are
/// accepted.
fn parse_distance(raw: &str) -> Result<f64, ApiError> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request("Distance must be an integer"));
    }
    raw.parse::<f64>()
        .map_err(|_| ApiError::bad_request("Distance must be an integer"))
}

pub(super) async fn get_catchment_area(
    State(state): State<AppState>,
    args: QueryArgs,
) -> Result<Json<Value>, ApiError> {
    let distance = non_empty(args.first("distance"))
        .ok_or_else(|| ApiError::bad_request("Please provide a distance"))?;
    let distance_km = parse_distance(distance)?;
    let store_name = non_empty(args.first("store_name"))
        .ok_or_else(|| ApiError::bad_request("Please provide a store name"))?;

    let names = catchment_area(&state.database, store_name, distance_km).map_err(|e| {
        tracing::debug!(error = %e, "catchment query rejected");
        match e {
            CatchmentError::StoreNotFound(_) => ApiError::bad_request("Store name not found"),
            CatchmentError::MissingCoordinates(_) => {
                ApiError::bad_request("No coordinates found for the store")
            }
        }
    })?;

    let area: HashMap<&str, Vec<String>> = HashMap::from([(store_name, names)]);
    Ok(Json(json!({ "catchment_area": area })))
}
