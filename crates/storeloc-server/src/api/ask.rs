use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{non_empty, ApiError, AppState, QueryArgs};

#[derive(Debug, Serialize)]
pub(super) struct AskResponse {
    response: String,
}

pub(super) async fn ask(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    args: QueryArgs,
) -> Result<Json<AskResponse>, ApiError> {
    let question = non_empty(args.first("question"))
        .ok_or_else(|| ApiError::bad_request("Please provide a question"))?;
    let location = non_empty(args.first("location"));

    let response = state
        .assistant
        .answer(&state.database, question, location)
        .await;
    tracing::info!(request_id = %req_id.0, %question, %response, "answered question");

    Ok(Json(AskResponse { response }))
}
