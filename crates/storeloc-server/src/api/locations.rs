use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use super::AppState;

/// The whole dataset, in scrape order, serialized from the shared copy.
pub(super) async fn get_subway_locations(State(state): State<AppState>) -> Response {
    Json(state.database.as_slice()).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::test_support::{self, get, records, SECRET};

    #[tokio::test]
    async fn returns_full_dataset() {
        let (status, body) = get("/get-subway-locations", Some(SECRET)).await;
        assert_eq!(status, StatusCode::OK);

        let expected = serde_json::to_value(records()).expect("serialize");
        assert_eq!(body, expected);
        assert!(body[3]["info"]["coordinates"].is_null());
    }

    #[tokio::test]
    async fn responds_with_json_content_type() {
        let response = test_support::app()
            .oneshot(
                Request::builder()
                    .uri("/get-subway-locations")
                    .header("authorization", SECRET)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }
}
