mod ask;
mod catchment;
mod locations;

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use storeloc_assistant::Assistant;
use storeloc_core::StoreRecord;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, require_auth, AuthState};

/// Read-only state built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<Vec<StoreRecord>>,
    pub assistant: Arc<Assistant>,
}

/// Body of every error response: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Query-string arguments in request order. A repeated key reads as its
/// first value.
#[derive(Debug)]
pub(super) struct QueryArgs(Vec<(String, String)>);

impl QueryArgs {
    pub(super) fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for QueryArgs {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        Ok(Self(pairs))
    }
}

/// Trimmed query value, or `None` when absent or blank.
pub(super) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route(
            "/get-subway-locations",
            get(locations::get_subway_locations),
        )
        .route("/get-catchment-area", get(catchment::get_catchment_area))
        .route("/ask", get(ask::ask))
        .layer(axum::middleware::from_fn_with_state(auth, require_auth))
}

pub fn build_app(state: AppState, auth: AuthState) -> Router {
    Router::new()
        .merge(protected_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use storeloc_assistant::{
        parse_ask_model, Assistant, EntityRecognizer, Gazetteer, IntentClassifier,
        PatternIntentModel,
    };
    use storeloc_core::{Coordinates, Directions, StoreInfo, StoreRecord};
    use tower::ServiceExt;

    use super::{build_app, AppState};
    use crate::middleware::AuthState;

    pub const SECRET: &str = "test-secret";

    const MODEL: &str = r"
intents:
  - tag: count_stores
    patterns:
      - how many stores are there in kl
  - tag: operating_earliest
    patterns:
      - which store opens the earliest
  - tag: operating_latest
    patterns:
      - which store closes the latest
entities:
  - label: GPE
    terms: [KL, Kuala Lumpur, Petaling Jaya]
";

    fn store(
        name: &str,
        address: &str,
        coords: Option<(f64, f64)>,
        hours: &[&str],
    ) -> StoreRecord {
        StoreRecord {
            name: name.to_string(),
            info: StoreInfo {
                address: address.to_string(),
                coordinates: coords.map(|(lat, lng)| Coordinates::new(lat, lng)),
                operating_hours: hours.iter().map(ToString::to_string).collect(),
            },
            direction: Directions {
                gmap: format!("https://maps.google.com/?q={name}"),
                waze: format!("https://waze.com/ul?q={name}"),
            },
        }
    }

    /// A ≈0.5 km from B, C ≈33 km away, D never geocoded.
    pub fn records() -> Vec<StoreRecord> {
        vec![
            store(
                "A",
                "Jalan Ampang, Kuala Lumpur",
                Some((3.1390, 101.6869)),
                &["8:00 AM - 10:00 PM"],
            ),
            store(
                "B",
                "Jalan Raja Chulan, Kuala Lumpur",
                Some((3.1420, 101.6900)),
                &["7:00 AM - 9:00 PM"],
            ),
            store(
                "C",
                "Jalan SS2, Petaling Jaya",
                Some((3.4390, 101.6869)),
                &["10:00 AM - 11:30 PM"],
            ),
            store("D", "Unknown Road, Selangor", None, &[]),
        ]
    }

    pub fn app() -> Router {
        let model = parse_ask_model(MODEL).expect("model");
        let assistant = Assistant::new(
            IntentClassifier::Patterns(PatternIntentModel::from_model(&model)),
            EntityRecognizer::Gazetteer(Gazetteer::from_model(&model).expect("gazetteer")),
        );
        build_app(
            AppState {
                database: Arc::new(records()),
                assistant: Arc::new(assistant),
            },
            AuthState::new(SECRET),
        )
    }

    /// Send a GET with the given `Authorization` header and return status
    /// plus parsed JSON body.
    pub async fn get(uri: &str, auth: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).expect("request"))
            .await
            .expect("response");

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{get, SECRET};
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn api_error_renders_error_body() {
        let response = ApiError::bad_request("Please provide a distance").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_empty_trims_and_drops_blank() {
        assert_eq!(non_empty(Some("  KL ")), Some("KL"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn repeated_query_key_reads_first_value() {
        let args = QueryArgs(vec![
            ("distance".to_string(), "5".to_string()),
            ("store_name".to_string(), "A".to_string()),
            ("distance".to_string(), "6".to_string()),
        ]);
        assert_eq!(args.first("distance"), Some("5"));
        assert_eq!(args.first("store_name"), Some("A"));
        assert_eq!(args.first("location"), None);
    }

    #[tokio::test]
    async fn every_route_requires_the_secret() {
        for uri in [
            "/get-subway-locations",
            "/get-catchment-area?distance=5&store_name=A",
            "/ask?question=hello",
        ] {
            let (status, body) = get(uri, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body, serde_json::json!({ "error": "Unauthorized" }));

            let (status, _) = get(uri, Some("wrong")).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn auth_is_checked_before_parameters() {
        let (status, body) = get("/get-catchment-area", Some("nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");

        let (status, body) = get("/get-catchment-area", Some(SECRET)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please provide a distance");
    }

    #[tokio::test]
    async fn response_carries_request_id() {
        let response = test_support::app()
            .oneshot(
                Request::builder()
                    .uri("/get-subway-locations")
                    .header("authorization", SECRET)
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-42")
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = test_support::app()
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .header("authorization", SECRET)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
