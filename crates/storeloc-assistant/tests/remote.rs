//! `/ask` answering against mocked remote inference endpoints.

use serde_json::json;
use storeloc_assistant::{Assistant, EntityRecognizer, InferenceClient, IntentClassifier};
use storeloc_core::{Directions, StoreInfo, StoreRecord};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUESTION: &str = "How many Subway outlets are there in KL?";

fn store(name: &str, address: &str) -> StoreRecord {
    StoreRecord {
        name: name.to_string(),
        info: StoreInfo {
            address: address.to_string(),
            coordinates: None,
            operating_hours: vec!["8:00 AM - 10:00 PM".to_string()],
        },
        direction: Directions {
            gmap: "https://maps.example.com".to_string(),
            waze: "https://waze.example.com".to_string(),
        },
    }
}

fn records() -> Vec<StoreRecord> {
    vec![
        store("Subway Wangsa Walk", "G-52, Wangsa Walk Mall, Kuala Lumpur"),
        store("Subway Pavilion", "Pavilion, Bukit Bintang, Kuala Lumpur"),
        store("Subway PJ", "Jalan SS2, Petaling Jaya, Selangor"),
    ]
}

fn remote_assistant(server: &MockServer) -> Assistant {
    let intents =
        InferenceClient::new(&format!("{}/intent", server.uri()), 5).expect("intent client");
    let entities =
        InferenceClient::new(&format!("{}/ner", server.uri()), 5).expect("entity client");
    Assistant::new(
        IntentClassifier::Remote(intents),
        EntityRecognizer::Remote(entities),
    )
}

#[tokio::test]
async fn remote_models_answer_count_question() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intent"))
        .and(body_json(json!({ "inputs": QUESTION })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            { "label": "operating_latest", "score": 0.08 },
            { "label": "count_stores", "score": 0.91 }
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ner"))
        .and(body_json(json!({ "inputs": QUESTION })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "entity_group": "GPE", "word": "KL", "start": 37, "end": 39, "score": 0.99 },
            { "entity_group": "ORG", "word": "Subway", "start": 9, "end": 15, "score": 0.97 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let answer = remote_assistant(&server)
        .answer(&records(), QUESTION, None)
        .await;
    assert_eq!(answer, "There are 2 stores in KL.");
}

#[tokio::test]
async fn flat_classification_response_is_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "label": "operating_earliest", "score": 0.7 }
        ])))
        .mount(&server)
        .await;

    let answer = remote_assistant(&server)
        .answer(&records(), "Which store opens first?", None)
        .await;
    assert_eq!(
        answer,
        "The earliest opening store is Subway Wangsa Walk, opening at 8:00 AM."
    );
}

#[tokio::test]
async fn intent_endpoint_failure_is_not_understood() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intent"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let answer = remote_assistant(&server)
        .answer(&records(), QUESTION, None)
        .await;
    assert_eq!(answer, "Sorry, I do not understand your question.");
}

#[tokio::test]
async fn entity_endpoint_failure_falls_back_to_location_param() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "label": "count_stores", "score": 0.9 }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ner"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let answer = remote_assistant(&server)
        .answer(&records(), QUESTION, Some("Selangor"))
        .await;
    assert_eq!(answer, "There are 1 stores in Selangor.");
}

#[tokio::test]
async fn token_level_entity_tags_count_as_places() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/intent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "label": "count_stores", "score": 0.9 }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "entity": "B-ORG", "word": "Subway", "start": 9, "end": 15, "score": 0.97 },
            { "entity": "B-GPE", "word": "KL", "start": 37, "end": 39, "score": 0.99 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let answer = remote_assistant(&server)
        .answer(&records(), QUESTION, Some("Selangor"))
        .await;
    assert_eq!(answer, "There are 2 stores in KL.");
}
