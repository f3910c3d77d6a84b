//! Integration tests for `TranslateClient` and `TranslationOverlay` using
//! wiremock HTTP mocks.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sportshop_core::{KeyValueStore, Language, MemoryStore};
use sportshop_i18n::{TextState, TranslateClient, TranslateError, TranslationOverlay};

fn deepl_proxy(server: &MockServer) -> TranslateClient {
    TranslateClient::new(&server.uri(), "/api/deepl", None, 5, "sportshop-test/0.1")
        .expect("client construction should not fail")
}

fn libre(server: &MockServer, key: Option<&str>) -> TranslateClient {
    let endpoint = format!("{}/translate", server.uri());
    TranslateClient::new("http://unused.test", &endpoint, key, 5, "sportshop-test/0.1")
        .expect("client construction should not fail")
}

fn texts(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

// ---------------------------------------------------------------------------
// TranslateClient
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deepl_sends_form_with_repeated_text_and_upper_case_languages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/deepl/translate"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("text=Chaussures"))
        .and(body_string_contains("text=Ballon"))
        .and(body_string_contains("source_lang=FR"))
        .and(body_string_contains("target_lang=EN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [{"text": "Shoes"}, {"text": "Ball &amp; net"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translated = deepl_proxy(&server)
        .translate_batch(
            &texts(&["Chaussures", "Ballon", "Chaussures", " "]),
            Language::Fr,
            Language::En,
        )
        .await
        .expect("should translate");

    assert_eq!(translated.len(), 2);
    assert_eq!(translated["Chaussures"], "Shoes");
    assert_eq!(translated["Ballon"], "Ball & net");
}

#[tokio::test]
async fn deepl_proxy_gets_key_in_body_but_no_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/deepl/translate"))
        .and(body_string_contains("auth_key=secret"))
        .respond_with(move |req: &wiremock::Request| {
            if req.headers.contains_key("authorization") {
                ResponseTemplate::new(400)
            } else {
                ResponseTemplate::new(200)
                    .set_body_json(json!({"translations": [{"text": "Shoes"}]}))
            }
        })
        .mount(&server)
        .await;

    let client = TranslateClient::new(&server.uri(), "/api/deepl", Some("secret"), 5, "test").unwrap();
    let translated = client
        .translate_batch(&texts(&["Chaussures"]), Language::Fr, Language::En)
        .await
        .unwrap();
    assert_eq!(translated["Chaussures"], "Shoes");
}

#[tokio::test]
async fn libre_sends_json_and_accepts_array_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .and(body_json(json!({
            "q": ["Chaussures", "Ballon"],
            "source": "fr",
            "target": "en",
            "format": "text",
            "api_key": "k",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translatedText": ["Shoes", "Ball"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let translated = libre(&server, Some("k"))
        .translate_batch(&texts(&["Chaussures", "Ballon"]), Language::Fr, Language::En)
        .await
        .unwrap();
    assert_eq!(translated["Ballon"], "Ball");
}

#[tokio::test]
async fn short_response_is_a_count_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Shoes"])))
        .mount(&server)
        .await;

    let err = libre(&server, None)
        .translate_batch(&texts(&["Chaussures", "Ballon"]), Language::Fr, Language::En)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TranslateError::CountMismatch {
            sent: 2,
            received: 1
        }
    ));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = deepl_proxy(&server)
        .translate_batch(&texts(&["Chaussures"]), Language::Fr, Language::En)
        .await
        .unwrap_err();
    assert!(matches!(err, TranslateError::UnexpectedStatus { status: 403, .. }));
}

// ---------------------------------------------------------------------------
// TranslationOverlay
// ---------------------------------------------------------------------------

fn english_overlay(client: TranslateClient, store: Arc<MemoryStore>) -> TranslationOverlay {
    let overlay = TranslationOverlay::new(client, store, Duration::from_millis(30));
    overlay.set_language(Language::En).unwrap();
    overlay
}

#[tokio::test]
async fn texts_requested_together_go_out_in_one_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/deepl/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "translations": [{"text": "Ball"}, {"text": "Shoes"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let overlay = english_overlay(deepl_proxy(&server), Arc::clone(&store));

    assert_eq!(overlay.t("Chaussures"), "Chaussures");
    assert_eq!(overlay.t("Ballon"), "Ballon");
    assert_eq!(overlay.state_of("Ballon"), TextState::Pending);

    tokio::time::sleep(Duration::from_millis(250)).await;

    // Pending texts are sent in sorted order: Ballon, Chaussures.
    assert_eq!(overlay.t("Ballon"), "Ball");
    assert_eq!(overlay.t("Chaussures"), "Shoes");
    assert!(!overlay.is_translating());

    let persisted = store.get("sportshop.translations.en").unwrap();
    assert!(persisted.contains("\"Ballon\":\"Ball\""));
    assert_eq!(store.get("sportshop.language").as_deref(), Some("en"));
}

#[tokio::test]
async fn empty_translation_resolves_to_source() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"translations": [{"text": ""}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let overlay = english_overlay(deepl_proxy(&server), Arc::new(MemoryStore::new()));
    let _ = overlay.t("Decathlon");
    assert_eq!(overlay.flush_now().await, 1);
    assert_eq!(
        overlay.state_of("Decathlon"),
        TextState::Resolved("Decathlon".to_owned())
    );
    // Resolved texts are not asked for again.
    assert_eq!(overlay.t("Decathlon"), "Decathlon");
    assert!(!overlay.is_translating());
}

#[tokio::test]
async fn texts_queued_during_a_flight_wait_for_the_next_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("text=Gourde"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"translations": [{"text": "Bottle"}]}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("text=Sac"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"translations": [{"text": "Bag"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let overlay = english_overlay(deepl_proxy(&server), Arc::new(MemoryStore::new()));
    let _ = overlay.t("Gourde");
    // Let the timer fire and the first batch start.
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(overlay.is_translating());

    let _ = overlay.t("Sac");
    assert_eq!(overlay.state_of("Sac"), TextState::Pending);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(overlay.t("Gourde"), "Bottle");
    assert_eq!(overlay.t("Sac"), "Bag");
}

#[tokio::test]
async fn translations_arriving_after_switching_to_french_are_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"translations": [{"text": "Racket"}]}))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;

    let overlay = english_overlay(deepl_proxy(&server), Arc::new(MemoryStore::new()));
    let _ = overlay.t("Raquette");
    tokio::time::sleep(Duration::from_millis(80)).await;
    overlay.set_language(Language::Fr).unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    overlay.set_language(Language::En).unwrap();
    assert_eq!(overlay.state_of("Raquette"), TextState::Unseen);
}

#[tokio::test]
async fn resolved_cache_survives_a_round_trip_through_french() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"translations": [{"text": "Helmet"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let overlay = english_overlay(deepl_proxy(&server), Arc::new(MemoryStore::new()));
    let _ = overlay.t("Casque");
    overlay.flush_now().await;

    overlay.set_language(Language::Fr).unwrap();
    assert_eq!(overlay.t("Casque"), "Casque");
    overlay.set_language(Language::En).unwrap();
    assert_eq!(overlay.t("Casque"), "Helmet");
}
