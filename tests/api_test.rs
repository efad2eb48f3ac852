use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mensa::application::ports::{
    AnalysisError, AuthError, InsightAnalyzer, LlmClient, LlmClientError, PreferenceRepository,
    RepositoryError, SpeechToText, TokenVerifier, TranscriptionError,
};
use mensa::application::services::{
    PreferenceService, RecommendationService, VoiceAnalysisService,
};
use mensa::domain::{
    Emotion, Insight, Preference, PreferenceId, Sentiment, TranscriptionResult, UserId,
};
use mensa::infrastructure::menu::StaticMenuSource;
use mensa::presentation::{create_router, AppState};

const VALID_TOKEN: &str = "valid-token";
const TEST_USER: &str = "user-123";

struct MockSpeechToText {
    text: &'static str,
}

#[async_trait::async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(
        &self,
        _audio: &[u8],
        _content_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        Ok(TranscriptionResult {
            text: self.text.to_string(),
            language_code: Some("en".to_string()),
        })
    }
}

struct MockAnalyzer;

#[async_trait::async_trait]
impl InsightAnalyzer for MockAnalyzer {
    async fn analyze(&self, transcript: &str) -> Result<Insight, AnalysisError> {
        Ok(Insight {
            transcript: transcript.to_string(),
            sentiment: Sentiment::Negative,
            emotion: Emotion::Stressed,
            intent: "dietary".to_string(),
            keywords: vec!["peanuts".to_string()],
            summary: None,
        })
    }
}

struct MockLlmClient;

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmClientError> {
        Ok(r#"[{"item": "Lentil curry", "score": 0.9, "reason": "fits a vegan diet"}]"#.to_string())
    }
}

struct MockTokenVerifier;

#[async_trait::async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        if token == VALID_TOKEN {
            Ok(UserId::new(TEST_USER))
        } else {
            Err(AuthError::InvalidToken(
                "rejected by identity provider".to_string(),
            ))
        }
    }
}

/// In-memory preference store backing the CRUD endpoints in these tests.
#[derive(Default)]
struct InMemoryRepository {
    rows: Mutex<Vec<Preference>>,
    fail_creates: bool,
}

#[async_trait::async_trait]
impl PreferenceRepository for InMemoryRepository {
    async fn create(&self, preference: &Preference) -> Result<(), RepositoryError> {
        if self.fail_creates {
            return Err(RepositoryError::QueryFailed("disk full".to_string()));
        }
        self.rows.lock().unwrap().push(preference.clone());
        Ok(())
    }

    async fn get_by_id(
        &self,
        id: PreferenceId,
        user_id: &UserId,
    ) -> Result<Option<Preference>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && &p.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Preference>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| &p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, preference: &Preference) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|p| p.id == preference.id) {
            Some(row) => {
                *row = preference.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(
                preference.id.as_uuid().to_string(),
            )),
        }
    }

    async fn delete(&self, id: PreferenceId, user_id: &UserId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| !(p.id == id && &p.user_id == user_id));
        if rows.len() == before {
            return Err(RepositoryError::NotFound(id.as_uuid().to_string()));
        }
        Ok(())
    }
}

fn build_router(transcript: &'static str, repository: Arc<InMemoryRepository>) -> Router {
    let stt = Arc::new(MockSpeechToText { text: transcript });
    let analyzer = Arc::new(MockAnalyzer);
    let llm = Arc::new(MockLlmClient);

    let voice_service = Arc::new(VoiceAnalysisService::new(
        stt,
        analyzer,
        repository.clone() as Arc<dyn PreferenceRepository>,
    ));
    let preference_service = Arc::new(PreferenceService::new(
        repository.clone() as Arc<dyn PreferenceRepository>
    ));
    let recommendation_service = Arc::new(RecommendationService::new(
        llm,
        repository as Arc<dyn PreferenceRepository>,
        Arc::new(StaticMenuSource::demo()),
        3,
    ));

    create_router(AppState {
        voice_service,
        preference_service,
        recommendation_service,
        token_verifier: Arc::new(MockTokenVerifier),
    })
}

fn multipart_body(boundary: &str, content_type: &str, run_analysis: Option<&str>) -> Vec<u8> {
    multipart_body_with_audio(boundary, content_type, b"fake audio bytes", run_analysis)
}

fn multipart_body_with_audio(
    boundary: &str,
    content_type: &str,
    audio: &[u8],
    run_analysis: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"audio\"; \
filename=\"clip.webm\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(audio);
    body.extend_from_slice(b"\r\n");
    if let Some(value) = run_analysis {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"run_analysis\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

fn authorized(request: axum::http::request::Builder) -> axum::http::request::Builder {
    request.header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn given_health_request_when_handled_then_returns_healthy() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn given_request_id_header_when_handled_then_it_is_echoed_back() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        &"req-42".parse::<axum::http::HeaderValue>().unwrap()
    );
}

#[tokio::test]
async fn given_no_request_id_header_when_handled_then_one_is_generated() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn given_missing_token_when_analyzing_voice_then_returns_unauthorized() {
    let router = build_router("hello", Arc::new(InMemoryRepository::default()));
    let boundary = "test-boundary";

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/voice/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(boundary, "audio/webm", None)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_invalid_token_when_listing_preferences_then_returns_unauthorized() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/preferences")
                .header(header::AUTHORIZATION, "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_allergy_audio_when_analyzing_voice_then_returns_insight_and_stores_preference() {
    let repository = Arc::new(InMemoryRepository::default());
    let router = build_router("I'm allergic to peanuts", Arc::clone(&repository));
    let boundary = "test-boundary";

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/voice/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(boundary, "audio/webm", None)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["transcript"], "I'm allergic to peanuts");
    assert_eq!(body["sentiment"], "negative");
    assert_eq!(body["emotion"], "stressed");
    assert_eq!(body["language_code"], "en");

    let rows = repository.rows.lock().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().any(|p| p.value == "peanuts"));
}

#[tokio::test]
async fn given_analysis_disabled_when_analyzing_voice_then_insight_is_neutral() {
    let repository = Arc::new(InMemoryRepository::default());
    let router = build_router("I love the pasta", Arc::clone(&repository));
    let boundary = "test-boundary";

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/voice/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(
                    boundary,
                    "audio/webm",
                    Some("false"),
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["sentiment"], "neutral");
    assert_eq!(body["emotion"], "neutral");
    assert_eq!(body["intent"], "unknown");
}

#[tokio::test]
async fn given_unsupported_audio_type_when_analyzing_voice_then_returns_unprocessable() {
    let router = build_router("unused", Arc::new(InMemoryRepository::default()));
    let boundary = "test-boundary";

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/voice/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(boundary, "application/pdf", None)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn given_no_audio_part_when_analyzing_voice_then_returns_bad_request() {
    let router = build_router("unused", Arc::new(InMemoryRepository::default()));
    let boundary = "test-boundary";
    let body = format!("--{boundary}--\r\n");

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/voice/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "No audio uploaded");
}

#[tokio::test]
async fn given_multi_megabyte_audio_when_analyzing_voice_then_it_is_accepted() {
    let repository = Arc::new(InMemoryRepository::default());
    let router = build_router("I love the pasta", Arc::clone(&repository));
    let boundary = "test-boundary";
    let audio = vec![0u8; 5 * 1024 * 1024];

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/voice/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body_with_audio(
                    boundary,
                    "audio/webm",
                    &audio,
                    None,
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_audio_over_size_limit_when_analyzing_voice_then_returns_unprocessable() {
    let router = build_router("unused", Arc::new(InMemoryRepository::default()));
    let boundary = "test-boundary";
    let audio = vec![0u8; 25 * 1024 * 1024 + 1];

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/voice/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body_with_audio(
                    boundary,
                    "audio/webm",
                    &audio,
                    None,
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("too large"));
}

#[tokio::test]
async fn given_failing_store_when_analyzing_voice_then_request_still_succeeds() {
    let repository = Arc::new(InMemoryRepository {
        rows: Mutex::new(Vec::new()),
        fail_creates: true,
    });
    let router = build_router("I'm allergic to peanuts", Arc::clone(&repository));
    let boundary = "test-boundary";

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/voice/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(multipart_body(boundary, "audio/webm", None)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(repository.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn given_valid_preference_when_creating_then_it_appears_in_the_list() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let create_response = router
        .clone()
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/preferences")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"preference_type": "allergy", "value": "peanuts"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(create_response.status(), StatusCode::CREATED);
    let created = json_body(create_response).await;
    assert_eq!(created["preference_type"], "allergy");
    assert_eq!(created["value"], "peanuts");
    assert_eq!(created["category"], "food");

    let list_response = router
        .oneshot(
            authorized(Request::builder())
                .uri("/api/v1/preferences")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(list_response.status(), StatusCode::OK);
    let listed = json_body(list_response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["value"], "peanuts");
}

#[tokio::test]
async fn given_unknown_preference_type_when_creating_then_returns_unprocessable() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/preferences")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"preference_type": "craving", "value": "chocolate"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("craving"));
}

#[tokio::test]
async fn given_blank_value_when_creating_preference_then_returns_unprocessable() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/preferences")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"preference_type": "dislike", "value": "   "}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn given_unknown_id_when_updating_preference_then_returns_not_found() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("PUT")
                .uri(format!(
                    "/api/v1/preferences/{}",
                    uuid::Uuid::new_v4()
                ))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"preference_type": "dislike", "value": "olives"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_existing_preference_when_updating_then_fields_change() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let create_response = router
        .clone()
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/preferences")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"preference_type": "dislike", "value": "olives"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let created = json_body(create_response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let update_response = router
        .oneshot(
            authorized(Request::builder())
                .method("PUT")
                .uri(format!("/api/v1/preferences/{}", id))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"preference_type": "allergy", "value": "olives"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(update_response.status(), StatusCode::OK);
    let updated = json_body(update_response).await;
    assert_eq!(updated["preference_type"], "allergy");
    assert_eq!(updated["id"].as_str().unwrap(), id);
}

#[tokio::test]
async fn given_existing_preference_when_deleting_then_returns_no_content() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let create_response = router
        .clone()
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/preferences")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"preference_type": "dislike", "value": "olives"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let created = json_body(create_response).await;
    let id = created["id"].as_str().unwrap().to_string();

    let delete_response = router
        .oneshot(
            authorized(Request::builder())
                .method("DELETE")
                .uri(format!("/api/v1/preferences/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(delete_response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn given_unknown_id_when_deleting_preference_then_returns_not_found() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("DELETE")
                .uri(format!(
                    "/api/v1/preferences/{}",
                    uuid::Uuid::new_v4()
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_stored_preferences_when_exporting_then_returns_compact_shape() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    router
        .clone()
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/preferences")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"preference_type": "restriction", "value": "vegan"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = router
        .oneshot(
            authorized(Request::builder())
                .uri("/api/v1/preferences/export")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], TEST_USER);
    assert_eq!(body["preferences"][0]["type"], "restriction");
    assert_eq!(body["preferences"][0]["value"], "vegan");
}

#[tokio::test]
async fn given_ranking_from_model_when_recommending_then_returns_recommendations() {
    let router = build_router("", Arc::new(InMemoryRepository::default()));

    let response = router
        .oneshot(
            authorized(Request::builder())
                .method("POST")
                .uri("/api/v1/recommendations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"top_k": 2}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0]["item"], "Lentil curry");
    assert_eq!(recommendations[0]["reason"], "fits a vegan diet");
}
