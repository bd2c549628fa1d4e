//! Advisory Session Tests
//!
//! Task-level flows: language detection feeding the answer prompt, image
//! attachment, and roster stickiness across a session.

mod common;

use common::ScriptedBackend;
use krishi_mitra::{
    AdvisorySession, FailureKind, FallbackController, Generation, ImageAttachment, Language,
    ModelRoster, RequestDispatcher,
};
use std::sync::Arc;

fn session(backend: &Arc<ScriptedBackend>, models: &[&str]) -> AdvisorySession {
    let controller = Arc::new(FallbackController::new(RequestDispatcher::new(backend.clone())));
    AdvisorySession::new(controller, ModelRoster::new(models.iter().copied()).unwrap())
}

#[tokio::test]
async fn test_ask_answers_in_detected_language() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .answer("m1", "कपास की बुवाई मई में करें")
            .detects("hi"),
    );
    let mut session = session(&backend, &["m1"]);

    let advice = session.ask("कपास कब बोना चाहिए?").await;

    assert_eq!(advice.language, Language::Hindi);
    assert_eq!(advice.generation.text(), Some("कपास की बुवाई मई में करें"));

    let calls = backend.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].prompt.starts_with("Detect the language"));
    assert!(calls[0].prompt.contains("कपास कब बोना चाहिए?"));
    assert!(calls[1].prompt.contains("Respond ONLY in Hindi language"));
}

#[tokio::test]
async fn test_detect_language_normalizes_model_output() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .answer("m1", "unused")
            .detects(" MR\n"),
    );
    let mut session = session(&backend, &["m1"]);

    assert_eq!(session.detect_language("पाऊस कधी येईल?").await, Language::Marathi);
}

#[tokio::test]
async fn test_detect_language_unsupported_code_is_english() {
    let backend = Arc::new(ScriptedBackend::new().answer("m1", "unused").detects("fr"));
    let mut session = session(&backend, &["m1"]);

    assert_eq!(session.detect_language("Quand semer le blé?").await, Language::English);
}

#[tokio::test]
async fn test_detect_language_exhaustion_is_english() {
    let backend = Arc::new(ScriptedBackend::new().fail("m1", FailureKind::RateLimited));
    let mut session = session(&backend, &["m1"]);

    assert_eq!(session.detect_language("ਕਣਕ").await, Language::English);
}

#[tokio::test]
async fn test_detect_language_skips_call_for_empty_text() {
    let backend = Arc::new(ScriptedBackend::new().answer("m1", "hi"));
    let mut session = session(&backend, &["m1"]);

    assert_eq!(session.detect_language("   ").await, Language::English);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_image_analysis_sends_image() {
    let backend = Arc::new(ScriptedBackend::new().answer("vision", "Leaf rust detected"));
    let mut session = session(&backend, &["vision"]);
    let image = ImageAttachment::new("image/jpeg", vec![0xFF, 0xD8, 0xFF]);

    let advice = session.ask_about_image(image.clone(), "").await;

    assert_eq!(advice.language, Language::English);
    assert_eq!(advice.generation.text(), Some("Leaf rust detected"));

    // Empty context: no detection call, only the analysis.
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].image.as_ref(), Some(&image));
    assert!(calls[0].prompt.contains("Farmer's context: None"));
    assert!(calls[0].prompt.contains("Disease/Pest detection"));
}

#[tokio::test]
async fn test_knowledge_and_scheme_prompts() {
    let backend = Arc::new(ScriptedBackend::new().answer("m1", "details"));
    let mut session = session(&backend, &["m1"]);

    session.crop_knowledge("Sugarcane", Language::Kannada).await;
    session.scheme_info("PM Fasal Bima Yojana", Language::Telugu).await;

    let calls = backend.calls();
    assert!(calls[0].prompt.contains("about Sugarcane"));
    assert!(calls[0].prompt.contains("Kannada"));
    assert!(calls[1].prompt.contains("Query: PM Fasal Bima Yojana"));
    assert!(calls[1].prompt.contains("Telugu"));
    assert!(calls.iter().all(|c| c.image.is_none()));
}

#[tokio::test]
async fn test_session_roster_is_sticky_across_tasks() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .fail("m1", FailureKind::NotFound)
            .answer("m2", "answer"),
    );
    let mut session = session(&backend, &["m1", "m2"]);

    session.farming_answer("q1", Language::English).await;
    session.scheme_info("q2", Language::English).await;

    assert_eq!(backend.called_models(), vec!["m1", "m2", "m2"]);
    assert_eq!(session.roster().current(), "m2");
}

#[tokio::test]
async fn test_sessions_do_not_share_rotation() {
    let backend = Arc::new(
        ScriptedBackend::new()
            .fail("m1", FailureKind::Transient)
            .answer("m2", "answer"),
    );
    let mut first = session(&backend, &["m1", "m2"]);
    let second = session(&backend, &["m1", "m2"]);

    first.farming_answer("q", Language::English).await;

    assert_eq!(first.roster().current(), "m2");
    assert_eq!(second.roster().current(), "m1");
}

#[tokio::test]
async fn test_advice_json_shape() {
    let backend = Arc::new(ScriptedBackend::new().fail("m1", FailureKind::Unknown));
    let mut session = session(&backend, &["m1"]);

    let advice = session.ask_knowledge("Onion").await;
    assert!(matches!(advice.generation, Generation::Exhausted { .. }));

    let json = serde_json::to_value(&advice).unwrap();
    assert_eq!(json["language"], "en");
    assert_eq!(json["status"], "exhausted");
    assert_eq!(json["attempts"][0]["kind"], "unknown");
}
