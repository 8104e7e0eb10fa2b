//! Live assistant checks against the real Gemini API
//!
//! Needs GEMINI_API_KEY (or API_KEY). Run with:
//!   cargo test -p scentvalue-cli --test live_assistant_test -- --ignored --nocapture

use scentvalue_app::config::Config;
use scentvalue_domain::PricingConfig;
use scentvalue_vision::{Assistant, GeminiAssistant, ASK_FAILURE_MESSAGE};

fn live_assistant() -> GeminiAssistant {
    let config = Config::default();
    assert!(
        config.resolved_api_key().is_some(),
        "set GEMINI_API_KEY to run live tests"
    );
    GeminiAssistant::new(&config.assistant_config(), PricingConfig::default())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_live_question_is_answered() {
    let answer = live_assistant()
        .ask_text("What is the net price of a 636g bottle?")
        .await;
    println!("=== Assistant ===\n{}", answer);
    assert_ne!(answer, ASK_FAILURE_MESSAGE);
    assert!(!answer.trim().is_empty());
}
