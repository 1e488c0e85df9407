//! Integration tests for next-action prediction

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sentiment_tracker::core::LexiconConfig;
use sentiment_tracker::predict_next_action;
use sentiment_tracker::types::{
    ActionPrediction, ContextType, Message, PredictedAction, RiskLevel, TimelineBucket, Trend,
};

#[test]
fn test_churning_customer() {
    let msgs = Message::from_texts([
        "The product was good at first",
        "Lately it is slow and there is a problem every day",
        "Terrible. I will cancel and switch to a competitor, it is too expensive",
    ]);
    let p = predict_next_action(&msgs, ContextType::Customer);

    assert_eq!(p.action, PredictedAction::LikelyChurn);
    assert_eq!(p.urgency, RiskLevel::Critical);
    assert!(p.timeline <= TimelineBucket::Soon);
    assert_eq!(p.interventions[0], "Immediate outreach required");
    assert!(p.interventions.len() <= 4);
    assert!(p.explanation.contains("strong churn indicators"));

    let summary = p.sentiment_trajectory.as_ref().unwrap();
    assert_eq!(summary.trend, Trend::Declining);
}

#[test]
fn test_happy_customer_stays() {
    let msgs = Message::from_texts(["Great onboarding", "Excellent support, very happy", "Perfect, thanks"]);
    let p = predict_next_action(&msgs, ContextType::Customer);
    assert_eq!(p.action, PredictedAction::LikelyStay);
    assert_eq!(p.urgency, RiskLevel::Low);
    assert_eq!(p.timeline, TimelineBucket::Extended);
    assert!(p.success_rate >= 80.0);
}

#[test]
fn test_empty_conversation() {
    let p = predict_next_action(&[], ContextType::Employee);
    assert_eq!(p, ActionPrediction::empty());
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["action"], "UNKNOWN");
    assert_eq!(json["timeline"], "UNKNOWN");
    assert_eq!(json["explanation"], "No data provided");
}

#[test]
fn test_json_shape() {
    let p = predict_next_action(&Message::from_texts(["hello", "ok"]), ContextType::General);
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["action"], "MONITOR_CLOSELY");
    assert_eq!(json["timeline"], "EXTENDED (1-3 months)");
    assert_eq!(json["urgency"], "LOW");
    assert!(json["sentiment_trajectory"]["trend"].is_string());
}

#[test]
fn test_custom_indicators() {
    let config = LexiconConfig::from_json_str(
        r#"{"indicators": {"churn": ["adios", "bye", "gone", "leaving"], "resolution": ["gracias"]}}"#,
    )
    .unwrap();
    let predictor = config.action_predictor();
    let p = predictor.predict(
        &Message::from_texts(["terrible", "awful, bye, I am leaving, gone, adios"]),
        ContextType::Customer,
    );
    // 4 indicators = 60 > 50 and sentiment well below 40
    assert_eq!(p.action, PredictedAction::LikelyChurn);
}

#[test]
fn test_identical_input_identical_output() {
    let msgs = Message::from_texts(["fine", "a bit slow", "please fix it"]);
    let a = serde_json::to_string(&predict_next_action(&msgs, ContextType::Customer)).unwrap();
    let b = serde_json::to_string(&predict_next_action(&msgs, ContextType::Customer)).unwrap();
    assert_eq!(a, b);
}

proptest! {
    #[test]
    fn prop_prediction_bounded(
        texts in prop::collection::vec("\\PC{0,80}", 1..10),
        ctx in prop::sample::select(vec![
            ContextType::Customer,
            ContextType::Employee,
            ContextType::Email,
            ContextType::Investor,
            ContextType::General,
        ]),
    ) {
        let p = predict_next_action(&Message::from_texts(texts), ctx);
        prop_assert!((0.0..=100.0).contains(&p.confidence));
        prop_assert!((20.0..=95.0).contains(&p.success_rate));
        prop_assert!(p.interventions.len() <= 4);
        prop_assert!(p.action != PredictedAction::Unknown);
        prop_assert!(p.sentiment_trajectory.is_some());
    }
}
