//! Integration tests for the sentiment trajectory
//!
//! Tests the full path: wire messages → LexiconScorer → TrajectoryAnalyzer

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sentiment_tracker::analyze_sentiment_evolution;
use sentiment_tracker::core::{classify_trend, LexiconConfig, LexiconScorer};
use sentiment_tracker::types::{Message, RawMessage, SentimentState, Trajectory, Trend};

const BASE_WORDS: &[&str] = &[
    "the", "order", "arrived", "today", "we", "talked", "about", "plan", "team", "meeting",
    "not", "no", "never", "very", "so", "slow", "fine", "good", "bad", "thanks",
];

const NEGATIVE_TERMS: &[&str] = &["hate", "terrible", "awful", "worst", "odio"];
const POSITIVE_TERMS: &[&str] = &["excellent", "wonderful", "perfect", "superb", "genial"];

#[test]
fn test_positive_message_scores_high() {
    let t = analyze_sentiment_evolution(&Message::from_texts(["I love this, excellent service"]));
    assert!(t.current_sentiment >= 60.0, "got {}", t.current_sentiment);
    assert!(t.timeline[0].sentiment_state >= SentimentState::Positive);
}

#[test]
fn test_negative_message_scores_low() {
    let t = analyze_sentiment_evolution(&Message::from_texts(["I hate this, terrible and broken"]));
    assert!(t.current_sentiment < 40.0, "got {}", t.current_sentiment);
}

#[test]
fn test_negated_terms_keep_their_direction() {
    let scorer = LexiconScorer::new();
    assert!(scorer.score("not perfect") >= scorer.score("not"));
    assert!(scorer.score("it is not terrible") <= scorer.score("it is not"));
    assert!(scorer.score("very good, not perfect") >= scorer.score("very good, not"));
}

#[test]
fn test_declining_sequence() {
    assert_eq!(classify_trend(&[80.0, 75.0, 70.0, 65.0, 60.0]), Trend::Declining);
}

#[test]
fn test_declining_conversation_end_to_end() {
    let msgs = Message::from_texts([
        "Excellent product, I love it",
        "Great support so far",
        "It has been slow lately",
        "Terrible experience, I hate this",
        "Awful, the worst service",
    ]);
    let t = analyze_sentiment_evolution(&msgs);
    assert_eq!(t.trend, Trend::Declining);
    assert!(t.overall_change < 0.0);
    assert_eq!(t.message_count, 5);
    assert!(t.interpretation.starts_with("Sentiment is DECLINING overall"));
    assert!(t.turning_points.iter().all(|p| p.change_magnitude > 20.0));
}

#[test]
fn test_empty_conversation() {
    let t = analyze_sentiment_evolution(&[]);
    assert_eq!(t, Trajectory::empty());
    let json = serde_json::to_value(&t).unwrap();
    assert_eq!(json["trend"], "unknown");
    assert_eq!(json["interpretation"], "No data provided");
}

#[test]
fn test_wire_messages_resolve() {
    let raw: Vec<RawMessage> = serde_json::from_str(
        r#"["plain text", {"text": "with stamp", "timestamp": "2025-01-01 09:00"}, {"text": "no stamp"}, null]"#,
    )
    .unwrap();
    let t = analyze_sentiment_evolution(&Message::resolve_all(raw));
    let stamps: Vec<&str> = t.timeline.iter().map(|p| p.timestamp.as_str()).collect();
    assert_eq!(stamps, vec!["Message 1", "2025-01-01 09:00", "Message 3", "Message 4"]);
    // null coerces to empty text, which is neutral
    assert_eq!(t.timeline[3].sentiment_score, 50.0);
}

#[test]
fn test_identical_input_identical_output() {
    let msgs = Message::from_texts(["good start", "then a problem", "fixed, thanks"]);
    let a = serde_json::to_string(&analyze_sentiment_evolution(&msgs)).unwrap();
    let b = serde_json::to_string(&analyze_sentiment_evolution(&msgs)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_lexicon_override() {
    let config = LexiconConfig::from_json_str(
        r#"{"sentiment": {"positive": ["Stellar"], "negative": ["meh"]}}"#,
    )
    .unwrap();
    let scorer = config.scorer();
    assert!(scorer.score("stellar work") > 50.0);
    // default terms no longer count
    assert_eq!(
        scorer.lexicon().count_hits("excellent"),
        (0, 0)
    );
    assert!(LexiconConfig::from_json_str(r#"{"sentiment": {"positive": [" "], "negative": ["x"]}}"#).is_err());
}

fn base_text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(BASE_WORDS), 0..10).prop_map(|w| w.join(" "))
}

fn with_terms(base: &str, terms: &[&str]) -> String {
    let mut words: Vec<&str> = base.split_whitespace().collect();
    words.extend_from_slice(terms);
    words.join(" ")
}

proptest! {
    #[test]
    fn prop_scores_in_bounds(texts in prop::collection::vec("\\PC{0,80}", 1..8)) {
        let t = analyze_sentiment_evolution(&Message::from_texts(texts));
        prop_assert!(t.timeline.iter().all(|p| (0.0..=100.0).contains(&p.sentiment_score)));
        prop_assert!((0.0..=100.0).contains(&t.current_sentiment));
    }

    #[test]
    fn prop_negative_terms_never_raise(
        base in base_text(),
        terms in prop::sample::subsequence(NEGATIVE_TERMS.to_vec(), 0..=NEGATIVE_TERMS.len()),
    ) {
        let scorer = LexiconScorer::new();
        prop_assert!(scorer.score(&with_terms(&base, &terms)) <= scorer.score(&base));
    }

    #[test]
    fn prop_positive_terms_never_lower(
        base in base_text(),
        terms in prop::sample::subsequence(POSITIVE_TERMS.to_vec(), 0..=POSITIVE_TERMS.len()),
    ) {
        let scorer = LexiconScorer::new();
        prop_assert!(scorer.score(&with_terms(&base, &terms)) >= scorer.score(&base));
    }
}
