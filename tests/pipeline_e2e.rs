// tests/pipeline_e2e.rs
// End-to-end runs through the demo artifacts: normalize → tokenize →
// vectorize → classify → label + sentiment.

mod common;

use emotion_sentiment_analyzer::normalize::normalize;
use emotion_sentiment_analyzer::Sentiment;

#[test]
fn not_happy_becomes_sad() {
    let ctx = common::demo_ctx();
    assert_eq!(normalize("I am not happy"), "i am not happy");
    assert_eq!(ctx.preprocess("I am not happy"), "unhappy");

    let p = ctx.predict_emotion("I am not happy").unwrap();
    assert_eq!(p.emotion, "Sad");
    assert_eq!(p.sentiment, Sentiment::Negative);
    assert_eq!(p.probabilities.len(), ctx.labels().len());
    let sum: f32 = p.probabilities.iter().sum();
    assert!((sum - 1.0).abs() < 1e-4);
}

#[test]
fn negated_stop_word_keeps_marker() {
    let ctx = common::demo_ctx();
    assert_eq!(ctx.preprocess("not the best movie"), "neg_the best movie");
    assert_eq!(ctx.preprocess("never"), "");
    // "full" is the antonym of "empty" but is itself a stop-word
    assert_eq!(ctx.preprocess("not empty"), "neg_empty");
}

#[test]
fn emoji_and_punctuation() {
    let ctx = common::demo_ctx();
    let a = ctx.analyze("Soooo scared!!! 😱 2024").unwrap();
    assert_eq!(a.emotion, "Fear");
    assert_eq!(a.sentiment, Sentiment::Negative);
}

#[test]
fn love_and_surprise_sentiments() {
    let ctx = common::demo_ctx();
    let love = ctx.analyze("I adore my caring family").unwrap();
    assert_eq!((love.emotion.as_str(), love.sentiment), ("Love", Sentiment::Positive));
    let surprise = ctx.analyze("totally shocked and amazed").unwrap();
    assert_eq!((surprise.emotion.as_str(), surprise.sentiment), ("Surprise", Sentiment::Neutral));
}

#[test]
fn unknown_words_fall_back_to_first_label() {
    // zero features → uniform softmax → lowest index wins the tie
    let p = common::demo_ctx().predict_emotion("qwerty zxcv").unwrap();
    assert_eq!(p.emotion, "Anger");
}

#[test]
fn analysis_is_deterministic() {
    let ctx = common::demo_ctx();
    let a = ctx.analyze("not good at all, very bad").unwrap();
    let b = ctx.analyze("not good at all, very bad").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.emotion, "Sad");
}

#[test]
fn probabilities_follow_label_order() {
    let ctx = common::demo_ctx();
    let a = ctx.analyze("furious").unwrap();
    let labels: Vec<&str> = a.probabilities.iter().map(|(l, _)| l).collect();
    let table: Vec<&str> = ctx.labels().iter().collect();
    assert_eq!(labels, table);
    assert!(a.probabilities.get("anger").unwrap() > 0.5);
}
