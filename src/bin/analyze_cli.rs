//! One-shot analysis from the command line.
//!
//! Usage: analyze-cli [--correct LABEL] <text...>
//!
//! With `--correct`, the prediction is followed by a correction record sent to
//! the configured feedback sink.

use anyhow::{bail, Result};
use emotion_sentiment_analyzer::feedback::{build_sink, save_feedback, FeedbackRecord};
use emotion_sentiment_analyzer::{AppConfig, InferenceContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut correct: Option<String> = None;
    let mut words: Vec<String> = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--correct" => correct = args.next(),
            "-h" | "--help" => {
                println!("usage: analyze-cli [--correct LABEL] <text...>");
                return Ok(());
            }
            _ => words.push(a),
        }
    }

    let text = words.join(" ");
    if text.trim().is_empty() {
        bail!("Hey! Put some text to analyze");
    }

    let cfg = AppConfig::load()?;
    let ctx = InferenceContext::from_config(&cfg)?;
    let out = ctx.analyze(&text)?;

    println!("Emotion:   {}", out.emotion);
    println!("Sentiment: {}", out.sentiment);
    println!("Emotion probabilities:");
    for (label, p) in out.probabilities.iter() {
        let bar = "#".repeat((p * 40.0).round() as usize);
        println!("  {:<10} {:>6.2}% {}", capitalize_label(label), p * 100.0, bar);
    }

    if let Some(actual) = correct {
        let sink = build_sink(&cfg.feedback)?;
        let record = FeedbackRecord::new(text.as_str(), out.emotion.as_str(), actual.as_str());
        match save_feedback(sink.as_ref(), &record).await {
            Ok(()) => println!("Thanks for the feedback!"),
            // prediction is already printed; a lost correction is not fatal
            Err(e) => eprintln!("warning: {e}"),
        }
    }
    Ok(())
}

fn capitalize_label(label: &str) -> String {
    emotion_sentiment_analyzer::engine::capitalize(label)
}
