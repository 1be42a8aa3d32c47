use std::io::{self, Write};
use std::path::Path;

use faq_chat::{AppConfig, EvalSummary, FaqError, MatchOutcome, Message, Result, Sender, Tier};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn parse(format: &str) -> Result<Self> {
        match format {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(FaqError::InvalidArg(format!(
                "Unknown output format: {other}"
            ))),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

fn tier_label(tier: Option<Tier>) -> &'static str {
    match tier {
        Some(Tier::Exact) => "exact",
        Some(Tier::Substring) => "substring",
        Some(Tier::Overlap) => "overlap",
        None => "none",
    }
}

#[derive(Serialize)]
struct JsonMatch<'a> {
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tier: Option<Tier>,
    suggestions: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<&'a str>,
}

pub fn print_match(
    format: Format,
    input: &str,
    outcome: &MatchOutcome,
    fallback_message: &str,
) -> Result<()> {
    let fallback = outcome
        .suggestions
        .is_empty()
        .then_some(fallback_message);

    match format {
        Format::Json => print_json(&JsonMatch {
            input,
            tier: outcome.tier,
            suggestions: &outcome.suggestions,
            fallback,
        }),
        Format::Text => {
            let mut out = io::stdout();
            writeln!(out, "Tier: {}", tier_label(outcome.tier))?;
            if let Some(message) = fallback {
                writeln!(out, "{message}")?;
            }
            for (idx, question) in outcome.suggestions.iter().enumerate() {
                writeln!(out, "  {}. {}", idx + 1, question)?;
            }
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct JsonAnswer<'a> {
    question: &'a str,
    answer: &'a str,
}

pub fn print_answer(format: Format, question: &str, answer: &str) -> Result<()> {
    match format {
        Format::Json => print_json(&JsonAnswer { question, answer }),
        Format::Text => {
            let mut out = io::stdout();
            writeln!(out, "Q: {question}")?;
            writeln!(out, "A: {answer}")?;
            Ok(())
        }
    }
}

#[derive(Serialize)]
pub struct CatalogStats {
    pub source: String,
    pub questions: usize,
    pub keywords: usize,
}

pub fn print_check(format: Format, stats: &CatalogStats) -> Result<()> {
    match format {
        Format::Json => print_json(stats),
        Format::Text => {
            let mut out = io::stdout();
            writeln!(out, "Catalog: {}", stats.source)?;
            writeln!(out, "Questions: {}", stats.questions)?;
            writeln!(out, "Keywords:  {}", stats.keywords)?;
            writeln!(out, "OK")?;
            Ok(())
        }
    }
}

pub fn print_export(format: Format, path: &Path, stats: &CatalogStats) -> Result<()> {
    match format {
        Format::Json => print_json(stats),
        Format::Text => {
            println!(
                "Exported {} questions and {} keywords to {}",
                stats.questions,
                stats.keywords,
                path.display()
            );
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct JsonEval<'a> {
    #[serde(flatten)]
    summary: &'a EvalSummary,
    required_pass_rate: f32,
    meets_threshold: bool,
}

pub fn print_eval(format: Format, summary: &EvalSummary, required_pass_rate: f32) -> Result<()> {
    let meets_threshold = summary.meets(required_pass_rate);
    match format {
        Format::Json => print_json(&JsonEval {
            summary,
            required_pass_rate,
            meets_threshold,
        }),
        Format::Text => {
            let mut out = io::stdout();
            for o in &summary.outcomes {
                writeln!(
                    out,
                    "case={} passed={} tier={} suggestions={} latency={:.3}ms",
                    o.case_id,
                    o.passed,
                    tier_label(o.tier),
                    o.actual.len(),
                    o.latency_ms
                )?;
            }
            writeln!(
                out,
                "total={} passed={} failed={} pass_rate={:.4} required={:.4} meets_threshold={}",
                summary.total,
                summary.passed,
                summary.failed,
                summary.pass_rate,
                required_pass_rate,
                meets_threshold
            )?;
            Ok(())
        }
    }
}

pub fn print_config(config: &AppConfig) -> Result<()> {
    print_json(&config.redacted())
}

pub fn print_message(format: Format, message: &Message) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string(message)?);
        }
        Format::Text => {
            let who = match message.sender {
                Sender::User => "you",
                Sender::Bot => "bot",
            };
            println!("[{}] {}: {}", message.time, who, message.text);
        }
    }
    Ok(())
}

pub fn print_suggestions(format: Format, suggestions: &[String]) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::json!({ "suggestions": suggestions }));
        }
        Format::Text => {
            for (idx, question) in suggestions.iter().enumerate() {
                println!("    {}. {}", idx + 1, question);
            }
        }
    }
    Ok(())
}
