use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One canonical FAQ topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub question: String,
    pub answer: String,
}

/// Fast-path hint from a lowercase token (or short phrase) to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub question: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    /// Display timestamp, formatted once when the message is appended.
    pub time: String,
    pub created_at: DateTime<Utc>,
}

/// Ordered, de-duplicated canonical questions, most relevant first.
pub type SuggestionList = Vec<String>;
