use std::collections::HashMap;

use crate::error::{FaqError, Result};
use crate::model::KnowledgeEntry;

/// Read-only lookup from canonical question to canonical answer.
///
/// Built once from a validated catalog. Iteration follows load order.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    by_question: HashMap<String, usize>,
}

impl KnowledgeBase {
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut by_question = HashMap::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            if entry.question.trim().is_empty() {
                return Err(FaqError::InvalidArg(
                    "catalog contains an empty question".to_string(),
                ));
            }
            if entry.answer.trim().is_empty() {
                return Err(FaqError::EmptyAnswer(entry.question.clone()));
            }
            if by_question.insert(entry.question.clone(), idx).is_some() {
                return Err(FaqError::DuplicateQuestion(entry.question.clone()));
            }
        }

        Ok(Self {
            entries,
            by_question,
        })
    }

    pub fn get_answer(&self, question: &str) -> Result<&str> {
        self.by_question
            .get(question)
            .map(|&idx| self.entries[idx].answer.as_str())
            .ok_or_else(|| FaqError::NotFound(question.to_string()))
    }

    pub fn contains(&self, question: &str) -> bool {
        self.by_question.contains_key(question)
    }

    /// Every canonical question in load order. Call again to restart.
    pub fn questions(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.question.as_str())
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
