use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::keywords::KeywordIndex;
use crate::knowledge::KnowledgeBase;
use crate::model::SuggestionList;

pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
pub const DEFAULT_OVERLAP_THRESHOLD: usize = 2;
pub const DEFAULT_MIN_WORD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Suggestions returned after de-duplication.
    pub max_suggestions: usize,
    /// Overlapping words needed for the word-overlap tier to accept a question.
    pub overlap_threshold: usize,
    /// Shorter words are ignored by the word-overlap tier.
    pub min_word_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            min_word_len: DEFAULT_MIN_WORD_LEN,
        }
    }
}

/// Strategy that produced a non-empty suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Exact,
    Substring,
    Overlap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub tier: Option<Tier>,
    pub suggestions: SuggestionList,
}

impl MatchOutcome {
    fn empty() -> Self {
        Self {
            tier: None,
            suggestions: Vec::new(),
        }
    }
}

/// Insertion-ordered set of candidate questions.
struct Candidates<'a> {
    seen: HashSet<&'a str>,
    ordered: Vec<&'a str>,
}

impl<'a> Candidates<'a> {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            ordered: Vec::new(),
        }
    }

    fn push(&mut self, question: &'a str) {
        if self.seen.insert(question) {
            self.ordered.push(question);
        }
    }

    fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    fn finish(self, tier: Tier, cap: usize) -> MatchOutcome {
        if cap == 0 {
            return MatchOutcome::empty();
        }
        MatchOutcome {
            tier: Some(tier),
            suggestions: self
                .ordered
                .into_iter()
                .take(cap)
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Three-tier FAQ matcher over a knowledge base and its keyword index.
///
/// Tiers run in order (exact keyword, substring, word overlap) and the first
/// one that yields a candidate decides the result. The matcher is total over
/// all string inputs; an empty result means "offer human contact instead".
#[derive(Debug, Clone)]
pub struct Matcher {
    kb: KnowledgeBase,
    keywords: KeywordIndex,
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(kb: KnowledgeBase, keywords: KeywordIndex, config: MatcherConfig) -> Self {
        Self {
            kb,
            keywords,
            config,
        }
    }

    pub fn from_catalog(catalog: Catalog, config: MatcherConfig) -> Result<Self> {
        let (kb, keywords) = catalog.build()?;
        Ok(Self::new(kb, keywords, config))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn keywords(&self) -> &KeywordIndex {
        &self.keywords
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn suggest(&self, input: &str) -> SuggestionList {
        self.match_input(input).suggestions
    }

    pub fn match_input(&self, input: &str) -> MatchOutcome {
        let normalized = input.trim().to_lowercase();
        if normalized.is_empty() {
            return MatchOutcome::empty();
        }

        let cap = self.config.max_suggestions;
        let outcome = [Tier::Exact, Tier::Substring, Tier::Overlap]
            .into_iter()
            .map(|tier| (tier, self.run_tier(tier, input, &normalized)))
            .find(|(_, found)| !found.is_empty())
            .map(|(tier, found)| found.finish(tier, cap))
            .unwrap_or_else(MatchOutcome::empty);

        tracing::debug!(
            tier = ?outcome.tier,
            suggestions = outcome.suggestions.len(),
            "matched input"
        );
        outcome
    }

    fn run_tier(&self, tier: Tier, input: &str, normalized: &str) -> Candidates<'_> {
        match tier {
            Tier::Exact => self.exact_tier(normalized),
            Tier::Substring => self.substring_tier(normalized),
            Tier::Overlap => self.overlap_tier(input),
        }
    }

    fn exact_tier(&self, normalized: &str) -> Candidates<'_> {
        let mut found = Candidates::new();
        for token in normalized.split_whitespace() {
            if let Some(question) = self.keywords.lookup(token) {
                found.push(question);
            }
        }
        found
    }

    fn substring_tier(&self, normalized: &str) -> Candidates<'_> {
        let mut found = Candidates::new();
        for (keyword, question) in self.keywords.iter() {
            if normalized.contains(keyword) || keyword.contains(normalized) {
                found.push(question);
            }
        }
        found
    }

    fn overlap_tier(&self, input: &str) -> Candidates<'_> {
        let mut found = Candidates::new();
        let input_words = words(input, self.config.min_word_len);
        if input_words.is_empty() {
            return found;
        }

        for question in self.kb.questions() {
            let overlap = words(question, self.config.min_word_len)
                .iter()
                .filter(|word| {
                    input_words
                        .iter()
                        .any(|other| other.contains(word.as_str()) || word.contains(other.as_str()))
                })
                .count();
            if overlap >= self.config.overlap_threshold {
                found.push(question);
            }
        }
        found
    }
}

/// Distinct lowercase words with edge punctuation stripped.
fn words(text: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for token in text.split_whitespace() {
        let word = token
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if word.is_empty() || word.chars().count() < min_len {
            continue;
        }
        if seen.insert(word.clone()) {
            out.push(word);
        }
    }
    out
}
