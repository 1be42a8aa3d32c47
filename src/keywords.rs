use std::collections::HashMap;

use crate::error::{FaqError, Result};
use crate::knowledge::KnowledgeBase;
use crate::model::KeywordEntry;

/// Case-insensitive map from keyword to a single canonical question.
///
/// Keywords are normalised (trimmed, lowercased) at build time and iterate in
/// table order; the substring tier of the matcher depends on that order.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    entries: Vec<KeywordEntry>,
    by_keyword: HashMap<String, usize>,
}

impl KeywordIndex {
    pub fn build(keywords: Vec<KeywordEntry>, kb: &KnowledgeBase) -> Result<Self> {
        let mut entries = Vec::with_capacity(keywords.len());
        let mut by_keyword = HashMap::with_capacity(keywords.len());

        for raw in keywords {
            let keyword = raw.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                return Err(FaqError::InvalidArg(format!(
                    "empty keyword for question '{}'",
                    raw.question
                )));
            }
            if !kb.contains(&raw.question) {
                return Err(FaqError::DanglingKeyword {
                    keyword,
                    question: raw.question,
                });
            }
            if by_keyword.contains_key(&keyword) {
                return Err(FaqError::DuplicateKeyword(keyword));
            }

            by_keyword.insert(keyword.clone(), entries.len());
            entries.push(KeywordEntry {
                keyword,
                question: raw.question,
            });
        }

        Ok(Self {
            entries,
            by_keyword,
        })
    }

    /// Exact keyword match. `None` is the ordinary no-hint outcome.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        let idx = match self.by_keyword.get(token) {
            Some(idx) => *idx,
            None => *self.by_keyword.get(&token.to_lowercase())?,
        };
        Some(self.entries[idx].question.as_str())
    }

    /// `(keyword, question)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.keyword.as_str(), entry.question.as_str()))
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KnowledgeEntry;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::from_entries(vec![
            KnowledgeEntry {
                question: "Phone?".to_string(),
                answer: "0788".to_string(),
            },
            KnowledgeEntry {
                question: "Email?".to_string(),
                answer: "a@b.rw".to_string(),
            },
        ])
        .expect("kb")
    }

    fn kw(keyword: &str, question: &str) -> KeywordEntry {
        KeywordEntry {
            keyword: keyword.to_string(),
            question: question.to_string(),
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let index = KeywordIndex::build(vec![kw("Phone", "Phone?")], &kb()).expect("index");

        assert_eq!(index.lookup("phone"), Some("Phone?"));
        assert_eq!(index.lookup("PHONE"), Some("Phone?"));
        assert_eq!(index.lookup("phones"), None);
    }

    #[test]
    fn several_keywords_may_share_a_question() {
        let index = KeywordIndex::build(
            vec![kw("mail", "Email?"), kw("email", "Email?"), kw("call", "Phone?")],
            &kb(),
        )
        .expect("index");

        let order: Vec<&str> = index.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["mail", "email", "call"]);
        assert_eq!(index.lookup("mail"), index.lookup("email"));
    }

    #[test]
    fn rejects_dangling_and_duplicate_keywords() {
        let dangling = KeywordIndex::build(vec![kw("fax", "Fax?")], &kb());
        assert!(matches!(
            dangling,
            Err(FaqError::DanglingKeyword { ref keyword, .. }) if keyword == "fax"
        ));

        let dup = KeywordIndex::build(vec![kw("phone", "Phone?"), kw(" PHONE ", "Email?")], &kb());
        assert!(matches!(dup, Err(FaqError::DuplicateKeyword(k)) if k == "phone"));

        let empty = KeywordIndex::build(vec![kw("   ", "Phone?")], &kb());
        assert!(matches!(empty, Err(FaqError::InvalidArg(_))));
    }
}
