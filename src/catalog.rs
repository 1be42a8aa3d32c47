use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keywords::KeywordIndex;
use crate::knowledge::KnowledgeBase;
use crate::model::{KeywordEntry, KnowledgeEntry};

const BUILTIN_CATALOG: &str = include_str!("../data/faq.json");

/// Deployment FAQ content: the question/answer table plus the keyword table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub entries: Vec<KnowledgeEntry>,
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
}

impl Catalog {
    /// The marketplace FAQ shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Ok(serde_json::from_str(BUILTIN_CATALOG)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let catalog: Catalog = serde_json::from_reader(BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            entries = catalog.entries.len(),
            keywords = catalog.keywords.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Validate and index. Fails on duplicate or empty content and on keywords
    /// that point at questions missing from `entries`.
    pub fn build(self) -> Result<(KnowledgeBase, KeywordIndex)> {
        let kb = KnowledgeBase::from_entries(self.entries)?;
        let index = KeywordIndex::build(self.keywords, &kb)?;
        Ok((kb, index))
    }
}
