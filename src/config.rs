use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::{FaqError, Result};
use crate::fallback::FallbackConfig;
use crate::matcher::{Matcher, MatcherConfig};
use crate::session::SessionConfig;

/// Everything the engine needs, handed in explicitly at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Marketplace backend, for front-ends that call it. The engine never does.
    pub api_base_url: Option<String>,
    /// Catalog JSON; the built-in catalog when unset.
    pub catalog: Option<PathBuf>,
    pub matcher: MatcherConfig,
    pub session: SessionConfig,
    pub fallback: FallbackConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: AppConfig = serde_json::from_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matcher.max_suggestions == 0 {
            return Err(FaqError::InvalidArg(
                "max_suggestions must be > 0".to_string(),
            ));
        }
        if self.matcher.overlap_threshold == 0 {
            return Err(FaqError::InvalidArg(
                "overlap_threshold must be > 0".to_string(),
            ));
        }
        self.session.validate()?;
        self.fallback.timeout()?;
        Ok(())
    }

    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            Some(path) => Catalog::load(path),
            None => Catalog::builtin(),
        }
    }

    pub fn matcher(&self) -> Result<Matcher> {
        Matcher::from_catalog(self.load_catalog()?, self.matcher)
    }

    /// Copy safe to print: the fallback API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.fallback.api_key.is_some() {
            copy.fallback.api_key = Some("***".to_string());
        }
        copy
    }
}
