pub mod catalog;
pub mod config;
pub mod conversation;
pub mod error;
pub mod eval;
pub mod fallback;
pub mod keywords;
pub mod knowledge;
pub mod matcher;
pub mod model;
pub mod session;

pub use catalog::Catalog;
pub use config::AppConfig;
pub use conversation::{ConversationLog, LogEvent, SubscriptionId};
pub use error::{FaqError, Result};
pub use eval::{EvalCase, EvalOutcome, EvalSummary, evaluate_cases, load_cases};
pub use fallback::{FallbackConfig, FallbackResponder, HttpResponder};
pub use keywords::KeywordIndex;
pub use knowledge::KnowledgeBase;
pub use matcher::{MatchOutcome, Matcher, MatcherConfig, Tier};
pub use model::{KeywordEntry, KnowledgeEntry, Message, Sender, SuggestionList};
pub use session::{ChatSession, Reply, SessionConfig};
