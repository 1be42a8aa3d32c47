use serde::{Deserialize, Serialize};

use crate::conversation::{ConversationLog, DEFAULT_TIME_FORMAT, validate_time_format};
use crate::error::{FaqError, Result};
use crate::fallback::FallbackResponder;
use crate::matcher::{Matcher, Tier};
use crate::model::{Message, Sender, SuggestionList};

pub const DEFAULT_FALLBACK_MESSAGE: &str = "Sorry, I couldn't find an answer to that. \
Please call us on +250 796 897 823 or email sales@food.rw and our team will help you.";
pub const DEFAULT_SUGGESTION_PROMPT: &str = "Here are some topics that might help:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Bot reply when nothing matches and no remote fallback answered.
    pub fallback_message: String,
    /// Bot reply that introduces a suggestion list.
    pub suggestion_prompt: String,
    /// Appended when a session starts or resets.
    pub greeting: Option<String>,
    /// Answer directly when the exact tier finds exactly one question.
    pub answer_single_match: bool,
    /// strftime pattern for `Message::time`.
    pub time_format: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            suggestion_prompt: DEFAULT_SUGGESTION_PROMPT.to_string(),
            greeting: None,
            answer_single_match: false,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fallback_message.trim().is_empty() {
            return Err(FaqError::InvalidArg(
                "fallback message must not be empty".to_string(),
            ));
        }
        if self.suggestion_prompt.trim().is_empty() {
            return Err(FaqError::InvalidArg(
                "suggestion prompt must not be empty".to_string(),
            ));
        }
        if matches!(&self.greeting, Some(greeting) if greeting.trim().is_empty()) {
            return Err(FaqError::InvalidArg(
                "greeting must not be empty when set".to_string(),
            ));
        }
        validate_time_format(&self.time_format)
    }
}

/// What the bot did with a submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Prompt appended; the list is now the active suggestions.
    Suggestions(SuggestionList),
    /// Single exact match answered straight away.
    Answer { question: String },
    /// Nothing matched. `generated` is true when the remote responder answered.
    Fallback { generated: bool },
}

/// One user's help chat: matcher, log and the active suggestion list.
pub struct ChatSession<'m> {
    matcher: &'m Matcher,
    config: SessionConfig,
    log: ConversationLog,
    suggestions: SuggestionList,
    fallback: Option<Box<dyn FallbackResponder + 'm>>,
}

impl<'m> ChatSession<'m> {
    pub fn new(matcher: &'m Matcher, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let log = ConversationLog::with_time_format(&config.time_format)?;
        let mut session = Self {
            matcher,
            config,
            log,
            suggestions: Vec::new(),
            fallback: None,
        };
        session.greet()?;
        Ok(session)
    }

    pub fn with_fallback(mut self, responder: impl FallbackResponder + 'm) -> Self {
        self.fallback = Some(Box::new(responder));
        self
    }

    /// Record user text and the bot's reply. Blank input is ignored.
    pub fn submit(&mut self, input: &str) -> Result<Option<Reply>> {
        if input.trim().is_empty() {
            return Ok(None);
        }
        self.log.append(Sender::User, input)?;

        let outcome = self.matcher.match_input(input);
        if outcome.suggestions.is_empty() {
            self.suggestions.clear();
            let (text, generated) = self.fallback_reply(input);
            self.log.append(Sender::Bot, text)?;
            return Ok(Some(Reply::Fallback { generated }));
        }

        if self.config.answer_single_match
            && outcome.tier == Some(Tier::Exact)
            && outcome.suggestions.len() == 1
        {
            let question = outcome.suggestions[0].clone();
            let answer = self.matcher.knowledge().get_answer(&question)?.to_string();
            self.log.append(Sender::Bot, answer)?;
            self.suggestions.clear();
            return Ok(Some(Reply::Answer { question }));
        }

        self.log
            .append(Sender::Bot, self.config.suggestion_prompt.clone())?;
        self.suggestions = outcome.suggestions.clone();
        Ok(Some(Reply::Suggestions(outcome.suggestions)))
    }

    /// Materialise a clicked suggestion as a user/bot message pair.
    ///
    /// Unknown questions (a stale list) leave the session untouched.
    pub fn select(&mut self, question: &str) -> Result<(Message, Message)> {
        let answer = match self.matcher.knowledge().get_answer(question) {
            Ok(answer) => answer.to_string(),
            Err(err) => {
                tracing::warn!(question, "ignoring selection of unknown question");
                return Err(err);
            }
        };

        let asked = self.log.append(Sender::User, question)?.clone();
        let answered = self.log.append(Sender::Bot, answer)?.clone();
        self.suggestions.clear();
        Ok((asked, answered))
    }

    /// 1-based lookup into the active suggestions.
    pub fn suggestion(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.suggestions.get(idx))
            .map(String::as_str)
    }

    pub fn reset(&mut self) -> Result<()> {
        tracing::info!(messages = self.log.len(), "resetting chat session");
        self.log.clear();
        self.suggestions.clear();
        self.greet()
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut ConversationLog {
        &mut self.log
    }

    pub fn matcher(&self) -> &Matcher {
        self.matcher
    }

    fn greet(&mut self) -> Result<()> {
        if let Some(greeting) = self.config.greeting.clone() {
            self.log.append(Sender::Bot, greeting)?;
        }
        Ok(())
    }

    fn fallback_reply(&self, input: &str) -> (String, bool) {
        if let Some(responder) = &self.fallback {
            match responder.respond(input) {
                Ok(reply) if !reply.trim().is_empty() => return (reply, true),
                Ok(_) => tracing::warn!("fallback responder returned an empty reply"),
                Err(err) => tracing::warn!(error = %err, "fallback responder failed"),
            }
        }
        (self.config.fallback_message.clone(), false)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::catalog::Catalog;
    use crate::matcher::MatcherConfig;

    const EMAIL: &str = "What is your email address?";
    const PHONE: &str = "What is your phone number?";

    fn matcher() -> Matcher {
        Matcher::from_catalog(Catalog::builtin().expect("catalog"), MatcherConfig::default())
            .expect("matcher")
    }

    fn texts(session: &ChatSession<'_>) -> Vec<(Sender, String)> {
        session
            .log()
            .render()
            .iter()
            .map(|m| (m.sender, m.text.clone()))
            .collect()
    }

    #[test]
    fn suggestions_then_selection_appends_a_pair() {
        let matcher = matcher();
        let mut session = ChatSession::new(&matcher, SessionConfig::default()).expect("session");

        let reply = session.submit("email").expect("submit");
        assert_eq!(reply, Some(Reply::Suggestions(vec![EMAIL.to_string()])));
        assert_eq!(session.suggestions(), [EMAIL.to_string()]);
        assert_eq!(session.log().len(), 2);
        assert_eq!(
            session.log().last().map(|m| m.text.as_str()),
            Some(DEFAULT_SUGGESTION_PROMPT)
        );

        let before = session.log().len();
        let (asked, answered) = session.select(EMAIL).expect("select");
        assert_eq!(session.log().len(), before + 2);
        assert_eq!(asked.sender, Sender::User);
        assert_eq!(asked.text, EMAIL);
        assert_eq!(answered.sender, Sender::Bot);
        assert_eq!(
            answered.text,
            matcher.knowledge().get_answer(EMAIL).expect("answer")
        );
        assert!(answered.id > asked.id);
        assert!(session.suggestions().is_empty());
    }

    #[test]
    fn no_match_falls_back_to_contact_details() {
        let matcher = matcher();
        let mut session = ChatSession::new(&matcher, SessionConfig::default()).expect("session");

        let reply = session.submit("asdkjasd").expect("submit");
        assert_eq!(reply, Some(Reply::Fallback { generated: false }));

        let log = texts(&session);
        assert_eq!(log[0], (Sender::User, "asdkjasd".to_string()));
        assert_eq!(log[1].0, Sender::Bot);
        assert!(log[1].1.contains("+250 796 897 823"));
        assert!(log[1].1.contains("sales@food.rw"));
    }

    #[test]
    fn blank_input_appends_nothing() {
        let matcher = matcher();
        let mut session = ChatSession::new(&matcher, SessionConfig::default()).expect("session");

        assert_eq!(session.submit("   ").expect("submit"), None);
        assert!(session.log().is_empty());
    }

    #[test]
    fn stale_selection_is_rejected_without_side_effects() {
        let matcher = matcher();
        let mut session = ChatSession::new(&matcher, SessionConfig::default()).expect("session");
        session.submit("phone").expect("submit");

        let err = session.select("Do you sell tractors?").unwrap_err();
        assert!(matches!(err, FaqError::NotFound(_)));
        assert_eq!(session.log().len(), 2);
        assert_eq!(session.suggestions(), [PHONE.to_string()]);
    }

    #[test]
    fn fallback_responder_answers_unmatched_input() {
        let matcher = matcher();
        let calls = Cell::new(0);
        let mut session = ChatSession::new(&matcher, SessionConfig::default())
            .expect("session")
            .with_fallback(|input: &str| -> Result<String> {
                calls.set(calls.get() + 1);
                Ok(format!("generated: {input}"))
            });

        session.submit("phone").expect("submit");
        assert_eq!(calls.get(), 0);

        let reply = session.submit("zzzz qqq").expect("submit");
        assert_eq!(reply, Some(Reply::Fallback { generated: true }));
        assert_eq!(calls.get(), 1);
        assert_eq!(
            session.log().last().map(|m| m.text.as_str()),
            Some("generated: zzzz qqq")
        );
    }

    #[test]
    fn failing_responder_degrades_to_fixed_message() {
        let matcher = matcher();
        let mut session = ChatSession::new(&matcher, SessionConfig::default())
            .expect("session")
            .with_fallback(|_: &str| -> Result<String> {
                Err(FaqError::Fallback("offline".to_string()))
            });

        let reply = session.submit("zzzz qqq").expect("submit");
        assert_eq!(reply, Some(Reply::Fallback { generated: false }));
        assert_eq!(
            session.log().last().map(|m| m.text.as_str()),
            Some(DEFAULT_FALLBACK_MESSAGE)
        );
    }

    #[test]
    fn single_exact_match_can_be_answered_directly() {
        let matcher = matcher();
        let config = SessionConfig {
            answer_single_match: true,
            ..SessionConfig::default()
        };
        let mut session = ChatSession::new(&matcher, config).expect("session");

        let reply = session.submit("What is your phone number?").expect("submit");
        assert_eq!(
            reply,
            Some(Reply::Answer {
                question: PHONE.to_string()
            })
        );
        assert_eq!(
            session.log().last().map(|m| m.text.as_str()),
            matcher.knowledge().get_answer(PHONE).ok()
        );

        // Two exact hits still go through suggestions.
        let reply = session.submit("I want to track my order").expect("submit");
        assert!(matches!(reply, Some(Reply::Suggestions(ref list)) if list.len() == 2));
    }

    #[test]
    fn reset_clears_log_and_greets_again() {
        let matcher = matcher();
        let config = SessionConfig {
            greeting: Some("Hello! How can I help you today?".to_string()),
            ..SessionConfig::default()
        };
        let mut session = ChatSession::new(&matcher, config).expect("session");
        assert_eq!(session.log().len(), 1);

        session.submit("wallet").expect("submit");
        assert_eq!(session.suggestion(1), Some("How do I top up my wallet?"));
        assert_eq!(session.suggestion(0), None);
        assert_eq!(session.suggestion(2), None);

        session.reset().expect("reset");
        assert_eq!(session.log().len(), 1);
        assert_eq!(session.log().render()[0].id, 1);
        assert!(session.suggestions().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let matcher = matcher();
        let config = SessionConfig {
            fallback_message: " ".to_string(),
            ..SessionConfig::default()
        };
        assert!(ChatSession::new(&matcher, config).is_err());
    }
}
