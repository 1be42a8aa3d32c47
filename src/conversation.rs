use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};

use crate::error::{FaqError, Result};
use crate::model::{Message, Sender};

pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Change notification delivered to log subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEvent<'a> {
    Appended(&'a Message),
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&LogEvent<'_>)>;

/// Append-only, chronological record of one chat session.
pub struct ConversationLog {
    messages: Vec<Message>,
    next_id: u64,
    time_format: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn with_time_format(format: &str) -> Result<Self> {
        validate_time_format(format)?;
        Ok(Self {
            time_format: format.to_string(),
            ..Self::new()
        })
    }

    /// Stamp and append a message, then notify subscribers.
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> Result<&Message> {
        self.append_at(sender, text.into(), Utc::now())
    }

    fn append_at(&mut self, sender: Sender, text: String, now: DateTime<Utc>) -> Result<&Message> {
        if text.trim().is_empty() {
            return Err(FaqError::InvalidArg(
                "message text must not be empty".to_string(),
            ));
        }

        let mut created_at = now;
        if let Some(last) = self.messages.last() {
            // Wall clock may step backwards; keep the log ordered.
            created_at = created_at.max(last.created_at);
        }
        let time = created_at
            .with_timezone(&Local)
            .format(&self.time_format)
            .to_string();

        self.messages.push(Message {
            id: self.next_id,
            text,
            sender,
            time,
            created_at,
        });
        self.next_id += 1;

        let appended = &self.messages[self.messages.len() - 1];
        for (_, listener) in self.listeners.iter_mut() {
            listener(&LogEvent::Appended(appended));
        }
        Ok(appended)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.next_id = 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&LogEvent::Cleared);
        }
    }

    /// Snapshot in insertion order.
    pub fn render(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&LogEvent<'_>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }
}

/// Reject strftime patterns chrono cannot render.
pub fn validate_time_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(FaqError::InvalidArg(format!(
            "invalid time format: {format}"
        )));
    }
    Ok(())
}
