//! The VitaBot chat widget and its canned-reply responder.

pub mod responder;
pub mod widget;

use serde::{Deserialize, Serialize};
use vitabot_core::ChatSender;

pub use responder::{MatchKind, ResponseTable, ResponseTableError, Responder, Synonym};
pub use widget::{ChatError, ChatWidget, PRODUCT_PAGE_GREETING};

/// One line of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub text: String,
}

impl ChatMessage {
    /// A message typed by the visitor.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: ChatSender::User,
            text: text.into(),
        }
    }

    /// A reply from the bot.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: ChatSender::Bot,
            text: text.into(),
        }
    }
}
