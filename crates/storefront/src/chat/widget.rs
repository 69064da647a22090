//! Floating chat panel present on every page.

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::{ChatMessage, Responder};
use crate::config::ChatTimings;
use crate::deferred::{CancelToken, Cancelled, delay};
use crate::document::{Document, Region};
use crate::page::Page;
use crate::render::{RenderError, render_chat};
use crate::storage::{Storage, keys};

/// Greeting posted when the panel opens itself on the products page.
pub const PRODUCT_PAGE_GREETING: &str =
    "I see you're browsing our products! Need help choosing the right supplements?";

/// Errors that can occur while the chat widget is working.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Chat panel state: visibility and transcript.
///
/// `session` holds the once-per-session auto-open flag.
pub struct ChatWidget<S: Storage> {
    responder: Responder,
    session: S,
    timings: ChatTimings,
    open: bool,
    messages: Vec<ChatMessage>,
}

impl<S: Storage> ChatWidget<S> {
    /// A closed panel with an empty transcript.
    pub const fn new(responder: Responder, session: S, timings: ChatTimings) -> Self {
        Self {
            responder,
            session,
            timings,
            open: false,
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub const fn responder(&self) -> &Responder {
        &self.responder
    }

    pub const fn session(&self) -> &S {
        &self.session
    }

    /// Flip panel visibility.
    pub fn toggle(&mut self, document: &mut dyn Document) {
        self.set_open(document, !self.open);
    }

    pub fn open(&mut self, document: &mut dyn Document) {
        self.set_open(document, true);
    }

    pub fn close(&mut self, document: &mut dyn Document) {
        self.set_open(document, false);
    }

    fn set_open(&mut self, document: &mut dyn Document, open: bool) {
        self.open = open;
        document.set_visible(Region::ChatPanel, open);
        debug!(open, "Chat panel visibility changed");
    }

    /// Post a visitor message and, after the reply delay, the bot's answer.
    ///
    /// Blank input is ignored and returns `Ok(None)`. The visitor's message
    /// is shown immediately; if `token` is cancelled during the delay it
    /// stays in the transcript without a reply.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Cancelled` if the reply delay was cancelled, or
    /// `ChatError::Render` if the transcript failed to render.
    #[instrument(skip_all, fields(len = text.len()))]
    pub async fn send_message(
        &mut self,
        document: &mut dyn Document,
        text: &str,
        token: &CancelToken,
    ) -> Result<Option<String>, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        self.messages.push(ChatMessage::user(text));
        render_chat(document, &self.messages)?;

        delay(self.timings.reply_delay, token).await?;

        let reply = self.responder.respond(text).to_owned();
        self.messages.push(ChatMessage::bot(reply.clone()));
        render_chat(document, &self.messages)?;

        Ok(Some(reply))
    }

    /// Open the panel with a greeting on the products page, once per session.
    ///
    /// Returns whether the panel was opened. Nothing happens on other pages
    /// or when the session flag is already set once the delay has elapsed.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Cancelled` if either delay was cancelled, or
    /// `ChatError::Render` if the transcript failed to render.
    pub async fn auto_open(
        &mut self,
        document: &mut dyn Document,
        page: Page,
        token: &CancelToken,
    ) -> Result<bool, ChatError> {
        if page != Page::Products {
            return Ok(false);
        }

        delay(self.timings.auto_open_delay, token).await?;

        if self.already_opened() {
            debug!("Chat already auto-opened this session");
            return Ok(false);
        }

        self.open(document);
        if let Err(e) = self.session.set_item(keys::CHAT_OPENED, "true") {
            warn!(error = %e, "Failed to record chat auto-open");
        }

        delay(self.timings.greeting_delay, token).await?;

        self.messages.push(ChatMessage::bot(PRODUCT_PAGE_GREETING));
        render_chat(document, &self.messages)?;
        info!("Chat auto-opened on products page");

        Ok(true)
    }

    fn already_opened(&self) -> bool {
        match self.session.get_item(keys::CHAT_OPENED) {
            Ok(flag) => flag.is_some(),
            Err(e) => {
                warn!(error = %e, "Failed to read chat auto-open flag");
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;
    use vitabot_core::ChatSender;

    use super::*;
    use crate::chat::ResponseTable;
    use crate::document::MemoryDocument;
    use crate::storage::MemoryStorage;

    fn widget() -> ChatWidget<MemoryStorage> {
        ChatWidget::new(
            Responder::new(ResponseTable::vitabot()),
            MemoryStorage::new(),
            ChatTimings::default(),
        )
    }

    #[test]
    fn test_toggle_and_close() {
        let mut document = MemoryDocument::for_page(Page::Home);
        let mut chat = widget();
        assert_eq!(document.is_visible(Region::ChatPanel), Some(false));

        chat.toggle(&mut document);
        assert!(chat.is_open());
        assert_eq!(document.is_visible(Region::ChatPanel), Some(true));

        chat.toggle(&mut document);
        assert!(!chat.is_open());

        chat.open(&mut document);
        chat.close(&mut document);
        assert_eq!(document.is_visible(Region::ChatPanel), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_message_replies_after_delay() {
        let mut document = MemoryDocument::for_page(Page::Home);
        let mut chat = widget();
        let start = Instant::now();

        let reply = chat
            .send_message(&mut document, "  Hello  ", &CancelToken::new())
            .await
            .unwrap();

        let greeting =
            "Hello! I'm VitaBot, your AI health supplement assistant. How can I help you today?";
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(reply.as_deref(), Some(greeting));
        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[0], ChatMessage::user("Hello"));
        assert_eq!(chat.messages()[1].sender, ChatSender::Bot);

        let html = document.content(Region::ChatMessages).unwrap();
        assert!(html.contains("user-message"));
        assert!(html.contains("bot-message"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_message_is_ignored() {
        let mut document = MemoryDocument::for_page(Page::Home);
        let mut chat = widget();

        let reply = chat
            .send_message(&mut document, "   ", &CancelToken::new())
            .await
            .unwrap();

        assert!(reply.is_none());
        assert!(chat.messages().is_empty());
        assert_eq!(document.content(Region::ChatMessages), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_reply_keeps_user_message() {
        let mut document = MemoryDocument::for_page(Page::Home);
        let mut chat = widget();
        let token = CancelToken::new();
        token.cancel();

        let err = chat
            .send_message(&mut document, "shipping?", &token)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Cancelled(_)));
        assert_eq!(chat.messages(), [ChatMessage::user("shipping?")]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_open_on_products_page_once() {
        let mut document = MemoryDocument::for_page(Page::Products);
        let mut chat = widget();
        let start = Instant::now();

        let opened = chat
            .auto_open(&mut document, Page::Products, &CancelToken::new())
            .await
            .unwrap();

        assert!(opened);
        assert!(start.elapsed() >= Duration::from_millis(10_500));
        assert!(chat.is_open());
        assert_eq!(chat.messages(), [ChatMessage::bot(PRODUCT_PAGE_GREETING)]);
        assert_eq!(
            chat.session()
                .get_item(keys::CHAT_OPENED)
                .unwrap()
                .as_deref(),
            Some("true")
        );

        chat.close(&mut document);
        let again = chat
            .auto_open(&mut document, Page::Products, &CancelToken::new())
            .await
            .unwrap();
        assert!(!again);
        assert!(!chat.is_open());
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_open_ignores_other_pages() {
        let mut document = MemoryDocument::for_page(Page::Cart);
        let mut chat = widget();
        let start = Instant::now();

        let opened = chat
            .auto_open(&mut document, Page::Cart, &CancelToken::new())
            .await
            .unwrap();

        assert!(!opened);
        assert!(start.elapsed() < Duration::from_millis(1));
        assert_eq!(document.is_visible(Region::ChatPanel), Some(false));
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_open_cancelled_before_opening() {
        let mut document = MemoryDocument::for_page(Page::Products);
        let mut chat = widget();
        let token = CancelToken::new();
        token.cancel();

        let err = chat
            .auto_open(&mut document, Page::Products, &token)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Cancelled(_)));
        assert!(!chat.is_open());
        assert!(
            chat.session()
                .get_item(keys::CHAT_OPENED)
                .unwrap()
                .is_none()
        );
    }
}
