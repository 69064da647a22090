//! Chat commands.

#![allow(clippy::print_stdout)]

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use vitabot_storefront::chat::ChatWidget;
use vitabot_storefront::config::StorefrontConfig;
use vitabot_storefront::deferred::CancelToken;
use vitabot_storefront::document::MemoryDocument;
use vitabot_storefront::page::Page;
use vitabot_storefront::storage::MemoryStorage;

use crate::error::CliError;

fn widget(config: &StorefrontConfig) -> Result<ChatWidget<MemoryStorage>, CliError> {
    Ok(ChatWidget::new(
        config.responder()?,
        MemoryStorage::new(),
        config.chat,
    ))
}

/// Send a single message and print the reply.
pub async fn ask(config: &StorefrontConfig, message: &str) -> Result<(), CliError> {
    let mut chat = widget(config)?;
    let mut document = MemoryDocument::for_page(Page::Home);
    chat.open(&mut document);

    if let Some(reply) = chat
        .send_message(&mut document, message, &CancelToken::new())
        .await?
    {
        println!("VitaBot: {reply}");
    }
    Ok(())
}

/// Read messages from stdin until end of input.
///
/// Ctrl-C while VitaBot is thinking drops that reply.
pub async fn session(config: &StorefrontConfig) -> Result<(), CliError> {
    let mut chat = widget(config)?;
    let mut document = MemoryDocument::for_page(Page::Home);
    chat.open(&mut document);
    println!("VitaBot: Hello! Ask me about our supplements, shipping or returns.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let token = CancelToken::new();
        let reply = tokio::select! {
            reply = chat.send_message(&mut document, &line, &token) => reply,
            _ = signal::ctrl_c() => continue,
        };
        if let Some(reply) = reply? {
            println!("VitaBot: {reply}");
        }
    }

    chat.close(&mut document);
    Ok(())
}
