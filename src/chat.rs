//! Site chat session: an ordered transcript of visitor and guide turns.

use crate::context::LanguageContext;
use crate::gateway::{ApiResult, DataGateway};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

pub const APOLOGY: &str = "Sorry, I'm having trouble responding right now. Please try again later.";

/// Words that end an interactive chat loop.
pub const EXIT_WORDS: &[&str] = &["exit", "quit", "bye"];

pub fn is_exit_word(input: &str) -> bool {
    let input = input.trim();
    EXIT_WORDS.iter().any(|word| word.eq_ignore_ascii_case(input))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    site_name: String,
    turns: Vec<ChatTurn>,
    next_id: u64,
}

impl ChatSession {
    /// A session opened with the guide's welcome message.
    pub fn new(site_name: impl Into<String>, welcome_text: impl Into<String>) -> Self {
        let mut session = Self {
            site_name: site_name.into(),
            turns: Vec::new(),
            next_id: 1,
        };
        session.push(Sender::Assistant, welcome_text.into());
        session
    }

    /// Attach the site's image to the welcome turn.
    pub fn with_welcome_image(mut self, image: impl Into<String>) -> Self {
        if let Some(welcome) = self.turns.first_mut() {
            welcome.image = Some(image.into());
        }
        self
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Ask the guide a question and append both turns.
    ///
    /// A failed lookup appends the translated apology instead of an error.
    pub async fn ask(
        &mut self,
        gateway: &DataGateway,
        context: &LanguageContext,
        question: &str,
    ) -> &ChatTurn {
        self.push(Sender::User, question.trim().to_string());

        let reply = match gateway
            .chat(question, &self.site_name, context.language())
            .await
        {
            ApiResult::Success(reply) => reply,
            ApiResult::Failure(error) => {
                warn!("Chat about {} failed: {}", self.site_name, error);
                context.translate(APOLOGY).await
            }
        };

        self.push(Sender::Assistant, reply)
    }

    fn push(&mut self, sender: Sender, text: String) -> &ChatTurn {
        let id = self.next_id;
        self.next_id += 1;
        self.turns.push(ChatTurn {
            id,
            text,
            sender,
            timestamp: Utc::now(),
            image: None,
        });
        &self.turns[self.turns.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::OfflineBackend;
    use crate::i18n::Language;
    use crate::language_store::MemoryLanguageStore;
    use crate::translation::{OfflineTranslator, TranslationGateway};
    use std::sync::Arc;
    use std::time::Duration;

    fn setup(language: Language) -> (DataGateway, Arc<LanguageContext>) {
        let gateway = DataGateway::new(Arc::new(OfflineBackend), Duration::from_secs(1));
        let translator = Arc::new(TranslationGateway::new(
            Arc::new(OfflineTranslator),
            Duration::from_secs(1),
        ));
        let context = LanguageContext::initialize(
            Arc::new(MemoryLanguageStore::with_language(language)),
            translator,
        );
        (gateway, context)
    }

    #[test]
    fn test_new_session_starts_with_welcome() {
        let session = ChatSession::new("Fort St. George", "Welcome!");
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].sender, Sender::Assistant);
        assert_eq!(session.turns()[0].id, 1);
    }

    #[tokio::test]
    async fn test_ask_appends_question_and_reply() {
        let (gateway, context) = setup(Language::ENGLISH);
        let mut session = ChatSession::new("Fort St. George", "Welcome!");

        let reply = session
            .ask(&gateway, &context, "What are the opening hours?")
            .await
            .clone();

        assert_eq!(reply.id, 3);
        assert!(reply.text.contains("9:00 AM"));
        let senders: Vec<_> = session.turns().iter().map(|t| t.sender).collect();
        assert_eq!(senders, vec![Sender::Assistant, Sender::User, Sender::Assistant]);
    }

    #[tokio::test]
    async fn test_failure_appends_translated_apology() {
        let (gateway, context) = setup(Language::TAMIL);
        let mut session = ChatSession::new("Fort St. George", "வணக்கம்");

        let reply = session.ask(&gateway, &context, "   ").await.clone();

        assert_eq!(reply.sender, Sender::Assistant);
        assert_ne!(reply.text, APOLOGY);
        assert!(!reply.text.is_empty());
    }

    #[tokio::test]
    async fn test_english_failure_is_plain_apology() {
        let (gateway, context) = setup(Language::ENGLISH);
        let mut session = ChatSession::new("", "Hi");
        let reply = session.ask(&gateway, &context, "").await;
        assert_eq!(reply.text, APOLOGY);
    }

    #[test]
    fn test_exit_words() {
        assert!(is_exit_word("exit"));
        assert!(is_exit_word(" Bye "));
        assert!(is_exit_word("QUIT"));
        assert!(!is_exit_word("goodbye"));
    }

    #[test]
    fn test_turn_serialization() {
        let session = ChatSession::new("Mahabalipuram", "Welcome!");
        let json = serde_json::to_value(&session.turns()[0]).unwrap();
        assert_eq!(json["sender"], "assistant");
        assert_eq!(json["text"], "Welcome!");
        assert!(json.get("image").is_none());

        let session = session.with_welcome_image("https://example.com/shore-temple.jpg");
        let json = serde_json::to_value(&session.turns()[0]).unwrap();
        assert_eq!(json["image"], "https://example.com/shore-temple.jpg");
    }

    #[tokio::test]
    async fn test_replies_carry_no_image() {
        let (gateway, context) = setup(Language::ENGLISH);
        let mut session = ChatSession::new("Mahabalipuram", "Welcome!").with_welcome_image("shore.jpg");

        let reply = session.ask(&gateway, &context, "What is the price?").await.clone();

        assert!(reply.image.is_none());
        assert!(session.turns().iter().skip(1).all(|turn| turn.image.is_none()));
        assert_eq!(session.turns()[0].image.as_deref(), Some("shore.jpg"));
    }
}
