use std::env;
use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use course_core::model::{Assignment, CourseInfo, Dimension, DimensionCategory, Week};

use crate::error::TutorError;

/// First message of every conversation.
pub const TUTOR_GREETING: &str = "Hello! I'm your course tutor. I can explain concepts from \
the textbook or help clarify the syllabus. I cannot write your essays for you. How can I help?";

/// Reply shown in place of a failed request.
pub const TUTOR_FALLBACK: &str =
    "I'm having trouble connecting to the course database right now. Please try again later.";

/// Reply shown when no API key is configured.
pub const TUTOR_DISABLED: &str =
    "The tutor is not configured. Set COURSE_AI_API_KEY to enable it.";

const AI_POLICY: &str = "AI POLICY:
- Permitted: Brainstorming, outlining, research assistance, explaining concepts.
- PROHIBITED: Generating essay content, answering quiz questions directly, writing the analysis for the student.

Your Goal: Help the student understand these specific variables and guide them in their Country Analysis Project.

If asked to write an essay, refuse and offer to help outline or brainstorm instead.";

//
// ─── CONFIG ────────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug)]
pub struct TutorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl TutorConfig {
    /// `None` when `COURSE_AI_API_KEY` is unset or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("COURSE_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("COURSE_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("COURSE_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Build the system prompt the tutor answers under.
///
/// # Errors
///
/// Returns `TutorError::Context` if the syllabus tables cannot be encoded.
pub fn system_prompt(
    course: &CourseInfo,
    dimensions: &[Dimension],
    assignments: &[Assignment],
    schedule: &[Week],
) -> Result<String, TutorError> {
    let mut prompt = format!(
        "You are a Teaching Assistant for {}: {}.\nInstructor: {}.\nTextbook: {}.\n\n",
        course.code, course.title, course.instructor, course.textbook
    );

    prompt.push_str("KEY THEORETICAL FRAMEWORK:\n");
    for (n, category) in [
        DimensionCategory::ExecutivesParties,
        DimensionCategory::FederalUnitary,
    ]
    .into_iter()
    .enumerate()
    {
        prompt.push_str(&format!("{}. {}\n", n + 1, category.label()));
        for d in dimensions.iter().filter(|d| d.category == category) {
            prompt.push_str(&format!(
                "   - {} ({} vs {})\n",
                d.name, d.westminster, d.consensus
            ));
        }
    }

    prompt.push_str(&format!(
        "\nAssignments:\n{}\n\nSchedule:\n{}\n\n{AI_POLICY}",
        serde_json::to_string(assignments)?,
        serde_json::to_string(schedule)?,
    ));
    Ok(prompt)
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a tutor conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct TutorService {
    client: Client,
    config: Option<TutorConfig>,
    system_prompt: String,
}

impl TutorService {
    #[must_use]
    pub fn new(config: Option<TutorConfig>, system_prompt: String) -> Self {
        Self {
            client: Client::new(),
            config,
            system_prompt,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    #[must_use]
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Send `message` after the prior `history`.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` when the service is disabled, the request fails,
    /// or the response is empty.
    pub async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, TutorError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage {
            role: Role::System,
            content: self.system_prompt.clone(),
        });
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: turn.role,
            content: turn.text.clone(),
        }));
        messages.push(ChatMessage {
            role: Role::User,
            content: message.to_owned(),
        });
        self.complete(messages, 0.7).await
    }

    /// One-shot generation under the course system prompt.
    ///
    /// # Errors
    ///
    /// Returns `TutorError` when the service is disabled, the request fails,
    /// or the response is empty.
    pub async fn generate(&self, prompt: &str) -> Result<String, TutorError> {
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: self.system_prompt.clone(),
            },
            ChatMessage {
                role: Role::User,
                content: prompt.to_owned(),
            },
        ];
        self.complete(messages, 0.2).await
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
    ) -> Result<String, TutorError> {
        let config = self.config.as_ref().ok_or(TutorError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages,
            temperature,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(TutorError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

//
// ─── CONVERSATION ──────────────────────────────────────────────────────────────
//

/// Chat transcript that always produces a reply.
///
/// Remote failures are logged and answered with `TUTOR_FALLBACK`.
pub struct TutorConversation {
    tutor: Arc<TutorService>,
    turns: Vec<ChatTurn>,
}

impl TutorConversation {
    #[must_use]
    pub fn new(tutor: Arc<TutorService>) -> Self {
        Self {
            tutor,
            turns: vec![ChatTurn::assistant(TUTOR_GREETING)],
        }
    }

    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Send a message and append both it and the reply to the transcript.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::BlankMessage` for empty input; the transcript is unchanged.
    pub async fn send(&mut self, message: &str) -> Result<&ChatTurn, TutorError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(TutorError::BlankMessage);
        }

        // The greeting is local and is not sent upstream.
        let history = self.turns.get(1..).unwrap_or_default();
        let reply = match self.tutor.chat(history, message).await {
            Ok(reply) => reply,
            Err(TutorError::Disabled) => TUTOR_DISABLED.to_owned(),
            Err(err) => {
                tracing::warn!(%err, "tutor request failed");
                TUTOR_FALLBACK.to_owned()
            }
        };

        self.turns.push(ChatTurn::user(message));
        self.turns.push(ChatTurn::assistant(reply));
        Ok(&self.turns[self.turns.len() - 1])
    }
}
