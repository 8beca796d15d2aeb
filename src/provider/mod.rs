// src/provider/mod.rs — Completion responder layer

pub mod cache;
pub mod openai;
pub mod retry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::infra::errors::EvolveError;

/// One completion request: a single user-turn prompt plus sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
}

impl ResponseRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            temperature,
        }
    }
}

/// Anything that can turn a prompt into text.
///
/// `Ok(None)` means the service answered but produced no content; callers
/// treat that as an absent candidate rather than a failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Responder: Send + Sync {
    fn id(&self) -> &str;

    async fn respond(&self, request: &ResponseRequest) -> Result<Option<String>, EvolveError>;
}

/// Model and temperature forwarded on every call, bound to a responder.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub model: String,
    pub temperature: f32,
}

impl Sampling {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature,
        }
    }

    pub fn request(&self, prompt: impl Into<String>) -> ResponseRequest {
        ResponseRequest::new(prompt, self.model.clone(), self.temperature)
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Self::new("gpt-3.5-turbo", 0.8)
    }
}
