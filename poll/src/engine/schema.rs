//! Schema Validation Module
//!
//! This module checks the shape and bounds of every incoming command payload
//! before the command processor runs. Validation never reads or writes the
//! store; a command that fails here is rejected without touching state.

use crate::config;
use crate::engine::error::PollError;
use serde_json::Value;

/// Typed `createPoll` payload after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatePoll {
    pub question: String,
    pub options: Vec<String>,
    /// Seconds until expiry, 0 = never.
    pub expires: u64,
}

/// Typed `castVote` payload after validation.
///
/// `option` stays a raw number here; integer-ness and range are business
/// rules of the command processor, checked against the target poll.
#[derive(Debug, Clone, PartialEq)]
pub struct CastVote {
    pub poll_id: String,
    pub option: f64,
}

/// Typed `readPollResults` payload after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResults {
    pub poll_id: String,
}

/// Bounds-checks raw command payloads.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    limits: config::SchemaLimits,
}

impl SchemaValidator {
    pub fn new(limits: config::SchemaLimits) -> Self {
        Self { limits }
    }

    pub fn create_poll(&self, payload: &Value) -> Result<CreatePoll, PollError> {
        let question = require_str(payload, "question")?;
        if question.is_empty() || question.chars().count() > self.limits.question_max {
            return Err(PollError::Validation(format!(
                "question must be 1-{} characters",
                self.limits.question_max
            )));
        }

        let raw_options = payload
            .get("options")
            .and_then(Value::as_array)
            .ok_or_else(|| PollError::Validation("options must be an array".to_string()))?;
        if raw_options.len() < self.limits.options_min
            || raw_options.len() > self.limits.options_max
        {
            return Err(PollError::Validation(format!(
                "options must have {}-{} entries",
                self.limits.options_min, self.limits.options_max
            )));
        }

        let mut options = Vec::with_capacity(raw_options.len());
        for raw in raw_options {
            let option = raw
                .as_str()
                .ok_or_else(|| PollError::Validation("options must be strings".to_string()))?;
            if option.trim().is_empty() || option.chars().count() > self.limits.option_max {
                return Err(PollError::Validation(format!(
                    "each option must be 1-{} characters and not blank",
                    self.limits.option_max
                )));
            }
            options.push(option.to_string());
        }

        let expires = match payload.get("expires") {
            None | Some(Value::Null) => 0,
            Some(v) => v.as_u64().ok_or_else(|| {
                PollError::Validation("expires must be a non-negative number".to_string())
            })?,
        };

        Ok(CreatePoll {
            question: question.to_string(),
            options,
            expires,
        })
    }

    pub fn cast_vote(&self, payload: &Value) -> Result<CastVote, PollError> {
        let poll_id = self.poll_id(payload)?;
        let option = payload
            .get("option")
            .and_then(Value::as_f64)
            .ok_or_else(|| PollError::InvalidOption("option must be a number".to_string()))?;
        Ok(CastVote { poll_id, option })
    }

    pub fn read_results(&self, payload: &Value) -> Result<ReadResults, PollError> {
        Ok(ReadResults {
            poll_id: self.poll_id(payload)?,
        })
    }

    pub fn identity(&self, identity: &str) -> Result<(), PollError> {
        if identity.is_empty() {
            return Err(PollError::Validation("identity must not be empty".to_string()));
        }
        Ok(())
    }

    fn poll_id(&self, payload: &Value) -> Result<String, PollError> {
        let poll_id = require_str(payload, "poll_id")?;
        if poll_id.is_empty() || poll_id.chars().count() > self.limits.poll_id_max {
            return Err(PollError::Validation(format!(
                "poll_id must be 1-{} characters",
                self.limits.poll_id_max
            )));
        }
        Ok(poll_id.to_string())
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(config::instance().lock().unwrap().limits.clone())
    }
}

fn require_str<'a>(payload: &'a Value, field: &str) -> Result<&'a str, PollError> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| PollError::Validation(format!("{} must be a string", field)))
}
