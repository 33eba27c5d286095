//! Domain types for homework review statuses.
//!
//! The API payload is validated in two layers: `validate_response` checks the
//! top-level shape and decodes records with optional fields, and
//! `extract_latest_status` checks field presence on the record that actually
//! matters (the most recent one).

use serde::Deserialize;

use crate::{Error, Result};

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Review outcome for a submitted homework.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Fixed human-readable verdict text (sent to the user as-is).
    pub fn text(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// A single review-status entry as the API sends it.
///
/// Fields are optional here; presence is enforced in `extract_latest_status`
/// so a malformed *older* record does not fail the whole response.
#[derive(Clone, Debug, Deserialize)]
pub struct HomeworkRecord {
    pub homework_name: Option<String>,
    pub status: Option<String>,
}

/// Validated API response: homeworks most-recent-first, plus the
/// server-advised timestamp for the next poll.
#[derive(Clone, Debug)]
pub struct StatusResponse {
    pub homeworks: Vec<HomeworkRecord>,
    pub current_date: Option<i64>,
}

/// The typed result of extracting the most recent status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusUpdate {
    pub name: String,
    pub verdict: Verdict,
}

impl StatusUpdate {
    /// Notification text, matching the wording users already know.
    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.name,
            self.verdict.text()
        )
    }
}

/// Check the top-level response shape and decode it into typed records.
pub fn validate_response(raw: &serde_json::Value) -> Result<StatusResponse> {
    let Some(obj) = raw.as_object() else {
        return Err(Error::Shape("response is not a JSON object".to_string()));
    };

    let Some(homeworks) = obj.get("homeworks") else {
        return Err(Error::Shape("missing `homeworks` key".to_string()));
    };

    if !homeworks.is_array() {
        return Err(Error::Shape("`homeworks` is not an array".to_string()));
    }

    let homeworks: Vec<HomeworkRecord> = serde_json::from_value(homeworks.clone())
        .map_err(|e| Error::Shape(format!("homework entry is not an object: {e}")))?;

    let current_date = obj.get("current_date").and_then(serde_json::Value::as_i64);

    Ok(StatusResponse {
        homeworks,
        current_date,
    })
}

/// Extract the most recent homework status.
///
/// Only the first record is consulted; the API orders homeworks
/// most-recent-first.
pub fn extract_latest_status(records: &[HomeworkRecord]) -> Result<Option<StatusUpdate>> {
    let Some(first) = records.first() else {
        return Ok(None);
    };

    let Some(name) = first.homework_name.as_deref() else {
        return Err(Error::Shape(
            "first homework is missing `homework_name`".to_string(),
        ));
    };
    let Some(status) = first.status.as_deref() else {
        return Err(Error::Shape(
            "first homework is missing `status`".to_string(),
        ));
    };

    let Some(verdict) = Verdict::parse(status) else {
        return Err(Error::UnknownStatus(status.to_string()));
    };

    Ok(Some(StatusUpdate {
        name: name.to_string(),
        verdict,
    }))
}
