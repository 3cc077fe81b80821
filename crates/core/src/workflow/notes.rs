//! Append-only notes audit trail.
//!
//! The engine stores notes as a JSON array of
//! `{type, message, date, user, tags?}` objects with naive ISO dates. Parsing
//! is strict on `type` and lenient on the date format.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// What a note records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoteKind {
    /// Message written when the request was made.
    Request,
    /// Reviewer comment.
    Review,
    /// Payment record.
    Payment,
    /// Reason for a cancellation or rollback.
    Cancellation,
}

/// One audit-trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: NoteKind,
    /// Free text.
    #[serde(default)]
    pub message: String,
    /// When the entry was written.
    #[serde(serialize_with = "write_date", deserialize_with = "read_date")]
    pub date: NaiveDateTime,
    /// Who wrote it.
    #[serde(alias = "user_id")]
    pub user: String,
    /// Review tags, for trades.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Note {
    /// Creates a note dated now.
    #[must_use]
    pub fn new(kind: NoteKind, message: impl Into<String>, user: impl ToString) -> Self {
        Self::at(kind, message, user, Utc::now())
    }

    /// Creates a note with an explicit timestamp.
    #[must_use]
    pub fn at(
        kind: NoteKind,
        message: impl Into<String>,
        user: impl ToString,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            date: at.naive_utc(),
            user: user.to_string(),
            tags: Vec::new(),
        }
    }

    /// Attaches review tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

fn write_date<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}

fn read_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid note date: {raw}")))
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDateTime::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|date| date.with_timezone(&Utc).naive_utc())
}

/// Errors raised while reading a stored trail.
#[derive(Debug, Error)]
pub enum NoteError {
    /// The stored value is not a valid notes array.
    #[error("Invalid notes: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Ordered, append-only list of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteTrail(Vec<Note>);

impl NoteTrail {
    /// Parses a stored trail. An empty or blank string is an empty trail.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Malformed`] when the JSON does not describe notes.
    pub fn parse(raw: &str) -> Result<Self, NoteError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    /// Appends an entry.
    pub fn append(&mut self, note: Note) {
        self.0.push(note);
    }

    /// Entries oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Note] {
        &self.0
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message of the first REQUEST note, or an empty string.
    #[must_use]
    pub fn request_message(&self) -> &str {
        self.0
            .iter()
            .find(|note| note.kind == NoteKind::Request)
            .map_or("", |note| note.message.as_str())
    }

    /// Latest entry of a kind.
    #[must_use]
    pub fn latest(&self, kind: NoteKind) -> Option<&Note> {
        self.0.iter().rev().find(|note| note.kind == kind)
    }

    /// Serializes the trail back to its stored form.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, NoteError> {
        Ok(serde_json::to_string(&self.0)?)
    }
}
