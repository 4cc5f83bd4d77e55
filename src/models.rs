use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

pub const MESSAGE_MIN_LEN: usize = 5;
pub const MESSAGE_MAX_LEN: usize = 140;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
/// The model of the `thoughts` table, and the document every endpoint returns.
pub struct Thought {
    pub id: Uuid,
    pub message: String,
    pub hearts: i32,
    pub liked_users: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Thought {
    pub fn from_new(id: Uuid, new: NewThought) -> Self {
        Self {
            id,
            message: new.message,
            hearts: new.hearts,
            liked_users: new.liked_users,
            created_at: new.created_at,
        }
    }

    /// Applies the parity toggle: even counts go up by one, odd counts go down by one.
    pub fn toggle_hearts(&mut self) {
        self.hearts = toggled_hearts(self.hearts);
    }
}

pub fn toggled_hearts(hearts: i32) -> i32 {
    if hearts % 2 == 0 {
        hearts + 1
    } else {
        hearts - 1
    }
}

/// The body of `POST /thoughts`. Only `message` is read; other fields are ignored.
#[derive(Deserialize, Validate, Debug, Default)]
pub struct ThoughtPayload {
    #[serde(default)]
    #[validate(required(code = "required"), length(min = 5, max = 140, code = "length"))]
    pub message: Option<String>,
}

/// A validated thought that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewThought {
    pub message: String,
    pub hearts: i32,
    pub liked_users: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl NewThought {
    /// Validates `message` and builds the candidate document.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the message is missing, empty, or its character count
    /// falls outside `MESSAGE_MIN_LEN..=MESSAGE_MAX_LEN`.
    pub fn new(message: Option<String>) -> Result<Self, ValidationError> {
        // an empty string counts as missing
        let payload = ThoughtPayload {
            message: message.filter(|m| !m.is_empty()),
        };

        if let Err(errors) = payload.validate() {
            return Err(ValidationError::from_payload(&payload, &errors));
        }

        Ok(Self {
            message: payload.message.unwrap_or_default(),
            hearts: 0,
            liked_users: Vec::new(),
            created_at: Utc::now(),
        })
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ViolationKind {
    Required,
    MinLength,
    MaxLength,
    Json,
}

#[derive(Serialize, Debug, Clone, PartialEq, TS)]
#[ts(export)]
/// One failed constraint, reported to the client under `details.<path>`.
pub struct FieldViolation {
    pub kind: ViolationKind,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl FieldViolation {
    fn for_message(kind: ViolationKind, value: Option<String>) -> Self {
        let message = match (kind, value.as_deref()) {
            (ViolationKind::MinLength, Some(v)) => format!(
                "Path `message` (`{v}`) is shorter than the minimum allowed length ({MESSAGE_MIN_LEN})."
            ),
            (ViolationKind::MaxLength, Some(v)) => format!(
                "Path `message` (`{v}`) is longer than the maximum allowed length ({MESSAGE_MAX_LEN})."
            ),
            _ => "Path `message` is required.".to_string(),
        };
        Self {
            kind,
            message,
            path: "message".to_string(),
            value,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Default)]
#[error("validation failed: {}", describe(.errors))]
pub struct ValidationError {
    pub errors: BTreeMap<String, FieldViolation>,
}

fn describe(errors: &BTreeMap<String, FieldViolation>) -> String {
    errors
        .iter()
        .map(|(path, violation)| format!("{path}: {}", violation.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn single(violation: FieldViolation) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(violation.path.clone(), violation);
        Self { errors }
    }

    /// Maps `validator` field errors onto the `details` shape clients see.
    fn from_payload(payload: &ThoughtPayload, errors: &ValidationErrors) -> Self {
        let mut out = Self::default();
        for (field, field_errors) in errors.field_errors() {
            let Some(first) = field_errors.first() else {
                continue;
            };
            let violation = match (&*first.code, payload.message.as_ref()) {
                ("length", Some(message)) if message.chars().count() < MESSAGE_MIN_LEN => {
                    FieldViolation::for_message(ViolationKind::MinLength, Some(message.clone()))
                }
                ("length", Some(message)) => {
                    FieldViolation::for_message(ViolationKind::MaxLength, Some(message.clone()))
                }
                _ => FieldViolation::for_message(ViolationKind::Required, None),
            };
            out.errors.insert(field.to_string(), violation);
        }
        out
    }
}
