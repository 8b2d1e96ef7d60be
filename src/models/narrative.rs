use serde::{Deserialize, Serialize};

/// Who a transcript bubble belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One fully interpolated line of the scripted conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeMessage {
    pub role: Role,
    pub text: String,
}

impl NarrativeMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    /// Length in revealable units (characters, not bytes)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
