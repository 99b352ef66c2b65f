use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a conversation thread by its model and record id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadRef {
    pub model: String,
    pub id: i64,
}

impl ThreadRef {
    pub fn new(model: impl Into<String>, id: i64) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }

    pub fn channel(id: i64) -> Self {
        Self::new("discuss.channel", id)
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.model, self.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThreadKind {
    /// Direct conversation between two members.
    #[default]
    Chat,
    Channel,
}

/// Chat-window bar state the registry keeps for each thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FoldState {
    Open,
    Folded,
    #[default]
    Closed,
}

impl FoldState {
    /// Whether the user had the thread pinned in the window bar.
    pub fn is_pinned(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub mime_type: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: u64,
    pub author: String,
    pub body: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// The part of a chat window that outlives the window itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ThreadViewState {
    #[serde(default)]
    pub composer_draft: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub scroll_top: Option<u32>,
}
