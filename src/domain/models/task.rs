//! Task domain model.
//!
//! Tasks are immutable once created: catalog tasks are reusable
//! system-provided content, user-owned tasks are created for exactly one
//! user. Only a user's active/completed references to them ever change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Size bucket of a task, which fixes both its experience points and its
/// difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSize {
    Small,
    Medium,
    Large,
}

impl TaskSize {
    /// Experience awarded on completion.
    pub fn points(self) -> u32 {
        match self {
            Self::Small => 25,
            Self::Medium => 50,
            Self::Large => 100,
        }
    }

    /// Difficulty tier (1-3), correlated with points.
    pub fn tier(self) -> u8 {
        match self {
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 3,
        }
    }

    pub fn from_points(points: u32) -> Option<Self> {
        match points {
            25 => Some(Self::Small),
            50 => Some(Self::Medium),
            100 => Some(Self::Large),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Self-reported condition a task targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Anxiety,
    Depression,
    EatingDisorder,
    Schizophrenia,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Self::Anxiety,
        Self::Depression,
        Self::EatingDisorder,
        Self::Schizophrenia,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anxiety => "anxiety",
            Self::Depression => "depression",
            Self::EatingDisorder => "eating_disorder",
            Self::Schizophrenia => "schizophrenia",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "anxiety" => Some(Self::Anxiety),
            "depression" => Some(Self::Depression),
            "eating_disorder" | "eating-disorder" => Some(Self::EatingDisorder),
            "schizophrenia" => Some(Self::Schizophrenia),
            _ => None,
        }
    }
}

/// Who a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskOwnership {
    /// System-provided, reusable by every user (daily sampling pool).
    Catalog,
    /// Created for exactly one user.
    UserOwned { user_id: Uuid },
}

impl Default for TaskOwnership {
    fn default() -> Self {
        Self::Catalog
    }
}

impl TaskOwnership {
    pub fn is_catalog(self) -> bool {
        matches!(self, Self::Catalog)
    }
}

/// An immutable unit of wellness work worth a fixed amount of experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: Uuid,
    /// Short display name
    pub name: String,
    /// Size bucket (fixes points and difficulty tier)
    pub size: TaskSize,
    /// What to do and why it helps
    pub description: String,
    /// Catalog or user-owned
    pub ownership: TaskOwnership,
    /// Optional condition tag
    pub category: Option<Condition>,
    /// When created
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        size: TaskSize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            size,
            description: description.into(),
            ownership: TaskOwnership::default(),
            category: None,
            created_at: Utc::now(),
        }
    }

    /// Make this task user-owned.
    pub fn with_owner(mut self, user_id: Uuid) -> Self {
        self.ownership = TaskOwnership::UserOwned { user_id };
        self
    }

    /// Tag this task with a condition category.
    pub fn with_category(mut self, category: Condition) -> Self {
        self.category = Some(category);
        self
    }

    /// Experience awarded on completion.
    pub fn points(&self) -> u32 {
        self.size.points()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Task name cannot be empty".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Task description cannot be empty".to_string());
        }
        Ok(())
    }
}
