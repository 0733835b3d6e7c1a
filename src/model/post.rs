//! Post types: what the wizard produces and what the post service stores.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What is being posted. Each kind has its own draft and field schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Item,
    Service,
}

impl PostKind {
    /// Storage key of this kind's draft.
    pub fn draft_key(self) -> &'static str {
        match self {
            Self::Item => "post_item",
            Self::Service => "post_service",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical condition of a posted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub const NAMES: [&'static str; 5] = ["new", "like-new", "good", "fair", "poor"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::LikeNew => "like-new",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "like-new" => Ok(Self::LikeNew),
            "good" => Ok(Self::Good),
            "fair" => Ok(Self::Fair),
            "poor" => Ok(Self::Poor),
            other => Err(format!(
                "unknown condition '{other}' (expected one of: {})",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// The normalized post handed to the post service on submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub kind: PostKind,
    pub category: String,
    pub subcategory: String,
    pub title: String,
    pub description: String,
    /// Only items have a condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    pub location: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub preferred_swaps: String,
}

/// A post as kept by the local post service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPost {
    pub id: Uuid,
    pub record: PostRecord,
    pub created_at: Timestamp,
}

/// Remaining post allowance reported by the quota service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsStatus {
    pub remaining_free_posts: u32,
    pub remaining_paid_posts: u32,
}

impl PostsStatus {
    /// Whether at least one more post is allowed.
    pub fn has_remaining(&self) -> bool {
        u64::from(self.remaining_free_posts) + u64::from(self.remaining_paid_posts) > 0
    }
}
