use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accounts::ValidationError;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;
pub const MIN_CONTENT_CHARS: usize = 10;

/// A review written by a registered user.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "movieId")]
    pub item_id: i64,
    /// Display name of the author.
    pub author: String,
    pub rating: u8,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_id: i64,
    #[serde(rename = "movieId")]
    pub item_id: i64,
    pub rating: u8,
    #[serde(default)]
    pub content: String,
}

impl NewReview {
    /// Check bounds and return the submission with trimmed content.
    pub fn validate(&self) -> Result<NewReview, ValidationError> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ValidationError::new(
                "rating",
                format!("Rating must be between {} and {}", MIN_RATING, MAX_RATING),
            ));
        }

        let content = self.content.trim();
        if content.chars().count() < MIN_CONTENT_CHARS {
            return Err(ValidationError::new(
                "content",
                format!(
                    "Review must be at least {} characters long",
                    MIN_CONTENT_CHARS
                ),
            ));
        }

        Ok(NewReview {
            content: content.to_string(),
            ..self.clone()
        })
    }
}

/// Where a displayed review came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSource {
    User,
    Provider,
    Placeholder,
}

/// A review as shown on an item page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DisplayReview {
    pub id: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    pub content: String,
    /// ISO date for real reviews, relative phrase for placeholders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub source: ReviewSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
