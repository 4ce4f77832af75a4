use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::{CategoryId, UserId, VideoId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteractionError {
    #[error("Unknown interaction type: {0}")]
    UnknownInteractionType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Like,
    Dislike,
    Comment,
    /// The viewer opened the video but left no rating.
    NoLikeEitherDislike,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Like => "like",
            InteractionType::Dislike => "dislike",
            InteractionType::Comment => "comment",
            InteractionType::NoLikeEitherDislike => "no_like_either_dislike",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = InteractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(InteractionType::Like),
            "dislike" => Ok(InteractionType::Dislike),
            "comment" => Ok(InteractionType::Comment),
            "no_like_either_dislike" => Ok(InteractionType::NoLikeEitherDislike),
            other => Err(InteractionError::UnknownInteractionType(other.to_string())),
        }
    }
}

/// Rating chosen on a video card. Exactly one per submitted feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Like,
    Dislike,
    NoRating,
}

impl From<Rating> for InteractionType {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Like => InteractionType::Like,
            Rating::Dislike => InteractionType::Dislike,
            Rating::NoRating => InteractionType::NoLikeEitherDislike,
        }
    }
}

/// A single user action on a video. Entries are immutable once logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub user_id: UserId,
    pub video_id: VideoId,
    pub category_id: CategoryId,
    pub interaction_type: InteractionType,
}

impl Interaction {
    pub fn new(
        user_id: impl Into<UserId>,
        video_id: impl Into<VideoId>,
        category_id: impl Into<CategoryId>,
        interaction_type: InteractionType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            video_id: video_id.into(),
            category_id: category_id.into(),
            interaction_type,
        }
    }
}
