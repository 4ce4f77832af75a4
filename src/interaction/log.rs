// Append-only:
// no removal
// no in-place edits
// replay order == append order

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::interaction::{Interaction, InteractionType, Rating};
use crate::types::identifiers::{CategoryId, UserId, VideoId};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionLog {
    entries: Vec<Interaction>,
}

impl InteractionLog {
    pub fn new() -> Self {
        InteractionLog {
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, interaction: Interaction) {
        self.entries.push(interaction);
    }

    /// Log one submitted feedback form: the rating first, then a comment if one was left.
    pub fn record_feedback(
        &mut self,
        user_id: &UserId,
        video_id: &VideoId,
        category_id: &CategoryId,
        rating: Rating,
        commented: bool,
    ) {
        self.append(Interaction {
            user_id: user_id.clone(),
            video_id: video_id.clone(),
            category_id: category_id.clone(),
            interaction_type: rating.into(),
        });
        if commented {
            self.append(Interaction {
                user_id: user_id.clone(),
                video_id: video_id.clone(),
                category_id: category_id.clone(),
                interaction_type: InteractionType::Comment,
            });
        }
        debug!(
            user_id = user_id.as_str(),
            video_id = video_id.as_str(),
            ?rating,
            commented,
            "Feedback recorded"
        );
    }

    pub fn entries(&self) -> &[Interaction] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.entries.iter()
    }

    pub fn for_user<'a>(&'a self, user_id: &'a UserId) -> impl Iterator<Item = &'a Interaction> + 'a {
        self.entries.iter().filter(move |i| &i.user_id == user_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Interaction>> for InteractionLog {
    fn from(entries: Vec<Interaction>) -> Self {
        InteractionLog { entries }
    }
}

impl Extend<Interaction> for InteractionLog {
    fn extend<I: IntoIterator<Item = Interaction>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
