use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::identifiers::{CategoryId, Region, VideoId};

/// One watch-log row: a video was watched for `watchtime` in `region`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub video_id: VideoId,
    pub region: Region,
    pub watchtime: f64,
}

impl Observation {
    pub fn new(video_id: impl Into<VideoId>, region: impl Into<Region>, watchtime: f64) -> Self {
        Self {
            video_id: video_id.into(),
            region: region.into(),
            watchtime,
        }
    }
}

/// Lookup from video to its category. Videos missing here are dropped from ranking.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoCategoryMap {
    inner: BTreeMap<VideoId, CategoryId>,
}

impl VideoCategoryMap {
    pub fn new() -> Self {
        VideoCategoryMap {
            inner: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, video_id: impl Into<VideoId>, category_id: impl Into<CategoryId>) {
        self.inner.insert(video_id.into(), category_id.into());
    }

    pub fn get(&self, video_id: &VideoId) -> Option<&CategoryId> {
        self.inner.get(video_id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<V, C> FromIterator<(V, C)> for VideoCategoryMap
where
    V: Into<VideoId>,
    C: Into<CategoryId>,
{
    fn from_iter<I: IntoIterator<Item = (V, C)>>(iter: I) -> Self {
        let mut map = VideoCategoryMap::new();
        for (video_id, category_id) in iter {
            map.insert(video_id, category_id);
        }
        map
    }
}
