pub mod allocation;
pub mod identifiers;

pub use allocation::{percentage_of, total_count, AllocationError, CategoryAllocation};
pub use identifiers::{ContentDigest, CategoryId, Region, UserId, VideoId};
