//! Deterministic cold-start category allocation for video recommendation.
//!
//! `coldstart-core` ranks video categories by regional watch time, then turns
//! the surviving candidates into an integer slate of display slots that sums
//! exactly to a fixed budget. The slate starts rank-weighted and is
//! re-derived after each like, dislike or comment in the session. All
//! operations are deterministic: identical inputs always produce identical
//! slates.

pub mod allocation;
pub mod interaction;
pub mod ranking;
pub mod session;
pub mod types;
