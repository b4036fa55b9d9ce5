//! Social graph core for Murmur
//!
//! This crate owns the post collection and the follow graph: immutable
//! [`post::Post`] entities with validated construction, mention extraction
//! from post text, and the enumeration queries (authorship, word search,
//! influencer ranking, follower guessing) the moderation layer builds on.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod mentions;
pub mod network;
pub mod post;

pub use mentions::Mention;
pub use network::{NetworkError, SocialNetwork};
pub use post::{Post, PostBuilder, PostError, PostId, PostIdAllocator};
