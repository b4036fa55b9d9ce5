//! The social network core
//!
//! [`SocialNetwork`] owns the ordered post collection, the follow graph and
//! the id allocator. The follow graph maps a username to the set of
//! usernames they follow; there is no inverse index, so follower lookups
//! scan the whole map. Collections are exposed as read-only views only.

use crate::mentions::{self, Mention};
use crate::post::{Post, PostError, PostId, PostIdAllocator};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Errors from network-level operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// Referenced user does not exist in the network
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// An aggregate query was invoked on a network with no posts
    #[error("No posts in the network")]
    NoPosts,
}

/// Result type for network operations
pub type Result<T> = std::result::Result<T, NetworkError>;

/// In-memory social network: posts plus a follow graph
///
/// Posts keep insertion order and carry unique ids from the owned allocator.
/// Single-threaded by design; callers sharing a network across threads must
/// synchronize externally.
#[derive(Debug, Default)]
pub struct SocialNetwork {
    ids: PostIdAllocator,
    posts: Vec<Post>,
    followed: HashMap<String, HashSet<String>>,
}

impl SocialNetwork {
    /// Create an empty network
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Posts
    // =========================================================================

    /// Validate and publish a new post, returning its id
    ///
    /// # Errors
    ///
    /// Every [`Post::new`] validation error; nothing is added on failure.
    pub fn publish(
        &mut self,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> std::result::Result<PostId, PostError> {
        let post = Post::new(&mut self.ids, author, text)?;
        let id = post.id();
        debug!(post_id = %id, author = post.author(), "publishing post");
        self.posts.push(post);
        Ok(id)
    }

    /// Add an externally constructed post
    ///
    /// The post's id must come from this network's history (see
    /// [`SocialNetwork::publish`]); mixing allocators voids id uniqueness.
    pub fn add_post(&mut self, post: Post) {
        self.posts.push(post);
    }

    /// Remove a post by id
    ///
    /// Returns `true` when a post was removed.
    pub fn delete_post(&mut self, id: PostId) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| p.id() != id);
        let removed = self.posts.len() != before;
        if removed {
            debug!(post_id = %id, "deleted post");
        }
        removed
    }

    /// Whether a post with this id is currently in the network
    pub fn post_exists(&self, id: PostId) -> bool {
        self.posts.iter().any(|p| p.id() == id)
    }

    /// Look up a post by id
    pub fn get_post(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id() == id)
    }

    /// Read-only view of all posts, in insertion order
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    // =========================================================================
    // Users and the follow graph
    // =========================================================================

    /// Register a user together with the set of users they follow
    ///
    /// Re-registering an existing user replaces their followed set.
    pub fn add_user(&mut self, username: impl Into<String>, followed: HashSet<String>) {
        self.followed.insert(username.into(), followed);
    }

    /// Record that `username` follows `target`
    ///
    /// # Errors
    ///
    /// - `NetworkError::UserNotFound` - `username` is not registered
    pub fn follow(&mut self, username: &str, target: impl Into<String>) -> Result<()> {
        let set = self
            .followed
            .get_mut(username)
            .ok_or_else(|| NetworkError::UserNotFound(username.to_string()))?;
        set.insert(target.into());
        Ok(())
    }

    /// Remove `target` from the set of users `username` follows
    ///
    /// # Errors
    ///
    /// - `NetworkError::UserNotFound` - `username` is not registered
    pub fn unfollow(&mut self, username: &str, target: &str) -> Result<()> {
        let set = self
            .followed
            .get_mut(username)
            .ok_or_else(|| NetworkError::UserNotFound(username.to_string()))?;
        set.remove(target);
        Ok(())
    }

    /// Read-only view of the users `username` follows
    ///
    /// # Errors
    ///
    /// - `NetworkError::UserNotFound` - `username` is not registered
    pub fn followed_by(&self, username: &str) -> Result<&HashSet<String>> {
        self.followed
            .get(username)
            .ok_or_else(|| NetworkError::UserNotFound(username.to_string()))
    }

    /// Compute the followers of `username` by scanning the whole follow map
    ///
    /// # Errors
    ///
    /// - `NetworkError::UserNotFound` - `username` is not registered
    pub fn followers_of(&self, username: &str) -> Result<HashSet<String>> {
        if !self.followed.contains_key(username) {
            return Err(NetworkError::UserNotFound(username.to_string()));
        }

        let mut followers = HashSet::new();
        for (user, targets) in &self.followed {
            if targets.contains(username) {
                followers.insert(user.clone());
            }
        }
        Ok(followers)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Posts written by `username`, in insertion order
    pub fn written_by(&self, username: &str) -> Vec<Post> {
        Self::written_by_in(&self.posts, username)
    }

    /// Posts written by `username` within a caller-supplied subset
    pub fn written_by_in(posts: &[Post], username: &str) -> Vec<Post> {
        posts.iter().filter(|p| p.author() == username).cloned().collect()
    }

    /// Posts whose text contains at least one of `words`, case-insensitively
    ///
    /// A post matches at most once however many words it contains.
    pub fn containing<S: AsRef<str>>(&self, words: &[S]) -> Vec<Post> {
        let mut found = Vec::new();
        for post in &self.posts {
            let text = post.text().to_lowercase();
            if words.iter().any(|w| text.contains(&w.as_ref().to_lowercase())) {
                found.push(post.clone());
            }
        }
        found
    }

    /// Users mentioned across every post in the network
    pub fn mentioned_users(&self) -> HashSet<Mention> {
        Self::mentioned_users_in(&self.posts)
    }

    /// Users mentioned across a caller-supplied subset of posts
    pub fn mentioned_users_in(posts: &[Post]) -> HashSet<Mention> {
        let mut users = HashSet::new();
        for post in posts {
            users.extend(mentions::scan(post.text(), post.author()));
        }
        users
    }

    /// Usernames ranked by how many other users follow them, descending
    ///
    /// Ties are broken by username so the ranking is deterministic.
    ///
    /// # Errors
    ///
    /// - `NetworkError::NoPosts` - the network has no posts
    pub fn influencers(&self) -> Result<Vec<String>> {
        if self.posts.is_empty() {
            return Err(NetworkError::NoPosts);
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for targets in self.followed.values() {
            for target in targets {
                *counts.entry(target.as_str()).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        Ok(ranked.into_iter().map(|(name, _)| name.to_string()).collect())
    }

    /// Current followers of each distinct author in `posts`
    ///
    /// # Errors
    ///
    /// - `NetworkError::UserNotFound` - an author is not a registered user
    pub fn guess_followers(&self, posts: &[Post]) -> Result<HashMap<String, HashSet<String>>> {
        let mut guessed = HashMap::new();
        for post in posts {
            if !guessed.contains_key(post.author()) {
                guessed.insert(post.author().to_string(), self.followers_of(post.author())?);
            }
        }
        Ok(guessed)
    }
}
