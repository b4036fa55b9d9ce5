//! Moderation store: report aggregation, ranking and threshold purge
//!
//! The store owns the report collection and reaches the post collection only
//! through the [`PostDirectory`] capability, so it can check existence, walk
//! a stable snapshot, and remove posts it purges without owning them.
//! Purging removes a post from the network and its report records from the
//! store within the same single-threaded call.

use crate::report::{Report, ReportError, ReportReason};
use social_graph::{Post, PostId, SocialNetwork};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from moderation store operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModerationError {
    /// Referenced post is not in the network
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// Reason does not match the submission path used
    #[error("Wrong report type for '{0}': custom reasons use the custom-text path and vice versa")]
    WrongReportType(ReportReason),

    /// An aggregate operation was invoked with no reports in the store
    #[error("No reports in the store")]
    NoReports,

    /// Error from the report entity itself
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Result type for moderation store operations
pub type Result<T> = std::result::Result<T, ModerationError>;

/// Post collection capability the store needs from the network
///
/// Keeps the dependency direction moderation → core: the store never owns
/// posts, it only checks, snapshots and removes them through this seam.
#[cfg_attr(test, mockall::automock)]
pub trait PostDirectory {
    /// Whether a post with this id currently exists
    fn post_exists(&self, id: PostId) -> bool;

    /// Stable copy of the current post collection, in insertion order
    fn snapshot(&self) -> Vec<Post>;

    /// Remove a post by id; `true` when a post was removed
    fn remove_post(&mut self, id: PostId) -> bool;
}

impl PostDirectory for SocialNetwork {
    fn post_exists(&self, id: PostId) -> bool {
        SocialNetwork::post_exists(self, id)
    }

    fn snapshot(&self) -> Vec<Post> {
        self.posts().to_vec()
    }

    fn remove_post(&mut self, id: PostId) -> bool {
        self.delete_post(id)
    }
}

/// Collection of report submissions, aggregated by post id
///
/// Every submission stays its own [`Report`] record; nothing is merged or
/// deduplicated across submissions for the same post.
#[derive(Debug, Default)]
pub struct ModerationStore {
    reports: Vec<Report>,
}

impl ModerationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of all report records, in submission order
    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    /// Number of report records in the store
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the store holds no report records
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Report a post for a standard reason
    ///
    /// Appends a fresh single-reason record; repeated reports on the same
    /// post accumulate separate records.
    ///
    /// # Errors
    ///
    /// - `ModerationError::PostNotFound` - the post is not in the network
    ///   (checked first, whatever the reason)
    /// - `ModerationError::WrongReportType` - `reason` is
    ///   [`ReportReason::Custom`]; use
    ///   [`ModerationStore::report_post_custom`]
    pub fn report_post(
        &mut self,
        directory: &impl PostDirectory,
        post: &Post,
        reason: ReportReason,
    ) -> Result<()> {
        if !directory.post_exists(post.id()) {
            return Err(ModerationError::PostNotFound(post.id()));
        }
        if reason == ReportReason::Custom {
            return Err(ModerationError::WrongReportType(reason));
        }

        let mut report = Report::new(post.id());
        report.flag(reason)?;
        debug!(post_id = %post.id(), %reason, "report submitted");
        self.reports.push(report);
        Ok(())
    }

    /// Report a post with a custom free-text reason
    ///
    /// # Errors
    ///
    /// - `ModerationError::PostNotFound` - the post is not in the network
    /// - `ModerationError::WrongReportType` - `reason` is not
    ///   [`ReportReason::Custom`]
    /// - `ModerationError::Report` - the custom text is too long
    pub fn report_post_custom(
        &mut self,
        directory: &impl PostDirectory,
        post: &Post,
        reason: ReportReason,
        text: impl Into<String>,
    ) -> Result<()> {
        if !directory.post_exists(post.id()) {
            return Err(ModerationError::PostNotFound(post.id()));
        }
        if reason != ReportReason::Custom {
            return Err(ModerationError::WrongReportType(reason));
        }

        let mut report = Report::new(post.id());
        report.flag_custom(text)?;
        debug!(post_id = %post.id(), "custom report submitted");
        self.reports.push(report);
        Ok(())
    }

    // =========================================================================
    // Aggregation and ranking
    // =========================================================================

    /// Total report count for a post
    ///
    /// Sums the flagged-category count of every submission against the post,
    /// so two single-category reports yield 2 — this counts flagged
    /// categories across submissions, not submissions.
    ///
    /// # Errors
    ///
    /// - `ModerationError::PostNotFound` - the post is not in the network
    pub fn report_count(&self, directory: &impl PostDirectory, post: &Post) -> Result<usize> {
        if !directory.post_exists(post.id()) {
            return Err(ModerationError::PostNotFound(post.id()));
        }
        Ok(self.count_for(post.id()))
    }

    /// Every post in the network with its total report count, most reported
    /// first
    ///
    /// Zero-report posts are included. The sort is stable: equal counts keep
    /// the posts' insertion order, and equal counts are never collapsed.
    ///
    /// # Errors
    ///
    /// - `ModerationError::NoReports` - the store holds no reports at all
    pub fn most_reported_posts(
        &self,
        directory: &impl PostDirectory,
    ) -> Result<Vec<(Post, usize)>> {
        self.ranked(directory, 0)
    }

    /// Like [`ModerationStore::most_reported_posts`], restricted to posts
    /// with at least `min_count` total reports
    ///
    /// # Errors
    ///
    /// - `ModerationError::NoReports` - the store holds no reports at all
    pub fn most_reported_posts_at_least(
        &self,
        directory: &impl PostDirectory,
        min_count: usize,
    ) -> Result<Vec<(Post, usize)>> {
        self.ranked(directory, min_count)
    }

    // =========================================================================
    // Purge
    // =========================================================================

    /// Remove every post with at least one report, and its report records
    ///
    /// Returns the number of posts removed.
    pub fn remove_reported_posts(&mut self, directory: &mut impl PostDirectory) -> usize {
        self.purge(directory, 1)
    }

    /// Remove every post with at least `min_count` total reports, and its
    /// report records
    ///
    /// Returns the number of posts removed.
    pub fn remove_reported_posts_at_least(
        &mut self,
        directory: &mut impl PostDirectory,
        min_count: usize,
    ) -> usize {
        self.purge(directory, min_count)
    }

    /// Delete all report records for a post id
    ///
    /// Returns the number of records removed.
    pub fn delete_reports_for_post(&mut self, post_id: PostId) -> usize {
        let before = self.reports.len();
        self.reports.retain(|r| r.post_id() != post_id);
        let removed = before - self.reports.len();
        if removed > 0 {
            debug!(%post_id, removed, "deleted report records");
        }
        removed
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn count_for(&self, id: PostId) -> usize {
        self.reports
            .iter()
            .filter(|r| r.post_id() == id)
            .map(Report::report_count)
            .sum()
    }

    fn ranked(
        &self,
        directory: &impl PostDirectory,
        min_count: usize,
    ) -> Result<Vec<(Post, usize)>> {
        if self.reports.is_empty() {
            return Err(ModerationError::NoReports);
        }

        let mut entries: Vec<(Post, usize)> = directory
            .snapshot()
            .into_iter()
            .map(|post| {
                let count = self.count_for(post.id());
                (post, count)
            })
            .filter(|(_, count)| *count >= min_count)
            .collect();

        // stable sort: ties keep insertion order
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(entries)
    }

    /// Purge over a stable snapshot; the live collections shrink as we go
    fn purge(&mut self, directory: &mut impl PostDirectory, min_count: usize) -> usize {
        let mut removed = 0;

        for post in directory.snapshot() {
            let count = self.count_for(post.id());
            if count < min_count {
                continue;
            }

            directory.remove_post(post.id());
            let dropped = self.delete_reports_for_post(post.id());
            // a post counted as reported must have had report records
            assert!(
                count == 0 || dropped > 0,
                "report records missing for post {} (count {})",
                post.id(),
                count
            );
            removed += 1;
        }

        if removed > 0 {
            info!(removed, min_count, "purged reported posts");
        }
        removed
    }
}
