//! Report entity and the reason registry
//!
//! A [`Report`] is a single moderation submission against a post. One
//! submission can flag several reason categories; submissions against the
//! same post stay separate records and are only ever aggregated by post id.

use serde::{Deserialize, Serialize};
use social_graph::PostId;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Errors that can occur on a report submission
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// Reason cannot be flagged through this operation
    #[error("Invalid reason '{0}': custom reports carry their own text")]
    InvalidReason(ReportReason),

    /// Custom report text too long
    #[error("Text too long: {length} characters (max {limit})")]
    TextTooLong {
        /// Actual length in characters
        length: usize,
        /// Maximum allowed
        limit: usize,
    },

    /// The custom reason was never flagged on this report
    #[error("No custom text set on this report")]
    CustomTextUnset,
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Maximum length of a custom report's text (in characters)
pub const MAX_CUSTOM_TEXT_LENGTH: usize = 70;

/// Why a post is being reported
///
/// Closed registry of reason categories. Exactly [`ReportReason::Custom`]
/// requires accompanying free text, supplied through
/// [`Report::flag_custom`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    /// Depicts or incites violence
    ViolentContent,
    /// Hateful or harassing content
    HatefulContent,
    /// Unwanted sexual content
    SexualContent,
    /// Fraud or scam attempt
    ScamAttempt,
    /// Promotes terrorism
    PromotesTerrorism,
    /// Spam or misleading content
    SpamMisleadingContent,
    /// Copyright issue
    CopyrightIssue,
    /// Free-text reason; requires accompanying text
    Custom,
}

impl ReportReason {
    /// Get a human-readable description of the reason
    pub fn description(&self) -> &'static str {
        match self {
            Self::ViolentContent => "Violent content",
            Self::HatefulContent => "Hateful content",
            Self::SexualContent => "Sexual content",
            Self::ScamAttempt => "Scam attempt",
            Self::PromotesTerrorism => "Promotes terrorism",
            Self::SpamMisleadingContent => "Spam or misleading content",
            Self::CopyrightIssue => "Copyright issue",
            Self::Custom => "Custom reason",
        }
    }

    /// All reasons selectable without accompanying text
    pub fn standard() -> &'static [ReportReason] {
        &[
            Self::ViolentContent,
            Self::HatefulContent,
            Self::SexualContent,
            Self::ScamAttempt,
            Self::PromotesTerrorism,
            Self::SpamMisleadingContent,
            Self::CopyrightIssue,
        ]
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A single moderation submission against a post
///
/// Starts with every reason category unset. Reasons are flagged at
/// submission time and never unflagged; repeated flags are idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    post_id: PostId,
    reasons: BTreeSet<ReportReason>,
    custom_text: Option<String>,
}

impl Report {
    /// Create a report against a post, with all reason categories unset
    pub fn new(post_id: PostId) -> Self {
        Self { post_id, reasons: BTreeSet::new(), custom_text: None }
    }

    /// Flag a standard reason category
    ///
    /// Idempotent: flagging the same category twice has no further effect.
    ///
    /// # Errors
    ///
    /// - `ReportError::InvalidReason` - `reason` is [`ReportReason::Custom`],
    ///   which must go through [`Report::flag_custom`]
    pub fn flag(&mut self, reason: ReportReason) -> Result<()> {
        if reason == ReportReason::Custom {
            return Err(ReportError::InvalidReason(reason));
        }
        self.reasons.insert(reason);
        Ok(())
    }

    /// Flag the custom category, storing its free text
    ///
    /// # Errors
    ///
    /// - `ReportError::TextTooLong` - text exceeds
    ///   [`MAX_CUSTOM_TEXT_LENGTH`] characters
    pub fn flag_custom(&mut self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        let length = text.chars().count();
        if length > MAX_CUSTOM_TEXT_LENGTH {
            return Err(ReportError::TextTooLong { length, limit: MAX_CUSTOM_TEXT_LENGTH });
        }

        self.reasons.insert(ReportReason::Custom);
        self.custom_text = Some(text);
        Ok(())
    }

    /// Get the id of the reported post
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Read-only view of the flagged reason categories
    pub fn reasons(&self) -> &BTreeSet<ReportReason> {
        &self.reasons
    }

    /// Number of distinct flagged categories
    pub fn report_count(&self) -> usize {
        self.reasons.len()
    }

    /// Get the custom report text
    ///
    /// # Errors
    ///
    /// - `ReportError::CustomTextUnset` - the custom category was never
    ///   flagged on this report
    pub fn custom_text(&self) -> Result<&str> {
        self.custom_text.as_deref().ok_or(ReportError::CustomTextUnset)
    }
}
