//! Report model: executables and the metadata they own.
//!
//! Three handle types implement the shared [`Executable`] capability set:
//! [`Test`] for a test case, [`Step`] for nested units of work, and
//! [`RootExecutable`] as the fallback receiver when neither is active. Handles
//! are cheap to clone and share state, so the execution context, the reporter,
//! and step bodies can all hold the same entity. [`TestRecord`] and
//! [`StepRecord`] are immutable snapshots for inspection and serialization.

mod executable;
mod record;
mod root;
mod step;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::content_type::ContentType;
use crate::store::AttachmentRef;

pub use executable::Executable;
pub use record::{StepRecord, TestRecord};
pub use root::RootExecutable;
pub use step::Step;
pub use test::Test;

/// Milliseconds since the Unix epoch, saturating on clock errors.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Outcome of a test or step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Status {
    /// Completed without failures.
    Passed,
    /// An assertion failed.
    Failed,
    /// An unexpected error interrupted execution.
    Broken,
    /// Execution was skipped.
    Skipped,
    /// The outcome could not be determined.
    Unknown,
}

impl Status {
    /// Lowercase status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Broken => "broken",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }
}

/// Lifecycle stage of an executable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Stage {
    /// Started and not yet ended.
    Running,
    /// Ended.
    Finished,
}

/// Supplementary information explaining a status.
///
/// # Examples
///
/// ```
/// use rstest_allure::StatusDetails;
///
/// let details = StatusDetails::new("expected 2, got 3").with_trace("at checkout.rs:12");
/// assert_eq!(details.message.as_deref(), Some("expected 2, got 3"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct StatusDetails {
    /// Human-readable failure message.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub message: Option<String>,
    /// Stack trace or other diagnostic detail.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub trace: Option<String>,
}

impl StatusDetails {
    /// Details carrying only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            trace: None,
        }
    }

    /// Attach a trace to the details.
    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }
}

/// Name/value metadata attached to a test.
///
/// `index` is an optional ordinal for repeated labels of the same name. It is
/// carried through unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Label {
    /// Label name, usually one of [`LabelName`](crate::LabelName).
    pub name: String,
    /// Label value.
    pub value: String,
    /// Optional ordinal among labels sharing a name.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub index: Option<usize>,
}

impl Label {
    /// Create a label without an index.
    ///
    /// # Examples
    ///
    /// ```
    /// use rstest_allure::Label;
    ///
    /// let label = Label::new("owner", "alice");
    /// assert_eq!((label.name.as_str(), label.value.as_str()), ("owner", "alice"));
    /// assert!(label.index.is_none());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            index: None,
        }
    }

    /// Set the ordinal of this label.
    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Kind of link attached to an executable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum LinkType {
    /// Issue tracker entry.
    Issue,
    /// Test management system entry.
    Tms,
    /// Any other link.
    #[cfg_attr(feature = "json", serde(rename = "link"))]
    Custom,
}

impl LinkType {
    /// Link type name as written into report records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Tms => "tms",
            Self::Custom => "link",
        }
    }
}

/// Named URL associated with an executable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Link {
    /// Target URL.
    pub url: String,
    /// Display name.
    pub name: String,
    /// Link kind.
    #[cfg_attr(feature = "json", serde(rename = "type"))]
    pub link_type: LinkType,
}

impl Link {
    /// Create a link.
    #[must_use]
    pub fn new(url: impl Into<String>, name: impl Into<String>, link_type: LinkType) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            link_type,
        }
    }
}

/// Named input value of a test or step.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Rendered parameter value.
    pub value: String,
}

impl Parameter {
    /// Create a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Evidence attached to an executable, backed by a store reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Attachment {
    /// Display name.
    pub name: String,
    /// Declared content type.
    #[cfg_attr(feature = "json", serde(rename = "type"))]
    pub content_type: ContentType,
    /// Reference returned by the attachment store.
    pub source: AttachmentRef,
}

impl Attachment {
    /// Create an attachment record.
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: ContentType, source: AttachmentRef) -> Self {
        Self {
            name: name.into(),
            content_type,
            source,
        }
    }
}

#[cfg(test)]
mod tests;
