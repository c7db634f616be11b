//! Well-known label names and severity levels.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Label names understood by Allure report viewers.
///
/// # Examples
///
/// ```
/// use rstest_allure::LabelName;
///
/// assert_eq!(LabelName::ParentSuite.as_str(), "parentSuite");
/// assert_eq!(LabelName::AllureId.as_str(), "AS_ID");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelName {
    /// Test severity, see [`Severity`].
    Severity,
    /// Person responsible for the test.
    Owner,
    /// Lead responsible for the owning team.
    Lead,
    /// Epic the test belongs to.
    Epic,
    /// Feature the test covers.
    Feature,
    /// User story the test covers.
    Story,
    /// Free-form tag.
    Tag,
    /// Identifier in the test management system.
    AllureId,
    /// Suite grouping.
    Suite,
    /// Parent suite grouping.
    ParentSuite,
    /// Sub-suite grouping.
    SubSuite,
    /// Test pyramid layer.
    Layer,
}

impl LabelName {
    /// The label name as written into report records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Severity => "severity",
            Self::Owner => "owner",
            Self::Lead => "lead",
            Self::Epic => "epic",
            Self::Feature => "feature",
            Self::Story => "story",
            Self::Tag => "tag",
            Self::AllureId => "AS_ID",
            Self::Suite => "suite",
            Self::ParentSuite => "parentSuite",
            Self::SubSuite => "subSuite",
            Self::Layer => "layer",
        }
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity levels recorded under the `severity` label.
///
/// # Examples
///
/// ```
/// use rstest_allure::Severity;
///
/// let parsed: Severity = "Critical".parse().unwrap_or_default();
/// assert_eq!(parsed, Severity::Critical);
/// assert_eq!(Severity::default().as_str(), "normal");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Blocks further testing.
    Blocker,
    /// Critical functionality is broken.
    Critical,
    /// Regular severity.
    #[default]
    Normal,
    /// Minor issue.
    Minor,
    /// Cosmetic issue.
    Trivial,
}

impl Severity {
    /// The lowercase label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blocker => "blocker",
            Self::Critical => "critical",
            Self::Normal => "normal",
            Self::Minor => "minor",
            Self::Trivial => "trivial",
        }
    }
}

/// Error returned when a string names no [`Severity`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown severity '{0}', expected one of: blocker, critical, normal, minor, trivial")]
pub struct ParseSeverityError(String);

impl ParseSeverityError {
    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blocker" => Ok(Self::Blocker),
            "critical" => Ok(Self::Critical),
            "normal" => Ok(Self::Normal),
            "minor" => Ok(Self::Minor),
            "trivial" => Ok(Self::Trivial),
            _ => Err(ParseSeverityError(s.to_owned())),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
