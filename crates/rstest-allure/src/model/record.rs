//! Immutable snapshots of report entities.

use super::{Attachment, Label, Link, Parameter, Stage, Status, StatusDetails};

/// Snapshot of a step, or of the fallback root, and its descendants.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct StepRecord {
    /// Step name.
    pub name: String,
    /// Status set on the step, if any.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub status: Option<Status>,
    /// Status details set on the step, if any.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub status_details: Option<StatusDetails>,
    /// Lifecycle stage at snapshot time.
    pub stage: Stage,
    /// Start time in milliseconds since the Unix epoch.
    pub start: u64,
    /// Stop time in milliseconds since the Unix epoch, once ended.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub stop: Option<u64>,
    /// Nested steps in start order.
    pub steps: Vec<StepRecord>,
    /// Attachments in insertion order.
    pub attachments: Vec<Attachment>,
    /// Parameters in insertion order.
    pub parameters: Vec<Parameter>,
    /// Links in insertion order.
    pub links: Vec<Link>,
    /// Labels in insertion order.
    pub labels: Vec<Label>,
}

impl StepRecord {
    /// Find a direct child step by name.
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&Self> {
        self.steps.iter().find(|step| step.name == name)
    }
}

/// Snapshot of a test and every step beneath it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct TestRecord {
    /// Test name.
    pub name: String,
    /// Fully qualified name.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub full_name: Option<String>,
    /// Plain-text description.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    /// HTML description.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub description_html: Option<String>,
    /// Final or current status.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub status: Option<Status>,
    /// Details explaining the status.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub status_details: Option<StatusDetails>,
    /// Lifecycle stage at snapshot time.
    pub stage: Stage,
    /// Start time in milliseconds since the Unix epoch.
    pub start: u64,
    /// Stop time in milliseconds since the Unix epoch, once ended.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub stop: Option<u64>,
    /// Labels in insertion order.
    pub labels: Vec<Label>,
    /// Links in insertion order.
    pub links: Vec<Link>,
    /// Parameters in insertion order.
    pub parameters: Vec<Parameter>,
    /// Attachments in insertion order.
    pub attachments: Vec<Attachment>,
    /// Top-level steps in start order.
    pub steps: Vec<StepRecord>,
}

impl TestRecord {
    /// Find a top-level step by name.
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|step| step.name == name)
    }

    /// Values of every label with the given name, in insertion order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rstest_allure::{Executable, Label, Test};
    ///
    /// let test = Test::new("search");
    /// test.add_label(Label::new("tag", "smoke"));
    /// test.add_label(Label::new("owner", "bob"));
    /// test.add_label(Label::new("tag", "api"));
    /// assert_eq!(test.record().label_values("tag"), ["smoke", "api"]);
    /// ```
    #[must_use]
    pub fn label_values(&self, name: &str) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|label| label.name == name)
            .map(|label| label.value.as_str())
            .collect()
    }
}
