//! The shared executable capability set and the state behind it.

use std::fmt;

use super::record::StepRecord;
use super::{
    Attachment, Label, Link, Parameter, Stage, Status, StatusDetails, Step, now_millis,
};

/// Anything able to own report metadata and start nested steps.
///
/// Implemented by [`Test`](super::Test), [`Step`], and
/// [`RootExecutable`](super::RootExecutable). The execution context resolves
/// calls to whichever of these is innermost.
///
/// # Examples
///
/// ```
/// use rstest_allure::{Executable, Status, Test};
///
/// let test = Test::new("checkout");
/// let step = test.start_step("add item");
/// step.set_status(Status::Passed);
/// assert_eq!(test.record().steps.len(), 1);
/// ```
pub trait Executable: fmt::Debug + Send + Sync {
    /// Display name of the executable.
    fn name(&self) -> String;

    /// Start a nested step owned by this executable.
    fn start_step(&self, name: &str) -> Step;

    /// Attach a label.
    fn add_label(&self, label: Label);

    /// Attach a stored attachment.
    fn add_attachment(&self, attachment: Attachment);

    /// Attach a link.
    fn add_link(&self, link: Link);

    /// Attach a parameter.
    fn add_parameter(&self, parameter: Parameter);

    /// Overwrite the status.
    fn set_status(&self, status: Status);

    /// Overwrite the status details.
    fn set_status_details(&self, details: StatusDetails);
}

/// State shared by steps, tests, and the fallback root.
#[derive(Debug)]
pub(crate) struct ExecutableBody {
    pub(crate) name: String,
    pub(crate) status: Option<Status>,
    pub(crate) status_details: Option<StatusDetails>,
    pub(crate) stage: Stage,
    pub(crate) start: u64,
    pub(crate) stop: Option<u64>,
    pub(crate) steps: Vec<Step>,
    pub(crate) attachments: Vec<Attachment>,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) links: Vec<Link>,
    pub(crate) labels: Vec<Label>,
}

impl ExecutableBody {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: None,
            status_details: None,
            stage: Stage::Running,
            start: now_millis(),
            stop: None,
            steps: Vec::new(),
            attachments: Vec::new(),
            parameters: Vec::new(),
            links: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub(crate) fn start_step(&mut self, name: &str) -> Step {
        let step = Step::new(name);
        self.steps.push(step.clone());
        step
    }

    /// Mark the body finished. Returns `false` when it already was.
    pub(crate) fn end(&mut self) -> bool {
        if self.stage == Stage::Finished {
            return false;
        }
        self.stage = Stage::Finished;
        self.stop = Some(now_millis());
        true
    }

    pub(crate) fn record(&self) -> StepRecord {
        StepRecord {
            name: self.name.clone(),
            status: self.status,
            status_details: self.status_details.clone(),
            stage: self.stage,
            start: self.start,
            stop: self.stop,
            steps: self.steps.iter().map(Step::record).collect(),
            attachments: self.attachments.clone(),
            parameters: self.parameters.clone(),
            links: self.links.clone(),
            labels: self.labels.clone(),
        }
    }
}

/// Implements [`Executable`] for a handle exposing
/// `with_body(&self, impl FnOnce(&mut ExecutableBody) -> R) -> R`.
macro_rules! delegate_executable {
    ($handle:ty) => {
        impl $crate::model::Executable for $handle {
            fn name(&self) -> String {
                self.with_body(|body| body.name.clone())
            }

            fn start_step(&self, name: &str) -> $crate::model::Step {
                self.with_body(|body| body.start_step(name))
            }

            fn add_label(&self, label: $crate::model::Label) {
                self.with_body(|body| body.labels.push(label));
            }

            fn add_attachment(&self, attachment: $crate::model::Attachment) {
                self.with_body(|body| body.attachments.push(attachment));
            }

            fn add_link(&self, link: $crate::model::Link) {
                self.with_body(|body| body.links.push(link));
            }

            fn add_parameter(&self, parameter: $crate::model::Parameter) {
                self.with_body(|body| body.parameters.push(parameter));
            }

            fn set_status(&self, status: $crate::model::Status) {
                self.with_body(|body| body.status = Some(status));
            }

            fn set_status_details(&self, details: $crate::model::StatusDetails) {
                self.with_body(|body| body.status_details = Some(details));
            }
        }
    };
}

pub(crate) use delegate_executable;
