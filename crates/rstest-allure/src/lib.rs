//! Core library for `rstest-allure`.
//!
//! The crate records hierarchical test execution data (tests, nested steps,
//! labels, links, parameters, and attachments) into an Allure-style report
//! model. It tracks the innermost active executable in an explicit
//! [`ExecutionContext`], wraps synchronous and asynchronous work as reported
//! steps through [`StepGuard`], and buffers labels recorded before a test is
//! active. [`Reporter`] composes these pieces behind named operations.
//!
//! Writing report files and discovering tests are left to collaborators: the
//! reporter hands attachment bytes to an [`AttachmentStore`] and exposes
//! finished [`TestRecord`]s for an external writer.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use rstest_allure::{ContentType, Executable, MemoryAttachmentStore, Reporter, Status, Test};
//!
//! let store = Arc::new(MemoryAttachmentStore::new());
//! let reporter = Reporter::new(store.clone());
//!
//! reporter.owner("alice");
//! reporter.start_test(Test::new("checkout applies discount"));
//! let total = reporter.step("apply coupon", |step| {
//!     reporter.attachment("coupon", "SAVE10", ContentType::Text)?;
//!     step.set_status(Status::Passed);
//!     Ok::<_, rstest_allure::ReportError>(90)
//! })??;
//! assert_eq!(total, 90);
//! reporter.finish_test();
//!
//! let record = &reporter.results()[0];
//! assert_eq!(record.label_values("owner"), ["alice"]);
//! assert_eq!(store.len(), 1);
//! # Ok::<(), rstest_allure::ReportError>(())
//! ```

mod config;
mod content_type;
mod context;
mod error;
mod execution;
mod label_buffer;
mod label_name;
mod links;
pub mod model;
mod reporter;
mod store;
mod sync;

pub use config::{ISSUE_URL_ENV, ROOT_NAME_ENV, ReporterConfig, TMS_URL_ENV};
pub use content_type::ContentType;
pub use context::{ExecutionContext, SharedContext, StepListener};
pub use error::ReportError;
pub use execution::{StepGuard, run_step, run_step_async};
pub use label_buffer::LabelBuffer;
pub use label_name::{LabelName, ParseSeverityError, Severity};
pub use links::LinkTemplate;
pub use model::{
    Attachment, Executable, Label, Link, LinkType, Parameter, RootExecutable, Stage, Status,
    StatusDetails, Step, StepRecord, Test, TestRecord,
};
pub use reporter::{AttachmentPayload, Reporter};
pub use store::{
    AttachmentContent, AttachmentRef, AttachmentStore, MemoryAttachmentStore, StoreError,
    StoredAttachment,
};
