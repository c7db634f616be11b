//! Reporting facade composing the context, executor, label buffer, and store.
//!
//! A [`Reporter`] owns one test-execution unit's state: the execution context
//! (with a fallback root installed at construction), the buffer for labels
//! recorded before a test starts, the attachment store, link templates, and
//! the records of finished tests. Handles are cheap to clone and share that
//! state.
//!
//! Step lifecycles on one reporter must nest. Running two step bodies
//! concurrently against the same reporter interleaves their start and end
//! bookkeeping; callers must keep step bodies logically serial.

mod results;

use std::future::Future;
use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::config::ReporterConfig;
use crate::content_type::ContentType;
use crate::context::{ExecutionContext, SharedContext, StepListener};
use crate::error::ReportError;
use crate::execution::{StepGuard, notify, run_step, run_step_async};
use crate::label_buffer::LabelBuffer;
use crate::label_name::{LabelName, Severity};
use crate::links::LinkTemplate;
use crate::model::{
    Attachment, Executable, Label, Link, LinkType, Parameter, RootExecutable, Status, Step, Test,
    TestRecord,
};
use crate::store::{AttachmentContent, AttachmentRef, AttachmentStore};
use crate::sync::lock;

use results::ResultsCollector;

/// One attachment passed to [`Reporter::log_step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentPayload {
    /// Display name.
    pub name: String,
    /// Content written through the store.
    pub content: AttachmentContent,
    /// Declared content type.
    pub content_type: ContentType,
}

impl AttachmentPayload {
    /// Bundle an attachment for [`Reporter::log_step`].
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content: impl Into<AttachmentContent>,
        content_type: impl Into<ContentType>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            content_type: content_type.into(),
        }
    }
}

#[derive(Debug)]
struct ReporterState {
    config: ReporterConfig,
    context: SharedContext,
    root: Arc<RootExecutable>,
    labels: Mutex<LabelBuffer>,
    store: Arc<dyn AttachmentStore>,
    results: ResultsCollector,
}

/// Entry point for recording report data from tests.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rstest_allure::{Executable, MemoryAttachmentStore, Reporter, Status, Test};
///
/// let reporter = Reporter::new(Arc::new(MemoryAttachmentStore::new()));
/// reporter.epic("billing");
///
/// reporter.start_test(Test::new("refund is issued"));
/// reporter.step("create order", |step| step.set_status(Status::Passed))?;
/// reporter.tag("smoke")?;
/// reporter.finish_test();
///
/// let results = reporter.results();
/// assert_eq!(results[0].label_values("epic"), ["billing"]);
/// assert_eq!(results[0].steps[0].status, Some(Status::Passed));
/// # Ok::<(), rstest_allure::ReportError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Reporter {
    inner: Arc<ReporterState>,
}

impl Reporter {
    /// Create a reporter with the default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn AttachmentStore>) -> Self {
        Self::with_config(ReporterConfig::default(), store)
    }

    /// Create a reporter using `config`.
    #[must_use]
    pub fn with_config(config: ReporterConfig, store: Arc<dyn AttachmentStore>) -> Self {
        let root = Arc::new(RootExecutable::new(config.root_name()));
        let context = SharedContext::new(ExecutionContext::with_root(root.clone()));
        Self {
            inner: Arc::new(ReporterState {
                config,
                context,
                root,
                labels: Mutex::new(LabelBuffer::default()),
                store,
                results: ResultsCollector::default(),
            }),
        }
    }

    /// Configuration in effect.
    #[must_use]
    pub fn config(&self) -> &ReporterConfig {
        &self.inner.config
    }

    /// The execution context shared with step guards.
    #[must_use]
    pub fn context(&self) -> &SharedContext {
        &self.inner.context
    }

    /// The fallback root receiving calls made outside any test.
    #[must_use]
    pub fn root(&self) -> &RootExecutable {
        &self.inner.root
    }

    /// Register a listener notified as steps open and close.
    pub fn add_listener(&self, listener: Arc<dyn StepListener>) {
        self.inner.context.lock().add_listener(listener);
    }

    fn current(&self) -> Result<Arc<dyn Executable>, ReportError> {
        self.inner.context.lock().current()
    }

    fn active_test(&self, operation: &'static str) -> Result<Test, ReportError> {
        self.inner
            .context
            .lock()
            .current_test()
            .cloned()
            .ok_or(ReportError::NoActiveTest { operation })
    }

    // Test lifecycle

    /// Make `test` the active test and flush buffered labels onto it.
    pub fn start_test(&self, test: Test) {
        let name = test.name();
        let mut ctx = self.inner.context.lock();
        if let Some(previous) = ctx.set_current_test(test) {
            warn!(
                "test `{name}` started while `{}` was still active",
                previous.name()
            );
        }
        let flushed = ctx
            .current_test()
            .map_or(0, |test| lock(&self.inner.labels).flush_into(test));
        debug!("test started: {name} ({flushed} buffered label(s))");
    }

    /// End the active test and collect its record.
    ///
    /// Steps opened under the test and still open are popped and ended here,
    /// innermost first, so they cannot capture the next test's work.
    ///
    /// Returns the finished test, or `None` when no test was active.
    pub fn finish_test(&self) -> Option<Test> {
        let (test, leaked, listeners) = {
            let mut ctx = self.inner.context.lock();
            let leaked = ctx.unwind_test_steps();
            for step in &leaked {
                step.end();
            }
            (ctx.clear_current_test(), leaked, ctx.listeners())
        };
        let test = test?;
        for step in &leaked {
            warn!(
                "step `{}` was still open when test `{}` finished",
                step.name(),
                test.name()
            );
            notify(&listeners, |listener| listener.on_step_end(step));
        }
        test.end();
        self.inner.results.record(test.record());
        debug!("test finished: {}", test.name());
        Some(test)
    }

    /// The active test, if any.
    #[must_use]
    pub fn current_test(&self) -> Option<Test> {
        self.inner.context.lock().current_test().cloned()
    }

    /// Apply buffered labels to the active test.
    ///
    /// Returns the number of labels applied.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveTest`] when no test is active.
    pub fn flush_labels(&self) -> Result<usize, ReportError> {
        let ctx = self.inner.context.lock();
        let test = ctx
            .current_test()
            .ok_or(ReportError::NoActiveTest {
                operation: "flush_labels",
            })?;
        Ok(lock(&self.inner.labels).flush_into(test))
    }

    /// Records of every finished test, in finish order.
    #[must_use]
    pub fn results(&self) -> Vec<TestRecord> {
        self.inner.results.snapshot()
    }

    /// Remove and return the records of every finished test.
    pub fn drain_results(&self) -> Vec<TestRecord> {
        self.inner.results.drain()
    }

    // Labels

    /// Attach a label to the active test, or buffer it until one starts.
    pub fn label(&self, name: &str, value: &str) {
        self.add_label(Label::new(name, value));
    }

    /// Like [`label`](Self::label) with an ordinal among same-named labels.
    pub fn indexed_label(&self, name: &str, value: &str, index: usize) {
        self.add_label(Label::new(name, value).with_index(index));
    }

    fn add_label(&self, label: Label) {
        let ctx = self.inner.context.lock();
        if let Some(test) = ctx.current_test() {
            test.add_label(label);
            return;
        }
        debug!("buffering label {}={} until a test starts", label.name, label.value);
        lock(&self.inner.labels).record(label);
    }

    fn named_label(&self, name: LabelName, value: &str) {
        self.label(name.as_str(), value);
    }

    /// Record the test severity.
    pub fn severity(&self, severity: Severity) {
        self.named_label(LabelName::Severity, severity.as_str());
    }

    /// Record the test owner.
    pub fn owner(&self, owner: &str) {
        self.named_label(LabelName::Owner, owner);
    }

    /// Record the lead.
    pub fn lead(&self, lead: &str) {
        self.named_label(LabelName::Lead, lead);
    }

    /// Record the epic.
    pub fn epic(&self, epic: &str) {
        self.named_label(LabelName::Epic, epic);
    }

    /// Record the feature.
    pub fn feature(&self, feature: &str) {
        self.named_label(LabelName::Feature, feature);
    }

    /// Record the user story.
    pub fn story(&self, story: &str) {
        self.named_label(LabelName::Story, story);
    }

    /// Record the test management identifier.
    pub fn allure_id(&self, id: &str) {
        self.named_label(LabelName::AllureId, id);
    }

    /// Record the suite.
    pub fn suite(&self, suite: &str) {
        self.named_label(LabelName::Suite, suite);
    }

    /// Record the parent suite.
    pub fn parent_suite(&self, suite: &str) {
        self.named_label(LabelName::ParentSuite, suite);
    }

    /// Record the sub-suite.
    pub fn sub_suite(&self, suite: &str) {
        self.named_label(LabelName::SubSuite, suite);
    }

    /// Record the test pyramid layer.
    pub fn layer(&self, layer: &str) {
        self.named_label(LabelName::Layer, layer);
    }

    /// Tag the active test.
    ///
    /// Tags are never buffered.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveTest`] when no test is active.
    pub fn tag(&self, tag: &str) -> Result<(), ReportError> {
        let test = self.active_test("tag")?;
        test.add_label(Label::new(LabelName::Tag.as_str(), tag));
        Ok(())
    }

    // Links, parameters, descriptions

    /// Link an issue tracker entry to the current executable.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when nothing can receive
    /// the link.
    pub fn issue(&self, id: &str) -> Result<(), ReportError> {
        self.templated_link(self.inner.config.issue_url(), id, LinkType::Issue)
    }

    /// Link a test management entry to the current executable.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when nothing can receive
    /// the link.
    pub fn tms(&self, id: &str) -> Result<(), ReportError> {
        self.templated_link(self.inner.config.tms_url(), id, LinkType::Tms)
    }

    fn templated_link(
        &self,
        template: Option<&LinkTemplate>,
        id: &str,
        link_type: LinkType,
    ) -> Result<(), ReportError> {
        let url = template.map_or_else(
            || {
                warn!(
                    "no {} link template configured; using `{id}` as the URL",
                    link_type.as_str()
                );
                id.to_owned()
            },
            |template| template.resolve(id),
        );
        self.link(&url, id, link_type)
    }

    /// Attach an arbitrary link to the current executable.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when nothing can receive
    /// the link.
    pub fn link(&self, url: &str, name: &str, link_type: LinkType) -> Result<(), ReportError> {
        self.current()?.add_link(Link::new(url, name, link_type));
        Ok(())
    }

    /// Attach a parameter to the current executable.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when nothing can receive
    /// the parameter.
    pub fn parameter(&self, name: &str, value: &str) -> Result<(), ReportError> {
        self.current()?.add_parameter(Parameter::new(name, value));
        Ok(())
    }

    /// Replace the active test's plain-text description.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveTest`] when no test is active.
    pub fn description(&self, text: &str) -> Result<(), ReportError> {
        self.active_test("description")?.set_description(text);
        Ok(())
    }

    /// Replace the active test's HTML description.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveTest`] when no test is active.
    pub fn description_html(&self, html: &str) -> Result<(), ReportError> {
        self.active_test("description_html")?
            .set_description_html(html);
        Ok(())
    }

    // Attachments

    fn write_attachment(
        &self,
        name: &str,
        content: &AttachmentContent,
        content_type: ContentType,
    ) -> Result<Attachment, ReportError> {
        let source = self.inner.store.write(content, &content_type)?;
        debug!("stored attachment `{name}` as {source}");
        Ok(Attachment::new(name, content_type, source))
    }

    /// Write `content` through the store and attach it to the current
    /// executable: the innermost open step, else the test, else the root.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Store`] when the store rejects the write and
    /// [`ReportError::NoActiveExecutable`] when nothing can receive it.
    pub fn attachment(
        &self,
        name: &str,
        content: impl Into<AttachmentContent>,
        content_type: impl Into<ContentType>,
    ) -> Result<AttachmentRef, ReportError> {
        let target = self.current()?;
        let attachment = self.write_attachment(name, &content.into(), content_type.into())?;
        let source = attachment.source.clone();
        target.add_attachment(attachment);
        Ok(source)
    }

    /// Write `content` through the store and attach it to the active test,
    /// bypassing any open step.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveTest`] when no test is active (nothing
    /// is written) and [`ReportError::Store`] when the store rejects the
    /// write.
    pub fn test_attachment(
        &self,
        name: &str,
        content: impl Into<AttachmentContent>,
        content_type: impl Into<ContentType>,
    ) -> Result<AttachmentRef, ReportError> {
        let test = self.active_test("test_attachment")?;
        let attachment = self.write_attachment(name, &content.into(), content_type.into())?;
        let source = attachment.source.clone();
        test.add_attachment(attachment);
        Ok(source)
    }

    /// Serialize `value` as pretty JSON and attach it to the current
    /// executable.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Json`] when serialization fails, otherwise as
    /// [`attachment`](Self::attachment).
    #[cfg(feature = "json")]
    pub fn json_attachment<T>(&self, name: &str, value: &T) -> Result<AttachmentRef, ReportError>
    where
        T: serde::Serialize + ?Sized,
    {
        let rendered = serde_json::to_string_pretty(value)?;
        self.attachment(name, rendered, ContentType::Json)
    }

    // Steps

    /// Open a step that stays open until the guard is finished or dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when nothing can own the
    /// step.
    pub fn start_step(&self, name: &str) -> Result<StepGuard, ReportError> {
        StepGuard::enter(&self.inner.context, name)
    }

    /// Run `body` as a step. See [`run_step`].
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when nothing can own the
    /// step; the body's own result is returned unchanged inside `Ok`.
    pub fn step<T>(&self, name: &str, body: impl FnOnce(&Step) -> T) -> Result<T, ReportError> {
        run_step(&self.inner.context, name, body)
    }

    /// Run the future produced by `body` as a step. See [`run_step_async`].
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when nothing can own the
    /// step; the body's own output is returned unchanged inside `Ok`.
    pub async fn step_async<T, F, Fut>(&self, name: &str, body: F) -> Result<T, ReportError>
    where
        F: FnOnce(Step) -> Fut,
        Fut: Future<Output = T>,
    {
        run_step_async(&self.inner.context, name, body).await
    }

    /// Record a zero-duration step with `status` and optional attachments.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::NoActiveExecutable`] when nothing can own the
    /// step and [`ReportError::Store`] when an attachment cannot be written.
    /// The step is ended in either case once it was opened.
    pub fn log_step(
        &self,
        name: &str,
        status: Status,
        attachments: impl IntoIterator<Item = AttachmentPayload>,
    ) -> Result<(), ReportError> {
        let guard = self.start_step(name)?;
        guard.step().set_status(status);
        for payload in attachments {
            let attachment =
                self.write_attachment(&payload.name, &payload.content, payload.content_type)?;
            guard.step().add_attachment(attachment);
        }
        guard.finish();
        Ok(())
    }
}
