//! Shared test runner request and metadata types.

/// Test metadata provided to harness adapters.
///
/// # Examples
///
/// ```
/// use rstest_allure_harness::TestMetadata;
///
/// let metadata = TestMetadata::new(
///     "checkout::discounts",
///     "coupon_applies_once",
///     vec!["smoke".to_string()],
/// );
/// assert_eq!(metadata.full_name(), "checkout::discounts::coupon_applies_once");
/// assert_eq!(metadata.tags(), ["smoke"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestMetadata {
    module_path: String,
    test_name: String,
    tags: Vec<String>,
}

impl TestMetadata {
    /// Creates metadata for one test run.
    #[must_use]
    pub fn new(
        module_path: impl Into<String>,
        test_name: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            module_path: module_path.into(),
            test_name: test_name.into(),
            tags,
        }
    }

    /// Returns the module path the test lives in.
    #[must_use]
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Returns the test function name.
    #[must_use]
    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Returns the test tags.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns `module_path::test_name`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}::{}", self.module_path, self.test_name)
    }
}

impl Default for TestMetadata {
    fn default() -> Self {
        Self::new("<unknown>", "<unknown>", Vec::new())
    }
}

/// A callable test body owned by a harness.
///
/// # Examples
///
/// ```
/// use rstest_allure_harness::TestRunner;
///
/// let runner = TestRunner::new(|| 41 + 1);
/// assert_eq!(runner.run(), 42);
/// ```
pub struct TestRunner<'a, T> {
    inner: Box<dyn FnOnce() -> T + 'a>,
}

impl<'a, T> TestRunner<'a, T> {
    /// Wraps a closure as a test runner.
    #[must_use]
    pub fn new(inner: impl FnOnce() -> T + 'a) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// Executes the wrapped closure.
    #[must_use]
    pub fn run(self) -> T {
        (self.inner)()
    }
}

/// A harness execution request for one test.
pub struct TestRunRequest<'a, T> {
    metadata: TestMetadata,
    runner: TestRunner<'a, T>,
}

impl<'a, T> TestRunRequest<'a, T> {
    /// Creates a request from metadata and a runner.
    #[must_use]
    pub fn new(metadata: TestMetadata, runner: TestRunner<'a, T>) -> Self {
        Self { metadata, runner }
    }

    /// Returns immutable metadata for reporting or harness setup.
    #[must_use]
    pub fn metadata(&self) -> &TestMetadata {
        &self.metadata
    }

    /// Consumes the request and returns metadata and runner separately.
    #[must_use]
    pub fn into_parts(self) -> (TestMetadata, TestRunner<'a, T>) {
        (self.metadata, self.runner)
    }
}
