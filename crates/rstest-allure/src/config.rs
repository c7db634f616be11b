//! Reporter configuration parsed from environment variables.
//!
//! All settings can be supplied through environment variables prefixed with
//! `RSTEST_ALLURE_` or set programmatically with the `with_*` builders.

use std::env;

use crate::error::ReportError;
use crate::links::LinkTemplate;

/// Environment variable holding the issue tracker link template.
pub const ISSUE_URL_ENV: &str = "RSTEST_ALLURE_ISSUE_URL";
/// Environment variable holding the test management link template.
pub const TMS_URL_ENV: &str = "RSTEST_ALLURE_TMS_URL";
/// Environment variable naming the fallback root executable.
pub const ROOT_NAME_ENV: &str = "RSTEST_ALLURE_ROOT_NAME";

const DEFAULT_ROOT_NAME: &str = "root";

/// Configuration for a [`Reporter`](crate::Reporter).
///
/// # Environment Variables
///
/// - `RSTEST_ALLURE_ISSUE_URL`: template for [`Reporter::issue`](crate::Reporter::issue)
///   links
/// - `RSTEST_ALLURE_TMS_URL`: template for [`Reporter::tms`](crate::Reporter::tms)
///   links
/// - `RSTEST_ALLURE_ROOT_NAME`: name of the fallback root executable
///
/// # Examples
///
/// ```
/// use rstest_allure::ReporterConfig;
///
/// let config = ReporterConfig::default()
///     .with_issue_url("https://jira.example.com/browse/{}")?
///     .with_root_name("suite hooks")?;
/// assert_eq!(config.root_name(), "suite hooks");
/// assert!(config.tms_url().is_none());
/// # Ok::<(), rstest_allure::ReportError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReporterConfig {
    issue_url: Option<LinkTemplate>,
    tms_url: Option<LinkTemplate>,
    root_name: String,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            issue_url: None,
            tms_url: None,
            root_name: DEFAULT_ROOT_NAME.to_owned(),
        }
    }
}

impl ReporterConfig {
    /// Load configuration from the process environment.
    ///
    /// Unset variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] when a variable is set but blank
    /// or not valid Unicode.
    pub fn from_env() -> Result<Self, ReportError> {
        Self::from_lookup(|key| read_var(key, env::var(key)))
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Result<Option<String>, ReportError>,
    ) -> Result<Self, ReportError> {
        let mut config = Self::default();
        if let Some(value) = lookup(ISSUE_URL_ENV)? {
            config = config.with_issue_url(value).map_err(|err| named(ISSUE_URL_ENV, err))?;
        }
        if let Some(value) = lookup(TMS_URL_ENV)? {
            config = config.with_tms_url(value).map_err(|err| named(TMS_URL_ENV, err))?;
        }
        if let Some(value) = lookup(ROOT_NAME_ENV)? {
            config = config.with_root_name(value).map_err(|err| named(ROOT_NAME_ENV, err))?;
        }
        Ok(config)
    }

    /// Set the issue tracker link template.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] when `template` is blank.
    pub fn with_issue_url(mut self, template: impl Into<String>) -> Result<Self, ReportError> {
        self.issue_url = Some(LinkTemplate::new(template)?);
        Ok(self)
    }

    /// Set the test management link template.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] when `template` is blank.
    pub fn with_tms_url(mut self, template: impl Into<String>) -> Result<Self, ReportError> {
        self.tms_url = Some(LinkTemplate::new(template)?);
        Ok(self)
    }

    /// Set the name of the fallback root executable.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] when `name` is blank.
    pub fn with_root_name(mut self, name: impl Into<String>) -> Result<Self, ReportError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ReportError::InvalidConfig(
                "root name must not be blank".into(),
            ));
        }
        self.root_name = name;
        Ok(self)
    }

    /// Issue tracker link template, if configured.
    #[must_use]
    pub fn issue_url(&self) -> Option<&LinkTemplate> {
        self.issue_url.as_ref()
    }

    /// Test management link template, if configured.
    #[must_use]
    pub fn tms_url(&self) -> Option<&LinkTemplate> {
        self.tms_url.as_ref()
    }

    /// Name given to the fallback root executable.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }
}

fn read_var(
    key: &str,
    value: Result<String, env::VarError>,
) -> Result<Option<String>, ReportError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ReportError::InvalidConfig(format!(
            "{key} is not valid unicode"
        ))),
    }
}

fn named(key: &str, err: ReportError) -> ReportError {
    match err {
        ReportError::InvalidConfig(message) => {
            ReportError::InvalidConfig(format!("{key}: {message}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serial_test::serial;

    use super::*;

    fn lookup_in<'a>(
        vars: &'a HashMap<&'static str, &'static str>,
    ) -> impl Fn(&str) -> Result<Option<String>, ReportError> + 'a {
        move |key: &str| Ok(vars.get(key).map(|value| (*value).to_owned()))
    }

    #[test]
    fn defaults_have_no_templates() {
        let config = ReporterConfig::default();
        assert!(config.issue_url().is_none());
        assert!(config.tms_url().is_none());
        assert_eq!(config.root_name(), "root");
    }

    #[test]
    fn lookup_populates_every_setting() {
        let vars = HashMap::from([
            (ISSUE_URL_ENV, "https://issues/{}"),
            (TMS_URL_ENV, "https://tms/"),
            (ROOT_NAME_ENV, "hooks"),
        ]);
        let Ok(config) = ReporterConfig::from_lookup(lookup_in(&vars)) else {
            panic!("valid variables should parse");
        };
        assert_eq!(
            config.issue_url().map(|url| url.resolve("1")),
            Some("https://issues/1".into())
        );
        assert_eq!(
            config.tms_url().map(LinkTemplate::pattern),
            Some("https://tms/")
        );
        assert_eq!(config.root_name(), "hooks");
    }

    #[test]
    fn blank_variable_is_rejected_with_its_name() {
        let vars = HashMap::from([(TMS_URL_ENV, "  ")]);
        let Err(ReportError::InvalidConfig(message)) =
            ReporterConfig::from_lookup(lookup_in(&vars))
        else {
            panic!("blank template should be rejected");
        };
        assert!(message.starts_with(TMS_URL_ENV), "unexpected message: {message}");
    }

    #[test]
    fn blank_root_name_is_rejected() {
        assert!(matches!(
            ReporterConfig::default().with_root_name(""),
            Err(ReportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unset_variable_reads_as_absent() {
        assert!(matches!(
            read_var(TMS_URL_ENV, Err(env::VarError::NotPresent)),
            Ok(None)
        ));
        assert!(matches!(
            read_var(TMS_URL_ENV, Ok("https://tms/".into())),
            Ok(Some(ref value)) if value == "https://tms/"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_variable_is_rejected_with_its_name() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![0x66, 0x6f, 0xff]);
        let Err(ReportError::InvalidConfig(message)) =
            read_var(ROOT_NAME_ENV, Err(env::VarError::NotUnicode(raw)))
        else {
            panic!("non-unicode value should be rejected");
        };
        assert_eq!(message, format!("{ROOT_NAME_ENV} is not valid unicode"));
    }

    #[test]
    #[serial]
    fn from_env_matches_the_process_environment() {
        let expected = ReporterConfig::from_lookup(|key| read_var(key, env::var(key)));
        match (ReporterConfig::from_env(), expected) {
            (Ok(actual), Ok(expected)) => assert_eq!(actual, expected),
            (Err(actual), Err(expected)) => {
                assert_eq!(actual.to_string(), expected.to_string());
            }
            (actual, expected) => panic!("from_env diverged: {actual:?} vs {expected:?}"),
        }
        let unset = [ISSUE_URL_ENV, TMS_URL_ENV, ROOT_NAME_ENV]
            .iter()
            .all(|key| env::var_os(key).is_none());
        if unset {
            assert!(matches!(
                ReporterConfig::from_env(),
                Ok(config) if config == ReporterConfig::default()
            ));
        }
    }
}
