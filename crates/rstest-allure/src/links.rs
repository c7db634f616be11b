//! Link URL templates for issue and test-management identifiers.

use std::fmt;

use crate::error::ReportError;

const PLACEHOLDER: &str = "{}";

/// URL pattern turning an identifier into a link target.
///
/// Every `{}` in the pattern is replaced by the identifier. A pattern without
/// a placeholder is treated as a base URL and the identifier is appended.
///
/// # Examples
///
/// ```
/// use rstest_allure::LinkTemplate;
///
/// let jira = LinkTemplate::new("https://jira.example.com/browse/{}")?;
/// assert_eq!(jira.resolve("PAY-12"), "https://jira.example.com/browse/PAY-12");
///
/// let tms = LinkTemplate::new("https://tms.example.com/case/")?;
/// assert_eq!(tms.resolve("C42"), "https://tms.example.com/case/C42");
/// # Ok::<(), rstest_allure::ReportError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkTemplate {
    pattern: String,
}

impl LinkTemplate {
    /// Build a template from `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] when the pattern is blank.
    pub fn new(pattern: impl Into<String>) -> Result<Self, ReportError> {
        let pattern = pattern.into();
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(ReportError::InvalidConfig(
                "link template must not be blank".into(),
            ));
        }
        Ok(Self {
            pattern: trimmed.to_owned(),
        })
    }

    /// The pattern as configured.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Produce the URL for `id`.
    #[must_use]
    pub fn resolve(&self, id: &str) -> String {
        if self.pattern.contains(PLACEHOLDER) {
            self.pattern.replace(PLACEHOLDER, id)
        } else {
            format!("{}{id}", self.pattern)
        }
    }
}

impl fmt::Display for LinkTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("https://issues/{}", "7", "https://issues/7")]
    #[case("https://issues/{}/view?ref={}", "7", "https://issues/7/view?ref=7")]
    #[case("https://issues/", "7", "https://issues/7")]
    #[case("  https://tms/case-  ", "C1", "https://tms/case-C1")]
    fn resolves_identifiers(#[case] pattern: &str, #[case] id: &str, #[case] expected: &str) {
        let Ok(template) = LinkTemplate::new(pattern) else {
            panic!("{pattern} should be a valid template");
        };
        assert_eq!(template.resolve(id), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_patterns(#[case] pattern: &str) {
        assert!(matches!(
            LinkTemplate::new(pattern),
            Err(ReportError::InvalidConfig(_))
        ));
    }
}
