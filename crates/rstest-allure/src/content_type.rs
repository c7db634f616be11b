//! MIME types recognised for attachments.
//!
//! Unknown strings are preserved verbatim as [`ContentType::Other`]; stores are
//! not required to validate them.

use std::fmt;

/// Content type of an attachment.
///
/// # Examples
///
/// ```
/// use rstest_allure::ContentType;
///
/// assert_eq!(ContentType::from("image/png"), ContentType::Png);
/// assert_eq!(ContentType::Png.extension(), "png");
///
/// let custom = ContentType::from("application/x-trace");
/// assert_eq!(custom.as_str(), "application/x-trace");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize), serde(into = "String"))]
pub enum ContentType {
    /// `text/plain`
    Text,
    /// `application/xml`
    Xml,
    /// `text/csv`
    Csv,
    /// `text/tab-separated-values`
    Tsv,
    /// `text/css`
    Css,
    /// `text/uri-list`
    UriList,
    /// `image/svg+xml`
    Svg,
    /// `image/png`
    Png,
    /// `application/json`
    Json,
    /// `video/webm`
    Webm,
    /// `image/jpeg`
    Jpeg,
    /// `text/html`
    Html,
    /// Any other MIME type, passed through unchanged.
    Other(String),
}

impl ContentType {
    /// Every recognised type, in declaration order.
    pub const KNOWN: [Self; 12] = [
        Self::Text,
        Self::Xml,
        Self::Csv,
        Self::Tsv,
        Self::Css,
        Self::UriList,
        Self::Svg,
        Self::Png,
        Self::Json,
        Self::Webm,
        Self::Jpeg,
        Self::Html,
    ];

    /// The MIME string for this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text/plain",
            Self::Xml => "application/xml",
            Self::Csv => "text/csv",
            Self::Tsv => "text/tab-separated-values",
            Self::Css => "text/css",
            Self::UriList => "text/uri-list",
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
            Self::Json => "application/json",
            Self::Webm => "video/webm",
            Self::Jpeg => "image/jpeg",
            Self::Html => "text/html",
            Self::Other(mime) => mime,
        }
    }

    /// File extension conventionally used for this type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Xml => "xml",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Css => "css",
            Self::UriList => "uri",
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Json => "json",
            Self::Webm => "webm",
            Self::Jpeg => "jpg",
            Self::Html => "html",
            Self::Other(_) => "attach",
        }
    }
}

impl From<&str> for ContentType {
    fn from(mime: &str) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == mime)
            .unwrap_or_else(|| Self::Other(mime.to_owned()))
    }
}

impl From<String> for ContentType {
    fn from(mime: String) -> Self {
        match Self::from(mime.as_str()) {
            Self::Other(_) => Self::Other(mime),
            known => known,
        }
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Other(mime) => mime,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
