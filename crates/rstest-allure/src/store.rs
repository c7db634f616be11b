//! Attachment store contract and an in-memory implementation.
//!
//! The reporter never writes attachment bytes itself. It hands content to an
//! [`AttachmentStore`] and records the returned [`AttachmentRef`] on the
//! receiving executable. Store failures propagate to the caller unchanged.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::From;

use crate::content_type::ContentType;
use crate::sync::lock;

/// Content handed to an attachment store.
///
/// # Examples
///
/// ```
/// use rstest_allure::AttachmentContent;
///
/// let text = AttachmentContent::from("hello");
/// assert_eq!(text.as_bytes(), b"hello");
///
/// let bytes = AttachmentContent::from(vec![0x89, 0x50]);
/// assert_eq!(bytes.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum AttachmentContent {
    /// UTF-8 text.
    Text(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl AttachmentContent {
    /// Borrow the content as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Number of bytes in the content.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<&str> for AttachmentContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<&[u8]> for AttachmentContent {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// Opaque reference returned by a store for one written attachment.
///
/// References are never reused across attachments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize), serde(transparent))]
pub struct AttachmentRef(String);

impl AttachmentRef {
    /// Wrap a store-specific source identifier.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// The source identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure reported by an attachment store.
///
/// Wraps the store's own error so it reaches the caller unchanged: display and
/// source both forward to the wrapped value.
#[derive(Debug)]
pub struct StoreError(Box<dyn StdError + Send + Sync>);

impl StoreError {
    /// Wrap a store-specific error.
    pub fn new(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(error.into())
    }

    /// Borrow the wrapped error.
    #[must_use]
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Durable sink for attachment bytes.
pub trait AttachmentStore: fmt::Debug + Send + Sync {
    /// Persist `content` and return a reference the report model can record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the content cannot be persisted.
    fn write(
        &self,
        content: &AttachmentContent,
        content_type: &ContentType,
    ) -> Result<AttachmentRef, StoreError>;
}

/// A single attachment held by [`MemoryAttachmentStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredAttachment {
    /// Reference handed back to the caller.
    pub source: AttachmentRef,
    /// Declared content type.
    pub content_type: ContentType,
    /// Written bytes.
    pub bytes: Vec<u8>,
}

/// Attachment store that keeps content in memory.
///
/// Sources are numbered in write order, for example `00000001-attachment.png`.
///
/// # Examples
///
/// ```
/// use rstest_allure::{AttachmentStore, ContentType, MemoryAttachmentStore};
///
/// let store = MemoryAttachmentStore::new();
/// let source = store.write(&"log line".into(), &ContentType::Text)?;
/// assert_eq!(source.as_str(), "00000001-attachment.txt");
/// assert_eq!(store.read(&source), Some(b"log line".to_vec()));
/// # Ok::<(), rstest_allure::StoreError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryAttachmentStore {
    next_id: AtomicU64,
    entries: Mutex<Vec<StoredAttachment>>,
}

impl MemoryAttachmentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read back the bytes written under `source`.
    #[must_use]
    pub fn read(&self, source: &AttachmentRef) -> Option<Vec<u8>> {
        lock(&self.entries)
            .iter()
            .find(|entry| &entry.source == source)
            .map(|entry| entry.bytes.clone())
    }

    /// Snapshot every stored attachment in write order.
    #[must_use]
    pub fn entries(&self) -> Vec<StoredAttachment> {
        lock(&self.entries).clone()
    }

    /// Number of stored attachments.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl AttachmentStore for MemoryAttachmentStore {
    fn write(
        &self,
        content: &AttachmentContent,
        content_type: &ContentType,
    ) -> Result<AttachmentRef, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let source = AttachmentRef::new(format!(
            "{id:08}-attachment.{}",
            content_type.extension()
        ));
        lock(&self.entries).push(StoredAttachment {
            source: source.clone(),
            content_type: content_type.clone(),
            bytes: content.as_bytes().to_vec(),
        });
        Ok(source)
    }
}
