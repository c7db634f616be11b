//! Labels recorded before a test is active.
//!
//! Suite-level code may call label helpers before the harness has opened a
//! test. Those labels are held here and flushed, in recorded order, onto the
//! next test that starts.

use log::debug;

use crate::model::{Executable, Label};

/// Ordered holding area for pending labels.
///
/// # Examples
///
/// ```
/// use rstest_allure::{Label, LabelBuffer, Test};
///
/// let mut buffer = LabelBuffer::default();
/// buffer.record(Label::new("epic", "billing"));
/// buffer.record(Label::new("epic", "billing"));
///
/// let test = Test::new("invoice totals");
/// assert_eq!(buffer.flush_into(&test), 2);
/// assert!(buffer.is_empty());
/// assert_eq!(test.labels().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LabelBuffer {
    pending: Vec<Label>,
}

impl LabelBuffer {
    /// Append a label. Duplicates are kept.
    pub fn record(&mut self, label: Label) {
        self.pending.push(label);
    }

    /// Apply every pending label to `target` in recorded order, then clear.
    ///
    /// Returns the number of labels applied; flushing an empty buffer is a
    /// no-op returning zero.
    pub fn flush_into(&mut self, target: &dyn Executable) -> usize {
        let count = self.pending.len();
        if count == 0 {
            return 0;
        }
        for label in self.pending.drain(..) {
            target.add_label(label);
        }
        debug!("flushed {count} buffered label(s) onto {}", target.name());
        count
    }

    /// Number of pending labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no labels are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending labels in recorded order.
    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.pending.iter()
    }
}

impl<'a> IntoIterator for &'a LabelBuffer {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
