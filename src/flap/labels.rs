//! Label lookup table.

use heapless::{FnvIndexMap, String, Vec};

use crate::error::{bounded, ConfigError};

/// Maximum number of labels on one wheel.
pub const MAX_LABELS: usize = 64;

/// Maximum label length in bytes.
pub const MAX_LABEL_LEN: usize = 16;

/// A flap label.
pub type Label = String<MAX_LABEL_LEN>;

/// Ordered labels with constant-time reverse lookup.
///
/// Built once and immutable afterwards. Index 0 is the wheel's origin.
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<Label, MAX_LABELS>,
    index: FnvIndexMap<Label, u32, MAX_LABELS>,
}

impl LabelTable {
    /// Build a table from labels in display order.
    ///
    /// # Errors
    ///
    /// Rejects an empty list, more than [`MAX_LABELS`] labels, labels longer
    /// than [`MAX_LABEL_LEN`] bytes and duplicates.
    pub fn from_labels<I, S>(labels: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self {
            labels: Vec::new(),
            index: FnvIndexMap::new(),
        };

        for (i, label) in labels.into_iter().enumerate() {
            let label = label.as_ref();
            if i >= MAX_LABELS {
                return Err(ConfigError::TooManyLabels(i + 1));
            }
            let key = Label::try_from(label)
                .map_err(|_| ConfigError::LabelTooLong(bounded(label)))?;
            if table.index.contains_key(&key) {
                return Err(ConfigError::DuplicateLabel(key));
            }
            // Capacity was checked above.
            let _ = table.index.insert(key.clone(), i as u32);
            let _ = table.labels.push(key);
        }

        if table.labels.is_empty() {
            return Err(ConfigError::EmptyLabels);
        }
        Ok(table)
    }

    /// Index of `label`, if present.
    pub fn index_of(&self, label: &str) -> Option<u32> {
        let key = Label::try_from(label).ok()?;
        self.index.get(&key).copied()
    }

    /// Label at `index`, if in range.
    pub fn label(&self, index: u32) -> Option<&str> {
        self.labels.get(index as usize).map(|l| l.as_str())
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in display order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(|l| l.as_str())
    }
}
