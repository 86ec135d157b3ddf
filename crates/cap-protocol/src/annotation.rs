//! Operator notes taken while capturing

use crate::error::AnnotationError;

/// What the operator did at a given second of the capture
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotatedAction {
    /// Capture time in whole seconds
    pub timestamp: u64,
    /// Free text, e.g. "set balanced manual fan mode"
    pub description: String,
}

impl AnnotatedAction {
    pub fn new(timestamp: u64, description: impl Into<String>) -> Self {
        Self {
            timestamp,
            description: description.into(),
        }
    }

    /// Build an action from the fields of one space separated record
    ///
    /// The first field is the timestamp. The remaining non-empty fields are
    /// joined with single spaces, so a quoted description and an unquoted
    /// run of words give the same text.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, AnnotationError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = fields.into_iter();
        let time = fields
            .next()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AnnotationError::MissingTimestamp)?;

        let timestamp = time
            .parse::<u64>()
            .map_err(|_| AnnotationError::InvalidTimestamp(time.to_string()))?;

        let description = fields
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Self::new(timestamp, description))
    }
}
