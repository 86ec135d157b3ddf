//! Matching operator notes to captured frames
//!
//! Frames are grouped by the whole second they were captured in. Each
//! annotation pulls in every frame from its second, in capture order, and
//! yields one row per frame. Only the first row of a group carries the
//! description so the table reads as one block per action.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::annotation::AnnotatedAction;
use crate::error::JoinError;
use crate::frame::{DecodeMode, DecodedFrame, RawFrame};

/// A frame together with its capture time in (fractional) seconds
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub time: f64,
    pub frame: RawFrame,
}

impl CapturedFrame {
    pub fn new(time: f64, frame: RawFrame) -> Self {
        Self { time, frame }
    }

    /// Whole second used for matching, or `None` if the time is unusable
    ///
    /// Times are truncated toward zero first, so small negative offsets such
    /// as `-0.4` land in second 0. Times of `-1.0` or less and non-finite
    /// times are rejected.
    pub fn second(&self) -> Option<u64> {
        if !self.time.is_finite() {
            return None;
        }

        let second = self.time.trunc();
        if second < 0.0 {
            None
        } else {
            Some(second as u64)
        }
    }
}

/// One line of the output table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedRow {
    /// Action description, empty on every row after the first of a group
    pub description: String,
    pub frame: DecodedFrame,
}

/// Captured frames bucketed by whole second
#[derive(Debug, Default)]
pub struct FrameIndex<'a> {
    by_second: BTreeMap<u64, Vec<&'a RawFrame>>,
}

impl<'a> FrameIndex<'a> {
    pub fn new(frames: &'a [CapturedFrame]) -> Self {
        let mut by_second: BTreeMap<u64, Vec<&'a RawFrame>> = BTreeMap::new();

        for captured in frames {
            match captured.second() {
                Some(second) => by_second.entry(second).or_default().push(&captured.frame),
                None => warn!(time = captured.time, "Skipping frame with unusable capture time"),
            }
        }

        Self { by_second }
    }

    /// Frames captured during `second`, in capture order
    pub fn at(&self, second: u64) -> &[&'a RawFrame] {
        self.by_second
            .get(&second)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of distinct seconds holding at least one frame
    pub fn seconds(&self) -> usize {
        self.by_second.len()
    }
}

/// Decode every frame referenced by `actions`
///
/// Fails on the first annotation without frames, or the first frame that
/// does not decode. No rows are returned on failure.
pub fn join(
    actions: &[AnnotatedAction],
    frames: &[CapturedFrame],
    mode: DecodeMode,
) -> Result<Vec<DecodedRow>, JoinError> {
    let index = FrameIndex::new(frames);
    let mut rows = Vec::new();

    for action in actions {
        let matched = index.at(action.timestamp);
        if matched.is_empty() {
            return Err(JoinError::UnmatchedAnnotation {
                timestamp: action.timestamp,
                description: action.description.clone(),
            });
        }

        debug!(
            timestamp = action.timestamp,
            frames = matched.len(),
            "{}",
            action.description
        );

        for (i, raw) in matched.iter().enumerate() {
            let frame = raw.decode_with(mode).map_err(|source| JoinError::Decode {
                timestamp: action.timestamp,
                description: action.description.clone(),
                source,
            })?;

            let description = if i == 0 {
                action.description.clone()
            } else {
                String::new()
            };

            rows.push(DecodedRow { description, frame });
        }
    }

    Ok(rows)
}
