//! Capture Protocol Library
//!
//! This crate decodes the command bytes of a peripheral's proprietary
//! HID feature reports, as captured on the wire by Wireshark, and lines
//! them up with notes the operator took while capturing:
//!
//! - **Frames**: fixed-offset slicing of one hex payload into command code,
//!   argument count and argument bytes
//! - **Annotations**: `<second> <description>` notes
//! - **Join**: every frame captured in an annotated second becomes one row
//! - **Table**: the rows under an `action, cmd, argc, arg0..` header, with
//!   an aligned console rendering
//! - **Sinks**: where the finished table goes
//!
//! # Example
//!
//! ```rust
//! use cap_protocol::{join, AnnotatedAction, CapturedFrame, DecodeMode, DecodedTable, RawFrame};
//!
//! let frames = vec![
//!     CapturedFrame::new(12.3, RawFrame::parse("001f00000003 0d02 010102").unwrap()),
//!     CapturedFrame::new(12.7, RawFrame::parse("001f00000001 0d82 00").unwrap()),
//! ];
//! let actions = vec![AnnotatedAction::new(12, "set balanced manual fan mode")];
//!
//! let rows = join(&actions, &frames, DecodeMode::Strict).unwrap();
//! let table = DecodedTable::from_rows(rows);
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.rows()[0].frame.cmd, "0d02");
//! assert_eq!(table.rows()[1].description, "");
//! ```

pub mod annotation;
pub mod error;
pub mod frame;
pub mod join;
pub mod sink;
pub mod table;

pub use annotation::AnnotatedAction;
pub use error::{AnnotationError, DecodeError, FrameField, JoinError, SinkError};
pub use frame::{decode, decode_with, DecodeMode, DecodedFrame, RawFrame};
pub use join::{join, CapturedFrame, DecodedRow, FrameIndex};
pub use sink::{write_all, MemorySink, TableSink};
pub use table::{DecodedTable, DEFAULT_ARG_COLUMNS};
