//! Fixed-layout decoding of captured feature reports
//!
//! Every SET_REPORT payload captured from the device shares one layout,
//! addressed here in hex-digit offsets:
//!
//! ```text
//! offset:  0         10   12      16
//!          [header    ][argc][cmd  ][arg0][arg1]...
//! bytes:   0..5       5    6..8    8    9
//! ```
//!
//! - Bytes 0-4: report header (status, transaction id, remaining packets,
//!   protocol type). Not decoded.
//! - Byte 5: number of argument bytes that follow the command
//! - Bytes 6-7: command code, kept as its 4-digit text
//! - Bytes 8..: `argc` argument bytes, each kept as 2-digit text
//!
//! The command and argument fields are opaque to this crate; they are
//! carried as the exact text that appeared in the capture so leading zeros
//! and digit case survive into the output table.

use crate::error::{DecodeError, FrameField};

/// Hex offset of the argument count byte
pub const ARGC_OFFSET: usize = 10;
/// Hex offset of the two-byte command code
pub const CMD_OFFSET: usize = 12;
/// Hex offset of the first argument byte
pub const ARGS_OFFSET: usize = 16;

const ARGC_LEN: usize = 2;
const CMD_LEN: usize = 4;
const ARG_LEN: usize = 2;

/// How strictly frame lengths and argument digits are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DecodeMode {
    /// Reject frames shorter than their declared argument count, and any
    /// field that is not hex
    #[default]
    Strict,
    /// Clamp out-of-range slices to whatever text is present; only the
    /// argument count has to be readable. A frame cut after offset 10 is
    /// read with a one-digit count, so `aabbccddee3` declares 3 arguments.
    Lenient,
}

/// One captured payload as a string of hex digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawFrame(String);

impl RawFrame {
    /// Normalize a payload as exported by Wireshark
    ///
    /// Byte separators (`:`) and whitespace are removed. Digit case is kept.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let hex: String = text
            .chars()
            .filter(|c| *c != ':' && !c.is_whitespace())
            .collect();

        if hex.is_empty() {
            return Err(DecodeError::Empty);
        }

        Ok(Self(hex))
    }

    /// The normalized hex text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in hex digits
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the frame holds no digits
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode with the default strict checks
    pub fn decode(&self) -> Result<DecodedFrame, DecodeError> {
        decode(self.as_str())
    }

    /// Decode with an explicit [`DecodeMode`]
    pub fn decode_with(&self, mode: DecodeMode) -> Result<DecodedFrame, DecodeError> {
        decode_with(self.as_str(), mode)
    }
}

impl std::fmt::Display for RawFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Command extracted from a single frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedFrame {
    /// Command code as 4 hex digits
    pub cmd: String,
    /// Declared argument count
    pub argc: u8,
    /// Argument bytes as 2 hex digits each, argument 0 first
    pub args: Vec<String>,
}

impl DecodedFrame {
    /// Rebuild the hex payload for this command behind the given header bytes
    ///
    /// The count byte is written from `argc`. The command must be exactly 4
    /// hex digits and every argument exactly 2, otherwise the frame would
    /// not decode back to the same fields.
    pub fn encode(&self, header: &[u8; 5]) -> Result<RawFrame, DecodeError> {
        check_width(&self.cmd, CMD_OFFSET, CMD_LEN, FrameField::Command)?;
        for (i, arg) in self.args.iter().enumerate() {
            check_width(arg, arg_offset(i), ARG_LEN, FrameField::Argument(i))?;
        }

        let mut hex: String = header.iter().map(|b| format!("{:02x}", b)).collect();
        hex.push_str(&format!("{:02x}", self.argc));
        hex.push_str(&self.cmd);
        for arg in &self.args {
            hex.push_str(arg);
        }
        Ok(RawFrame(hex))
    }
}

/// Decode one frame, rejecting short or malformed input
pub fn decode(frame: &str) -> Result<DecodedFrame, DecodeError> {
    decode_with(frame, DecodeMode::Strict)
}

/// Decode one frame with the given [`DecodeMode`]
pub fn decode_with(frame: &str, mode: DecodeMode) -> Result<DecodedFrame, DecodeError> {
    let bytes = frame.as_bytes();

    match mode {
        DecodeMode::Strict => {
            let argc_end = ARGC_OFFSET + ARGC_LEN;
            if bytes.len() < argc_end {
                return Err(DecodeError::TooShort {
                    needed: argc_end,
                    actual: bytes.len(),
                });
            }
            let argc = parse_argc(&hex_field(bytes, ARGC_OFFSET, ARGC_LEN, FrameField::Argc)?)?;

            let needed = arg_offset(usize::from(argc));
            if bytes.len() < needed {
                return Err(DecodeError::TooShort {
                    needed,
                    actual: bytes.len(),
                });
            }

            let cmd = hex_field(bytes, CMD_OFFSET, CMD_LEN, FrameField::Command)?;
            let args = (0..usize::from(argc))
                .map(|i| hex_field(bytes, arg_offset(i), ARG_LEN, FrameField::Argument(i)))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(DecodedFrame { cmd, argc, args })
        }
        DecodeMode::Lenient => {
            // At least one count digit is needed to know the layout at all.
            if bytes.len() <= ARGC_OFFSET {
                return Err(DecodeError::TooShort {
                    needed: ARGC_OFFSET + 1,
                    actual: bytes.len(),
                });
            }
            let argc_len = ARGC_LEN.min(bytes.len() - ARGC_OFFSET);
            let argc = parse_argc(&hex_field(bytes, ARGC_OFFSET, argc_len, FrameField::Argc)?)?;

            let cmd = clamped(bytes, CMD_OFFSET, CMD_LEN);
            let args = (0..usize::from(argc))
                .map(|i| clamped(bytes, arg_offset(i), ARG_LEN))
                .collect();

            Ok(DecodedFrame { cmd, argc, args })
        }
    }
}

fn parse_argc(digits: &str) -> Result<u8, DecodeError> {
    u8::from_str_radix(digits, 16).map_err(|_| DecodeError::InvalidHex {
        field: FrameField::Argc,
        offset: ARGC_OFFSET,
    })
}

fn arg_offset(index: usize) -> usize {
    ARGS_OFFSET + ARG_LEN * index
}

/// Slice a field that must be present and made of hex digits
fn hex_field(
    bytes: &[u8],
    offset: usize,
    len: usize,
    field: FrameField,
) -> Result<String, DecodeError> {
    let slice = bytes
        .get(offset..offset + len)
        .ok_or(DecodeError::TooShort {
            needed: offset + len,
            actual: bytes.len(),
        })?;

    if let Some(pos) = slice.iter().position(|b| !b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex {
            field,
            offset: offset + pos,
        });
    }

    // All bytes are ASCII hex digits at this point
    Ok(slice.iter().map(|&b| b as char).collect())
}

/// Check a field that is about to be written into a frame
fn check_width(
    text: &str,
    offset: usize,
    len: usize,
    field: FrameField,
) -> Result<(), DecodeError> {
    if text.len() != len {
        return Err(DecodeError::FieldWidth {
            field,
            expected: len,
            actual: text.len(),
        });
    }

    if let Some(pos) = text.bytes().position(|b| !b.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidHex {
            field,
            offset: offset + pos,
        });
    }

    Ok(())
}

/// Slice a field the way a tolerant string slice would: past the end yields
/// whatever is left, possibly nothing
fn clamped(bytes: &[u8], offset: usize, len: usize) -> String {
    let start = offset.min(bytes.len());
    let end = (offset + len).min(bytes.len());
    String::from_utf8_lossy(&bytes[start..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::{decode, decode_with, DecodeMode, DecodedFrame, RawFrame};
    use crate::error::{DecodeError, FrameField};

    #[test]
    fn test_decode_three_args() {
        let decoded = decode("aabbccddee03abcd010203").unwrap();
        assert_eq!(decoded.cmd, "abcd");
        assert_eq!(decoded.argc, 3);
        assert_eq!(decoded.args, vec!["01", "02", "03"]);
    }

    #[test]
    fn test_decode_no_args() {
        let decoded = decode("001f000000000d82").unwrap();
        assert_eq!(decoded.cmd, "0d82");
        assert_eq!(decoded.argc, 0);
        assert!(decoded.args.is_empty());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        // Captured reports are padded to a fixed size
        let frame = "001f00000004 0d02 01 01 02 00 00000000000000".replace(' ', "");
        let decoded = decode(&frame).unwrap();
        assert_eq!(decoded.cmd, "0d02");
        assert_eq!(decoded.args, vec!["01", "01", "02", "00"]);
    }

    #[test]
    fn test_cmd_keeps_leading_zeros_and_case() {
        let decoded = decode("00ff00000001 0F90 AB".replace(' ', "").as_str()).unwrap();
        assert_eq!(decoded.cmd, "0F90");
        assert_eq!(decoded.args, vec!["AB"]);
    }

    #[test]
    fn test_strict_rejects_short_args() {
        let err = decode("aabbccddee03abcd0102").unwrap_err();
        assert_eq!(
            err,
            DecodeError::TooShort {
                needed: 22,
                actual: 20
            }
        );
    }

    #[test]
    fn test_strict_rejects_missing_cmd() {
        let err = decode("aabbccddee00ab").unwrap_err();
        assert_eq!(
            err,
            DecodeError::TooShort {
                needed: 16,
                actual: 14
            }
        );
    }

    #[test]
    fn test_missing_argc_fails_in_both_modes() {
        assert_eq!(
            decode_with("aabbccdd", DecodeMode::Strict).unwrap_err(),
            DecodeError::TooShort {
                needed: 12,
                actual: 8
            }
        );
        assert_eq!(
            decode_with("aabbccddee", DecodeMode::Lenient).unwrap_err(),
            DecodeError::TooShort {
                needed: 11,
                actual: 10
            }
        );
    }

    #[test]
    fn test_lenient_reads_one_digit_argc() {
        let decoded = decode_with("aabbccddee3", DecodeMode::Lenient).unwrap();
        assert_eq!(decoded.argc, 3);
        assert_eq!(decoded.cmd, "");
        assert_eq!(decoded.args, vec!["", "", ""]);

        assert_eq!(
            decode("aabbccddee3").unwrap_err(),
            DecodeError::TooShort {
                needed: 12,
                actual: 11
            }
        );
        assert_eq!(
            decode_with("aabbccddeez", DecodeMode::Lenient).unwrap_err(),
            DecodeError::InvalidHex {
                field: FrameField::Argc,
                offset: 10
            }
        );
    }

    #[test]
    fn test_invalid_argc_hex() {
        let err = decode_with("aabbccddeezzabcd", DecodeMode::Lenient).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidHex {
                field: FrameField::Argc,
                offset: 10
            }
        );
    }

    #[test]
    fn test_invalid_cmd_hex() {
        let err = decode("aabbccddee00abxd").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidHex {
                field: FrameField::Command,
                offset: 14
            }
        );
    }

    #[test]
    fn test_invalid_arg_hex() {
        let err = decode("aabbccddee02abcd01g2").unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidHex {
                field: FrameField::Argument(1),
                offset: 18
            }
        );
    }

    #[test]
    fn test_lenient_truncates_like_a_slice() {
        let decoded = decode_with("aabbccddee03abcd0102", DecodeMode::Lenient).unwrap();
        assert_eq!(decoded.argc, 3);
        assert_eq!(decoded.args, vec!["01", "02", ""]);

        let decoded = decode_with("aabbccddee02ab", DecodeMode::Lenient).unwrap();
        assert_eq!(decoded.cmd, "ab");
        assert_eq!(decoded.args, vec!["", ""]);
    }

    #[test]
    fn test_lenient_half_argument() {
        let decoded = decode_with("aabbccddee02abcd010", DecodeMode::Lenient).unwrap();
        assert_eq!(decoded.args, vec!["01", "0"]);
    }

    #[test]
    fn test_raw_frame_strips_separators() {
        let frame = RawFrame::parse("aa:bb:cc:dd:ee:01:ab:cd:7f").unwrap();
        assert_eq!(frame.as_str(), "aabbccddee01abcd7f");
        assert_eq!(frame.decode().unwrap().args, vec!["7f"]);
    }

    #[test]
    fn test_raw_frame_rejects_empty() {
        assert_eq!(RawFrame::parse("  : ").unwrap_err(), DecodeError::Empty);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let original = DecodedFrame {
            cmd: "0d02".to_string(),
            argc: 2,
            args: vec!["01".to_string(), "ff".to_string()],
        };
        let frame = original.encode(&[0x00, 0x1f, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(frame.as_str(), "001f000000020d0201ff");
        assert_eq!(frame.decode().unwrap(), original);
    }

    #[test]
    fn test_encode_checks_field_widths() {
        let header = [0x00, 0x1f, 0x00, 0x00, 0x00];
        let wide_cmd = DecodedFrame {
            cmd: "0d020".to_string(),
            argc: 0,
            args: Vec::new(),
        };
        assert_eq!(
            wide_cmd.encode(&header).unwrap_err(),
            DecodeError::FieldWidth {
                field: FrameField::Command,
                expected: 4,
                actual: 5
            }
        );

        let short_arg = DecodedFrame {
            cmd: "0d02".to_string(),
            argc: 2,
            args: vec!["01".to_string(), "f".to_string()],
        };
        assert_eq!(
            short_arg.encode(&header).unwrap_err(),
            DecodeError::FieldWidth {
                field: FrameField::Argument(1),
                expected: 2,
                actual: 1
            }
        );

        let bad_digit = DecodedFrame {
            cmd: "0d0x".to_string(),
            argc: 0,
            args: Vec::new(),
        };
        assert_eq!(
            bad_digit.encode(&header).unwrap_err(),
            DecodeError::InvalidHex {
                field: FrameField::Command,
                offset: 15
            }
        );
    }

    #[test]
    fn test_non_ascii_payload_does_not_panic() {
        let err = decode("aabbccddee01abcdé").unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TooShort { .. } | DecodeError::InvalidHex { .. }
        ));
        let decoded = decode_with("aabbccddee01abcdé", DecodeMode::Lenient).unwrap();
        assert_eq!(decoded.args.len(), 1);
    }
}
