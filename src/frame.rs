//! Reassembly of advertisement frames from `hcidump --raw` text.
//!
//! hcidump prints one HCI packet per record. The first line of a record
//! starts with `>` (incoming) and continuation lines are indented, e.g.:
//!
//! ```text
//! > 04 3E 2B 02 01 00 01 4F 88 4C 33 B8 CB 1F 02 01 06 1B FF 99
//!   04 05 12 FC 53 94 C3 7C 00 04 FF FC 04 0C AC 36 42 00 CD CB
//!   B8 33 4C 88 4F B5
//! ```
//!
//! A record is only known to be complete once the next `>` line arrives.

/// Line prefix that opens a new capture record.
pub const BOUNDARY_MARKER: char = '>';

/// Bytes of one reassembled record, in the order the tokens arrived.
pub type RawFrame = Vec<u8>;

/// Incremental line-to-frame assembler.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buf: RawFrame,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one line of capture text.
    ///
    /// Returns the previous record when `line` opens a new one and the
    /// previous record collected at least one byte. The tokens of `line`
    /// itself always go into the (possibly fresh) accumulator.
    pub fn feed(&mut self, line: &str) -> Option<RawFrame> {
        let completed = if line.starts_with(BOUNDARY_MARKER) {
            Some(std::mem::take(&mut self.buf)).filter(|frame| !frame.is_empty())
        } else {
            None
        };

        self.buf.extend(line.split_whitespace().filter_map(parse_hex_byte));
        completed
    }

    /// Number of bytes collected for the record in progress.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

/// Parse a two-digit hex token. Anything else (the `>` marker, words in
/// hcidump's banner) is not a byte.
fn parse_hex_byte(token: &str) -> Option<u8> {
    if token.len() != 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(token, 16).ok()
}
