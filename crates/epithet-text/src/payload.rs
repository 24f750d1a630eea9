//! Binary payload chunks for the external text-rendering consumer.
//!
//! A chunk brackets a text run to apply color or glow. The wire shape
//! is:
//!
//! ```text
//! 0x02  kind  len  0xFE  [r g b]  0x03
//! ```
//!
//! `kind` selects color/glow start/end; the three channel bytes are
//! carried by start chunks only. `len` counts every byte after the
//! length byte, terminator included, so a start chunk is `0x05` and an
//! end chunk `0x02`. Channel bytes are clamped to a minimum of 1: an
//! all-zero channel would collide with the consumer's "no color"
//! sentinel, and a clamped channel is visually indistinguishable.

use std::fmt;
use std::str::Utf8Error;

use epithet_style::Rgb;

/// Marker byte opening a chunk.
pub const CHUNK_OPEN: u8 = 0x02;
/// Marker byte terminating a chunk.
pub const CHUNK_CLOSE: u8 = 0x03;
/// Fixed format byte: three raw channel bytes follow on start chunks.
pub const FORMAT_RGB: u8 = 0xFE;

const START_LEN: u8 = 0x05;
const END_LEN: u8 = 0x02;

/// Chunk-type selector byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChunkKind {
    /// Begin a colored run; carries channel bytes.
    ColorStart = 0x48,
    /// End the innermost colored run.
    ColorEnd = 0x49,
    /// Begin a glowing run; carries channel bytes.
    GlowStart = 0x4A,
    /// End the innermost glowing run.
    GlowEnd = 0x4B,
}

impl ChunkKind {
    /// The raw selector byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a selector byte.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x48 => Some(Self::ColorStart),
            0x49 => Some(Self::ColorEnd),
            0x4A => Some(Self::GlowStart),
            0x4B => Some(Self::GlowEnd),
            _ => None,
        }
    }

    /// Whether this kind opens a run (and carries channel bytes).
    #[must_use]
    pub const fn is_start(self) -> bool {
        matches!(self, Self::ColorStart | Self::GlowStart)
    }

    /// The end kind paired with a start kind (identity for end kinds).
    #[must_use]
    pub const fn matching_end(self) -> Self {
        match self {
            Self::ColorStart | Self::ColorEnd => Self::ColorEnd,
            Self::GlowStart | Self::GlowEnd => Self::GlowEnd,
        }
    }
}

/// Clamp a channel byte away from the all-zero sentinel.
#[must_use]
pub const fn clamp_channel(channel: u8) -> u8 {
    if channel == 0 { 1 } else { channel }
}

/// Append a start chunk carrying `color`.
pub fn push_start(buf: &mut Vec<u8>, kind: ChunkKind, color: Rgb) {
    debug_assert!(kind.is_start());
    buf.extend_from_slice(&[
        CHUNK_OPEN,
        kind.as_u8(),
        START_LEN,
        FORMAT_RGB,
        clamp_channel(color.r),
        clamp_channel(color.g),
        clamp_channel(color.b),
        CHUNK_CLOSE,
    ]);
}

/// Append an end chunk.
pub fn push_end(buf: &mut Vec<u8>, kind: ChunkKind) {
    debug_assert!(!kind.is_start());
    buf.extend_from_slice(&[CHUNK_OPEN, kind.as_u8(), END_LEN, FORMAT_RGB, CHUNK_CLOSE]);
}

/// A decoded chunk, borrowing from the encoded byte sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk<'a> {
    /// A run of plain text.
    Text(&'a str),
    /// A control chunk; `color` is present for start kinds.
    Control {
        /// Chunk-type selector.
        kind: ChunkKind,
        /// Channel bytes of a start chunk.
        color: Option<Rgb>,
    },
}

/// Errors from scanning an encoded byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// A selector byte no kind maps to.
    UnknownKind {
        /// The offending byte.
        byte: u8,
    },
    /// The sequence ended inside a chunk.
    Truncated,
    /// A length byte disagreed with its kind.
    BadLength {
        /// The chunk kind.
        kind: ChunkKind,
        /// The length byte found.
        len: u8,
    },
    /// A chunk did not end with [`CHUNK_CLOSE`].
    MissingTerminator,
    /// A text run was not valid UTF-8.
    InvalidText(Utf8Error),
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind { byte } => write!(f, "unknown chunk kind {byte:#04x}"),
            Self::Truncated => write!(f, "byte sequence ends inside a chunk"),
            Self::BadLength { kind, len } => {
                write!(f, "chunk kind {kind:?} carries invalid length {len}")
            }
            Self::MissingTerminator => write!(f, "chunk is not terminated"),
            Self::InvalidText(err) => write!(f, "text run is not valid UTF-8: {err}"),
        }
    }
}

impl std::error::Error for ChunkError {}

/// Scan an encoded sequence back into chunks.
///
/// Used by diagnostics and the encoder's invariant tests; the external
/// consumer has its own decoder.
pub fn decode_chunks(bytes: &[u8]) -> Result<Vec<Chunk<'_>>, ChunkError> {
    let mut chunks = Vec::new();
    let mut rest = bytes;

    while !rest.is_empty() {
        if rest[0] != CHUNK_OPEN {
            let end = rest
                .iter()
                .position(|&b| b == CHUNK_OPEN)
                .unwrap_or(rest.len());
            let text = std::str::from_utf8(&rest[..end]).map_err(ChunkError::InvalidText)?;
            chunks.push(Chunk::Text(text));
            rest = &rest[end..];
            continue;
        }

        // Control chunk: 0x02 kind len ...payload 0x03.
        if rest.len() < 3 {
            return Err(ChunkError::Truncated);
        }
        let kind = ChunkKind::from_u8(rest[1])
            .ok_or(ChunkError::UnknownKind { byte: rest[1] })?;
        let len = rest[2];
        let expected = if kind.is_start() { START_LEN } else { END_LEN };
        if len != expected {
            return Err(ChunkError::BadLength { kind, len });
        }
        let total = 3 + len as usize;
        if rest.len() < total {
            return Err(ChunkError::Truncated);
        }
        if rest[total - 1] != CHUNK_CLOSE {
            return Err(ChunkError::MissingTerminator);
        }
        let color = if kind.is_start() {
            Some(Rgb::new(rest[4], rest[5], rest[6]))
        } else {
            None
        };
        chunks.push(Chunk::Control { kind, color });
        rest = &rest[total..];
    }

    Ok(chunks)
}
