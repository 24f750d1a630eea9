//! Gradient tables: a fixed-size array of colors sampled to animate or
//! statically color text.
//!
//! A table is built once, either by interpolating a sorted list of
//! position/color stops or by decoding a base64 blob exported from
//! another session, and is immutable afterwards. Malformed stop sets are
//! rejected at construction time, so the sampling path never sees a bad
//! table.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::color::{Rgb, lerp_hsv, lerp_rgb};

/// Smallest allowed table.
pub const MIN_TABLE_LEN: usize = 2;
/// Largest allowed table.
pub const MAX_TABLE_LEN: usize = 1024;
/// Last stop position; stop positions span `0..=STOP_MAX`.
pub const STOP_MAX: u16 = u16::MAX;

/// How a gradient animates across a title's characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationStyle {
    /// Each character keeps a fixed position in the table.
    Static,
    /// The color pattern scrolls across the characters over time.
    Wave,
    /// All characters share one table position that advances over time.
    Pulse,
}

/// Interpolation space used between adjacent stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    /// Direct channel interpolation.
    Rgb,
    /// Hue-preserving interpolation (shorter angular path).
    Hsv,
}

/// A user-placed color stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position within `0..=STOP_MAX`.
    pub position: u16,
    /// Stop color.
    pub color: Rgb,
}

impl GradientStop {
    /// Create a new stop.
    #[must_use]
    pub const fn new(position: u16, color: Rgb) -> Self {
        Self { position, color }
    }
}

/// The persisted form of a gradient, owned and serialized by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientDef {
    /// Unique id referenced from title definitions.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Stop list; a finalized def carries explicit stops at 0 and
    /// `STOP_MAX`.
    pub stops: Vec<GradientStop>,
    /// Requested table size, clamped to `[MIN_TABLE_LEN, MAX_TABLE_LEN]`.
    pub step_count: u32,
    /// Interpolation space between stops.
    pub blend: BlendMode,
    /// Animation behavior of the built table.
    pub style: AnimationStyle,
    /// Animation speed in milliseconds per table step.
    pub throttle_ms: u32,
}

impl GradientDef {
    /// Build the table for a finalized definition.
    ///
    /// Unlike [`GradientTable::interpolate`], this refuses a stop list
    /// without explicit endpoint stops instead of synthesizing them.
    pub fn build(&self) -> Result<GradientTable, GradientError> {
        if self.stops.is_empty() {
            return Err(GradientError::NoStops);
        }
        if !self.stops.iter().any(|s| s.position == 0) {
            return Err(GradientError::MissingEndpoint { position: 0 });
        }
        if !self.stops.iter().any(|s| s.position == STOP_MAX) {
            return Err(GradientError::MissingEndpoint { position: STOP_MAX });
        }
        GradientTable::interpolate(
            &self.name,
            &self.stops,
            self.step_count,
            self.blend,
            self.style,
            self.throttle_ms,
        )
    }
}

/// Errors from building a gradient table. These are construction-time
/// failures; a successfully built table cannot fail to sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradientError {
    /// The stop list was empty.
    NoStops,
    /// A finalized definition lacks an explicit stop at 0 or `STOP_MAX`.
    MissingEndpoint {
        /// The missing endpoint position.
        position: u16,
    },
    /// A sample position fell inside no stop interval.
    UncoveredSample {
        /// The uncovered sample position.
        position: u16,
    },
}

impl fmt::Display for GradientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoStops => write!(f, "gradient has no stops"),
            Self::MissingEndpoint { position } => {
                write!(f, "finalized gradient is missing a stop at {position}")
            }
            Self::UncoveredSample { position } => {
                write!(f, "no stop interval covers sample position {position}")
            }
        }
    }
}

impl std::error::Error for GradientError {}

/// Errors from decoding an imported gradient blob. A failed import
/// leaves existing state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// The blob is not valid base64.
    Base64(base64::DecodeError),
    /// The decoded byte count is not a multiple of 3.
    Truncated {
        /// Decoded byte count.
        len: usize,
    },
    /// The entry count falls outside `[MIN_TABLE_LEN, MAX_TABLE_LEN]`.
    EntryCount {
        /// Decoded entry count.
        count: usize,
    },
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(err) => write!(f, "invalid base64: {err}"),
            Self::Truncated { len } => {
                write!(f, "blob length {len} is not a multiple of 3")
            }
            Self::EntryCount { count } => write!(
                f,
                "blob holds {count} entries, expected {MIN_TABLE_LEN}..={MAX_TABLE_LEN}"
            ),
        }
    }
}

impl std::error::Error for BlobError {}

impl From<base64::DecodeError> for BlobError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Base64(err)
    }
}

/// A built gradient table: a dense array of colors plus the animation
/// behavior of the definition it came from. Immutable after construction
/// and safe to share across rendering contexts.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientTable {
    name: String,
    colors: Vec<Rgb>,
    style: AnimationStyle,
    throttle_ms: u32,
}

impl GradientTable {
    /// Build a table by interpolating a stop list.
    ///
    /// This is the interactive builder entry point: stops are sorted, and
    /// missing endpoint stops at 0 / `STOP_MAX` are synthesized from the
    /// nearest neighbor so a half-edited stop set still previews.
    /// `step_count` is clamped to `[MIN_TABLE_LEN, MAX_TABLE_LEN]`.
    pub fn interpolate(
        name: &str,
        stops: &[GradientStop],
        step_count: u32,
        blend: BlendMode,
        style: AnimationStyle,
        throttle_ms: u32,
    ) -> Result<Self, GradientError> {
        if stops.is_empty() {
            return Err(GradientError::NoStops);
        }

        let mut sorted: Vec<GradientStop> = stops.to_vec();
        sorted.sort_by_key(|s| s.position);
        sorted.dedup_by_key(|s| s.position);

        // Synthesize endpoints from the nearest neighbor.
        if sorted[0].position != 0 {
            sorted.insert(0, GradientStop::new(0, sorted[0].color));
        }
        if sorted[sorted.len() - 1].position != STOP_MAX {
            let last = sorted[sorted.len() - 1].color;
            sorted.push(GradientStop::new(STOP_MAX, last));
        }

        let len = (step_count as usize).clamp(MIN_TABLE_LEN, MAX_TABLE_LEN);
        let mut colors = Vec::with_capacity(len);
        for i in 0..len {
            let position =
                ((i as f64 / (len - 1) as f64) * f64::from(STOP_MAX)).round() as u16;
            colors.push(sample_stops(&sorted, position, blend)?);
        }

        Ok(Self {
            name: name.to_owned(),
            colors,
            style,
            throttle_ms,
        })
    }

    /// Table display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dense color array.
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Number of table entries (always within
    /// `[MIN_TABLE_LEN, MAX_TABLE_LEN]`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Tables are never empty; kept for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Animation behavior.
    #[must_use]
    pub fn style(&self) -> AnimationStyle {
        self.style
    }

    /// Configured animation speed in milliseconds per table step.
    #[must_use]
    pub fn throttle_ms(&self) -> u32 {
        self.throttle_ms
    }

    /// Export the color array as a base64 blob, 3 bytes (R, G, B) per
    /// entry in table order.
    #[must_use]
    pub fn to_base64(&self) -> String {
        let mut raw = Vec::with_capacity(self.colors.len() * 3);
        for color in &self.colors {
            raw.extend_from_slice(&[color.r, color.g, color.b]);
        }
        STANDARD.encode(raw)
    }

    /// Decode a table from an exported blob.
    pub fn from_base64(
        name: &str,
        style: AnimationStyle,
        throttle_ms: u32,
        blob: &str,
    ) -> Result<Self, BlobError> {
        Self::decode_blob(name, style, throttle_ms, blob).inspect_err(|err| {
            warn!(name, %err, "gradient blob import failed");
        })
    }

    fn decode_blob(
        name: &str,
        style: AnimationStyle,
        throttle_ms: u32,
        blob: &str,
    ) -> Result<Self, BlobError> {
        let raw = STANDARD.decode(blob.trim())?;
        if raw.len() % 3 != 0 {
            return Err(BlobError::Truncated { len: raw.len() });
        }
        let count = raw.len() / 3;
        if !(MIN_TABLE_LEN..=MAX_TABLE_LEN).contains(&count) {
            return Err(BlobError::EntryCount { count });
        }
        let colors = raw
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self {
            name: name.to_owned(),
            colors,
            style,
            throttle_ms,
        })
    }
}

/// Resolve one sample position against a sorted, endpoint-covered stop
/// list: verbatim color on an exact hit, interpolated within the unique
/// enclosing interval otherwise.
fn sample_stops(
    stops: &[GradientStop],
    position: u16,
    blend: BlendMode,
) -> Result<Rgb, GradientError> {
    if let Some(stop) = stops.iter().find(|s| s.position == position) {
        return Ok(stop.color);
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if lo.position < position && position < hi.position {
            let t = f64::from(position - lo.position)
                / f64::from(hi.position - lo.position);
            return Ok(match blend {
                BlendMode::Rgb => lerp_rgb(lo.color, hi.color, t),
                BlendMode::Hsv => lerp_hsv(lo.color, hi.color, t),
            });
        }
    }
    Err(GradientError::UncoveredSample { position })
}
