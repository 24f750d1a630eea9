#![forbid(unsafe_code)]

//! Styling primitives for Epithet: the color model, gradient tables, the
//! animation sampler, and palette painting.
//!
//! Everything in this crate is a pure data transform. Gradient tables
//! are validated at construction and immutable afterwards; sampling and
//! painting never fail and never block.
//!
//! # Example
//! ```
//! use epithet_style::{
//!     AnimationStyle, BlendMode, GradientStop, GradientTable, Rgb,
//! };
//!
//! let stops = [
//!     GradientStop::new(0, Rgb::new(255, 0, 0)),
//!     GradientStop::new(u16::MAX, Rgb::new(0, 0, 255)),
//! ];
//! let table = GradientTable::interpolate(
//!     "ember", &stops, 64, BlendMode::Rgb, AnimationStyle::Wave, 50,
//! )
//! .unwrap();
//! assert_eq!(table.len(), 64);
//! ```

pub mod animate;
pub mod color;
pub mod gradient;
pub mod palette;

pub use animate::{FixedClock, MonotonicClock, TimeSource};
pub use color::{
    Hsv, HueDirection, Lab, Rgb, hsv_to_rgb, lab_to_rgb, lerp_hsv, lerp_lab, lerp_rgb,
    rgb_to_hsv, rgb_to_lab, rotate_hue,
};
pub use gradient::{
    AnimationStyle, BlendMode, BlobError, GradientDef, GradientError, GradientStop,
    GradientTable, MAX_TABLE_LEN, MIN_TABLE_LEN, STOP_MAX,
};
pub use palette::{Paint, PaintKind, Palette, PaintedRun};
