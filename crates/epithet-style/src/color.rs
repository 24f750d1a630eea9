//! Color types and color-space conversions.
//!
//! Everything here is a pure function over value types: RGB↔HSV, the
//! D65-illuminant sRGB↔CIELAB transform, and the interpolators the
//! gradient and palette code is built on. Channel math is done in `f64`
//! and clamped back into range on the way out.

use serde::{Deserialize, Serialize};

/// RGB color (opaque, 8 bits per channel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White (255, 255, 255).
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Black (0, 0, 0).
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Channels as unit-range floats.
    #[must_use]
    pub fn to_unit(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }

    /// Build from unit-range floats, clamping each channel into [0, 1].
    #[must_use]
    pub fn from_unit(channels: [f64; 3]) -> Self {
        let [r, g, b] = channels;
        Self {
            r: (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            g: (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            b: (b.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }
}

/// HSV color: hue in degrees [0, 360), saturation and value in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue angle in degrees.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Value (brightness).
    pub v: f64,
}

/// CIELAB color under the D65 illuminant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness (0 = black, 100 = white).
    pub l: f64,
    /// Green–red axis.
    pub a: f64,
    /// Blue–yellow axis.
    pub b: f64,
}

/// Angular direction for hue rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HueDirection {
    /// Decreasing hue angle.
    Clockwise,
    /// Increasing hue angle.
    CounterClockwise,
}

// ============================================================================
// RGB ↔ HSV
// ============================================================================

/// Convert RGB to HSV.
#[must_use]
pub fn rgb_to_hsv(color: Rgb) -> Hsv {
    let [r, g, b] = color.to_unit();
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta.abs() < f64::EPSILON {
        0.0
    } else if (max - r).abs() < f64::EPSILON {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if (max - g).abs() < f64::EPSILON {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let s = if max.abs() < f64::EPSILON { 0.0 } else { delta / max };

    Hsv { h, s, v: max }
}

/// Convert HSV to RGB.
#[must_use]
pub fn hsv_to_rgb(color: Hsv) -> Rgb {
    let h = color.h.rem_euclid(360.0);
    let s = color.s.clamp(0.0, 1.0);
    let v = color.v.clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb::from_unit([r + m, g + m, b + m])
}

// ============================================================================
// RGB ↔ CIELAB (sRGB, D65)
// ============================================================================

// D65 reference white.
const XN: f64 = 0.950_47;
const YN: f64 = 1.0;
const ZN: f64 = 1.088_83;

// Pivot breakpoints of the standard transform.
const SRGB_PIVOT: f64 = 0.040_45;
const LAB_EPSILON: f64 = 0.008_856;

/// Invert sRGB gamma on a single channel.
fn srgb_to_linear(c: f64) -> f64 {
    if c > SRGB_PIVOT {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// Apply sRGB gamma on a single channel.
fn linear_to_srgb(c: f64) -> f64 {
    if c > 0.003_130_8 {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * c
    }
}

fn lab_pivot(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn lab_pivot_inv(f: f64) -> f64 {
    let cubed = f * f * f;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        (f - 16.0 / 116.0) / 7.787
    }
}

/// Convert RGB to CIELAB.
#[must_use]
pub fn rgb_to_lab(color: Rgb) -> Lab {
    let [r, g, b] = color.to_unit();
    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);

    let x = (r * 0.412_4 + g * 0.357_6 + b * 0.180_5) / XN;
    let y = (r * 0.212_6 + g * 0.715_2 + b * 0.072_2) / YN;
    let z = (r * 0.019_3 + g * 0.119_2 + b * 0.950_5) / ZN;

    let fx = lab_pivot(x);
    let fy = lab_pivot(y);
    let fz = lab_pivot(z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert CIELAB back to RGB. Out-of-gamut values are clamped.
#[must_use]
pub fn lab_to_rgb(lab: Lab) -> Rgb {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    let x = lab_pivot_inv(fx) * XN;
    let y = lab_pivot_inv(fy) * YN;
    let z = lab_pivot_inv(fz) * ZN;

    let r = x * 3.240_6 + y * -1.537_2 + z * -0.498_6;
    let g = x * -0.968_9 + y * 1.875_8 + z * 0.041_5;
    let b = x * 0.055_7 + y * -0.204_0 + z * 1.057_0;

    Rgb::from_unit([
        linear_to_srgb(r.clamp(0.0, 1.0)),
        linear_to_srgb(g.clamp(0.0, 1.0)),
        linear_to_srgb(b.clamp(0.0, 1.0)),
    ])
}

// ============================================================================
// Interpolation
// ============================================================================

/// Interpolate two colors channel-wise in RGB space.
#[must_use]
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let [ar, ag, ab] = a.to_unit();
    let [br, bg, bb] = b.to_unit();
    Rgb::from_unit([
        ar + (br - ar) * t,
        ag + (bg - ag) * t,
        ab + (bb - ab) * t,
    ])
}

/// Interpolate two colors in CIELAB space.
#[must_use]
pub fn lerp_lab(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let la = rgb_to_lab(a);
    let lb = rgb_to_lab(b);
    lab_to_rgb(Lab {
        l: la.l + (lb.l - la.l) * t,
        a: la.a + (lb.a - la.a) * t,
        b: la.b + (lb.b - la.b) * t,
    })
}

/// Interpolate two colors in HSV space, taking the shorter of the two
/// angular paths between the hues (wrap-around at 360°). Saturation and
/// value are interpolated linearly.
#[must_use]
pub fn lerp_hsv(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ha = rgb_to_hsv(a);
    let hb = rgb_to_hsv(b);

    let mut delta = hb.h - ha.h;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }

    hsv_to_rgb(Hsv {
        h: (ha.h + delta * t).rem_euclid(360.0),
        s: ha.s + (hb.s - ha.s) * t,
        v: ha.v + (hb.v - ha.v) * t,
    })
}

/// Interpolate two colors by rotating the hue from `a` toward `b` in the
/// given angular direction, wrapping at 360°. Saturation and value are
/// interpolated linearly.
#[must_use]
pub fn rotate_hue(a: Rgb, b: Rgb, t: f64, direction: HueDirection) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let ha = rgb_to_hsv(a);
    let hb = rgb_to_hsv(b);

    let delta = match direction {
        HueDirection::CounterClockwise => (hb.h - ha.h).rem_euclid(360.0),
        HueDirection::Clockwise => -((ha.h - hb.h).rem_euclid(360.0)),
    };

    hsv_to_rgb(Hsv {
        h: (ha.h + delta * t).rem_euclid(360.0),
        s: ha.s + (hb.s - ha.s) * t,
        v: ha.v + (hb.v - ha.v) * t,
    })
}


#[cfg(test)]
mod round_trip_props {
    use super::*;
    use proptest::prelude::*;

    fn channel_delta(a: Rgb, b: Rgb) -> u16 {
        let dr = (i16::from(a.r) - i16::from(b.r)).unsigned_abs();
        let dg = (i16::from(a.g) - i16::from(b.g)).unsigned_abs();
        let db = (i16::from(a.b) - i16::from(b.b)).unsigned_abs();
        dr.max(dg).max(db)
    }

    proptest! {
        #[test]
        fn hsv_round_trips_within_tolerance(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = Rgb::new(r, g, b);
            let back = hsv_to_rgb(rgb_to_hsv(color));
            prop_assert!(channel_delta(color, back) <= 1, "{color:?} -> {back:?}");
        }

        #[test]
        fn lab_round_trips_within_tolerance(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = Rgb::new(r, g, b);
            let back = lab_to_rgb(rgb_to_lab(color));
            prop_assert!(channel_delta(color, back) <= 2, "{color:?} -> {back:?}");
        }

        #[test]
        fn lerps_stay_in_gamut(
            a in (any::<u8>(), any::<u8>(), any::<u8>()),
            b in (any::<u8>(), any::<u8>(), any::<u8>()),
            t in 0.0f64..=1.0,
        ) {
            // from_unit clamps, so these must never panic and must hit
            // the endpoints exactly.
            let a = Rgb::new(a.0, a.1, a.2);
            let b = Rgb::new(b.0, b.1, b.2);
            let _ = lerp_rgb(a, b, t);
            let _ = lerp_lab(a, b, t);
            let _ = lerp_hsv(a, b, t);
            prop_assert_eq!(lerp_rgb(a, b, 0.0), a);
            prop_assert_eq!(lerp_rgb(a, b, 1.0), b);
        }
    }
}
