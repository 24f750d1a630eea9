//! Palettes: ordered per-segment coloring rules laid across a title's
//! characters.
//!
//! A palette is a list of paints. Each paint consumes a fixed number of
//! characters (or the remainder of the string) and colors them with one
//! rule: a solid color, alternating pair, a gradient in RGB or CIELAB
//! space, or a hue rotation in either angular direction. Painting yields
//! runs, the intermediate form the encoder turns into payload chunks.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::color::{HueDirection, Rgb, lerp_lab, lerp_rgb, rotate_hue};

/// Coloring rule of a single paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaintKind {
    /// One color for the whole segment.
    Static,
    /// Primary color on even local indices, secondary on odd.
    Alternating,
    /// Channel-wise gradient from primary to secondary.
    GradientRgb,
    /// Perceptual gradient from primary to secondary in CIELAB space.
    GradientLab,
    /// Hue rotation from primary to secondary, decreasing hue angle.
    RainbowCw,
    /// Hue rotation from primary to secondary, increasing hue angle.
    RainbowCcw,
}

/// One paint: a coloring rule over a contiguous span of characters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    /// Coloring rule.
    pub kind: PaintKind,
    /// Primary color.
    pub color: Rgb,
    /// Secondary color; rules that need one fall back to the primary
    /// when absent.
    pub secondary: Option<Rgb>,
    /// Characters consumed; 0 means the remainder of the string, which
    /// only has effect on the final paint.
    pub length: u32,
}

impl Paint {
    /// A solid paint over `length` characters.
    #[must_use]
    pub const fn solid(color: Rgb, length: u32) -> Self {
        Self {
            kind: PaintKind::Static,
            color,
            secondary: None,
            length,
        }
    }

    /// A two-color paint of the given kind over `length` characters.
    #[must_use]
    pub const fn blend(kind: PaintKind, color: Rgb, secondary: Rgb, length: u32) -> Self {
        Self {
            kind,
            color,
            secondary: Some(secondary),
            length,
        }
    }

    fn second(&self) -> Rgb {
        self.secondary.unwrap_or(self.color)
    }

    /// Color for the character at local index `i` of a span covering
    /// `span_len` characters.
    fn color_at(&self, i: usize, span_len: usize) -> Rgb {
        let t = if span_len <= 1 {
            0.0
        } else {
            i as f64 / (span_len - 1) as f64
        };
        match self.kind {
            PaintKind::Static => self.color,
            PaintKind::Alternating => {
                if i % 2 == 0 {
                    self.color
                } else {
                    self.second()
                }
            }
            PaintKind::GradientRgb => lerp_rgb(self.color, self.second(), t),
            PaintKind::GradientLab => lerp_lab(self.color, self.second(), t),
            PaintKind::RainbowCw => {
                rotate_hue(self.color, self.second(), t, HueDirection::Clockwise)
            }
            PaintKind::RainbowCcw => {
                rotate_hue(self.color, self.second(), t, HueDirection::CounterClockwise)
            }
        }
    }
}

/// An ordered set of paints with a name and unique id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Unique id referenced from title definitions.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Paints, applied in order over the title's characters.
    pub paints: Vec<Paint>,
}

/// A painted run of characters, ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintedRun {
    /// Characters no paint covers.
    Plain(String),
    /// A whole run under one color. Encoded as a single start/end pair,
    /// which changes the emitted byte count and must be preserved.
    Uniform {
        /// Run text.
        text: String,
        /// Run color.
        color: Rgb,
    },
    /// Per-character colors; `colors` aligns with the graphemes of
    /// `text`.
    PerChar {
        /// Run text.
        text: String,
        /// One color per grapheme of `text`.
        colors: Vec<Rgb>,
    },
}

impl Palette {
    /// Lay the paints over `title`, consuming characters in list order.
    ///
    /// Characters beyond the last paint come back as a trailing
    /// [`PaintedRun::Plain`] run.
    #[must_use]
    pub fn paint(&self, title: &str) -> Vec<PaintedRun> {
        let graphemes: Vec<&str> = title.graphemes(true).collect();
        let mut runs = Vec::new();
        let mut cursor = 0;

        for paint in &self.paints {
            if cursor >= graphemes.len() {
                break;
            }
            let remaining = graphemes.len() - cursor;
            let span_len = if paint.length == 0 {
                remaining
            } else {
                (paint.length as usize).min(remaining)
            };
            let span = &graphemes[cursor..cursor + span_len];
            cursor += span_len;

            match paint.kind {
                PaintKind::Static => runs.push(PaintedRun::Uniform {
                    text: span.concat(),
                    color: paint.color,
                }),
                _ => runs.push(PaintedRun::PerChar {
                    text: span.concat(),
                    colors: (0..span_len).map(|i| paint.color_at(i, span_len)).collect(),
                }),
            }
        }

        if cursor < graphemes.len() {
            runs.push(PaintedRun::Plain(graphemes[cursor..].concat()));
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    fn palette(paints: Vec<Paint>) -> Palette {
        Palette {
            id: 1,
            name: "test".into(),
            paints,
        }
    }

    #[test]
    fn static_paint_is_one_uniform_run() {
        let p = palette(vec![Paint::solid(RED, 4)]);
        let runs = p.paint("ABCD");
        assert_eq!(
            runs,
            vec![PaintedRun::Uniform {
                text: "ABCD".into(),
                color: RED
            }]
        );
    }

    #[test]
    fn uncovered_characters_trail_as_plain() {
        let p = palette(vec![Paint::solid(RED, 2)]);
        let runs = p.paint("ABCDEF");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1], PaintedRun::Plain("CDEF".into()));
    }

    #[test]
    fn zero_length_paint_consumes_remainder() {
        let p = palette(vec![
            Paint::blend(PaintKind::GradientRgb, Rgb::WHITE, Rgb::BLACK, 5),
            Paint::solid(RED, 0),
        ]);
        let runs = p.paint("HELLOWORLD");
        assert_eq!(runs.len(), 2);
        match &runs[0] {
            PaintedRun::PerChar { text, colors } => {
                assert_eq!(text, "HELLO");
                assert_eq!(colors.len(), 5);
                // Distinct interpolated colors, ending at black.
                for pair in colors.windows(2) {
                    assert_ne!(pair[0], pair[1]);
                }
                assert_eq!(colors[0], Rgb::WHITE);
                assert_eq!(colors[4], Rgb::BLACK);
            }
            other => panic!("expected per-char run, got {other:?}"),
        }
        assert_eq!(
            runs[1],
            PaintedRun::Uniform {
                text: "WORLD".into(),
                color: RED
            }
        );
    }

    #[test]
    fn zero_length_paint_starves_later_paints() {
        let p = palette(vec![Paint::solid(RED, 0), Paint::solid(BLUE, 3)]);
        let runs = p.paint("ABCDE");
        assert_eq!(
            runs,
            vec![PaintedRun::Uniform {
                text: "ABCDE".into(),
                color: RED
            }]
        );
    }

    #[test]
    fn alternating_is_binary() {
        let p = palette(vec![Paint::blend(PaintKind::Alternating, RED, BLUE, 5)]);
        let runs = p.paint("ABCDE");
        match &runs[0] {
            PaintedRun::PerChar { colors, .. } => {
                assert_eq!(colors, &[RED, BLUE, RED, BLUE, RED]);
            }
            other => panic!("expected per-char run, got {other:?}"),
        }
    }

    #[test]
    fn alternating_without_secondary_stays_primary() {
        let p = palette(vec![Paint {
            kind: PaintKind::Alternating,
            color: RED,
            secondary: None,
            length: 4,
        }]);
        match &p.paint("ABCD")[0] {
            PaintedRun::PerChar { colors, .. } => {
                assert!(colors.iter().all(|&c| c == RED));
            }
            other => panic!("expected per-char run, got {other:?}"),
        }
    }

    #[test]
    fn single_character_span_uses_progress_zero() {
        let p = palette(vec![Paint::blend(PaintKind::GradientRgb, RED, BLUE, 1)]);
        match &p.paint("A")[0] {
            PaintedRun::PerChar { colors, .. } => assert_eq!(colors, &[RED]),
            other => panic!("expected per-char run, got {other:?}"),
        }
    }

    #[test]
    fn rainbow_directions_differ_midway() {
        let cw = palette(vec![Paint::blend(PaintKind::RainbowCw, RED, Rgb::new(0, 255, 0), 3)]);
        let ccw = palette(vec![Paint::blend(PaintKind::RainbowCcw, RED, Rgb::new(0, 255, 0), 3)]);
        let mid_cw = match &cw.paint("ABC")[0] {
            PaintedRun::PerChar { colors, .. } => colors[1],
            other => panic!("expected per-char run, got {other:?}"),
        };
        let mid_ccw = match &ccw.paint("ABC")[0] {
            PaintedRun::PerChar { colors, .. } => colors[1],
            other => panic!("expected per-char run, got {other:?}"),
        };
        assert_ne!(mid_cw, mid_ccw);
        // Both meet at the endpoints.
        let last_cw = match &cw.paint("ABC")[0] {
            PaintedRun::PerChar { colors, .. } => colors[2],
            other => panic!("expected per-char run, got {other:?}"),
        };
        assert_eq!(last_cw, Rgb::new(0, 255, 0));
    }

    #[test]
    fn paint_counts_graphemes_not_bytes() {
        let p = palette(vec![Paint::solid(RED, 2)]);
        let runs = p.paint("héllo");
        assert_eq!(
            runs[0],
            PaintedRun::Uniform {
                text: "hé".into(),
                color: RED
            }
        );
        assert_eq!(runs[1], PaintedRun::Plain("llo".into()));
    }

    #[test]
    fn palette_serde_round_trip() {
        let p = palette(vec![
            Paint::solid(RED, 3),
            Paint::blend(PaintKind::GradientLab, RED, BLUE, 0),
        ]);
        let json = serde_json::to_string(&p).unwrap();
        let back: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
