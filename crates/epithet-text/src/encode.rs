//! Styled-text encoding of resolved titles.
//!
//! The encoder turns a title string plus a style into the byte sequence
//! the external rendering consumer understands: UTF-8 text runs
//! interleaved with the payload chunks of [`crate::payload`]. Output is
//! byte-exact and deterministic for identical input, which is what lets
//! the nameplate collaborator compare sequences and skip redundant
//! redraws.

use smallvec::SmallVec;
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use epithet_core::{StyleCache, TitleDefinition, validate_title};
use epithet_style::{GradientTable, Palette, PaintedRun, Rgb};

use crate::payload::{ChunkKind, push_end, push_start};

/// Opening quote placed before the title text.
pub const QUOTE_OPEN: &str = "\u{ab}";
/// Closing quote placed after the title text.
pub const QUOTE_CLOSE: &str = "\u{bb}";

/// Whether to wrap the title in the literal quote pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quoting {
    /// Wrap as «title».
    Quoted,
    /// Emit the bare title.
    Bare,
}

/// Style applied to a title by the encoder.
#[derive(Debug, Clone, Copy)]
pub enum TitleStyle<'a> {
    /// Unstyled text.
    Plain,
    /// One color and/or glow over the whole quoted title.
    Uniform {
        /// Text color.
        color: Option<Rgb>,
        /// Glow color.
        glow: Option<Rgb>,
    },
    /// Per-segment paint rules.
    Palette(&'a Palette),
    /// Colors sampled from a gradient table.
    Gradient {
        /// The built table; carries its own animation style and speed.
        table: &'a GradientTable,
        /// Whether to animate; false freezes the table to its static
        /// mapping.
        animate: bool,
    },
}

/// An encoded title: the byte sequence handed to the rendering consumer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedTitle {
    bytes: Vec<u8>,
}

impl EncodedTitle {
    /// The empty sequence: nothing to display.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bytes: Vec::new() }
    }

    /// The encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume into the raw byte vector.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Accumulates text and chunks, merging adjacent text runs so the
/// output never carries two consecutive pure-text chunks.
struct Emitter {
    bytes: Vec<u8>,
    pending: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            pending: String::new(),
        }
    }

    fn text(&mut self, s: &str) {
        self.pending.push_str(s);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.bytes.extend_from_slice(self.pending.as_bytes());
            self.pending.clear();
        }
    }

    fn start(&mut self, kind: ChunkKind, color: Rgb) {
        self.flush();
        push_start(&mut self.bytes, kind, color);
    }

    fn end(&mut self, kind: ChunkKind) {
        self.flush();
        push_end(&mut self.bytes, kind);
    }

    /// A whole run under one start/end pair.
    fn uniform(&mut self, text: &str, color: Rgb) {
        self.start(ChunkKind::ColorStart, color);
        self.text(text);
        self.end(ChunkKind::ColorEnd);
    }

    /// One start/end pair per grapheme.
    fn per_char(&mut self, text: &str, colors: &[Rgb]) {
        for (grapheme, &color) in text.graphemes(true).zip(colors) {
            self.start(ChunkKind::ColorStart, color);
            self.text(grapheme);
            self.end(ChunkKind::ColorEnd);
        }
    }

    fn finish(mut self) -> EncodedTitle {
        self.flush();
        EncodedTitle { bytes: self.bytes }
    }
}

/// Encode a title under the given style.
///
/// Invalid titles (overlong or containing control characters) refuse to
/// encode: the result is the empty sequence and a warning is logged.
/// `elapsed_ms` feeds gradient animation and is ignored by the other
/// styles.
#[must_use]
pub fn encode(
    text: &str,
    style: &TitleStyle<'_>,
    elapsed_ms: u64,
    quoting: Quoting,
) -> EncodedTitle {
    if let Err(err) = validate_title(text) {
        warn!(%err, "refusing to encode invalid title");
        return EncodedTitle::empty();
    }

    let mut emitter = Emitter::new();
    let quoted = quoting == Quoting::Quoted;

    match *style {
        TitleStyle::Plain
        | TitleStyle::Uniform {
            color: None,
            glow: None,
        } => {
            if quoted {
                emitter.text(QUOTE_OPEN);
            }
            emitter.text(text);
            if quoted {
                emitter.text(QUOTE_CLOSE);
            }
        }
        TitleStyle::Uniform { color, glow } => {
            // Color pair outermost, glow pair nested inside; the quotes
            // take the title's styling.
            if let Some(color) = color {
                emitter.start(ChunkKind::ColorStart, color);
            }
            if let Some(glow) = glow {
                emitter.start(ChunkKind::GlowStart, glow);
            }
            if quoted {
                emitter.text(QUOTE_OPEN);
            }
            emitter.text(text);
            if quoted {
                emitter.text(QUOTE_CLOSE);
            }
            if glow.is_some() {
                emitter.end(ChunkKind::GlowEnd);
            }
            if color.is_some() {
                emitter.end(ChunkKind::ColorEnd);
            }
        }
        TitleStyle::Palette(palette) => {
            if quoted {
                emitter.text(QUOTE_OPEN);
            }
            for run in palette.paint(text) {
                match run {
                    PaintedRun::Plain(t) => emitter.text(&t),
                    PaintedRun::Uniform { text, color } => emitter.uniform(&text, color),
                    PaintedRun::PerChar { text, colors } => {
                        emitter.per_char(&text, &colors);
                    }
                }
            }
            if quoted {
                emitter.text(QUOTE_CLOSE);
            }
        }
        TitleStyle::Gradient { table, animate } => {
            let graphemes: SmallVec<[&str; 32]> = text.graphemes(true).collect();
            let len = graphemes.len();
            let colors: SmallVec<[Rgb; 32]> = (0..len)
                .map(|i| table.sample(i, len, elapsed_ms, table.throttle_ms(), animate))
                .collect();
            if quoted {
                emitter.text(QUOTE_OPEN);
            }
            emitter.per_char(text, &colors);
            if quoted {
                emitter.text(QUOTE_CLOSE);
            }
        }
    }

    emitter.finish()
}

/// Encode a resolved title definition, picking its style.
///
/// Precedence: gradient reference, then palette, then uniform
/// color/glow, then plain. A dangling or unbuildable gradient reference
/// falls back down the chain rather than dropping the title.
#[must_use]
pub fn encode_definition(
    def: &TitleDefinition,
    cache: &mut StyleCache,
    elapsed_ms: u64,
    quoting: Quoting,
) -> EncodedTitle {
    if let Some(gradient_id) = def.gradient {
        match cache.get_or_build(gradient_id) {
            Ok(Some(table)) => {
                let style = TitleStyle::Gradient { table, animate: true };
                return encode(&def.text, &style, elapsed_ms, quoting);
            }
            Ok(None) => {
                warn!(gradient_id, "title references an unknown gradient");
            }
            // Build failures were already reported by the cache.
            Err(_) => {}
        }
    }
    if let Some(palette) = &def.palette {
        return encode(&def.text, &TitleStyle::Palette(palette), elapsed_ms, quoting);
    }
    if def.color.is_some() || def.glow.is_some() {
        let style = TitleStyle::Uniform {
            color: def.color,
            glow: def.glow,
        };
        return encode(&def.text, &style, elapsed_ms, quoting);
    }
    encode(&def.text, &TitleStyle::Plain, elapsed_ms, quoting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{Chunk, decode_chunks};
    use epithet_core::MAX_TITLE_LEN;
    use epithet_style::{
        AnimationStyle, BlendMode, GradientDef, GradientStop, Paint, PaintKind, STOP_MAX,
    };

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn chunks(encoded: &EncodedTitle) -> Vec<Chunk<'_>> {
        decode_chunks(encoded.as_bytes()).unwrap()
    }

    fn control_count(encoded: &EncodedTitle) -> usize {
        chunks(encoded)
            .iter()
            .filter(|c| matches!(c, Chunk::Control { .. }))
            .count()
    }

    #[test]
    fn plain_title_is_one_quoted_text_chunk() {
        let encoded = encode("Adventurer", &TitleStyle::Plain, 0, Quoting::Quoted);
        assert_eq!(chunks(&encoded), vec![Chunk::Text("«Adventurer»")]);
    }

    #[test]
    fn bare_quoting_drops_the_quote_pair() {
        let encoded = encode("Adventurer", &TitleStyle::Plain, 0, Quoting::Bare);
        assert_eq!(encoded.as_bytes(), "Adventurer".as_bytes());
    }

    #[test]
    fn uniform_color_emits_one_pair_around_the_quoted_title() {
        let style = TitleStyle::Uniform { color: Some(RED), glow: None };
        let encoded = encode("Hero", &style, 0, Quoting::Quoted);
        assert_eq!(
            chunks(&encoded),
            vec![
                Chunk::Control {
                    kind: ChunkKind::ColorStart,
                    color: Some(RED),
                },
                Chunk::Text("«Hero»"),
                Chunk::Control {
                    kind: ChunkKind::ColorEnd,
                    color: None,
                },
            ]
        );
    }

    #[test]
    fn glow_nests_inside_color() {
        let style = TitleStyle::Uniform {
            color: Some(RED),
            glow: Some(Rgb::new(0, 0, 200)),
        };
        let encoded = encode("Hero", &style, 0, Quoting::Quoted);
        let kinds: Vec<ChunkKind> = chunks(&encoded)
            .iter()
            .filter_map(|c| match c {
                Chunk::Control { kind, .. } => Some(*kind),
                Chunk::Text(_) => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                ChunkKind::ColorStart,
                ChunkKind::GlowStart,
                ChunkKind::GlowEnd,
                ChunkKind::ColorEnd,
            ]
        );
    }

    #[test]
    fn glow_alone_uses_glow_kinds() {
        let style = TitleStyle::Uniform {
            color: None,
            glow: Some(Rgb::new(0, 0, 200)),
        };
        let encoded = encode("Hero", &style, 0, Quoting::Quoted);
        match chunks(&encoded)[0] {
            Chunk::Control { kind, .. } => assert_eq!(kind, ChunkKind::GlowStart),
            Chunk::Text(_) => panic!("expected a glow start chunk first"),
        }
    }

    #[test]
    fn uniform_with_no_colors_degrades_to_plain() {
        let style = TitleStyle::Uniform { color: None, glow: None };
        let encoded = encode("Hero", &style, 0, Quoting::Quoted);
        assert_eq!(chunks(&encoded), vec![Chunk::Text("«Hero»")]);
    }

    #[test]
    fn static_palette_segment_emits_one_pair_not_per_character() {
        let palette = Palette {
            id: 1,
            name: "solid".into(),
            paints: vec![Paint::solid(RED, 4)],
        };
        let encoded = encode("ABCD", &TitleStyle::Palette(&palette), 0, Quoting::Quoted);
        // One start + one end, regardless of the four characters covered.
        assert_eq!(control_count(&encoded), 2);
    }

    #[test]
    fn gradient_then_static_palette_scenario() {
        // GradientRgb(white→black, 5) then Static(red, remainder) over a
        // ten-character title.
        let palette = Palette {
            id: 1,
            name: "mix".into(),
            paints: vec![
                Paint::blend(PaintKind::GradientRgb, Rgb::WHITE, Rgb::BLACK, 5),
                Paint::solid(RED, 0),
            ],
        };
        let encoded =
            encode("HELLOWORLD", &TitleStyle::Palette(&palette), 0, Quoting::Quoted);
        let decoded = chunks(&encoded);

        // Five per-character pairs plus one pair for the remainder.
        let starts: Vec<Rgb> = decoded
            .iter()
            .filter_map(|c| match c {
                Chunk::Control { kind: ChunkKind::ColorStart, color } => *color,
                _ => None,
            })
            .collect();
        assert_eq!(starts.len(), 6);
        // The gradient colors are pairwise distinct and end near black
        // (clamped to 1 per channel).
        for pair in starts[..5].windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        assert_eq!(starts[4], Rgb::new(1, 1, 1));
        assert_eq!(starts[5], RED);

        // The red remainder is one five-character run.
        assert!(decoded.contains(&Chunk::Text("WORLD")));
    }

    #[test]
    fn palette_leftover_text_merges_with_closing_quote() {
        let palette = Palette {
            id: 1,
            name: "partial".into(),
            paints: vec![Paint::solid(RED, 2)],
        };
        let encoded = encode("ABCD", &TitleStyle::Palette(&palette), 0, Quoting::Quoted);
        let decoded = chunks(&encoded);
        // The uncovered "CD" and the closing quote arrive as one text
        // chunk; adjacent text runs are merged before emission.
        assert_eq!(decoded.last(), Some(&Chunk::Text("CD»")));
    }

    #[test]
    fn gradient_colors_every_character() {
        let def = GradientDef {
            id: 9,
            name: "wb".into(),
            stops: vec![
                GradientStop::new(0, Rgb::WHITE),
                GradientStop::new(STOP_MAX, Rgb::BLACK),
            ],
            step_count: 64,
            blend: BlendMode::Rgb,
            style: AnimationStyle::Wave,
            throttle_ms: 5,
        };
        let table = def.build().unwrap();
        let style = TitleStyle::Gradient { table: &table, animate: true };
        let encoded = encode("Hero", &style, 0, Quoting::Quoted);
        // One pair per character.
        assert_eq!(control_count(&encoded), 8);
    }

    #[test]
    fn encoding_is_deterministic() {
        let style = TitleStyle::Uniform { color: Some(RED), glow: None };
        let a = encode("Hero", &style, 1234, Quoting::Quoted);
        let b = encode("Hero", &style, 1234, Quoting::Quoted);
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_titles_encode_to_nothing() {
        let overlong = "x".repeat(MAX_TITLE_LEN + 1);
        let encoded = encode(&overlong, &TitleStyle::Plain, 0, Quoting::Quoted);
        assert!(encoded.is_empty());

        let control = "bad\u{2}title";
        let encoded = encode(control, &TitleStyle::Plain, 0, Quoting::Quoted);
        assert!(encoded.is_empty());
    }

    // ========================================================================
    // Definition-driven encoding
    // ========================================================================

    #[test]
    fn definition_prefers_gradient_over_palette_and_color() {
        let mut def = TitleDefinition::new(1, "Hero");
        def.gradient = Some(9);
        def.color = Some(RED);
        let mut cache = StyleCache::with_defs([GradientDef {
            id: 9,
            name: "wb".into(),
            stops: vec![
                GradientStop::new(0, Rgb::WHITE),
                GradientStop::new(STOP_MAX, Rgb::BLACK),
            ],
            step_count: 16,
            blend: BlendMode::Rgb,
            style: AnimationStyle::Pulse,
            throttle_ms: 5,
        }]);
        let encoded = encode_definition(&def, &mut cache, 0, Quoting::Quoted);
        // Four characters, one pair each: gradient path, not uniform.
        assert_eq!(control_count(&encoded), 8);
    }

    #[test]
    fn dangling_gradient_falls_back_to_uniform_color() {
        let mut def = TitleDefinition::new(1, "Hero");
        def.gradient = Some(404);
        def.color = Some(RED);
        let mut cache = StyleCache::new();
        let encoded = encode_definition(&def, &mut cache, 0, Quoting::Quoted);
        assert_eq!(control_count(&encoded), 2);
    }

    #[test]
    fn bare_definition_encodes_plain() {
        let def = TitleDefinition::new(1, "Hero");
        let mut cache = StyleCache::new();
        let encoded = encode_definition(&def, &mut cache, 0, Quoting::Quoted);
        assert_eq!(chunks(&encoded), vec![Chunk::Text("«Hero»")]);
    }
}
