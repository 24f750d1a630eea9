#![forbid(unsafe_code)]

//! Styled-text encoding for Epithet.
//!
//! Turns a resolved title plus a style (single color, palette, or
//! gradient table) into the compact binary markup the external
//! text-rendering pipeline consumes: UTF-8 text runs bracketed by
//! color/glow payload chunks.
//!
//! # Example
//! ```
//! use epithet_style::Rgb;
//! use epithet_text::{Quoting, TitleStyle, encode};
//!
//! let style = TitleStyle::Uniform {
//!     color: Some(Rgb::new(200, 30, 30)),
//!     glow: None,
//! };
//! let encoded = encode("Hero", &style, 0, Quoting::Quoted);
//! assert!(!encoded.is_empty());
//! ```

pub mod encode;
pub mod payload;

pub use encode::{
    EncodedTitle, QUOTE_CLOSE, QUOTE_OPEN, Quoting, TitleStyle, encode, encode_definition,
};
pub use payload::{
    CHUNK_CLOSE, CHUNK_OPEN, Chunk, ChunkError, ChunkKind, FORMAT_RGB, clamp_channel,
    decode_chunks,
};
