//! # Seere Core
//!
//! Core types, errors, and the byte-sink abstraction for the Seere
//! streaming GIF encoder.
//!
//! Seere is named after the 70th spirit of the Ars Goetia, a prince said
//! to pass over the whole earth in the twinkling of an eye - fitting for
//! an encoder that turns still frames into motion as they stream by.
//!
//! ## Contents
//!
//! - [`Error`] / [`Result`] - the error channel shared by every crate
//! - [`ByteSink`] - destination trait for the encoded byte stream,
//!   implemented for free by every [`std::io::Write`]
//! - [`Frame`], [`Repeat`], [`EncoderConfig`] - the caller-facing types

pub mod error;
pub mod sink;
pub mod types;

pub use error::{Error, Result};
pub use sink::ByteSink;
pub use types::{EncoderConfig, Frame, Repeat, MAX_COLORS, PALETTE_BYTES};
