//! # Error Types
//!
//! This module defines the error types used throughout the stream parser.
//!
//! [`Error`] is the error carried by the `nom` field decoders. The remaining types are
//! owned values reported by the [`Context`](crate::Context): they never borrow the
//! input, so a [`Status`](crate::Status) can outlive the chunk that produced it.

use nom::error::{ErrorKind, FromExternalError, ParseError};

use crate::registry::SentenceId;

/// Holds the result of field decoding functions.
///
/// It depends on the input type `I`, the output type `O`, and the error type `E`
/// (by default `nom::error::Error<I>`).
///
/// The `Ok` side is a pair containing the remainder of the input (the part of the data that
/// was not parsed) and the produced value. The `Err` side contains an instance of `nom::Err`.
pub type IResult<I, O, E = nom::error::Error<I>> = nom::IResult<I, O, Error<I, E>>;

/// Represents the failures a field decoder can produce.
#[derive(Debug, PartialEq)]
pub enum Error<I, E> {
    /// The sentence fields could not be parsed because their format was invalid.
    ///
    /// This wraps nom's standard parsing errors.
    ParsingError(E),

    /// A field was well-formed but its value is out of range, such as hour 25 or month 13.
    ///
    /// Contains the input starting at the offending field.
    InvalidField(I),
}

impl<I, E> ParseError<I> for Error<I, E>
where
    E: ParseError<I>,
{
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Error::ParsingError(E::from_error_kind(input, kind))
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E, EX> FromExternalError<I, EX> for Error<I, E>
where
    E: FromExternalError<I, EX>,
{
    fn from_external_error(input: I, kind: ErrorKind, e: EX) -> Self {
        Error::ParsingError(E::from_external_error(input, kind, e))
    }
}

/// A sentence was abandoned by the reassembler before it could be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FramingError {
    /// The payload grew past the configured maximum without a checksum marker.
    #[error("sentence exceeded {0} bytes before its checksum marker")]
    Overflow(usize),

    /// A byte outside the ASCII range appeared inside a sentence.
    #[error("non-ASCII byte 0x{0:02X} inside a sentence")]
    NonAscii(u8),

    /// One of the two checksum characters was not a hexadecimal digit.
    #[error("invalid checksum digit 0x{0:02X}")]
    InvalidChecksumDigit(u8),

    /// The line ended before a `*` checksum marker was seen.
    #[error("line ended without a checksum")]
    MissingChecksum,

    /// The checksum was not followed by `\r\n`.
    #[error("expected CR LF after the checksum, found 0x{0:02X}")]
    MissingTerminator(u8),

    /// A `$` arrived before the current sentence was complete.
    ///
    /// The partial sentence is dropped and the `$` starts a new one.
    #[error("sentence interrupted by a new start marker")]
    Interrupted,
}

/// A registered decoder rejected the fields of a sentence.
///
/// Positions are byte offsets into the field list, which starts right after the comma
/// following the sentence identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// A field did not match the expected format.
    #[error("malformed field at offset {position} ({kind:?})")]
    Malformed { position: usize, kind: ErrorKind },

    /// A field was well-formed but held an out of range value.
    #[error("invalid field value at offset {position}")]
    InvalidField { position: usize },

    /// The decoder finished before the end of the sentence.
    #[error("unexpected data after the last field at offset {position}")]
    TrailingData { position: usize },

    /// The decoder asked for more input than the sentence holds.
    #[error("sentence ended before all fields were decoded")]
    Incomplete,
}

impl DecodeError {
    /// Converts a decoder failure over `fields` into an owned error.
    pub(crate) fn from_parse_error(fields: &str, error: Error<&str, nom::error::Error<&str>>) -> Self {
        let position = |rest: &str| fields.len().saturating_sub(rest.len());

        match error {
            Error::ParsingError(e) => DecodeError::Malformed {
                position: position(e.input),
                kind: e.code,
            },
            Error::InvalidField(rest) => DecodeError::InvalidField {
                position: position(rest),
            },
        }
    }
}

/// Registration was refused; the registry is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Every slot of the registry is taken.
    #[error("registry is full ({capacity} parsers)")]
    Full { capacity: usize },

    /// A parser is already registered for this identifier.
    #[error("a parser for {0} is already registered")]
    Duplicate(SentenceId),

    /// The identifier is empty, too long, or contains a framing character.
    #[error("invalid sentence identifier {0:?}")]
    InvalidId(String),
}

/// The [`ContextBuilder`](crate::ContextBuilder) settings cannot frame a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The maximum sentence length is zero.
    #[error("maximum sentence length must be greater than zero")]
    ZeroSentenceLength,

    /// The registry capacity is zero.
    #[error("registry capacity must be greater than zero")]
    ZeroCapacity,

    /// Optional checksums without line endings leave sentences with no end marker.
    #[error("optional checksums require CR LF line endings")]
    UnterminatedFraming,
}
