//! # Sentence Reassembler
//!
//! A byte-at-a-time state machine that rebuilds `$HHH,D1,D2,...,Dn*CC\r\n` sentences
//! from an unreliable stream. Bytes outside a sentence are discarded, the checksum is
//! accumulated while the payload is collected, and a payload is only released once its
//! checksum and line ending have been verified.
//!
//! The reassembler does not interpret the payload; the [`Context`](crate::Context)
//! hands it to the [`Registry`](crate::Registry) for decoding.

use log::trace;

use crate::{
    checksum::{CHECKSUM_MARKER, START, fold, hex_digit},
    error::{ConfigError, FramingError},
};

/// Default bound on the payload length (bytes between `$` and `*`).
pub const DEFAULT_MAX_SENTENCE_LENGTH: usize = 255;

/// Defines how the reassembler should handle sentence checksums.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumMode {
    #[default]
    /// Checksum is required and must be present.
    ///
    /// A line that ends before a `*` is reported as [`FramingError::MissingChecksum`].
    Required,

    /// Checksum is optional but will be validated if present.
    ///
    /// A `\r` before any `*` ends the payload, which is then released unverified.
    /// Use this mode with legacy equipment that does not always emit checksums.
    Optional,
}

/// Defines how the reassembler should handle CRLF line endings.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineEndingMode {
    #[default]
    /// Every sentence must end with `\r\n`.
    ///
    /// This is the standard NMEA 0183 format for serial links and log files.
    Required,

    /// Sentences carry no line ending and complete on their second checksum digit.
    ///
    /// Useful for transports that strip line endings. Requires checksums.
    Forbidden,
}

/// Position of the reassembler within a sentence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Idle, discarding bytes until a `$`.
    #[default]
    WaitStart,
    /// Accumulating payload bytes until a `*`.
    Collecting,
    /// Expecting the first checksum digit.
    WaitChecksumHi,
    /// Expecting the second checksum digit.
    WaitChecksumLo { high: u8 },
    /// Expecting the `\r\n` line ending.
    WaitTerminator { carriage_return: bool },
}

/// Outcome of a byte that finished a sentence, successfully or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// A payload is ready; read it with [`Reassembler::payload`].
    Complete,
    /// The transmitted checksum does not match the payload.
    ChecksumMismatch { expected: u8, found: u8 },
    /// The sentence was abandoned.
    Invalid(FramingError),
}

/// Incremental sentence framer.
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::{Frame, Reassembler};
///
/// let mut reassembler = Reassembler::default();
/// let mut frames = b"$GPGSV,3,2,12,01,40,083,45*44\r\n"
///     .iter()
///     .filter_map(|&byte| reassembler.push(byte));
///
/// assert_eq!(frames.next(), Some(Frame::Complete));
/// assert_eq!(reassembler.payload(), "GPGSV,3,2,12,01,40,083,45");
/// ```
#[derive(Debug, Clone)]
pub struct Reassembler {
    state: State,
    buffer: String,
    max_len: usize,
    running: u8,
    found: Option<u8>,
    checksum_mode: ChecksumMode,
    line_ending_mode: LineEndingMode,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::unchecked(
            DEFAULT_MAX_SENTENCE_LENGTH,
            ChecksumMode::default(),
            LineEndingMode::default(),
        )
    }
}

impl Reassembler {
    /// Creates an idle reassembler whose payloads may hold at most `max_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `max_len` is zero or if optional checksums are
    /// combined with forbidden line endings.
    pub fn new(
        max_len: usize,
        checksum_mode: ChecksumMode,
        line_ending_mode: LineEndingMode,
    ) -> Result<Self, ConfigError> {
        if max_len == 0 {
            return Err(ConfigError::ZeroSentenceLength);
        }

        if checksum_mode == ChecksumMode::Optional && line_ending_mode == LineEndingMode::Forbidden {
            return Err(ConfigError::UnterminatedFraming);
        }

        Ok(Self::unchecked(max_len, checksum_mode, line_ending_mode))
    }

    fn unchecked(max_len: usize, checksum_mode: ChecksumMode, line_ending_mode: LineEndingMode) -> Self {
        Reassembler {
            state: State::WaitStart,
            buffer: String::with_capacity(max_len),
            max_len,
            running: 0,
            found: None,
            checksum_mode,
            line_ending_mode,
        }
    }

    /// Current position within a sentence.
    pub fn state(&self) -> State {
        self.state
    }

    /// `true` when no sentence is in progress.
    pub fn is_idle(&self) -> bool {
        self.state == State::WaitStart
    }

    /// Maximum payload length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// The payload of the last [`Frame::Complete`], without `$`, checksum or line ending.
    ///
    /// Valid until the next `$` is pushed.
    pub fn payload(&self) -> &str {
        &self.buffer
    }

    /// The transmitted checksum of the last [`Frame::Complete`].
    ///
    /// [`None`] when the sentence carried no checksum ([`ChecksumMode::Optional`]).
    pub fn checksum(&self) -> Option<u8> {
        self.found
    }

    /// Drops any partial sentence and returns to [`State::WaitStart`].
    pub fn reset(&mut self) {
        self.state = State::WaitStart;
        self.buffer.clear();
        self.running = 0;
        self.found = None;
    }

    /// Consumes one byte.
    ///
    /// Returns [`Some`] when this byte finished a sentence, either with a payload ready
    /// for dispatch or with the reason it was dropped, and [`None`] otherwise.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        if byte == START {
            let interrupted = !self.is_idle();
            self.start();

            return interrupted.then_some(Frame::Invalid(FramingError::Interrupted));
        }

        match self.state {
            State::WaitStart => {
                trace!("discarding 0x{byte:02X} outside of a sentence");
                None
            }
            State::Collecting => self.collect(byte),
            State::WaitChecksumHi => match hex_digit(byte) {
                Some(high) => {
                    self.state = State::WaitChecksumLo { high };
                    None
                }
                None => self.abort(FramingError::InvalidChecksumDigit(byte)),
            },
            State::WaitChecksumLo { high } => match hex_digit(byte) {
                Some(low) => self.verify(high << 4 | low),
                None => self.abort(FramingError::InvalidChecksumDigit(byte)),
            },
            State::WaitTerminator {
                carriage_return: false,
            } if byte == b'\r' => {
                self.state = State::WaitTerminator {
                    carriage_return: true,
                };
                None
            }
            State::WaitTerminator {
                carriage_return: true,
            } if byte == b'\n' => self.complete(),
            State::WaitTerminator { .. } => self.abort(FramingError::MissingTerminator(byte)),
        }
    }

    fn start(&mut self) {
        self.reset();
        self.state = State::Collecting;
    }

    fn collect(&mut self, byte: u8) -> Option<Frame> {
        match byte {
            CHECKSUM_MARKER => {
                self.state = State::WaitChecksumHi;
                None
            }
            b'\r' if self.checksum_mode == ChecksumMode::Optional
                && self.line_ending_mode == LineEndingMode::Required =>
            {
                self.state = State::WaitTerminator {
                    carriage_return: true,
                };
                None
            }
            b'\r' | b'\n' => self.abort(FramingError::MissingChecksum),
            _ if !byte.is_ascii() => self.abort(FramingError::NonAscii(byte)),
            _ if self.buffer.len() >= self.max_len => {
                self.abort(FramingError::Overflow(self.max_len))
            }
            _ => {
                self.buffer.push(char::from(byte));
                self.running = fold(self.running, byte);
                None
            }
        }
    }

    fn verify(&mut self, found: u8) -> Option<Frame> {
        let expected = self.running;

        if found != expected {
            self.reset();
            return Some(Frame::ChecksumMismatch { expected, found });
        }

        self.found = Some(found);

        match self.line_ending_mode {
            LineEndingMode::Required => {
                self.state = State::WaitTerminator {
                    carriage_return: false,
                };
                None
            }
            LineEndingMode::Forbidden => self.complete(),
        }
    }

    // The payload stays in the buffer until the next start marker clears it.
    fn complete(&mut self) -> Option<Frame> {
        self.state = State::WaitStart;
        Some(Frame::Complete)
    }

    fn abort(&mut self, error: FramingError) -> Option<Frame> {
        self.reset();
        Some(Frame::Invalid(error))
    }
}
