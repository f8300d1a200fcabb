//! # Stream Context
//!
//! The [`Context`] ties a [`Reassembler`] to a [`Registry`] and the caller's user data.
//! Bytes go in through [`Context::parse_chunk`], [`Context::parse_byte`] or
//! [`Context::feed`]; every finished sentence comes out as a [`Status`], and decoded
//! records are written to the registry and reported to their callouts.

use log::{debug, warn};

use crate::{
    error::{ConfigError, DecodeError, FramingError, RegistryError},
    reassembler::{ChecksumMode, DEFAULT_MAX_SENTENCE_LENGTH, Frame, LineEndingMode, Reassembler},
    registry::{
        Callout, DEFAULT_MAX_PARSERS, Decoder, Dispatched, Handle, ParserId, Registry, Sentence,
    },
};

/// What a call into the [`Context`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// No sentence finished; the input was consumed.
    Pending,

    /// A sentence was decoded into the record of this parser.
    Completed(ParserId),

    /// A well-formed sentence had no registered parser.
    ///
    /// Carries the identifier as received, whatever its length.
    Unknown(String),

    /// The transmitted checksum did not match the payload.
    ChecksumMismatch { expected: u8, found: u8 },

    /// The sentence was dropped before dispatch.
    Framing(FramingError),

    /// The registered parser rejected the sentence; its record is unchanged.
    Decode { parser: ParserId, error: DecodeError },
}

impl Status {
    /// `true` for [`Status::Pending`].
    pub fn is_pending(&self) -> bool {
        matches!(self, Status::Pending)
    }

    /// The parser that completed, if any.
    pub fn completed(&self) -> Option<ParserId> {
        match self {
            Status::Completed(parser) => Some(*parser),
            _ => None,
        }
    }

    /// `true` for checksum, framing and decode failures.
    ///
    /// Unknown sentences are not errors.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Status::ChecksumMismatch { .. } | Status::Framing(_) | Status::Decode { .. }
        )
    }
}

/// Running totals of the sentences a [`Context`] has seen.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub completed: u64,
    pub checksum_errors: u64,
    pub framing_errors: u64,
    pub unknown: u64,
    pub decode_errors: u64,
}

impl Stats {
    fn record(&mut self, status: &Status) {
        match status {
            Status::Pending => {}
            Status::Completed(_) => self.completed += 1,
            Status::Unknown(_) => self.unknown += 1,
            Status::ChecksumMismatch { .. } => self.checksum_errors += 1,
            Status::Framing(_) => self.framing_errors += 1,
            Status::Decode { .. } => self.decode_errors += 1,
        }
    }
}

/// Builder for a [`Context`] with non-default framing or capacity.
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::{ChecksumMode, ConfigError, ContextBuilder, LineEndingMode, Status};
///
/// // Sentences without line endings, e.g. from a transport that strips them
/// let mut context = ContextBuilder::new()
///     .line_ending_mode(LineEndingMode::Forbidden)
///     .build(())
///     .unwrap();
///
/// let mut input: &[u8] = b"$GPGSV,3,2,12,01,40,083,45*44";
/// assert!(matches!(context.parse_chunk(&mut input), Status::Unknown(_)));
///
/// // Without checksums or line endings nothing marks the end of a sentence
/// let result = ContextBuilder::new()
///     .checksum_mode(ChecksumMode::Optional)
///     .line_ending_mode(LineEndingMode::Forbidden)
///     .build(());
/// assert_eq!(result.unwrap_err(), ConfigError::UnterminatedFraming);
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    /// Checksum mode for the reassembler.
    checksum_mode: ChecksumMode,

    /// Line ending mode for the reassembler.
    line_ending_mode: LineEndingMode,

    /// Longest accepted payload, in bytes.
    max_sentence_length: usize,

    /// Registry capacity.
    max_parsers: usize,
}

impl ContextBuilder {
    /// Creates a new builder with default settings.
    ///
    /// The default settings are:
    /// - Checksum mode: [`ChecksumMode::Required`]
    /// - Line ending mode: [`LineEndingMode::Required`]
    /// - Maximum sentence length: [`DEFAULT_MAX_SENTENCE_LENGTH`]
    /// - Maximum parsers: [`DEFAULT_MAX_PARSERS`]
    pub fn new() -> Self {
        ContextBuilder {
            checksum_mode: ChecksumMode::Required,
            line_ending_mode: LineEndingMode::Required,
            max_sentence_length: DEFAULT_MAX_SENTENCE_LENGTH,
            max_parsers: DEFAULT_MAX_PARSERS,
        }
    }

    /// Sets the checksum mode.
    ///
    /// # Arguments
    ///
    /// * `mode` - The desired checksum mode:
    ///   - [`ChecksumMode::Required`]: Checksum must be present and valid
    ///   - [`ChecksumMode::Optional`]: Checksum may be absent or must be valid if present
    pub fn checksum_mode(mut self, mode: ChecksumMode) -> Self {
        self.checksum_mode = mode;
        self
    }

    /// Sets the line ending mode.
    ///
    /// # Arguments
    ///
    /// * `mode` - The desired line ending mode:
    ///   - [`LineEndingMode::Required`]: Sentences must end with `\r\n`
    ///   - [`LineEndingMode::Forbidden`]: Sentences end with their checksum
    pub fn line_ending_mode(mut self, mode: LineEndingMode) -> Self {
        self.line_ending_mode = mode;
        self
    }

    /// Sets the longest payload, the bytes between `$` and `*`, that will be buffered.
    ///
    /// Longer sentences are dropped with [`FramingError::Overflow`].
    pub fn max_sentence_length(mut self, length: usize) -> Self {
        self.max_sentence_length = length;
        self
    }

    /// Sets how many parsers the context can register.
    pub fn max_parsers(mut self, capacity: usize) -> Self {
        self.max_parsers = capacity;
        self
    }

    /// Builds an idle context that owns `user_data`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a limit is zero or if optional checksums are combined
    /// with forbidden line endings.
    pub fn build<U: 'static>(self, user_data: U) -> Result<Context<U>, ConfigError> {
        let reassembler = Reassembler::new(
            self.max_sentence_length,
            self.checksum_mode,
            self.line_ending_mode,
        )?;

        if self.max_parsers == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        Ok(self.assemble(reassembler, user_data))
    }

    fn assemble<U: 'static>(self, reassembler: Reassembler, user_data: U) -> Context<U> {
        Context {
            reassembler,
            registry: Registry::with_capacity(self.max_parsers),
            user_data,
            stats: Stats::default(),
        }
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        ContextBuilder::new()
    }
}

/// State of one NMEA 0183 stream.
///
/// `U` is handed to every [`Callout`] as `&mut U`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::{Context, Status, nmea_content::{GGA, Parsable}};
///
/// let mut context = Context::new(());
/// let gga = context.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();
///
/// let mut input: &[u8] =
///     b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";
///
/// assert_eq!(context.parse_chunk(&mut input), Status::Completed(gga.id()));
/// assert!(input.is_empty());
/// assert_eq!(context.record(gga).unwrap().satellite_count, Some(8));
/// ```
#[derive(Debug)]
pub struct Context<U = ()> {
    reassembler: Reassembler,
    registry: Registry<U>,
    user_data: U,
    stats: Stats,
}

impl<U: 'static> Context<U> {
    /// Creates an idle context with the default configuration.
    pub fn new(user_data: U) -> Self {
        ContextBuilder::new().assemble(Reassembler::default(), user_data)
    }

    /// Registers `decoder` for sentences identified by `id`, e.g. `GPGGA`.
    ///
    /// `record` is what [`Context::record`] returns until the first sentence decodes.
    pub fn add_parser<T, D>(&mut self, id: &str, decoder: D, record: T) -> Result<Handle<T>, RegistryError>
    where
        T: 'static,
        D: Decoder<T> + 'static,
    {
        self.registry.insert(id, decoder, None, record)
    }

    /// Registers `decoder` like [`Context::add_parser`], calling `callout` after every
    /// successful decode.
    pub fn add_parser_with_callout<T, D, C>(
        &mut self,
        id: &str,
        decoder: D,
        callout: C,
        record: T,
    ) -> Result<Handle<T>, RegistryError>
    where
        T: 'static,
        D: Decoder<T> + 'static,
        C: Callout<T, U> + 'static,
    {
        self.registry.insert(id, decoder, Some(Box::new(callout)), record)
    }

    /// Feeds one byte.
    pub fn parse_byte(&mut self, byte: u8) -> Status {
        let status = match self.reassembler.push(byte) {
            None => return Status::Pending,
            Some(Frame::Complete) => self.dispatch(),
            Some(Frame::ChecksumMismatch { expected, found }) => {
                warn!("checksum mismatch: expected {expected:02X}, found {found:02X}");
                Status::ChecksumMismatch { expected, found }
            }
            Some(Frame::Invalid(error)) => {
                warn!("dropped sentence: {error}");
                Status::Framing(error)
            }
        };

        self.stats.record(&status);
        status
    }

    /// Consumes bytes from the front of `buffer` until one sentence finishes or the
    /// buffer is exhausted.
    ///
    /// `buffer` is advanced past the consumed bytes; call again with the remainder
    /// until it is empty. [`Status::Pending`] means the whole buffer was consumed
    /// without finishing a sentence.
    pub fn parse_chunk(&mut self, buffer: &mut &[u8]) -> Status {
        let mut consumed = 0;
        let mut status = Status::Pending;

        for &byte in buffer.iter() {
            consumed += 1;
            status = self.parse_byte(byte);

            if !status.is_pending() {
                break;
            }
        }

        *buffer = &buffer[consumed..];
        status
    }

    /// Drains `chunk`, yielding every status other than [`Status::Pending`].
    ///
    /// ```rust
    /// use nmea0183_stream::{Context, Status};
    ///
    /// let mut context = Context::new(());
    /// let statuses: Vec<_> = context
    ///     .feed(b"$GPZDA,123519,04,07,2025,,*43\r\n$GPZDA,123519,04,07,2025,,*00\r\n")
    ///     .collect();
    ///
    /// assert_eq!(statuses.len(), 2);
    /// assert!(matches!(statuses[0], Status::Unknown(_)));
    /// assert!(statuses[1].is_error());
    /// ```
    pub fn feed<'a, 'b>(&'a mut self, chunk: &'b [u8]) -> Statuses<'a, 'b, U> {
        Statuses {
            context: self,
            remaining: chunk,
        }
    }

    /// The record of a registered parser.
    ///
    /// Returns [`None`] for a handle issued by another context.
    pub fn record<T: 'static>(&self, handle: Handle<T>) -> Option<&T> {
        self.registry.record(handle)
    }

    /// The registered parsers.
    pub fn registry(&self) -> &Registry<U> {
        &self.registry
    }

    pub fn user_data(&self) -> &U {
        &self.user_data
    }

    pub fn user_data_mut(&mut self) -> &mut U {
        &mut self.user_data
    }

    pub fn into_user_data(self) -> U {
        self.user_data
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Drops any partially received sentence.
    ///
    /// Registered parsers and their records are kept.
    pub fn reset(&mut self) {
        self.reassembler.reset();
    }

    /// `true` when no sentence is in progress.
    pub fn is_idle(&self) -> bool {
        self.reassembler.is_idle()
    }

    fn dispatch(&mut self) -> Status {
        let sentence = Sentence::split(self.reassembler.payload(), self.reassembler.checksum());

        match self.registry.dispatch(&sentence, &mut self.user_data) {
            Dispatched::Decoded(parser) => {
                debug!("decoded {}", sentence.id());
                Status::Completed(parser)
            }
            Dispatched::Failed(parser, error) => {
                warn!("failed to decode {}: {error}", sentence.id());
                Status::Decode { parser, error }
            }
            Dispatched::Unknown(id) => {
                debug!("no parser registered for {id}");
                Status::Unknown(id)
            }
        }
    }
}

/// Iterator returned by [`Context::feed`].
#[derive(Debug)]
pub struct Statuses<'a, 'b, U> {
    context: &'a mut Context<U>,
    remaining: &'b [u8],
}

impl<'b, U> Statuses<'_, 'b, U> {
    /// The bytes not consumed yet.
    pub fn remaining(&self) -> &'b [u8] {
        self.remaining
    }
}

impl<U: 'static> Iterator for Statuses<'_, '_, U> {
    type Item = Status;

    fn next(&mut self) -> Option<Status> {
        match self.context.parse_chunk(&mut self.remaining) {
            Status::Pending => None,
            status => Some(status),
        }
    }
}
