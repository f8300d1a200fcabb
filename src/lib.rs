//! # NMEA 0183 Stream Parser
//!
//! This library rebuilds NMEA 0183 sentences of the form `$HHH,D1,D2,...,Dn*CC\r\n`
//! from a byte stream that arrives in arbitrary pieces, such as reads from a serial
//! port, and decodes them with parsers registered per sentence identifier.
//!
//! The stream is handled in three stages:
//! - The [`Reassembler`] frames sentences byte by byte and verifies their checksum
//! - The [`Registry`] looks up the parser registered for the sentence identifier
//! - The parser decodes the fields into its record and calls its [`Callout`], if any
//!
//! Everything lives in a [`Context`], which is driven through `&mut self` and never
//! shares state with another context.
//!
//! ## Usage
//!
//! ```rust
//! use nmea0183_stream::{Context, Sentence, Status, nmea_content::{GGA, Parsable, RMC}};
//!
//! let mut context = Context::new(0usize);
//!
//! let gga = context
//!     .add_parser_with_callout(
//!         "GPGGA",
//!         GGA::parser,
//!         |_: &Sentence<'_>, gga: &GGA, fixes: &mut usize| {
//!             if gga.latitude.is_some() {
//!                 *fixes += 1;
//!             }
//!         },
//!         GGA::default(),
//!     )
//!     .unwrap();
//! let rmc = context.add_parser("GPRMC", RMC::parser, RMC::default()).unwrap();
//!
//! // Sentences may be split anywhere
//! let chunks: [&[u8]; 2] = [
//!     b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n$GPRMC,1235",
//!     b"19,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r\n",
//! ];
//!
//! for chunk in chunks {
//!     let mut remaining = chunk;
//!     while !remaining.is_empty() {
//!         match context.parse_chunk(&mut remaining) {
//!             Status::Completed(parser) if gga == parser => {
//!                 println!("GGA: {:?}", context.record(gga));
//!             }
//!             Status::Completed(parser) if rmc == parser => {
//!                 println!("RMC: {:?}", context.record(rmc));
//!             }
//!             Status::Pending => {}
//!             status => println!("skipped: {status:?}"),
//!         }
//!     }
//! }
//!
//! assert_eq!(*context.user_data(), 1);
//! assert_eq!(context.stats().completed, 2);
//! ```

mod checksum;
mod context;
pub mod error;
pub mod nmea_content;
mod reassembler;
mod registry;

pub use checksum::{checksum, format_checksum, frame};
pub use context::{Context, ContextBuilder, Stats, Status, Statuses};
pub use error::{ConfigError, DecodeError, Error, FramingError, IResult, RegistryError};
pub use reassembler::{
    ChecksumMode, DEFAULT_MAX_SENTENCE_LENGTH, Frame, LineEndingMode, Reassembler, State,
};
pub use registry::{
    Callout, DEFAULT_MAX_PARSERS, Decoder, Dispatched, Handle, MAX_SENTENCE_ID_LENGTH, ParserId,
    Registry, Sentence, SentenceId,
};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
struct README;
