//! # Built-in Sentence Decoders
//!
//! Strongly-typed records for the GGA and RMC sentences and the [`Parsable`] trait that
//! decodes them. `X::parser` can be handed straight to
//! [`Context::add_parser`](crate::Context::add_parser):
//!
//! ```rust
//! use nmea0183_stream::{Context, nmea_content::{GGA, Parsable, RMC}};
//!
//! let mut context = Context::new(());
//! let gga = context.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();
//! let rmc = context.add_parser("GPRMC", RMC::parser, RMC::default()).unwrap();
//! assert_ne!(gga.id(), rmc.id());
//! ```
//!
//! The field parsers follow the conventions shared by most receivers: an empty field
//! decodes to [`None`], latitudes and longitudes are signed degrees (south and west are
//! negative) and values with a unit field are only reported when the unit is present.

pub(crate) mod parse;
mod sentences;

pub use sentences::*;
