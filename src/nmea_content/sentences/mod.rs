mod gga;
mod rmc;

pub use gga::GGA;
pub use rmc::RMC;

use nom::Parser;

use crate::IResult;

/// A trait for types that can be parsed from the fields of a sentence.
///
/// This trait defines a single method `parser` that takes a string slice
/// and returns an `IResult` containing the remaining input and the parsed value.
///
/// `X::parser` has the shape of a [`Decoder`](crate::Decoder), so any `Parsable`
/// record can be registered directly with a [`Context`](crate::Context).
pub trait Parsable: Sized {
    /// Parses the input and returns a result.
    ///
    /// # Arguments
    ///
    /// * `input` - The fields to parse into `Self`, with the sentence identifier stripped.
    ///
    /// # Returns
    ///
    /// Returns an [`IResult`] containing:
    /// - On success: A tuple of `(remaining_input, parsed_value)`, where `remaining_input`
    ///   is the unparsed portion of the input and `parsed_value` is the successfully parsed
    ///   instance of `Self`.
    /// - On failure: An [`Error`](crate::Error) indicating the parsing error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nmea0183_stream::nmea_content::{GGA, Parsable, Quality};
    ///
    /// let fields = "123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";
    /// let (rest, gga) = GGA::parser(fields).unwrap();
    /// assert!(rest.is_empty());
    /// assert_eq!(gga.fix_quality, Quality::GPSFix);
    /// ```
    fn parser(input: &str) -> IResult<&str, Self>;
}

macro_rules! parsable_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $char:literal => $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl Parsable for $name {
            fn parser(i: &str) -> IResult<&str, Self> {
                nom::branch::alt(($(
                    nom::character::complete::char($char).map(|_| Self::$variant),
                )*)).parse(i)
            }
        }
    };
}

parsable_enum! {
    /// Status Mode Indicator
    pub enum FixStatus {
        /// A - Valid
        'A' => Valid,
        /// V - Invalid
        'V' => Invalid,
    }
}

impl Default for FixStatus {
    fn default() -> Self {
        FixStatus::Invalid
    }
}

parsable_enum! {
    /// FAA Mode Indicator, NMEA 2.3 and later
    ///
    /// <https://gpsd.gitlab.io/gpsd/NMEA.html#_sentence_mixes_and_nmea_variations>
    pub enum FaaMode {
        /// A - Autonomous mode
        'A' => Autonomous,
        /// C - Quectel Querk, "Caution"
        'C' => Caution,
        /// D - Differential Mode
        'D' => Differential,
        /// E - Estimated (dead-reckoning) mode
        'E' => Estimated,
        /// F - RTK Float mode
        'F' => FloatRtk,
        /// M - Manual Input Mode
        'M' => Manual,
        /// N - Data Not Valid
        'N' => DataNotValid,
        /// P - Precise
        'P' => Precise,
        /// R - RTK Integer mode
        'R' => FixedRtk,
        /// S - Simulated Mode
        'S' => Simulator,
        /// U - Quectel Querk, "Unsafe"
        'U' => Unsafe,
    }
}

parsable_enum! {
    /// Quality of the GPS fix
    pub enum Quality {
        /// 0 - Fix not available
        '0' => NoFix,
        /// 1 - GPS fix
        '1' => GPSFix,
        /// 2 - Differential GPS fix
        '2' => DGPSFix,
        /// 3 - PPS fix
        '3' => PPSFix,
        /// 4 - Real Time Kinematic
        '4' => RTK,
        /// 5 - Float RTK
        '5' => FloatRTK,
        /// 6 - estimated (dead reckoning)
        '6' => Estimated,
        /// 7 - Manual input mode
        '7' => Manual,
        /// 8 - Simulation mode
        '8' => Simulation,
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::NoFix
    }
}
