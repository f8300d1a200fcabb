//! # NMEA 0183 Checksums
//!
//! The checksum of a sentence is the XOR of every byte strictly between the `$` start
//! marker and the `*` checksum marker, written as two hexadecimal digits.

/// Start of every sentence.
pub const START: u8 = b'$';

/// Separates the payload from the checksum digits.
pub const CHECKSUM_MARKER: u8 = b'*';

/// Calculates the NMEA 0183 checksum for the given payload.
///
/// The payload is everything between the `$` prefix and the `*` delimiter, excluding both.
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::checksum;
///
/// assert_eq!(checksum("GPGSV,3,2,12,01,40,083,45"), 0x44);
/// ```
pub fn checksum(payload: impl AsRef<[u8]>) -> u8 {
    payload.as_ref().iter().fold(0u8, |acc, &byte| fold(acc, byte))
}

/// Folds one more payload byte into a running checksum.
#[inline]
pub(crate) fn fold(acc: u8, byte: u8) -> u8 {
    acc ^ byte
}

/// Value of a single checksum digit; both cases are accepted.
pub(crate) fn hex_digit(byte: u8) -> Option<u8> {
    char::from(byte).to_digit(16).map(|digit| digit as u8)
}

/// Formats a checksum value as a two-digit uppercase hexadecimal string.
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::format_checksum;
///
/// assert_eq!(format_checksum(0x41), "41");
/// assert_eq!(format_checksum(0x0A), "0A");
/// ```
pub fn format_checksum(checksum: u8) -> String {
    format!("{checksum:02X}")
}

/// Wraps a payload into a complete sentence, `$payload*HH\r\n`.
///
/// # Examples
///
/// ```rust
/// use nmea0183_stream::frame;
///
/// assert_eq!(frame("GPGSV,3,2,12,01,40,083,45"), "$GPGSV,3,2,12,01,40,083,45*44\r\n");
/// ```
pub fn frame(payload: &str) -> String {
    format!("${payload}*{}\r\n", format_checksum(checksum(payload)))
}
