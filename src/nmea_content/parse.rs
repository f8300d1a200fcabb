use nom::{
    Parser,
    branch::alt,
    bytes::complete::take,
    character::complete::{char, one_of, satisfy, u8},
    combinator::{all_consuming, opt, value},
    number::complete::{double, float},
    sequence::separated_pair,
};

use crate::{Error, IResult};

/// An optional field, [`None`] when the field is empty.
///
/// Unlike `opt`, a non-empty field that `parser` rejects is reported as an error
/// instead of being skipped.
pub fn optional<'a, O, F>(mut parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, Option<O>>
where
    F: Parser<&'a str, Output = O, Error = Error<&'a str, nom::error::Error<&'a str>>>,
{
    move |i: &'a str| {
        if i.is_empty() || i.starts_with(',') {
            Ok((i, None))
        } else {
            parser.parse(i).map(|(i, o)| (i, Some(o)))
        }
    }
}

/// Two decimal digits, as used in times, dates and latitude degrees.
pub fn two_digits(i: &str) -> IResult<&str, u8> {
    take(2u8).and_then(all_consuming(u8)).parse(i)
}

/// A value followed by its unit field, e.g. `545.4,M`.
///
/// The value is only reported when the unit is present.
pub fn with_unit(i: &str, unit: char) -> IResult<&str, Option<f32>> {
    separated_pair(opt(float), char(','), opt(char(unit)))
        .map(|(value, unit)| unit.and(value))
        .parse(i)
}

/// A distance in meters, `x.x,M`.
pub fn meters(i: &str) -> IResult<&str, Option<f32>> {
    with_unit(i, 'M')
}

/// An angle in `d..dmm.mm` form followed by its hemisphere field, in signed degrees.
///
/// `negative` is the hemisphere letter that makes the angle negative.
fn coordinate(
    i: &str,
    degree_digits: u8,
    positive: char,
    negative: char,
) -> IResult<&str, Option<f64>> {
    if let Some(i) = i.strip_prefix(',') {
        return Ok((i, None));
    }

    let (i, degrees) = take(degree_digits).and_then(all_consuming(u8)).parse(i)?;
    let (i, minutes) = double.parse(i)?;
    let (i, _) = char(',').parse(i)?;
    let (i, hemisphere) = satisfy(|c| c == positive || c == negative).parse(i)?;

    let angle = f64::from(degrees) + minutes / 60.0;
    Ok((i, Some(if hemisphere == negative { -angle } else { angle })))
}

/// Latitude, `ddmm.mm,a`; south is negative.
pub fn latitude(i: &str) -> IResult<&str, Option<f64>> {
    coordinate(i, 2, 'N', 'S')
}

/// Longitude, `dddmm.mm,a`; west is negative.
pub fn longitude(i: &str) -> IResult<&str, Option<f64>> {
    coordinate(i, 3, 'E', 'W')
}

/// Magnetic variation, `x.x,a`; west is negative.
pub fn magnetic_variation(i: &str) -> IResult<&str, Option<f32>> {
    alt((
        value(None, char(',')),
        separated_pair(float, char(','), one_of("EW")).map(|(variation, dir)| {
            if dir == 'W' {
                Some(-variation)
            } else {
                Some(variation)
            }
        }),
    ))
    .parse(i)
}

/// UTC time of day, `hhmmss.ss`.
pub fn time(i: &str) -> IResult<&str, time::Time> {
    let (rest, (hour, minute, second)) = (two_digits, two_digits, double).parse(i)?;

    if !(0.0..60.0).contains(&second) {
        return Err(nom::Err::Error(Error::InvalidField(i)));
    }

    // Fractions that round up to the next minute stay in this one.
    let millis = ((second * 1000.0).round() as u32).min(59_999);
    let time = time::Time::from_hms_milli(hour, minute, (millis / 1000) as u8, (millis % 1000) as u16)
        .or(Err(nom::Err::Error(Error::InvalidField(i))))?;

    Ok((rest, time))
}

/// UTC date, `ddmmyy`.
///
/// Two-digit years from 83 on belong to the 1900s, the first year of GPS operation
/// being 1983; earlier ones to the 2000s.
pub fn date(i: &str) -> IResult<&str, time::Date> {
    let (rest, (day, month, year)) = (two_digits, two_digits, two_digits).parse(i)?;

    let year = match year {
        83..=99 => 1900 + i32::from(year),
        _ => 2000 + i32::from(year),
    };

    let date = time::Month::try_from(month)
        .and_then(|month| time::Date::from_calendar_date(year, month, day))
        .or(Err(nom::Err::Error(Error::InvalidField(i))))?;

    Ok((rest, date))
}
