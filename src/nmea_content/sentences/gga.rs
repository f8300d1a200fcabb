use std::time::Duration;

use nom::{
    Parser,
    character::complete::{char, u8, u16},
    number::complete::float,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    IResult,
    nmea_content::{
        Parsable, Quality,
        parse::{latitude, longitude, meters, optional, time},
    },
};

/// GGA - Global Positioning System Fix Data
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_gga_global_positioning_system_fix_data>
///
/// ```text
///                                                      11
///         1         2       3 4        5 6 7  8   9  10 |  12 13  14
///         |         |       | |        | | |  |   |   | |   | |   |
///  $--GGA,hhmmss.ss,ddmm.mm,a,dddmm.mm,a,x,xx,x.x,x.x,M,x.x,M,x.x,xxxx*hh<CR><LF>
/// ```
///
/// Every field but the fix quality may be empty, which decodes to [`None`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GGA {
    /// Fix time in UTC
    pub fix_time: Option<time::Time>,
    /// Latitude in degrees, negative south of the equator
    pub latitude: Option<f64>,
    /// Longitude in degrees, negative west of Greenwich
    pub longitude: Option<f64>,
    /// GPS Quality Indicator
    pub fix_quality: Quality,
    /// Number of satellites in use
    pub satellite_count: Option<u8>,
    /// Horizontal Dilution of Precision
    pub hdop: Option<f32>,
    /// Altitude above/below mean sea level (geoid) in meters
    pub altitude: Option<f32>,
    /// Geoidal separation in meters, the difference between the WGS-84 earth ellipsoid and mean sea level (geoid),
    /// negative values indicate that the geoid is below the ellipsoid
    pub geoidal_separation: Option<f32>,
    /// Age of Differential GPS data, time since last SC104 type 1 or 9 update, null field when DGPS is not used
    pub age_of_dgps: Option<Duration>,
    /// Differential reference station ID
    pub ref_station_id: Option<u16>,
}

impl Parsable for GGA {
    fn parser(i: &str) -> IResult<&str, Self> {
        let (i, fix_time) = optional(time).parse(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, latitude) = latitude(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, longitude) = longitude(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, fix_quality) = Quality::parser(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, satellite_count) = optional(u8).parse(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, hdop) = optional(float).parse(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, altitude) = meters(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, geoidal_separation) = meters(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, age_of_dgps) = optional(float).parse(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, ref_station_id) = optional(u16).parse(i)?;

        Ok((
            i,
            Self {
                fix_time,
                latitude,
                longitude,
                fix_quality,
                satellite_count,
                hdop,
                altitude,
                geoidal_separation,
                age_of_dgps: age_of_dgps.and_then(|secs| Duration::try_from_secs_f32(secs).ok()),
                ref_station_id,
            },
        ))
    }
}
