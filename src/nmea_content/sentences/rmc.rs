use nom::{
    Parser,
    character::complete::char,
    combinator::opt,
    number::complete::float,
    sequence::preceded,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    IResult,
    nmea_content::{
        FaaMode, FixStatus, Parsable,
        parse::{date, latitude, longitude, magnetic_variation, optional, time},
    },
};

/// RMC - Recommended Minimum Navigation Information
///
/// <https://gpsd.gitlab.io/gpsd/NMEA.html#_rmc_recommended_minimum_navigation_information>
///
/// ```text
///         1         2 3       4 5        6  7   8   9    10 11
///         |         | |       | |        |  |   |   |    |  |
///  $--RMC,hhmmss.ss,A,ddmm.mm,a,dddmm.mm,a,x.x,x.x,xxxx,x.x,a*hh<CR><LF>
/// ```
///
/// NMEA 2.3:
/// ```text
///         1         2 3       4 5        6  7   8   9    10 1112
///         |         | |       | |        |  |   |   |    |  | |
///  $--RMC,hhmmss.ss,A,ddmm.mm,a,dddmm.mm,a,x.x,x.x,xxxx,x.x,a,m*hh<CR><LF>
/// ```
///
/// Both layouts decode; `faa_mode` is [`None`] for the older one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RMC {
    /// Fix time in UTC
    pub fix_time: Option<time::Time>,
    /// Fix date in UTC
    pub fix_date: Option<time::Date>,
    /// Status Mode Indicator
    pub status: FixStatus,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
    /// Speed over ground in knots
    pub speed_over_ground: Option<f32>,
    /// Course over ground in degrees
    pub course_over_ground: Option<f32>,
    /// Magnetic variation in degrees, negative to the west
    pub magnetic_variation: Option<f32>,
    /// FAA Mode Indicator
    pub faa_mode: Option<FaaMode>,
}

impl Parsable for RMC {
    fn parser(i: &str) -> IResult<&str, Self> {
        let (i, fix_time) = optional(time).parse(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, status) = FixStatus::parser(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, latitude) = latitude(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, longitude) = longitude(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, speed_over_ground) = optional(float).parse(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, course_over_ground) = optional(float).parse(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, fix_date) = optional(date).parse(i)?;
        let (i, _) = char(',').parse(i)?;
        let (i, magnetic_variation) = magnetic_variation(i)?;
        let (i, faa_mode) = opt(preceded(char(','), opt(FaaMode::parser))).parse(i)?;

        Ok((
            i,
            Self {
                fix_time,
                fix_date,
                status,
                latitude,
                longitude,
                speed_over_ground,
                course_over_ground,
                magnetic_variation,
                faa_mode: faa_mode.flatten(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rmc_parsing() {
        let (rest, rmc) =
            RMC::parser("123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W").unwrap();

        assert_eq!(rest, "");
        assert_eq!(rmc.fix_time, Some(time::Time::from_hms(12, 35, 19).unwrap()));
        assert_eq!(rmc.status, FixStatus::Valid);
        assert!((rmc.latitude.unwrap() - 48.1173).abs() < 1e-6);
        assert!((rmc.longitude.unwrap() - 11.5166667).abs() < 1e-6);
        assert_eq!(rmc.speed_over_ground, Some(22.4));
        assert_eq!(rmc.course_over_ground, Some(84.4));
        assert_eq!(
            rmc.fix_date,
            Some(time::Date::from_calendar_date(1994, time::Month::March, 23).unwrap())
        );
        assert_eq!(rmc.magnetic_variation, Some(-3.1));
        assert_eq!(rmc.faa_mode, None);
    }

    #[test]
    fn test_rmc_faa_mode() {
        let (rest, rmc) =
            RMC::parser("123519,A,4807.038,N,01131.000,E,0.20,0.83,230394,004.2,W,A").unwrap();
        assert_eq!(rest, "");
        assert_eq!(rmc.faa_mode, Some(FaaMode::Autonomous));

        let (rest, rmc) =
            RMC::parser("092725.00,A,4717.113,N,00833.915,E,0.0,0.0,010190,,,D").unwrap();
        assert_eq!(rest, "");
        assert_eq!(rmc.magnetic_variation, None);
        assert_eq!(rmc.faa_mode, Some(FaaMode::Differential));

        let (rest, rmc) = RMC::parser("235959,V,,,,,,,311299,,,").unwrap();
        assert_eq!(rest, "");
        assert_eq!(rmc.faa_mode, None);
    }

    #[test]
    fn test_rmc_southern_hemisphere() {
        let (_, rmc) =
            RMC::parser("092725.00,A,4717.113,S,00833.915,W,0.0,0.0,010190,,").unwrap();

        assert!(rmc.latitude.unwrap() < 0.0);
        assert!(rmc.longitude.unwrap() < 0.0);
        assert_eq!(
            rmc.fix_date,
            Some(time::Date::from_calendar_date(1990, time::Month::January, 1).unwrap())
        );
    }

    #[test]
    fn test_rmc_empty() {
        let (rest, rmc) = RMC::parser(",V,,,,,,,,,").unwrap();

        assert_eq!(rest, "");
        assert_eq!(rmc, RMC::default());
    }

    #[test]
    fn test_rmc_invalid() {
        let invalid = [
            ",,,,,,,,,,",                                                    // Missing status
            "123519,X,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W",   // Invalid status
            "123519,A,4807.038,N,01131.000,E,abc,084.4,230394,003.1,W",     // Non-numeric speed
            "123519,A,4807.038,N,01131.000,E,022.4,084.4,320394,003.1,W",   // Invalid day
            "123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,X",   // Invalid variation direction
            "123519,A,4807.038,N,01131.000,E,022.4,084.4,230394",           // Missing variation
        ];

        for sentence in invalid {
            let result = RMC::parser(sentence);
            assert!(
                result.is_err(),
                "Parsed invalid sentence as valid: {}, sentence: {:?}",
                sentence,
                result.unwrap(),
            );
        }
    }
}
