//! Reads NMEA 0183 from stdin and prints every GGA and RMC fix.
//!
//! ```text
//! cat capture.nmea | RUST_LOG=debug cargo run --example stream
//! ```

use std::io::Read;

use nmea0183_stream::{
    Context, Sentence, Status,
    nmea_content::{GGA, Parsable, RMC},
};

const READ_SIZE: usize = 32;

#[derive(Debug, Default)]
struct Fixes {
    gga: usize,
    rmc: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut context = Context::new(Fixes::default());

    let gga = context.add_parser_with_callout(
        "GPGGA",
        GGA::parser,
        |sentence: &Sentence<'_>, gga: &GGA, fixes: &mut Fixes| {
            fixes.gga += 1;
            println!(
                "{}: {:?} lat {:?} lon {:?} alt {:?} m, {:?} satellites",
                sentence.id(),
                gga.fix_quality,
                gga.latitude,
                gga.longitude,
                gga.altitude,
                gga.satellite_count,
            );
        },
        GGA::default(),
    )?;

    let rmc = context.add_parser_with_callout(
        "GPRMC",
        RMC::parser,
        |sentence: &Sentence<'_>, rmc: &RMC, fixes: &mut Fixes| {
            fixes.rmc += 1;
            println!(
                "{}: {:?} {:?} {:?} lat {:?} lon {:?}, {:?} kn",
                sentence.id(),
                rmc.status,
                rmc.fix_date,
                rmc.fix_time,
                rmc.latitude,
                rmc.longitude,
                rmc.speed_over_ground,
            );
        },
        RMC::default(),
    )?;

    let mut stdin = std::io::stdin().lock();
    let mut buffer = [0u8; READ_SIZE];

    loop {
        let read = stdin.read(&mut buffer)?;
        if read == 0 {
            break;
        }

        let mut remaining = &buffer[..read];
        while !remaining.is_empty() {
            match context.parse_chunk(&mut remaining) {
                Status::Completed(parser) if gga == parser => {
                    if let Some(record) = context.record(gga) {
                        println!("  GGA record: {:?}", record.fix_time);
                    }
                }
                Status::Completed(parser) if rmc == parser => {
                    if let Some(record) = context.record(rmc) {
                        println!("  RMC record: {:?}", record.course_over_ground);
                    }
                }
                Status::Unknown(id) => log::info!("skipped {id}"),
                status if status.is_error() => log::warn!("{status:?}"),
                _ => {}
            }
        }
    }

    log::info!("{:?}, {:?}", context.user_data(), context.stats());
    Ok(())
}
