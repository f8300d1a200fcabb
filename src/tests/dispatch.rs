use crate::{
    Context, DecodeError, IResult, RegistryError, Sentence, Status, checksum, frame,
    nmea_content::{GGA, Parsable, Quality},
};

const GGA_FIELDS: &str = "123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,";

fn gga_sentence(fields: &str) -> String {
    frame(&format!("GPGGA,{fields}"))
}

fn words(i: &str) -> IResult<&str, Vec<String>> {
    Ok(("", i.split(',').map(str::to_owned).collect()))
}

#[test]
fn test_unknown_sentence_tolerance() {
    let mut context = Context::new(());
    let gga = context.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();

    let stream = [
        "$GPGSV,3,2,12,01,40,083,45*44\r\n".to_owned(),
        gga_sentence(GGA_FIELDS),
    ]
    .concat();

    let statuses: Vec<_> = context.feed(stream.as_bytes()).collect();
    assert!(matches!(&statuses[0], Status::Unknown(id) if id == "GPGSV"));
    assert_eq!(statuses[1], Status::Completed(gga.id()));
    assert_eq!(statuses.len(), 2);
    assert_eq!(context.stats().unknown, 1);
}

#[test]
fn test_checksum_rejection_keeps_record() {
    let mut context = Context::new(0u32);
    let gga = context
        .add_parser_with_callout(
            "GPGGA",
            GGA::parser,
            |_: &Sentence<'_>, _: &GGA, calls: &mut u32| *calls += 1,
            GGA::default(),
        )
        .unwrap();

    let mut input = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n".as_slice();
    assert_eq!(context.parse_chunk(&mut input), Status::Completed(gga.id()));

    let altered = "GPGGA,123519,4807.038,N,01131.000,E,1,09,0.9,545.4,M,46.9,M,,";
    let stream = format!("${altered}*47\r\n");
    let mut input = stream.as_bytes();
    assert_eq!(
        context.parse_chunk(&mut input),
        Status::ChecksumMismatch {
            expected: checksum(altered),
            found: 0x47
        }
    );

    assert_eq!(context.record(gga).unwrap().satellite_count, Some(8));
    assert_eq!(*context.user_data(), 1);
}

#[test]
fn test_decode_error_keeps_record() {
    let mut context = Context::new(0u32);
    let gga = context
        .add_parser_with_callout(
            "GPGGA",
            GGA::parser,
            |_: &Sentence<'_>, _: &GGA, calls: &mut u32| *calls += 1,
            GGA::default(),
        )
        .unwrap();

    let statuses: Vec<_> = context.feed(gga_sentence(GGA_FIELDS).as_bytes()).collect();
    assert_eq!(statuses, [Status::Completed(gga.id())]);
    let before = context.record(gga).cloned();

    let malformed = gga_sentence("123519,48x7.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,");
    let statuses: Vec<_> = context.feed(malformed.as_bytes()).collect();
    assert!(matches!(
        statuses[..],
        [Status::Decode {
            parser,
            error: DecodeError::Malformed { position: 9, .. }
        }] if parser == gga.id()
    ));

    let out_of_range = gga_sentence("253519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,");
    let statuses: Vec<_> = context.feed(out_of_range.as_bytes()).collect();
    assert_eq!(
        statuses,
        [Status::Decode {
            parser: gga.id(),
            error: DecodeError::InvalidField { position: 0 }
        }]
    );

    let trailing = gga_sentence(&format!("{GGA_FIELDS},extra"));
    let statuses: Vec<_> = context.feed(trailing.as_bytes()).collect();
    assert_eq!(
        statuses,
        [Status::Decode {
            parser: gga.id(),
            error: DecodeError::TrailingData {
                position: GGA_FIELDS.len()
            }
        }]
    );

    assert_eq!(context.record(gga).cloned(), before);
    assert_eq!(*context.user_data(), 1);
    assert_eq!(context.stats().decode_errors, 3);
}

#[test]
fn test_callouts_and_status() {
    let mut context = Context::new(Vec::new());
    let gga = context
        .add_parser_with_callout(
            "GPGGA",
            GGA::parser,
            |sentence: &Sentence<'_>, gga: &GGA, log: &mut Vec<String>| {
                log.push(format!(
                    "{} {:?} {:?}",
                    sentence.id(),
                    gga.fix_quality,
                    sentence.checksum()
                ));
            },
            GGA::default(),
        )
        .unwrap();
    let words = context
        .add_parser("PXYZ", words, Vec::new())
        .unwrap();

    let stream = [gga_sentence(",,,,,0,00,,,M,,M,,"), frame("PXYZ,a,b")].concat();
    let mut input = stream.as_bytes();

    assert_eq!(context.parse_chunk(&mut input), Status::Completed(gga.id()));
    assert_eq!(context.record(gga).unwrap().fix_quality, Quality::NoFix);

    assert_eq!(context.parse_chunk(&mut input), Status::Completed(words.id()));
    assert_eq!(context.record(words).unwrap(), &["a", "b"]);

    assert_eq!(
        context.into_user_data(),
        [format!("GPGGA NoFix Some({})", checksum("GPGGA,,,,,,0,00,,,M,,M,,"))]
    );
}

#[test]
fn test_registration_errors() {
    let mut context = Context::new(());
    let gga = context.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();

    assert!(matches!(
        context.add_parser("GPGGA", words, Vec::new()),
        Err(RegistryError::Duplicate(id)) if id == "GPGGA"
    ));
    assert_eq!(
        context.add_parser("GP,GGA", words, Vec::new()).unwrap_err(),
        RegistryError::InvalidId("GP,GGA".to_owned())
    );

    let mut input = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n".as_slice();
    assert_eq!(context.parse_chunk(&mut input), Status::Completed(gga.id()));
    assert_eq!(context.registry().len(), 1);
}

#[test]
fn test_handles_are_bound_to_their_context() {
    let mut ours = Context::new(());
    let mut theirs = Context::new(());
    let gga = ours.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();
    let other = theirs.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();

    let status = ours
        .feed(gga_sentence("123519,4807.038,N,01131.000,E,1,01,0.9,545.4,M,46.9,M,,").as_bytes())
        .next();
    assert_eq!(status, Some(Status::Completed(gga.id())));
    assert!(other != gga.id());

    let status = theirs.feed(gga_sentence(GGA_FIELDS).as_bytes()).next();
    assert_eq!(status, Some(Status::Completed(other.id())));

    assert_eq!(ours.record(gga).unwrap().satellite_count, Some(1));
    assert_eq!(ours.record(other), None);
    assert_eq!(theirs.record(other).unwrap().satellite_count, Some(8));
}
