use crate::{
    ChecksumMode, Context, ContextBuilder, FramingError, LineEndingMode, Sentence, Status, frame,
    nmea_content::{GGA, Parsable},
};

const GGA_SENTENCE: &str =
    "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

fn statuses<U: 'static>(context: &mut Context<U>, input: &str) -> Vec<Status> {
    context.feed(input.as_bytes()).collect()
}

#[test]
fn test_overflow_recovery() {
    let mut context = ContextBuilder::new()
        .max_sentence_length(16)
        .build(())
        .unwrap();

    let input = format!("{GGA_SENTENCE}$PXYZ,z*5D\r\n");
    let result = statuses(&mut context, &input);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0], Status::Framing(FramingError::Overflow(16)));
    assert!(matches!(&result[1], Status::Unknown(id) if id == "PXYZ"));
    assert_eq!(context.stats().framing_errors, 1);
}

#[test]
fn test_interrupted_sentence() {
    let mut context = Context::new(());
    let gga = context.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();

    let input = format!("$GPGGA,123519,4807.0{GGA_SENTENCE}");
    assert_eq!(
        statuses(&mut context, &input),
        [
            Status::Framing(FramingError::Interrupted),
            Status::Completed(gga.id())
        ]
    );
}

#[test]
fn test_malformed_framing() {
    let mut context = Context::new(());

    let cases = [
        ("$GPGGA,data\r\n", FramingError::MissingChecksum),
        ("$GPGGA,data*6G\r\n", FramingError::InvalidChecksumDigit(b'G')),
        ("$GPGGA,data*6A\n", FramingError::MissingTerminator(b'\n')),
        ("$GPGGA,daté*6A\r\n", FramingError::NonAscii(0xC3)),
    ];

    for (input, error) in cases {
        assert_eq!(statuses(&mut context, input), [Status::Framing(error)], "{input:?}");
        assert!(context.is_idle());
    }

}

#[test]
fn test_long_identifier_is_unknown() {
    let mut context = Context::new(());

    let version = frame("PQTMVERNO,LC29H,2023/01/01,12:00:00");
    assert_eq!(
        statuses(&mut context, &version),
        [Status::Unknown("PQTMVERNO".to_owned())]
    );
    assert_eq!(context.stats().unknown, 1);
    assert_eq!(context.stats().framing_errors, 0);
}

#[test]
fn test_noise_and_reset() {
    let mut context = Context::new(());
    let gga = context.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();

    assert!(statuses(&mut context, "\r\n*garbage\x00\u{ff}\r\n$GPGGA,1235").is_empty());
    assert!(!context.is_idle());

    context.reset();
    assert!(context.is_idle());
    assert!(statuses(&mut context, "19,4807.038,N*47\r\n").is_empty());

    assert_eq!(
        statuses(&mut context, GGA_SENTENCE),
        [Status::Completed(gga.id())]
    );
}

#[test]
fn test_optional_checksum() {
    let mut context = ContextBuilder::new()
        .checksum_mode(ChecksumMode::Optional)
        .build(Vec::new())
        .unwrap();
    let gga = context
        .add_parser_with_callout(
            "GPGGA",
            GGA::parser,
            |sentence: &Sentence<'_>, _: &GGA, checksums: &mut Vec<Option<u8>>| {
                checksums.push(sentence.checksum());
            },
            GGA::default(),
        )
        .unwrap();

    let unchecked = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,\r\n";
    let input = format!("{unchecked}{GGA_SENTENCE}");
    assert_eq!(
        statuses(&mut context, &input),
        [Status::Completed(gga.id()), Status::Completed(gga.id())]
    );

    let bad = "$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*48\r\n";
    assert!(matches!(
        statuses(&mut context, bad)[..],
        [Status::ChecksumMismatch {
            expected: 0x47,
            found: 0x48
        }]
    ));

    assert_eq!(context.into_user_data(), [None, Some(0x47)]);
}

#[test]
fn test_forbidden_line_ending() {
    let mut context = ContextBuilder::new()
        .line_ending_mode(LineEndingMode::Forbidden)
        .build(())
        .unwrap();
    let gga = context.add_parser("GPGGA", GGA::parser, GGA::default()).unwrap();

    let bare = GGA_SENTENCE.trim_end();
    let mut input = bare.as_bytes();
    assert_eq!(context.parse_chunk(&mut input), Status::Completed(gga.id()));
    assert!(input.is_empty());

    // Line endings are discarded between sentences.
    assert_eq!(
        statuses(&mut context, &format!("\r\n{bare}\r\n")),
        [Status::Completed(gga.id())]
    );
}
