use kbdx::time::{self, Format, FormatFlags, Time, Unit};
use kbdx::Error;

#[test]
fn parse_scenarios() {
    assert_eq!(time::parse("3 days 4h"), Ok(273_600_000));
    assert_eq!(time::parse("1 hour, 30 minutes"), Ok(5_400_000));
    assert_eq!(time::parse("1.5s"), Ok(1_500));
    assert_eq!(time::parse("1,5 s"), Ok(1_500));
    assert_eq!(time::parse("no durations here"), Ok(0));
    assert_eq!(time::parse("2 fortnights"), Err(Error::UnknownUnit("fortnights".into())));
}

#[test]
fn element_cap() {
    assert_eq!(time::format(68_603), "1m 8s 603ms");
    assert_eq!(time::format_capped(68_603, 1), Ok(String::from("1m")));
    assert_eq!(time::format_capped(68_603, 2), Ok(String::from("1m 8s")));
    assert_eq!(time::format_capped(68_603, 0), Err(Error::InvalidElementCap));
}

#[test]
fn range_validation() {
    let fmt = Format::new().min(Unit::Hour).max(Unit::Second);
    assert_eq!(
        fmt.format(1),
        Err(Error::InvalidRange {
            min: Unit::Hour,
            max: Unit::Second
        })
    );
    assert_eq!(
        Format::new().elements(0).format(1),
        Err(Error::InvalidElementCap)
    );
}

#[test]
fn sign_preservation() {
    let x = 32_061_784_125;
    for min in Unit::ALL {
        for max in Unit::ALL.into_iter().filter(|&u| u >= min) {
            for elements in [None, Some(1), Some(2), Some(4)] {
                for flags in [FormatFlags::empty(), FormatFlags::all()] {
                    let fmt = Format::new()
                        .min(min)
                        .max(max)
                        .max_elements(elements)
                        .flags(flags);
                    let pos = fmt.format(x).unwrap();
                    assert_eq!(fmt.format(-x).unwrap(), format!("-{}", pos));
                }
            }
        }
    }
}

#[test]
fn round_trip() {
    let mut rng = fastrand::Rng::with_seed(0x6b62_6478);
    let long = Format::new();
    let short = Format::new().flags(FormatFlags::SHORT);
    for _ in 0..1000 {
        let ms = rng.i64(0..100 * Unit::Year.scale());
        assert_eq!(time::parse(&long.format(ms).unwrap()), Ok(ms));
        assert_eq!(time::parse(&short.format(ms).unwrap()), Ok(ms));
    }
}

#[test]
fn time_values() {
    let a: Time = "1h".parse().unwrap();
    let b = Time::new(30, Unit::Minute);
    assert_eq!((a + b).to(Unit::Minute), 90);
    assert_eq!((a - b).to_string(), "30m 0s 0ms");
    assert!(b < a);
}
