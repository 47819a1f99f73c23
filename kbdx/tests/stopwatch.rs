use kbdx::stopwatch::{At, Stopwatch};
use kbdx::{Error, Table};

fn labels(sw: &Stopwatch) -> Vec<&str> {
    sw.iter().collect()
}

#[test]
fn start_end() {
    let mut sw = Stopwatch::new();
    sw.set_at("start", 1000).unwrap();
    sw.set_at("end", 1000 + 220_300).unwrap();
    assert_eq!(sw.compare("start", "end"), "3m 40s 300ms");
    assert_eq!(sw.compare_ms("start", "end"), 220_300);
    assert_eq!(sw.compare_ms("end", "start"), 220_300);
    assert_eq!(
        sw.compare_next("start", None, "%A% -> %B%: %C%"),
        Ok(Some(String::from("start -> end: 3m 40s 300ms")))
    );
    assert_eq!(sw.compare_next("end", None, "%A%"), Ok(None));
}

#[test]
fn overwrite_reorders() {
    let mut sw = Stopwatch::new();
    for (i, label) in ["A", "B", "C"].into_iter().enumerate() {
        sw.set_at(label, i as i64).unwrap();
    }
    sw.set_at("A", 10).unwrap();
    assert_eq!(labels(&sw), ["B", "C", "A"]);
    assert_eq!(sw.index_of("A"), Some(2));
    assert_eq!(sw.next_after("C"), Some("A"));
    assert_eq!(sw.next_after("A"), None);
}

#[test]
fn absence() {
    let mut sw = Stopwatch::new();
    assert_eq!(sw.get("missing"), 0);
    assert_eq!(sw.index_of("missing"), None);
    assert_eq!(sw.next_after("missing"), None);
    assert_eq!(sw.set_at("x", -1), Err(Error::NegativeTimestamp(-1)));
    assert!(sw.is_empty());
    assert_eq!(sw.report(), "");
}

#[test]
fn symmetry() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut sw = Stopwatch::new();
    for label in ["a", "b", "c", "d"] {
        sw.set_at(label, rng.i64(0..1 << 40)).unwrap();
    }
    let points = [
        At::Timer("a"),
        At::Timer("c"),
        At::Timer("missing"),
        At::Millis(rng.i64(0..1 << 40)),
        At::Millis(0),
    ];
    for a in points {
        for b in points {
            assert_eq!(sw.compare_ms(a, b), sw.compare_ms(b, a));
        }
    }
}

#[test]
fn report_table() {
    let mut sw = Stopwatch::new();
    sw.set_at("boot", 0).unwrap();
    sw.set_at("load", 68_603).unwrap();
    sw.set_at("ready", 3_668_603).unwrap();
    assert_eq!(
        sw.report_with(Some(2), "%A%-%B% %C%"),
        Ok(String::from("boot-load 1m 8s\nload-ready 1h 0m"))
    );

    let mut table = Table::new();
    for (row, (label, ms)) in sw.entries().enumerate() {
        table
            .set(0, row, label)
            .unwrap()
            .set(1, row, &ms.to_string())
            .unwrap();
    }
    table.set_splitter("|");
    assert_eq!(
        table.to_string(),
        "boot |0      |\nload |68603  |\nready|3668603|"
    );
}
