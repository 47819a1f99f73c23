// SPDX-License-Identifier: LGPL-3.0-only

use core::fmt;
use core::str::FromStr;

use crate::Error;

/// A time unit.
///
/// Units are ordered from the smallest to the largest, the order matches
/// [`Unit::rank`] and [`Unit::scale`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Unit {
    /// One millisecond.
    Millisecond = 0,
    /// 1000 milliseconds.
    Second,
    /// 60 seconds.
    Minute,
    /// 60 minutes.
    Hour,
    /// 24 hours.
    Day,
    /// 365 days.
    Year,
}

struct Descriptor {
    unit: Unit,
    /// Multiplier relative to the previous unit.
    multiplier: i64,
    short: &'static str,
    singular: &'static str,
    plural: &'static str,
    aliases: &'static [&'static str],
}

// must be sorted by rank
const TABLE: [Descriptor; 6] = [
    Descriptor {
        unit: Unit::Millisecond,
        multiplier: 1,
        short: "ms",
        singular: "millisecond",
        plural: "milliseconds",
        aliases: &["milliseconds", "millisecond", "millis", "ms"],
    },
    Descriptor {
        unit: Unit::Second,
        multiplier: 1000,
        short: "s",
        singular: "second",
        plural: "seconds",
        aliases: &["seconds", "second", "secs", "sec", "s"],
    },
    Descriptor {
        unit: Unit::Minute,
        multiplier: 60,
        short: "m",
        singular: "minute",
        plural: "minutes",
        aliases: &["minutes", "minute", "mins", "min", "m"],
    },
    Descriptor {
        unit: Unit::Hour,
        multiplier: 60,
        short: "h",
        singular: "hour",
        plural: "hours",
        aliases: &["hours", "hour", "hrs", "hr", "h"],
    },
    Descriptor {
        unit: Unit::Day,
        multiplier: 24,
        short: "d",
        singular: "day",
        plural: "days",
        aliases: &["days", "day", "d"],
    },
    Descriptor {
        unit: Unit::Year,
        multiplier: 365,
        short: "y",
        singular: "year",
        plural: "years",
        aliases: &["years", "year", "yrs", "yr", "y"],
    },
];

const fn scale_of(rank: usize) -> i64 {
    let mut scale = 1;
    let mut i = 0;
    while i <= rank {
        scale *= TABLE[i].multiplier;
        i += 1;
    }
    scale
}

static UNITS: [Descriptor; 6] = TABLE;

const SCALES: [i64; 6] = [
    scale_of(0),
    scale_of(1),
    scale_of(2),
    scale_of(3),
    scale_of(4),
    scale_of(5),
];

impl Unit {
    /// The smallest supported unit.
    pub const MIN: Unit = Unit::Millisecond;
    /// The largest supported unit.
    pub const MAX: Unit = Unit::Year;

    /// All units, from the smallest to the largest.
    pub const ALL: [Unit; 6] = [
        Unit::Millisecond,
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::Year,
    ];

    fn descriptor(self) -> &'static Descriptor {
        &UNITS[self.rank() as usize]
    }

    /// Returns the ordinal position of the unit, 0 for milliseconds.
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns a unit by its rank.
    pub fn from_rank(rank: u8) -> Option<Unit> {
        Self::ALL.get(rank as usize).copied()
    }

    /// Returns the amount of milliseconds in one unit.
    pub const fn scale(self) -> i64 {
        SCALES[self as usize]
    }

    /// Returns the short label, e.g. `"ms"`.
    pub fn short(self) -> &'static str {
        self.descriptor().short
    }

    /// Returns the singular word, e.g. `"millisecond"`.
    pub fn singular(self) -> &'static str {
        self.descriptor().singular
    }

    /// Returns the plural word, e.g. `"milliseconds"`.
    pub fn plural(self) -> &'static str {
        self.descriptor().plural
    }

    /// Returns the names this unit is recognized by.
    pub fn aliases(self) -> &'static [&'static str] {
        self.descriptor().aliases
    }

    /// Finds a unit by one of its names, ignoring ASCII case.
    pub fn lookup(name: &str) -> Option<Unit> {
        UNITS
            .iter()
            .find(|d| d.aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
            .map(|d| d.unit)
    }

    /// Returns the largest unit that fits at least once into `millis`.
    ///
    /// Returns [`Unit::MIN`] if `millis` is smaller than one second.
    pub fn largest_in(millis: u64) -> Unit {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|u| millis >= u.scale() as u64)
            .unwrap_or(Self::MIN)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.plural())
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::lookup(s).ok_or_else(|| Error::UnknownUnit(s.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_chain() {
        let mut product = 1;
        for (i, unit) in Unit::ALL.iter().enumerate() {
            product *= UNITS[i].multiplier;
            assert_eq!(unit.scale(), product);
            assert_eq!(unit.rank() as usize, i);
            assert_eq!(UNITS[i].unit, *unit);
        }
        assert_eq!(Unit::Year.scale(), 31_536_000_000);
    }

    #[test]
    fn order() {
        for pair in Unit::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].scale() < pair[1].scale());
        }
        assert_eq!(Unit::from_rank(3), Some(Unit::Hour));
        assert_eq!(Unit::from_rank(6), None);
    }

    #[test]
    fn lookup() {
        assert_eq!(Unit::lookup("ms"), Some(Unit::Millisecond));
        assert_eq!(Unit::lookup("MS"), Some(Unit::Millisecond));
        assert_eq!(Unit::lookup("Days"), Some(Unit::Day));
        assert_eq!(Unit::lookup("m"), Some(Unit::Minute));
        assert_eq!(Unit::lookup("y"), Some(Unit::Year));
        assert_eq!(Unit::lookup("fortnight"), None);
        assert_eq!(
            "weeks".parse::<Unit>(),
            Err(Error::UnknownUnit("weeks".into()))
        );
    }

    #[test]
    fn largest_in() {
        assert_eq!(Unit::largest_in(0), Unit::Millisecond);
        assert_eq!(Unit::largest_in(999), Unit::Millisecond);
        assert_eq!(Unit::largest_in(1000), Unit::Second);
        assert_eq!(Unit::largest_in(68_603), Unit::Minute);
        assert_eq!(Unit::largest_in(u64::MAX), Unit::Year);
    }
}
