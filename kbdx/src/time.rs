// SPDX-License-Identifier: LGPL-3.0-only

//! Human-readable durations.
//!
//! Durations are signed amounts of milliseconds. [`parse`] turns text like
//! `"3 days 4h"` into milliseconds and [`Format`] turns milliseconds back
//! into text like `"1y 6d 2h"`.
//!
//! # Recognized units
//!
//! | Unit        | Short | Names                                  |
//! | ----------- | ----- | -------------------------------------- |
//! | millisecond | `ms`  | `milliseconds millisecond millis ms`   |
//! | second      | `s`   | `seconds second secs sec s`            |
//! | minute      | `m`   | `minutes minute mins min m`            |
//! | hour        | `h`   | `hours hour hrs hr h`                  |
//! | day         | `d`   | `days day d`                           |
//! | year        | `y`   | `years year yrs yr y`                  |
//!
//! Names are matched ignoring ASCII case.

mod unit;

pub use self::unit::Unit;

use core::fmt::{self, Write};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bitflags::bitflags;
use log::trace;

use crate::{Error, Result};

/// A number followed by a unit word found in a duration string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Pair<'a> {
    number: &'a str,
    unit: &'a str,
}

/// Iterator over number/unit pairs of a duration string.
///
/// Everything that is not a number immediately followed (modulo whitespace)
/// by an ASCII word is skipped.
struct Pairs<'a> {
    inner: &'a str,
    pos: usize,
}

impl<'a> Pairs<'a> {
    fn new(inner: &'a str) -> Self {
        Self { inner, pos: 0 }
    }

    fn skip_while(&self, mut i: usize, f: impl Fn(u8) -> bool) -> usize {
        let bytes = self.inner.as_bytes();
        while i < bytes.len() && f(bytes[i]) {
            i += 1;
        }
        i
    }

    /// Matches digits and whitespace ending with a digit.
    ///
    /// Returns the end of the match.
    fn digits(&self, start: usize) -> Option<usize> {
        let bytes = self.inner.as_bytes();
        let end = self.skip_while(start, |c| c.is_ascii_digit() || c.is_ascii_whitespace());
        bytes[start..end]
            .iter()
            .rposition(|c| c.is_ascii_digit())
            .map(|i| start + i + 1)
    }

    /// Matches a unit word after optional whitespace.
    ///
    /// Returns the start and end of the word.
    fn word(&self, start: usize) -> Option<(usize, usize)> {
        let start = self.skip_while(start, |c| c.is_ascii_whitespace());
        let end = self.skip_while(start, |c| c.is_ascii_alphabetic());
        if end > start {
            Some((start, end))
        } else {
            None
        }
    }

    /// Tries to match a pair at the given position.
    fn match_at(&self, start: usize) -> Option<(Pair<'a>, usize)> {
        let bytes = self.inner.as_bytes();
        let mut number_end = self.digits(start)?;
        if matches!(bytes.get(number_end), Some(b'.' | b',')) {
            if let Some(end) = self.digits(number_end + 1) {
                number_end = end;
            }
        }
        let (word_start, word_end) = self.word(number_end)?;
        let pair = Pair {
            number: &self.inner[start..number_end],
            unit: &self.inner[word_start..word_end],
        };
        Some((pair, word_end))
    }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = Pair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.inner.len() {
            match self.match_at(self.pos) {
                Some((pair, end)) => {
                    self.pos = end;
                    return Some(pair);
                }
                None => self.pos += 1,
            }
        }
        None
    }
}

fn parse_pair(pair: Pair) -> Result<i64> {
    let unit = Unit::lookup(pair.unit).ok_or_else(|| Error::UnknownUnit(pair.unit.into()))?;
    let number: String = pair
        .number
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    let invalid = || Error::InvalidNumber(pair.number.into());

    if let Ok(n) = number.parse::<i64>() {
        return n.checked_mul(unit.scale()).ok_or_else(invalid);
    }
    match number.parse::<f64>() {
        Ok(n) => {
            let millis = n * unit.scale() as f64;
            if millis.is_finite() && millis.abs() < i64::MAX as f64 {
                Ok(millis as i64)
            } else {
                Err(invalid())
            }
        }
        Err(_) => Err(invalid()),
    }
}

/// Parses a duration string into milliseconds.
///
/// Every number followed by a unit name contributes `number * unit` to the
/// result, any other text is ignored. Numbers may contain whitespace (`"1 000"`)
/// and a decimal part separated by `.` or `,`. Repeated units accumulate.
///
/// # Examples
///
/// ```
/// use kbdx::time::parse;
///
/// assert_eq!(parse("3 days 4h"), Ok(273_600_000));
/// assert_eq!(parse("1,5 seconds"), Ok(1500));
/// assert_eq!(parse("nothing here"), Ok(0));
/// assert!(parse("4 fortnights").is_err());
/// ```
pub fn parse(s: &str) -> Result<i64> {
    let mut total: i64 = 0;
    for pair in Pairs::new(s) {
        let millis = parse_pair(pair)?;
        trace!("parse: {:?} = {}ms", pair, millis);
        total = total
            .checked_add(millis)
            .ok_or_else(|| Error::InvalidNumber(pair.number.into()))?;
    }
    Ok(total)
}

bitflags! {
    /// Flags for [`Format`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct FormatFlags: u8 {
        /// Print components with zero value.
        const SHOW_EMPTY = 1 << 0;
        /// Use short labels (`ms`) instead of words (`milliseconds`).
        const SHORT      = 1 << 1;
    }
}

/// Duration formatting options.
///
/// The value is split into components from the largest unit of the range down
/// to the smallest one. Everything above the largest unit is carried by it,
/// everything below the smallest unit is dropped.
///
/// # Examples
///
/// ```
/// use kbdx::time::{Format, FormatFlags, Unit};
///
/// let fmt = Format::new().flags(FormatFlags::SHORT);
/// assert_eq!(fmt.format(68_603).unwrap(), "1m 8s 603ms");
/// assert_eq!(fmt.elements(1).format(68_603).unwrap(), "1m");
///
/// let fmt = Format::new().min(Unit::Second).max(Unit::Minute);
/// assert_eq!(fmt.format(-61_000).unwrap(), "-1 minute, 1 second");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Format<'a> {
    min: Unit,
    max: Unit,
    elements: Option<usize>,
    flags: FormatFlags,
    pre_unit: Option<&'a str>,
    separator: Option<&'a str>,
}

impl Default for Format<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Format<'a> {
    /// Creates options with the full unit range, unlimited elements and
    /// full-word labels.
    pub const fn new() -> Self {
        Self {
            min: Unit::MIN,
            max: Unit::MAX,
            elements: None,
            flags: FormatFlags::empty(),
            pre_unit: None,
            separator: None,
        }
    }

    /// Sets the smallest unit to print.
    pub const fn min(mut self, unit: Unit) -> Self {
        self.min = unit;
        self
    }

    /// Sets the largest unit to print.
    pub const fn max(mut self, unit: Unit) -> Self {
        self.max = unit;
        self
    }

    /// Limits the amount of printed components.
    pub const fn elements(mut self, elements: usize) -> Self {
        self.elements = Some(elements);
        self
    }

    /// Sets the component limit, `None` for unlimited.
    pub const fn max_elements(mut self, elements: Option<usize>) -> Self {
        self.elements = elements;
        self
    }

    /// Replaces the flags.
    pub const fn flags(mut self, flags: FormatFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the string between a number and its label.
    ///
    /// Defaults to `""` for short labels and `" "` for words.
    pub const fn pre_unit(mut self, s: &'a str) -> Self {
        self.pre_unit = Some(s);
        self
    }

    /// Sets the string between components.
    ///
    /// Defaults to `" "` for short labels and `", "` for words.
    pub const fn separator(mut self, s: &'a str) -> Self {
        self.separator = Some(s);
        self
    }

    fn is_short(&self) -> bool {
        self.flags.contains(FormatFlags::SHORT)
    }

    fn label(&self, unit: Unit, n: u64) -> &'static str {
        if self.is_short() {
            unit.short()
        } else if n == 1 {
            unit.singular()
        } else {
            unit.plural()
        }
    }

    /// Formats `millis` into `out`.
    pub fn write<W: Write>(&self, out: &mut W, millis: i64) -> Result<(), FormatError> {
        if self.min > self.max {
            return Err(FormatError::Options(Error::InvalidRange {
                min: self.min,
                max: self.max,
            }));
        }
        if self.elements == Some(0) {
            return Err(FormatError::Options(Error::InvalidElementCap));
        }

        let pre_unit = self
            .pre_unit
            .unwrap_or(if self.is_short() { "" } else { " " });
        let separator = self
            .separator
            .unwrap_or(if self.is_short() { " " } else { ", " });
        let show_empty = self.flags.contains(FormatFlags::SHOW_EMPTY);

        if millis < 0 {
            out.write_char('-')?;
        }

        let mut rem = millis.unsigned_abs();
        let mut count = 0;
        for unit in Unit::ALL[self.min as usize..=self.max as usize].iter().rev() {
            if self.elements == Some(count) {
                break;
            }
            let scale = unit.scale() as u64;
            let n = rem / scale;
            rem %= scale;
            if n != 0 || show_empty || (*unit == self.min && count == 0) {
                if count != 0 {
                    out.write_str(separator)?;
                }
                write!(out, "{}{}{}", n, pre_unit, self.label(*unit, n))?;
                count += 1;
            }
        }
        Ok(())
    }

    /// Formats `millis` into a new string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if the smallest unit is larger than the
    /// largest one and [`Error::InvalidElementCap`] if the element limit is 0.
    pub fn format(&self, millis: i64) -> Result<String> {
        let mut out = String::new();
        match self.write(&mut out, millis) {
            Ok(()) => Ok(out),
            Err(FormatError::Options(e)) => Err(e),
            // writing to a string does not fail
            Err(FormatError::Fmt(_)) => Ok(out),
        }
    }
}

/// The error type for [`Format::write`].
#[derive(Debug)]
pub enum FormatError {
    /// Invalid format options.
    Options(Error),
    /// The writer failed.
    Fmt(fmt::Error),
}

impl From<fmt::Error> for FormatError {
    fn from(e: fmt::Error) -> Self {
        Self::Fmt(e)
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Options(e) => fmt::Display::fmt(e, fmt),
            Self::Fmt(e) => fmt::Display::fmt(e, fmt),
        }
    }
}

impl std::error::Error for FormatError {}

fn compact(millis: i64, elements: Option<usize>) -> Format<'static> {
    Format::new()
        .max(Unit::largest_in(millis.unsigned_abs()))
        .max_elements(elements)
        .flags(FormatFlags::SHORT.union(FormatFlags::SHOW_EMPTY))
}

/// Formats milliseconds with short labels.
///
/// Prints every component from the largest non-zero unit down to milliseconds.
///
/// # Examples
///
/// ```
/// use kbdx::time::format;
///
/// assert_eq!(format(68_603), "1m 8s 603ms");
/// assert_eq!(format(3_600_000), "1h 0m 0s 0ms");
/// assert_eq!(format(-1500), "-1s 500ms");
/// assert_eq!(format(0), "0ms");
/// ```
pub fn format(millis: i64) -> String {
    let mut out = String::new();
    // the range is always valid and the amount of elements is not limited
    let _ = compact(millis, None).write(&mut out, millis);
    out
}

/// Same as [`format`] but prints at most `elements` components.
///
/// ```
/// use kbdx::time::format_capped;
///
/// assert_eq!(format_capped(68_603, 2).unwrap(), "1m 8s");
/// assert!(format_capped(68_603, 0).is_err());
/// ```
pub fn format_capped(millis: i64, elements: usize) -> Result<String> {
    compact(millis, Some(elements)).format(millis)
}

/// Returns milliseconds elapsed since the unix epoch.
pub fn now_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
        Err(e) => -i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX),
    }
}

/// An amount of time with an optional offset.
///
/// The effective value is `millis - offset`. The offset makes it possible to
/// take a `Time` from [`Time::now`] and reuse it as a zero point. Arithmetic
/// wraps on overflow.
///
/// ```
/// use kbdx::time::{Time, Unit};
///
/// let mut t: Time = "1h 30m".parse().unwrap();
/// t += Time::new(15, Unit::Minute);
/// assert_eq!(t.to(Unit::Minute), 105);
/// assert_eq!(t.to_string(), "1h 45m 0s 0ms");
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Time {
    millis: i64,
    offset: i64,
}

impl Time {
    /// Creates a time from milliseconds.
    pub const fn from_millis(millis: i64) -> Self {
        Self { millis, offset: 0 }
    }

    /// Creates a time from an amount of units.
    pub const fn new(amount: i64, unit: Unit) -> Self {
        Self::from_millis(amount.wrapping_mul(unit.scale()))
    }

    /// Creates a time from a fractional amount of units.
    ///
    /// The result is truncated to whole milliseconds.
    pub fn from_f64(amount: f64, unit: Unit) -> Self {
        Self::from_millis((amount * unit.scale() as f64) as i64)
    }

    /// Returns the current time in milliseconds since the unix epoch.
    pub fn now() -> Self {
        Self::from_millis(now_millis())
    }

    /// Returns the current time with the offset set to itself.
    ///
    /// The effective value is zero and grows as the raw value is updated.
    pub fn now_offset() -> Self {
        let mut t = Self::now();
        t.offset_self();
        t
    }

    /// Sets the raw value, keeping the offset.
    pub fn set(&mut self, millis: i64) {
        self.millis = millis;
    }

    /// Sets the offset subtracted from the raw value.
    pub fn set_offset(&mut self, offset: i64) {
        self.offset = offset;
    }

    /// Sets the offset to the raw value.
    pub fn offset_self(&mut self) {
        self.offset = self.millis;
    }

    /// Returns the offset.
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns the effective value in milliseconds.
    pub const fn millis(&self) -> i64 {
        self.millis.wrapping_sub(self.offset)
    }

    /// Returns the effective value in whole `unit`s, truncated toward zero.
    pub const fn to(&self, unit: Unit) -> i64 {
        self.millis() / unit.scale()
    }

    /// Formats the effective value.
    pub fn format(&self, fmt: &Format) -> Result<String> {
        fmt.format(self.millis())
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.millis() == other.millis()
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.millis().cmp(&other.millis())
    }
}

impl fmt::Display for Time {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let millis = self.millis();
        match compact(millis, None).write(fmt, millis) {
            Ok(()) => Ok(()),
            Err(FormatError::Fmt(e)) => Err(e),
            Err(FormatError::Options(_)) => Err(fmt::Error),
        }
    }
}

impl FromStr for Time {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s).map(Self::from_millis)
    }
}

impl From<i64> for Time {
    fn from(millis: i64) -> Self {
        Self::from_millis(millis)
    }
}

impl From<Duration> for Time {
    fn from(d: Duration) -> Self {
        Self::from_millis(i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_millis(self.millis().wrapping_add(rhs.millis()))
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_millis(self.millis().wrapping_sub(rhs.millis()))
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Self) {
        self.millis = self.millis.wrapping_add(rhs.millis());
    }
}

impl SubAssign for Time {
    fn sub_assign(&mut self, rhs: Self) {
        self.millis = self.millis.wrapping_sub(rhs.millis());
    }
}

impl Sum for Time {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Time::default(), |a, b| a + b)
    }
}
