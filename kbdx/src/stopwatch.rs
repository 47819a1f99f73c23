// SPDX-License-Identifier: LGPL-3.0-only

//! Named timers.
//!
//! A [`Stopwatch`] maps labels to epoch milliseconds and remembers the order
//! in which the labels were set. Setting an existing label moves it to the
//! end of the order.
//!
//! Missing labels are not errors: [`Stopwatch::get`] returns `0` and
//! comparisons treat a missing timer as the epoch.

use core::iter::FusedIterator;
use core::slice;

use ahash::AHashMap;
use log::trace;

use crate::time::{self, Time};
use crate::{Error, Result};

/// Template used by [`Stopwatch::report`].
///
/// `%A%` is replaced by the earlier label, `%B%` by the later label and `%C%`
/// by the formatted difference.
pub const DEFAULT_TEMPLATE: &str = "%A% => %B% took %C%";

/// A point in time used in comparisons.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum At<'a> {
    /// The value of a timer, the epoch if the timer is not set.
    Timer(&'a str),
    /// Milliseconds since the epoch.
    Millis(i64),
    /// The current time.
    Now,
}

impl<'a> From<&'a str> for At<'a> {
    fn from(label: &'a str) -> Self {
        Self::Timer(label)
    }
}

impl<'a> From<&'a String> for At<'a> {
    fn from(label: &'a String) -> Self {
        Self::Timer(label)
    }
}

impl From<i64> for At<'_> {
    fn from(millis: i64) -> Self {
        Self::Millis(millis)
    }
}

impl From<Time> for At<'_> {
    fn from(time: Time) -> Self {
        Self::Millis(time.millis())
    }
}

#[cfg(feature = "chrono")]
impl<Tz: chrono::TimeZone> From<chrono::DateTime<Tz>> for At<'_> {
    fn from(dt: chrono::DateTime<Tz>) -> Self {
        Self::Millis(dt.timestamp_millis())
    }
}

/// Insertion ordered collection of named timers.
///
/// # Examples
///
/// ```
/// use kbdx::stopwatch::{At, Stopwatch};
///
/// let mut sw = Stopwatch::new();
/// sw.set_at("boot", 1_000).unwrap();
/// sw.set_at("ready", 69_603).unwrap();
/// assert_eq!(sw.compare_ms("boot", "ready"), 68_603);
/// assert_eq!(sw.compare("ready", At::Millis(1_000)), "1m 8s 603ms");
/// assert_eq!(sw.report(), "boot => ready took 1m 8s 603ms");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    timers: AHashMap<Box<str>, i64>,
    order: Vec<Box<str>>,
}

impl Stopwatch {
    /// Creates an empty stopwatch.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.order.iter().position(|i| &**i == label)
    }

    fn insert(&mut self, label: &str, millis: i64) {
        trace!("stopwatch: set \"{}\" to {}", label, millis);
        match self.timers.get_mut(label) {
            Some(value) => {
                *value = millis;
                if let Some(i) = self.position(label) {
                    let key = self.order.remove(i);
                    self.order.push(key);
                }
            }
            None => {
                self.timers.insert(Box::from(label), millis);
                self.order.push(Box::from(label));
            }
        }
    }

    /// Sets a timer to the current time.
    ///
    /// If the timer exists it is moved to the end of the order.
    pub fn set(&mut self, label: &str) {
        self.insert(label, time::now_millis());
    }

    /// Sets a timer to milliseconds since the epoch.
    ///
    /// If the timer exists it is moved to the end of the order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeTimestamp`] if `millis` is negative.
    pub fn set_at(&mut self, label: &str, millis: i64) -> Result<()> {
        if millis < 0 {
            return Err(Error::NegativeTimestamp(millis));
        }
        self.insert(label, millis);
        Ok(())
    }

    /// Sets a timer to a calendar instant.
    #[cfg(feature = "chrono")]
    pub fn set_datetime<Tz: chrono::TimeZone>(
        &mut self,
        label: &str,
        dt: &chrono::DateTime<Tz>,
    ) -> Result<()> {
        self.set_at(label, dt.timestamp_millis())
    }

    /// Returns the value of a timer or `0` if it is not set.
    pub fn get(&self, label: &str) -> i64 {
        self.try_get(label).unwrap_or(0)
    }

    /// Returns the value of a timer.
    pub fn try_get(&self, label: &str) -> Option<i64> {
        self.timers.get(label).copied()
    }

    /// Returns `true` if the timer is set.
    pub fn contains(&self, label: &str) -> bool {
        self.timers.contains_key(label)
    }

    /// Removes a timer.
    ///
    /// Returns the removed value.
    pub fn remove(&mut self, label: &str) -> Option<i64> {
        let value = self.timers.remove(label)?;
        if let Some(i) = self.position(label) {
            self.order.remove(i);
        }
        trace!("stopwatch: removed \"{}\"", label);
        Some(value)
    }

    /// Removes all timers.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.order.clear();
    }

    /// Returns the amount of timers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no timers.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the position of a timer in the order.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        if self.contains(label) {
            self.position(label)
        } else {
            None
        }
    }

    /// Returns the label set after `label`.
    ///
    /// Returns `None` if `label` is the last one or is not set.
    pub fn next_after(&self, label: &str) -> Option<&str> {
        self.next_after_index(self.index_of(label)?)
    }

    /// Returns the label following the position `index`.
    pub fn next_after_index(&self, index: usize) -> Option<&str> {
        self.order.get(index.checked_add(1)?).map(|i| &**i)
    }

    /// Returns `true` if both timers are set to the same value.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        match (self.try_get(a), self.try_get(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Returns `true` if the timer is set to `millis`.
    pub fn matches_value(&self, label: &str, millis: i64) -> bool {
        self.try_get(label) == Some(millis)
    }

    fn resolve(&self, at: At) -> i64 {
        match at {
            At::Timer(label) => self.get(label),
            At::Millis(millis) => millis,
            At::Now => time::now_millis(),
        }
    }

    /// Returns the absolute difference in milliseconds.
    pub fn compare_ms<'a, 'b>(&self, a: impl Into<At<'a>>, b: impl Into<At<'b>>) -> u64 {
        self.resolve(a.into()).abs_diff(self.resolve(b.into()))
    }

    fn compare_millis<'a, 'b>(&self, a: impl Into<At<'a>>, b: impl Into<At<'b>>) -> i64 {
        i64::try_from(self.compare_ms(a, b)).unwrap_or(i64::MAX)
    }

    /// Returns the absolute difference formatted with [`time::format`].
    pub fn compare<'a, 'b>(&self, a: impl Into<At<'a>>, b: impl Into<At<'b>>) -> String {
        time::format(self.compare_millis(a, b))
    }

    /// Returns the absolute difference formatted with [`time::format_capped`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidElementCap`] if `elements` is 0.
    pub fn compare_capped<'a, 'b>(
        &self,
        a: impl Into<At<'a>>,
        b: impl Into<At<'b>>,
        elements: usize,
    ) -> Result<String> {
        time::format_capped(self.compare_millis(a, b), elements)
    }

    fn compare_elements(&self, a: &str, b: &str, elements: Option<usize>) -> Result<String> {
        match elements {
            Some(n) => self.compare_capped(a, b, n),
            None => Ok(self.compare(a, b)),
        }
    }

    /// Renders a comparison of `label` with the label set after it.
    ///
    /// Returns `None` if there is no next label.
    pub fn compare_next(
        &self,
        label: &str,
        elements: Option<usize>,
        template: &str,
    ) -> Result<Option<String>> {
        let next = match self.next_after(label) {
            Some(next) => next,
            None => return Ok(None),
        };
        let diff = self.compare_elements(label, next, elements)?;
        let line = template
            .replace("%A%", label)
            .replace("%B%", next)
            .replace("%C%", &diff);
        Ok(Some(line))
    }

    /// Compares every timer with the next one, one line per pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidElementCap`] if `elements` is `Some(0)`.
    pub fn report_with(&self, elements: Option<usize>, template: &str) -> Result<String> {
        let mut lines = Vec::with_capacity(self.len());
        for label in self {
            if let Some(line) = self.compare_next(label, elements, template)? {
                lines.push(line);
            }
        }
        Ok(lines.join("\n"))
    }

    /// Same as [`report_with`](Self::report_with) with unlimited elements
    /// and [`DEFAULT_TEMPLATE`].
    pub fn report(&self) -> String {
        self.report_with(None, DEFAULT_TEMPLATE).unwrap_or_default()
    }

    /// Returns an iterator over labels in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.order.iter(),
        }
    }

    /// Returns an iterator over labels and their values in order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.iter().map(move |label| (label, self.get(label)))
    }
}

/// An iterator over labels of a [`Stopwatch`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: slice::Iter<'a, Box<str>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|i| &**i)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|i| &**i)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Stopwatch {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
