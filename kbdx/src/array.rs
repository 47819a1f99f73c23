// SPDX-License-Identifier: LGPL-3.0-only

//! Slice helpers.

use core::fmt::{self, Write};

use crate::{Error, Result};

/// Collects every present element, dropping `None`s.
///
/// ```
/// assert_eq!(kbdx::array::denullify([Some(1), None, Some(3)]), [1, 3]);
/// ```
pub fn denullify<T, I>(items: I) -> Vec<T>
where
    I: IntoIterator<Item = Option<T>>,
{
    items.into_iter().flatten().collect()
}

/// Returns a shuffled copy of `items`.
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
    shuffled_with(&mut fastrand::Rng::new(), items)
}

/// Returns a copy of `items` shuffled with the given generator.
pub fn shuffled_with<T: Clone>(rng: &mut fastrand::Rng, items: &[T]) -> Vec<T> {
    let mut res = items.to_vec();
    shuffle_with(rng, &mut res);
    res
}

/// Shuffles `items` in place with the given generator.
///
/// Every permutation is equally likely (Fisher-Yates).
pub fn shuffle_with<T>(rng: &mut fastrand::Rng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.usize(..=i);
        items.swap(i, j);
    }
}

/// Returns a random element, `None` if `items` is empty.
pub fn random<T>(items: &[T]) -> Option<&T> {
    if items.is_empty() {
        None
    } else {
        items.get(fastrand::usize(..items.len()))
    }
}

/// Returns a reversed copy of `items`.
pub fn reversed<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().rev().cloned().collect()
}

/// Returns how many times `target` occurs in `items`.
pub fn count<T: PartialEq>(items: &[T], target: &T) -> usize {
    items.iter().filter(|i| *i == target).count()
}

/// Joins displayable items.
///
/// ```
/// use kbdx::array::join;
///
/// assert_eq!(join(&[1, 2, 3], ", ", "[", "]"), "[1, 2, 3]");
/// assert_eq!(join::<u8>(&[], ", ", "[", "]"), "[]");
/// ```
pub fn join<T: fmt::Display>(items: &[T], delimiter: &str, before: &str, after: &str) -> String {
    let mut out = String::from(before);
    for (i, item) in items.iter().enumerate() {
        if i != 0 {
            out.push_str(delimiter);
        }
        write!(out, "{}", item).ok();
    }
    out.push_str(after);
    out
}

/// Returns the hex representation of every byte.
pub fn to_hex_array(data: &[u8], uppercase: bool) -> Vec<String> {
    data.iter()
        .map(|b| {
            if uppercase {
                format!("{:02X}", b)
            } else {
                format!("{:02x}", b)
            }
        })
        .collect()
}

/// Returns the hex representation of `data`.
///
/// ```
/// use kbdx::array::to_hex;
///
/// assert_eq!(to_hex(&[0x00, 0xab, 0x7f], false), "00ab7f");
/// assert_eq!(to_hex(&[0xde, 0xad], true), "DEAD");
/// ```
pub fn to_hex(data: &[u8], uppercase: bool) -> String {
    to_hex_array(data, uppercase).concat()
}

/// Decodes a hex string, ignoring ASCII case.
///
/// # Errors
///
/// Returns [`Error::InvalidHex`] if the length is odd or a character is not
/// a hex digit.
pub fn from_hex(s: &str) -> Result<Vec<u8>> {
    let invalid = || Error::InvalidHex(s.into());
    if s.len() % 2 != 0 {
        return Err(invalid());
    }
    s.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16).ok_or_else(invalid)?;
            let lo = (pair[1] as char).to_digit(16).ok_or_else(invalid)?;
            Ok((hi * 16 + lo) as u8)
        })
        .collect()
}
