// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Loose semantic-version parsing for release tags.
//!
//! Accepts `v1.2.3`, `1.2`, `v3`, `1.2.3-rc.1+build.5`; missing minor and
//! patch components are zero. Build metadata is ignored for ordering.

use anyhow::Context;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

use crate::error::Result;

/// A parsed release tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Pre-release identifiers without the leading `-`.
    pub pre: Option<String>,
}

impl ReleaseVersion {
    /// Parses a tag name.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a version.
    pub fn parse(raw: &str) -> Result<Self> {
        let regex = Regex::new(
            r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?(?:\+[0-9A-Za-z.-]+)?$",
        )
        .context("failed to compile version regex")?;
        let caps = regex
            .captures(raw.trim())
            .with_context(|| format!("invalid semantic version: '{raw}'"))?;

        let number = |index: usize| -> Result<u64> {
            caps.get(index).map_or(Ok(0), |m| {
                m.as_str()
                    .parse()
                    .with_context(|| format!("version component out of range in '{raw}'"))
            })
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            pre: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// `vMAJOR.MINOR` alias key.
    #[must_use]
    pub fn minor_alias(&self) -> String {
        format!("v{}.{}", self.major, self.minor)
    }

    /// `vMAJOR` alias key.
    #[must_use]
    pub fn major_alias(&self) -> String {
        format!("v{}", self.major)
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => compare_prerelease(a, b),
            })
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Identifier-wise comparison: numeric identifiers compare numerically and
/// sort before alphanumeric ones; a shorter prefix sorts first.
fn compare_prerelease(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
