// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Copyright-year refresh.
//!
//! ```text
//! © 2019 Foo         -> © 2019-2026 Foo
//! Copyright 2014-2020 -> Copyright 2014-2026
//! Copyright (c) 2026-2026 -> Copyright (c) 2026
//! ```

use anyhow::Context;
use async_trait::async_trait;
use chrono::Datelike;
use regex::{Captures, Regex};
use tracing::debug;

use super::{MutationStep, StepContext};

/// Files checked in the project directory.
pub const COPYRIGHT_FILES: [&str; 5] = [
    "README.md",
    "LICENSE-APACHE",
    "LICENSE-MIT",
    "LICENSE",
    "COPYRIGHT",
];

pub const COPYRIGHT_PREFIXES: [&str; 3] = ["©", "Copyright", "Copyright (c)"];

/// Extends copyright years in license and readme files up to `year`.
#[derive(Debug, Clone, Copy)]
pub struct CopyrightYearStep {
    year: i32,
}

impl CopyrightYearStep {
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self { year }
    }

    /// Uses the current local year.
    #[must_use]
    pub fn current() -> Self {
        Self::new(chrono::Local::now().year())
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }
}

#[async_trait]
impl MutationStep for CopyrightYearStep {
    fn name(&self) -> &str {
        "copyright-year"
    }

    async fn apply(&self, ctx: &StepContext) -> anyhow::Result<()> {
        for file in COPYRIGHT_FILES {
            let path = ctx.path().join(file);
            if !path.is_file() {
                continue;
            }
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let patched = patch_copyright(&content, self.year)?;
            if patched != content {
                debug!(path = %path.display(), year = self.year, "patch copyright");
                tokio::fs::write(&path, patched)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Ok(())
    }
}

/// Rewrites `P YYYY ` and `P YYYY-ZZZZ ` to end at `now`, then collapses
/// `P now-now` to `P now`, for every prefix in [`COPYRIGHT_PREFIXES`].
///
/// Single years equal to or after `now` are left alone.
///
/// # Errors
///
/// Returns an error if a pattern fails to compile.
pub fn patch_copyright(content: &str, now: i32) -> anyhow::Result<String> {
    let mut text = content.to_string();
    for prefix in COPYRIGHT_PREFIXES {
        let escaped = regex::escape(prefix);
        let years = Regex::new(&format!(r"{escaped} (\d{{4}})(-\d{{4}})? "))
            .context("failed to compile copyright regex")?;
        text = years
            .replace_all(&text, |caps: &Captures<'_>| {
                let start: i32 = caps[1].parse().unwrap_or(now);
                if caps.get(2).is_none() && start >= now {
                    caps[0].to_string()
                } else if start == now {
                    format!("{prefix} {now} ")
                } else {
                    format!("{prefix} {start}-{now} ")
                }
            })
            .into_owned();

        let same = Regex::new(&format!("{escaped} {now}-{now}"))
            .context("failed to compile copyright regex")?;
        text = same
            .replace_all(&text, format!("{prefix} {now}").as_str())
            .into_owned();
    }
    Ok(text)
}
