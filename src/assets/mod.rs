// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Release/asset alias configuration.
//!
//! ```text
//! GET /repos/{owner}/{repo}/releases
//!        |
//!        v
//! drop drafts, prereleases, asset-less releases
//!        |
//!        v
//! parse tags loosely (warn + skip bad ones), sort ascending
//!        |
//!        v
//! for each: vMAJOR.MINOR, vMAJOR, latest := { TargetVersion, Assets }
//!        |            (highest version wins every alias)
//!        v
//! {"VersionAliases": {...}}
//! ```

pub mod version;

#[cfg(test)]
mod tests;

use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::Result;
use crate::github::Release;

pub use version::ReleaseVersion;

/// Alias the latest-version pointer is stored under.
pub const LATEST_ALIAS: &str = "latest";

/// Where an alias points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasTarget {
    /// Tag name exactly as published.
    pub target_version: String,
    pub assets: usize,
}

/// Output document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssetConfig {
    pub version_aliases: BTreeMap<String, AliasTarget>,
}

impl AssetConfig {
    /// Pretty JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize asset config")
    }
}

/// Computes version aliases from a release listing.
#[must_use]
pub fn build_asset_config(releases: &[Release]) -> AssetConfig {
    let mut versions: Vec<(ReleaseVersion, &Release)> = releases
        .iter()
        .filter(|release| {
            let keep = !release.draft && !release.prerelease && !release.assets.is_empty();
            if !keep {
                debug!(
                    version = %release.tag_name,
                    draft = release.draft,
                    prerelease = release.prerelease,
                    assets = release.assets.len(),
                    "ignoring release"
                );
            }
            keep
        })
        .filter_map(|release| match ReleaseVersion::parse(&release.tag_name) {
            Ok(version) => Some((version, release)),
            Err(err) => {
                warn!(raw = %release.tag_name, error = %err, "cannot parse version");
                None
            }
        })
        .collect();
    versions.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut config = AssetConfig::default();
    for (version, release) in versions {
        let target = AliasTarget {
            target_version: release.tag_name.clone(),
            assets: release.assets.len(),
        };
        config
            .version_aliases
            .insert(version.minor_alias(), target.clone());
        config
            .version_aliases
            .insert(version.major_alias(), target.clone());
        config
            .version_aliases
            .insert(LATEST_ALIAS.to_string(), target);
    }
    config
}
