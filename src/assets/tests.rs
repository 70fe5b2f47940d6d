// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ReleaseVersion, build_asset_config};
use crate::github::{Release, ReleaseAsset};

fn release(tag: &str, assets: usize) -> Release {
    Release {
        tag_name: tag.to_string(),
        draft: false,
        prerelease: false,
        assets: (0..assets)
            .map(|i| ReleaseAsset {
                name: format!("asset-{i}.tar.gz"),
            })
            .collect(),
    }
}

fn parse(raw: &str) -> ReleaseVersion {
    ReleaseVersion::parse(raw).expect("valid version")
}

#[test]
fn test_parse_loose_versions() {
    let rendered: Vec<String> = ["v1.2.3", "1.2", "v3", "v1.2.3-rc.1+build.5", " v0.0.1 "]
        .iter()
        .map(|raw| parse(raw).to_string())
        .collect();

    assert_eq!(rendered, vec!["1.2.3", "1.2.0", "3.0.0", "1.2.3-rc.1", "0.0.1"]);
}

#[test]
fn test_parse_rejects_garbage() {
    for raw in ["", "latest", "v1.2.3.4", "release-1", "v1..2"] {
        assert!(ReleaseVersion::parse(raw).is_err(), "{raw} should not parse");
    }
    insta::assert_snapshot!(
        ReleaseVersion::parse("nightly").expect_err("invalid").to_string(),
        @"invalid semantic version: 'nightly'"
    );
}

#[test]
fn test_version_ordering() {
    let mut versions: Vec<ReleaseVersion> = [
        "v1.10.0",
        "v1.2.0",
        "v1.2.0-rc.2",
        "v1.2.0-rc.10",
        "v1.2.0-alpha",
        "v0.9",
        "v2",
    ]
    .iter()
    .map(|raw| parse(raw))
    .collect();
    versions.sort();

    let rendered: Vec<String> = versions.iter().map(ToString::to_string).collect();
    insta::assert_debug_snapshot!(rendered, @r#"
    [
        "0.9.0",
        "1.2.0-alpha",
        "1.2.0-rc.2",
        "1.2.0-rc.10",
        "1.2.0",
        "1.10.0",
        "2.0.0",
    ]
    "#);
}

#[test]
fn test_build_asset_config() {
    let mut draft = release("v2.0.0", 3);
    draft.draft = true;
    let mut pre = release("v1.3.0-rc.1", 3);
    pre.prerelease = true;

    let releases = vec![
        release("v1.2.1", 4),
        release("v1.10.0", 5),
        draft,
        pre,
        release("v1.2.0", 2),
        release("v0.9.0", 1),
        release("v1.4.0", 0),
        release("nightly", 7),
    ];

    let config = build_asset_config(&releases);

    insta::assert_snapshot!(config.to_json().expect("json"), @r#"
    {
      "VersionAliases": {
        "latest": {
          "TargetVersion": "v1.10.0",
          "Assets": 5
        },
        "v0": {
          "TargetVersion": "v0.9.0",
          "Assets": 1
        },
        "v0.9": {
          "TargetVersion": "v0.9.0",
          "Assets": 1
        },
        "v1": {
          "TargetVersion": "v1.10.0",
          "Assets": 5
        },
        "v1.10": {
          "TargetVersion": "v1.10.0",
          "Assets": 5
        },
        "v1.2": {
          "TargetVersion": "v1.2.1",
          "Assets": 4
        }
      }
    }
    "#);
}

#[test]
fn test_build_asset_config_empty() {
    let config = build_asset_config(&[]);
    assert!(config.version_aliases.is_empty());
    insta::assert_snapshot!(config.to_json().expect("json"), @r#"
    {
      "VersionAliases": {}
    }
    "#);
}

#[test]
fn test_raw_tag_is_preserved() {
    let config = build_asset_config(&[release("1.0", 1)]);
    assert_eq!(config.version_aliases["v1.0"].target_version, "1.0");
}
