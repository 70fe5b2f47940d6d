// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decodes `origin` URLs into GitHub repository coordinates.
//!
//! ```text
//! git@github.com:owner/name.git          scp-like
//! ssh://git@github.com/owner/name.git    ssh
//! https://github.com/owner/name          http(s), git, git+ssh
//! github.com/owner/name                  bare host path
//!            |
//!            v
//! RemoteRepo { owner, name, html_url }
//! ```
//!
//! Only github.com is recognized; anything else is an error rather than a guess.

use regex::Regex;
use reqwest::Url;
use serde::Serialize;

use crate::error::RemoteUrlError;

const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// Repository named by a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteRepo {
    pub owner: String,
    pub name: String,
    pub html_url: String,
}

/// Parses a remote URL in any form git accepts for a GitHub repository.
///
/// # Errors
///
/// Returns a [`RemoteUrlError`] when the URL is empty, malformed, points at
/// another host, or does not name `owner/repository`.
pub fn parse_remote_url(raw: &str) -> Result<RemoteRepo, RemoteUrlError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(RemoteUrlError::Empty);
    }

    let (host, path) = split_host_path(url)?;
    let host = host.to_ascii_lowercase();
    if !GITHUB_HOSTS.contains(&host.as_str()) {
        return Err(RemoteUrlError::UnsupportedHost {
            host,
            url: url.to_string(),
        });
    }

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RemoteRepo {
            owner: (*owner).to_string(),
            name: (*name).to_string(),
            html_url: format!("https://github.com/{owner}/{name}"),
        }),
        _ => Err(RemoteUrlError::MissingRepository {
            url: url.to_string(),
        }),
    }
}

fn split_host_path(url: &str) -> Result<(String, String), RemoteUrlError> {
    let malformed = || RemoteUrlError::Malformed {
        url: url.to_string(),
    };

    if !url.contains("://") {
        // user@host:path, without a scheme
        let scp = Regex::new(r"^(?:[^@/:]+@)?([A-Za-z0-9.-]+):([^/].*)$").map_err(|_| malformed())?;
        if let Some(caps) = scp.captures(url) {
            return Ok((caps[1].to_string(), caps[2].to_string()));
        }
        // host/path, without a scheme
        if let Some((host, path)) = url.split_once('/')
            && host.contains('.')
        {
            return Ok((host.to_string(), path.to_string()));
        }
        return Err(malformed());
    }

    let parsed = Url::parse(url).map_err(|_| malformed())?;
    match parsed.scheme() {
        "https" | "http" | "ssh" | "git" | "git+ssh" | "ssh+git" => {}
        _ => return Err(malformed()),
    }
    let host = parsed.host_str().ok_or_else(malformed)?;
    Ok((host.to_string(), parsed.path().to_string()))
}
