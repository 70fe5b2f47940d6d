// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bot identity loaded once per process.
//!
//! ```text
//! [bot] name/email ─────────────┐
//!                               ├──> BotIdentity ──> commit env (per command)
//! $HOME/.config/<hub_config> ───┘                └─> API token (GitHubClient)
//!   github.com:
//!   - user: moul-bot
//!     oauth_token: ...
//! ```
//!
//! The value is passed explicitly to every publisher; nothing is written to
//! the process environment.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::config::types::BotConfig;
use crate::error::PublishError;
use crate::git::CommitIdentity;

const DEFAULT_HOST: &str = "github.com";

#[derive(Debug, Deserialize)]
struct HubHost {
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    oauth_token: Option<String>,
}

/// Author identity and API token used when publishing.
#[derive(Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub name: String,
    pub email: String,
    pub token: Option<String>,
}

impl fmt::Debug for BotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotIdentity")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl BotIdentity {
    /// Identity without a token; pull requests cannot be opened with it.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Reads the token from a hub credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Identity`] when the file cannot be read, is not
    /// valid YAML, or lists no host with a token.
    pub fn load(bot: &BotConfig, hub_config: &Path) -> Result<Self, PublishError> {
        let content = std::fs::read_to_string(hub_config).map_err(|e| {
            PublishError::Identity(format!("read {}: {e}", hub_config.display()))
        })?;
        let token = parse_hub_token(&content).map_err(|message| {
            PublishError::Identity(format!("{}: {message}", hub_config.display()))
        })?;
        Ok(Self::new(bot.name.clone(), bot.email.clone()).with_token(token))
    }

    #[must_use]
    pub fn commit_identity(&self) -> CommitIdentity {
        CommitIdentity {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// First token of `github.com`, or of the first listed host.
pub(crate) fn parse_hub_token(content: &str) -> Result<String, String> {
    let hosts: BTreeMap<String, Vec<HubHost>> =
        serde_yaml::from_str(content).map_err(|e| format!("invalid hub config: {e}"))?;

    let entries = hosts
        .get(DEFAULT_HOST)
        .or_else(|| hosts.values().next())
        .ok_or_else(|| "no host configured".to_string())?;

    entries
        .iter()
        .find_map(|host| host.oauth_token.clone().filter(|t| !t.is_empty()))
        .ok_or_else(|| {
            let user = entries
                .iter()
                .find_map(|host| host.user.clone())
                .unwrap_or_default();
            format!("no oauth_token for user {user:?}")
        })
}

