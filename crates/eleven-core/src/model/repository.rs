//! Git repositories cloned into a sandbox

use crate::error::{Error, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

const GITHUB_HOST: &str = "github.com";

/// Characters escaped in a URL path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'=')
    .remove(b'@')
    .remove(b':');

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvRepository {
    pub name: String,
    pub owner: String,
    /// Whether the owner was given by the user rather than defaulted
    pub explicit_owner: bool,
    /// `git@github.com:owner/name.git`
    pub git_url: String,
    /// `https://github.com/owner/name.git`
    pub git_http_url: String,
}

impl EnvRepository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, explicit_owner: bool) -> Self {
        let owner = owner.into();
        let name = name.into();
        let owner_segment = utf8_percent_encode(&owner, PATH_SEGMENT).to_string();
        let name_segment = utf8_percent_encode(&name, PATH_SEGMENT).to_string();

        Self {
            git_url: format!("git@{}:{}/{}.git", GITHUB_HOST, owner_segment, name_segment),
            git_http_url: format!("https://{}/{}/{}.git", GITHUB_HOST, owner_segment, name_segment),
            name,
            owner,
            explicit_owner,
        }
    }

    /// Parse a repository reference given by the user.
    ///
    /// Accepts `name` (owned by `default_owner`), `owner/name`,
    /// `https://github.com/owner/name(.git)` and `git@github.com:owner/name(.git)`.
    pub fn parse(raw: &str, default_owner: &str) -> Result<Self> {
        let invalid = || Error::InvalidRepositoryName {
            name: raw.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid());
        }

        if raw.contains("://") {
            let url = Url::parse(raw).map_err(|_| invalid())?;

            if url.host_str() != Some(GITHUB_HOST) {
                return Err(invalid());
            }

            let segments: Vec<String> = url
                .path_segments()
                .map(|segments| {
                    segments
                        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
                        .collect()
                })
                .unwrap_or_default();

            return match segments.as_slice() {
                [owner, name, ..] => Self::from_owner_and_name(owner, name).ok_or_else(invalid),
                _ => Err(invalid()),
            };
        }

        if let Some((user_and_host, path)) = raw.split_once(':') {
            // scp-like `git@github.com:owner/name.git`
            let host = user_and_host
                .split_once('@')
                .map_or(user_and_host, |(_, host)| host);

            if host != GITHUB_HOST {
                return Err(invalid());
            }

            return match path.split('/').collect::<Vec<_>>().as_slice() {
                [owner, name, ..] => Self::from_owner_and_name(owner, name).ok_or_else(invalid),
                _ => Err(invalid()),
            };
        }

        match raw.split('/').collect::<Vec<_>>().as_slice() {
            [name] => Ok(Self::new(default_owner, *name, false)),
            [owner, name] if !owner.is_empty() && !name.is_empty() => {
                Ok(Self::new(*owner, *name, true))
            }
            _ => Err(invalid()),
        }
    }

    fn from_owner_and_name(owner: &str, name: &str) -> Option<Self> {
        let name = name.strip_suffix(".git").unwrap_or(name);

        (!owner.is_empty() && !name.is_empty()).then(|| Self::new(owner, name, true))
    }
}

/// Reject repositories listed more than once
pub fn check_repositories_uniqueness(repositories: &[EnvRepository]) -> Result<()> {
    let mut seen = HashSet::new();

    for repository in repositories {
        let key = (
            repository.owner.to_lowercase(),
            repository.name.to_lowercase(),
        );

        if !seen.insert(key) {
            return Err(Error::DuplicatedRepository {
                owner: repository.owner.clone(),
                name: repository.name.clone(),
            });
        }
    }

    Ok(())
}
