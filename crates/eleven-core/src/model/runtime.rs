//! Runtimes installed in a sandbox

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const LATEST_RUNTIME_VERSION: &str = "latest";

/// Runtime name to version (`latest` or a version matching the runtime format)
pub type Runtimes = HashMap<String, String>;

static SEMVER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^((?P<major>0|[1-9]\d*)\.(?P<minor>0|[1-9]\d*)\.(?P<patch>0|[1-9]\d*)(?:-(?P<prerelease>(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+(?P<buildmetadata>[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?|latest)$",
    )
    .expect("semver pattern is a valid regex")
});

static MAJOR_MINOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?P<major>0|[1-9]\d*)\.(?P<minor>0|[1-9]\d*)|latest)$")
        .expect("major.minor pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VersionFormat {
    /// Only `latest` is accepted
    Latest,
    Semver,
    MajorMinor,
}

impl VersionFormat {
    fn matches(self, version: &str) -> bool {
        match self {
            VersionFormat::Latest => version == LATEST_RUNTIME_VERSION,
            VersionFormat::Semver => SEMVER_REGEX.is_match(version),
            VersionFormat::MajorMinor => MAJOR_MINOR_REGEX.is_match(version),
        }
    }
}

struct SupportedRuntime {
    name: &'static str,
    version_format: VersionFormat,
    version_examples: &'static [&'static str],
}

const SUPPORTED_RUNTIMES: &[SupportedRuntime] = &[
    SupportedRuntime {
        name: "clang",
        version_format: VersionFormat::Latest,
        version_examples: &["latest"],
    },
    SupportedRuntime {
        name: "docker",
        version_format: VersionFormat::Latest,
        version_examples: &["latest"],
    },
    SupportedRuntime {
        name: "go",
        version_format: VersionFormat::Semver,
        version_examples: &["latest", "1.19.2", "1.19.0", "1.0.0"],
    },
    SupportedRuntime {
        name: "java",
        version_format: VersionFormat::Latest,
        version_examples: &["latest"],
    },
    SupportedRuntime {
        name: "node",
        version_format: VersionFormat::Semver,
        version_examples: &["latest", "18.11.0", "18.0.0", "16.18.0"],
    },
    SupportedRuntime {
        name: "php",
        version_format: VersionFormat::MajorMinor,
        version_examples: &["latest", "8.1", "8.0", "7.4"],
    },
    SupportedRuntime {
        name: "python",
        version_format: VersionFormat::Semver,
        version_examples: &["latest", "3.10.8", "3.0.0", "2.7.0"],
    },
    SupportedRuntime {
        name: "ruby",
        version_format: VersionFormat::Semver,
        version_examples: &["latest", "3.1.2", "3.0.0", "2.7.0"],
    },
    SupportedRuntime {
        name: "rust",
        version_format: VersionFormat::Semver,
        version_examples: &["latest", "1.64.0", "1.62.1", "1.0.0"],
    },
];

/// Names of the runtimes that can be installed in a sandbox
pub fn supported_runtimes() -> impl Iterator<Item = &'static str> {
    SUPPORTED_RUNTIMES.iter().map(|runtime| runtime.name)
}

fn find_supported_runtime(name: &str) -> Option<&'static SupportedRuntime> {
    SUPPORTED_RUNTIMES.iter().find(|runtime| runtime.name == name)
}

/// Parse `name` / `name@version` tokens.
///
/// A missing version defaults to `latest`. The whole batch is rejected on the
/// first unknown runtime, duplicated runtime or malformed version.
pub fn parse_runtimes<S: AsRef<str>>(tokens: &[S]) -> Result<Runtimes> {
    let mut runtimes = Runtimes::new();

    for token in tokens {
        let (name, version) = match token.as_ref().split_once('@') {
            Some((name, version)) => (name, version),
            None => (token.as_ref(), ""),
        };

        let supported = find_supported_runtime(name).ok_or_else(|| Error::InvalidRuntime {
            runtime: name.to_string(),
        })?;

        if runtimes.contains_key(name) {
            return Err(Error::DuplicatedRuntime {
                runtime: name.to_string(),
            });
        }

        let version = if version.is_empty() {
            LATEST_RUNTIME_VERSION
        } else {
            version
        };

        if !supported.version_format.matches(version) {
            return Err(Error::InvalidRuntimeVersion {
                runtime: name.to_string(),
                version: version.to_string(),
                examples: supported
                    .version_examples
                    .iter()
                    .map(|example| example.to_string())
                    .collect(),
            });
        }

        runtimes.insert(name.to_string(), version.to_string());
    }

    Ok(runtimes)
}
