use std::fmt;

use serde::{Deserialize, Serialize};

/// Compile-time build metadata, populated by `build.rs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub package_version: String,
    pub build_profile: String,
    pub build_features: String,
    pub build_timestamp: String,
    pub rust_version: String,
    pub target: String,
    pub host: String,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stash {} ({}) [{} {}, features: {}] built {} with {}",
            self.package_version,
            self.version,
            self.build_profile,
            self.target,
            self.build_features,
            self.build_timestamp,
            self.rust_version
        )
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("REPO_VERSION").to_string(),
        package_version: env!("CARGO_PKG_VERSION").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
        build_features: env!("BUILD_FEATURES").to_string(),
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        rust_version: env!("RUST_VERSION").to_string(),
        target: env!("BUILD_TARGET").to_string(),
        host: env!("BUILD_HOST").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_is_populated() {
        let info = build_info();
        assert!(!info.package_version.is_empty());
        assert!(!info.build_profile.is_empty());
        assert!(info.to_string().starts_with("stash "));
    }
}
