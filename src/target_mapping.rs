use std::fmt;
use std::str::FromStr;

use crate::error::ManifestError;

/// Platforms a variant can be built for.
///
/// The set is closed: every identifier maps to exactly one triple and there is
/// no fallback for identifiers outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    LinuxX86_64,
    LinuxAarch64,
    MacosArm64,
    MacosX86_64,
    IosArm64,
    IosArm64Simulator,
    IosX86_64Simulator,
}

impl Platform {
    /// Identifier as accepted on the command line (e.g. `linux-x86_64`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LinuxX86_64 => "linux-x86_64",
            Platform::LinuxAarch64 => "linux-aarch64",
            Platform::MacosArm64 => "macos-arm64",
            Platform::MacosX86_64 => "macos-x86_64",
            Platform::IosArm64 => "ios-arm64",
            Platform::IosArm64Simulator => "ios-arm64-simulator",
            Platform::IosX86_64Simulator => "ios-x86_64-simulator",
        }
    }

    /// Triple written into `supportedTriples`.
    pub fn triple(&self) -> &'static str {
        match self {
            Platform::LinuxX86_64 => "x86_64-unknown-linux-gnu",
            Platform::LinuxAarch64 => "aarch64-unknown-linux-gnu",
            Platform::MacosArm64 => "arm64-apple-macosx",
            Platform::MacosX86_64 => "x86_64-apple-macosx",
            Platform::IosArm64 => "arm64-apple-ios",
            Platform::IosArm64Simulator => "arm64-apple-ios-simulator",
            Platform::IosX86_64Simulator => "x86_64-apple-ios-simulator",
        }
    }

    pub fn parse(identifier: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.as_str() == identifier)
    }

    pub fn all() -> &'static [Platform] {
        &[
            Platform::LinuxX86_64,
            Platform::LinuxAarch64,
            Platform::MacosArm64,
            Platform::MacosX86_64,
            Platform::IosArm64,
            Platform::IosArm64Simulator,
            Platform::IosX86_64Simulator,
        ]
    }
}

impl FromStr for Platform {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ManifestError::UnknownPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
