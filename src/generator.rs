use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use crate::error::{ManifestError, Result};
use crate::manifest::{self, Manifest};

/// Everything needed to build one variant, before the platform is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub platform: String,
    pub library_path: String,
    pub header_paths: Vec<String>,
    pub modulemap_path: Option<String>,
}

impl VariantSpec {
    pub fn new(platform: impl Into<String>, library_path: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            library_path: library_path.into(),
            header_paths: Vec::new(),
            modulemap_path: None,
        }
    }

    pub fn header_path(mut self, path: impl Into<String>) -> Self {
        self.header_paths.push(path.into());
        self
    }

    pub fn modulemap_path(mut self, path: impl Into<String>) -> Self {
        self.modulemap_path = Some(path.into());
        self
    }
}

/// Parses the structured form `platform=ID,library=PATH[,header=PATH]...[,modulemap=PATH]`.
///
/// `header` may repeat; every other key must appear at most once. Empty
/// `header`/`modulemap` values are ignored.
impl FromStr for VariantSpec {
    type Err = ManifestError;

    fn from_str(spec: &str) -> Result<Self> {
        let invalid = |reason: String| ManifestError::InvalidVariantSpec {
            spec: spec.to_string(),
            reason,
        };

        let mut platform = None;
        let mut library_path = None;
        let mut header_paths = Vec::new();
        let mut modulemap_path = None;

        for entry in spec.split(',') {
            let (key, value) = entry
                .split_once('=')
                .ok_or_else(|| invalid(format!("expected key=value, got '{}'", entry)))?;

            let slot = match key.trim() {
                "platform" => &mut platform,
                "library" => &mut library_path,
                "modulemap" => &mut modulemap_path,
                "header" => {
                    if !value.is_empty() {
                        header_paths.push(value.to_string());
                    }
                    continue;
                }
                other => return Err(invalid(format!("unknown key '{}'", other))),
            };

            if slot.is_some() {
                return Err(invalid(format!("'{}' given more than once", key.trim())));
            }
            *slot = Some(value.to_string());
        }

        let platform = platform.ok_or_else(|| invalid("missing 'platform'".to_string()))?;
        let library_path = library_path.ok_or_else(|| invalid("missing 'library'".to_string()))?;

        Ok(Self {
            platform,
            library_path,
            header_paths,
            modulemap_path: modulemap_path.filter(|p| !p.is_empty()),
        })
    }
}

/// Positionally aligned per-platform lists, one entry per `--platform`.
#[derive(Debug, Clone, Default)]
pub struct PlatformArgs {
    pub platforms: Vec<String>,
    pub library_paths: Vec<String>,
    pub header_paths: Option<Vec<String>>,
    pub modulemap_paths: Option<Vec<String>>,
}

impl PlatformArgs {
    /// Zips the aligned lists into one spec per platform.
    ///
    /// Optional lists, when given, must have exactly one entry per platform.
    /// An empty entry stands for "nothing for this platform".
    pub fn into_variant_specs(self) -> Result<Vec<VariantSpec>> {
        let expected = self.platforms.len();
        check_count("library-path", expected, self.library_paths.len())?;
        if let Some(headers) = &self.header_paths {
            check_count("header-path", expected, headers.len())?;
        }
        if let Some(modulemaps) = &self.modulemap_paths {
            check_count("modulemap-path", expected, modulemaps.len())?;
        }

        let headers = self.header_paths.unwrap_or_else(|| vec![String::new(); expected]);
        let modulemaps = self
            .modulemap_paths
            .unwrap_or_else(|| vec![String::new(); expected]);

        let specs = self
            .platforms
            .into_iter()
            .zip(self.library_paths)
            .zip(headers.into_iter().zip(modulemaps))
            .map(|((platform, library_path), (header, modulemap))| VariantSpec {
                platform,
                library_path,
                header_paths: if header.is_empty() { Vec::new() } else { vec![header] },
                modulemap_path: Some(modulemap).filter(|m| !m.is_empty()),
            })
            .collect();

        Ok(specs)
    }
}

fn check_count(flag: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ManifestError::ArgumentCountMismatch {
            flag,
            expected,
            actual,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub name: String,
    pub version: String,
    pub variants: Vec<VariantSpec>,
    pub output: PathBuf,
}

/// Builds the manifest for `request` and writes it to `request.output`.
///
/// Every platform is validated before the filesystem is touched, so an unknown
/// platform never leaves a file behind.
pub fn generate(request: &GenerateRequest) -> Result<Manifest> {
    let variants = request
        .variants
        .iter()
        .map(|spec| {
            manifest::build_variant(
                &spec.platform,
                &spec.library_path,
                spec.header_paths.clone(),
                spec.modulemap_path.clone(),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        artifact = %request.name,
        variants = variants.len(),
        "built all variants"
    );

    let manifest = manifest::build_manifest(&request.name, &request.version, variants);
    manifest::write_manifest(&manifest, &request.output)?;

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::read_manifest;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn two_platforms() -> PlatformArgs {
        PlatformArgs {
            platforms: strings(&["linux-x86_64", "macos-arm64"]),
            library_paths: strings(&["linux/libfoo.a", "macos/libfoo.a"]),
            header_paths: None,
            modulemap_paths: None,
        }
    }

    #[test]
    fn test_align_without_optional_lists() {
        let specs = two_platforms().into_variant_specs().unwrap();

        assert_eq!(
            specs,
            vec![
                VariantSpec::new("linux-x86_64", "linux/libfoo.a"),
                VariantSpec::new("macos-arm64", "macos/libfoo.a"),
            ]
        );
    }

    #[test]
    fn test_align_empty_entries_mean_absent() {
        let args = PlatformArgs {
            header_paths: Some(strings(&["", "macos/include"])),
            modulemap_paths: Some(strings(&["linux/module.modulemap", ""])),
            ..two_platforms()
        };
        let specs = args.into_variant_specs().unwrap();

        assert!(specs[0].header_paths.is_empty());
        assert_eq!(specs[0].modulemap_path.as_deref(), Some("linux/module.modulemap"));
        assert_eq!(specs[1].header_paths, vec!["macos/include"]);
        assert_eq!(specs[1].modulemap_path, None);
    }

    #[test]
    fn test_align_library_count_mismatch() {
        let args = PlatformArgs {
            library_paths: strings(&["linux/libfoo.a"]),
            ..two_platforms()
        };

        let err = args.into_variant_specs().unwrap_err();
        assert!(matches!(
            err,
            ManifestError::ArgumentCountMismatch {
                flag: "library-path",
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_align_header_count_mismatch() {
        let args = PlatformArgs {
            header_paths: Some(strings(&["include"])),
            ..two_platforms()
        };

        let err = args.into_variant_specs().unwrap_err();
        assert!(matches!(
            err,
            ManifestError::ArgumentCountMismatch { flag: "header-path", .. }
        ));
    }

    #[test]
    fn test_align_modulemap_count_mismatch() {
        let args = PlatformArgs {
            modulemap_paths: Some(strings(&["a", "b", "c"])),
            ..two_platforms()
        };

        let err = args.into_variant_specs().unwrap_err();
        assert!(matches!(
            err,
            ManifestError::ArgumentCountMismatch {
                flag: "modulemap-path",
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_parse_structured_variant() {
        let spec: VariantSpec =
            "platform=ios-arm64,library=ios/libfoo.a,header=include,header=include/c,modulemap=include/module.modulemap"
                .parse()
                .unwrap();

        assert_eq!(
            spec,
            VariantSpec::new("ios-arm64", "ios/libfoo.a")
                .header_path("include")
                .header_path("include/c")
                .modulemap_path("include/module.modulemap")
        );
    }

    #[test]
    fn test_parse_structured_variant_errors() {
        for bad in [
            "library=libfoo.a",
            "platform=linux-x86_64",
            "platform=linux-x86_64,library=a,library=b",
            "platform=linux-x86_64,library=a,checksum=abc",
            "platform=linux-x86_64,library",
        ] {
            let err = bad.parse::<VariantSpec>().unwrap_err();
            assert!(
                matches!(err, ManifestError::InvalidVariantSpec { .. }),
                "expected InvalidVariantSpec for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_generate_writes_manifest() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out/info.json");
        let request = GenerateRequest {
            name: "foo".to_string(),
            version: "1.0.0".to_string(),
            variants: two_platforms().into_variant_specs().unwrap(),
            output: output.clone(),
        };

        let manifest = generate(&request).unwrap();

        let variants = &manifest.artifacts["foo"].variants;
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].supported_triples, vec!["x86_64-unknown-linux-gnu"]);
        assert_eq!(variants[1].supported_triples, vec!["arm64-apple-macosx"]);
        assert_eq!(read_manifest(&output).unwrap(), manifest);
    }

    #[test]
    fn test_generate_unknown_platform_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out/info.json");
        let request = GenerateRequest {
            name: "foo".to_string(),
            version: "1.0.0".to_string(),
            variants: vec![
                VariantSpec::new("linux-x86_64", "linux/libfoo.a"),
                VariantSpec::new("windows-x86_64", "foo.lib"),
            ],
            output: output.clone(),
        };

        let err = generate(&request).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownPlatform(ref p) if p == "windows-x86_64"));
        assert!(!output.exists());
        assert!(!dir.path().join("out").exists());
    }
}
