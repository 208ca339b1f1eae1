use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ManifestError, Result};
use crate::target_mapping::Platform;

pub const SCHEMA_VERSION: &str = "1.0";

/// Root of an artifact bundle's `info.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub schema_version: String,
    pub artifacts: BTreeMap<String, Artifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub kind: ArtifactType,
    pub version: String,
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactType {
    StaticLibrary,
}

/// One platform's build of the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub path: String,
    pub supported_triples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_library_metadata: Option<StaticLibraryMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticLibraryMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_map_path: Option<String>,
}

/// Builds the variant record for a single platform.
///
/// Paths are taken verbatim. The metadata record is left out entirely when
/// there are neither header paths nor a module map.
pub fn build_variant(
    platform_identifier: &str,
    library_path: &str,
    header_paths: Vec<String>,
    modulemap_path: Option<String>,
) -> Result<Variant> {
    let platform: Platform = platform_identifier.parse()?;

    let static_library_metadata = if header_paths.is_empty() && modulemap_path.is_none() {
        None
    } else {
        Some(StaticLibraryMetadata {
            header_paths,
            module_map_path: modulemap_path,
        })
    };

    debug!(
        platform = %platform,
        triple = platform.triple(),
        library = library_path,
        "built variant"
    );

    Ok(Variant {
        path: library_path.to_string(),
        supported_triples: vec![platform.triple().to_string()],
        static_library_metadata,
    })
}

pub fn build_manifest(artifact_name: &str, version: &str, variants: Vec<Variant>) -> Manifest {
    let artifact = Artifact {
        kind: ArtifactType::StaticLibrary,
        version: version.to_string(),
        variants,
    };

    Manifest {
        schema_version: SCHEMA_VERSION.to_string(),
        artifacts: BTreeMap::from([(artifact_name.to_string(), artifact)]),
    }
}

/// Serializes the manifest as 2-space indented JSON with a trailing newline.
pub fn to_json(manifest: &Manifest) -> Result<String> {
    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    Ok(json)
}

/// Writes the manifest to `output_path`, creating parent directories and
/// replacing any existing file.
pub fn write_manifest(manifest: &Manifest, output_path: &Path) -> Result<PathBuf> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ManifestError::io(parent, e))?;
    }

    let json = to_json(manifest)?;
    fs::write(output_path, json).map_err(|e| ManifestError::io(output_path, e))?;

    info!(path = %output_path.display(), "wrote manifest");

    Ok(output_path.to_path_buf())
}

pub fn read_manifest(manifest_path: &Path) -> Result<Manifest> {
    let content =
        fs::read_to_string(manifest_path).map_err(|e| ManifestError::io(manifest_path, e))?;
    Ok(serde_json::from_str(&content)?)
}
