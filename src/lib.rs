pub mod cli;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod target_mapping;

pub use error::{ManifestError, Result};
pub use generator::{GenerateRequest, PlatformArgs, VariantSpec, generate};
pub use manifest::{Manifest, Variant, build_manifest, build_variant};
pub use target_mapping::Platform;
