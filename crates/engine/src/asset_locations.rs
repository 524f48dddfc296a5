use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetLocationError {
    #[error("asset location must not be empty")]
    Empty,
    #[error("asset location must be relative to the asset root")]
    Absolute,
    #[error("asset location must not contain '\\\\'")]
    Backslash,
    #[error("asset location must not contain '..'")]
    ParentTraversal,
    #[error("asset location contains invalid character '{character}'")]
    InvalidCharacter { character: char },
    #[error("asset location must name a .png file")]
    NotPng,
}

pub(crate) fn validate_asset_location(location: &str) -> Result<(), AssetLocationError> {
    if location.is_empty() {
        return Err(AssetLocationError::Empty);
    }
    if location.starts_with('/') {
        return Err(AssetLocationError::Absolute);
    }
    if location.contains('\\') {
        return Err(AssetLocationError::Backslash);
    }
    if location.contains("..") {
        return Err(AssetLocationError::ParentTraversal);
    }
    if let Some(character) = location
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | '/' | '-' | '.')))
    {
        return Err(AssetLocationError::InvalidCharacter { character });
    }
    if !location.ends_with(".png") {
        return Err(AssetLocationError::NotPng);
    }
    Ok(())
}

pub(crate) fn resolve_asset_path(
    asset_root: &Path,
    location: &str,
) -> Result<PathBuf, AssetLocationError> {
    validate_asset_location(location)?;
    Ok(location
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(asset_root.to_path_buf(), |path, segment| path.join(segment)))
}
