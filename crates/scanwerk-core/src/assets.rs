// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trained-data assets — SHA-256 verification of the language model files a
// recognition provider loads at start-up.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, ScanError};

/// A language model file and the digest it must have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainedDataAsset {
    /// Path to the asset. Relative paths resolve against the asset root.
    pub path: PathBuf,
    /// Expected SHA-256 digest, lowercase hex.
    pub sha256: String,
}

impl TrainedDataAsset {
    pub fn new(path: impl Into<PathBuf>, sha256: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sha256: sha256.into(),
        }
    }

    /// Resolve the asset path against `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            root.join(&self.path)
        }
    }

    /// Check loaded file contents against the expected digest. Digest
    /// case is not significant.
    pub fn check(&self, contents: &[u8]) -> Result<()> {
        let actual = sha256_hex(contents);
        if actual.eq_ignore_ascii_case(&self.sha256) {
            return Ok(());
        }
        Err(ScanError::IntegrityMismatch {
            expected: self.sha256.clone(),
            actual,
        })
    }
}

/// Lowercase hex SHA-256 of `contents`, the form [`TrainedDataAsset::sha256`]
/// is written in.
pub fn sha256_hex(contents: &[u8]) -> String {
    hex::encode(Sha256::digest(contents))
}

/// Check that an asset exists under `root` and has the expected digest.
pub fn verify_asset(asset: &TrainedDataAsset, root: &Path) -> Result<()> {
    let path = asset.resolve(root);
    let contents = match std::fs::read(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScanError::AssetMissing(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    asset.check(&contents)?;
    debug!(asset = %path.display(), bytes = contents.len(), "trained-data asset verified");
    Ok(())
}

/// Verify every asset, stopping at the first failure.
pub fn verify_assets(assets: &[TrainedDataAsset], root: &Path) -> Result<()> {
    assets.iter().try_for_each(|asset| verify_asset(asset, root))
}
