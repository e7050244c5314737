//! Class vocabulary and output ordering
//!
//! The model emits a bare probability vector. Which class each position refers
//! to is fixed at training time, so the ordering lives here as an explicit,
//! checked mapping instead of an assumed constant.

use crate::error::ClassifierError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One of the diagnostic categories the model distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKey {
    Pituitary,
    Glioma,
    NoTumor,
    Meningioma,
}

impl ClassKey {
    pub const ALL: [ClassKey; 4] = [
        ClassKey::Pituitary,
        ClassKey::Glioma,
        ClassKey::NoTumor,
        ClassKey::Meningioma,
    ];

    /// Short identifier used in label files and metrics
    pub fn key(self) -> &'static str {
        match self {
            ClassKey::Pituitary => "pituitary",
            ClassKey::Glioma => "glioma",
            ClassKey::NoTumor => "notumor",
            ClassKey::Meningioma => "meningioma",
        }
    }

    /// Human-readable label shown to end users
    pub fn display_label(self) -> &'static str {
        match self {
            ClassKey::Pituitary => "Pituitary Tumor",
            ClassKey::Glioma => "Glioma",
            ClassKey::NoTumor => "No Tumor",
            ClassKey::Meningioma => "Meningioma",
        }
    }
}

impl std::fmt::Display for ClassKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Ordered class keys, position `i` names output `i` of the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabels {
    order: Vec<ClassKey>,
}

impl Default for ClassLabels {
    /// Training order of the published brain MRI model
    fn default() -> Self {
        Self {
            order: ClassKey::ALL.to_vec(),
        }
    }
}

impl ClassLabels {
    /// Build from an explicit order, every known key exactly once
    pub fn new(order: Vec<ClassKey>) -> Result<Self, ClassifierError> {
        if order.len() != ClassKey::ALL.len() {
            return Err(ClassifierError::InvalidLabels(format!(
                "expected {} class keys, got {}",
                ClassKey::ALL.len(),
                order.len()
            )));
        }

        let mut seen = HashSet::new();
        for key in &order {
            if !seen.insert(*key) {
                return Err(ClassifierError::InvalidLabels(format!(
                    "duplicate class key '{}'",
                    key
                )));
            }
        }

        Ok(Self { order })
    }

    /// Load a JSON array of class keys, e.g. `["pituitary", "glioma", ...]`
    pub fn from_file(path: &Path) -> Result<Self, ClassifierError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::InvalidLabels(format!("failed to read {}: {}", path.display(), e))
        })?;
        let order: Vec<ClassKey> = serde_json::from_str(&content).map_err(|e| {
            ClassifierError::InvalidLabels(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Self::new(order)
    }

    /// Labels file if given, otherwise the default order
    pub fn load(path: Option<&Path>) -> Result<Self, ClassifierError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ClassKey> + '_ {
        self.order.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<ClassKey> {
        self.order.get(index).copied()
    }
}
