//! Catalog product definition.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// Kind of sound kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "Sample Kit")]
    SampleKit,
    #[serde(rename = "Drum Kit")]
    DrumKit,
    #[serde(rename = "Loop Kit")]
    LoopKit,
}

impl ProductCategory {
    /// Tag shown on product cards.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SampleKit => "Sample Kit",
            Self::DrumKit => "Drum Kit",
            Self::LoopKit => "Loop Kit",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A sound kit sold on the storefront.
///
/// Products are static configuration; the storefront never mutates them.
/// The whole value is copied into the cart so a cart survives catalog edits
/// between deploys without dangling ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique slug, also used in `/sound-kits/{id}`.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Category tag.
    pub category: ProductCategory,
    /// Unit price.
    pub price: Price,
    /// Marketing description.
    pub description: String,
    /// Cover image URL.
    pub image: String,
    /// Bullet list of what's included.
    pub features: Vec<String>,
}
