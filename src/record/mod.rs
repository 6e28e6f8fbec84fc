//! Record Module
//!
//! The catalog data model: items and the brands they are composed of.
//!
//! ## Responsibilities
//! - Define `Item` (the keyed record) and `Brand` (its owned sub-record)
//! - Bound the number of brands an item may carry
//! - Line-oriented text encoding shared by the snapshot and operation log
//!
//! ## Identity
//! `Item::code` is the only stable identity. Names are not unique; the
//! cache and fuzzy index key on them as a last-writer-wins secondary key.

pub mod codec;

use crate::error::{Result, StoreError};

/// Maximum number of brands a single item may carry
pub const MAX_BRANDS: usize = 10;

/// A brand line of an item
#[derive(Debug, Clone, PartialEq)]
pub struct Brand {
    pub name: String,
    pub code: i64,
    pub quantity: u32,
    pub price: f64,
}

impl Brand {
    pub fn new(name: impl Into<String>, code: i64, quantity: u32, price: f64) -> Self {
        Self {
            name: name.into(),
            code,
            quantity,
            price,
        }
    }
}

/// A catalogued item, keyed by `code`
///
/// `quantity` should equal the sum of the brand quantities whenever brands
/// are present. The store does not enforce this; callers do.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: String,
    pub code: i64,
    pub colour: String,
    pub quantity: u32,
    pub brands: Vec<Brand>,
}

impl Item {
    /// Create an item with no brands
    pub fn new(name: impl Into<String>, code: i64, colour: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            code,
            colour: colour.into(),
            quantity,
            brands: Vec::new(),
        }
    }

    /// Append a brand, failing once `MAX_BRANDS` is reached
    pub fn add_brand(&mut self, brand: Brand) -> Result<()> {
        if self.brands.len() >= MAX_BRANDS {
            return Err(StoreError::BrandLimit { max: MAX_BRANDS });
        }
        self.brands.push(brand);
        Ok(())
    }

    /// Builder-style `add_brand`
    pub fn with_brand(mut self, brand: Brand) -> Result<Self> {
        self.add_brand(brand)?;
        Ok(self)
    }

    /// Number of brands, kept for display
    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    /// Sum of brand quantities
    pub fn total_brand_quantity(&self) -> u64 {
        self.brands.iter().map(|b| u64::from(b.quantity)).sum()
    }
}
