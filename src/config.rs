//! Round configuration.

use crate::encoding::identifier_capacity;
use crate::error::{AuctionError, Result};
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters fixed for the lifetime of one auction round.
///
/// ```
/// use sealbid::{AuctionConfig, DefaultField};
///
/// let config = AuctionConfig::from_json_str(r#"{"nodes":3,"bids":4,"prices":16}"#).unwrap();
/// assert_eq!(config, AuctionConfig::new(3, 4, 16));
/// assert!(config.validate::<DefaultField>().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuctionConfig {
    /// Number of computation nodes.
    pub nodes: usize,
    /// Number of bids, which is also the exclusive bound on identifiers.
    pub bids: usize,
    /// Number of distinct permitted prices, `0..prices`.
    pub prices: usize,
}

impl AuctionConfig {
    /// Creates a configuration without validating it.
    pub fn new(nodes: usize, bids: usize, prices: usize) -> Self {
        Self {
            nodes,
            bids,
            prices,
        }
    }

    /// Checks the parameters against each other and against the field `F`.
    pub fn validate<F: PrimeField>(&self) -> Result<()> {
        if self.nodes == 0 || self.bids == 0 || self.prices == 0 {
            return Err(AuctionError::InvalidParameters {
                nodes: self.nodes,
                bids: self.bids,
                prices: self.prices,
            });
        }
        let capacity = identifier_capacity::<F>();
        if self.bids > capacity {
            return Err(AuctionError::FieldTooSmall {
                bids: self.bids,
                capacity,
            });
        }
        Ok(())
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|err| AuctionError::ConfigDecode(err.to_string()))
    }

    /// Loads a configuration from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|err| AuctionError::ConfigIo(err.to_string()))?;
        Self::from_json_str(&contents)
    }
}
