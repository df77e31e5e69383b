#![deny(missing_docs)]

//! # sealbid
//!
//! **sealbid** runs a single-item, first-price, sealed-bid auction across a
//! fixed set of non-colluding computation nodes.  Bidders never reveal their
//! price, nodes never learn individual bids, and the operator learns only the
//! identities of the bidders tied at the highest price.
//!
//! ## How a round works
//!
//! * **Preprocessing**: [`preprocess`] sets up one secure product instance per
//!   permitted price on every [`Node`] (see [`column`]).
//! * **Masks**: each bidder sends a [`Request`] to every node and receives a
//!   [`Mask`] from each.
//! * **Bids**: the bidder folds the masks and its price into one [`Bid`]: random
//!   filler below its price, its identifier encoding (see [`encoding`]) at its
//!   price, and the identity above it.  The bid is broadcast to all nodes.
//! * **Shares**: once every bid is in, each node computes its
//!   [`OutcomeShare`] with [`Node::outcome`].
//! * **Reveal**: [`reveal`] combines the shares and decodes the winners from
//!   the highest price whose column is not the identity.
//!
//! ## Usage
//!
//! ```rust
//! use sealbid::{preprocess, reveal, AuctionConfig, Bid, DefaultField, Node, Request, SessionRng};
//!
//! let mut rng = SessionRng::from_entropy();
//! let config = AuctionConfig::new(3, 4, 16);
//! let mut nodes: Vec<Node<DefaultField>> = (0..config.nodes).map(|_| Node::new()).collect();
//! preprocess(&mut nodes, &config, &mut rng)?;
//!
//! let mut bids = Vec::new();
//! for (identifier, &price) in [7, 11, 2, 11].iter().enumerate() {
//!     let request = Request::new(identifier);
//!     let masks = nodes
//!         .iter_mut()
//!         .map(|node| node.masks(&request))
//!         .collect::<Result<Vec<_>, _>>()?;
//!     bids.push(Bid::new(&config, &request, &masks, price, &mut rng)?);
//! }
//!
//! let shares = nodes
//!     .iter_mut()
//!     .map(|node| node.outcome(&bids))
//!     .collect::<Result<Vec<_>, _>>()?;
//! let winners = reveal(&shares)?;
//! assert_eq!(winners.into_iter().collect::<Vec<_>>(), vec![1, 3]);
//! # Ok::<(), sealbid::AuctionError>(())
//! ```
//!
//! The field is any [`ark_ff::PrimeField`]; its size bounds the number of
//! bidders (see [`encoding::identifier_capacity`]).

use std::collections::BTreeSet;

mod bid;
pub mod column;
mod config;
pub mod encoding;
mod error;
mod field;
mod node;
mod prng;
mod reveal;
#[cfg(test)]
mod testing;

/// Index of a permitted price, in `[0, prices)`.
pub type PriceIndex = usize;

/// Identifier of a bidder within one round, in `[0, bids)`.
pub type Identifier = usize;

/// Identifiers of the bidders tied at the highest price.
pub type WinnerSet = BTreeSet<Identifier>;

pub use bid::{Bid, Mask, Request};
pub use column::{ColumnProtocol, ProductColumn};
pub use config::AuctionConfig;
pub use error::{AuctionError, ErrorKind, Result};
pub use field::{
    bit_length, log2_exact, max_exact_exponent, pow2, random_nonzero, random_unit, DefaultField,
};
pub use node::{preprocess, Node, RoundPhase};
pub use prng::SessionRng;
pub use reveal::{reveal, reveal_with, Outcome, OutcomeShare};
