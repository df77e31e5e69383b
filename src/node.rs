//! Computation nodes.
//!
//! A [`Node`] holds one [`ColumnProtocol`] instance per permitted price and
//! drives all of them in lockstep: the nth distinct request it serves takes
//! slot `n` of every column, and once every slot is taken it folds the
//! broadcast bids column by column into its [`OutcomeShare`].  Columns share
//! no state, so preprocessing, mask issuance and share computation are spread
//! across price indices with rayon once a round is wide enough.
//!
//! A node serves exactly one round.  It can only move forward through
//! [`RoundPhase`]; a retried round needs fresh nodes and a fresh
//! [`preprocess`].

use crate::bid::{Bid, Mask, Request};
use crate::column::{ColumnProtocol, ProductColumn};
use crate::config::AuctionConfig;
use crate::error::{AuctionError, Result};
use crate::prng::SessionRng;
use crate::reveal::OutcomeShare;
use crate::Identifier;
use ark_ff::PrimeField;
use rand::{CryptoRng, RngCore, SeedableRng};
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, info, instrument, warn};

#[cfg(not(target_arch = "wasm32"))]
const PARALLEL_THRESHOLD: usize = 32;

/// Applies `f` to every column, in parallel when the round is wide enough.
fn map_columns<T, U, G>(items: &[T], f: G) -> Vec<U>
where
    T: Sync,
    U: Send,
    G: Fn(usize, &T) -> U + Sync + Send,
{
    #[cfg(not(target_arch = "wasm32"))]
    {
        if items.len() >= PARALLEL_THRESHOLD && rayon::current_num_threads() > 1 {
            return items
                .par_iter()
                .enumerate()
                .map(|(index, item)| f(index, item))
                .collect();
        }
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| f(index, item))
        .collect()
}

/// Position of a node in the round's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundPhase {
    /// Not yet preprocessed.
    Unprepared,
    /// Preprocessed, no request served yet.
    Preprocessed,
    /// Some but not all slots have been handed out.
    ServingRequests,
    /// Every slot is taken; waiting for the full bid set.
    AwaitingBids,
    /// This node's outcome share has been produced.
    SharesComputed,
    /// The round was abandoned and its material discarded.
    Aborted,
}

struct Round<C> {
    capacity: usize,
    columns: Vec<C>,
    served: HashSet<Identifier>,
}

enum State<C> {
    Unprepared,
    Open(Round<C>),
    Settled,
    Aborted,
}

/// One party of the auction.
pub struct Node<F: PrimeField, C: ColumnProtocol<F> = ProductColumn<F>> {
    party: Option<usize>,
    state: State<C>,
    _field: PhantomData<F>,
}

impl<F: PrimeField, C: ColumnProtocol<F>> fmt::Debug for Node<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("party", &self.party)
            .field("phase", &self.phase())
            .finish()
    }
}

impl<F: PrimeField, C: ColumnProtocol<F>> Default for Node<F, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField, C: ColumnProtocol<F>> Node<F, C> {
    /// Creates a node awaiting preprocessing.
    pub fn new() -> Self {
        Self {
            party: None,
            state: State::Unprepared,
            _field: PhantomData,
        }
    }

    /// Party index assigned at preprocessing.
    pub fn party(&self) -> Option<usize> {
        self.party
    }

    /// Current phase of this node's round.
    pub fn phase(&self) -> RoundPhase {
        match &self.state {
            State::Unprepared => RoundPhase::Unprepared,
            State::Open(round) if round.served.is_empty() => RoundPhase::Preprocessed,
            State::Open(round) if round.served.len() < round.capacity => {
                RoundPhase::ServingRequests
            }
            State::Open(_) => RoundPhase::AwaitingBids,
            State::Settled => RoundPhase::SharesComputed,
            State::Aborted => RoundPhase::Aborted,
        }
    }

    fn open_round(&mut self) -> Result<&mut Round<C>> {
        match &mut self.state {
            State::Open(round) => Ok(round),
            State::Unprepared => Err(AuctionError::NotPreprocessed),
            State::Settled | State::Aborted => Err(AuctionError::RoundClosed),
        }
    }

    /// Issues this node's masks for `request`, one per price.
    ///
    /// The nth distinct request consumes the nth preprocessed slot of every
    /// column.  Taking `&mut self` makes slot assignment atomic per node.
    #[instrument(skip_all, fields(party = ?self.party, identifier = request.identifier()), err(Debug))]
    pub fn masks(&mut self, request: &Request) -> Result<Mask<F>> {
        let identifier = request.identifier();
        let round = self.open_round()?;
        if round.served.len() >= round.capacity {
            return Err(AuctionError::CapacityExhausted {
                capacity: round.capacity,
            });
        }
        if round.served.contains(&identifier) {
            return Err(AuctionError::DuplicateRequest { identifier });
        }
        if identifier >= round.capacity {
            return Err(AuctionError::IdentifierOutOfRange {
                identifier,
                limit: round.capacity,
            });
        }

        let slot = round.served.len();
        let values = map_columns(&round.columns, |_, column| column.issue_mask(slot))
            .into_iter()
            .collect::<Option<Vec<F>>>()
            .ok_or(AuctionError::CapacityExhausted {
                capacity: round.capacity,
            })?;
        round.served.insert(identifier);
        debug!(slot, "issued masks");
        Ok(Mask::from_parts(identifier, values))
    }

    /// Computes this node's share of the auction outcome from the full bid set.
    ///
    /// Every preprocessed slot must have been served and `bids` must hold
    /// exactly one bid per served identifier, in any order.  Closes the round.
    #[instrument(skip_all, fields(party = ?self.party, bids = bids.len()), err(Debug))]
    pub fn outcome(&mut self, bids: &[Bid<F>]) -> Result<OutcomeShare<F>> {
        let round = self.open_round()?;
        if round.served.len() < round.capacity {
            return Err(AuctionError::RoundIncomplete {
                served: round.served.len(),
                expected: round.capacity,
            });
        }
        if bids.len() != round.served.len() {
            return Err(AuctionError::UnexpectedBidCount {
                expected: round.served.len(),
                actual: bids.len(),
            });
        }
        let prices = round.columns.len();
        let mut seen = HashSet::with_capacity(bids.len());
        for bid in bids {
            let identifier = bid.identifier();
            if bid.len() != prices {
                return Err(AuctionError::LengthMismatch {
                    what: "bid",
                    expected: prices,
                    actual: bid.len(),
                });
            }
            if !round.served.contains(&identifier) {
                return Err(AuctionError::UnknownBidder { identifier });
            }
            if !seen.insert(identifier) {
                return Err(AuctionError::DuplicateBid { identifier });
            }
        }

        let values = map_columns(&round.columns, |price, column| {
            let factors: Vec<F> = bids.iter().map(|bid| bid.values()[price]).collect();
            column.combine(&factors)
        });
        self.state = State::Settled;
        info!("outcome share computed");
        Ok(OutcomeShare::from_values(values))
    }

    /// Abandons the round, discarding every preprocessed slot.
    pub fn abort(&mut self) {
        if !matches!(self.state, State::Aborted) {
            warn!(party = ?self.party, phase = ?self.phase(), "round aborted");
        }
        self.state = State::Aborted;
    }
}

/// Simulates the offline preprocessing among `nodes` for one round.
///
/// Each price gets its own column instance per node, seeded from a fresh
/// 32-byte draw of `rng`.  Fails if the configuration is invalid for `F`, if
/// `nodes` does not match it, or if any node was already preprocessed.
#[instrument(
    skip_all,
    fields(nodes = config.nodes, bids = config.bids, prices = config.prices),
    err(Debug)
)]
pub fn preprocess<F, C, R>(
    nodes: &mut [Node<F, C>],
    config: &AuctionConfig,
    rng: &mut R,
) -> Result<()>
where
    F: PrimeField,
    C: ColumnProtocol<F>,
    R: RngCore + CryptoRng + ?Sized,
{
    config.validate::<F>()?;
    if nodes.len() != config.nodes {
        return Err(AuctionError::NodeCountMismatch {
            expected: config.nodes,
            actual: nodes.len(),
        });
    }
    if nodes
        .iter()
        .any(|node| !matches!(node.state, State::Unprepared))
    {
        return Err(AuctionError::AlreadyPreprocessed);
    }

    let seeds: Vec<[u8; 32]> = (0..config.prices)
        .map(|_| {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            seed
        })
        .collect();
    let per_column: Vec<Vec<C>> = map_columns(&seeds, |_, seed| {
        let mut column_rng = SessionRng::from_seed(*seed);
        C::preprocess(config.nodes, config.bids, &mut column_rng)
    });

    let mut per_node: Vec<Vec<C>> = (0..config.nodes)
        .map(|_| Vec::with_capacity(config.prices))
        .collect();
    for column in per_column {
        if column.len() != config.nodes {
            return Err(AuctionError::LengthMismatch {
                what: "column preprocessing",
                expected: config.nodes,
                actual: column.len(),
            });
        }
        for (party, instance) in column.into_iter().enumerate() {
            per_node[party].push(instance);
        }
    }

    for (party, (node, columns)) in nodes.iter_mut().zip(per_node).enumerate() {
        node.party = Some(party);
        node.state = State::Open(Round {
            capacity: config.bids,
            columns,
            served: HashSet::with_capacity(config.bids),
        });
    }
    info!("preprocessing complete");
    Ok(())
}
