//! Shared helpers for unit tests.

use crate::bid::{Bid, Request};
use crate::config::AuctionConfig;
use crate::error::Result;
use crate::field::DefaultField;
use crate::node::{preprocess, Node};
use crate::reveal::OutcomeShare;
use crate::{PriceIndex, WinnerSet};
use rand::{
    rngs::{OsRng, StdRng},
    CryptoRng, Rng, RngCore, SeedableRng,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Returns a freshly seeded RNG, printing the seed so a failing run can be
/// replayed with [`init_testing_with_seed`].
pub(crate) fn init_testing() -> StdRng {
    let seed: [u8; 32] = OsRng.gen();
    eprintln!("To re-run test with the same randomness, use init_testing_with_seed() with the following seed:");
    eprintln!("\t{seed:?}");
    StdRng::from_seed(seed)
}

/// Seeded version of [`init_testing`] that also turns on logging for this
/// crate.  Meant for debugging a single failing test, not for normal runs.
#[allow(unused)]
pub(crate) fn init_testing_with_seed(seed: [u8; 32]) -> StdRng {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sealbid=debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .try_init();
    StdRng::from_seed(seed)
}

pub(crate) fn prepared_nodes<R>(config: &AuctionConfig, rng: &mut R) -> Vec<Node<DefaultField>>
where
    R: RngCore + CryptoRng,
{
    let mut nodes: Vec<Node<DefaultField>> = (0..config.nodes).map(|_| Node::new()).collect();
    preprocess(&mut nodes, config, rng).expect("preprocessing failed");
    nodes
}

/// Bidder `i` bids `prices[i]`; returns every bid in identifier order.
pub(crate) fn place_bids<R>(
    config: &AuctionConfig,
    nodes: &mut [Node<DefaultField>],
    prices: &[PriceIndex],
    rng: &mut R,
) -> Result<Vec<Bid<DefaultField>>>
where
    R: RngCore + CryptoRng,
{
    prices
        .iter()
        .enumerate()
        .map(|(identifier, &price)| {
            let request = Request::new(identifier);
            let masks = nodes
                .iter_mut()
                .map(|node| node.masks(&request))
                .collect::<Result<Vec<_>>>()?;
            Bid::new(config, &request, &masks, price, rng)
        })
        .collect()
}

/// Runs a whole round and returns every node's outcome share.
pub(crate) fn run_round<R>(
    config: &AuctionConfig,
    prices: &[PriceIndex],
    rng: &mut R,
) -> Result<Vec<OutcomeShare<DefaultField>>>
where
    R: RngCore + CryptoRng,
{
    let mut nodes = prepared_nodes(config, rng);
    let bids = place_bids(config, &mut nodes, prices, rng)?;
    nodes.iter_mut().map(|node| node.outcome(&bids)).collect()
}

/// Plaintext reference: identifiers whose price equals the maximum.
pub(crate) fn winners_by_max(prices: &[PriceIndex]) -> WinnerSet {
    let max = prices.iter().copied().max();
    prices
        .iter()
        .enumerate()
        .filter(|(_, &price)| Some(price) == max)
        .map(|(identifier, _)| identifier)
        .collect()
}
