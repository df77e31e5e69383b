//! Runs one sealed-bid round end to end in a single process.
//!
//! ```text
//! cargo run --example sealed_auction -- [config.json] [price ...]
//! ```
//!
//! Without arguments this uses three nodes, sixteen prices and the bids
//! 7, 11, 2, 11, which ends in a tie between bidders 1 and 3.

use sealbid::{preprocess, reveal, AuctionConfig, Bid, DefaultField, Node, Request, SessionRng};
use std::error::Error;
use std::path::Path;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sealbid=info")),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("auction failed: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let (config, prices) = match args.next() {
        Some(path) => {
            let config = AuctionConfig::from_path(Path::new(&path))?;
            let prices = args
                .map(|arg| {
                    arg.parse::<usize>()
                        .map_err(|err| format!("invalid price {arg:?}: {err}"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            (config, prices)
        }
        None => (AuctionConfig::new(3, 4, 16), vec![7, 11, 2, 11]),
    };
    if prices.len() != config.bids {
        return Err(format!(
            "expected {} prices on the command line, got {}",
            config.bids,
            prices.len()
        )
        .into());
    }

    let mut rng = SessionRng::from_entropy();
    let mut nodes: Vec<Node<DefaultField>> = (0..config.nodes).map(|_| Node::new()).collect();
    preprocess(&mut nodes, &config, &mut rng)?;

    let mut bids = Vec::with_capacity(config.bids);
    for (identifier, &price) in prices.iter().enumerate() {
        let request = Request::new(identifier);
        let masks = nodes
            .iter_mut()
            .map(|node| node.masks(&request))
            .collect::<Result<Vec<_>, _>>()?;
        bids.push(Bid::new(&config, &request, &masks, price, &mut rng)?);
    }

    let shares = nodes
        .iter_mut()
        .map(|node| node.outcome(&bids))
        .collect::<Result<Vec<_>, _>>()?;
    let winners = reveal(&shares)?;
    println!("winning bidders: {winners:?}");
    Ok(())
}
