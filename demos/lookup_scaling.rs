//! Compare longest-prefix-match lookups of the trie against a linear scan, for tables of
//! increasing size. Every answer of the trie is checked against the linear scan.
//!
//! ```text
//! LPM_LOG_LEVEL=debug cargo run --release --example lookup_scaling -- --sizes 100,1000,10000
//! ```

use std::process::exit;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use env_logger::Env;
use ipnet::{Ipv4Net, Ipv6Net};
use log::{debug, error, info};
use lpm_trie::{LinearPrefixSet, Prefix, PrefixTrie};
use rand::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Family {
    Ipv4,
    Ipv6,
}

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Number of registered prefixes for each round
    #[clap(
        short,
        long,
        value_delimiter = ',',
        default_value = "100,500,1000,2500,5000",
        env = "LPM_SIZES"
    )]
    sizes: Vec<usize>,

    /// Number of random lookups for each round
    #[clap(short, long, default_value = "1000", env = "LPM_LOOKUPS")]
    lookups: usize,

    /// Address family of the generated prefixes
    #[clap(short, long, value_enum, default_value = "ipv4", env = "LPM_FAMILY")]
    family: Family,

    /// Fraction of the prefixes to remove after the lookups, to observe node pruning
    #[clap(short, long, default_value = "0.5", env = "LPM_REMOVE_FRACTION")]
    remove_fraction: f64,
}

struct Round {
    size: usize,
    build: Duration,
    trie: Duration,
    linear: Duration,
    nodes: usize,
    nodes_after_removal: usize,
}

/// Random IPv4 prefix with a mask between /8 and /30.
fn random_v4(rng: &mut ThreadRng) -> Ipv4Net {
    let len = rng.gen_range(8..=30);
    Ipv4Net::from_repr_len(rng.gen::<u32>(), len)
}

/// Random IPv6 prefix with a mask between /16 and /64.
fn random_v6(rng: &mut ThreadRng) -> Ipv6Net {
    let len = rng.gen_range(16..=64);
    Ipv6Net::from_repr_len(rng.gen::<u128>(), len)
}

fn run_round<P, F, A>(cli: &Cli, size: usize, gen_prefix: F, gen_addr: A) -> Result<Round, String>
where
    P: Prefix + Copy + std::fmt::Debug,
    F: Fn(&mut ThreadRng) -> P,
    A: Fn(&mut ThreadRng) -> P::Addr,
    P::Addr: std::fmt::Debug,
{
    let mut rng = thread_rng();
    let prefixes = (0..size).map(|_| gen_prefix(&mut rng)).collect::<Vec<_>>();
    let queries = (0..cli.lookups)
        .map(|_| gen_addr(&mut rng))
        .collect::<Vec<_>>();

    let mut linear = LinearPrefixSet::new();
    for (i, p) in prefixes.iter().enumerate() {
        linear.insert(*p, i).map_err(|e| e.to_string())?;
    }

    let start = Instant::now();
    let mut trie = PrefixTrie::new();
    for (i, p) in prefixes.iter().enumerate() {
        trie.insert(*p, i).map_err(|e| e.to_string())?;
    }
    let build = start.elapsed();

    let start = Instant::now();
    let trie_answers = queries
        .iter()
        .map(|a| trie.longest_match(a).copied())
        .collect::<Vec<_>>();
    let trie_time = start.elapsed();

    let start = Instant::now();
    let linear_answers = queries
        .iter()
        .map(|a| linear.longest_match(a).copied())
        .collect::<Vec<_>>();
    let linear_time = start.elapsed();

    for ((addr, t), l) in queries.iter().zip(&trie_answers).zip(&linear_answers) {
        if t != l {
            return Err(format!(
                "lookup of {addr:?} differs: trie {t:?}, linear {l:?}"
            ));
        }
    }
    debug!(
        "{} of {} lookups matched a prefix",
        trie_answers.iter().filter(|x| x.is_some()).count(),
        queries.len()
    );

    let nodes = trie.node_count();
    let num_remove = (size as f64 * cli.remove_fraction.clamp(0.0, 1.0)) as usize;
    for p in prefixes.choose_multiple(&mut rng, num_remove) {
        trie.remove(p);
    }

    Ok(Round {
        size,
        build,
        trie: trie_time,
        linear: linear_time,
        nodes,
        nodes_after_removal: trie.node_count(),
    })
}

fn main() {
    let cli = Cli::parse();
    let env = Env::new().filter_or("LPM_LOG_LEVEL", "info");
    env_logger::init_from_env(env);

    info!(
        "{:?}: {} lookups per round, removing {:.0}% of the prefixes afterwards",
        cli.family,
        cli.lookups,
        cli.remove_fraction * 100.0
    );

    let mut rounds = Vec::new();
    for &size in &cli.sizes {
        info!("testing with {size} prefixes");
        let round = match cli.family {
            Family::Ipv4 => run_round(&cli, size, random_v4, |rng| rng.gen::<u32>().into()),
            Family::Ipv6 => run_round(&cli, size, random_v6, |rng| rng.gen::<u128>().into()),
        };
        match round {
            Ok(r) => rounds.push(r),
            Err(e) => {
                error!("{e}");
                exit(1);
            }
        }
    }

    info!(
        "{:>10} {:>12} {:>12} {:>12} {:>8} {:>10} {:>10}",
        "prefixes", "build", "trie", "linear", "speedup", "nodes", "after rm"
    );
    for r in rounds {
        info!(
            "{:>10} {:>12?} {:>12?} {:>12?} {:>7.1}x {:>10} {:>10}",
            r.size,
            r.build,
            r.trie,
            r.linear,
            r.linear.as_secs_f64() / r.trie.as_secs_f64().max(f64::EPSILON),
            r.nodes,
            r.nodes_after_removal
        );
    }
}
