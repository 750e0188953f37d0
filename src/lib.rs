//! lib target
//!
//! Skyline k-core community search in labelled undirected graphs.
//! Given a group size g and a core size k with k < g <= 2k+1, the drivers enumerate the
//! size-g vertex sets whose induced subgraph has minimum degree k and keep the
//! Pareto-optimal ones under group dominance over the vertex labels.

use env_logger::Builder;

#[macro_use]
extern crate lazy_static;

lazy_static! {
    static ref LOG: u64 = init_log();
}

// install a logger facility
fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    1
}

pub mod spatial;

pub mod skylayers;

pub mod graph;

pub mod dominance;

pub mod listing;

pub mod skyline;

pub mod io;

pub mod prelude;
