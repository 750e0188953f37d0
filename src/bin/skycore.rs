//! an executable for skyline k-core community search
//! example usage:
//! skycore 1 4 2 5 0 0        -- sequential skyline, casestudy dataset, 2d independent labels
//! skycore 1 4 2 5 0 1 8     -- same search with the parallel driver on 8 threads
//! skycore 1 4 2 5 0 2       -- exhaustive baseline
//!
//! positional arguments are : kPlexSize groupSize dimension dataset labelType algorithm [nThreads]
//! internally coreSize = groupSize - kPlexSize - 1 and the search requires
//! coreSize < groupSize <= 2 * coreSize + 1

use clap::{Arg, Command};
use cpu_time::ProcessTime;
use std::time::SystemTime;

use skycore::graph::Graph;
use skycore::io::csv::{load_edges, load_labels};
use skycore::skyline::{baseline, parallel, sequential};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    SkCore,
    PkCore,
    Baseline,
}

fn parse_positional_usize(matches: &clap::ArgMatches, name: &str) -> usize {
    match matches.value_of(name) {
        Some(str) => match str.parse::<usize>() {
            Ok(val) => val,
            _ => {
                println!("could not parse {}...", name);
                std::process::exit(-1);
            }
        },
        _ => {
            println!("missing argument {}...", name);
            std::process::exit(-1);
        }
    }
} // end of parse_positional_usize

pub fn main() {
    let _ = env_logger::builder().try_init();
    log::info!("logger initialized");
    //
    let matches = Command::new("skycore")
        .arg_required_else_help(true)
        .arg(
            Arg::new("kPlexSize")
                .index(1)
                .takes_value(true)
                .required(true)
                .help("co-plex parameter k ; coreSize = groupSize - kPlexSize - 1"),
        )
        .arg(
            Arg::new("groupSize")
                .index(2)
                .takes_value(true)
                .required(true)
                .help("number of vertices g in each community"),
        )
        .arg(
            Arg::new("dimension")
                .index(3)
                .takes_value(true)
                .required(true)
                .help("label dimensionality, at most 32"),
        )
        .arg(
            Arg::new("dataset")
                .index(4)
                .takes_value(true)
                .required(true)
                .help("4:YouTube 5:Casestudy 10:LiveJournal 11:DBLP 12:Amazon 13:WikiTalk 14:CitPatent"),
        )
        .arg(
            Arg::new("labelType")
                .index(5)
                .takes_value(true)
                .required(true)
                .help("0:indep 1:corr 2:anticorr"),
        )
        .arg(
            Arg::new("algorithm")
                .index(6)
                .takes_value(true)
                .required(true)
                .help("0:sequential skyline 1:parallel skyline 2:baseline"),
        )
        .arg(
            Arg::new("nThreads")
                .index(7)
                .takes_value(true)
                .help("number of threads, required with the parallel algorithm"),
        )
        .get_matches();
    //
    let k_plex_size = parse_positional_usize(&matches, "kPlexSize");
    let group_size = parse_positional_usize(&matches, "groupSize");
    let dimension = parse_positional_usize(&matches, "dimension");
    let dataset = parse_positional_usize(&matches, "dataset");
    let label_type = parse_positional_usize(&matches, "labelType");
    //
    if k_plex_size + 1 > group_size {
        println!("invalid k and/or g parameters...");
        std::process::exit(-1);
    }
    // convert to co-plex for backwards compatibility with earlier design choices
    let core_size = group_size - k_plex_size - 1;
    if group_size > 2 * core_size + 1 || group_size <= core_size {
        println!("invalid k and/or g parameters...");
        std::process::exit(-1);
    }
    if dimension == 0 || dimension > 32 {
        println!("invalid dimension, the partition mask is one machine word...");
        std::process::exit(-1);
    }
    //
    println!("coreSize = {}", core_size);
    println!("groupSize = {}", group_size);
    println!("dimension = {}", dimension);
    //
    // node_size is the maximum node id, which may differ from the actual number of nodes
    let (edges_file_path, node_size) = match dataset {
        4 => {
            println!("dataset = YouTube");
            ("../../datasets/com-youtube.ungraph_undirected.csv", 1157828)
        }
        5 => {
            println!("dataset = Casestudy");
            ("../../datasets/case_study_edges.csv", 5856)
        }
        10 => {
            println!("dataset = LiveJournal");
            ("../../datasets/LiveJournal_undirected.csv", 4847571)
        }
        11 => {
            println!("dataset = DBLP");
            ("../../datasets/dblp_undirected.csv", 425957)
        }
        12 => {
            println!("dataset = Amazon");
            ("../../datasets/amazon_undirected.csv", 735324)
        }
        13 => {
            println!("dataset = WikiTalk");
            ("../../datasets/wiki_talk_undirected.csv", 2394385)
        }
        14 => {
            println!("dataset = CitPatent");
            ("../../datasets/cit_patents_undirected.csv", 6009555)
        }
        _ => {
            println!("invalid dataset...");
            std::process::exit(-1);
        }
    };
    //
    let label_prefix = match label_type {
        0 => {
            println!("label type = independent");
            "indep-"
        }
        1 => {
            println!("label type = correlated");
            "corr-scale=0.5-"
        }
        2 => {
            println!("label type = anti-correlated");
            "anticorr-"
        }
        _ => {
            println!("invalid label type...");
            std::process::exit(-1);
        }
    };
    let labels_file_path = format!("../../datasets/{}{}d.csv", label_prefix, dimension);
    //
    let algorithm = match matches.value_of("algorithm") {
        Some("0") => Algorithm::SkCore,
        Some("1") => Algorithm::PkCore,
        Some("2") => Algorithm::Baseline,
        _ => {
            println!("invalid algorithm...");
            std::process::exit(-1);
        }
    };
    //
    let mut n_threads = 0;
    if algorithm == Algorithm::PkCore {
        n_threads = match matches.value_of("nThreads") {
            Some(str) => str.parse::<usize>().unwrap_or(0),
            _ => 0,
        };
        if n_threads < 1 {
            println!("invalid number of threads...");
            std::process::exit(-1);
        }
        println!("running in parallel - > #threads: {}", n_threads);
    } else {
        println!("running sequentially...");
    }
    //
    println!("--**--**--**--**");
    //
    let sys_start = SystemTime::now();
    let cpu_start = ProcessTime::now();
    let edges = match load_edges(std::path::Path::new(edges_file_path), node_size) {
        Ok(edges) => edges,
        Err(e) => {
            println!("could not load edges : {}", e);
            std::process::exit(-1);
        }
    };
    let labels = match load_labels(std::path::Path::new(&labels_file_path), node_size) {
        Ok(labels) => labels,
        Err(e) => {
            println!("could not load labels : {}", e);
            std::process::exit(-1);
        }
    };
    println!("Data loaded...");
    let mut graph = Graph::new(edges, labels);
    graph.update();
    println!("Preprocessing done...");
    println!(
        "Preprocessing Time: {} (ms), cpu {} (ms)",
        sys_start.elapsed().unwrap().as_millis(),
        cpu_start.elapsed().as_millis()
    );
    //
    let sys_start = SystemTime::now();
    let cpu_start = ProcessTime::now();
    let communities = match algorithm {
        Algorithm::SkCore => {
            let communities = sequential::get_skyline_communities(&mut graph, core_size, group_size);
            println!(
                "SK-Core Execution Time: {} (ms), cpu {} (ms)",
                sys_start.elapsed().unwrap().as_millis(),
                cpu_start.elapsed().as_millis()
            );
            communities
        }
        Algorithm::PkCore => {
            let communities =
                match parallel::get_skyline_communities(&mut graph, core_size, group_size, n_threads)
                {
                    Ok(communities) => communities,
                    Err(e) => {
                        println!("parallel driver failed : {}", e);
                        std::process::exit(-1);
                    }
                };
            println!(
                "PK-Core Execution Time: {} (ms), cpu {} (ms)",
                sys_start.elapsed().unwrap().as_millis(),
                cpu_start.elapsed().as_millis()
            );
            communities
        }
        Algorithm::Baseline => {
            let communities = baseline::get_skyline_communities(&graph, core_size, group_size);
            println!(
                "Baseline Execution Time: {} (ms), cpu {} (ms)",
                sys_start.elapsed().unwrap().as_millis(),
                cpu_start.elapsed().as_millis()
            );
            communities
        }
    };
    //
    println!("#Skyline Groups: {}", communities.len());
} // end of main
