//! Baseline skyline computation without layer pruning.
//!
//! Lists every size-g k-core of the graph, then reduces the list with two-sided group
//! dominance checks. Orders of magnitude slower than the pruned drivers on real data,
//! but independent of the sky-layer machinery, which makes it the ground truth the
//! drivers are tested against.

use cpu_time::ProcessTime;
use std::time::SystemTime;

use crate::dominance::group_dominance;
use crate::graph::{Graph, GroupList};
use crate::listing::list_all_kcores;

/// Computes the skyline of size-`group_size` communities by exhaustive listing followed
/// by a full pairwise reduction
pub fn get_skyline_communities(
    graph: &Graph,
    core_size: usize,
    group_size: usize,
) -> GroupList {
    let cpu_start = ProcessTime::now();
    let sys_start = SystemTime::now();
    //
    let candidates = list_all_kcores(graph.edges.clone(), group_size, core_size);
    let labels = &graph.labels;
    //
    let mut skyline = GroupList::new();
    for candidate in candidates {
        if skyline
            .iter()
            .any(|kept| group_dominance(kept, &candidate, labels))
        {
            continue;
        }
        // the newcomer may retroactively beat earlier survivors
        skyline.retain(|kept| !group_dominance(&candidate, kept, labels));
        skyline.push(candidate);
    }
    //
    log::info!(
        "baseline skyline : {} groups, sys time(s) {:.2e} cpu time(s) {:.2e}",
        skyline.len(),
        sys_start.elapsed().unwrap().as_secs_f64(),
        cpu_start.elapsed().as_secs_f64()
    );
    skyline
} // end of get_skyline_communities

//==========================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::graph::adjacency_from_edge_pairs;
    use crate::skyline::sequential;
    use crate::spatial::Label;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn build_graph(num_vertices: usize, pairs: &[(usize, usize)], labels: Vec<Label>) -> Graph {
        let edges = adjacency_from_edge_pairs(num_vertices, pairs);
        let mut graph = Graph::new(edges, labels);
        graph.update();
        graph
    }

    fn as_sets(groups: &GroupList) -> Vec<Vec<usize>> {
        let mut result: Vec<Vec<usize>> = groups
            .iter()
            .map(|g| {
                let mut g = g.clone();
                g.sort_unstable();
                g
            })
            .collect();
        result.sort();
        result
    }

    #[test]
    fn agrees_with_sequential_driver() {
        log_init_test();
        //
        let mut k4 = Vec::new();
        for u in 0..4 {
            for v in u + 1..4 {
                k4.push((u, v));
            }
        }
        let cases: Vec<(usize, Vec<(usize, usize)>, Vec<Label>)> = vec![
            (
                4,
                vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)],
                vec![vec![1, 5], vec![2, 4], vec![3, 3], vec![5, 1]],
            ),
            (
                4,
                k4,
                vec![vec![1, 1], vec![2, 2], vec![3, 3], vec![4, 4]],
            ),
            (
                6,
                vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)],
                vec![
                    vec![1, 9],
                    vec![2, 8],
                    vec![3, 7],
                    vec![9, 1],
                    vec![8, 2],
                    vec![7, 3],
                ],
            ),
        ];
        for (num_vertices, pairs, labels) in cases {
            // baseline reads the preprocessed graph before the driver dismantles it
            let mut graph = build_graph(num_vertices, &pairs, labels);
            let expected = as_sets(&get_skyline_communities(&graph, 2, 3));
            let found = as_sets(&sequential::get_skyline_communities(&mut graph, 2, 3));
            assert_eq!(found, expected);
        }
    } // end of agrees_with_sequential_driver

    #[test]
    fn completeness_of_the_pruned_driver() {
        log_init_test();
        //
        // every valid group the driver did not output must be dominated by an output group
        let mut graph = build_graph(
            5,
            &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2), (0, 3)],
            vec![vec![2, 2], vec![1, 4], vec![4, 1], vec![3, 3], vec![5, 5]],
        );
        let all_groups = crate::listing::list_all_kcores(graph.edges.clone(), 3, 2);
        let skyline = sequential::get_skyline_communities(&mut graph, 2, 3);
        let skyline_sets = as_sets(&skyline);
        for group in &all_groups {
            if !skyline_sets.contains(&{
                let mut g = group.clone();
                g.sort_unstable();
                g
            }) {
                assert!(
                    skyline
                        .iter()
                        .any(|kept| group_dominance(kept, group, &graph.labels)),
                    "group {:?} missing from the skyline but not dominated",
                    group
                );
            }
        }
    } // end of completeness_of_the_pruned_driver
} // end of mod tests
