//! Parallel skyline driver.
//!
//! Bulk-synchronous rounds over a shared graph. Each round a single-threaded phase peels
//! the previous batch, handles the boundary cases and assigns up to `n_threads`
//! still-active vertices in ascending order; the parallel phase then produces and
//! self-reduces one candidate list per assigned vertex, reading the shared state
//! read-only. The merge filters every list against the self-reduced lists of
//! lower-indexed work items, so the sequential left-to-right preference is reproduced
//! and the result does not depend on the number of threads. There are no locks anywhere:
//! all mutation happens between the parallel phases.

use anyhow::anyhow;
use cpu_time::ProcessTime;
use rayon::prelude::*;
use std::time::SystemTime;

use crate::dominance::{
    can_terminate, is_dominated_by_candidates, is_dominated_by_skyline, worst_virtual_point,
};
use crate::graph::ops::{is_kcore, k_hop_neighbourhood, shrink_to_max_kcore};
use crate::graph::{get_degree, remove_vertex, Graph, GroupList};
use crate::listing::list_kcores_with_prefix;
use crate::spatial::LabelList;

use super::{get_last_group, initialise_to_max_kcore, postprocess, update_skyline};

/// Computes the same skyline as the sequential driver using `n_threads` workers.
/// Fails only if the thread pool cannot be built.
pub fn get_skyline_communities(
    graph: &mut Graph,
    core_size: usize,
    group_size: usize,
    n_threads: usize,
) -> anyhow::Result<GroupList> {
    assert!(n_threads >= 1, "need at least one thread");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build()
        .map_err(|e| anyhow!("could not build thread pool : {}", e))?;
    //
    let cpu_start = ProcessTime::now();
    let sys_start = SystemTime::now();
    //
    let mut skyline_communities = GroupList::new();
    let mut skyline_representatives = LabelList::new();
    let mut layer_number = 0;
    //
    let (mut num_remaining_vertices, mut in_maximal_kcore, mut bins) =
        initialise_to_max_kcore(graph, core_size);
    //
    let mut index_to_process = 0;
    let mut index_to_remove = 0;
    let mut terminate = false;
    //
    while !terminate && index_to_process < graph.size {
        // where this round's physical removals start
        let first_vertex_in_iteration = index_to_process;
        //
        // ---- single phase : peel the backlog of processed vertices
        while index_to_remove < index_to_process {
            num_remaining_vertices -= shrink_to_max_kcore(
                core_size,
                Some(index_to_remove),
                &graph.edges,
                &mut bins,
                &mut in_maximal_kcore,
            )
            .0;
            if num_remaining_vertices < group_size {
                terminate = true;
                break;
            }
            index_to_remove += 1;
        }
        if terminate {
            break;
        }
        if num_remaining_vertices == group_size {
            // exactly one remaining group
            update_skyline(
                get_last_group(index_to_process..graph.size, &in_maximal_kcore),
                &graph.labels,
                &mut skyline_communities,
                &mut skyline_representatives,
            );
            break;
        }
        //
        // assign up to n_threads still-active vertices, ascending
        let mut assigned = Vec::with_capacity(n_threads);
        while assigned.len() < n_threads && index_to_process < graph.size {
            if in_maximal_kcore[index_to_process] {
                assigned.push(index_to_process);
            }
            index_to_process += 1;
        }
        // advance over the layer boundaries the batch crossed; a termination hit keeps
        // only the work strictly before the offending boundary and ends the loop after
        // this round
        while graph.sky_layer_boundaries[layer_number] < index_to_process
            && index_to_process < graph.size
        {
            if can_terminate(
                &skyline_representatives,
                &graph.layer_representatives[layer_number],
            ) {
                let boundary = graph.sky_layer_boundaries[layer_number];
                assigned.retain(|&v| v < boundary);
                terminate = true;
                break;
            }
            layer_number += 1;
        }
        //
        // ---- parallel phase : one self-reduced candidate list per assigned vertex,
        // shared state is read-only here
        let edges = &graph.edges;
        let labels = &graph.labels;
        let active = &in_maximal_kcore;
        let known_skyline = &skyline_communities;
        let thread_local_candidates: Vec<GroupList> = pool.install(|| {
            assigned
                .par_iter()
                .map(|&index| {
                    let mut candidates = GroupList::new();
                    if get_degree(edges, index) >= core_size {
                        let num_hops = if group_size - core_size == 1 { 1 } else { 2 };
                        let nodes =
                            k_hop_neighbourhood(index, edges, active, Some(num_hops));
                        if nodes.len() == group_size
                            && is_kcore(&nodes, edges, core_size)
                            && !is_dominated_by_skyline(&nodes, known_skyline, labels)
                        {
                            // the only possible group at this vertex
                            candidates.push(nodes);
                        } else if nodes.len() > group_size {
                            candidates =
                                list_kcores_with_prefix(&nodes, edges, group_size, core_size);
                        }
                        // reduce against the known skyline and the own earlier survivors
                        let mut is_skyline = vec![true; candidates.len()];
                        for i in 0..candidates.len() {
                            is_skyline[i] = !is_dominated_by_skyline(
                                &candidates[i],
                                known_skyline,
                                labels,
                            ) && !is_dominated_by_candidates(
                                i,
                                &candidates,
                                &is_skyline,
                                labels,
                            );
                        }
                        let mut flags = is_skyline.iter();
                        candidates.retain(|_| *flags.next().unwrap());
                    }
                    candidates
                })
                .collect()
        });
        //
        // ---- merge : filter each list against the self-reduced lists of lower work
        // items (all masks are computed before anything is dropped, as the barrier
        // placement dictates), then append survivors in work-item order
        let keep_masks: Vec<Vec<bool>> = (0..thread_local_candidates.len())
            .map(|t| {
                thread_local_candidates[t]
                    .iter()
                    .map(|candidate| {
                        !(0..t).any(|j| {
                            is_dominated_by_skyline(candidate, &thread_local_candidates[j], labels)
                        })
                    })
                    .collect()
            })
            .collect();
        for (candidates, keep) in thread_local_candidates.into_iter().zip(keep_masks) {
            for (candidate, keep_it) in candidates.into_iter().zip(keep) {
                if keep_it {
                    skyline_representatives.push(worst_virtual_point(&candidate, &graph.labels));
                    skyline_communities.push(candidate);
                }
            }
        }
        //
        // physically shrink the adjacency for the whole batch
        for vertex_to_remove in first_vertex_in_iteration..index_to_process {
            remove_vertex(&mut graph.edges, vertex_to_remove);
        }
    }
    //
    postprocess(&mut skyline_communities, &graph.labels);
    log::info!(
        "parallel skyline ({} threads) : {} groups, sys time(s) {:.2e} cpu time(s) {:.2e}",
        n_threads,
        skyline_communities.len(),
        sys_start.elapsed().unwrap().as_secs_f64(),
        cpu_start.elapsed().as_secs_f64()
    );
    Ok(skyline_communities)
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

    fn originalise(groups: &GroupList, graph: &Graph) -> Vec<Vec<usize>> {
        let mut result: Vec<Vec<usize>> = groups
            .iter()
            .map(|group| {
                let mut g: Vec<usize> = group.iter().map(|&v| graph.to_original[v]).collect();
                g.sort_unstable();
                g
            })
            .collect();
        result.sort();
        result
    }

    struct Scenario {
        num_vertices: usize,
        pairs: Vec<(usize, usize)>,
        labels: Vec<Label>,
    }

    fn scenarios() -> Vec<Scenario> {
        let mut k4 = Vec::new();
        for u in 0..4 {
            for v in u + 1..4 {
                k4.push((u, v));
            }
        }
        let mut k5 = Vec::new();
        for u in 0..5 {
            for v in u + 1..5 {
                k5.push((u, v));
            }
        }
        vec![
            Scenario {
                num_vertices: 4,
                pairs: vec![(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)],
                labels: vec![vec![1, 5], vec![2, 4], vec![3, 3], vec![5, 1]],
            },
            Scenario {
                num_vertices: 4,
                pairs: k4,
                labels: vec![vec![1, 1], vec![2, 2], vec![3, 3], vec![4, 4]],
            },
            Scenario {
                num_vertices: 5,
                pairs: k5,
                labels: vec![
                    vec![1, 9],
                    vec![9, 1],
                    vec![4, 4],
                    vec![5, 6],
                    vec![6, 5],
                ],
            },
            Scenario {
                num_vertices: 6,
                pairs: vec![(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)],
                labels: vec![
                    vec![1, 9],
                    vec![2, 8],
                    vec![3, 7],
                    vec![9, 1],
                    vec![8, 2],
                    vec![7, 3],
                ],
            },
        ]
    }

    #[test]
    fn matches_sequential_for_any_thread_count() {
        log_init_test();
        //
        for (num, scenario) in scenarios().iter().enumerate() {
            let mut graph = build_graph(
                scenario.num_vertices,
                &scenario.pairs,
                scenario.labels.clone(),
            );
            let expected = originalise(
                &sequential::get_skyline_communities(&mut graph, 2, 3),
                &graph,
            );
            for n_threads in [1, 2, 4, 8] {
                let mut graph = build_graph(
                    scenario.num_vertices,
                    &scenario.pairs,
                    scenario.labels.clone(),
                );
                let skyline =
                    get_skyline_communities(&mut graph, 2, 3, n_threads).unwrap();
                assert_eq!(
                    originalise(&skyline, &graph),
                    expected,
                    "scenario {} with {} threads diverged",
                    num,
                    n_threads
                );
            }
        }
    } // end of matches_sequential_for_any_thread_count

    #[test]
    fn single_thread_on_clique() {
        log_init_test();
        //
        let mut pairs = Vec::new();
        for u in 0..5 {
            for v in u + 1..5 {
                pairs.push((u, v));
            }
        }
        let mut graph = build_graph(
            5,
            &pairs,
            vec![vec![1, 1], vec![2, 2], vec![3, 3], vec![4, 4], vec![5, 5]],
        );
        let skyline = get_skyline_communities(&mut graph, 2, 3, 1).unwrap();
        assert_eq!(originalise(&skyline, &graph), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn batch_larger_than_graph() {
        log_init_test();
        //
        // more threads than vertices : a single round covers everything
        let mut graph = build_graph(
            4,
            &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)],
            vec![vec![1, 5], vec![2, 4], vec![3, 3], vec![5, 1]],
        );
        let skyline = get_skyline_communities(&mut graph, 2, 3, 16).unwrap();
        assert_eq!(
            originalise(&skyline, &graph),
            vec![vec![0, 1, 2], vec![0, 2, 3]]
        );
    }
} // end of mod tests
