//! Skyline community drivers.
//!
//! Both drivers iterate the relabelled vertices smallest-first, list the size-g k-cores
//! prefixed by each vertex from its 2-hop neighbourhood, and keep the groups no other
//! group dominates. The sequential driver processes one vertex at a time; the parallel
//! driver processes batches of vertices per round and merges deterministically. Both
//! finish with the same [postprocess] sweep.

pub mod baseline;
pub mod parallel;
pub mod sequential;

use crate::dominance::{
    can_terminate, group_dominance, is_dominated_by_skyline, worst_virtual_point,
};
use crate::graph::ops::shrink_to_max_kcore;
use crate::graph::{bin_sort_by_degree, DegreeBins, Graph, Group, GroupList};
use crate::spatial::{point_dominance, Dominance, LabelList};

/// Collects the still-active vertices of `range` into a group
pub(crate) fn get_last_group(
    range: std::ops::Range<usize>,
    is_active_vertex: &[bool],
) -> Group {
    range.filter(|&v| is_active_vertex[v]).collect()
} // end of get_last_group

/// Appends a candidate group and its worst virtual point unless the skyline already
/// dominates it
pub(crate) fn update_skyline(
    candidate_group: Group,
    labels: &LabelList,
    skyline_communities: &mut GroupList,
    skyline_representatives: &mut LabelList,
) {
    if !is_dominated_by_skyline(&candidate_group, skyline_communities, labels) {
        skyline_representatives.push(worst_virtual_point(&candidate_group, labels));
        skyline_communities.push(candidate_group);
    }
} // end of update_skyline

/// Computes the maximum k-core of the graph: returns the number of surviving vertices,
/// the active flags and the bin-sort state ready for incremental peeling
pub(crate) fn initialise_to_max_kcore(
    graph: &Graph,
    core_size: usize,
) -> (usize, Vec<bool>, DegreeBins) {
    let mut bins = bin_sort_by_degree(&graph.edges);
    let mut in_maximal_kcore = vec![true; graph.size];
    let (removed, _) = shrink_to_max_kcore(
        core_size,
        None,
        &graph.edges,
        &mut bins,
        &mut in_maximal_kcore,
    );
    log::info!(
        "initialise_to_max_kcore : {} of {} vertices in the maximum {}-core",
        graph.size - removed,
        graph.size,
        core_size
    );
    (graph.size - removed, in_maximal_kcore, bins)
} // end of initialise_to_max_kcore

/// Handles the loop boundary cases at `next_vertex`. Returns true when the driver can
/// stop : fewer than g vertices remain, or exactly g remain and they form the last
/// possible group, or the upcoming sky-layer can no longer beat the skyline. Crossing a
/// layer boundary without terminating advances `layer_number`.
pub(crate) fn check_boundary_cases(
    graph: &Graph,
    num_vertices: usize,
    next_vertex: usize,
    group_size: usize,
    in_maximal_kcore: &[bool],
    skyline_communities: &mut GroupList,
    skyline_representatives: &mut LabelList,
    layer_number: &mut usize,
) -> bool {
    if num_vertices < group_size {
        // no remaining groups
        return true;
    } else if num_vertices == group_size {
        // exactly one remaining group
        update_skyline(
            get_last_group(next_vertex..graph.size, in_maximal_kcore),
            &graph.labels,
            skyline_communities,
            skyline_representatives,
        );
        return true;
    } else if next_vertex == graph.sky_layer_boundaries[*layer_number] {
        if can_terminate(
            skyline_representatives,
            &graph.layer_representatives[*layer_number],
        ) {
            return true;
        }
        *layer_number += 1;
    }
    false
} // end of check_boundary_cases

/// Removes false-positive skyline groups in place.
///
/// The one-sided dominance tests assume a later group can never dominate an earlier one
/// at the prefix vertex; distinct but coincident prefix labels break that. The sweep
/// compares each group only against the following groups whose first member carries an
/// equal label, which is sufficient because such groups are contiguous in the stream.
pub fn postprocess(skyline_communities: &mut GroupList, labels: &LabelList) {
    let num_groups = skyline_communities.len();
    let mut first = 0; // end of the confirmed prefix, i.e. the write pointer
    for curr in 0..num_groups {
        let mut is_skyline = true;
        for next in curr + 1..num_groups {
            let next_first_node = skyline_communities[next][0];
            let curr_first_node = skyline_communities[curr][0];
            if point_dominance(&labels[next_first_node], &labels[curr_first_node])
                != Dominance::Equal
            {
                break;
            }
            if group_dominance(
                &skyline_communities[next],
                &skyline_communities[curr],
                labels,
            ) {
                is_skyline = false;
                break;
            }
        }
        if is_skyline {
            if first != curr {
                skyline_communities.swap(first, curr);
            }
            first += 1;
        }
    }
    skyline_communities.truncate(first);
} // end of postprocess

//==========================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn postprocess_drops_coincident_false_positives() {
        log_init_test();
        //
        // vertices 0 and 1 share a label, so their groups are mutually comparable both ways
        let labels: LabelList = vec![
            vec![1, 1], // 0
            vec![1, 1], // 1
            vec![2, 2], // 2
            vec![9, 9], // 3
        ];
        // group [0,3] precedes [1,2] but is dominated by it : {1,2} beats {3} after the
        // coincident prefixes cancel
        let mut skyline: GroupList = vec![vec![0, 3], vec![1, 2]];
        postprocess(&mut skyline, &labels);
        assert_eq!(skyline, vec![vec![1, 2]]);
    }

    #[test]
    fn postprocess_keeps_incomparable_groups() {
        log_init_test();
        //
        let labels: LabelList = vec![vec![1, 1], vec![1, 1], vec![2, 5], vec![5, 2]];
        let mut skyline: GroupList = vec![vec![0, 2], vec![1, 3]];
        postprocess(&mut skyline, &labels);
        assert_eq!(skyline.len(), 2);
    }

    #[test]
    fn postprocess_stops_at_different_prefix_labels() {
        log_init_test();
        //
        let labels: LabelList = vec![vec![1, 1], vec![2, 2], vec![3, 3], vec![4, 4]];
        // prefix labels differ, so the sweep compares nothing and keeps both
        let mut skyline: GroupList = vec![vec![0, 3], vec![1, 2]];
        postprocess(&mut skyline, &labels);
        assert_eq!(skyline.len(), 2);
    }

    #[test]
    fn postprocess_retains_one_of_equal_twins() {
        log_init_test();
        //
        // identical label multisets : neither dominates, both stay, the caller relies on
        // the enumerator never emitting the same vertex set twice
        let labels: LabelList = vec![vec![1, 1], vec![1, 1], vec![2, 2], vec![2, 2]];
        let mut skyline: GroupList = vec![vec![0, 2], vec![1, 3]];
        postprocess(&mut skyline, &labels);
        assert_eq!(skyline.len(), 2);
    }
} // end of mod tests
