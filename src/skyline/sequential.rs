//! Sequential skyline driver.
//!
//! Iterates the relabelled vertices smallest-first. For each vertex still in the
//! shrinking maximum k-core it lists the size-g k-cores prefixed by that vertex from its
//! 2-hop neighbourhood and checks them against the skyline, then peels the vertex and
//! physically removes it. Sky-layer boundaries provide the early-termination test.

use cpu_time::ProcessTime;
use std::io::Write;
use std::time::SystemTime;

use crate::dominance::{is_dominated_by_candidates, is_dominated_by_skyline, worst_virtual_point};
use crate::graph::ops::{is_kcore, k_hop_neighbourhood, shrink_to_max_kcore};
use crate::graph::{remove_vertex, AdjacencyList, Graph, GroupList, VertexList};
use crate::listing::list_kcores_with_prefix;
use crate::spatial::LabelList;

use super::{check_boundary_cases, initialise_to_max_kcore, postprocess, update_skyline};

/// Induces the 2-hop (or 1-hop in the clique case) neighbourhood of `next_vertex` within
/// the active set. If that neighbourhood is exactly one group, it is the unique candidate
/// at this vertex and goes straight to the skyline check.
fn filter_vertices(
    next_vertex: usize,
    edges: &AdjacencyList,
    labels: &LabelList,
    group_size: usize,
    min_coreness: usize,
    in_maximal_kcore: &[bool],
    skyline_communities: &mut GroupList,
    skyline_representatives: &mut LabelList,
) -> VertexList {
    let num_hops = if group_size - min_coreness == 1 { 1 } else { 2 };
    let nodes = k_hop_neighbourhood(next_vertex, edges, in_maximal_kcore, Some(num_hops));
    if nodes.len() == group_size && is_kcore(&nodes, edges, min_coreness) {
        update_skyline(
            nodes.clone(),
            labels,
            skyline_communities,
            skyline_representatives,
        );
    }
    nodes
} // end of filter_vertices

/// Lists all candidate groups prefixed by the first vertex of `vertices` and appends the
/// non-dominated ones to the skyline. Candidates arrive in ascending prefix order, so a
/// one-sided check against the skyline and the earlier surviving candidates suffices.
fn list_and_check_groups(
    vertices: &[usize],
    edges: &AdjacencyList,
    labels: &LabelList,
    group_size: usize,
    core_size: usize,
    skyline_communities: &mut GroupList,
    skyline_representatives: &mut LabelList,
) {
    let candidates = list_kcores_with_prefix(vertices, edges, group_size, core_size);
    let mut is_skyline = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        is_skyline[i] = !is_dominated_by_skyline(&candidates[i], skyline_communities, labels)
            && !is_dominated_by_candidates(i, &candidates, &is_skyline, labels);
        if is_skyline[i] {
            skyline_representatives.push(worst_virtual_point(&candidates[i], labels));
            skyline_communities.push(candidates[i].clone());
        }
    }
} // end of list_and_check_groups

/// Computes the skyline of size-`group_size` communities with minimum internal degree
/// `core_size`. Vertex ids in the result are relabelled ids; map them through
/// [Graph::to_original](crate::graph::Graph) if the loader ids are wanted.
pub fn get_skyline_communities(
    graph: &mut Graph,
    core_size: usize,
    group_size: usize,
) -> GroupList {
    let cpu_start = ProcessTime::now();
    let sys_start = SystemTime::now();
    //
    let mut skyline_communities = GroupList::new();
    // maximum extent of each skyline group, used for pruning
    let mut skyline_representatives = LabelList::new();
    // counter detecting when a sky-layer boundary is crossed
    let mut layer_number = 0;
    //
    let (mut num_remaining_vertices, mut in_maximal_kcore, mut bins) =
        initialise_to_max_kcore(graph, core_size);
    //
    for next_vertex in 0..graph.size {
        if in_maximal_kcore[next_vertex] {
            if check_boundary_cases(
                graph,
                num_remaining_vertices,
                next_vertex,
                group_size,
                &in_maximal_kcore,
                &mut skyline_communities,
                &mut skyline_representatives,
                &mut layer_number,
            ) {
                break;
            }
            // induce a subgraph around this vertex to keep the listing small
            let filtered_vertices = filter_vertices(
                next_vertex,
                &graph.edges,
                &graph.labels,
                group_size,
                core_size,
                &in_maximal_kcore,
                &mut skyline_communities,
                &mut skyline_representatives,
            );
            if filtered_vertices.len() > group_size {
                list_and_check_groups(
                    &filtered_vertices,
                    &graph.edges,
                    &graph.labels,
                    group_size,
                    core_size,
                    &mut skyline_communities,
                    &mut skyline_representatives,
                );
            }
            // peel the vertex off the maximum k-core
            num_remaining_vertices -= shrink_to_max_kcore(
                core_size,
                Some(next_vertex),
                &graph.edges,
                &mut bins,
                &mut in_maximal_kcore,
            )
            .0;
        }
        // physically shrink the adjacency ; nothing references next_vertex afterwards
        remove_vertex(&mut graph.edges, next_vertex);
    }
    //
    postprocess(&mut skyline_communities, &graph.labels);
    log::info!(
        "sequential skyline : {} groups, sys time(s) {:.2e} cpu time(s) {:.2e}",
        skyline_communities.len(),
        sys_start.elapsed().unwrap().as_secs_f64(),
        cpu_start.elapsed().as_secs_f64()
    );
    skyline_communities
} // end of get_skyline_communities

/// Records how the maximum k-core decays as vertices are peeled smallest-first : entry 0
/// is the graph size, entry 1 the size of the maximum k-core, then one entry per peeled
/// vertex. Useful for plotting dataset degeneracy.
pub fn peeling_profile(graph: &Graph, core_size: usize) -> Vec<usize> {
    let mut vertex_count = vec![graph.size];
    //
    let (mut num_remaining_vertices, mut in_maximal_kcore, mut bins) =
        initialise_to_max_kcore(graph, core_size);
    vertex_count.push(num_remaining_vertices);
    //
    for next_vertex in 0..graph.size {
        if in_maximal_kcore[next_vertex] && num_remaining_vertices > 0 {
            num_remaining_vertices -= shrink_to_max_kcore(
                core_size,
                Some(next_vertex),
                &graph.edges,
                &mut bins,
                &mut in_maximal_kcore,
            )
            .0;
            vertex_count.push(num_remaining_vertices);
        }
    }
    vertex_count
} // end of peeling_profile

/// Dumps a peeling profile to a file, one count per line
pub fn profile_to_file(profile: &[usize], file_path: &std::path::Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(file_path)?;
    let mut writer = std::io::BufWriter::new(file);
    for count in profile {
        writeln!(writer, "{}", count)?;
    }
    writer.flush()?;
    Ok(())
} // end of profile_to_file

//==========================================================================================

// end of mod tests
