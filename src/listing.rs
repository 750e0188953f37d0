//! Cousins-first listing of size-g k-cores.
//!
//! The enumerator fixes a prefix vertex and recursively extends the current group with
//! candidates from a shrinking tailset, preferring near neighbours. A group member may
//! miss at most `max_missed = g - k - 1` connections inside the group; once a member
//! reaches that bound every further candidate must be one of its neighbours, which is
//! enforced by intersecting the tailset with the member's adjacency. The 2-hop
//! neighbourhood restriction on the input is Conte et al.'s bound for g <= 2k+1
//! (KDD 2018).

use crate::graph::ops::{intersect_sorted, k_hop_neighbourhood, shrink_to_max_kcore};
use crate::graph::{bin_sort_by_degree, remove_vertex, AdjacencyList, Group, GroupList, VertexList};

/// Recursion state : the current group (ascending), the per-member count of missed
/// connections inside the group, and the remaining extension candidates (ascending,
/// disjoint from the group).
struct GroupInfo {
    group: Group,
    missed_connections_count: Vec<usize>,
    tailset: VertexList,
}

/// Builds the state for the next round of recursion after admitting `new_node`.
///
/// Members that `new_node` does not reach get their missed count incremented; a member
/// hitting the bound narrows the tailset to its own neighbours. If the tailset can no
/// longer complete a group it is emptied, which prunes the branch.
fn get_new_group_info(
    original_group: &Group,
    missed_connections_count: &[usize],
    remaining_tailset: &[usize],
    neighbours: &[usize],
    edges: &AdjacencyList,
    new_node: usize,
    max_missed_connections: usize,
    group_size: usize,
) -> GroupInfo {
    let mut new_info = GroupInfo {
        group: original_group.clone(),
        missed_connections_count: missed_connections_count.to_vec(),
        tailset: remaining_tailset.to_vec(),
    };
    let original_group_size = original_group.len();
    let mut neighbours_index = 0;
    //
    for group_index in 0..original_group_size {
        if neighbours_index < neighbours.len()
            && original_group[group_index] == neighbours[neighbours_index]
        {
            neighbours_index += 1;
        } else {
            // this member is not connected to new_node (neighbours is a subset of group)
            new_info.missed_connections_count[group_index] += 1;
            if new_info.missed_connections_count[group_index] == max_missed_connections {
                let member = new_info.group[group_index];
                new_info.tailset =
                    intersect_sorted(edges[member].iter().rev(), new_info.tailset.iter());
                if new_info.tailset.len() + original_group_size + 1 < group_size {
                    // not enough candidates left to complete a group
                    new_info.tailset.clear();
                    return new_info;
                }
            }
        }
    }
    //
    new_info.group.push(new_node);
    let not_connected = original_group_size - neighbours.len();
    new_info.missed_connections_count.push(not_connected);
    if not_connected == max_missed_connections {
        new_info.tailset = intersect_sorted(edges[new_node].iter().rev(), new_info.tailset.iter());
    }
    new_info
} // end of get_new_group_info

fn list_kcores_recursive(
    group_info: &GroupInfo,
    edges: &AdjacencyList,
    candidates: &mut GroupList,
    group_size: usize,
    core_size: usize,
) {
    let max_missed_connections = group_size - core_size - 1;
    //
    for (tail_index, &new_node) in group_info.tailset.iter().enumerate() {
        let neighbours = intersect_sorted(edges[new_node].iter().rev(), group_info.group.iter());
        let num_nodes_not_in_intersection = group_info.group.len() - neighbours.len();
        if num_nodes_not_in_intersection <= max_missed_connections {
            if group_info.group.len() == group_size - 1 {
                // we have a group
                let mut group = group_info.group.clone();
                group.push(new_node);
                candidates.push(group);
            } else {
                // more than one slot left to fill : recurse on the tail after new_node
                let new_info = get_new_group_info(
                    &group_info.group,
                    &group_info.missed_connections_count,
                    &group_info.tailset[tail_index + 1..],
                    &neighbours,
                    edges,
                    new_node,
                    max_missed_connections,
                    group_size,
                );
                list_kcores_recursive(&new_info, edges, candidates, group_size, core_size);
            }
        }
        // else no valid group can include new_node here
    }
} // end of list_kcores_recursive

/// Lists every size-`group_size` subset S of `nodes` with S[0] = nodes[0] whose induced
/// subgraph has minimum degree `core_size`. `nodes` must be sorted ascending and the
/// neighbour lists descending. Candidates are emitted in ascending lexicographic order.
pub fn list_kcores_with_prefix(
    nodes: &[usize],
    edges: &AdjacencyList,
    group_size: usize,
    core_size: usize,
) -> GroupList {
    let mut kcores = GroupList::new();
    //
    if nodes.len() >= group_size {
        let prefix_node = nodes[0];
        let tailset: VertexList = if group_size == core_size + 1 {
            // clique case : every member must neighbour the prefix
            edges[prefix_node].iter().rev().copied().collect()
        } else {
            nodes[1..].to_vec()
        };
        let group_info = GroupInfo {
            group: vec![prefix_node],
            missed_connections_count: vec![0],
            tailset,
        };
        list_kcores_recursive(&group_info, edges, &mut kcores, group_size, core_size);
    }
    //
    kcores
} // end of list_kcores_with_prefix

/// Lists **all** size-`group_size` subsets of the graph with minimum induced degree
/// `core_size`. Iterates vertices smallest-first, so each group is emitted exactly once,
/// at its smallest member. Consumes the adjacency, which is dismantled along the way.
pub fn list_all_kcores(
    mut edges: AdjacencyList,
    group_size: usize,
    core_size: usize,
) -> GroupList {
    let mut kcores = GroupList::new();
    let num_vertices = edges.len();
    if num_vertices < group_size {
        return kcores;
    }
    //
    let mut bins = bin_sort_by_degree(&edges);
    let mut in_max_kcore = vec![true; num_vertices];
    shrink_to_max_kcore(core_size, None, &edges, &mut bins, &mut in_max_kcore);
    //
    for vertex in 0..=num_vertices - group_size {
        if in_max_kcore[vertex] {
            let nodes = k_hop_neighbourhood(vertex, &edges, &in_max_kcore, Some(2));
            if nodes.len() >= group_size {
                let mut with_new_prefix =
                    list_kcores_with_prefix(&nodes, &edges, group_size, core_size);
                kcores.append(&mut with_new_prefix);
            }
            // peel the prefix vertex off the maximum k-core
            shrink_to_max_kcore(core_size, Some(vertex), &edges, &mut bins, &mut in_max_kcore);
        }
        remove_vertex(&mut edges, vertex);
    }
    log::debug!(
        "list_all_kcores : {} groups of size {} with coreness {}",
        kcores.len(),
        group_size,
        core_size
    );
    //
    kcores
} // end of list_all_kcores

//==========================================================================================

// end of mod tests
