//! Structural operations on the adjacency vectors: sorted intersection, k-hop
//! neighbourhoods restricted to an active set, connectivity and coreness checks, and the
//! incremental peeling that maintains the maximum k-core while vertices are removed.
//!
//! Peeling follows the bin-sort scheme of Batagelj-Zaversnik
//! _Fast algorithms for determining generalized core in networks_
//! [2011](https://link.springer.com/article/10.1007/s11634-010-0079-y).

use std::collections::{HashMap, VecDeque};

use super::{AdjacencyList, DegreeBins, VertexId, VertexList};

/// Intersects two sorted ascending iterations of vertex ids.
/// Descending neighbour lists are intersected by walking them in reverse, e.g.
/// `intersect_sorted(edges[v].iter().rev(), group.iter())`.
pub fn intersect_sorted<'a, I, J>(a: I, b: J) -> VertexList
where
    I: IntoIterator<Item = &'a VertexId>,
    J: IntoIterator<Item = &'a VertexId>,
{
    let mut result = Vec::new();
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    let mut next_a = a.next();
    let mut next_b = b.next();
    while let (Some(&va), Some(&vb)) = (next_a, next_b) {
        if va < vb {
            next_a = a.next();
        } else if vb < va {
            next_b = b.next();
        } else {
            result.push(va);
            next_a = a.next();
            next_b = b.next();
        }
    }
    result
} // end of intersect_sorted

/// Decrements the bin-sorted degree of every still-active neighbour of `u` in O(1) each:
/// the neighbour is swapped to the first slot of its degree bin and the bin boundary
/// advances over it. Neighbours whose new degree falls below k are queued for removal.
/// Returns the number of edges removed.
pub(crate) fn remove_node(
    k: usize,
    u: VertexId,
    edges: &AdjacencyList,
    active: &[bool],
    bins: &mut DegreeBins,
    remove: &mut VecDeque<VertexId>,
) -> usize {
    let mut removed_edges_count = 0;
    //
    for &e in edges[u].iter().rev() {
        if active[e] {
            removed_edges_count += 1;
            //
            let e_pos = bins.node_position[e];
            // number of the bin e currently belongs to, i.e. its current degree
            let bin_number = bins.bin_boundaries.partition_point(|&b| b <= e_pos) - 1;
            let bin_first_index = bins.bin_boundaries[bin_number];
            let bin_first_node = bins.sorted_indices[bin_first_index];
            //
            if e != bin_first_node {
                // swap e with the first node of its bin and update positions
                bins.node_position[e] = bin_first_index;
                bins.node_position[bin_first_node] = e_pos;
                bins.sorted_indices[e_pos] = bin_first_node;
                bins.sorted_indices[bin_first_index] = e;
            }
            bins.bin_boundaries[bin_number] += 1; // shift the boundary right
            if bin_number <= k {
                // the new degree bin_number - 1 is below k
                remove.push_back(e);
            }
        }
    }
    //
    removed_edges_count
} // end of remove_node

/// Peels vertices until only the maximum k-core remains, flagging every removed vertex
/// as inactive and keeping the bin-sort state consistent.
///
/// When `initial_vertex_to_remove` is given the removal queue is seeded with it alone;
/// otherwise every vertex currently sitting in a bin below k is seeded. If no bin reaches
/// k the whole graph is deactivated.
///
/// Returns the number of removed vertices and removed edges.
pub fn shrink_to_max_kcore(
    k: usize,
    initial_vertex_to_remove: Option<VertexId>,
    edges: &AdjacencyList,
    bins: &mut DegreeBins,
    active: &mut [bool],
) -> (usize, usize) {
    let mut vertices_to_remove: VecDeque<VertexId> = VecDeque::new();
    //
    if let Some(initial) = initial_vertex_to_remove {
        vertices_to_remove.push_back(initial);
    } else if bins.bin_boundaries.len() >= k + 1 {
        // everything below the first bin of degree k goes
        for i in 0..bins.bin_boundaries[k] {
            vertices_to_remove.push_back(bins.sorted_indices[i]);
        }
    } else {
        // the maximum degree is below k : no k-core at all
        let removed = active.iter().filter(|&&a| a).count();
        active.iter_mut().for_each(|a| *a = false);
        return (removed, 0);
    }
    //
    let mut removed_nodes_count = 0;
    let mut removed_edges_count = 0;
    while let Some(v) = vertices_to_remove.pop_front() {
        if active[v] {
            active[v] = false;
            removed_edges_count += remove_node(k, v, edges, active, bins, &mut vertices_to_remove);
            removed_nodes_count += 1;
        }
    }
    (removed_nodes_count, removed_edges_count)
} // end of shrink_to_max_kcore

/// Retrieves the vertices within `num_hops` hops of u, restricted to ids >= u and to the
/// active set. Returns them ascending, u included. With no hop cap the whole connected
/// component (above u) is returned.
pub fn k_hop_neighbourhood(
    u: VertexId,
    edges: &AdjacencyList,
    active: &[bool],
    num_hops: Option<usize>,
) -> VertexList {
    let remaining = edges.len() - u; // vertices with id >= u
    let max_hops = num_hops.unwrap_or(remaining); // exceeds any diameter
    //
    let mut visited = vec![false; remaining];
    let mut queue: VecDeque<(VertexId, usize)> = VecDeque::new();
    queue.push_back((u, 0));
    let mut num_visited = 0;
    //
    while num_visited < remaining {
        let Some((v, hops)) = queue.pop_front() else {
            break;
        };
        if !visited[v - u] {
            visited[v - u] = true;
            num_visited += 1;
            if hops < max_hops {
                for &neighbour in &edges[v] {
                    // skip pruned vertices, and in parallel mode also neighbours before u
                    // that are still being processed concurrently
                    if active[neighbour] && neighbour > u && !visited[neighbour - u] {
                        queue.push_back((neighbour, hops + 1));
                    }
                }
            }
        }
    }
    //
    (u..edges.len()).filter(|&v| visited[v - u]).collect()
} // end of k_hop_neighbourhood

/// The connected component of u restricted to ids >= u and to the active set
#[inline]
pub fn connected_component(u: VertexId, edges: &AdjacencyList, active: &[bool]) -> VertexList {
    k_hop_neighbourhood(u, edges, active, None)
}

/// Checks whether the subgraph induced on `vertex_subset` is connected.
/// `vertex_subset` must be sorted ascending.
pub fn is_connected(vertex_subset: &[VertexId], edges: &AdjacencyList) -> bool {
    if vertex_subset.is_empty() {
        return false;
    }
    let local_id: HashMap<VertexId, usize> = vertex_subset
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();
    //
    let mut visited = vec![false; vertex_subset.len()];
    let mut count = 0;
    let mut queue: VecDeque<usize> = VecDeque::new();
    queue.push_back(0);
    while let Some(node) = queue.pop_front() {
        if !visited[node] {
            visited[node] = true;
            count += 1;
            for e in edges[vertex_subset[node]].iter().rev() {
                if let Some(&id) = local_id.get(e) {
                    queue.push_back(id);
                }
            }
        }
    }
    count == vertex_subset.len()
} // end of is_connected

/// Checks whether every vertex of `vertex_subset` has at least k neighbours inside it.
/// `vertex_subset` must be sorted ascending.
pub fn is_kcore(vertex_subset: &[VertexId], edges: &AdjacencyList, k: usize) -> bool {
    for &node in vertex_subset {
        let neighbours = intersect_sorted(edges[node].iter().rev(), vertex_subset.iter());
        if neighbours.len() < k {
            return false;
        }
    }
    true
} // end of is_kcore

/// Checks minimum degree k and connectivity in one pass: a vertex with an empty
/// neighbourhood inside the subset disconnects it. For group sizes at most 2k+1 the
/// degree condition alone already implies connectivity.
pub fn is_connected_kcore(vertex_subset: &[VertexId], edges: &AdjacencyList, k: usize) -> bool {
    for &node in vertex_subset {
        let neighbours = intersect_sorted(edges[node].iter().rev(), vertex_subset.iter());
        if neighbours.len() < k || neighbours.is_empty() {
            return false;
        }
    }
    true
} // end of is_connected_kcore

/// Classic peeling to determine the coreness of each vertex. Naive implementation, not
/// bin-sorted : this is not a hot spot.
pub fn core_numbers(edges: &AdjacencyList) -> Vec<usize> {
    let num_vertices = edges.len();
    let mut degrees: Vec<usize> = edges.iter().map(|n| n.len()).collect();
    let mut core_vals = vec![0; num_vertices];
    let mut relevant: VertexList = (0..num_vertices).collect();
    //
    let mut level = 0;
    while !relevant.is_empty() {
        let mut to_delete: VertexList = relevant
            .iter()
            .copied()
            .filter(|&v| degrees[v] <= level)
            .collect();
        while !to_delete.is_empty() {
            let mut affected: VertexList = Vec::new();
            for &v in &to_delete {
                core_vals[v] = level;
                degrees[v] = 0;
                for &u in &edges[v] {
                    if degrees[u] > level {
                        degrees[u] -= 1;
                        affected.push(u);
                    }
                }
            }
            affected.sort_unstable();
            affected.dedup();
            to_delete = affected
                .into_iter()
                .filter(|&u| degrees[u] <= level)
                .collect();
        }
        relevant.retain(|&v| degrees[v] > level);
        level += 1;
    }
    //
    core_vals
} // end of core_numbers

//==========================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::graph::{adjacency_from_edge_pairs, bin_sort_by_degree, remove_vertex};

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn descending(edges: AdjacencyList) -> AdjacencyList {
        edges
            .into_iter()
            .map(|mut l| {
                l.sort_unstable_by(|a, b| b.cmp(a));
                l
            })
            .collect()
    }

    #[test]
    fn sorted_intersection() {
        log_init_test();
        //
        let a = vec![1, 3, 5, 7];
        let b = vec![2, 3, 4, 5];
        assert_eq!(intersect_sorted(a.iter(), b.iter()), vec![3, 5]);
        // descending list walked in reverse
        let desc = vec![7, 5, 3, 1];
        assert_eq!(intersect_sorted(desc.iter().rev(), b.iter()), vec![3, 5]);
        assert_eq!(intersect_sorted(a.iter(), [].iter()), Vec::<usize>::new());
    }

    #[test]
    fn shrink_peels_below_k() {
        log_init_test();
        //
        // triangle 0-1-2 with pendant 3 on vertex 0
        let edges = descending(adjacency_from_edge_pairs(
            4,
            &[(0, 1), (1, 2), (2, 0), (0, 3)],
        ));
        let mut bins = bin_sort_by_degree(&edges);
        let mut active = vec![true; 4];
        let (removed_nodes, removed_edges) =
            shrink_to_max_kcore(2, None, &edges, &mut bins, &mut active);
        assert_eq!(removed_nodes, 1);
        assert_eq!(removed_edges, 1);
        assert_eq!(active, vec![true, true, true, false]);
        // idempotence : a second full shrink removes nothing
        let (removed_nodes, removed_edges) =
            shrink_to_max_kcore(2, None, &edges, &mut bins, &mut active);
        assert_eq!((removed_nodes, removed_edges), (0, 0));
    } // end of shrink_peels_below_k

    #[test]
    fn shrink_cascades() {
        log_init_test();
        //
        // path 0-1-2-3 : 2-core is empty
        let edges = descending(adjacency_from_edge_pairs(4, &[(0, 1), (1, 2), (2, 3)]));
        let mut bins = bin_sort_by_degree(&edges);
        let mut active = vec![true; 4];
        let (removed_nodes, _) = shrink_to_max_kcore(2, None, &edges, &mut bins, &mut active);
        assert_eq!(removed_nodes, 4);
        assert!(active.iter().all(|&a| !a));
    }

    #[test]
    fn shrink_with_seed_vertex() {
        log_init_test();
        //
        // two triangles sharing vertex 2
        let edges = descending(adjacency_from_edge_pairs(
            5,
            &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)],
        ));
        let mut bins = bin_sort_by_degree(&edges);
        let mut active = vec![true; 5];
        shrink_to_max_kcore(2, None, &edges, &mut bins, &mut active);
        assert!(active.iter().all(|&a| a));
        // removing vertex 0 collapses its triangle but spares the other one
        let (removed_nodes, _) =
            shrink_to_max_kcore(2, Some(0), &edges, &mut bins, &mut active);
        assert_eq!(removed_nodes, 2); // 0 and the now degree-1 vertex 1
        assert_eq!(active, vec![false, false, true, true, true]);
    } // end of shrink_with_seed_vertex

    #[test]
    fn khop_restricted_to_active() {
        log_init_test();
        //
        // path 0-1-2-3-4
        let edges = descending(adjacency_from_edge_pairs(
            5,
            &[(0, 1), (1, 2), (2, 3), (3, 4)],
        ));
        let active = vec![true; 5];
        assert_eq!(
            k_hop_neighbourhood(0, &edges, &active, Some(2)),
            vec![0, 1, 2]
        );
        assert_eq!(
            k_hop_neighbourhood(0, &edges, &active, Some(1)),
            vec![0, 1]
        );
        // deactivating 1 cuts everything past 0
        let mut active = vec![true; 5];
        active[1] = false;
        assert_eq!(k_hop_neighbourhood(0, &edges, &active, Some(2)), vec![0]);
        // no cap : whole component above u
        let active = vec![true; 5];
        assert_eq!(
            connected_component(1, &edges, &active),
            vec![1, 2, 3, 4]
        );
    } // end of khop_restricted_to_active

    #[test]
    fn khop_ignores_smaller_ids() {
        log_init_test();
        //
        // star centred on 0 : from vertex 1 nothing above is reachable without 0
        let edges = descending(adjacency_from_edge_pairs(4, &[(0, 1), (0, 2), (0, 3)]));
        let active = vec![true; 4];
        assert_eq!(k_hop_neighbourhood(1, &edges, &active, Some(2)), vec![1]);
    }

    #[test]
    fn connectivity_and_coreness() {
        log_init_test();
        //
        // two disjoint triangles
        let edges = descending(adjacency_from_edge_pairs(
            6,
            &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)],
        ));
        assert!(is_connected(&[0, 1, 2], &edges));
        assert!(!is_connected(&[0, 1, 2, 3], &edges));
        assert!(is_kcore(&[0, 1, 2], &edges, 2));
        assert!(!is_kcore(&[0, 1, 2, 3], &edges, 2));
        assert!(is_connected_kcore(&[3, 4, 5], &edges, 2));
        // degree fine in each half but not connected
        assert!(!is_connected_kcore(&[0, 1, 2, 3, 4, 5], &edges, 3));
        assert!(is_kcore(&[0, 1, 2, 3, 4, 5], &edges, 2));
    } // end of connectivity_and_coreness

    #[test]
    fn coreness_by_peeling() {
        log_init_test();
        //
        // triangle with a pendant, plus an isolated vertex
        let edges = descending(adjacency_from_edge_pairs(
            5,
            &[(0, 1), (1, 2), (2, 0), (0, 3)],
        ));
        let cores = core_numbers(&edges);
        assert_eq!(cores[3], 1);
        assert_eq!(cores[0], 2);
        assert_eq!(cores[1], 2);
        assert_eq!(cores[2], 2);
        assert_eq!(cores[4], 0);
    }

    #[test]
    fn remove_vertex_after_shrink() {
        log_init_test();
        //
        // smallest-first removal keeps the popped id at every tail
        let mut edges = descending(adjacency_from_edge_pairs(
            4,
            &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)],
        ));
        for v in 0..4 {
            remove_vertex(&mut edges, v);
        }
        assert!(edges.iter().all(|l| l.is_empty()));
    }
} // end of mod tests
