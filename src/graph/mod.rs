//! Graph representation and preprocessing.
//!
//! The graph is an adjacency vector indexed by vertex id. After [Graph::update] the
//! vertex ids follow the layered sort of the labels, every neighbour list is sorted
//! **descending** and the sky-layer metadata (boundaries and per-layer representatives)
//! is attached. The descending order is what makes [remove_vertex] O(degree): vertices
//! are always removed smallest-id first, so the id to drop sits at the back of every
//! neighbour's list.

use cpu_time::ProcessTime;
use std::time::SystemTime;

use crate::dominance::best_virtual_point;
use crate::skylayers::generate_sky_layers;
use crate::spatial::{order_by_partition, LabelList};

pub mod ops;

pub type VertexId = usize;
pub type VertexList = Vec<VertexId>;
pub type AdjacencyList = Vec<VertexList>;
/// A group of vertices, kept sorted ascending
pub type Group = Vec<VertexId>;
pub type GroupList = Vec<Group>;

/// A labelled undirected graph together with its relabelling and sky-layer metadata
pub struct Graph {
    /// number of vertices
    pub size: usize,
    /// vertex labels, one point per vertex
    pub labels: LabelList,
    /// adjacency vectors, sorted descending after [Graph::update]
    pub edges: AdjacencyList,
    /// maps relabelled id to the id used by the loader
    pub to_original: VertexList,
    /// maps loader id to relabelled id
    pub to_relabelled: VertexList,
    /// starting position of each sky-layer in the relabelled order, plus a final sentinel
    pub sky_layer_boundaries: Vec<usize>,
    /// best virtual point of each layer
    pub layer_representatives: LabelList,
}

impl Graph {
    /// Wraps loader output. `edges` must already be symmetric; `update` takes care of
    /// ordering and relabelling.
    pub fn new(edges: AdjacencyList, labels: LabelList) -> Self {
        assert_eq!(edges.len(), labels.len(), "one label per vertex expected");
        let size = labels.len();
        Graph {
            size,
            labels,
            edges,
            to_original: Vec::new(),
            to_relabelled: Vec::new(),
            sky_layer_boundaries: Vec::new(),
            layer_representatives: Vec::new(),
        }
    } // end of new

    /// Preprocesses the graph in place:
    /// 1. computes the layered sort of the labels and the two relabelling maps,
    /// 2. reorders the labels accordingly,
    /// 3. rewrites every edge through the new ids and sorts each neighbour list descending,
    /// 4. builds the sky-layers and records their boundaries and representatives.
    pub fn update(&mut self) {
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let (to_original, sorted_points) = order_by_partition(&self.labels);
        self.to_original = to_original;
        self.to_relabelled = invert_mapping(&self.to_original);
        self.labels = reorder_labels(&self.labels, &self.to_original);
        self.edges = transform_edge_lists(&self.edges, &self.to_original, &self.to_relabelled);
        //
        let sky_layers = generate_sky_layers(&sorted_points);
        let num_layers = sky_layers.len();
        self.sky_layer_boundaries = vec![0; num_layers + 1];
        self.layer_representatives = Vec::with_capacity(num_layers);
        for (i, layer) in sky_layers.iter().enumerate() {
            self.sky_layer_boundaries[i + 1] = self.sky_layer_boundaries[i] + layer.len();
            let layer_nodes: VertexList =
                (self.sky_layer_boundaries[i]..self.sky_layer_boundaries[i + 1]).collect();
            self.layer_representatives
                .push(best_virtual_point(&layer_nodes, &self.labels));
        }
        //
        log::info!(
            "graph update : {} vertices, {} layers, sys time(s) {:.2e} cpu time(s) {:.2e}",
            self.size,
            num_layers,
            sys_start.elapsed().unwrap().as_secs_f64(),
            cpu_start.elapsed().as_secs_f64()
        );
    } // end of update
} // end of impl Graph

/// Inverts a permutation
fn invert_mapping(mapping: &[usize]) -> VertexList {
    let mut reverse_mapping = vec![0; mapping.len()];
    for (new_index, &old_index) in mapping.iter().enumerate() {
        reverse_mapping[old_index] = new_index;
    }
    reverse_mapping
} // end of invert_mapping

/// Reorders the label list so that entry i holds the label of sorted_indices[i]
fn reorder_labels(labels: &LabelList, sorted_indices: &[usize]) -> LabelList {
    sorted_indices.iter().map(|&v| labels[v].clone()).collect()
} // end of reorder_labels

/// Reorders the adjacency vectors per the new vertex ordering, relabels every neighbour
/// and sorts each neighbour list descending
fn transform_edge_lists(
    edges: &AdjacencyList,
    sorted_indices: &[usize],
    new_indices: &[usize],
) -> AdjacencyList {
    let mut resorted: AdjacencyList = sorted_indices.iter().map(|&v| edges[v].clone()).collect();
    for neighbour_list in resorted.iter_mut() {
        for neighbour in neighbour_list.iter_mut() {
            *neighbour = new_indices[*neighbour];
        }
        neighbour_list.sort_unstable_by(|a, b| b.cmp(a));
    }
    resorted
} // end of transform_edge_lists

/// Bin-sort state over vertex degrees, incrementally maintained while peeling.
/// Invariant: degrees are non-decreasing along `sorted_indices`, `node_position` is the
/// inverse permutation and `bin_boundaries[d]` is the leftmost position of a vertex of
/// current degree d.
pub struct DegreeBins {
    /// vertices in ascending order of current degree
    pub sorted_indices: VertexList,
    /// position of each vertex in sorted_indices
    pub node_position: Vec<usize>,
    /// starting position of each degree bin
    pub bin_boundaries: Vec<usize>,
}

/// Sorts the vertices by degree in O(n) so that the sort can be incrementally maintained
/// by [ops::shrink_to_max_kcore]
pub fn bin_sort_by_degree(edges: &AdjacencyList) -> DegreeBins {
    let n = edges.len();
    let mut max_degree = 0;
    let mut bins: Vec<VertexList> = vec![Vec::new(); n]; // no self loops, so degree < n
    for (vertex, neighbour_list) in edges.iter().enumerate() {
        let degree = neighbour_list.len();
        bins[degree].push(vertex);
        max_degree = max_degree.max(degree);
    }
    //
    let mut sorted_indices = vec![0; n];
    let mut node_position = vec![0; n];
    let mut bin_boundaries = vec![0; max_degree + 1];
    let mut index = 0;
    for (degree, bin) in bins.iter().enumerate().take(max_degree + 1) {
        bin_boundaries[degree] = index;
        for &vertex in bin {
            sorted_indices[index] = vertex;
            node_position[vertex] = index;
            index += 1;
        }
    }
    //
    DegreeBins {
        sorted_indices,
        node_position,
        bin_boundaries,
    }
} // end of bin_sort_by_degree

/// Returns the number of edges incident to a vertex
#[inline]
pub fn get_degree(edges: &AdjacencyList, vertex: VertexId) -> usize {
    edges[vertex].len()
}

/// Removes all edges incident to `vertex_to_remove` in time proportional to its degree.
///
/// Requires that no remaining vertex has a neighbour with an id below `vertex_to_remove`
/// and that neighbour lists are sorted descending, so the id to drop is at the back of
/// every neighbour's list.
pub fn remove_vertex(edges: &mut AdjacencyList, vertex_to_remove: VertexId) {
    let neighbours = std::mem::take(&mut edges[vertex_to_remove]);
    for neighbour in neighbours {
        debug_assert_eq!(edges[neighbour].last(), Some(&vertex_to_remove));
        edges[neighbour].pop();
    }
} // end of remove_vertex

/// Builds a symmetric adjacency vector (ascending neighbour lists) from an edge list.
/// Mostly useful to set up small graphs in tests; the CSV loader does the same thing.
pub fn adjacency_from_edge_pairs(num_vertices: usize, pairs: &[(VertexId, VertexId)]) -> AdjacencyList {
    let mut edges: AdjacencyList = vec![Vec::new(); num_vertices];
    for &(u, v) in pairs {
        if u < num_vertices && v < num_vertices && u != v {
            edges[u].push(v);
            edges[v].push(u);
        }
    }
    for neighbour_list in edges.iter_mut() {
        neighbour_list.sort_unstable();
    }
    edges
} // end of adjacency_from_edge_pairs

//==========================================================================================

// end of mod tests
