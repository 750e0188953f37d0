//! Construct the graph inputs from csv data.
//!
//! Edge files have one edge per line as two comma-separated non-negative integers.
//! Label files have one point per line as comma-separated integer coordinates.
//! Files from <https://snap.stanford.edu/data/index.html> preprocessed to csv are the
//! typical input.

use std::fs::OpenOptions;
use std::path::Path;

use anyhow::anyhow;
use csv::ReaderBuilder;

use crate::graph::AdjacencyList;
use crate::spatial::{Coordinate, LabelList};

/// Loads a symmetric adjacency vector over `node_size` vertices from a csv edge list.
/// Edges touching ids at or beyond `node_size` are silently dropped, as are self loops.
/// Neighbour lists come back sorted ascending; graph preprocessing re-sorts them.
pub fn load_edges(filepath: &Path, node_size: usize) -> anyhow::Result<AdjacencyList> {
    let fileres = OpenOptions::new().read(true).open(filepath);
    if fileres.is_err() {
        log::error!("load_edges : could not open file {:?}", filepath.as_os_str());
        return Err(anyhow!("load_edges : could not open file"));
    }
    let file = fileres.unwrap();
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(file);
    //
    let mut edges: AdjacencyList = vec![Vec::new(); node_size];
    let mut nb_record = 0;
    for result in rdr.records() {
        let record = result?;
        let u = record
            .get(0)
            .ok_or_else(|| anyhow!("load_edges : missing source field at record {}", nb_record))?
            .trim()
            .parse::<usize>()?;
        let v = record
            .get(1)
            .ok_or_else(|| anyhow!("load_edges : missing target field at record {}", nb_record))?
            .trim()
            .parse::<usize>()?;
        nb_record += 1;
        if u < node_size && v < node_size && u != v {
            edges[u].push(v);
            edges[v].push(u);
        }
    }
    for neighbour_list in edges.iter_mut() {
        neighbour_list.sort_unstable();
    }
    log::info!("load_edges : {} records from {:?}", nb_record, filepath);
    //
    Ok(edges)
} // end of load_edges

/// Loads the first `node_size` points of a csv label matrix. A shorter file leaves the
/// trailing labels empty, which preprocessing rejects.
pub fn load_labels(filepath: &Path, node_size: usize) -> anyhow::Result<LabelList> {
    let fileres = OpenOptions::new().read(true).open(filepath);
    if fileres.is_err() {
        log::error!("load_labels : could not open file {:?}", filepath.as_os_str());
        return Err(anyhow!("load_labels : could not open file"));
    }
    let file = fileres.unwrap();
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    //
    let mut labels: LabelList = vec![Vec::new(); node_size];
    let mut i = 0;
    for result in rdr.records() {
        if i == node_size {
            break;
        }
        let record = result?;
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            row.push(field.trim().parse::<Coordinate>()?);
        }
        labels[i] = row;
        i += 1;
    }
    log::info!("load_labels : {} points from {:?}", i, filepath);
    //
    Ok(labels)
} // end of load_labels

//==========================================================================================

// end of mod tests
