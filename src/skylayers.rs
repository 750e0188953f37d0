//! Builds sky-layers: a partition of the labelled points into incomparability layers.
//!
//! Layer i contains the points not dominated by any point of layers 0..i. The builder
//! consumes points in the layered sort order produced by
//! [order_by_partition](crate::spatial::order_by_partition), so a point can only ever be
//! dominated by points that precede it. Layer membership bounds the skyline search: once
//! every remaining layer representative is dominated the drivers can stop early.

use crate::spatial::{determine_partition, point_dominance, Dominance, PartitionMask, Point, PointList};

pub type SkyLayers = Vec<PointList>;

/// Block of points sharing a mask value within one layer of the no-duplicate structure
#[derive(Debug, Clone, Copy, Default)]
struct LayerMaskInfo {
    /// position of the first point in this layer carrying this mask
    first_pos: usize,
    /// position of the last point in this layer carrying this mask
    last_pos: usize,
    /// number of points in this layer carrying this mask
    size: usize,
}

/// Two masks are incomparable when neither block can contain a dominator of the other.
/// In that case the point comparison can be skipped altogether.
fn are_incomparable(mask1: PartitionMask, mask2: PartitionMask) -> bool {
    (mask1.count_ones() >= mask2.count_ones() && mask1 != mask2) || ((mask1 & mask2) < mask1)
} // end of are_incomparable

/// Appends a point to the no-duplicate structure, opening a new layer if needed.
/// The stored mask is rewritten relative to the first point of its (layer, mask) block so
/// that intra-block comparisons can reuse [are_incomparable].
fn update_sky_layers(
    sky_layers: &mut SkyLayers,
    lm_info: &mut Vec<Vec<LayerMaskInfo>>,
    new_point: &Point,
    max_mask: PartitionMask,
    layer_number: usize,
) {
    if layer_number == sky_layers.len() {
        // adding a new layer
        lm_info.push(vec![LayerMaskInfo::default(); max_mask as usize + 1]);
        lm_info.last_mut().unwrap()[new_point.mask as usize].size = 1;
        let mut first = new_point.clone();
        first.mask = 0;
        sky_layers.push(vec![first]);
    } else {
        // updating an existing layer
        let info = &mut lm_info[layer_number][new_point.mask as usize];
        let position = sky_layers[layer_number].len();
        let mut added = new_point.clone();
        info.last_pos = position;
        if info.size == 0 {
            info.first_pos = position;
            added.mask = 0;
        } else {
            let first_label = &sky_layers[layer_number][info.first_pos].label;
            added.mask = determine_partition(&new_point.label, first_label);
        }
        info.size += 1;
        sky_layers[layer_number].push(added);
    }
} // end of update_sky_layers

/// Partitions the layered-sorted points into sky-layers.
///
/// Each point is assigned to the first layer in which no existing point strictly
/// dominates it. Points equal to an already placed point join that point's layer but are
/// not recorded in the no-duplicate structure, so they never prune anything themselves.
pub fn generate_sky_layers(points: &PointList) -> SkyLayers {
    assert!(!points.is_empty(), "need points to build sky layers");
    //
    let mut sky_layers: SkyLayers = Vec::new();
    let mut sky_layers_no_duplicates: SkyLayers = Vec::new();
    // first/last positions of each mask value in each no-duplicate layer
    let mut lm_info_no_duplicates: Vec<Vec<LayerMaskInfo>> = Vec::new();
    //
    let num_dimensions = points[0].label.len();
    let max_mask: PartitionMask = if num_dimensions >= 32 {
        PartitionMask::MAX
    } else {
        (1 << num_dimensions) - 1
    };
    //
    for current_point in points {
        let mut layer_number = 0;
        // initialisations matter for the first point only : treat it as dominated so it
        // opens layer 0, and as not-equal so the no-duplicate structure is updated
        let mut is_dominated = true;
        let mut is_equal = false;
        //
        for j in 0..sky_layers_no_duplicates.len() {
            is_dominated = false;
            for m in 0..=current_point.mask {
                let info = lm_info_no_duplicates[j][m as usize];
                if info.size == 0 {
                    continue;
                }
                if !are_incomparable(m, current_point.mask) {
                    let block = &sky_layers_no_duplicates[j];
                    let tmp_mask =
                        determine_partition(&current_point.label, &block[info.first_pos].label);
                    is_dominated = tmp_mask == max_mask;
                    if is_dominated {
                        break;
                    }
                    for compare_point in &block[info.first_pos..=info.last_pos] {
                        if !are_incomparable(compare_point.mask, tmp_mask) {
                            match point_dominance(&compare_point.label, &current_point.label) {
                                Dominance::Dominates => is_dominated = true,
                                Dominance::Equal => is_equal = true,
                                Dominance::Incomparable => continue,
                            }
                            break;
                        }
                    }
                    if is_dominated || is_equal {
                        break;
                    }
                }
            }
            if !is_dominated || is_equal {
                layer_number = j;
                sky_layers[j].push(current_point.clone());
                break;
            }
        }
        if is_dominated {
            layer_number = sky_layers_no_duplicates.len();
            sky_layers.push(vec![current_point.clone()]);
        }
        if !is_equal {
            update_sky_layers(
                &mut sky_layers_no_duplicates,
                &mut lm_info_no_duplicates,
                current_point,
                max_mask,
                layer_number,
            );
        }
    }
    log::debug!(
        "generate_sky_layers : {} points in {} layers",
        points.len(),
        sky_layers.len()
    );
    //
    sky_layers
} // end of generate_sky_layers

//==========================================================================================

#[cfg(test)]
mod tests {

    use super::*;
    use crate::spatial::{order_by_partition, LabelList};

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn layers_of(labels: LabelList) -> SkyLayers {
        let (_, points) = order_by_partition(&labels);
        generate_sky_layers(&points)
    }

    #[test]
    fn incomparable_masks() {
        log_init_test();
        //
        // same popcount, different mask : blocks cannot dominate each other
        assert!(are_incomparable(0b01, 0b10));
        // mask1 has a bit outside mask2
        assert!(are_incomparable(0b11, 0b01));
        // mask1 subset of mask2 : a dominator may hide in block 1
        assert!(!are_incomparable(0b01, 0b11));
        assert!(!are_incomparable(0, 0b11));
        assert!(!are_incomparable(0b10, 0b10));
    }

    #[test]
    fn chain_gives_one_layer_each() {
        log_init_test();
        //
        // total order : every point dominated by all its predecessors
        let layers = layers_of(vec![vec![1, 1], vec![2, 2], vec![3, 3]]);
        assert_eq!(layers.len(), 3);
        for layer in &layers {
            assert_eq!(layer.len(), 1);
        }
    }

    #[test]
    fn antichain_gives_single_layer() {
        log_init_test();
        //
        let layers = layers_of(vec![vec![1, 4], vec![2, 3], vec![3, 2], vec![4, 1]]);
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].len(), 4);
    }

    #[test]
    fn mixed_layers() {
        log_init_test();
        //
        // (1,5),(2,4) incomparable front ; (3,5) dominated by (2,4) ; (5,5) dominated by all
        let layers = layers_of(vec![vec![1, 5], vec![2, 4], vec![3, 5], vec![5, 5]]);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0].len(), 2);
        assert_eq!(layers[1].len(), 1);
        assert_eq!(layers[1][0].label, vec![3, 5]);
        assert_eq!(layers[2][0].label, vec![5, 5]);
    }

    #[test]
    fn equal_points_share_a_layer() {
        log_init_test();
        //
        let layers = layers_of(vec![vec![2, 2], vec![2, 2], vec![3, 3]]);
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].len(), 2); // the duplicate joins its match
        assert_eq!(layers[1].len(), 1);
    }
} // end of mod tests
