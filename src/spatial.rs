//! Spatial operations on numeric multi-variate vertex labels.
//!
//! Labels are small integer tuples where *smaller is better*. This module provides the
//! point-level dominance test, the median partition masks and the layered sort order that
//! drives relabelling (see [order_by_partition]).

/// Data type for an individual coordinate of a point
pub type Coordinate = i32;
/// A point is a list of coordinates
pub type Label = Vec<Coordinate>;
/// A list of points stored contiguously, indexed by vertex id
pub type LabelList = Vec<Label>;
/// A bit mask locating a point relative to the median pivot. One bit per dimension, so
/// the number of dimensions must not exceed 32.
pub type PartitionMask = u32;

/// Result of a one-sided point dominance test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    Dominates,
    Incomparable,
    Equal,
}

/// One-sided dominance test between two points of equal dimension.
/// `left` dominates `right` iff it is smaller or equal on every dimension and the points
/// are not equal. Exits early on the first dimension where `left` is worse.
pub fn point_dominance(left: &[Coordinate], right: &[Coordinate]) -> Dominance {
    debug_assert_eq!(left.len(), right.len());
    //
    let mut num_dimensions_equal = 0;
    for (l, r) in left.iter().zip(right.iter()) {
        if l == r {
            num_dimensions_equal += 1;
        } else if l > r {
            return Dominance::Incomparable;
        }
    }
    if num_dimensions_equal == left.len() {
        Dominance::Equal
    } else {
        Dominance::Dominates
    }
} // end of point_dominance

/// Calculates a bit mask indicating on which dimensions a point is larger than a given
/// pivot point
pub fn determine_partition(point: &[Coordinate], pivot: &[Coordinate]) -> PartitionMask {
    let mut partition: PartitionMask = 0;
    for d in 0..point.len() {
        if point[d] > pivot[d] {
            partition |= 1 << d;
        }
    }
    partition
} // end of determine_partition

/// A point as carried through layer construction: its rank in the layered sort order,
/// its partition mask and its label
#[derive(Debug, Clone)]
pub struct Point {
    pub id: usize,
    pub mask: PartitionMask,
    pub label: Label,
}

pub type PointList = Vec<Point>;

/// Calculates the dimension-wise median of a set of points
fn get_pivot(labels: &LabelList) -> Label {
    assert!(!labels.is_empty(), "need points to calculate a pivot");
    //
    let n = labels.len();
    let num_dimensions = labels[0].len();
    let mut pivot = vec![0 as Coordinate; num_dimensions];
    // dimension by dimension, gather all coordinates, sort and take the median
    for d in 0..num_dimensions {
        let mut coordinates: Vec<Coordinate> = labels.iter().map(|label| label[d]).collect();
        coordinates.sort_unstable();
        pivot[d] = coordinates[n / 2];
    }
    pivot
} // end of get_pivot

/// Maps each point to its partition mask relative to the median pivot
fn partition_data(points: &LabelList) -> Vec<PartitionMask> {
    let pivot = get_pivot(points);
    points
        .iter()
        .map(|point| determine_partition(point, &pivot))
        .collect()
} // end of partition_data

// Materialised sort keys for one point. Ordering is ascending by
// (popcount of mask, mask, L1 norm, lexicographic label).
struct ExtendedPoint {
    id: usize,
    sum: i64,
    mask: PartitionMask,
    set_bits_count: u32,
}

/// Determines the sort order of the points: ascending by
///   1. popcount of the partition mask
///   2. integer representation of the partition mask
///   3. L1 norm of the coordinates
///   4. lexicographic comparison of the labels themselves
fn get_indices_sorted_by_partition(
    points: &LabelList,
    point_partitions: &[PartitionMask],
) -> Vec<usize> {
    let mut sort_keys: Vec<ExtendedPoint> = (0..points.len())
        .map(|index| ExtendedPoint {
            id: index,
            sum: points[index].iter().map(|&c| c as i64).sum(),
            mask: point_partitions[index],
            set_bits_count: point_partitions[index].count_ones(),
        })
        .collect();
    //
    sort_keys.sort_by(|a, b| {
        (a.set_bits_count, a.mask, a.sum)
            .cmp(&(b.set_bits_count, b.mask, b.sum))
            .then_with(|| points[a.id].cmp(&points[b.id]))
    });
    //
    sort_keys.iter().map(|key| key.id).collect()
} // end of get_indices_sorted_by_partition

/// Produces the list of [Point] structs reordered per the sorted index mapping.
/// The id recorded in each Point is its rank in the new order.
fn reorder_points_by_index(
    points: &LabelList,
    point_partitions: &[PartitionMask],
    sorted_indices: &[usize],
) -> PointList {
    (0..points.len())
        .map(|index| Point {
            id: index,
            mask: point_partitions[sorted_indices[index]],
            label: points[sorted_indices[index]].clone(),
        })
        .collect()
} // end of reorder_points_by_index

/// Determines the ascending layered sort order of a list of points by partitioning the
/// data around the dimension-wise median.
///
/// Returns a pair: the first element maps rank in the sort order to original index
/// (i.e. it is the `to_original` permutation), the second is the list of [Point] structs
/// reordered per that mapping.
pub fn order_by_partition(points: &LabelList) -> (Vec<usize>, PointList) {
    let point_partitions = partition_data(points);
    let sorted_indices = get_indices_sorted_by_partition(points, &point_partitions);
    let sorted_points = reorder_points_by_index(points, &point_partitions, &sorted_indices);
    (sorted_indices, sorted_points)
} // end of order_by_partition

//==========================================================================================

#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn dominance_trichotomy() {
        log_init_test();
        //
        assert_eq!(point_dominance(&[1, 2], &[1, 2]), Dominance::Equal);
        assert_eq!(point_dominance(&[1, 2], &[1, 3]), Dominance::Dominates);
        assert_eq!(point_dominance(&[1, 3], &[1, 2]), Dominance::Incomparable);
        assert_eq!(point_dominance(&[1, 5], &[5, 1]), Dominance::Incomparable);
        // antisymmetry modulo equality
        let p = vec![2, 4, 1];
        let q = vec![3, 4, 2];
        assert_eq!(point_dominance(&p, &q), Dominance::Dominates);
        assert_eq!(point_dominance(&q, &p), Dominance::Incomparable);
    } // end of dominance_trichotomy

    #[test]
    fn partition_masks() {
        log_init_test();
        //
        let pivot = vec![3, 3, 3];
        assert_eq!(determine_partition(&[1, 1, 1], &pivot), 0b000);
        assert_eq!(determine_partition(&[4, 1, 1], &pivot), 0b001);
        assert_eq!(determine_partition(&[1, 4, 4], &pivot), 0b110);
        assert_eq!(determine_partition(&[3, 3, 3], &pivot), 0b000); // equality is not "larger"
    }

    #[test]
    fn layered_order() {
        log_init_test();
        //
        // medians: dim 0 sorted [1,2,3,5] -> index 2 -> 3 ; dim 1 sorted [1,3,4,5] -> 4
        let labels: LabelList = vec![vec![1, 5], vec![2, 4], vec![3, 3], vec![5, 1]];
        let (to_original, points) = order_by_partition(&labels);
        // masks relative to pivot (3,4): (1,5)->10b=2, (2,4)->0, (3,3)->0, (5,1)->1
        // popcount then mask then L1 gives: (2,4) L1=6, (3,3) L1=6 tie broken lexicographically,
        // then (5,1) mask 1, then (1,5) mask 2
        assert_eq!(to_original, vec![1, 2, 3, 0]);
        assert_eq!(points[0].label, vec![2, 4]);
        assert_eq!(points[3].label, vec![1, 5]);
        // ids record ranks in the new order
        for (rank, p) in points.iter().enumerate() {
            assert_eq!(p.id, rank);
        }
        log::info!("layered order : {:?}", to_original);
    } // end of layered_order

    #[test]
    fn median_pivot() {
        log_init_test();
        //
        let labels: LabelList = vec![vec![1, 9], vec![2, 8], vec![3, 7], vec![4, 6], vec![5, 5]];
        assert_eq!(get_pivot(&labels), vec![3, 7]);
        // even count takes the upper median, index n/2
        let labels: LabelList = vec![vec![1], vec![2], vec![3], vec![4]];
        assert_eq!(get_pivot(&labels), vec![3]);
    }
} // end of mod tests
