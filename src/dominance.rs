//! Dominance tests on groups of vertices, for use with the skyline operators.
//!
//! Groups are multisets of labelled vertices. Dominance is defined over the bag
//! difference of two same-size groups: after conceptually removing the bag intersection,
//! group A dominates group B iff every remaining member of B is dominated by a member of
//! A. Equal groups do not dominate each other.
//!
//! All the tests in this module are *one-sided* : they only ask whether the first group
//! dominates the second. The drivers guarantee the precondition that makes this sound,
//! namely that groups reach the skyline in the layered-sort order of their prefix vertex,
//! so a later group can never dominate an earlier one at the prefix. Coincident but
//! distinct prefix labels break that assumption and are repaired by the postprocess
//! sweep.

use crate::graph::{GroupList, VertexId};
use crate::spatial::{point_dominance, Coordinate, Dominance, Label, LabelList};

/// One-sided dominance test between two same-size groups, O(d g^2).
///
/// Iterates group 2; each member must find a member of group 1 that is equal (both are
/// marked consumed, dropping them from the bag differences) or dominates it. Returns
/// true iff every member of group 2 was matched and at least one match was by strict
/// domination.
pub fn group_dominance(group1: &[VertexId], group2: &[VertexId], labels: &LabelList) -> bool {
    assert_eq!(group1.len(), group2.len(), "groups must have the same size");
    //
    // no explicit bag difference : points of group 1 matched to an equal point of
    // group 2 are marked off and skipped afterwards
    let mut equal_to_point_in_group2 = vec![false; group1.len()];
    let mut groups_not_equal = false;
    //
    for &b in group2 {
        let mut is_dominated_or_equal = false;
        for (i, &a) in group1.iter().enumerate() {
            if equal_to_point_in_group2[i] {
                continue;
            }
            match point_dominance(&labels[a], &labels[b]) {
                Dominance::Equal => {
                    equal_to_point_in_group2[i] = true;
                    is_dominated_or_equal = true;
                    break;
                }
                Dominance::Dominates => {
                    groups_not_equal = true;
                    is_dominated_or_equal = true;
                    break;
                }
                Dominance::Incomparable => {}
            }
        }
        if !is_dominated_or_equal {
            // found a member of group 2 no member of group 1 accounts for
            return false;
        }
    }
    // every member of group 2 was dominated or consumed ; distinguish identical groups
    groups_not_equal
} // end of group_dominance

/// Returns true if any group already in the skyline dominates `group_to_test`
pub fn is_dominated_by_skyline(
    group_to_test: &[VertexId],
    skyline: &GroupList,
    labels: &LabelList,
) -> bool {
    skyline
        .iter()
        .any(|skyline_group| group_dominance(skyline_group, group_to_test, labels))
} // end of is_dominated_by_skyline

/// Returns true if candidate `index` is dominated by an earlier candidate that is still
/// flagged as skyline. No group can dominate a group preceding it in candidate order, so
/// only indices below `index` are examined.
pub fn is_dominated_by_candidates(
    index: usize,
    candidates: &GroupList,
    is_skyline: &[bool],
    labels: &LabelList,
) -> bool {
    (0..index).any(|i| {
        is_skyline[i] && group_dominance(&candidates[i], &candidates[index], labels)
    })
} // end of is_dominated_by_candidates

/// Returns true if some skyline representative strictly dominates the layer
/// representative, i.e. no point of that layer (or any later one) can still contribute a
/// non-dominated group
pub fn can_terminate(skyline_representatives: &LabelList, layer_representative: &[Coordinate]) -> bool {
    skyline_representatives
        .iter()
        .any(|rep| point_dominance(rep, layer_representative) == Dominance::Dominates)
} // end of can_terminate

fn fold_representative<F>(group: &[VertexId], labels: &LabelList, init: Coordinate, f: F) -> Label
where
    F: Fn(Coordinate, Coordinate) -> Coordinate,
{
    let num_dimensions = labels[0].len();
    let mut representative = vec![init; num_dimensions];
    for &vertex in group {
        for (r, &c) in representative.iter_mut().zip(labels[vertex].iter()) {
            *r = f(*r, c);
        }
    }
    representative
} // end of fold_representative

/// Dimension-wise minimum over the group's labels
pub fn best_virtual_point(group: &[VertexId], labels: &LabelList) -> Label {
    fold_representative(group, labels, Coordinate::MAX, |x, y| x.min(y))
}

/// Dimension-wise maximum over the group's labels. Cached per skyline group as its
/// pruning representative.
pub fn worst_virtual_point(group: &[VertexId], labels: &LabelList) -> Label {
    fold_representative(group, labels, Coordinate::MIN, |x, y| x.max(y))
}

/// Dimension-wise sum over the group's labels. For fixed-size groups comparing sums is
/// equivalent to comparing averages without leaving integer arithmetic.
pub fn sum_virtual_point(group: &[VertexId], labels: &LabelList) -> Label {
    fold_representative(group, labels, 0, |x, y| x + y)
}

//==========================================================================================

// end of mod tests
