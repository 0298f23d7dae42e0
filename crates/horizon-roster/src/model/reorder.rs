//! Drag-and-drop reordering.
//!
//! A completed drag gesture names the dragged record and the record it was
//! dropped onto. The dragged record is lifted out and reinserted so that it
//! ends up at the index the drop target occupied before the move: dragging
//! upward lands in front of the target, dragging downward lands after it.

use super::record::{ListRecord, RecordId};

/// Validates a single-element move within a sequence of `len` elements.
///
/// Returns the `(from, to)` pair unchanged when both indices are in bounds
/// and differ, `None` otherwise.
pub fn checked_move(len: usize, from: usize, to: usize) -> Option<(usize, usize)> {
    if from >= len || to >= len || from == to {
        return None;
    }
    Some((from, to))
}

/// Moves the element at `from` to `to` in place, shifting the elements in
/// between by one. Out-of-range or identical indices leave the slice untouched.
pub fn move_within<T>(items: &mut [T], from: usize, to: usize) -> bool {
    let Some((from, to)) = checked_move(items.len(), from, to) else {
        return false;
    };
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    true
}

/// Returns the position of the record with `id`.
pub fn position_of<T: ListRecord>(records: &[T], id: &RecordId) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}

/// Returns a new order with `source_id` moved onto `target_id`'s position.
///
/// If either id is missing, or both are the same, the original order is
/// returned unchanged. The result always holds the same records as the input.
pub fn reorder<T>(records: &[T], source_id: &RecordId, target_id: &RecordId) -> Vec<T>
where
    T: ListRecord + Clone,
{
    let mut reordered = records.to_vec();
    reorder_in_place(&mut reordered, source_id, target_id);
    reordered
}

/// In-place variant of [`reorder`]. Returns `true` if the order changed.
pub fn reorder_in_place<T: ListRecord>(
    records: &mut [T],
    source_id: &RecordId,
    target_id: &RecordId,
) -> bool {
    if source_id == target_id {
        return false;
    }
    match (position_of(records, source_id), position_of(records, target_id)) {
        (Some(from), Some(to)) => move_within(records, from, to),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::Record;

    fn abc() -> Vec<Record> {
        ["1", "2", "3"]
            .into_iter()
            .map(Record::new)
            .collect()
    }

    fn order(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_move_backward_lands_before_target() {
        let moved = reorder(&abc(), &"3".into(), &"1".into());
        assert_eq!(order(&moved), vec!["3", "1", "2"]);
    }

    #[test]
    fn test_move_forward_lands_after_target() {
        let moved = reorder(&abc(), &"1".into(), &"3".into());
        assert_eq!(order(&moved), vec!["2", "3", "1"]);

        let moved = reorder(&abc(), &"1".into(), &"2".into());
        assert_eq!(order(&moved), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_guarded_moves_are_noops() {
        let records = abc();

        assert_eq!(reorder(&records, &"2".into(), &"2".into()), records);
        assert_eq!(reorder(&records, &"missing".into(), &"1".into()), records);
        assert_eq!(reorder(&records, &"1".into(), &"missing".into()), records);
    }

    #[test]
    fn test_reorder_is_a_permutation() {
        let records: Vec<Record> = (0..8).map(|i| Record::new(i.to_string())).collect();

        for source in 0..8 {
            for target in 0..8 {
                let moved = reorder(
                    &records,
                    &source.to_string().into(),
                    &target.to_string().into(),
                );
                let mut ids: Vec<&str> = order(&moved);
                ids.sort_unstable();
                let mut expected = order(&records);
                expected.sort_unstable();
                assert_eq!(ids, expected);
                assert_eq!(moved[target].id.as_str(), source.to_string());
            }
        }
    }

    #[test]
    fn test_checked_move() {
        assert_eq!(checked_move(4, 0, 3), Some((0, 3)));
        assert_eq!(checked_move(4, 3, 0), Some((3, 0)));
        assert_eq!(checked_move(4, 2, 2), None);
        assert_eq!(checked_move(4, 4, 0), None);
        assert_eq!(checked_move(0, 0, 0), None);
    }

    #[test]
    fn test_move_within_bounds() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_within(&mut items, 0, 2));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        assert!(!move_within(&mut items, 1, 9));
        assert!(!move_within(&mut items, 1, 1));
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
    }
}
