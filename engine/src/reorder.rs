//! Reordering within a single sibling list.
//!
//! The resolver only ever sees one list and two indices into it, so a move
//! across lists cannot be expressed. Callers that detect a drag crossing
//! from one parent to another must not call in here at all (see
//! [`crate::drag`]).
//!
//! Index convention: the element at `from` is removed first, then inserted
//! at `to` in the shortened list.

/// Move the element at `from` to `to`.
///
/// Returns `None` when the request is a no-op: equal indices, or either
/// index outside `0..list.len()`.
pub fn try_reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    let len = list.len();
    if from == to || from >= len || to >= len {
        return None;
    }

    let mut items = list.to_vec();
    let item = items.remove(from);
    items.insert(to, item);
    Some(items)
}

/// Like [`try_reorder`], but a no-op returns a copy of the list unchanged.
pub fn reorder<T: Clone>(list: &[T], from: usize, to: usize) -> Vec<T> {
    try_reorder(list, from, to).unwrap_or_else(|| list.to_vec())
}
