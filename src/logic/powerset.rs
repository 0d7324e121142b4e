use crate::error::{BenchError, BenchResult};

/// All subsets of `items`, including the empty and the full set.
///
/// Subset `mask` holds `items[i]` iff bit `i` is set, so the output has
/// `2^n` entries in mask order and each subset keeps the input order.
/// Duplicate items are the caller's concern.
pub fn power_set<T: Clone>(items: &[T]) -> BenchResult<Vec<Vec<T>>> {
    if items.len() >= 64 {
        return Err(BenchError::invalid(format!(
            "power set of {} elements is not enumerable",
            items.len()
        )));
    }

    let count = 1u64 << items.len();
    let subsets = (0..count)
        .map(|mask| {
            items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u64 << i) != 0)
                .map(|(_, item)| item.clone())
                .collect()
        })
        .collect();
    Ok(subsets)
}
