//! Data-parallel fan-out over slices
//!
//! A thin wrapper over rayon so callers consume an opaque fork-join
//! primitive: the call partitions work into chunks, runs chunks on the
//! thread pool, and blocks until every chunk has completed.

use rayon::prelude::*;

/// Run `f` for every element of `items` in parallel, mutably.
///
/// `min_grain` is the smallest number of elements a single task will take;
/// small slices degenerate to a sequential loop. Blocks until all elements
/// have been processed. A panic in `f` propagates to the caller at the join
/// point.
pub fn parallel_for<T, F>(items: &mut [T], min_grain: usize, f: F)
where
    T: Send,
    F: Fn(&mut T) + Send + Sync,
{
    let grain = min_grain.max(1);
    if items.len() <= grain {
        for item in items.iter_mut() {
            f(item);
        }
        return;
    }
    items.par_iter_mut().with_min_len(grain).for_each(|item| f(item));
}

/// Read-only variant of [`parallel_for`]
pub fn parallel_for_each<T, F>(items: &[T], min_grain: usize, f: F)
where
    T: Sync,
    F: Fn(&T) + Send + Sync,
{
    let grain = min_grain.max(1);
    if items.len() <= grain {
        for item in items.iter() {
            f(item);
        }
        return;
    }
    items.par_iter().with_min_len(grain).for_each(|item| f(item));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn every_element_visited_once() {
        let mut items: Vec<u32> = vec![0; 1000];
        parallel_for(&mut items, 8, |v| *v += 1);
        assert!(items.iter().all(|v| *v == 1));
    }

    #[test]
    fn small_slice_runs_sequentially() {
        let mut items = vec![1u32, 2, 3];
        parallel_for(&mut items, 8, |v| *v *= 2);
        assert_eq!(items, vec![2, 4, 6]);
    }

    #[test]
    fn read_only_visits_all() {
        let items: Vec<u32> = (0..512).collect();
        let count = AtomicUsize::new(0);
        parallel_for_each(&items, 4, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(count.load(Ordering::Relaxed), 512);
    }
}
