//! Custom assertions

use std::fmt::Debug;

/// Assert that `items` are in non-decreasing order of `key`.
///
/// # Examples
///
/// ```rust,ignore
/// use invoicedesk_common::testing::assertions::assert_sorted_by_key;
///
/// let ids = vec!["a", "b", "c"];
/// assert_sorted_by_key(&ids, |id| *id);
/// ```
pub fn assert_sorted_by_key<T, K, F>(items: &[T], key: F)
where
    T: Debug,
    K: PartialOrd + Debug,
    F: Fn(&T) -> K,
{
    for window in items.windows(2) {
        let (left, right) = (key(&window[0]), key(&window[1]));
        assert!(left <= right, "Items not sorted: {:?} ({:?}) > {:?} ({:?})", window[0], left, window[1], right);
    }
}
