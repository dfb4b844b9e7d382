//! Sort specification and value comparison

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// A sortable field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Date(DateTime<Utc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort key and direction. `key: None` keeps source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec<K> {
    pub key: Option<K>,
    pub direction: SortDirection,
}

impl<K> Default for SortSpec<K> {
    fn default() -> Self {
        Self { key: None, direction: SortDirection::Ascending }
    }
}

impl<K: Copy + PartialEq> SortSpec<K> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ascending(key: K) -> Self {
        Self { key: Some(key), direction: SortDirection::Ascending }
    }

    pub fn descending(key: K) -> Self {
        Self { key: Some(key), direction: SortDirection::Descending }
    }

    /// Column-header click: the active key flips direction, any other key
    /// becomes active in ascending order.
    pub fn toggle(&mut self, key: K) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            *self = Self::ascending(key);
        }
    }
}

/// Compare two values of the same kind. Mismatched kinds, and NaN, compare
/// as equal so they keep their relative order.
///
/// Text compares case-insensitively first and falls back to a byte-wise
/// comparison to order values that differ only in case.
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Text(a), FieldValue::Text(b)) => {
            a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
        }
        (FieldValue::Number(a), FieldValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (FieldValue::Date(a), FieldValue::Date(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Order two optional values under `direction`. Unset values always go last.
pub(crate) fn compare_optional(
    a: Option<&FieldValue<'_>>,
    b: Option<&FieldValue<'_>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Ascending => compare_values(a, b),
            SortDirection::Descending => compare_values(b, a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable bottom-up merge sort.
///
/// Unlike `slice::sort_by` it never inspects the comparator for
/// consistency, so a comparator that is not a total order still yields a
/// deterministic result.
pub(crate) fn merge_sort_by<T, F>(items: &mut Vec<T>, compare: F)
where
    T: Copy,
    F: Fn(&T, &T) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }

    let mut buffer = Vec::with_capacity(len);
    let mut width = 1;
    while width < len {
        buffer.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, mid);
            while left < mid && right < end {
                // Ties take from the left run.
                if compare(&items[right], &items[left]) == Ordering::Less {
                    buffer.push(items[right]);
                    right += 1;
                } else {
                    buffer.push(items[left]);
                    left += 1;
                }
            }
            buffer.extend_from_slice(&items[left..mid]);
            buffer.extend_from_slice(&items[right..end]);
            start = end;
        }
        std::mem::swap(items, &mut buffer);
        width *= 2;
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_toggle_flips_active_key_and_resets_new_key() {
        let mut spec = SortSpec::ascending("title");

        spec.toggle("title");
        assert_eq!(spec, SortSpec::descending("title"));

        spec.toggle("due");
        assert_eq!(spec, SortSpec::ascending("due"));
    }

    #[test]
    fn test_compare_values_by_kind() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert_eq!(compare_values(&FieldValue::Date(early), &FieldValue::Date(late)), Ordering::Less);
        assert_eq!(compare_values(&FieldValue::Number(10.0), &FieldValue::Number(9.5)), Ordering::Greater);
        assert_eq!(compare_values(&FieldValue::Text("apple"), &FieldValue::Text("Banana")), Ordering::Less);
        assert_eq!(compare_values(&FieldValue::Text("x"), &FieldValue::Number(1.0)), Ordering::Equal);
        assert_eq!(
            compare_values(&FieldValue::Number(f64::NAN), &FieldValue::Number(1.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_unset_values_sort_last_in_both_directions() {
        let one = FieldValue::Number(1.0);
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            assert_eq!(compare_optional(Some(&one), None, direction), Ordering::Less);
            assert_eq!(compare_optional(None, Some(&one), direction), Ordering::Greater);
        }
    }

    #[test]
    fn test_merge_sort_is_stable() {
        let mut pairs = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        merge_sort_by(&mut pairs, |a, b| a.0.cmp(&b.0));
        assert_eq!(pairs, vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }
}
