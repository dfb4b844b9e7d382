//! Projection entry points

use std::sync::Arc;

use super::filter::FilterSpec;
use super::projectable::Projectable;
use super::sort::{compare_optional, merge_sort_by, SortSpec};

/// Filter then sort `items` into a new vector. The source is not touched.
///
/// Records that tie on the sort key keep their source order, so applying the
/// same projection to its own output returns it unchanged.
pub fn project<T>(items: &[T], filter: &FilterSpec<T::Facet>, sort: &SortSpec<T::SortKey>) -> Vec<T>
where
    T: Projectable + Clone,
{
    let mut selected: Vec<&T> = if filter.is_empty() {
        items.iter().collect()
    } else {
        items.iter().filter(|item| filter.matches(*item)).collect()
    };

    if let Some(key) = sort.key {
        let direction = sort.direction;
        merge_sort_by(&mut selected, |a, b| {
            compare_optional(a.sort_value(key).as_ref(), b.sort_value(key).as_ref(), direction)
        });
    }

    selected.into_iter().cloned().collect()
}

/// Memoised [`project`].
///
/// Hands back the same `Arc` as long as the source `Arc`, the filter and the
/// sort are unchanged.
pub struct Projection<T: Projectable> {
    cached: Option<Cached<T>>,
}

struct Cached<T: Projectable> {
    source: Arc<Vec<T>>,
    filter: FilterSpec<T::Facet>,
    sort: SortSpec<T::SortKey>,
    output: Arc<Vec<T>>,
}

impl<T: Projectable> Default for Projection<T> {
    fn default() -> Self {
        Self { cached: None }
    }
}

impl<T> Projection<T>
where
    T: Projectable + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        source: &Arc<Vec<T>>,
        filter: &FilterSpec<T::Facet>,
        sort: &SortSpec<T::SortKey>,
    ) -> Arc<Vec<T>> {
        if let Some(cached) = &self.cached {
            if Arc::ptr_eq(&cached.source, source) && cached.filter == *filter && cached.sort == *sort {
                return Arc::clone(&cached.output);
            }
        }

        let output = Arc::new(project(source.as_slice(), filter, sort));
        self.cached = Some(Cached {
            source: Arc::clone(source),
            filter: filter.clone(),
            sort: *sort,
            output: Arc::clone(&output),
        });
        output
    }
}
