//! Filter specification

use std::collections::{BTreeMap, BTreeSet};

use super::projectable::Projectable;

/// Facet constraints plus a free-text search.
///
/// An empty facet set or a blank search places no constraint. All active
/// constraints must hold for a record to pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec<F: Ord> {
    facets: BTreeMap<F, BTreeSet<String>>,
    search: String,
}

impl<F: Ord> Default for FilterSpec<F> {
    fn default() -> Self {
        Self { facets: BTreeMap::new(), search: String::new() }
    }
}

impl<F: Ord + Copy> FilterSpec<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FilterSpec::set_facet`].
    pub fn with_facet<I, S>(mut self, facet: F, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_facet(facet, accepted);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.set_search(search);
        self
    }

    /// Replace the accepted values for `facet`. An empty set removes the
    /// constraint.
    pub fn set_facet<I, S>(&mut self, facet: F, accepted: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let accepted: BTreeSet<String> = accepted.into_iter().map(Into::into).collect();
        if accepted.is_empty() {
            self.facets.remove(&facet);
        } else {
            self.facets.insert(facet, accepted);
        }
    }

    pub fn clear_facet(&mut self, facet: F) {
        self.facets.remove(&facet);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn accepted(&self, facet: F) -> Option<&BTreeSet<String>> {
        self.facets.get(&facet)
    }

    /// True when no constraint is active.
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty() && self.search.trim().is_empty()
    }

    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: Projectable<Facet = F>,
    {
        let facets_pass = self.facets.iter().all(|(facet, accepted)| {
            item.facet_values(*facet).iter().any(|value| accepted.contains(*value))
        });
        facets_pass && self.search_matches(item)
    }

    fn search_matches<T: Projectable>(&self, item: &T) -> bool {
        let needle = self.search.trim();
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        item.search_fields().iter().any(|field| field.to_lowercase().contains(&needle))
    }
}
