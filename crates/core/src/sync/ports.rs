//! Port interfaces for resource synchronisation

use std::future::Future;

use async_trait::async_trait;
use invoicedesk_domain::{Page, Result};

/// Trait for fetching one page of a resource for a set of query params
#[async_trait]
pub trait PageSource<P, T>: Send + Sync {
    async fn fetch_page(&self, params: P) -> Result<Page<T>>;
}

/// [`PageSource`] backed by an async closure.
pub struct FnPageSource<F> {
    fetch: F,
}

/// Adapt `Fn(P) -> impl Future<Output = Result<Page<T>>>` into a
/// [`PageSource`].
pub fn page_source_fn<F>(fetch: F) -> FnPageSource<F> {
    FnPageSource { fetch }
}

#[async_trait]
impl<P, T, F, Fut> PageSource<P, T> for FnPageSource<F>
where
    P: Send + 'static,
    T: Send + 'static,
    F: Fn(P) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>>> + Send,
{
    async fn fetch_page(&self, params: P) -> Result<Page<T>> {
        (self.fetch)(params).await
    }
}
