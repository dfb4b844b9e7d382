//! HTTP plumbing shared by the API transport

mod client;

pub use client::{HttpClient, HttpClientBuilder, RetryPolicy};
