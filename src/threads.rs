//! Threads API clients and services for publishing posts over HTTP.

pub mod client;
pub mod service;

pub use client::{Insights, Receipt, ThreadsClient};
