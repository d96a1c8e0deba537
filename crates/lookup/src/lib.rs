#![deny(unused)]
//! Insight lookup cache and staleness guard for CallerInsight.
//!
//! [`InsightCache`] wraps an [`caller_insight_core::InsightClient`] with a
//! TTL-bounded result cache and in-flight request coalescing.
//! [`RequestGuard`] is the per-surface generation counter that discards
//! superseded asynchronous results before they are displayed.

pub mod cache;
pub mod guard;

pub use cache::InsightCache;
pub use guard::{GuardToken, RequestGuard};
