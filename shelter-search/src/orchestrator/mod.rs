//! Search orchestrator: routing, gated fan-out, normalization, relevance, sort.
//!
//! This module sends a parsed query to every permitted record source,
//! tags each record with its result type and sort key, merges the
//! contributions in dispatch order and sorts the merged set.

pub mod normalize;
pub mod relevance;
pub mod search;
pub mod sorter;
