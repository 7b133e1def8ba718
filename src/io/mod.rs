/// CSV export of per-step results.
pub mod export;
