//! Search session: request correlation, fan-out, merge, and on-demand
//! geometry resolution.
//!
//! [`dispatch`] owns the request-id counter and the per-request merge
//! accumulator; [`merge`] defines the accumulation and ordering rules;
//! [`geometry`] resolves single items outside the correlation path.

pub mod dispatch;
pub mod geometry;
pub(crate) mod merge;
