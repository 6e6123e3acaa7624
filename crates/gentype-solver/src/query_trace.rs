//! Structured query tracing for resolver entry points.
//!
//! Events use target `gentype::query_json` and are intended to be consumed with:
//! `GENTYPE_LOG=gentype::query_json=trace GENTYPE_LOG_FORMAT=json`.
//!
//! Environment:
//! - `GENTYPE_QUERY_RUN_ID`: optional run identifier attached to every event.

use crate::def::DefId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

/// Target of the structured query events.
pub const QUERY_TRACE_TARGET: &str = "gentype::query_json";

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: QUERY_TRACE_TARGET, Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| {
            std::env::var("GENTYPE_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string())
        })
        .as_str()
}

#[inline]
pub(crate) fn query_start(query_id: u64, op: &'static str, input: DefId, target: Option<DefId>) {
    trace!(
        target: QUERY_TRACE_TARGET,
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        input_def_id = input.0,
        target_def_id = target.map(|def| def.0)
    );
}

#[inline]
pub(crate) fn query_end(query_id: u64, op: &'static str, ok: bool, cache_hit: bool) {
    trace!(
        target: QUERY_TRACE_TARGET,
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        ok,
        cache_hit
    );
}
