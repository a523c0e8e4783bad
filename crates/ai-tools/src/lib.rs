//! Tooling primitives for deterministic game AI.
//!
//! Lightweight and engine-agnostic. Traces are recorded through the agent's blackboard so any
//! subsystem holding a `&mut Blackboard` can report without extra plumbing.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{
    emit, enabled, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink, TRACE_LOG, TRACE_SINK,
};
