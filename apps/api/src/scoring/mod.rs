// Skill Maturity Scoring Engine
// Validation → targets → gaps, maturity, alignment, capabilities, depth → one result.
// Everything except `handlers` is pure computation with no I/O and no shared mutable state.
// Benchmarks are injected by reference.

pub mod alignment;
pub mod capabilities;
pub mod depth;
pub mod diagnostics;
pub mod engine;
pub mod gaps;
pub mod handlers;
pub mod maturity;
pub mod targets;
pub mod template;
pub mod validation;
