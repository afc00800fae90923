//! Injected progress and diagnostic observers.
//!
//! The core never prints; hosts supply these. Both traits are `Send + Sync`
//! so the parallel per-tensor loop can share them across workers.

/// Count-based progress observer.
///
/// `begin` is called once with the worklist size before processing starts,
/// then `advance` exactly once per selected tensor, including tensors that
/// end up skipped (wrong kind, constant values). When the loop runs in
/// parallel, `advance` calls arrive in completion order.
pub trait Progress: Send + Sync {
    fn begin(&self, total: usize);
    fn advance(&self, by: usize);
}

/// Line-oriented diagnostic sink. Observability only; never affects the
/// returned model.
pub trait Diagnostics: Send + Sync {
    fn line(&self, message: &str);
}

/// No-op observer, the default for library callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Progress for Silent {
    fn begin(&self, _total: usize) {}
    fn advance(&self, _by: usize) {}
}

impl Diagnostics for Silent {
    fn line(&self, _message: &str) {}
}
