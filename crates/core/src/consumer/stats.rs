use serde::Serialize;

/// Per-run message counters, independent of the tally table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopStats {
    pub received: u64,
    pub decoded: u64,
    pub failed: u64,
}
