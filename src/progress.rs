// src/progress.rs
use std::path::Path;

/// Pipeline steps, in the order a run goes through them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Extract,
    LoadPrior,
    Merge,
    Write,
}

/// Status reporting for a run. Frontends implement this to surface what
/// the pipeline is doing; every method has a no-op default.
pub trait Progress {
    /// Called once before the fetch.
    fn begin(&mut self, _url: &str) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A stage finished; `count` is the number of records it produced.
    fn stage_done(&mut self, _stage: Stage, _count: usize) {}

    /// A file was written.
    fn wrote(&mut self, _path: &Path) {}

    /// Called at the end of a successful run.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
