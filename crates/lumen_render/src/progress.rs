//! Progress reporting seam.
//!
//! The scheduler drives one of these from the coordinating thread while the
//! workers run. It is a side channel only; render correctness never depends
//! on it.

/// Receives progress updates during a render.
pub trait Progress {
    /// `done` of `total` pixels are complete.
    fn indicate(&mut self, done: usize, total: usize);

    /// All pixels are complete.
    fn done(&mut self);
}

/// Progress sink that ignores everything.
pub struct NullProgress;

impl Progress for NullProgress {
    fn indicate(&mut self, _done: usize, _total: usize) {}

    fn done(&mut self) {}
}
