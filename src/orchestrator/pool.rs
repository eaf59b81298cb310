use crate::roles::WorkerId;

/// Round-robin labels for a pool of interchangeable workers.
///
/// Dispatch `k` (counting from zero) goes to `worker #(k % size + 1)`. The
/// counter advances on every dispatch, whatever its outcome.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    size: usize,
    dispatched: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            dispatched: 0,
        }
    }

    /// Label for the next dispatch.
    pub fn next_worker(&mut self) -> WorkerId {
        let id = WorkerId(self.dispatched % self.size + 1);
        self.dispatched += 1;
        id
    }
}
