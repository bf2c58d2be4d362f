//! Bounded record buffer used before any real sink exists.
//!
//! # Design Decisions
//! - Hard cap: every insert past capacity evicts the oldest record first
//! - Never blocks the caller beyond the internal lock, never errors
//! - Drain is destructive and happens once, during the switch to real sinks

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::logging::record::LogRecord;

/// Capacity of the process-wide startup buffer.
pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Default)]
struct BufferState {
    records: VecDeque<Arc<LogRecord>>,
    evicted: u64,
}

/// Records drained from a [`BufferingSink`].
#[derive(Debug, Default)]
pub struct Drained {
    /// Buffered records in insertion order.
    pub records: Vec<Arc<LogRecord>>,
    /// How many records were dropped to respect the capacity.
    pub evicted: u64,
}

/// FIFO buffer holding at most `capacity` records.
#[derive(Debug)]
pub struct BufferingSink {
    capacity: usize,
    state: Mutex<BufferState>,
}

impl BufferingSink {
    /// Create a buffer. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: Mutex::new(BufferState {
                records: VecDeque::with_capacity(capacity),
                evicted: 0,
            }),
        }
    }

    /// Append a record, evicting from the front until within capacity.
    pub fn accept(&self, record: Arc<LogRecord>) {
        let mut state = self.state.lock();
        state.records.push_back(record);
        while state.records.len() > self.capacity {
            state.records.pop_front();
            state.evicted += 1;
        }
    }

    /// Take every buffered record, leaving the buffer empty.
    pub fn drain(&self) -> Drained {
        let mut state = self.state.lock();
        let evicted = std::mem::take(&mut state.evicted);
        Drained {
            records: state.records.drain(..).collect(),
            evicted,
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BufferingSink {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
