//! Batching queues between the codec and the transport.
//!
//! The sender never performs I/O itself: records go to a [`RecordSink`] in
//! batches. The receiver pulls batches from a [`RecordSource`] on demand.
//! Blocking, retries and framing all belong to whatever implements those two
//! traits.

use std::collections::VecDeque;

use tracing::trace;

use crate::config::SyncOptions;
use crate::error::SyncError;
use crate::record::Record;

// ── Sending ────────────────────────────────────────────────────────────────

pub trait RecordSink {
    fn accept(&mut self, batch: Vec<Record>) -> Result<(), SyncError>;
}

impl RecordSink for Vec<Record> {
    fn accept(&mut self, batch: Vec<Record>) -> Result<(), SyncError> {
        self.extend(batch);
        Ok(())
    }
}

impl<K: RecordSink + ?Sized> RecordSink for &mut K {
    fn accept(&mut self, batch: Vec<Record>) -> Result<(), SyncError> {
        (**self).accept(batch)
    }
}

/// Adapts a closure into a [`RecordSink`].
pub struct SinkFn<F>(pub F);

impl<F> RecordSink for SinkFn<F>
where
    F: FnMut(Vec<Record>) -> Result<(), SyncError>,
{
    fn accept(&mut self, batch: Vec<Record>) -> Result<(), SyncError> {
        (self.0)(batch)
    }
}

/// Record counts of one exchange, by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendStats {
    pub values: usize,
    pub no_changes: usize,
    pub absents: usize,
}

impl SendStats {
    pub fn total(&self) -> usize {
        self.values + self.no_changes + self.absents
    }
}

pub struct SendQueue<K> {
    sink: K,
    batch: Vec<Record>,
    batch_size: usize,
    trace_records: bool,
    stats: SendStats,
}

impl<K: RecordSink> SendQueue<K> {
    pub fn new(sink: K, batch_size: usize) -> Self {
        Self {
            sink,
            batch: Vec::new(),
            batch_size: batch_size.max(1),
            trace_records: false,
            stats: SendStats::default(),
        }
    }

    pub fn with_options(sink: K, options: &SyncOptions) -> Self {
        let mut queue = Self::new(sink, options.batch_size);
        queue.trace_records = options.trace_records;
        queue
    }

    pub fn put(&mut self, record: Record) -> Result<(), SyncError> {
        match &record {
            Record::Absent => self.stats.absents += 1,
            Record::NoChange => self.stats.no_changes += 1,
            Record::Value(_) => self.stats.values += 1,
        }
        if self.trace_records {
            trace!(record = %record.describe(), "send");
        }
        self.batch.push(record);
        if self.batch.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), SyncError> {
        if self.batch.is_empty() {
            return Ok(());
        }
        let batch = std::mem::take(&mut self.batch);
        self.sink.accept(batch)
    }

    pub fn stats(&self) -> SendStats {
        self.stats
    }

    /// Returns the sink. Records still buffered are dropped; call
    /// [`flush`](Self::flush) first.
    pub fn into_sink(self) -> K {
        self.sink
    }
}

// ── Receiving ──────────────────────────────────────────────────────────────

pub trait RecordSource {
    /// Next batch, or `None` once the stream has ended.
    fn next_batch(&mut self) -> Result<Option<Vec<Record>>, SyncError>;
}

impl RecordSource for VecDeque<Vec<Record>> {
    fn next_batch(&mut self) -> Result<Option<Vec<Record>>, SyncError> {
        Ok(self.pop_front())
    }
}

impl RecordSource for std::vec::IntoIter<Record> {
    fn next_batch(&mut self) -> Result<Option<Vec<Record>>, SyncError> {
        let rest: Vec<Record> = self.by_ref().collect();
        Ok(if rest.is_empty() { None } else { Some(rest) })
    }
}

impl<R: RecordSource + ?Sized> RecordSource for &mut R {
    fn next_batch(&mut self) -> Result<Option<Vec<Record>>, SyncError> {
        (**self).next_batch()
    }
}

/// Adapts a closure into a [`RecordSource`].
pub struct SourceFn<F>(pub F);

impl<F> RecordSource for SourceFn<F>
where
    F: FnMut() -> Result<Option<Vec<Record>>, SyncError>,
{
    fn next_batch(&mut self) -> Result<Option<Vec<Record>>, SyncError> {
        (self.0)()
    }
}

pub struct ReceiveQueue<R> {
    source: R,
    buffer: VecDeque<Record>,
    trace_records: bool,
    received: usize,
}

impl<R: RecordSource> ReceiveQueue<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            trace_records: false,
            received: 0,
        }
    }

    pub fn with_options(source: R, options: &SyncOptions) -> Self {
        let mut queue = Self::new(source);
        queue.trace_records = options.trace_records;
        queue
    }

    /// Pulls batches until one is non-empty. Returns false at end of stream.
    fn fill(&mut self) -> Result<bool, SyncError> {
        while self.buffer.is_empty() {
            match self.source.next_batch()? {
                Some(batch) => self.buffer.extend(batch),
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    pub fn take(&mut self) -> Result<Record, SyncError> {
        if !self.fill()? {
            return Err(SyncError::Truncated);
        }
        let record = self.buffer.pop_front().ok_or(SyncError::Truncated)?;
        self.received += 1;
        if self.trace_records {
            trace!(record = %record.describe(), "receive");
        }
        Ok(record)
    }

    pub fn peek(&mut self) -> Result<&Record, SyncError> {
        if !self.fill()? {
            return Err(SyncError::Truncated);
        }
        self.buffer.front().ok_or(SyncError::Truncated)
    }

    /// Whether the stream has ended with nothing left to take.
    pub fn is_drained(&mut self) -> Result<bool, SyncError> {
        Ok(!self.fill()?)
    }

    /// Records pulled from the source but not yet taken.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Records taken so far.
    pub fn received(&self) -> usize {
        self.received
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flushes_full_batches() {
        let mut batches: Vec<usize> = Vec::new();
        let mut queue = SendQueue::new(
            SinkFn(|b: Vec<Record>| {
                batches.push(b.len());
                Ok::<(), SyncError>(())
            }),
            2,
        );
        for _ in 0..5 {
            queue.put(Record::NoChange).unwrap();
        }
        queue.flush().unwrap();
        assert_eq!(queue.stats().no_changes, 5);
        drop(queue);
        assert_eq!(batches, vec![2, 2, 1]);
    }

    #[test]
    fn sink_errors_propagate() {
        let mut queue = SendQueue::new(SinkFn(|_: Vec<Record>| -> Result<(), SyncError> {
                Err(SyncError::Sink("closed".into()))
            }), 1);
        assert!(matches!(queue.put(Record::Absent), Err(SyncError::Sink(_))));
    }

    #[test]
    fn take_skips_empty_batches_and_reports_truncation() {
        let batches: VecDeque<Vec<Record>> =
            VecDeque::from(vec![vec![], vec![Record::Absent], vec![]]);
        let mut queue = ReceiveQueue::new(batches);
        assert_eq!(queue.peek().unwrap(), &Record::Absent);
        assert_eq!(queue.take().unwrap(), Record::Absent);
        assert!(queue.is_drained().unwrap());
        assert!(matches!(queue.take(), Err(SyncError::Truncated)));
        assert_eq!(queue.received(), 1);
    }
}
