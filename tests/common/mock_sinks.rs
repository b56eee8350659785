/*!
 * Recording render sink for asserting deliveries
 */

use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use dualsub::cue::CueSet;
use dualsub::render::RenderSink;

/// Shared log of everything one channel's sink received
#[derive(Debug, Default)]
pub struct SinkRecord {
    deliveries: StdMutex<Vec<Vec<String>>>,
    opened: StdMutex<bool>,
    closed: StdMutex<bool>,
}

impl SinkRecord {
    /// Every delivered cue set, flattened to plain text
    pub fn deliveries(&self) -> Vec<Vec<String>> {
        self.deliveries.lock().unwrap().clone()
    }

    /// The most recent delivery, if any
    pub fn last_delivery(&self) -> Option<Vec<String>> {
        self.deliveries.lock().unwrap().last().cloned()
    }

    /// How many cue sets were delivered in total
    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }

    pub fn was_opened(&self) -> bool {
        *self.opened.lock().unwrap()
    }

    pub fn was_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

/// Render sink that appends every delivery to a shared record
pub struct RecordingSink {
    record: Arc<SinkRecord>,
}

impl RecordingSink {
    /// Create a sink and the record handle the test keeps
    pub fn new() -> (Self, Arc<SinkRecord>) {
        let record = Arc::new(SinkRecord::default());
        (
            RecordingSink {
                record: record.clone(),
            },
            record,
        )
    }
}

impl RenderSink for RecordingSink {
    fn open(&mut self) {
        *self.record.opened.lock().unwrap() = true;
    }

    fn show(&mut self, cues: &CueSet) {
        let texts = cues.iter().map(|cue| cue.text()).collect();
        self.record.deliveries.lock().unwrap().push(texts);
    }

    fn close(&mut self) {
        *self.record.closed.lock().unwrap() = true;
    }
}
