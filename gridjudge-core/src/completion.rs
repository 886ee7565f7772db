use crate::trial::ResponseRecord;
use std::fmt;
use std::sync::mpsc::{self, Receiver};

/// Single-use handle a trial consumes to hand its record back to the runner
pub struct Completion {
    callback: Box<dyn FnOnce(ResponseRecord)>,
}

impl Completion {
    pub fn new(callback: impl FnOnce(ResponseRecord) + 'static) -> Self {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Completion that forwards the record into a channel
    pub fn channel() -> (Self, Receiver<ResponseRecord>) {
        let (tx, rx) = mpsc::channel();
        let completion = Self::new(move |record| {
            // receiver gone means the runner stopped listening
            let _ = tx.send(record);
        });
        (completion, rx)
    }

    pub fn finish(self, record: ResponseRecord) {
        (self.callback)(record)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}
