use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization activity.
#[derive(Default)]
pub struct UsageMetrics {
    texts_summarized: AtomicU64,
    documents_summarized: AtomicU64,
    failures: AtomicU64,
}

impl UsageMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summary produced from pasted text.
    pub fn record_text(&self) {
        self.texts_summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a summary produced from an uploaded document.
    pub fn record_document(&self) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request that ended with an error shown to the user.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            texts_summarized: self.texts_summarized.load(Ordering::Relaxed),
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of usage counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Summaries produced from pasted text since startup.
    pub texts_summarized: u64,
    /// Summaries produced from uploaded documents since startup.
    pub documents_summarized: u64,
    /// Requests that failed since startup.
    pub failures: u64,
}
