//! Run report.

use tokio::sync::Mutex;

/// A failed resource or course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportError {
    /// Resource key, or `<course> [<kind>]` when discovery failed.
    pub key: String,
    pub message: String,
}

/// Outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub new: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: usize,
    pub errors: Vec<ReportError>,
    pub notices: Vec<String>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of resources classified during the run.
    pub fn classified(&self) -> usize {
        self.new.len() + self.updated.len() + self.unchanged
    }
}

/// Shared, append-only collector filled by concurrent tasks.
#[derive(Default)]
pub struct ReportCollector {
    inner: Mutex<Report>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_new(&self, key: String) {
        self.inner.lock().await.new.push(key);
    }

    pub async fn record_updated(&self, key: String) {
        self.inner.lock().await.updated.push(key);
    }

    pub async fn record_unchanged(&self) {
        self.inner.lock().await.unchanged += 1;
    }

    pub async fn record_error(&self, key: String, message: String) {
        self.inner
            .lock()
            .await
            .errors
            .push(ReportError { key, message });
    }

    pub async fn add_notices(&self, notices: Vec<String>) {
        self.inner.lock().await.notices.extend(notices);
    }

    /// Finish collection; lists are sorted for stable output.
    pub fn into_report(self) -> Report {
        let mut report = self.inner.into_inner();
        report.new.sort();
        report.updated.sort();
        report.errors.sort_by(|a, b| a.key.cmp(&b.key));
        report
    }
}
