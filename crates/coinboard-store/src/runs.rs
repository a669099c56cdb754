use dashmap::DashMap;

/// Outcome history of one sync action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunRecord {
    pub runs: u64,
    pub failures: u64,
    pub last_started: Option<i64>,
    pub last_success: Option<i64>,
    pub last_error: Option<String>,
}

/// Per-action run bookkeeping for status reporting
#[derive(Debug, Default)]
pub struct SyncRunLog {
    records: DashMap<String, RunRecord>,
}

impl SyncRunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self, action: &str, now: i64) {
        let mut record = self.records.entry(action.to_string()).or_default();
        record.runs += 1;
        record.last_started = Some(now);
    }

    pub fn succeeded(&self, action: &str, now: i64) {
        let mut record = self.records.entry(action.to_string()).or_default();
        record.last_success = Some(now);
        record.last_error = None;
    }

    pub fn failed(&self, action: &str, error: &str) {
        let mut record = self.records.entry(action.to_string()).or_default();
        record.failures += 1;
        record.last_error = Some(error.to_string());
    }

    pub fn get(&self, action: &str) -> Option<RunRecord> {
        self.records.get(action).map(|r| r.clone())
    }

    /// All records sorted by action name
    pub fn snapshot(&self) -> Vec<(String, RunRecord)> {
        let mut records: Vec<(String, RunRecord)> = self
            .records
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_bookkeeping() {
        let log = SyncRunLog::new();
        log.started("coins_list", 10);
        log.failed("coins_list", "provider down");
        log.started("coins_list", 20);
        log.succeeded("coins_list", 21);

        let record = log.get("coins_list").unwrap();
        assert_eq!(record.runs, 2);
        assert_eq!(record.failures, 1);
        assert_eq!(record.last_success, Some(21));
        assert_eq!(record.last_error, None);
        assert!(log.get("trending").is_none());
    }
}
