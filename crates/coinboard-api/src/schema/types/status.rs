use async_graphql::SimpleObject;
use coinboard_store::RunRecord;

/// Run bookkeeping of one sync action since process start
#[derive(Debug, Clone, SimpleObject)]
pub struct GqlSyncStatus {
    pub action: String,
    pub runs: i64,
    pub failures: i64,
    pub last_started: Option<i64>,
    pub last_success: Option<i64>,
    pub last_error: Option<String>,
}

impl From<(String, RunRecord)> for GqlSyncStatus {
    fn from((action, record): (String, RunRecord)) -> Self {
        Self {
            action,
            runs: record.runs as i64,
            failures: record.failures as i64,
            last_started: record.last_started,
            last_success: record.last_success,
            last_error: record.last_error,
        }
    }
}
