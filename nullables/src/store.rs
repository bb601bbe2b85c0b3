//! Nullable stores: thread-safe in-memory report and history storage.

use fradium_store::{AnalysisHistoryStore, AnalysisRecord, ReportStore, StoreError};
use fradium_types::{ChainAddress, PrincipalId, Report, ReportId, Vote};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// An in-memory report store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullReportStore {
    reports: Mutex<HashMap<ReportId, Report>>,
    next_id: AtomicU64,
    fail_next_write: AtomicBool,
}

impl NullReportStore {
    pub fn new() -> Self {
        Self {
            reports: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            fail_next_write: AtomicBool::new(false),
        }
    }

    /// Make the next `persist` or `append_vote` fail with a backend error.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    pub fn report_count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".into()));
        }
        Ok(())
    }
}

impl Default for NullReportStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportStore for NullReportStore {
    fn next_report_id(&self) -> Result<ReportId, StoreError> {
        Ok(ReportId::new(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn persist(&self, report: &Report) -> Result<(), StoreError> {
        self.check_write()?;
        self.reports
            .lock()
            .unwrap()
            .insert(report.id, report.clone());
        Ok(())
    }

    fn load_report(&self, id: ReportId) -> Result<Report, StoreError> {
        self.reports
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn find_active_report(&self, address: &ChainAddress) -> Result<Option<Report>, StoreError> {
        Ok(self
            .reports
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.address() == address)
            .max_by_key(|r| (r.created_at, r.id))
            .cloned())
    }

    fn append_vote(&self, id: ReportId, vote: &Vote) -> Result<(), StoreError> {
        self.check_write()?;
        let mut reports = self.reports.lock().unwrap();
        let report = reports
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if report.vote_of(&vote.voter).is_some() {
            return Err(StoreError::Duplicate(vote.voter.to_string()));
        }
        report.votes.push(vote.clone());
        Ok(())
    }

    fn iter_reports(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.reports.lock().unwrap().values().cloned().collect())
    }
}

/// An in-memory analysis history for testing.
pub struct NullHistoryStore {
    records: Mutex<Vec<AnalysisRecord>>,
}

impl NullHistoryStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl Default for NullHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisHistoryStore for NullHistoryStore {
    fn append(&self, record: &AnalysisRecord) -> Result<(), StoreError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn page(
        &self,
        principal: &PrincipalId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AnalysisRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| &r.principal == principal)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count(&self, principal: &PrincipalId) -> Result<u64, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| &r.principal == principal)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fradium_store::AnalysisSource;
    use fradium_types::{Chain, ReportPayload, Timestamp, VoteChoice};
    use std::time::Duration;

    fn principal(name: &str) -> PrincipalId {
        PrincipalId::new(name).unwrap()
    }

    fn report(id: u64, address: &str, created_secs: u64) -> Report {
        let payload = ReportPayload {
            chain: Chain::Unknown,
            address: ChainAddress::new(address).unwrap(),
            category: "scam".into(),
            description: "test".into(),
            evidence_refs: vec![],
            reference_url: None,
        };
        Report::new(
            ReportId::new(id),
            principal("reporter"),
            payload,
            1,
            Timestamp::from_secs(created_secs),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn ids_are_sequential() {
        let store = NullReportStore::new();
        assert_eq!(store.next_report_id().unwrap(), ReportId::new(1));
        assert_eq!(store.next_report_id().unwrap(), ReportId::new(2));
    }

    #[test]
    fn active_report_is_the_latest_for_the_address() {
        let store = NullReportStore::new();
        store.persist(&report(1, "addr-a", 5)).unwrap();
        store.persist(&report(2, "addr-a", 50)).unwrap();
        store.persist(&report(3, "addr-b", 99)).unwrap();

        let active = store
            .find_active_report(&ChainAddress::new("addr-a").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(active.id, ReportId::new(2));
        assert!(store
            .find_active_report(&ChainAddress::new("addr-c").unwrap())
            .unwrap()
            .is_none());
    }

    #[test]
    fn append_vote_rejects_duplicates() {
        let store = NullReportStore::new();
        store.persist(&report(1, "addr-a", 0)).unwrap();
        let vote = Vote {
            voter: principal("v1"),
            choice: VoteChoice::Safe,
            weight: 3,
            cast_at: Timestamp::from_secs(1),
        };
        store.append_vote(ReportId::new(1), &vote).unwrap();
        assert!(matches!(
            store.append_vote(ReportId::new(1), &vote),
            Err(StoreError::Duplicate(_))
        ));
        assert_eq!(store.load_report(ReportId::new(1)).unwrap().votes.len(), 1);
    }

    #[test]
    fn injected_failure_hits_one_write() {
        let store = NullReportStore::new();
        store.fail_next_write();
        assert!(store.persist(&report(1, "addr-a", 0)).is_err());
        assert!(store.persist(&report(1, "addr-a", 0)).is_ok());
    }

    #[test]
    fn history_pages_newest_first() {
        let history = NullHistoryStore::new();
        for i in 0..5u64 {
            history
                .append(&AnalysisRecord {
                    principal: principal("alice"),
                    address: ChainAddress::new(format!("addr-{i}")).unwrap(),
                    chain: Chain::Unknown,
                    is_safe: true,
                    source: AnalysisSource::AiAnalysis,
                    metadata: "{}".into(),
                    created_at: Timestamp::from_secs(i),
                })
                .unwrap();
        }
        let page = history.page(&principal("alice"), 1, 2).unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].address.as_str(), "addr-3");
        assert_eq!(page[1].address.as_str(), "addr-2");
        assert_eq!(history.count(&principal("alice")).unwrap(), 5);
        assert_eq!(history.count(&principal("bob")).unwrap(), 0);
    }
}
