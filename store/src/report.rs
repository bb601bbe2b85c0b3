//! Report storage trait.

use crate::StoreError;
use fradium_types::{ChainAddress, PrincipalId, Report, ReportId, Vote};

/// Trait for community report storage.
///
/// Implementations must hand out whole-report snapshots: a reader never
/// observes a report with a half-applied write.
pub trait ReportStore: Send + Sync {
    /// Allocate the identifier for a new report.
    fn next_report_id(&self) -> Result<ReportId, StoreError>;

    /// Insert or overwrite a report.
    fn persist(&self, report: &Report) -> Result<(), StoreError>;

    /// Load a report by id; `StoreError::NotFound` when absent.
    fn load_report(&self, id: ReportId) -> Result<Report, StoreError>;

    /// The most recently created report for `address`, if any.
    fn find_active_report(&self, address: &ChainAddress) -> Result<Option<Report>, StoreError>;

    /// Append a vote to a stored report.
    fn append_vote(&self, id: ReportId, vote: &Vote) -> Result<(), StoreError>;

    /// All reports, in no particular order.
    fn iter_reports(&self) -> Result<Vec<Report>, StoreError>;

    /// Reports created by `reporter`.
    fn reports_by_reporter(&self, reporter: &PrincipalId) -> Result<Vec<Report>, StoreError> {
        Ok(self
            .iter_reports()?
            .into_iter()
            .filter(|r| &r.reporter == reporter)
            .collect())
    }

    /// Reports on which `voter` has cast a vote.
    fn reports_voted_by(&self, voter: &PrincipalId) -> Result<Vec<Report>, StoreError> {
        Ok(self
            .iter_reports()?
            .into_iter()
            .filter(|r| r.vote_of(voter).is_some())
            .collect())
    }
}
