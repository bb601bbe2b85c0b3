//! The trust engine facade.
//!
//! `TrustEngine` owns no report state of its own. Every operation loads a
//! snapshot from the report store, applies the community rules, talks to the
//! stake ledger or the classifier, and writes the result back. Writes on one
//! report are serialized by a per-report lock; report creation is serialized
//! per address. Reads take no lock.

use std::sync::Arc;

use fradium_community::{Payout, ReportLifecycle, Verdict, VoteTally};
use fradium_store::{
    AnalysisHistoryStore, AnalysisRecord, AnalysisSource, ReportStore, StakeLedger, StoreError,
};
use fradium_trust::{
    Classification, Classifier, ClassifierError, TrustError, TrustReconciler, TrustVerdict,
};
use fradium_types::{
    ChainAddress, Clock, EngineParams, PrincipalId, Report, ReportId, ReportPayload, Vote,
    VoteChoice,
};
use prometheus::Histogram;
use tokio::time::Instant;
use tracing::Instrument;

use crate::config::EngineConfig;
use crate::locks::KeyedLocks;
use crate::metrics::EngineMetrics;
use crate::spans;
use crate::views::{MyReport, MyVote, ReportView};
use crate::EngineError;

/// Everything the engine talks to.
pub struct Collaborators<L, C> {
    pub store: Arc<dyn ReportStore>,
    pub history: Arc<dyn AnalysisHistoryStore>,
    pub ledger: Arc<L>,
    pub classifier: Arc<C>,
    pub clock: Arc<dyn Clock>,
}

pub struct TrustEngine<L, C> {
    store: Arc<dyn ReportStore>,
    history: Arc<dyn AnalysisHistoryStore>,
    ledger: Arc<L>,
    classifier: Arc<C>,
    clock: Arc<dyn Clock>,
    lifecycle: ReportLifecycle,
    reconciler: TrustReconciler,
    report_locks: KeyedLocks<ReportId>,
    address_locks: KeyedLocks<ChainAddress>,
    metrics: Arc<EngineMetrics>,
}

impl<L: StakeLedger, C: Classifier> TrustEngine<L, C> {
    pub fn new(params: EngineParams, collaborators: Collaborators<L, C>) -> Result<Self, EngineError> {
        Self::with_config(
            &EngineConfig {
                params,
                ..EngineConfig::default()
            },
            collaborators,
        )
    }

    pub fn with_config(
        config: &EngineConfig,
        collaborators: Collaborators<L, C>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let params = config.params.clone();
        Ok(Self {
            store: collaborators.store,
            history: collaborators.history,
            ledger: collaborators.ledger,
            classifier: collaborators.classifier,
            clock: collaborators.clock,
            reconciler: TrustReconciler::from_params(&params),
            lifecycle: ReportLifecycle::new(params),
            report_locks: KeyedLocks::new(config.lock_cleanup_threshold),
            address_locks: KeyedLocks::new(config.lock_cleanup_threshold),
            metrics: Arc::new(EngineMetrics::new()),
        })
    }

    pub fn params(&self) -> &EngineParams {
        self.lifecycle.params()
    }

    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    /// Drop idle per-key lock entries.
    pub async fn cleanup_locks(&self) {
        self.report_locks.cleanup().await;
        self.address_locks.cleanup().await;
    }

    // ── Writes ──────────────────────────────────────────────────────────

    /// Open a report against an address, reserving the reporter's stake.
    pub async fn create_report(
        &self,
        reporter: PrincipalId,
        payload: ReportPayload,
        stake_amount: u128,
    ) -> Result<ReportId, EngineError> {
        let span = spans::create_report_span(&reporter, &payload.address);
        self.create_report_inner(reporter, payload, stake_amount)
            .instrument(span)
            .await
    }

    async fn create_report_inner(
        &self,
        reporter: PrincipalId,
        payload: ReportPayload,
        stake_amount: u128,
    ) -> Result<ReportId, EngineError> {
        let payload = self.lifecycle.validate_new(payload, stake_amount)?;
        let _guard = self.address_locks.lock(&payload.address).await;

        let now = self.clock.now();
        // A community Unsafe verdict stays the latest report for its address,
        // so a fresh report can never shadow it.
        if let Some(existing) = self.store.find_active_report(&payload.address)? {
            match self.lifecycle.resolve(&existing, now).verdict {
                Verdict::Pending => {
                    return Err(EngineError::ReportAlreadyOpen {
                        address: payload.address,
                        open: existing.id,
                    })
                }
                Verdict::Unsafe => {
                    return Err(EngineError::AddressFlaggedUnsafe {
                        address: payload.address,
                        report: existing.id,
                    })
                }
                Verdict::Safe | Verdict::Unresolved => {}
            }
        }

        self.ledger.reserve(&reporter, stake_amount).await?;

        let persisted = self.store.next_report_id().and_then(|id| {
            let report = self
                .lifecycle
                .open(id, reporter.clone(), payload, stake_amount, now);
            self.store.persist(&report).map(|()| report)
        });
        let report = match persisted {
            Ok(report) => report,
            Err(e) => {
                return Err(self
                    .release_after_failure(&reporter, stake_amount, e.into())
                    .await)
            }
        };

        self.metrics.reports_created.inc();
        tracing::info!(
            report = %report.id,
            chain = %report.payload.chain,
            stake = %stake_amount,
            deadline_ms = report.vote_deadline.as_millis(),
            "report created"
        );
        Ok(report.id)
    }

    /// Cast a stake-weighted vote, reserving `weight` from the voter's balance.
    pub async fn cast_vote(
        &self,
        report_id: ReportId,
        voter: PrincipalId,
        choice: VoteChoice,
        weight: u128,
    ) -> Result<VoteTally, EngineError> {
        let span = spans::cast_vote_span(report_id, &voter);
        let result = self
            .cast_vote_inner(report_id, voter, choice, weight)
            .instrument(span)
            .await;
        match &result {
            Ok(_) => self.metrics.votes_cast.inc(),
            Err(_) => self.metrics.votes_rejected.inc(),
        }
        result
    }

    async fn cast_vote_inner(
        &self,
        report_id: ReportId,
        voter: PrincipalId,
        choice: VoteChoice,
        weight: u128,
    ) -> Result<VoteTally, EngineError> {
        let _guard = self.report_locks.lock(&report_id).await;
        let mut report = self.load(report_id)?;
        let now = self.clock.now();

        self.lifecycle.check_vote(&report, &voter, weight, now)?;
        self.ledger.reserve(&voter, weight).await?;

        let recorded = self
            .lifecycle
            .cast_vote(&mut report, voter.clone(), choice, weight, now)
            .map_err(EngineError::from)
            .and_then(|tally| {
                let vote = Vote {
                    voter: voter.clone(),
                    choice,
                    weight,
                    cast_at: now,
                };
                self.store.append_vote(report_id, &vote)?;
                Ok(tally)
            });

        match recorded {
            Ok(tally) => Ok(tally),
            Err(e) => Err(self.release_after_failure(&voter, weight, e).await),
        }
    }

    /// Return `principal`'s stake on a finalized report, plus any reward.
    ///
    /// Either the ledger transfers and the recorded settlement both happen,
    /// or the report stays unsettled for this principal and may be retried.
    pub async fn settle(
        &self,
        report_id: ReportId,
        principal: PrincipalId,
    ) -> Result<Payout, EngineError> {
        let span = spans::settle_span(report_id, &principal);
        self.settle_inner(report_id, principal).instrument(span).await
    }

    async fn settle_inner(
        &self,
        report_id: ReportId,
        principal: PrincipalId,
    ) -> Result<Payout, EngineError> {
        let _guard = self.report_locks.lock(&report_id).await;
        let mut report = self.load(report_id)?;
        let now = self.clock.now();

        let payout = self.lifecycle.payout(&report, &principal, now)?;

        if payout.stake_returned > 0 {
            self.ledger
                .release(&principal, payout.stake_returned)
                .await?;
        }

        if payout.reward_paid > 0 {
            if let Err(e) = self.ledger.reward(&principal, payout.reward_paid).await {
                self.metrics.settlement_rollbacks.inc();
                tracing::warn!(
                    error = %e,
                    stake = %payout.stake_returned,
                    "reward transfer failed, re-reserving released stake"
                );
                return Err(self.rereserve_after_failure(&payout, e.into()).await);
            }
        }

        self.lifecycle.settle(&mut report, &payout, now);
        if let Err(e) = self.store.persist(&report) {
            // The transfers went through but the report does not say so.
            tracing::error!(error = %e, "settlement transferred funds but was not persisted");
            return Err(EngineError::LedgerInconsistent {
                principal,
                amount: payout.stake_returned.saturating_add(payout.reward_paid),
                detail: format!("settlement not persisted: {e}"),
            });
        }

        self.metrics.settlements.inc();
        tracing::info!(
            role = ?payout.role,
            stake_returned = %payout.stake_returned,
            reward_paid = %payout.reward_paid,
            "settled"
        );
        Ok(payout)
    }

    // ── Trust verdicts ──────────────────────────────────────────────────

    /// Decide whether `address` is safe, combining the community verdict
    /// with the AI classifier.
    pub async fn get_verdict(&self, address: &ChainAddress) -> Result<TrustVerdict, EngineError> {
        let span = spans::evaluate_span(address);
        let classifier = TimedClassifier {
            inner: self.classifier.as_ref(),
            metrics: &self.metrics,
        };
        let result = self
            .reconciler
            .evaluate(address, self.store.as_ref(), &classifier, self.clock.now())
            .instrument(span)
            .await;

        match &result {
            Ok(verdict) => {
                self.metrics
                    .verdicts
                    .with_label_values(&[verdict.provenance.as_str()])
                    .inc();
                if verdict.ai.is_unavailable() {
                    self.metrics.classifier_unavailable.inc();
                }
            }
            Err(TrustError::NoSignalAvailable(_)) => self.metrics.classifier_unavailable.inc(),
            Err(_) => {}
        }
        Ok(result?)
    }

    /// [`get_verdict`](Self::get_verdict), recorded in `principal`'s analysis history.
    pub async fn get_verdict_for(
        &self,
        principal: &PrincipalId,
        address: &ChainAddress,
    ) -> Result<TrustVerdict, EngineError> {
        let verdict = self.get_verdict(address).await?;

        let source = if verdict.source_report_id.is_some() {
            AnalysisSource::CommunityVote
        } else {
            AnalysisSource::AiAnalysis
        };
        let metadata = serde_json::to_string(&verdict)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.history.append(&AnalysisRecord {
            principal: principal.clone(),
            address: address.clone(),
            chain: address.detect_chain(),
            is_safe: verdict.is_safe,
            source,
            metadata,
            created_at: self.clock.now(),
        })?;
        Ok(verdict)
    }

    pub fn analysis_history(
        &self,
        principal: &PrincipalId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<AnalysisRecord>, EngineError> {
        Ok(self.history.page(principal, offset, limit)?)
    }

    pub fn analysis_history_count(&self, principal: &PrincipalId) -> Result<u64, EngineError> {
        Ok(self.history.count(principal)?)
    }

    // ── Report queries ──────────────────────────────────────────────────

    pub fn get_report(&self, report_id: ReportId) -> Result<ReportView, EngineError> {
        let report = self.load(report_id)?;
        Ok(self.view(report))
    }

    /// Every report, newest first.
    pub fn list_reports(&self) -> Result<Vec<ReportView>, EngineError> {
        let reports = self.store.iter_reports()?;
        Ok(self.views_newest_first(reports))
    }

    /// Reports opened by `principal`, newest first.
    pub fn my_reports(&self, principal: &PrincipalId) -> Result<Vec<MyReport>, EngineError> {
        let now = self.clock.now();
        let reports = self.store.reports_by_reporter(principal)?;
        Ok(self
            .views_newest_first(reports)
            .into_iter()
            .map(|view| MyReport {
                claimable: self.lifecycle.payout(&view.report, principal, now).ok(),
                settlement: view.report.settlement_of(principal).cloned(),
                view,
            })
            .collect())
    }

    /// Votes cast by `principal`, newest report first.
    pub fn my_votes(&self, principal: &PrincipalId) -> Result<Vec<MyVote>, EngineError> {
        let now = self.clock.now();
        let mut reports = self.store.reports_voted_by(principal)?;
        sort_newest_first(&mut reports);

        Ok(reports
            .iter()
            .filter_map(|report| {
                let vote = report.vote_of(principal)?;
                let resolution = self.lifecycle.resolve(report, now);
                Some(MyVote {
                    report_id: report.id,
                    address: report.address().clone(),
                    choice: vote.choice,
                    weight: vote.weight,
                    cast_at: vote.cast_at,
                    verdict: resolution.verdict,
                    voted_correctly: resolution.is_correct(vote),
                    claimable: self.lifecycle.payout(report, principal, now).ok(),
                    settlement: report.settlement_of(principal).cloned(),
                })
            })
            .collect())
    }

    // ── Helpers ─────────────────────────────────────────────────────────

    fn load(&self, report_id: ReportId) -> Result<Report, EngineError> {
        self.store.load_report(report_id).map_err(|e| match e {
            StoreError::NotFound(_) => EngineError::ReportNotFound(report_id),
            other => other.into(),
        })
    }

    fn view(&self, report: Report) -> ReportView {
        let now = self.clock.now();
        let resolution = self.lifecycle.resolve(&report, now);
        ReportView {
            tally: resolution.tally,
            verdict: resolution.verdict,
            status: self.lifecycle.status(&report, now),
            report,
        }
    }

    fn views_newest_first(&self, mut reports: Vec<Report>) -> Vec<ReportView> {
        sort_newest_first(&mut reports);
        reports.into_iter().map(|r| self.view(r)).collect()
    }

    /// Undo a reservation after a later step failed, returning the error to
    /// surface.
    async fn release_after_failure(
        &self,
        principal: &PrincipalId,
        amount: u128,
        cause: EngineError,
    ) -> EngineError {
        match self.ledger.release(principal, amount).await {
            Ok(()) => {
                tracing::warn!(error = %cause, amount = %amount, "released reservation after failure");
                cause
            }
            Err(e) => {
                tracing::error!(
                    error = %cause,
                    release_error = %e,
                    amount = %amount,
                    "could not release reservation after failure"
                );
                EngineError::LedgerInconsistent {
                    principal: principal.clone(),
                    amount,
                    detail: format!("{cause}; release failed: {e}"),
                }
            }
        }
    }

    /// Put a released stake back into reservation after the reward failed.
    async fn rereserve_after_failure(&self, payout: &Payout, cause: EngineError) -> EngineError {
        if payout.stake_returned == 0 {
            return cause;
        }
        match self
            .ledger
            .reserve(&payout.principal, payout.stake_returned)
            .await
        {
            Ok(()) => cause,
            Err(e) => {
                tracing::error!(
                    error = %cause,
                    reserve_error = %e,
                    stake = %payout.stake_returned,
                    "could not re-reserve stake after failed reward"
                );
                EngineError::LedgerInconsistent {
                    principal: payout.principal.clone(),
                    amount: payout.stake_returned,
                    detail: format!("{cause}; re-reserve failed: {e}"),
                }
            }
        }
    }
}

fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
}

/// Records classifier latency around every call the reconciler makes.
struct TimedClassifier<'a, C> {
    inner: &'a C,
    metrics: &'a EngineMetrics,
}

impl<C: Classifier> Classifier for TimedClassifier<'_, C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn classify(&self, address: &ChainAddress) -> Result<Classification, ClassifierError> {
        let _timer = LatencyTimer {
            histogram: &self.metrics.classifier_latency_ms,
            started: Instant::now(),
        };
        self.inner.classify(address).await
    }
}

/// Observes elapsed milliseconds when dropped, so calls cut short by the
/// classifier timeout are counted too.
struct LatencyTimer<'a> {
    histogram: &'a Histogram,
    started: Instant,
}

impl Drop for LatencyTimer<'_> {
    fn drop(&mut self) {
        self.histogram
            .observe(self.started.elapsed().as_secs_f64() * 1_000.0);
    }
}
