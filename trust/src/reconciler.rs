//! Trust reconciler: merges the community verdict with the AI classifier.

use crate::classifier::{classify_with_timeout, Classifier};
use crate::error::TrustError;
use crate::verdict::{AiOutcome, Provenance, TrustVerdict};
use fradium_community::{ConsensusResolver, Verdict};
use fradium_store::ReportStore;
use fradium_types::{ChainAddress, EngineParams, ReportId, Timestamp};
use std::time::Duration;

/// The community side of an evaluation: which report, and how it resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommunityEvidence {
    pub report_id: ReportId,
    pub verdict: Verdict,
}

/// Combine both signals into one verdict.
///
/// This is the whole precedence policy; [`TrustReconciler::evaluate`] only
/// gathers the inputs.
pub fn combine(
    address: &ChainAddress,
    community: Option<CommunityEvidence>,
    ai: AiOutcome,
) -> Result<TrustVerdict, TrustError> {
    let Some(evidence) = community else {
        return match ai {
            AiOutcome::Classified(c) => Ok(TrustVerdict {
                is_safe: !c.is_ransomware,
                provenance: Provenance::AiOnly,
                source_report_id: None,
                community_verdict: None,
                ai: AiOutcome::Classified(c),
            }),
            AiOutcome::NotConsulted | AiOutcome::Unavailable(_) => {
                Err(TrustError::NoSignalAvailable(address.clone()))
            }
        };
    };

    let (is_safe, provenance) = if evidence.verdict.is_unsafe() {
        (false, Provenance::CommunityOnly)
    } else {
        match ai.classification() {
            Some(c) if c.is_ransomware => (false, Provenance::AiOverride),
            Some(_) => (true, Provenance::CommunityConfirmedByAi),
            None => (true, Provenance::CommunityOnly),
        }
    };

    Ok(TrustVerdict {
        is_safe,
        provenance,
        source_report_id: Some(evidence.report_id),
        community_verdict: Some(evidence.verdict),
        ai,
    })
}

/// Gathers the community and AI signals for an address and combines them.
#[derive(Clone, Copy, Debug)]
pub struct TrustReconciler {
    resolver: ConsensusResolver,
    classifier_timeout: Duration,
}

impl TrustReconciler {
    pub fn new(resolver: ConsensusResolver, classifier_timeout: Duration) -> Self {
        Self {
            resolver,
            classifier_timeout,
        }
    }

    pub fn from_params(params: &EngineParams) -> Self {
        Self::new(
            ConsensusResolver::from_params(params),
            params.classifier_timeout(),
        )
    }

    /// Evaluate `address` as of `now`.
    ///
    /// The classifier is skipped when the community verdict is already Unsafe.
    /// Classifier errors and timeouts are absorbed into [`AiOutcome::Unavailable`].
    pub async fn evaluate<C: Classifier>(
        &self,
        address: &ChainAddress,
        store: &dyn ReportStore,
        classifier: &C,
        now: Timestamp,
    ) -> Result<TrustVerdict, TrustError> {
        let community = store
            .find_active_report(address)?
            .map(|report| CommunityEvidence {
                report_id: report.id,
                verdict: self.resolver.resolve(&report, now).verdict,
            });

        let ai = match community {
            Some(evidence) if evidence.verdict.is_unsafe() => AiOutcome::NotConsulted,
            _ => self.consult(classifier, address).await,
        };

        let verdict = combine(address, community, ai)?;
        tracing::debug!(
            %address,
            is_safe = verdict.is_safe,
            provenance = verdict.provenance.as_str(),
            "trust verdict computed"
        );
        Ok(verdict)
    }

    async fn consult<C: Classifier>(&self, classifier: &C, address: &ChainAddress) -> AiOutcome {
        match classify_with_timeout(classifier, address, self.classifier_timeout).await {
            Ok(classification) => AiOutcome::Classified(classification),
            Err(e) => {
                tracing::warn!(
                    %address,
                    classifier = classifier.name(),
                    error = %e,
                    "classifier unavailable, falling back to community signal"
                );
                AiOutcome::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classification, ClassifierError};
    use fradium_store::StoreError;
    use fradium_types::{
        Chain, PrincipalId, Report, ReportPayload, Vote, VoteChoice,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn addr() -> ChainAddress {
        ChainAddress::new("0x6B175474E89094C44Da98b954EedeAC495271d0F").unwrap()
    }

    fn classified(is_ransomware: bool) -> AiOutcome {
        AiOutcome::Classified(Classification {
            is_ransomware,
            confidence: 0.8,
            ransomware_probability: if is_ransomware { 0.9 } else { 0.1 },
            transactions_analyzed: 40,
        })
    }

    fn evidence(verdict: Verdict) -> Option<CommunityEvidence> {
        Some(CommunityEvidence {
            report_id: ReportId::new(9),
            verdict,
        })
    }

    // ── combine: the full decision table ────────────────────────────────

    #[test]
    fn no_report_ai_decides() {
        let v = combine(&addr(), None, classified(true)).unwrap();
        assert!(!v.is_safe);
        assert_eq!(v.provenance, Provenance::AiOnly);
        assert_eq!(v.source_report_id, None);

        let v = combine(&addr(), None, classified(false)).unwrap();
        assert!(v.is_safe);
        assert_eq!(v.provenance, Provenance::AiOnly);
    }

    #[test]
    fn no_report_no_ai_is_no_signal() {
        for ai in [AiOutcome::Unavailable("down".into()), AiOutcome::NotConsulted] {
            let err = combine(&addr(), None, ai).unwrap_err();
            assert_eq!(err, TrustError::NoSignalAvailable(addr()));
        }
    }

    #[test]
    fn community_unsafe_is_never_downgraded() {
        for ai in [
            classified(false),
            classified(true),
            AiOutcome::Unavailable("down".into()),
            AiOutcome::NotConsulted,
        ] {
            let v = combine(&addr(), evidence(Verdict::Unsafe), ai).unwrap();
            assert!(!v.is_safe);
            assert_eq!(v.provenance, Provenance::CommunityOnly);
            assert_eq!(v.source_report_id, Some(ReportId::new(9)));
        }
    }

    #[test]
    fn ai_can_upgrade_any_non_unsafe_community_verdict() {
        for verdict in [Verdict::Safe, Verdict::Unresolved, Verdict::Pending] {
            let v = combine(&addr(), evidence(verdict), classified(true)).unwrap();
            assert!(!v.is_safe, "{verdict:?} must be overridden");
            assert_eq!(v.provenance, Provenance::AiOverride);
            assert_eq!(v.source_report_id, Some(ReportId::new(9)));
        }
    }

    #[test]
    fn ai_agreement_confirms_community() {
        for verdict in [Verdict::Safe, Verdict::Unresolved, Verdict::Pending] {
            let v = combine(&addr(), evidence(verdict), classified(false)).unwrap();
            assert!(v.is_safe);
            assert_eq!(v.provenance, Provenance::CommunityConfirmedByAi);
        }
    }

    #[test]
    fn ai_unavailable_falls_back_to_community() {
        for verdict in [Verdict::Safe, Verdict::Unresolved, Verdict::Pending] {
            let v = combine(
                &addr(),
                evidence(verdict),
                AiOutcome::Unavailable("timeout".into()),
            )
            .unwrap();
            assert!(v.is_safe);
            assert_eq!(v.provenance, Provenance::CommunityOnly);
            assert!(v.ai.is_unavailable());
        }
    }

    // ── evaluate: signal gathering ──────────────────────────────────────

    struct OneReportStore(Option<Report>);

    impl ReportStore for OneReportStore {
        fn next_report_id(&self) -> Result<ReportId, StoreError> {
            Ok(ReportId::new(1))
        }
        fn persist(&self, _report: &Report) -> Result<(), StoreError> {
            Ok(())
        }
        fn load_report(&self, id: ReportId) -> Result<Report, StoreError> {
            self.0.clone().ok_or_else(|| StoreError::NotFound(id.to_string()))
        }
        fn find_active_report(&self, _address: &ChainAddress) -> Result<Option<Report>, StoreError> {
            Ok(self.0.clone())
        }
        fn append_vote(&self, _id: ReportId, _vote: &Vote) -> Result<(), StoreError> {
            Ok(())
        }
        fn iter_reports(&self) -> Result<Vec<Report>, StoreError> {
            Ok(self.0.iter().cloned().collect())
        }
    }

    struct CountingClassifier {
        answer: Mutex<Result<Classification, ClassifierError>>,
        calls: AtomicU32,
    }

    impl CountingClassifier {
        fn new(answer: Result<Classification, ClassifierError>) -> Self {
            Self {
                answer: Mutex::new(answer),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl Classifier for CountingClassifier {
        fn name(&self) -> &str {
            "counting"
        }

        async fn classify(&self, _address: &ChainAddress) -> Result<Classification, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.lock().unwrap().clone()
        }
    }

    fn unsafe_report() -> Report {
        let payload = ReportPayload {
            chain: Chain::Ethereum,
            address: addr(),
            category: "phishing".into(),
            description: "drainer".into(),
            evidence_refs: vec![],
            reference_url: None,
        };
        let mut report = Report::new(
            ReportId::new(4),
            PrincipalId::new("reporter").unwrap(),
            payload,
            100,
            Timestamp::from_secs(0),
            Duration::from_secs(10),
        );
        report.votes.push(Vote {
            voter: PrincipalId::new("v1").unwrap(),
            choice: VoteChoice::Unsafe,
            weight: 30,
            cast_at: Timestamp::from_secs(1),
        });
        report
    }

    fn reconciler() -> TrustReconciler {
        TrustReconciler::new(ConsensusResolver::new(1), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn unsafe_community_skips_classifier() {
        let store = OneReportStore(Some(unsafe_report()));
        let classifier = CountingClassifier::new(Ok(Classification {
            is_ransomware: false,
            confidence: 0.99,
            ransomware_probability: 0.01,
            transactions_analyzed: 3,
        }));

        let v = reconciler()
            .evaluate(&addr(), &store, &classifier, Timestamp::from_secs(20))
            .await
            .unwrap();

        assert!(!v.is_safe);
        assert_eq!(v.provenance, Provenance::CommunityOnly);
        assert_eq!(v.ai, AiOutcome::NotConsulted);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pending_report_asks_classifier() {
        let store = OneReportStore(Some(unsafe_report()));
        let classifier =
            CountingClassifier::new(Err(ClassifierError::Unavailable("offline".into())));

        let v = reconciler()
            .evaluate(&addr(), &store, &classifier, Timestamp::from_secs(5))
            .await
            .unwrap();

        assert!(v.is_safe);
        assert_eq!(v.community_verdict, Some(Verdict::Pending));
        assert_eq!(v.provenance, Provenance::CommunityOnly);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_report_and_classifier_down_is_an_error() {
        let store = OneReportStore(None);
        let classifier =
            CountingClassifier::new(Err(ClassifierError::Unavailable("offline".into())));

        let err = reconciler()
            .evaluate(&addr(), &store, &classifier, Timestamp::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, TrustError::NoSignalAvailable(_)));
    }
}
