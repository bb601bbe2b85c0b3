//! Shared wiring for the engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use fradium_engine::{Collaborators, TrustEngine};
use fradium_nullables::{
    NullClassifier, NullClock, NullHistoryStore, NullReportStore, NullStakeLedger,
};
use fradium_types::{Chain, ChainAddress, EngineParams, PrincipalId, ReportPayload};

pub const ADDRESS: &str = "0x6B175474E89094C44Da98b954EedeAC495271d0F";
pub const WINDOW_SECS: u64 = 60;

pub type Engine = TrustEngine<NullStakeLedger, NullClassifier>;

pub struct Harness {
    pub engine: Arc<Engine>,
    pub store: Arc<NullReportStore>,
    pub history: Arc<NullHistoryStore>,
    pub ledger: Arc<NullStakeLedger>,
    pub classifier: Arc<NullClassifier>,
    pub clock: Arc<NullClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_params(params())
    }

    pub fn with_params(params: EngineParams) -> Self {
        let store = Arc::new(NullReportStore::new());
        let history = Arc::new(NullHistoryStore::new());
        let ledger = Arc::new(NullStakeLedger::new());
        let classifier = Arc::new(NullClassifier::benign());
        let clock = Arc::new(NullClock::new(1_000));

        let engine = TrustEngine::new(
            params,
            Collaborators {
                store: store.clone(),
                history: history.clone(),
                ledger: ledger.clone(),
                classifier: classifier.clone(),
                clock: clock.clone(),
            },
        )
        .expect("valid params");

        Self {
            engine: Arc::new(engine),
            store,
            history,
            ledger,
            classifier,
            clock,
        }
    }

    /// Fund each principal with `amount`.
    pub fn fund(&self, names: &[&str], amount: u128) {
        for name in names {
            self.ledger.fund(&principal(name), amount);
        }
    }

    /// Move past the voting deadline of every report created so far.
    pub fn close_voting(&self) {
        self.clock.advance(WINDOW_SECS);
    }
}

pub fn params() -> EngineParams {
    EngineParams {
        vote_window_secs: WINDOW_SECS,
        ..EngineParams::dev_defaults()
    }
}

pub fn principal(name: &str) -> PrincipalId {
    PrincipalId::new(name).unwrap()
}

pub fn address() -> ChainAddress {
    ChainAddress::new(ADDRESS).unwrap()
}

pub fn payload(address: &str) -> ReportPayload {
    ReportPayload {
        chain: Chain::Unknown,
        address: ChainAddress::new(address).unwrap(),
        category: "ransomware".into(),
        description: "payments from a known ransomware wallet cluster".into(),
        evidence_refs: vec!["tx:0xabc".into()],
        reference_url: None,
    }
}
