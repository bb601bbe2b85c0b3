//! Scripted simulations against the nullable collaborators.
//!
//! A scenario file is JSON: starting balances, scripted classifier answers,
//! and a list of steps. Each step prints one JSON line with its result or
//! its error, so a run can be diffed against an expected transcript.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use fradium_engine::{Collaborators, EngineConfig, EngineError, TrustEngine};
use fradium_nullables::{
    NullClassifier, NullClock, NullHistoryStore, NullReportStore, NullStakeLedger,
};
use fradium_store::StoreError;
use fradium_trust::ClassifierError;
use fradium_types::{
    Chain, ChainAddress, Clock, PrincipalId, ReportId, ReportPayload, VoteChoice,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Simulated wall-clock start, in seconds since the epoch.
    #[serde(default)]
    pub start_secs: u64,
    /// Free balance (raw units) per principal.
    #[serde(default)]
    pub balances: BTreeMap<String, u128>,
    #[serde(default)]
    pub classifier: ClassifierScript,
    pub steps: Vec<Step>,
}

/// Classifier answers: `true` means ransomware. Addresses without an answer
/// get `default`; a missing default means the classifier is unavailable.
#[derive(Debug, Default, Deserialize)]
pub struct ClassifierScript {
    #[serde(default)]
    pub default: Option<bool>,
    #[serde(default)]
    pub answers: BTreeMap<String, bool>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    CreateReport {
        reporter: String,
        address: String,
        #[serde(default = "unknown_chain")]
        chain: Chain,
        category: String,
        description: String,
        #[serde(default)]
        evidence: Vec<String>,
        #[serde(default)]
        reference_url: Option<String>,
        stake: u128,
    },
    CastVote {
        report: u64,
        voter: String,
        choice: VoteChoice,
        weight: u128,
    },
    Advance {
        secs: u64,
    },
    Verdict {
        address: String,
        /// Record the verdict in this principal's analysis history.
        #[serde(default)]
        principal: Option<String>,
    },
    Settle {
        report: u64,
        principal: String,
    },
    Report {
        report: u64,
    },
}

fn unknown_chain() -> Chain {
    Chain::Unknown
}

impl Step {
    fn name(&self) -> &'static str {
        match self {
            Step::CreateReport { .. } => "create_report",
            Step::CastVote { .. } => "cast_vote",
            Step::Advance { .. } => "advance",
            Step::Verdict { .. } => "verdict",
            Step::Settle { .. } => "settle",
            Step::Report { .. } => "report",
        }
    }
}

impl Scenario {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing scenario {}", path.display()))
    }
}

type SimEngine = TrustEngine<NullStakeLedger, NullClassifier>;

struct Simulation {
    engine: SimEngine,
    clock: Arc<NullClock>,
}

impl Simulation {
    fn new(scenario: &Scenario, config: &EngineConfig) -> anyhow::Result<Self> {
        let clock = Arc::new(NullClock::new(scenario.start_secs));

        let ledger = Arc::new(NullStakeLedger::new());
        for (name, amount) in &scenario.balances {
            ledger.fund(&PrincipalId::new(name.as_str())?, *amount);
        }

        let classifier = Arc::new(NullClassifier::new());
        if let Some(is_ransomware) = scenario.classifier.default {
            classifier.set_default(Ok(NullClassifier::verdict(is_ransomware)));
        } else {
            classifier.set_default(Err(ClassifierError::Unavailable(
                "no classifier in this scenario".into(),
            )));
        }
        for (address, is_ransomware) in &scenario.classifier.answers {
            classifier.answer(&ChainAddress::new(address)?, *is_ransomware);
        }

        let engine = TrustEngine::with_config(
            config,
            Collaborators {
                store: Arc::new(NullReportStore::new()),
                history: Arc::new(NullHistoryStore::new()),
                ledger,
                classifier,
                clock: clock.clone(),
            },
        )?;
        Ok(Self { engine, clock })
    }

    async fn apply(&self, step: Step) -> Result<Value, EngineError> {
        match step {
            Step::CreateReport {
                reporter,
                address,
                chain,
                category,
                description,
                evidence,
                reference_url,
                stake,
            } => {
                let payload = ReportPayload {
                    chain,
                    address: ChainAddress::new(address)?,
                    category,
                    description,
                    evidence_refs: evidence,
                    reference_url,
                };
                let id = self
                    .engine
                    .create_report(PrincipalId::new(reporter)?, payload, stake)
                    .await?;
                Ok(json!({ "report": id }))
            }
            Step::CastVote {
                report,
                voter,
                choice,
                weight,
            } => {
                let tally = self
                    .engine
                    .cast_vote(ReportId::new(report), PrincipalId::new(voter)?, choice, weight)
                    .await?;
                to_json(&tally)
            }
            Step::Advance { secs } => {
                self.clock.advance(secs);
                Ok(json!({ "now_ms": self.clock.now().as_millis() }))
            }
            Step::Verdict { address, principal } => {
                let address = ChainAddress::new(address)?;
                let verdict = match principal {
                    Some(p) => {
                        self.engine
                            .get_verdict_for(&PrincipalId::new(p)?, &address)
                            .await?
                    }
                    None => self.engine.get_verdict(&address).await?,
                };
                to_json(&verdict)
            }
            Step::Settle { report, principal } => {
                let payout = self
                    .engine
                    .settle(ReportId::new(report), PrincipalId::new(principal)?)
                    .await?;
                to_json(&payout)
            }
            Step::Report { report } => to_json(&self.engine.get_report(ReportId::new(report))?),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, EngineError> {
    serde_json::to_value(value)
        .map_err(|e| StoreError::Serialization(e.to_string()).into())
}

/// Run every step of `scenario`, writing one JSON line per step to `out`.
///
/// Step failures are part of the transcript, not errors of the run.
pub async fn run(
    scenario: Scenario,
    config: &EngineConfig,
    out: &mut impl Write,
) -> anyhow::Result<SimEngineHandle> {
    let sim = Simulation::new(&scenario, config)?;

    for (index, step) in scenario.steps.into_iter().enumerate() {
        let op = step.name();
        let line = match sim.apply(step).await {
            Ok(result) => json!({ "step": index, "op": op, "ok": result }),
            Err(e) => {
                tracing::debug!(step = index, op, error = %e, "step failed");
                json!({
                    "step": index,
                    "op": op,
                    "error": e.to_string(),
                    "kind": format!("{:?}", e.kind()),
                })
            }
        };
        writeln!(out, "{line}")?;
    }
    Ok(SimEngineHandle(sim.engine))
}

/// The engine after a run, kept for its metrics.
pub struct SimEngineHandle(SimEngine);

impl SimEngineHandle {
    pub fn metrics_text(&self) -> anyhow::Result<String> {
        Ok(self.0.metrics().encode()?)
    }
}
