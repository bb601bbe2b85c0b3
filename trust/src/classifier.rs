//! AI classifier contract.
//!
//! The engine does not know how the model works, only that it maps an
//! address to a ransomware judgement. Implementations might call a remote
//! inference service, a local ONNX model, or a fixed table in tests.

use fradium_types::{Chain, ChainAddress};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Result of classifying one address.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub is_ransomware: bool,
    /// Model confidence in its answer [0.0, 1.0].
    pub confidence: f64,
    /// Raw probability that the address belongs to ransomware [0.0, 1.0].
    pub ransomware_probability: f64,
    pub transactions_analyzed: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error("classifier does not support {0} addresses")]
    UnsupportedChain(Chain),

    #[error("classifier timed out after {0:?}")]
    TimedOut(Duration),
}

/// A pluggable ransomware classifier.
pub trait Classifier: Send + Sync {
    /// Human-readable name of this classifier.
    fn name(&self) -> &str;

    fn classify(
        &self,
        address: &ChainAddress,
    ) -> impl Future<Output = Result<Classification, ClassifierError>> + Send;
}

/// Classify `address`, giving up after `timeout`.
pub async fn classify_with_timeout<C: Classifier>(
    classifier: &C,
    address: &ChainAddress,
    timeout: Duration,
) -> Result<Classification, ClassifierError> {
    match tokio::time::timeout(timeout, classifier.classify(address)).await {
        Ok(result) => result,
        Err(_) => Err(ClassifierError::TimedOut(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowClassifier(Duration);

    impl Classifier for SlowClassifier {
        fn name(&self) -> &str {
            "slow"
        }

        async fn classify(&self, _address: &ChainAddress) -> Result<Classification, ClassifierError> {
            tokio::time::sleep(self.0).await;
            Ok(Classification {
                is_ransomware: false,
                confidence: 0.9,
                ransomware_probability: 0.1,
                transactions_analyzed: 12,
            })
        }
    }

    #[tokio::test]
    async fn answers_within_timeout_pass_through() {
        let addr = ChainAddress::new("0xabc").unwrap();
        let result = classify_with_timeout(
            &SlowClassifier(Duration::from_millis(1)),
            &addr,
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        assert!(!result.is_ransomware);
        assert_eq!(result.transactions_analyzed, 12);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_answers_time_out() {
        let addr = ChainAddress::new("0xabc").unwrap();
        let err = classify_with_timeout(
            &SlowClassifier(Duration::from_secs(60)),
            &addr,
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert_eq!(err, ClassifierError::TimedOut(Duration::from_millis(100)));
    }
}
