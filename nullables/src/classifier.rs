//! Nullable classifier: scripted answers per address.

use fradium_trust::{Classification, Classifier, ClassifierError};
use fradium_types::ChainAddress;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A classifier that answers from a table.
///
/// Addresses without a scripted answer get the default answer, which starts
/// out as "unavailable". An optional delay makes it useful for timeout tests.
pub struct NullClassifier {
    answers: Mutex<HashMap<ChainAddress, Result<Classification, ClassifierError>>>,
    default_answer: Mutex<Result<Classification, ClassifierError>>,
    delay: Mutex<Option<Duration>>,
    calls: AtomicU32,
}

impl NullClassifier {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            default_answer: Mutex::new(Err(ClassifierError::Unavailable(
                "no scripted answer".into(),
            ))),
            delay: Mutex::new(None),
            calls: AtomicU32::new(0),
        }
    }

    /// A classifier that says "not ransomware" for everything.
    pub fn benign() -> Self {
        let classifier = Self::new();
        classifier.set_default(Ok(Self::verdict(false)));
        classifier
    }

    /// A plausible classification with the given outcome.
    pub fn verdict(is_ransomware: bool) -> Classification {
        Classification {
            is_ransomware,
            confidence: 0.9,
            ransomware_probability: if is_ransomware { 0.9 } else { 0.1 },
            transactions_analyzed: 25,
        }
    }

    pub fn answer(&self, address: &ChainAddress, is_ransomware: bool) {
        self.script(address, Ok(Self::verdict(is_ransomware)));
    }

    pub fn script(&self, address: &ChainAddress, answer: Result<Classification, ClassifierError>) {
        self.answers.lock().unwrap().insert(address.clone(), answer);
    }

    pub fn set_default(&self, answer: Result<Classification, ClassifierError>) {
        *self.default_answer.lock().unwrap() = answer;
    }

    /// Sleep this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for NullClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for NullClassifier {
    fn name(&self) -> &str {
        "null"
    }

    async fn classify(&self, address: &ChainAddress) -> Result<Classification, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.answers.lock().unwrap().get(address).cloned();
        match scripted {
            Some(answer) => answer,
            None => self.default_answer.lock().unwrap().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_answers_win_over_default() {
        let classifier = NullClassifier::benign();
        let bad = ChainAddress::new("bc1qbad").unwrap();
        let good = ChainAddress::new("bc1qgood").unwrap();
        classifier.answer(&bad, true);

        assert!(classifier.classify(&bad).await.unwrap().is_ransomware);
        assert!(!classifier.classify(&good).await.unwrap().is_ransomware);
        assert_eq!(classifier.calls(), 2);
    }

    #[tokio::test]
    async fn unscripted_is_unavailable_by_default() {
        let classifier = NullClassifier::new();
        let err = classifier
            .classify(&ChainAddress::new("anything").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Unavailable(_)));
    }
}
