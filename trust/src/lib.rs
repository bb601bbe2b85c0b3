//! Trust reconciliation.
//!
//! Two independent signals describe an address: the community verdict on the
//! latest report against it, and an AI ransomware classifier. The reconciler
//! reduces them to one [`TrustVerdict`] with a provenance tag:
//!
//! - A community **Unsafe** verdict is final; the classifier is not consulted.
//! - Any other community state is provisional; the classifier may upgrade it
//!   to unsafe (`AiOverride`) but never the reverse.
//! - With no report, the classifier alone decides (`AiOnly`). With no report and
//!   no classifier answer there is no signal, which is an error, never "safe".

pub mod classifier;
pub mod error;
pub mod reconciler;
pub mod verdict;

pub use classifier::{classify_with_timeout, Classification, Classifier, ClassifierError};
pub use error::TrustError;
pub use reconciler::{combine, CommunityEvidence, TrustReconciler};
pub use verdict::{AiOutcome, Provenance, TrustVerdict};
