//! Approval gate in front of every language-model extraction
//!
//! Before document content is sent for extraction the gate is shown the
//! cost estimate and a content fingerprint. The fingerprint is a truncated
//! SHA-256 of the text; it identifies the document in logs without
//! disclosing it.

use crate::estimate::TokenEstimate;
use sha2::{Digest, Sha256};

/// Hex characters kept from the content hash
pub const FINGERPRINT_HEX_CHARS: usize = 16;

/// Truncated SHA-256 of the content, as lowercase hex
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_HEX_CHARS);
    hex
}

/// What the operator is asked to approve
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalRequest {
    /// Name of the file about to be sent
    pub file_name: String,

    /// Content fingerprint
    pub fingerprint: String,

    /// Token counts and cost
    pub estimate: TokenEstimate,
}

impl ApprovalRequest {
    /// Human-readable summary for prompts
    pub fn summary(&self) -> String {
        format!(
            "File: {}\nFingerprint: {}\nModel: {}\nChunks: {}\nInput tokens: {}\nEstimated output tokens: {}\nEstimated cost: ${:.4}",
            self.file_name,
            self.fingerprint,
            self.estimate.model,
            self.estimate.chunk_count,
            self.estimate.input_tokens,
            self.estimate.estimated_output_tokens,
            self.estimate.estimated_cost_usd
        )
    }
}

/// Decides whether an extraction may proceed
pub trait ApprovalGate {
    /// Return `true` to send the document, `false` to decline
    fn approve(&self, request: &ApprovalRequest) -> bool;
}

/// Gate that refuses every request
///
/// Extractors start with this gate so that nothing is sent until a caller
/// installs an interactive gate or opts out with [`AutoApprove`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

impl ApprovalGate for AlwaysDecline {
    fn approve(&self, _request: &ApprovalRequest) -> bool {
        false
    }
}

/// Gate for non-interactive runs: approval is implicit
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

impl ApprovalGate for AutoApprove {
    fn approve(&self, _request: &ApprovalRequest) -> bool {
        true
    }
}

impl<F> ApprovalGate for F
where
    F: Fn(&ApprovalRequest) -> bool,
{
    fn approve(&self, request: &ApprovalRequest) -> bool {
        self(request)
    }
}
