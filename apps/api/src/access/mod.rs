// Access gate: a single shared access code, compared verbatim.

pub mod handlers;

/// Outcome of checking a submitted access code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDecision {
    pub allowed: bool,
}

/// Decides whether `submitted` unlocks the service.
///
/// An empty `configured` code disables the gate. Otherwise the strings must
/// match exactly: no trimming, no case folding.
pub fn verify(submitted: &str, configured: &str) -> AccessDecision {
    AccessDecision {
        allowed: configured.is_empty() || submitted == configured,
    }
}
