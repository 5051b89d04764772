//! Property-based tests for fingerprints and naming

mod fingerprint_stability;
