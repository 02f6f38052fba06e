//! Test module for determinism, integration and property tests.
//!
//! This module exercises whole matches rather than single functions:
//! - **Determinism tests**: Verify same seed produces identical matches
//! - **Integration tests**: Concrete round scenarios through the full pipeline
//! - **Property tests**: proptest checks of health clamping, symmetry and heal exhaustion
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end round and match scenarios
//! - `properties.rs`: Randomised invariant checks
//! - `helpers.rs`: Test setup utilities and factory functions

mod helpers;
