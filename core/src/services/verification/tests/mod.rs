//! Verification engine tests
