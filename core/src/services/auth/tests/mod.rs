//! Auth gateway tests
