//! Fuzzing library for search-gateway.
//!
//! Targets cover decoding of client request bodies, backend replies and
//! OAuth token replies, none of which may panic on arbitrary input.
//!
//! # Usage
//!
//! ```bash
//! cd crates/sentinel-fuzz
//! cargo +nightly fuzz run fuzz_search_parse -- -max_total_time=60
//! ```

pub use search_gateway::models;
