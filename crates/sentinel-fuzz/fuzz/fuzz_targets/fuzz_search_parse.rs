#![no_main]

use libfuzzer_sys::fuzz_target;
use search_gateway::models::{SearchRequest, SearchResponse};

fuzz_target!(|data: &[u8]| {
    // Request bodies come straight off the wire; replies from the backend
    let _ = serde_json::from_slice::<SearchRequest>(data);
    if let Ok(response) = serde_json::from_slice::<SearchResponse>(data) {
        let _ = response.has_more();
    }
});
