#![no_main]

use libfuzzer_sys::fuzz_target;
use search_gateway::models::Submission;

fuzz_target!(|data: &[u8]| {
    if let Ok(submission) = serde_json::from_slice::<Submission>(data) {
        let _ = serde_json::to_vec(&submission);
    }
});
