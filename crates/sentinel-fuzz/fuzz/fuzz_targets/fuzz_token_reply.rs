#![no_main]

use libfuzzer_sys::fuzz_target;
use search_gateway::models::AccessTokenGrant;

fuzz_target!(|data: &[u8]| {
    // Provider replies may be JSON or form-encoded
    if let Ok(body) = std::str::from_utf8(data) {
        if let Ok(grant) = AccessTokenGrant::parse(body) {
            let _ = grant.into_token();
        }
    }
});
