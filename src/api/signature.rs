use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, warn};

/// Oldest request timestamp accepted, in seconds.
const MAX_REQUEST_AGE_SECS: u64 = 300;

fn signature_mac(signing_secret: &str, timestamp: &str, request_body: &str) -> Option<Hmac<Sha256>> {
    let mut mac = match Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return None;
        }
    };
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());
    Some(mac)
}

/// Checks Slack's `v0` request signature and rejects stale timestamps.
#[must_use]
pub fn verify_slack_signature(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
) -> bool {
    let Ok(ts) = timestamp.parse::<u64>() else {
        warn!("Unparseable request timestamp");
        return false;
    };
    let now_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    if now_secs.abs_diff(ts) > MAX_REQUEST_AGE_SECS {
        warn!("Timestamp out of range, potential replay attack");
        return false;
    }

    let Some(expected) = signature.strip_prefix("v0=").and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        warn!("Malformed X-Slack-Signature header");
        return false;
    };

    signature_mac(signing_secret, timestamp, request_body)
        .is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

/// Signature Slack would send for `request_body` at `timestamp`.
#[must_use]
pub fn compute_signature(timestamp: &str, request_body: &str, signing_secret: &str) -> String {
    signature_mac(signing_secret, timestamp, request_body)
        .map(|mac| format!("v0={}", hex::encode(mac.finalize().into_bytes())))
        .unwrap_or_default()
}
