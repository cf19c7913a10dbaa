use cosmwasm_std::Uint256;
use sha2::{Digest, Sha256};

/// First drand round published strictly after `time_seconds`.
///
/// Round `r` is published at `genesis + (r - 1) * period`.
pub fn first_round_after(genesis_time: u64, period_seconds: u64, time_seconds: u64) -> u64 {
    if time_seconds < genesis_time {
        return 1;
    }
    (time_seconds - genesis_time) / period_seconds + 2
}

/// Expand one beacon into `num_words` words bound to a single request.
///
/// word[i] = sha256(randomness || request_id_be || i_be)
pub fn derive_random_words(randomness: &[u8], request_id: u64, num_words: u32) -> Vec<Uint256> {
    (0..num_words)
        .map(|i| {
            let mut hasher = Sha256::new();
            hasher.update(randomness);
            hasher.update(request_id.to_be_bytes());
            hasher.update(i.to_be_bytes());
            let digest: [u8; 32] = hasher.finalize().into();
            Uint256::from_be_bytes(digest)
        })
        .collect()
}
