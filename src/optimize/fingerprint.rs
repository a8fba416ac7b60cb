// SHA-256 fingerprint of an optimization result
//
// Hashes exact IEEE-754 bit patterns, so two results share a fingerprint only
// when they are bit-for-bit identical (ranks, tie-break order and all values).

use sha2::{Digest, Sha256};

use super::service::OptimizationResult;

impl OptimizationResult {
    /// Hex-encoded SHA-256 over every ranked candidate
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();

        for condition in &self.conditions {
            hash_str(&mut hasher, &condition.condition_name);
            hasher.update((condition.n as u64).to_le_bytes());
            hasher.update(condition.total_candidates.to_le_bytes());
            hasher.update((condition.candidates.len() as u64).to_le_bytes());

            for candidate in &condition.candidates {
                hasher.update((candidate.rank as u64).to_le_bytes());
                hasher.update(candidate.enumeration_index.to_le_bytes());
                for pair in &candidate.mapping {
                    hash_str(&mut hasher, &pair.sample);
                    hash_str(&mut hasher, &pair.reference);
                }
                for value in candidate
                    .diffs
                    .iter()
                    .chain(&candidate.transformed)
                    .chain([&candidate.mean, &candidate.sd])
                {
                    hasher.update(value.to_bits().to_le_bytes());
                }
            }
        }

        for skipped in &self.skipped {
            hash_str(&mut hasher, &skipped.condition_name);
            hash_str(&mut hasher, &skipped.error.message);
        }

        hex::encode(hasher.finalize())
    }
}

/// Length-prefixed so adjacent strings cannot collide by shifting bytes
fn hash_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
