//! Cascade construction and lookup.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info};

use super::filter::LevelFilter;
use super::hashing::level_key;
use crate::domain::{CascadeError, SerializedCascade, SALT_LEN};
use crate::ports::CascadeBuilder;

/// Level ids are one byte.
pub const MAX_LEVELS: usize = u8::MAX as usize;

/// False positive rate of every level after the first.
const LEVEL_FPR: f64 = 0.5;

/// Builds salted, padded Bloom filter cascades.
///
/// The valid set is padded with random ids to `ceil(capacity)` and the
/// invalid set to twice that, so the published size reveals only the
/// capacity.
#[derive(Debug, Clone)]
pub struct BloomCascadeBuilder {
    max_levels: usize,
}

impl BloomCascadeBuilder {
    pub fn new() -> Self {
        Self {
            max_levels: MAX_LEVELS,
        }
    }

    /// Cap the number of levels (at most `MAX_LEVELS`).
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            max_levels: max_levels.clamp(1, MAX_LEVELS),
        }
    }
}

impl Default for BloomCascadeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn pad<R: Rng>(ids: &HashSet<String>, target: usize, rng: &mut R) -> Vec<String> {
    let mut padded: HashSet<String> = ids.clone();
    while padded.len() < target {
        padded.insert(hex::encode(rng.gen::<[u8; 32]>()));
    }
    padded.into_iter().collect()
}

impl CascadeBuilder for BloomCascadeBuilder {
    fn build(
        &self,
        valid: &HashSet<String>,
        invalid: &HashSet<String>,
        capacity: f64,
    ) -> Result<SerializedCascade, CascadeError> {
        let too_small = || CascadeError::CapacityTooSmall {
            valid: valid.len(),
            invalid: invalid.len(),
            capacity,
        };
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(too_small());
        }

        let r_hat = capacity.ceil() as usize;
        let s_hat = 2 * r_hat;
        if valid.len() > r_hat || invalid.len() > s_hat {
            return Err(too_small());
        }

        let mut rng = rand::thread_rng();
        let mut salt = [0u8; SALT_LEN];
        rng.fill(&mut salt);

        let mut include = pad(valid, r_hat, &mut rng);
        let mut exclude = pad(invalid, s_hat, &mut rng);

        let mut bytes = Vec::new();
        let mut depth = 0usize;
        loop {
            depth += 1;
            if depth > self.max_levels {
                return Err(CascadeError::DidNotConverge {
                    levels: self.max_levels,
                });
            }
            let level = depth as u8;

            let fpr = if depth == 1 && s_hat > 0 {
                r_hat as f64 * LEVEL_FPR.sqrt() / s_hat as f64
            } else {
                LEVEL_FPR
            };

            let mut filter = LevelFilter::with_fpr(include.len(), fpr);
            for id in &include {
                filter.insert(&level_key(&salt, level, id));
            }
            let false_positives: Vec<String> = exclude
                .iter()
                .filter(|id| filter.contains(&level_key(&salt, level, id)))
                .cloned()
                .collect();
            filter.write_to(&mut bytes)?;

            debug!(
                level,
                encoded = include.len(),
                false_positives = false_positives.len(),
                size_bits = filter.size_bits(),
                "Cascade level built"
            );

            if false_positives.is_empty() {
                break;
            }
            exclude = std::mem::replace(&mut include, false_positives);
        }

        info!(
            valid = valid.len(),
            invalid = invalid.len(),
            capacity,
            depth,
            bytes = bytes.len(),
            "Cascade built"
        );
        Ok(SerializedCascade { bytes, salt, depth })
    }
}

/// A parsed cascade that answers status queries.
#[derive(Debug, Clone)]
pub struct BloomCascade {
    salt: [u8; SALT_LEN],
    levels: Vec<LevelFilter>,
}

impl BloomCascade {
    /// Parse the published `0x` hex form.
    pub fn from_hex(payload: &str) -> Result<Self, CascadeError> {
        let raw = hex::decode(crset_types::strip_hex_prefix(payload)).map_err(|e| {
            CascadeError::Malformed {
                message: e.to_string(),
            }
        })?;
        if raw.len() < SALT_LEN {
            return Err(CascadeError::Malformed {
                message: "missing salt".to_string(),
            });
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&raw[..SALT_LEN]);
        Self::from_parts(salt, &raw[SALT_LEN..])
    }

    pub fn from_parts(salt: [u8; SALT_LEN], mut bytes: &[u8]) -> Result<Self, CascadeError> {
        let mut levels = Vec::new();
        while !bytes.is_empty() {
            let (level, rest) = LevelFilter::read_from(bytes)?;
            levels.push(level);
            bytes = rest;
        }
        if levels.is_empty() {
            return Err(CascadeError::Malformed {
                message: "no levels".to_string(),
            });
        }
        Ok(Self { salt, levels })
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Whether `id` is valid. Exact for ids the cascade was built from.
    pub fn is_valid(&self, id: &str) -> bool {
        for (index, filter) in self.levels.iter().enumerate() {
            let level = index + 1;
            if !filter.contains(&level_key(&self.salt, level as u8, id)) {
                return level % 2 == 0;
            }
        }
        self.levels.len() % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::r_hat;

    fn ids(prefix: &str, n: usize) -> HashSet<String> {
        (0..n).map(|i| format!("{}-{}", prefix, i)).collect()
    }

    #[test]
    fn test_cascade_is_exact_for_both_sets() {
        let valid = ids("valid", 200);
        let invalid = ids("revoked", 300);
        let capacity = r_hat(valid.len(), invalid.len());

        let built = BloomCascadeBuilder::new()
            .build(&valid, &invalid, capacity)
            .unwrap();
        let cascade = BloomCascade::from_hex(&built.to_hex()).unwrap();

        assert_eq!(cascade.depth(), built.depth);
        assert!(valid.iter().all(|id| cascade.is_valid(id)));
        assert!(invalid.iter().all(|id| !cascade.is_valid(id)));
    }

    #[test]
    fn test_salt_differs_between_builds() {
        let valid = ids("v", 4);
        let invalid = ids("i", 4);
        let builder = BloomCascadeBuilder::new();

        let a = builder.build(&valid, &invalid, 4.0).unwrap();
        let b = builder.build(&valid, &invalid, 4.0).unwrap();
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn test_capacity_too_small() {
        let valid = ids("v", 5);
        let invalid = HashSet::new();

        assert!(matches!(
            BloomCascadeBuilder::new().build(&valid, &invalid, 4.0),
            Err(CascadeError::CapacityTooSmall { .. })
        ));
        assert!(matches!(
            BloomCascadeBuilder::new().build(&valid, &invalid, f64::NAN),
            Err(CascadeError::CapacityTooSmall { .. })
        ));
    }

    #[test]
    fn test_empty_sets_one_level() {
        let empty = HashSet::new();
        let built = BloomCascadeBuilder::new().build(&empty, &empty, 0.0).unwrap();
        assert_eq!(built.depth, 1);
        assert!(BloomCascade::from_hex(&built.to_hex()).is_ok());
    }

    #[test]
    fn test_fractional_capacity_rounds_up() {
        let valid = HashSet::new();
        let invalid = ids("i", 3);
        let built = BloomCascadeBuilder::new()
            .build(&valid, &invalid, r_hat(0, 3))
            .unwrap();
        let cascade = BloomCascade::from_hex(&built.to_hex()).unwrap();
        assert!(invalid.iter().all(|id| !cascade.is_valid(id)));
    }

    #[test]
    fn test_malformed_hex() {
        assert!(BloomCascade::from_hex("0x00").is_err());
        assert!(BloomCascade::from_hex("0xzz").is_err());
    }
}
