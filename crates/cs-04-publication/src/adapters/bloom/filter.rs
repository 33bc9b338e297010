//! Single cascade level.

use bitvec::prelude::*;

use super::hashing::hash_positions;
use super::parameters::optimal_parameters;
use crate::domain::CascadeError;

/// Serialized level header: `[size_bits u32 BE][hash_count u8]`.
pub const LEVEL_HEADER_LEN: usize = 5;

/// Bloom filter over pre-keyed elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelFilter {
    bits: BitVec<u8, Lsb0>,
    k: usize,
    m: usize,
}

impl LevelFilter {
    pub fn new(m: usize, k: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; m],
            k,
            m,
        }
    }

    /// Filter sized for `expected_elements` at `target_fpr`.
    pub fn with_fpr(expected_elements: usize, target_fpr: f64) -> Self {
        let params = optimal_parameters(expected_elements, target_fpr);
        Self::new(params.size_bits, params.hash_count)
    }

    pub fn insert(&mut self, element: &[u8]) {
        for pos in hash_positions(element, self.k, self.m) {
            self.bits.set(pos, true);
        }
    }

    /// No false negatives.
    pub fn contains(&self, element: &[u8]) -> bool {
        hash_positions(element, self.k, self.m).all(|pos| self.bits[pos])
    }

    pub fn size_bits(&self) -> usize {
        self.m
    }

    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Append header and bit bytes to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), CascadeError> {
        let m = u32::try_from(self.m).map_err(|_| CascadeError::Malformed {
            message: format!("level of {} bits does not fit the header", self.m),
        })?;
        let k = u8::try_from(self.k).map_err(|_| CascadeError::Malformed {
            message: format!("{} hash functions do not fit the header", self.k),
        })?;

        out.extend_from_slice(&m.to_be_bytes());
        out.push(k);
        out.extend_from_slice(self.bits.as_raw_slice());
        Ok(())
    }

    /// Parse one level from the front of `input`, returning the rest.
    pub fn read_from(input: &[u8]) -> Result<(Self, &[u8]), CascadeError> {
        if input.len() < LEVEL_HEADER_LEN {
            return Err(CascadeError::Malformed {
                message: "truncated level header".to_string(),
            });
        }
        let m = u32::from_be_bytes([input[0], input[1], input[2], input[3]]) as usize;
        let k = input[4] as usize;
        let body_len = m.div_ceil(8);
        let rest = &input[LEVEL_HEADER_LEN..];

        if m == 0 || k == 0 || rest.len() < body_len {
            return Err(CascadeError::Malformed {
                message: format!("level with {} bits and {} hashes is invalid", m, k),
            });
        }

        let mut bits = BitVec::<u8, Lsb0>::from_vec(rest[..body_len].to_vec());
        bits.truncate(m);
        Ok((Self { bits, k, m }, &rest[body_len..]))
    }
}
