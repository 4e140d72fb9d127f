// Synthetic address and hash generation.
//
// Everything here is plausible in shape only: the strings follow each
// chain's address format but carry no cryptographic meaning.

use std::collections::HashMap;
use std::num::NonZeroU64;

use rand::{rngs::OsRng, Rng};

use crate::types::Chain;
use crate::{BridgeError, Result};

// Base-58 style alphabet: digits 1-9, upper/lowercase minus ambiguous letters
const BASE58_CHARS: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const SOL_ADDRESS_LEN: usize = 44;
const BTC_ADDRESS_LEN: usize = 34;
const EVM_ADDRESS_BYTES: usize = 20; // 40 hex characters
const EVM_HASH_BYTES: usize = 32; // 64 hex characters

fn base58_like<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE58_CHARS[rng.gen_range(0..BASE58_CHARS.len())] as char)
        .collect()
}

fn hex_string<R: Rng>(rng: &mut R, bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rng.fill(&mut buf[..]);
    format!("0x{}", hex::encode(buf))
}

/// Generate a chain-appropriate fake address.
pub fn generate_address<R: Rng>(rng: &mut R, chain: Chain) -> String {
    match chain {
        Chain::Sol => base58_like(rng, SOL_ADDRESS_LEN),
        Chain::Btc => base58_like(rng, BTC_ADDRESS_LEN),
        // EVM style address for BSC / ETH / TRON
        Chain::Bsc | Chain::Eth | Chain::Tron => hex_string(rng, EVM_ADDRESS_BYTES),
    }
}

/// Generate a chain-appropriate fake transaction hash.
pub fn generate_tx_hash<R: Rng>(rng: &mut R, chain: Chain) -> String {
    match chain {
        Chain::Sol | Chain::Btc => generate_address(rng, chain),
        Chain::Bsc | Chain::Eth | Chain::Tron => hex_string(rng, EVM_HASH_BYTES),
    }
}

/// Shorten an address for display. Does not mutate the underlying record.
/// Counts characters, not bytes, so arbitrary input never splits a
/// multi-byte sequence.
pub fn mask_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

// Constants for the unique transaction id generator
const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const N: u64 = 62; // Size of the alphabet
const CODE_LEN: usize = 7; // Length of each id
const MODULUS: u64 = 3_521_614_606_208; // 62^7 = 3,521,614,606,208

/// Convert a number to a 7-character base-62 string
fn to_code(x: u64) -> String {
    if x == 0 {
        return "0".repeat(CODE_LEN);
    }

    let mut digits = Vec::with_capacity(CODE_LEN);
    let mut num = x;

    while num > 0 {
        let idx = (num % N) as usize;
        digits.push(CHARSET[idx] as char);
        num /= N;
    }

    // Pad with leading zeros if necessary
    while digits.len() < CODE_LEN {
        digits.push('0');
    }

    digits.reverse();
    digits.into_iter().collect()
}

/// Generator of guaranteed-unique transaction ids.
///
/// Walks a full-period linear congruence over 62^7 with a secret multiplier
/// and offset, so ids look opaque but never collide within a session.
pub struct TxIdGenerator {
    counter: u64,
    a: NonZeroU64, // Multiplier, coprime with MODULUS
    b: u64,        // Offset
    used_ids: HashMap<String, bool>, // Track issued ids to prevent collisions
}

impl TxIdGenerator {
    /// Initialize with a cryptographically secure random secret
    pub fn new() -> Result<Self> {
        // Derive 'a' from fresh randomness, ensuring it's coprime with 62^7.
        // Since 62 = 2 * 31 it suffices that 'a' is divisible by neither.
        let a = loop {
            let mut candidate_bytes = [0u8; 8];
            OsRng.fill(&mut candidate_bytes);

            let candidate = u64::from_be_bytes(candidate_bytes);
            if candidate > 0 && candidate % 2 != 0 && candidate % 31 != 0 {
                break candidate;
            }
        };

        let a = NonZeroU64::new(a).ok_or_else(|| {
            BridgeError::System("Failed to generate valid multiplier for id generator".to_string())
        })?;

        // Generate a separate random value for 'b'
        let mut b_bytes = [0u8; 8];
        OsRng.fill(&mut b_bytes);
        let b = u64::from_be_bytes(b_bytes) % MODULUS;

        Ok(TxIdGenerator {
            counter: 0,
            a,
            b,
            used_ids: HashMap::new(),
        })
    }

    /// Generate the next unique id
    pub fn generate(&mut self) -> Result<String> {
        // Try up to 10 times to generate a unique id
        for _ in 0..10 {
            // Compute x = (a * counter + b) mod 62^7 using u128 to avoid overflow
            let x = (self.a.get() as u128 * self.counter as u128 + self.b as u128)
                % MODULUS as u128;
            let x = x as u64;
            self.counter = self.counter.wrapping_add(1);

            let code = to_code(x);

            if !self.used_ids.contains_key(&code) {
                self.used_ids.insert(code.clone(), true);
                return Ok(code);
            }
        }

        Err(BridgeError::System(
            "Failed to generate unique transaction id".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn test_sol_address_shape() {
        let mut rng = thread_rng();
        let addr = generate_address(&mut rng, Chain::Sol);
        assert_eq!(addr.len(), 44);
        assert!(addr.bytes().all(|b| BASE58_CHARS.contains(&b)));
    }

    #[test]
    fn test_btc_address_shape() {
        let mut rng = thread_rng();
        let addr = generate_address(&mut rng, Chain::Btc);
        assert_eq!(addr.len(), 34);
        assert!(addr.bytes().all(|b| BASE58_CHARS.contains(&b)));
    }

    #[test]
    fn test_evm_address_shape() {
        let mut rng = thread_rng();
        for chain in [Chain::Bsc, Chain::Eth, Chain::Tron] {
            let addr = generate_address(&mut rng, chain);
            assert_eq!(addr.len(), 42);
            assert!(addr.starts_with("0x"));
            assert!(addr[2..].bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_tx_hash_shapes() {
        let mut rng = thread_rng();
        // SOL and BTC reuse the address format
        assert_eq!(generate_tx_hash(&mut rng, Chain::Sol).len(), 44);
        assert_eq!(generate_tx_hash(&mut rng, Chain::Btc).len(), 34);
        // The rest are 0x-prefixed 64-hex strings
        let hash = generate_tx_hash(&mut rng, Chain::Eth);
        assert_eq!(hash.len(), 66);
        assert!(hash.starts_with("0x"));
    }

    #[test]
    fn test_mask_short_address_unchanged() {
        assert_eq!(mask_address("abcdef123456"), "abcdef123456");
        assert_eq!(mask_address("short"), "short");
    }

    #[test]
    fn test_mask_long_address() {
        let addr = "A".repeat(40) + "WXYZ";
        let masked = mask_address(&addr);
        assert_eq!(masked, format!("{}...{}", "AAAAAA", "WXYZ"));
        assert_eq!(masked.len(), 13);
    }

    #[test]
    fn test_mask_multibyte_address() {
        // 16 characters, multi-byte throughout; must not split mid-char
        let addr = "ÀÁÂÃÄÅÆÇÈÉÊËÌÍÎÏ";
        let masked = mask_address(addr);
        assert_eq!(masked, "ÀÁÂÃÄÅ...ÌÍÎÏ");

        // At or below 12 characters stays unchanged even when > 12 bytes
        let short = "ÀÁÂÃÄÅÆÇÈÉÊË";
        assert_eq!(mask_address(short), short);
    }

    #[test]
    fn test_tx_ids_unique() {
        let mut ids = TxIdGenerator::new().unwrap();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            let id = ids.generate().unwrap();
            assert_eq!(id.len(), 7);
            assert!(seen.insert(id), "duplicate transaction id");
        }
    }
}
