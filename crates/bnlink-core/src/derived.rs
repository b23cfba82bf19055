//! Helpers layered on native primitives rather than exported by them.

/// Byte length of a value with `bits` significant bits: `ceil(bits / 8)`.
#[inline]
#[must_use]
pub const fn num_bytes_for_bits(bits: i32) -> i32 {
    (bits + 7) / 8
}

/// `(inclusive lower bound on prime bits, Miller-Rabin rounds)`, descending.
///
/// Generated offline with the FIPS 186-4 §F.1 error bound targeting 125-bit
/// security for two-prime RSA. Published parameter: reproduce, don't derive.
pub const PRIME_CHECKS_TABLE: [(i32, i32); 7] = [
    (3747, 3),
    (1345, 4),
    (476, 5),
    (400, 6),
    (347, 7),
    (308, 8),
    (55, 27),
];

/// Rounds for sizes below the smallest table bound.
pub const PRIME_CHECKS_FLOOR: i32 = 34;

/// Miller-Rabin iterations for a candidate prime of `bits` bits.
#[must_use]
pub fn prime_checks_for_size(bits: i32) -> i32 {
    PRIME_CHECKS_TABLE
        .iter()
        .find(|&&(min_bits, _)| bits >= min_bits)
        .map_or(PRIME_CHECKS_FLOOR, |&(_, rounds)| rounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_length_rounds_up() {
        for (bits, bytes) in [(0, 0), (1, 1), (7, 1), (8, 1), (9, 2), (4096, 512)] {
            assert_eq!(num_bytes_for_bits(bits), bytes, "bits={bits}");
        }
    }

    #[test]
    fn prime_checks_boundaries() {
        assert_eq!(prime_checks_for_size(6394), 3);
        assert_eq!(prime_checks_for_size(3747), 3);
        assert_eq!(prime_checks_for_size(3746), 4);
        assert_eq!(prime_checks_for_size(1345), 4);
        assert_eq!(prime_checks_for_size(1344), 5);
        assert_eq!(prime_checks_for_size(476), 5);
        assert_eq!(prime_checks_for_size(475), 6);
        assert_eq!(prime_checks_for_size(400), 6);
        assert_eq!(prime_checks_for_size(347), 7);
        assert_eq!(prime_checks_for_size(308), 8);
        assert_eq!(prime_checks_for_size(307), 27);
        assert_eq!(prime_checks_for_size(55), 27);
        assert_eq!(prime_checks_for_size(54), 34);
        assert_eq!(prime_checks_for_size(6), 34);
        assert_eq!(prime_checks_for_size(0), 34);
    }

    #[test]
    fn prime_checks_non_increasing_with_size() {
        let mut previous = prime_checks_for_size(0);
        for bits in 1..8192 {
            let rounds = prime_checks_for_size(bits);
            assert!(rounds <= previous, "bits={bits}: {rounds} > {previous}");
            previous = rounds;
        }
    }
}
