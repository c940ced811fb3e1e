use sha2::{Digest, Sha256};
use std::cmp::Ordering;

/// One hundred percent in micro-percents.
pub(crate) const TOTAL_MICRO_PERCENTILES: u64 = 100_000_000;

/// Buckets a randomization id into `[0, 100_000_000)`.
///
/// The hash input is `seed + "." + id` when the seed is non-empty, else the
/// id alone. The SHA-256 digest is interpreted as a big-endian unsigned
/// integer and reduced modulo 100_000_000; the modulo is carried through the
/// digest byte-by-byte so a 256-bit integer type is never materialized. The
/// result must match the other Remote Config server SDKs bit-for-bit.
pub(crate) fn percentile_bucket(seed: &str, randomization_id: &str) -> u64 {
    let hash_input = if seed.is_empty() {
        randomization_id.to_owned()
    } else {
        format!("{seed}.{randomization_id}")
    };
    Sha256::digest(hash_input)
        .iter()
        .fold(0u64, |rem, byte| {
            ((rem << 8) | u64::from(*byte)) % TOTAL_MICRO_PERCENTILES
        })
}

/// Compares two version strings segment-wise.
///
/// A version is a `.`-separated list of non-negative integers, ASCII
/// whitespace around the whole string ignored. The shorter side is
/// zero-extended, so `2.3` equals `2.3.0`. Returns `None` when either side
/// has a non-numeric segment.
pub(crate) fn compare_versions(actual: &str, target: &str) -> Option<Ordering> {
    let actual = parse_version_segments(actual)?;
    let target = parse_version_segments(target)?;
    let len = actual.len().max(target.len());
    for i in 0..len {
        let a = actual.get(i).copied().unwrap_or(0);
        let t = target.get(i).copied().unwrap_or(0);
        match a.cmp(&t) {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(Ordering::Equal)
}

fn parse_version_segments(version: &str) -> Option<Vec<u64>> {
    version
        .trim_ascii()
        .split('.')
        .map(|segment| segment.parse::<u64>().ok())
        .collect()
}

#[cfg(test)]
mod utils_tests {
    use super::{compare_versions, percentile_bucket};
    use std::cmp::Ordering;

    #[test]
    fn bucket_known_vectors() {
        // Expected values computed with an independent SHA-256 implementation.
        assert_eq!(percentile_bucket("s", "r"), 25_745_838);
        assert_eq!(percentile_bucket("", "r"), 23_368_609);
        assert_eq!(percentile_bucket("abc", "user-one"), 24_174_969);
        assert_eq!(percentile_bucket("abc", "user-two"), 5_153_851);
        assert_eq!(percentile_bucket("rollout", "alice"), 62_141_586);
        assert_eq!(percentile_bucket("rollout", "bob"), 37_434_492);
        assert_eq!(percentile_bucket("", "user1"), 78_167_440);
        assert_eq!(percentile_bucket("experiment-7", "client-42"), 48_555_386);
    }

    #[test]
    fn bucket_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                percentile_bucket("seed", "id"),
                percentile_bucket("seed", "id")
            );
        }
        // The dot separator is only inserted behind a non-empty seed.
        assert_ne!(percentile_bucket("", "a.b"), percentile_bucket("a", "b"));
    }

    #[test]
    fn version_comparison() {
        assert_eq!(compare_versions("1.2", "1.2.3"), Some(Ordering::Less));
        assert_eq!(compare_versions("1.2.3", "1.2.3"), Some(Ordering::Equal));
        assert_eq!(compare_versions("2.3", "2.3.0"), Some(Ordering::Equal));
        assert_eq!(compare_versions("1.10", "1.9"), Some(Ordering::Greater));
        assert_eq!(
            compare_versions("1.2.3.4.5", "1.2.3.4"),
            Some(Ordering::Greater)
        );
        assert_eq!(compare_versions(" 1.2.3 ", "1.2.3"), Some(Ordering::Equal));
    }

    #[test]
    fn version_with_non_numeric_segment_is_invalid() {
        assert_eq!(compare_versions("1.beta", "1.0"), None);
        assert_eq!(compare_versions("1.0", "1.0-rc1"), None);
        assert_eq!(compare_versions("", "1.0"), None);
        assert_eq!(compare_versions("1.", "1.0"), None);
    }
}
