//! Bounded random scalars.
//!
//! Every function draws only from the `rng` it is handed, so a seeded
//! `StdRng` reproduces a run exactly.

use crate::error::{HarnessError, HarnessResult};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

/// Longest string [`random_string`] will produce.
pub const MAX_RANDOM_STRING_LEN: usize = 100;

const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Alphanumeric string of exactly `length` characters.
///
/// `0` yields an empty string; anything above [`MAX_RANDOM_STRING_LEN`] is an
/// `InvalidArgument`.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, length: usize) -> HarnessResult<String> {
    if length > MAX_RANDOM_STRING_LEN {
        return Err(HarnessError::invalid_argument(
            "length",
            format!("must be between 1 and {MAX_RANDOM_STRING_LEN} characters, got {length}"),
        ));
    }
    Ok(sample_alphabet(rng, ALPHANUMERIC, length))
}

/// Uppercase ASCII letters, used for SKU groups.
pub fn random_letters<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    sample_alphabet(rng, UPPERCASE, length)
}

/// Decimal digits, leading zeros allowed.
pub fn random_digits<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn sample_alphabet<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], length: usize) -> String {
    let mut out = String::with_capacity(length);
    for _ in 0..length {
        let idx = rng.gen_range(0..alphabet.len());
        out.push(alphabet[idx] as char);
    }
    out
}

/// Integer in `[min, max]`.
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> HarnessResult<i64> {
    if min > max {
        return Err(HarnessError::invalid_argument(
            "range",
            format!("min {min} is greater than max {max}"),
        ));
    }
    Ok(rng.gen_range(min..=max))
}

/// Float in `[min, max]`.
pub fn random_float<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> HarnessResult<f64> {
    if !min.is_finite() || !max.is_finite() {
        return Err(HarnessError::invalid_argument(
            "range",
            format!("bounds must be finite, got [{min}, {max}]"),
        ));
    }
    if min > max {
        return Err(HarnessError::invalid_argument(
            "range",
            format!("min {min} is greater than max {max}"),
        ));
    }
    Ok(rng.gen_range(min..=max))
}

/// Float in `[min, max]` rounded to two decimals (prices, ratings, weights).
///
/// The rounded value is clamped back into the range so bounds with more than
/// two decimals cannot leak out.
pub fn random_decimal<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> HarnessResult<f64> {
    let raw = random_float(rng, min, max)?;
    Ok(round2(raw).clamp(min, max))
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Uniform pick from a non-empty slice.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, choices: &'a [T]) -> HarnessResult<&'a T> {
    choices
        .choose(rng)
        .ok_or_else(|| HarnessError::invalid_argument("choices", "cannot pick from an empty set"))
}

/// [`pick`] for string tables, returning an owned `String`.
pub fn pick_str<R: Rng + ?Sized>(rng: &mut R, choices: &[&str]) -> HarnessResult<String> {
    pick(rng, choices).map(|s| (*s).to_string())
}

/// `count` distinct elements in random order (fewer if the slice is shorter).
pub fn sample<T: Clone, R: Rng + ?Sized>(rng: &mut R, choices: &[T], count: usize) -> Vec<T> {
    choices.choose_multiple(rng, count).cloned().collect()
}

/// Instant in `[start, end]`, millisecond resolution.
pub fn random_date_between<R: Rng + ?Sized>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> HarnessResult<DateTime<Utc>> {
    if start > end {
        return Err(HarnessError::invalid_argument(
            "date_range",
            format!("start {start} is after end {end}"),
        ));
    }
    let span = (end - start).num_milliseconds();
    let offset = rng.gen_range(0..=span);
    Ok(start + Duration::milliseconds(offset))
}

/// Instant within the trailing year ending now.
pub fn random_date<R: Rng + ?Sized>(rng: &mut R) -> DateTime<Utc> {
    let end = Utc::now();
    random_date_between(rng, end - Duration::days(365), end).unwrap_or(end)
}

/// ISO-8601 rendering with millisecond precision and a `Z` suffix.
pub fn to_iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn random_string_respects_length_contract() {
        let mut rng = rng();
        assert_eq!(random_string(&mut rng, 0).expect("zero"), "");
        assert_eq!(random_string(&mut rng, 1).expect("one").len(), 1);
        let s = random_string(&mut rng, 100).expect("max");
        assert_eq!(s.len(), 100);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));

        let err = random_string(&mut rng, 101).unwrap_err();
        assert!(matches!(err, HarnessError::InvalidArgument { .. }));
    }

    #[test]
    fn numeric_ranges_are_inclusive_and_validated() {
        let mut rng = rng();
        for _ in 0..200 {
            let n = random_int(&mut rng, -3, 3).expect("int");
            assert!((-3..=3).contains(&n));
            let d = random_decimal(&mut rng, 1.0, 999.99).expect("decimal");
            assert!((1.0..=999.99).contains(&d));
            assert_eq!(round2(d), d);
        }
        assert_eq!(random_int(&mut rng, 5, 5).expect("degenerate"), 5);
        assert!(random_int(&mut rng, 2, 1).is_err());
        assert!(random_float(&mut rng, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn float_ranges_wider_than_f64_are_rejected() {
        let mut rng = rng();
        assert!(matches!(
            random_float(&mut rng, f64::MIN, f64::MAX),
            Err(HarnessError::InvalidArgument { .. })
        ));
        assert!(matches!(
            random_decimal(&mut rng, -f64::MAX, 1.0),
            Err(HarnessError::InvalidArgument { .. })
        ));
        assert!(random_float(&mut rng, 1.0, f64::MAX).is_err());
        let wide = random_float(&mut rng, 0.0, f64::MAX / 4.0).expect("sampleable width");
        assert!((0.0..=f64::MAX / 4.0).contains(&wide));
    }

    #[test]
    fn pick_rejects_empty_sets() {
        let mut rng = rng();
        let empty: [&str; 0] = [];
        assert!(matches!(
            pick(&mut rng, &empty),
            Err(HarnessError::InvalidArgument { .. })
        ));
        assert_eq!(*pick(&mut rng, &["only"]).expect("single"), "only");
    }

    #[test]
    fn dates_fall_inside_window() {
        let mut rng = rng();
        let end = Utc::now();
        let start = end - Duration::days(30);
        for _ in 0..50 {
            let d = random_date_between(&mut rng, start, end).expect("date");
            assert!(d >= start && d <= end);
        }
        assert_eq!(
            random_date_between(&mut rng, start, start).expect("instant"),
            start
        );
        assert!(random_date_between(&mut rng, end, start).is_err());

        let recent = random_date(&mut rng);
        assert!(recent <= Utc::now());
        assert!(recent >= Utc::now() - Duration::days(366));
    }

    #[test]
    fn digits_and_letters_use_their_alphabets() {
        let mut rng = rng();
        let digits = random_digits(&mut rng, 13);
        assert_eq!(digits.len(), 13);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));
        let letters = random_letters(&mut rng, 3);
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn sample_returns_distinct_elements() {
        let mut rng = rng();
        let picked = sample(&mut rng, &[1, 2, 3, 4], 3);
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert_eq!(sample(&mut rng, &[1, 2], 5).len(), 2);
    }
}
