//! Trial division primality testing.

use std::fmt;

/// The outcome of checking a single number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// No divisor was found.
    Prime,
    /// A divisor was found (or the value is below 2 under `Rule::Strict`).
    Composite,
}

/// Which trial division bound to use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Correct for every `i64`: values below 2 are composite and divisors
    /// are tried up to and including the integer square root.
    Strict,
    /// Tries divisors while `d < sqrt(n)` in floating point. Values below 2
    /// and squares of primes come out as `Prime`. Only useful for checking
    /// parity with the historical benchmark output.
    Legacy,
}

impl Default for Rule {
    fn default() -> Self {
        Rule::Strict
    }
}

/// A number together with its verdict, formatted as a single output line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Classification {
    /// The number which was checked.
    pub n: i64,
    /// What the check concluded.
    pub verdict: Verdict,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.verdict {
            Verdict::Prime => write!(f, "{} is prime", self.n),
            Verdict::Composite => write!(f, "{} is not a prime number", self.n),
        }
    }
}

/// Check `n` for primality under `rule`.
pub fn is_prime(n: i64, rule: Rule) -> Verdict {
    trial_division(n, rule, |_| ())
}

/// Check `n` for primality under `rule`, reporting progress through the
/// divisor range.
///
/// `progress` is called with a completed percentage each time the search
/// crosses another quarter of the range, and always with `100` once the
/// search finishes (whether or not a divisor was found). Reported values
/// are strictly increasing.
pub fn trial_division<F>(n: i64, rule: Rule, mut progress: F) -> Verdict
    where F: FnMut(u8),
{
    let last = match rule {
        Rule::Strict if n < 2 => {
            progress(100);
            return Verdict::Composite;
        },
        Rule::Strict => isqrt(n),
        // NaN for negative values, which makes the range below empty
        Rule::Legacy => {
            let bound = (n as f64).sqrt();
            if bound.is_nan() { 1 } else { bound.ceil() as i64 - 1 }
        },
    };

    let span = (last - 1).max(1);
    let mut reported = 0u8;
    let mut verdict = Verdict::Prime;

    let mut d = 2;
    while d <= last {
        if n % d == 0 {
            verdict = Verdict::Composite;
            break;
        }

        let percent = ((d - 1) * 100 / span) as u8;
        if percent >= reported + 25 && percent < 100 {
            reported = percent - percent % 25;
            progress(reported);
        }

        d += 1;
    }

    progress(100);
    verdict
}

/// Largest `r` with `r * r <= n`, for `n >= 0`.
fn isqrt(n: i64) -> i64 {
    let mut r = (n as f64).sqrt() as i64;
    // Correct the float estimate without ever forming an overflowing square
    while r > 0 && r > n / r {
        r -= 1;
    }
    while (r + 1) <= n / (r + 1) {
        r += 1;
    }
    r
}
