//! Environment overrides for property-test and Monte Carlo suite sizes.
//!
//! `USTCON_PBT_CASES` sets the proptest case count, `USTCON_PBT_FORK` toggles
//! forked execution and `USTCON_TRIALS` scales the statistical suites.
//! Unparseable values are logged and ignored.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PBT_CASES_ENV_KEY: &str = "USTCON_PBT_CASES";
/// Environment variable controlling proptest process forking.
pub const PBT_FORK_ENV_KEY: &str = "USTCON_PBT_FORK";
/// Environment variable controlling trial counts in statistical tests.
pub const TRIALS_ENV_KEY: &str = "USTCON_TRIALS";

/// Runtime profile for test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunProfile {
    cases: u32,
    fork: bool,
    trials: usize,
}

impl RunProfile {
    /// Loads a profile, falling back to the given defaults.
    ///
    /// # Examples
    /// ```
    /// use ustcon_test_support::profile::RunProfile;
    ///
    /// let profile = RunProfile::load(64, false, 10_000);
    /// assert!(profile.cases() > 0);
    /// assert!(profile.trials() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool, default_trials: usize) -> Self {
        Self {
            cases: read_env_or_default(PBT_CASES_ENV_KEY, default_cases, parse_positive),
            fork: read_env_or_default(PBT_FORK_ENV_KEY, default_fork, parse_bool),
            trials: read_env_or_default(TRIALS_ENV_KEY, default_trials, parse_positive),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }

    /// Number of walks per statistical check.
    #[must_use]
    pub fn trials(&self) -> usize {
        self.trials
    }
}

fn read_env_or_default<T, F>(key: &'static str, default: T, parser: F) -> T
where
    F: Fn(&str) -> Result<T, String>,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parser(&raw).unwrap_or_else(|reason| {
        tracing::warn!(env = key, raw = %raw, reason = %reason, "invalid test profile override; using default");
        default
    })
}

fn parse_positive<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let parsed = raw
        .trim()
        .parse::<T>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == T::default() {
        return Err("value must be > 0".to_owned());
    }
    Ok(parsed)
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Ok(1))]
    #[case(" 250 ", Ok(250))]
    #[case("0", Err(()))]
    #[case("-1", Err(()))]
    #[case("abc", Err(()))]
    fn parse_positive_accepts_only_positive_integers(
        #[case] raw: &str,
        #[case] expected: Result<u32, ()>,
    ) {
        assert_eq!(parse_positive::<u32>(raw).map_err(|_| ()), expected);
    }

    #[rstest]
    #[case("true", Some(true))]
    #[case("ON", Some(true))]
    #[case("1", Some(true))]
    #[case("no", Some(false))]
    #[case("0", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    fn parse_bool_accepts_common_spellings(#[case] raw: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_bool(raw).ok(), expected);
    }
}
