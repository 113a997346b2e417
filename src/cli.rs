//! Shared CLI argument-parsing primitives (§4.11, §8).
//!
//! A small hand-rolled flag scanner in the style of this crate's other
//! command-line entry points: flags are looked up by exact token match over
//! the argument slice rather than through a declarative parser, since the
//! flag set is small and fixed.

use std::path::PathBuf;

use crate::error::AmiraError;

/// `amira`'s documented flag/positional surface.
pub const USAGE: &str =
    "amira [-c] [-d N] [-f] [-h] [-i freq] [-j] [-n] [-p] [-s file] [-v] delta theta samplesize dataset";

/// Everything the orchestrator and the output renderers need, collected from
/// one `amira` invocation (§3 "Run settings").
#[derive(Clone, Debug)]
pub struct Settings {
    /// Failure probability δ ∈ (0,1).
    pub delta: f64,
    /// Frequency threshold θ ∈ (0,1).
    pub theta: f64,
    /// Sample size s.
    pub samplesize: u64,
    /// Dataset path.
    pub dataset: PathBuf,
    /// `-c`: emit closed FIs rather than expanding to all FIs.
    pub printclosed: bool,
    /// `-p`: skip computation of the second bound.
    pub skipsecond: bool,
    /// `-s file`: also write the sampled transactions to `file`.
    pub sample_output: Option<PathBuf>,
    /// `-d N`: override the auto-detected dataset size.
    pub dataset_size_override: Option<u64>,
    /// `-i freq`: drop items below this sample frequency before the first bound.
    pub ignore_freq: Option<f64>,
    /// `-v`: log progress to stderr.
    pub verbose: bool,
    /// `-j`: emit JSON instead of plaintext.
    pub json: bool,
    /// `-f`: verbose "full" output (settings, runtimes, counts).
    pub full: bool,
    /// `-n`: suppress the itemsets section of the output.
    pub no_itemsets: bool,
    /// `-h`: print help and exit.
    pub help: bool,
}

impl Settings {
    /// Parse `args` (excluding the program name) into a [`Settings`].
    pub fn from_args(args: &[String]) -> Result<Settings, AmiraError> {
        let mut printclosed = false;
        let mut skipsecond = false;
        let mut sample_output = None;
        let mut dataset_size_override = None;
        let mut ignore_freq = None;
        let mut verbose = false;
        let mut json = false;
        let mut full = false;
        let mut no_itemsets = false;
        let mut help = false;
        let mut positionals = Vec::new();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "-c" => printclosed = true,
                "-p" => skipsecond = true,
                "-v" => verbose = true,
                "-j" => json = true,
                "-f" => full = true,
                "-n" => no_itemsets = true,
                "-h" => help = true,
                "-d" => {
                    i += 1;
                    dataset_size_override = Some(parse_u64(next_value(args, i, "-d")?, "-d")?);
                }
                "-i" => {
                    i += 1;
                    ignore_freq = Some(parse_f64(next_value(args, i, "-i")?, "-i")?);
                }
                "-s" => {
                    i += 1;
                    sample_output = Some(PathBuf::from(next_value(args, i, "-s")?));
                }
                other => positionals.push(other.to_string()),
            }
            i += 1;
        }

        if help {
            return Ok(Settings {
                delta: 0.0,
                theta: 0.0,
                samplesize: 0,
                dataset: PathBuf::new(),
                printclosed,
                skipsecond,
                sample_output,
                dataset_size_override,
                ignore_freq,
                verbose,
                json,
                full,
                no_itemsets,
                help,
            });
        }

        if positionals.len() != 4 {
            return Err(AmiraError::Input(format!(
                "expected 4 positional arguments (delta theta samplesize dataset), got {}\nusage: {USAGE}",
                positionals.len()
            )));
        }

        let delta = parse_f64(&positionals[0], "delta")?;
        let theta = parse_f64(&positionals[1], "theta")?;
        let samplesize = parse_u64(&positionals[2], "samplesize")?;
        let dataset = PathBuf::from(&positionals[3]);

        if !(delta > 0.0 && delta < 1.0) {
            return Err(AmiraError::Input(format!("delta must be in (0,1), got {delta}")));
        }
        if !(theta > 0.0 && theta < 1.0) {
            return Err(AmiraError::Input(format!("theta must be in (0,1), got {theta}")));
        }
        if samplesize == 0 {
            return Err(AmiraError::Input("samplesize must be positive".to_string()));
        }

        Ok(Settings {
            delta,
            theta,
            samplesize,
            dataset,
            printclosed,
            skipsecond,
            sample_output,
            dataset_size_override,
            ignore_freq,
            verbose,
            json,
            full,
            no_itemsets,
            help,
        })
    }
}

fn next_value<'a>(args: &'a [String], i: usize, flag: &'static str) -> Result<&'a str, AmiraError> {
    args.get(i).map(String::as_str).ok_or_else(|| AmiraError::Input(format!("{flag} requires a value")))
}

/// Parse a `u64` argument value, naming the offending flag/positional on failure.
pub fn parse_u64(value: &str, name: &str) -> Result<u64, AmiraError> {
    value
        .parse::<u64>()
        .map_err(|_| AmiraError::Input(format!("`{name}` must be a nonnegative integer, got `{value}`")))
}

/// Parse an `f64` argument value, naming the offending flag/positional on failure.
pub fn parse_f64(value: &str, name: &str) -> Result<f64, AmiraError> {
    value.parse::<f64>().map_err(|_| AmiraError::Input(format!("`{name}` must be a number, got `{value}`")))
}

/// Parse a boolean-ish flag value (`"true"`/`"false"`), used by the auxiliary
/// binaries' minimal flag surface.
pub fn parse_bool(value: &str, name: &str) -> Result<bool, AmiraError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(AmiraError::Input(format!("`{name}` must be true or false, got `{value}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_minimal_positional_invocation() {
        let settings = Settings::from_args(&args(&["0.1", "0.2", "1000", "data.dat"])).unwrap();
        assert_eq!(settings.delta, 0.1);
        assert_eq!(settings.theta, 0.2);
        assert_eq!(settings.samplesize, 1000);
        assert_eq!(settings.dataset, PathBuf::from("data.dat"));
        assert!(!settings.printclosed && !settings.skipsecond && !settings.verbose);
    }

    #[test]
    fn parses_flags_and_valued_options() {
        let settings = Settings::from_args(&args(&[
            "-c", "-v", "-j", "-f", "-n", "-p", "-d", "500", "-i", "0.01", "-s", "out.dat", "0.1",
            "0.2", "1000", "data.dat",
        ]))
        .unwrap();
        assert!(settings.printclosed);
        assert!(settings.verbose);
        assert!(settings.json);
        assert!(settings.full);
        assert!(settings.no_itemsets);
        assert!(settings.skipsecond);
        assert_eq!(settings.dataset_size_override, Some(500));
        assert_eq!(settings.ignore_freq, Some(0.01));
        assert_eq!(settings.sample_output, Some(PathBuf::from("out.dat")));
    }

    #[test]
    fn rejects_delta_out_of_range() {
        assert!(Settings::from_args(&args(&["1.5", "0.2", "1000", "data.dat"])).is_err());
    }

    #[test]
    fn rejects_wrong_positional_count() {
        assert!(Settings::from_args(&args(&["0.1", "0.2"])).is_err());
    }

    #[test]
    fn help_flag_short_circuits_positional_validation() {
        let settings = Settings::from_args(&args(&["-h"])).unwrap();
        assert!(settings.help);
    }
}
