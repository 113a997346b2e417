//! The orchestrator (§4.6–§4.9): sample → first bound → first mining →
//! patch/attribute → second bound → prune → report.

use std::time::Instant;

use rand::rngs::StdRng;

use crate::bounds::{compute_eraeps_items, compute_eraeps_itemsets};
use crate::cli::Settings;
use crate::dataset;
use crate::error::AmiraError;
use crate::itemset::{Itemset, ItemsetInfo, ItemsetWithInfo, Origin};
use crate::miner::{CfiMiner, FpClose};
use crate::sample::{self, build_sample, SampleBuild};
use crate::sampler;

/// Everything the `-f`/`-j` output needs beyond the itemsets themselves (§3
/// "Run report").
#[derive(Clone, Debug)]
pub struct RunReport {
    /// ω₁, the first ERA upper bound.
    pub omega1: f64,
    /// ρ₁, the first deviation bound.
    pub rho1: f64,
    /// Lowered frequency threshold used for the first mining pass.
    pub freq1: f64,
    /// Absolute support threshold used for the first mining pass.
    pub supp1: u64,
    /// Number of CFIs returned by the first mining pass, before patching.
    pub cfis1: usize,
    /// ω₂, present unless `-p` skipped the second bound.
    pub omega2: Option<f64>,
    /// ρ₂, present unless `-p` skipped the second bound.
    pub rho2: Option<f64>,
    /// The second lowered frequency threshold, if computed.
    pub freq2: Option<f64>,
    /// The second absolute support threshold, if computed.
    pub supp2: Option<u64>,
    /// Size of Q right before the final prune, if the second bound ran.
    pub cfis2: Option<usize>,
    /// ε = 2·min(ρ₁, ρ₂) (or 2·ρ₁ when the second bound was skipped).
    pub eps: f64,
    /// Per-phase wall-clock timings.
    pub timings: RunTimings,
    /// Set if `-s` was given and writing the sample file failed; the primary
    /// result is still returned (§7: sample-write failure is a warning, not
    /// a fatal error).
    pub sample_write_warning: Option<String>,
}

/// Per-phase wall-clock durations, in milliseconds.
#[derive(Clone, Debug, Default)]
pub struct RunTimings {
    /// Total elapsed time, excluding the optional sample-file write.
    pub total_ms: u64,
    pub create_sample_ms: u64,
    pub get_rho1_ms: u64,
    pub mine_ms: u64,
    pub get_rho2_ms: u64,
    pub prune_ms: u64,
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn log_phase(settings: &Settings, message: &str) {
    if settings.verbose {
        eprintln!("[amira] {message}");
    }
}

/// Run the full pipeline for one invocation, returning the final (pruned) Q
/// together with the run report.
pub fn run_pipeline(
    settings: &Settings,
    rng: &mut StdRng,
) -> Result<(Vec<ItemsetWithInfo>, RunReport), AmiraError> {
    let total_start = Instant::now();

    let n = match settings.dataset_size_override {
        Some(n) => n,
        None => dataset::dataset_size(&settings.dataset)?,
    };
    if n == 0 {
        return Err(AmiraError::Invariant("dataset has zero transactions".to_string()));
    }
    let s = settings.samplesize;

    log_phase(settings, &format!("sampling s={s} transactions from N={n}"));
    let phase_start = Instant::now();
    let indices = sampler::sample_indices(n, s, rng);
    let SampleBuild { sample, mut item_info } = build_sample(&settings.dataset, &indices)?;
    if let Some(freq) = settings.ignore_freq {
        item_info.retain(|_, info| info.sp as f64 / s as f64 >= freq);
    }
    let create_sample_ms = elapsed_ms(phase_start);
    log_phase(settings, &format!("sample built: {} distinct transactions", sample.distinct_len()));

    log_phase(settings, "computing first bound");
    let phase_start = Instant::now();
    let eraeps1 = compute_eraeps_items(&item_info, s, settings.delta)?;
    let get_rho1_ms = elapsed_ms(phase_start);
    let freq1 = (settings.theta - eraeps1.rho).max(1.0 / s as f64);
    let supp1 = ((freq1 * s as f64).ceil() as u64).max(1);
    log_phase(settings, &format!("rho1={:.6} supp1={supp1}", eraeps1.rho));

    log_phase(settings, &format!("mining CFIs at support >= {supp1}"));
    let phase_start = Instant::now();
    let mined = FpClose.mine(&sample, supp1);
    let cfis1 = mined.len();
    let mut q: Vec<ItemsetWithInfo> = mined
        .into_iter()
        .map(|(itemset, sp)| ItemsetWithInfo {
            itemset,
            info: ItemsetInfo::with_support(sp),
            origin: Origin::Mined,
        })
        .collect();

    for (&item, info) in item_info.iter() {
        if info.sp < supp1 {
            q.push(ItemsetWithInfo {
                itemset: Itemset::new(vec![item]),
                info: ItemsetInfo::with_support(info.sp),
                origin: Origin::Patched,
            });
        }
    }
    q.sort_by(|a, b| a.cmp_h(b));
    let mine_ms = elapsed_ms(phase_start);

    for (transaction, copies) in sample.iter() {
        if let Some(a) = q.iter_mut().find(|a| a.itemset.is_subset_of(transaction)) {
            a.info.update(transaction.len() - a.itemset.len(), copies);
        }
    }

    let (eraeps2, get_rho2_ms) = if settings.skipsecond {
        (None, 0u64)
    } else {
        log_phase(settings, "computing second bound");
        let phase_start = Instant::now();
        let t_minus_1 = supp1.saturating_sub(1);
        let eraeps2 = compute_eraeps_itemsets(&q, t_minus_1, s, settings.delta)?;
        (Some(eraeps2), elapsed_ms(phase_start))
    };
    let cfis2 = q.len();

    let (r, supp, freq2, supp2) = match eraeps2 {
        Some(e) if e.rho < eraeps1.rho => {
            let freq2 = (settings.theta - e.rho).max(1.0 / s as f64);
            let supp2 = ((freq2 * s as f64).ceil() as u64).max(1);
            (e.rho, supp2, Some(freq2), Some(supp2))
        }
        Some(e) => {
            let freq2 = (settings.theta - e.rho).max(1.0 / s as f64);
            let supp2 = ((freq2 * s as f64).ceil() as u64).max(1);
            (eraeps1.rho, supp1, Some(freq2), Some(supp2))
        }
        None => (eraeps1.rho, supp1, None, None),
    };

    log_phase(settings, &format!("pruning Q to support >= {supp}"));
    let phase_start = Instant::now();
    q.retain(|a| a.info.sp >= supp);
    let prune_ms = elapsed_ms(phase_start);

    let sample_write_warning = match &settings.sample_output {
        Some(path) => sample::write_sample_file(&sample, path).err().map(|e| e.to_string()),
        None => None,
    };

    let total_ms = elapsed_ms(total_start);
    let eps = 2.0 * r;

    let report = RunReport {
        omega1: eraeps1.omega,
        rho1: eraeps1.rho,
        freq1,
        supp1,
        cfis1,
        omega2: eraeps2.map(|e| e.omega),
        rho2: eraeps2.map(|e| e.rho),
        freq2,
        supp2,
        cfis2: eraeps2.map(|_| cfis2),
        eps,
        timings: RunTimings {
            total_ms,
            create_sample_ms,
            get_rho1_ms,
            mine_ms,
            get_rho2_ms,
            prune_ms,
        },
        sample_write_warning,
    };

    Ok((q, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write as _;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("amira_pipeline_test_{}_{}.dat", std::process::id(), name));
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn base_settings(dataset: std::path::PathBuf, samplesize: u64) -> Settings {
        Settings {
            delta: 0.1,
            theta: 0.3,
            samplesize,
            dataset,
            printclosed: true,
            skipsecond: false,
            sample_output: None,
            dataset_size_override: None,
            ignore_freq: None,
            verbose: false,
            json: false,
            full: true,
            no_itemsets: false,
            help: false,
        }
    }

    #[test]
    fn full_pipeline_runs_end_to_end_on_small_dataset() {
        let path = write_temp("small", "1 2\n1 2\n1 2 3\n2 3\n1\n");
        let settings = base_settings(path.clone(), 5);
        let mut rng = sampler::rng_from_seed(7);
        let (q, report) = run_pipeline(&settings, &mut rng).unwrap();
        assert!(report.eps > 0.0);
        assert!(report.eps.is_finite());
        assert!(!q.is_empty());
        assert!(q.iter().all(|a| a.info.sp > 0));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn skipsecond_short_circuits_the_second_bound() {
        let path = write_temp("skip", "1 2\n1 2\n1 2 3\n2 3\n1\n");
        let mut settings = base_settings(path.clone(), 5);
        settings.skipsecond = true;
        let mut rng = sampler::rng_from_seed(7);
        let (_, report) = run_pipeline(&settings, &mut rng).unwrap();
        assert!(report.omega2.is_none());
        assert!(report.rho2.is_none());
        assert_eq!(report.eps, 2.0 * report.rho1);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn whole_dataset_pass_is_deterministic_given_seed() {
        let path = write_temp("det", "1 2 3\n1 2\n2 3\n1 3\n");
        let settings = base_settings(path.clone(), 4);
        let (_, report_a) = run_pipeline(&settings, &mut sampler::rng_from_seed(1)).unwrap();
        let (_, report_b) = run_pipeline(&settings, &mut sampler::rng_from_seed(1)).unwrap();
        assert_eq!(report_a.eps, report_b.eps);
        std::fs::remove_file(&path).ok();
    }
}
