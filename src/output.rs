//! Plaintext and JSON renderers for the settings/run/runtimes/itemsets
//! blocks (§4.12). Both share the same four data sources: [`Settings`],
//! [`RunReport`], and the (possibly expanded) final `Q`.

use std::io::{self, Write};

use serde_json::{json, Map, Value};

use crate::cli::Settings;
use crate::itemset::{format_itemset_line, ItemsetWithInfo};
use crate::pipeline::RunReport;

fn opt_string<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "n/a".to_string())
}

/// Render the full run output as plaintext to `out`.
pub fn render_plaintext(
    out: &mut impl Write,
    settings: &Settings,
    report: &RunReport,
    q: &[ItemsetWithInfo],
) -> io::Result<()> {
    if settings.full {
        writeln!(out, "algorithm: amira")?;
        writeln!(out, "dataset: {}", settings.dataset.display())?;
        writeln!(out, "samplesize: {}", settings.samplesize)?;
        writeln!(out, "minimum_frequency: {}", settings.theta)?;
        writeln!(out, "failure_probability: {}", settings.delta)?;
        writeln!(out, "printclosed: {}", settings.printclosed)?;
        writeln!(out, "skipsecond: {}", settings.skipsecond)?;
        writeln!(
            out,
            "sample: {}",
            settings.sample_output.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
        )?;

        writeln!(out, "omega1: {}", report.omega1)?;
        writeln!(out, "rho1: {}", report.rho1)?;
        writeln!(out, "freq1: {}", report.freq1)?;
        writeln!(out, "supp1: {}", report.supp1)?;
        writeln!(out, "cfis1: {}", report.cfis1)?;
        writeln!(out, "omega2: {}", opt_string(report.omega2))?;
        writeln!(out, "rho2: {}", opt_string(report.rho2))?;
        writeln!(out, "freq2: {}", opt_string(report.freq2))?;
        writeln!(out, "supp2: {}", opt_string(report.supp2))?;
        writeln!(out, "cfis2: {}", opt_string(report.cfis2))?;
    }

    writeln!(out, "eps: {}", report.eps)?;

    if settings.full {
        writeln!(out, "total_ms: {}", report.timings.total_ms)?;
        writeln!(out, "create_sample_ms: {}", report.timings.create_sample_ms)?;
        writeln!(out, "get_rho1_ms: {}", report.timings.get_rho1_ms)?;
        writeln!(out, "mine_ms: {}", report.timings.mine_ms)?;
        writeln!(out, "get_rho2_ms: {}", report.timings.get_rho2_ms)?;
        writeln!(out, "prune_ms: {}", report.timings.prune_ms)?;
    }

    if !settings.no_itemsets {
        for a in q {
            writeln!(out, "{}", format_itemset_line(&a.itemset, a.info.sp))?;
        }
    }

    Ok(())
}

/// Render the same run output as a single pretty-printed JSON document.
pub fn render_json(
    out: &mut impl Write,
    settings: &Settings,
    report: &RunReport,
    q: &[ItemsetWithInfo],
) -> io::Result<()> {
    let mut root = Map::new();

    if settings.full {
        let mut settings_block = Map::new();
        settings_block.insert("algorithm".to_string(), json!("amira"));
        settings_block.insert("dataset".to_string(), json!(settings.dataset.display().to_string()));
        settings_block.insert("samplesize".to_string(), json!(settings.samplesize));
        settings_block.insert("minimum_frequency".to_string(), json!(settings.theta));
        settings_block.insert("failure_probability".to_string(), json!(settings.delta));
        settings_block.insert("printclosed".to_string(), json!(settings.printclosed));
        settings_block.insert("skipsecond".to_string(), json!(settings.skipsecond));
        settings_block.insert(
            "sample".to_string(),
            json!(settings.sample_output.as_ref().map(|p| p.display().to_string())),
        );
        root.insert("settings".to_string(), Value::Object(settings_block));

        let mut run_block = Map::new();
        run_block.insert("omega1".to_string(), json!(report.omega1));
        run_block.insert("rho1".to_string(), json!(report.rho1));
        run_block.insert("freq1".to_string(), json!(report.freq1));
        run_block.insert("supp1".to_string(), json!(report.supp1));
        run_block.insert("cfis1".to_string(), json!(report.cfis1));
        run_block.insert("omega2".to_string(), json!(report.omega2));
        run_block.insert("rho2".to_string(), json!(report.rho2));
        run_block.insert("freq2".to_string(), json!(report.freq2));
        run_block.insert("supp2".to_string(), json!(report.supp2));
        run_block.insert("cfis2".to_string(), json!(report.cfis2));
        root.insert("run".to_string(), Value::Object(run_block));

        let mut runtimes = Map::new();
        runtimes.insert("total".to_string(), json!(report.timings.total_ms));
        runtimes.insert("create_sample".to_string(), json!(report.timings.create_sample_ms));
        runtimes.insert("get_rho1".to_string(), json!(report.timings.get_rho1_ms));
        runtimes.insert("mine".to_string(), json!(report.timings.mine_ms));
        runtimes.insert("get_rho2".to_string(), json!(report.timings.get_rho2_ms));
        runtimes.insert("prune".to_string(), json!(report.timings.prune_ms));
        root.insert("runtimes".to_string(), Value::Object(runtimes));
    }

    root.insert("eps".to_string(), json!(report.eps));

    if !settings.no_itemsets {
        let mut itemsets = Map::new();
        for a in q {
            itemsets.insert(a.itemset.to_json_key(), json!(a.info.sp));
        }
        root.insert("itemsets".to_string(), Value::Object(itemsets));
    }

    serde_json::to_writer_pretty(out, &Value::Object(root)).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset::{Itemset, ItemsetInfo, Origin};
    use crate::pipeline::RunTimings;
    use std::path::PathBuf;

    fn settings() -> Settings {
        Settings {
            delta: 0.1,
            theta: 0.2,
            samplesize: 100,
            dataset: PathBuf::from("data.dat"),
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

    fn report() -> RunReport {
        RunReport {
            omega1: 0.1,
            rho1: 0.05,
            freq1: 0.15,
            supp1: 15,
            cfis1: 3,
            omega2: Some(0.08),
            rho2: Some(0.04),
            freq2: Some(0.16),
            supp2: Some(16),
            cfis2: Some(4),
            eps: 0.08,
            timings: RunTimings {
                total_ms: 10,
                create_sample_ms: 2,
                get_rho1_ms: 3,
                mine_ms: 2,
                get_rho2_ms: 2,
                prune_ms: 1,
            },
            sample_write_warning: None,
        }
    }

    fn sample_q() -> Vec<ItemsetWithInfo> {
        vec![ItemsetWithInfo {
            itemset: Itemset::new(vec![1, 2]),
            info: ItemsetInfo::with_support(20),
            origin: Origin::Mined,
        }]
    }

    #[test]
    fn plaintext_includes_eps_and_itemset_lines() {
        let mut buf = Vec::new();
        render_plaintext(&mut buf, &settings(), &report(), &sample_q()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("eps: 0.08"));
        assert!(text.contains("1 2 (20)"));
        assert!(text.contains("cfis2: 4"));
    }

    #[test]
    fn plaintext_with_no_itemsets_flag_omits_itemset_lines() {
        let mut s = settings();
        s.no_itemsets = true;
        let mut buf = Vec::new();
        render_plaintext(&mut buf, &s, &report(), &sample_q()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("1 2 (20)"));
    }

    #[test]
    fn json_round_trips_through_serde_json() {
        let mut buf = Vec::new();
        render_json(&mut buf, &settings(), &report(), &sample_q()).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["eps"], json!(0.08));
        assert_eq!(value["itemsets"]["1_2"], json!(20));
        assert_eq!(value["run"]["cfis1"], json!(3));
    }

    #[test]
    fn json_renders_none_fields_as_null_when_second_bound_skipped() {
        let mut r = report();
        r.omega2 = None;
        r.rho2 = None;
        r.cfis2 = None;
        let mut buf = Vec::new();
        render_json(&mut buf, &settings(), &r, &sample_q()).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert!(value["run"]["omega2"].is_null());
    }
}
