//! `amira`: the CLI driver (§4.11). Parses the documented flag/positional
//! surface, runs the pipeline, and renders the result as plaintext or JSON.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;

use amira::cli::{Settings, USAGE};
use amira::expand::expand_to_fis;
use amira::itemset::{ItemsetInfo, ItemsetWithInfo, Origin};
use amira::output;
use amira::pipeline::run_pipeline;
use amira::sampler::rng_from_entropy;
use amira::AmiraError;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(warned) => {
            if warned {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("amira: {e:#}");
            let code = e.downcast_ref::<AmiraError>().map(AmiraError::exit_code).unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<bool> {
    let settings = Settings::from_args(args).context("parsing arguments")?;
    if settings.help {
        println!("usage: {USAGE}");
        return Ok(false);
    }

    let mut rng = rng_from_entropy();
    let (q, report) = run_pipeline(&settings, &mut rng).context("running the mining pipeline")?;

    let q: Vec<ItemsetWithInfo> = if settings.printclosed {
        q
    } else {
        expand_to_fis(&q)
            .into_iter()
            .map(|(itemset, sp)| ItemsetWithInfo {
                itemset,
                info: ItemsetInfo::with_support(sp),
                origin: Origin::Mined,
            })
            .collect()
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    let render_result = if settings.json {
        output::render_json(&mut handle, &settings, &report, &q)
    } else {
        output::render_plaintext(&mut handle, &settings, &report, &q)
    };
    render_result
        .map_err(|e| AmiraError::io("<stdout>", e))
        .context("writing output")?;
    handle
        .flush()
        .map_err(|e| AmiraError::io("<stdout>", e))
        .context("flushing output")?;

    if let Some(reason) = &report.sample_write_warning {
        eprintln!("amira: warning: failed to write sample file: {reason}");
        return Ok(true);
    }

    Ok(false)
}
