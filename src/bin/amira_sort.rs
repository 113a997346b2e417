//! `amira-sort`: reorders an itemset file by descending support (§4.13),
//! grounded in the original `sort_fis.cpp` collaborator.

use std::fs;
use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;

use amira::itemset::parse_itemset_line;
use amira::AmiraError;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("amira-sort: {e:#}");
            let code = e.downcast_ref::<AmiraError>().map(AmiraError::exit_code).unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    if args.len() != 1 {
        return Err(AmiraError::Input("usage: amira-sort file".to_string()).into());
    }
    let path = args[0].as_str();
    let contents = fs::read_to_string(path)
        .map_err(|e| AmiraError::io(path, e))
        .with_context(|| format!("reading {path}"))?;

    let mut entries = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (itemset, supp) = parse_itemset_line(line).ok_or_else(|| AmiraError::Parse {
            path: path.into(),
            line: lineno + 1,
            reason: format!("malformed itemset line `{line}`"),
        })?;
        entries.push((itemset, supp));
    }

    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.items().cmp(b.0.items())));

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for (itemset, supp) in &entries {
        writeln!(handle, "{} ({supp})", itemset.to_plain_string())
            .map_err(|e| AmiraError::io("<stdout>", e))?;
    }
    Ok(())
}
