//! `amira-compare`: reports the differences between two itemset files
//! (§4.13), grounded in the original `compare_fis.cpp` collaborator.

use std::collections::BTreeMap;
use std::fs;
use std::process::ExitCode;

use anyhow::Context;

use amira::itemset::{parse_itemset_line, Itemset};
use amira::AmiraError;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("amira-compare: {e:#}");
            let code = e.downcast_ref::<AmiraError>().map(AmiraError::exit_code).unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn read_itemset_file(path: &str) -> anyhow::Result<BTreeMap<Itemset, u64>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| AmiraError::io(path, e))
        .with_context(|| format!("reading {path}"))?;
    let mut map = BTreeMap::new();
    for (lineno, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let (itemset, supp) = parse_itemset_line(line).ok_or_else(|| AmiraError::Parse {
            path: path.into(),
            line: lineno + 1,
            reason: format!("malformed itemset line `{line}`"),
        })?;
        map.insert(itemset, supp);
    }
    Ok(map)
}

fn run(args: &[String]) -> anyhow::Result<()> {
    if args.len() != 2 {
        return Err(AmiraError::Input("usage: amira-compare left right".to_string()).into());
    }
    let left = read_itemset_file(&args[0])?;
    let right = read_itemset_file(&args[1])?;

    let mut only_left = Vec::new();
    let mut only_right = Vec::new();
    let mut both = Vec::new();

    for (itemset, &lsupp) in &left {
        match right.get(itemset) {
            Some(&rsupp) => both.push((itemset.clone(), lsupp, rsupp)),
            None => only_left.push((itemset.clone(), lsupp)),
        }
    }
    for (itemset, &rsupp) in &right {
        if !left.contains_key(itemset) {
            only_right.push((itemset.clone(), rsupp));
        }
    }

    println!("only in left ({}):", only_left.len());
    for (itemset, supp) in &only_left {
        println!("  {} ({supp})", itemset.to_plain_string());
    }
    println!("only in right ({}):", only_right.len());
    for (itemset, supp) in &only_right {
        println!("  {} ({supp})", itemset.to_plain_string());
    }
    println!("in both ({}):", both.len());
    for (itemset, lsupp, rsupp) in &both {
        if lsupp == rsupp {
            println!("  {} ({lsupp})", itemset.to_plain_string());
        } else {
            println!("  {} (left={lsupp}, right={rsupp})", itemset.to_plain_string());
        }
    }

    let union = left.len() + only_right.len();
    let jaccard = if union == 0 { 1.0 } else { both.len() as f64 / union as f64 };
    println!(
        "|left|={} |right|={} |intersection|={} jaccard={jaccard:.4}",
        left.len(),
        right.len(),
        both.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("amira_compare_test_{}_{}.dat", std::process::id(), name));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn read_itemset_file_parses_lines() {
        let path = write_temp("a", "1 2 (5)\n3 (2)\n");
        let map = read_itemset_file(path.to_str().unwrap()).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&Itemset::new(vec![1, 2])], 5);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_line_is_a_parse_error() {
        let path = write_temp("b", "not an itemset line\n");
        assert!(read_itemset_file(path.to_str().unwrap()).is_err());
        std::fs::remove_file(&path).ok();
    }
}
