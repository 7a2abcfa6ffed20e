//! Shell for the relstore relation engine.
//!
//! Usage:
//!   relstore [options]              Start interactive REPL
//!   relstore [options] <file>       Run a script from a file
//!
//! Options:
//!   --block-size N    Domain values per arena block (default 1024)
//!   --log FILTER      Tracing filter, e.g. `debug` (default: $RELSTORE_LOG or `warn`)

mod script;

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::{env, fs};

use relstore_core::{DomainValue, Relation};
use tracing_subscriber::EnvFilter;

use crate::script::{Session, parse_query, pattern_signature};

#[derive(Debug, Default)]
struct Options {
    block_size: Option<usize>,
    log: Option<String>,
    file: Option<String>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => options.help = true,
            "--block-size" => {
                let value = args.next().ok_or("--block-size needs a value")?;
                let size = value
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| format!("invalid block size: {value}"))?;
                options.block_size = Some(size);
            }
            "--log" => options.log = Some(args.next().ok_or("--log needs a filter")?),
            _ if arg.starts_with('-') => return Err(format!("unknown option: {arg}")),
            _ => options.file = Some(arg),
        }
    }
    Ok(options)
}

fn init_tracing(directive: Option<&str>) {
    let filter = directive
        .map(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::try_from_env("RELSTORE_LOG").ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    if options.help {
        println!("relstore: in-memory relation store\n");
        println!("Usage: relstore [--block-size N] [--log FILTER] [file]\n");
        println!("  file    Run a relstore script");
        println!("  (none)  Start interactive REPL");
        return;
    }

    init_tracing(options.log.as_deref());
    let session = Session::new(options.block_size.unwrap_or(relstore_core::BLOCK_SIZE));

    match options.file {
        Some(path) => run_file(&path, session),
        None => repl(session),
    }
}

fn run_file(path: &str, mut session: Session) {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error reading {path}: {e}");
            std::process::exit(1);
        }
    };

    match session.eval_source(&source) {
        Ok(()) => dump_all(&session),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn repl(mut session: Session) {
    println!("relstore shell");
    println!("Type :help for commands, :quit to exit.\n");

    let stdin = io::stdin();
    let mut prev_counts: HashMap<String, usize> = HashMap::new();

    loop {
        eprint!(">> ");
        io::stderr().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            eprintln!();
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with(':') {
            let (cmd, arg) = trimmed
                .split_once(' ')
                .map_or((trimmed, ""), |(a, b)| (a, b.trim()));

            match cmd {
                ":help" | ":h" => print_help(),
                ":quit" | ":exit" => break,
                ":clear" => {
                    session.clear();
                    prev_counts.clear();
                    eprintln!("(cleared)");
                }
                ":dump" | ":d" => {
                    if arg.is_empty() {
                        dump_all(&session);
                    } else {
                        match session.relation(arg) {
                            Some(rel) => print_tuples(arg, rel.iter().collect()),
                            None => eprintln!("  unknown relation: {arg}"),
                        }
                    }
                }
                ":query" | ":q" => {
                    if arg.is_empty() {
                        eprintln!("usage: :query rel(pattern, ...)");
                    } else {
                        query_relation(&session, arg);
                    }
                }
                ":size" | ":count" => match session.relation(arg) {
                    Some(rel) => eprintln!("  {arg}: {}", rel.len()),
                    None => eprintln!("  unknown relation: {arg}"),
                },
                ":purge" => match session.purge(arg) {
                    Ok(()) => show_changes(&session, &mut prev_counts),
                    Err(e) => eprintln!("error: {e}"),
                },
                ":merge" => match arg.split_once(' ') {
                    Some((dst, src)) => match session.merge(dst.trim(), src.trim()) {
                        Ok(_) => show_changes(&session, &mut prev_counts),
                        Err(e) => eprintln!("error: {e}"),
                    },
                    None => eprintln!("usage: :merge <dst> <src>"),
                },
                ":catalog" => match session.relation(arg) {
                    Some(rel) => match serde_json::to_string_pretty(&**rel.catalog()) {
                        Ok(json) => println!("{json}"),
                        Err(e) => eprintln!("error: {e}"),
                    },
                    None => eprintln!("  unknown relation: {arg}"),
                },
                ":relations" | ":rels" => list_relations(&session),
                _ => eprintln!("unknown command: {cmd} (type :help for commands)"),
            }
            continue;
        }

        match session.eval_line(trimmed) {
            Ok(()) => show_changes(&session, &mut prev_counts),
            Err(e) => eprintln!("error: {e}"),
        }
    }
}

fn print_help() {
    eprintln!("Commands:");
    eprintln!("  :help              Show this help");
    eprintln!("  :relations         List all relations and their sizes");
    eprintln!("  :dump [rel]        Show tuples of one or all relations");
    eprintln!("  :query rel(1, _)   Show tuples matching a pattern");
    eprintln!("  :size <rel>        Show number of tuples in a relation");
    eprintln!("  :purge <rel>       Remove every tuple of a relation");
    eprintln!("  :merge <dst> <src> Insert every tuple of src into dst");
    eprintln!("  :catalog <rel>     Show a relation's index orderings as JSON");
    eprintln!("  :clear             Forget all relations");
    eprintln!("  :quit              Exit the REPL");
    eprintln!();
    eprintln!("Statements:");
    eprintln!("  .decl name(arity) [tags...] [search c1,c2 ...]");
    eprintln!("  name(v1, ..., vn).");
}

fn show_changes(session: &Session, prev_counts: &mut HashMap<String, usize>) {
    let mut any_change = false;

    for name in session.names() {
        let count = session.relation(name).map_or(0, Relation::len);
        let prev = prev_counts.get(name).copied().unwrap_or(0);
        prev_counts.insert(name.to_string(), count);

        if count != prev {
            let delta = count as isize - prev as isize;
            let sign = if delta > 0 { "+" } else { "" };
            eprintln!(
                "  {name}: {count} tuple{} ({sign}{delta})",
                if count == 1 { "" } else { "s" }
            );
            any_change = true;
        }
    }

    if !any_change {
        eprintln!("  (ok)");
    }
}

fn list_relations(session: &Session) {
    for name in session.names() {
        let Some(rel) = session.relation(name) else {
            continue;
        };
        println!(
            "  {name}/{}: {} tuple{} ({} index{})",
            rel.arity(),
            rel.len(),
            if rel.len() == 1 { "" } else { "s" },
            rel.indices().len(),
            if rel.indices().len() == 1 { "" } else { "es" }
        );
    }
}

fn query_relation(session: &Session, input: &str) {
    let (name, pats) = match parse_query(input) {
        Ok(query) => query,
        Err(e) => {
            eprintln!("error: {e}");
            return;
        }
    };
    let Some(rel) = session.relation(name) else {
        eprintln!("  unknown relation: {name}");
        return;
    };
    if pats.len() != rel.arity() {
        eprintln!("  {name} has arity {}, pattern has {}", rel.arity(), pats.len());
        return;
    }

    let (pattern, signature) = pattern_signature(&pats);
    if rel.find_index(signature).is_none() {
        tracing::debug!(relation = name, %signature, "no index serves query, scanning");
    }
    let tuples = rel.matching(&pattern, signature);
    if tuples.is_empty() {
        eprintln!("  (no matches)");
        return;
    }
    print_tuples(name, tuples);
}

fn dump_all(session: &Session) {
    let mut first = true;
    for name in session.names() {
        if let Some(rel) = session.relation(name)
            && !rel.is_empty()
        {
            if !first {
                println!();
            }
            print_tuples(name, rel.iter().collect());
            first = false;
        }
    }
}

fn print_tuples(name: &str, mut tuples: Vec<&[DomainValue]>) {
    println!(
        "{name} ({} tuple{}):",
        tuples.len(),
        if tuples.len() == 1 { "" } else { "s" }
    );

    tuples.sort();
    for tuple in tuples {
        let values: Vec<String> = tuple.iter().map(DomainValue::to_string).collect();
        println!("  ({})", values.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let options = parse_args(args(&["--block-size", "64", "--log", "debug", "in.rs"])).unwrap();
        assert_eq!(options.block_size, Some(64));
        assert_eq!(options.log.as_deref(), Some("debug"));
        assert_eq!(options.file.as_deref(), Some("in.rs"));
        assert!(!options.help);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&["--block-size", "0"])).is_err());
        assert!(parse_args(args(&["--block-size"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["-h"])).unwrap().help);
    }
}
