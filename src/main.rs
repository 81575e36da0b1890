use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use suffix_tree::{SuffixTree, DEFAULT_SENTINEL};

/// Build a suffix tree over a text and answer substring queries against it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read the text from this file instead of the first positional argument
    #[arg(long)]
    file: Option<PathBuf>,

    /// Terminator appended to the text; must not occur in it
    #[arg(long, default_value_t = DEFAULT_SENTINEL)]
    sentinel: char,

    /// Print the starting offsets of every occurrence
    #[arg(long)]
    positions: bool,

    /// Dump the tree shape before answering queries
    #[arg(long)]
    print_tree: bool,

    /// The text (unless --file is given) followed by the queries
    values: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let (text, queries) = match &args.file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            (text, args.values.as_slice())
        }
        None => match args.values.split_first() {
            Some((text, queries)) => (text.clone(), queries),
            None => bail!("no text given: pass it as the first argument or use --file"),
        },
    };

    let tree = SuffixTree::build_with_sentinel(&text, args.sentinel)
        .context("failed to build the suffix tree")?;
    info!(
        "indexed {} characters into {} nodes",
        tree.len(),
        tree.node_count()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.print_tree {
        write!(out, "{tree}")?;
    }
    for query in queries {
        if args.positions {
            let positions = tree.find_all(query);
            writeln!(out, "{query}\t{}\t{positions:?}", !positions.is_empty())?;
        } else {
            writeln!(out, "{query}\t{}", tree.contains(query))?;
        }
    }
    Ok(())
}
