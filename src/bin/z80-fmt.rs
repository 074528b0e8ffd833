use std::io::{BufRead, BufReader, Read};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use z80_disasm::Instr;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render Z80 instruction descriptors (JSON lines of {fmt, args}) as text"
)]
struct Opts {
    /// Emit one JSON object per line instead of plain text
    #[arg(long)]
    json: bool,
    /// Report bad descriptors and continue instead of stopping
    #[arg(long)]
    keep_going: bool,
    /// Descriptor file, or `-` for stdin
    #[arg(value_name = "FILE", default_value = "-")]
    input: String,
}

#[derive(Serialize)]
struct LineOut<'a> {
    line: &'a str,
}

fn open(input: &str) -> Result<Box<dyn Read>> {
    if input == "-" {
        return Ok(Box::new(std::io::stdin()));
    }
    let file = std::fs::File::open(input).with_context(|| format!("opening {input}"))?;
    Ok(Box::new(file))
}

fn render(src: &str) -> Result<String> {
    let instr: Instr = serde_json::from_str(src)?;
    Ok(instr.render()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Opts::parse();
    let reader = BufReader::new(open(&opts.input)?);

    let mut failed = 0usize;
    for (n, src) in reader.lines().enumerate() {
        let src = src?;
        if src.trim().is_empty() {
            continue;
        }
        match render(&src) {
            Ok(line) if opts.json => println!("{}", serde_json::to_string(&LineOut { line: &line })?),
            Ok(line) => println!("{line}"),
            Err(err) if opts.keep_going => {
                tracing::warn!(line = n + 1, %err, "skipping descriptor");
                failed += 1;
            }
            Err(err) => return Err(err.context(format!("{}:{}", opts.input, n + 1))),
        }
    }

    anyhow::ensure!(failed == 0, "{failed} descriptor(s) could not be rendered");
    Ok(())
}
