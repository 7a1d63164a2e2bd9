use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use termcolor::{ColorChoice, StandardStream};
use x509_parser::pem::parse_x509_pem;

mod cli;
mod decode;
mod fetch;
mod input;
mod pem;
mod print;
mod validity;

use crate::cli::Cli;
use crate::decode::decode;
use crate::fetch::acquire;
use crate::input::resolve;
use crate::pem::split_certificates;
use crate::print::render;

/// Entry point wiring CLI, acquisition, decoding, and rendering.

fn main() -> Result<()> {
    let cli = Cli::parse();

    let blob = match &cli.input {
        Some(raw) => acquire(&resolve(raw))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read certificate data from stdin")?;
            buf
        }
    };

    let text = String::from_utf8(blob).context("input does not contain PEM text")?;
    let segments = split_certificates(&text);

    // Redirected output stays plain; only an interactive terminal gets color.
    let choice = if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?
        .as_secs() as i64;

    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            writeln!(&mut stdout, "{}", "-".repeat(40))?;
        }
        let (_, parsed_pem) = parse_x509_pem(segment.as_bytes())
            .map_err(|e| anyhow!("failed to decode PEM certificate {}: {}", index + 1, e))?;
        let cert = parsed_pem
            .parse_x509()
            .map_err(|e| anyhow!("failed to parse certificate {}: {}", index + 1, e))?;
        let decoded = decode(&cert, now, cli.verbose);
        render(&mut stdout, &decoded)?;
    }

    Ok(())
}
