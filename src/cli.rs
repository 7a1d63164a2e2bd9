use clap::Parser;

/// Command line surface: one positional input plus a verbosity switch.
#[derive(Parser, Debug)]
#[command(name = "certinfo", version, about = "X.509 certificate inspector")]
pub struct Cli {
    /// Certificate source: file path, device path, host://name[:port],
    /// https://host[:port], or bare host:port. Reads stdin when omitted.
    pub input: Option<String>,

    /// Show auxiliary fields (validation type, raw validity bounds)
    #[arg(short, long)]
    pub verbose: bool,
}
