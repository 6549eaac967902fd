//! Dry run - compile a config and "send" it to a sign that isn't there.
//!
//! Every transport call is logged instead of hitting USB, so this shows what
//! a real run would do.
//!
//! ```text
//! cargo run --example null_sign -- -i sign.conf
//! echo 'txt a Hello' | cargo run --example null_sign -- -u
//! ```

use std::fs::File;
use std::io::{self, BufReader};

use signwire::{Compiler, NullTransport, RunMode, SessionBuilder};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let mode = match args.next().as_deref() {
        Some("-i") => RunMode::Initialize,
        Some("-u") => RunMode::Update,
        _ => {
            eprintln!("usage: null_sign <-i|-u> [config]");
            std::process::exit(1);
        }
    };

    let compiler = Compiler::new();
    let frames = match args.next() {
        Some(path) => compiler.compile_reader(BufReader::new(File::open(path)?))?,
        None => compiler.compile_reader(io::stdin().lock())?,
    };
    info!("Compiled {} frames", frames.len());

    let mut session = SessionBuilder::new().build(NullTransport::new());
    session.run(&frames, mode)?;
    info!("Done: {} bytes sent", session.transport().sent_bytes());
    Ok(())
}
