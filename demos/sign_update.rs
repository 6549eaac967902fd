//! Send a config to a real sign over USB.
//!
//! Needs the `usb` feature. Set `SIGNWIRE_PROFILE` to a JSON device profile
//! to override the stock ids, endpoint or label limit.
//!
//! ```text
//! cargo run --features usb --example sign_update -- -i sign.conf
//! cargo run --features usb --example sign_update -- -u sign.conf --legacy
//! ```

use std::fs::File;
use std::io::BufReader;

use signwire::{
    Compiler, CompilerOptions, DeviceProfile, RunMode, SessionBuilder, UsbFlavor, UsbTransport,
};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (mode, path) = match args.as_slice() {
        [flag, path, ..] if flag == "-i" => (RunMode::Initialize, path),
        [flag, path, ..] if flag == "-u" => (RunMode::Update, path),
        _ => {
            eprintln!("usage: sign_update <-i|-u> <config> [--legacy]");
            std::process::exit(1);
        }
    };
    let flavor = if args.iter().any(|a| a == "--legacy") {
        UsbFlavor::LegacyDevice
    } else {
        UsbFlavor::RealDevice
    };

    let profile = match std::env::var("SIGNWIRE_PROFILE") {
        Ok(profile_path) => DeviceProfile::load(profile_path)?,
        Err(_) => DeviceProfile::default(),
    };

    let frames = Compiler::new()
        .options(CompilerOptions::from_profile(&profile))
        .compile_reader(BufReader::new(File::open(path)?))?;
    info!("Compiled {} frames", frames.len());

    let transport = UsbTransport::open(flavor, &profile)?;
    let mut session = SessionBuilder::new().profile(&profile).build(transport);
    session.run(&frames, mode)?;
    info!("Sign updated");
    Ok(())
}
