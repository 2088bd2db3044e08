//! Build script that renders the `lvsnap(8)` manual page into `OUT_DIR`.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli/mod.rs"]
mod cli;

/// Administrative commands live in section 8.
const MAN_SECTION: &str = "8";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    for watched in ["build.rs", "src/cli/mod.rs"] {
        writeln!(stdout, "cargo:rerun-if-changed={watched}")?;
    }

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR was not set"))?;

    let page = Man::new(cli::Cli::command())
        .section(MAN_SECTION)
        .manual("System Administration");
    let mut rendered = Vec::new();
    page.render(&mut rendered)?;
    fs::write(out_dir.join(format!("lvsnap.{MAN_SECTION}")), rendered)?;

    Ok(())
}
