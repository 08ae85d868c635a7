use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use rollphys_io::{write_rig_json, ChairRigDef};

#[derive(Parser, Debug)]
#[command(name = "rig_make", version, about = "Scaffold a chair rig JSON with stock tuning")]
struct Opts {
    /// Output .chair.json
    out: PathBuf,

    /// Rig name stored in the file
    #[arg(long, default_value = "stock")]
    name: String,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let opt = Opts::parse();
    let rig = ChairRigDef::stock(&opt.name);
    write_rig_json(&rig, &opt.out, opt.pretty)?;
    println!("Chair rig: {}", opt.out.display());
    Ok(())
}
