use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use rollphys_io::{hex32, read_rig_json, rig_hash};

#[derive(Parser, Debug)]
#[command(name = "rig_hash", version, about = "Validate a chair rig and print its content hash")]
struct Opts {
    /// Input .chair.json
    input: PathBuf,
}

fn main() -> Result<()> {
    let opt = Opts::parse();
    let rig = read_rig_json(&opt.input)?;
    rig.build()?; // surface validation errors before hashing
    println!("{}  {}", hex32(rig_hash(&rig)), rig.name);
    Ok(())
}
