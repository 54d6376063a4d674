//! ringfs CLI tool
//!
//! Command-line interface for formatting, appending to, and inspecting
//! ringfs flash images stored as plain files on disk.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use ringfs::{PartitionConfig, RingFs};
use ringfs_sim::MemFlash;

/// ringfs CLI tool
#[derive(Parser, Debug)]
#[command(author, version, about = "CLI tool for ringfs flash images")]
pub struct Cli {
    /// Path to the flash image file
    image: PathBuf,

    /// Bytes per sector, including the 8-byte sector header
    #[arg(short = 's', long, default_value_t = 4096)]
    sector_size: u32,

    /// Number of sectors in the partition
    #[arg(short = 'c', long, default_value_t = 8)]
    sector_count: u32,

    /// Record size in bytes. Must be one of the sizes compiled into this
    /// binary (see [`run`]); ringfs's `OBJECT_SIZE` is a const generic, so
    /// it cannot be chosen freely at runtime.
    #[arg(short = 'o', long, default_value_t = 32)]
    object_size: u32,

    /// Schema version stamped into sector headers
    #[arg(long, default_value_t = 1)]
    schema_version: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new image file and format it as an empty ring
    Init,
    /// Append one record, read as raw bytes from a file (or `-` for stdin)
    Append {
        /// File to read the record payload from, or `-` for stdin
        payload: PathBuf,
    },
    /// Fetch the next unread record and print it as hex
    Fetch,
    /// Discard everything fetched so far
    Discard,
    /// Discard exactly one record without fetching
    DiscardOne,
    /// Reset the read cursor back to the oldest undiscarded record
    Rewind,
    /// Print sector/slot headers and read/write/cursor positions
    Dump,
    /// Print capacity and record-count statistics
    Stats,
}

/// Parse the CLI and dispatch to the matching subcommand.
///
/// `OBJECT_SIZE` is a const generic on [`RingFs`], so it cannot be chosen
/// freely at runtime: we match `--object-size` against the fixed set of
/// sizes this binary was built to support and monomorphize [`run_sized`]
/// for whichever one matches.
pub fn run(cli: Cli) -> Result<()> {
    let cfg = PartitionConfig {
        sector_size: cli.sector_size,
        sector_offset: 0,
        sector_count: cli.sector_count,
        schema_version: cli.schema_version,
    };
    let image = cli.image;
    let command = cli.command;

    match cli.object_size {
        4 => run_sized::<4>(&image, cfg, command),
        8 => run_sized::<8>(&image, cfg, command),
        16 => run_sized::<16>(&image, cfg, command),
        32 => run_sized::<32>(&image, cfg, command),
        64 => run_sized::<64>(&image, cfg, command),
        128 => run_sized::<128>(&image, cfg, command),
        256 => run_sized::<256>(&image, cfg, command),
        other => bail!(
            "unsupported --object-size {other}; this binary supports 4, 8, 16, 32, 64, 128, 256"
        ),
    }
}

fn run_sized<const N: usize>(image: &PathBuf, cfg: PartitionConfig, command: Command) -> Result<()> {
    match command {
        Command::Init => {
            let flash = MemFlash::new(cfg.sector_size, cfg.sector_count);
            let mut fs: RingFs<_, N> = RingFs::new(flash, cfg);
            fs.format().context("formatting new image")?;
            save_image(image, fs.into_flash())
        }
        Command::Append { payload } => {
            let mut fs = load_image::<N>(image, cfg)?;
            let bytes = read_payload(&payload, N as u32)?;
            fs.append(&bytes).context("appending record")?;
            save_image(image, fs.into_flash())
        }
        Command::Fetch => {
            let mut fs = load_image::<N>(image, cfg)?;
            let mut out = vec![0u8; N];
            let found = fs.fetch(&mut out).context("fetching record")?;
            if found {
                println!("{}", hex(&out));
            } else {
                println!("(empty)");
            }
            save_image(image, fs.into_flash())
        }
        Command::Discard => {
            let mut fs = load_image::<N>(image, cfg)?;
            fs.discard().context("discarding fetched records")?;
            save_image(image, fs.into_flash())
        }
        Command::DiscardOne => {
            let mut fs = load_image::<N>(image, cfg)?;
            fs.discard_one().context("discarding one record")?;
            save_image(image, fs.into_flash())
        }
        Command::Rewind => {
            let mut fs = load_image::<N>(image, cfg)?;
            fs.rewind();
            save_image(image, fs.into_flash())
        }
        Command::Dump => {
            let mut fs = load_image::<N>(image, cfg)?;
            let (read, write, cursor) = fs.positions();
            println!("read   = {read:?}");
            println!("write  = {write:?}");
            println!("cursor = {cursor:?}");
            Ok(())
        }
        Command::Stats => {
            let mut fs = load_image::<N>(image, cfg)?;
            let stats = fs.stats().context("reading stats")?;
            println!("{stats:#?}");
            Ok(())
        }
    }
}

fn load_image<const N: usize>(image: &PathBuf, cfg: PartitionConfig) -> Result<RingFs<MemFlash, N>> {
    let bytes = fs::read(image).with_context(|| format!("reading {}", image.display()))?;
    let flash = MemFlash::from_bytes(cfg.sector_size, cfg.sector_count, bytes);
    let mut fs: RingFs<_, N> = RingFs::new(flash, cfg);
    fs.scan().context("scanning image at mount")?;
    Ok(fs)
}

fn save_image(image: &PathBuf, flash: MemFlash) -> Result<()> {
    fs::write(image, flash.as_bytes()).with_context(|| format!("writing {}", image.display()))
}

fn read_payload(path: &PathBuf, object_size: u32) -> Result<Vec<u8>> {
    let bytes = if path.as_os_str() == "-" {
        use std::io::Read;
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(path).with_context(|| format!("reading {}", path.display()))?
    };
    if bytes.len() != object_size as usize {
        bail!(
            "payload is {} bytes, expected exactly {object_size} (pad or truncate it yourself)",
            bytes.len()
        );
    }
    Ok(bytes)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
