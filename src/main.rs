use clap::{Parser, Subcommand};
use pakbox::pkg::Pkg;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pakbox", about = "Inspect and edit .pkg asset containers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the assets in a package
    List {
        input: PathBuf,
        /// Show a BLAKE3 digest per asset
        #[arg(long)]
        hashes: bool,
        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract every asset into a directory, one <id>.bin file each
    Extract {
        input: PathBuf,
        #[arg(short = 'C', long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Remove an asset by identifier and rewrite the package
    Remove {
        input: PathBuf,
        /// Asset identifier, decimal or 0x-prefixed hex
        id: String,
        /// Output path (defaults to rewriting the input in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show package metadata
    Info {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct AssetInfo {
    id: String,
    offset: u32,
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    blake3: Option<String>,
}

#[derive(Serialize)]
struct PkgInfo {
    path: String,
    header_len: usize,
    assets: usize,
    data_size: u64,
    total_size: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input, hashes, json } => {
            let pkg = Pkg::parse(&std::fs::read(&input)?)?;
            let infos: Vec<AssetInfo> = pkg
                .descriptors()?
                .iter()
                .zip(pkg.assets())
                .map(|(d, a)| AssetInfo {
                    id: format!("{:#010x}", d.id),
                    offset: d.offset,
                    size: d.size,
                    blake3: hashes.then(|| hex::encode(blake3::hash(&a.data).as_bytes())),
                })
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else {
                println!("Package: {}", input.display());
                println!("{:<12} {:>12} {:>12}  Digest", "Id", "Offset", "Size");
                for info in &infos {
                    let digest = info.blake3.as_deref().map(|h| &h[..12]).unwrap_or("—");
                    println!("{:<12} {:>12} {:>12}  {}", info.id, info.offset, info.size, digest);
                }
            }
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { input, output_dir } => {
            let pkg = Pkg::parse(&std::fs::read(&input)?)?;
            if !output_dir.exists() {
                std::fs::create_dir_all(&output_dir)?;
            }
            for asset in pkg.assets() {
                let path = output_dir.join(format!("{:08x}.bin", asset.id));
                std::fs::write(&path, &asset.data)?;
                println!("  extracted  {}", path.display());
            }
            println!("Extracted {} asset(s) to: {}", pkg.len(), output_dir.display());
        }

        // ── Remove ───────────────────────────────────────────────────────────
        Commands::Remove { input, id, output } => {
            let id = parse_id(&id)?;
            let mut pkg = Pkg::parse(&std::fs::read(&input)?)?;
            pkg.remove_asset(id)?;
            let target = output.unwrap_or(input);
            std::fs::write(&target, pkg.build()?)?;
            println!("Removed {id:#010x} → {}", target.display());
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input, json } => {
            let bytes = std::fs::read(&input)?;
            let pkg = Pkg::parse(&bytes)?;
            let info = PkgInfo {
                path: input.display().to_string(),
                header_len: pkg.format().header_len(),
                assets: pkg.len(),
                data_size: pkg.assets().iter().map(|a| a.data.len() as u64).sum(),
                total_size: bytes.len(),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("── .pkg container ───────────────────────────────────────");
                println!("  Path        {}", info.path);
                println!("  Header      {} B", info.header_len);
                println!("  Assets      {}", info.assets);
                println!("  Data size   {} B", info.data_size);
                println!("  Total size  {} B", info.total_size);
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn parse_id(s: &str) -> Result<u32, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    }
}
