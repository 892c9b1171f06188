/*
cargo run --bin extract_songs_metadata

cargo run --bin extract_songs_metadata -- \
    --songs-dir songs \
    --output config/songs.json
*/

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use log::info;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Value};
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

// Collect each song folder's metadata.json into the combined index the player loads.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    // Directory holding one sub-folder per song
    #[arg(long, default_value = "songs")]
    songs_dir: PathBuf,

    // Combined JSON index (created/overwritten)
    #[arg(short, long, default_value = "config/songs.json")]
    output: PathBuf,

    // Directory for the run log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    fs::create_dir_all(&args.log_dir)
        .with_context(|| format!("creating {}", args.log_dir.display()))?;
    let log_path = args.log_dir.join(format!(
        "extract_songs_metadata_{}.log",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    WriteLogger::init(
        LevelFilter::Info,
        LogConfig::default(),
        File::create(&log_path)?,
    )?;

    info!("Scanning {}", args.songs_dir.display());
    let count = run(&args.songs_dir, &args.output)?;

    println!(
        "Wrote {} song record(s) to {}",
        count,
        args.output.display()
    );
    Ok(())
}

fn run(songs_dir: &Path, output: &Path) -> Result<usize> {
    let records = collect_song_records(songs_dir)?;
    info!("Collected {} song record(s)", records.len());

    write_pretty_json(output, &records)?;
    info!("Wrote index to {}", output.display());
    Ok(records.len())
}

// One record per song folder that carries a metadata.json; the folder name
// becomes the record's id, overwriting any id the file already had. Folders
// without a metadata file contribute nothing.
fn collect_song_records(songs_dir: &Path) -> Result<Vec<Value>> {
    let mut folders: Vec<PathBuf> = Vec::new();
    for entry in
        fs::read_dir(songs_dir).with_context(|| format!("reading {}", songs_dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading {}", songs_dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            folders.push(path);
        }
    }
    // Sorted so the index comes out the same regardless of platform listing order
    folders.sort();

    let mut records = Vec::with_capacity(folders.len());
    for folder in &folders {
        let metadata_path = folder.join("metadata.json");
        if !metadata_path.is_file() {
            info!("No metadata.json in {}, skipped", folder.display());
            continue;
        }

        let raw = fs::read_to_string(&metadata_path)
            .with_context(|| format!("reading {}", metadata_path.display()))?;
        let parsed: Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", metadata_path.display()))?;
        let mut record = match parsed {
            Value::Object(map) => map,
            other => bail!(
                "File {} is not a JSON object (found {:?})",
                metadata_path.display(),
                other
            ),
        };

        let song_id = folder
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("folder name {} is not valid UTF-8", folder.display()))?;
        record.insert("id".into(), Value::String(song_id.to_owned()));

        info!("Collected {}", song_id);
        records.push(Value::Object(record));
    }
    Ok(records)
}

// 4-space indent, non-ASCII kept literal. Written to a sibling temp file and
// renamed into place so a failed run never truncates the previous index.
fn write_pretty_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &buf).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("renaming {} to {}", tmp.display(), path.display()))?;
    Ok(())
}
