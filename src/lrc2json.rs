/*
cargo run --bin lrc2json -- songs/yorunikakeru/lyrics.lrc songs/yorunikakeru/lyrics.json
*/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use regex::Regex;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

// Convert one LRC lyric file into the JSON lyric document the player loads.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    // Input .lrc file
    input: PathBuf,

    // Output .json file (created/overwritten)
    output: PathBuf,
}

#[derive(Debug, Serialize, PartialEq)]
struct LyricLine {
    time: u64,
    text: String,
}

#[derive(Debug, Serialize)]
struct LyricDocument {
    lyrics: Vec<LyricLine>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let count = convert(&args.input, &args.output)?;
    println!(
        "Converted {} lyric line(s) into {}",
        count,
        args.output.display()
    );
    Ok(())
}

fn convert(input: &Path, output: &Path) -> Result<usize> {
    let raw =
        fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let doc = LyricDocument {
        lyrics: parse_lrc(&raw)?,
    };

    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut ser)?;
    fs::write(output, &buf).with_context(|| format!("writing {}", output.display()))?;

    Ok(doc.lyrics.len())
}

// Timed lines look like "[mm:ss.xx]text" or "[mm:ss.xxx]text". Only the first
// tag on a line is interpreted; untagged lines and lines with no text after
// the tag carry no lyric.
fn parse_lrc(content: &str) -> Result<Vec<LyricLine>> {
    let tag = Regex::new(r"\[(\d{2}):(\d{2}\.\d{2,3})\](.*)")?;

    let mut lyrics = Vec::new();
    for line in content.lines() {
        let caps = match tag.captures(line) {
            Some(caps) => caps,
            None => continue,
        };
        // Both captures are digit-only, so the parses cannot fail
        let minutes: u64 = caps[1].parse().unwrap();
        let seconds: f64 = caps[2].parse().unwrap();
        let time = ((minutes * 60) as f64 + seconds) * 1000.0;

        let text = caps[3].trim();
        if text.is_empty() {
            continue;
        }
        lyrics.push(LyricLine {
            time: time.round() as u64,
            text: text.to_owned(),
        });
    }
    Ok(lyrics)
}
