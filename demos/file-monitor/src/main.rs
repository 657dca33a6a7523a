//! Plays a Standard MIDI File through the listener and reports chords and key prevalence.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use midibox_midi::{FilePlayback, NormalizerConfig, SourceDescriptor};
use midibox_store::MidiListener;
use midibox_theory::diatonic_classes;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[clap(author, about, long_about = None)]
struct Args {
    /// MIDI file to play
    file: PathBuf,

    /// JSON normalizer configuration
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Log more (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<NormalizerConfig> {
    let Some(path) = path else {
        return Ok(NormalizerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config {}", path.display()))?;
    Ok(NormalizerConfig::from_json(&text)?)
}

/// Default log filter for a `-v` count.
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level(args.verbose))).init();

    let config = load_config(args.config.as_ref())?;
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Cannot read {}", args.file.display()))?;
    let name = args
        .file
        .file_name()
        .map_or_else(|| args.file.display().to_string(), |n| n.to_string_lossy().into_owned());
    let source = SourceDescriptor::file(args.file.display().to_string(), name);
    let playback = FilePlayback::parse(source, &bytes, &config)?;

    let mut listener = MidiListener::new();
    listener.register(playback.registration(&config));
    let channel = playback.source().id.channel(playback.channel());

    let mut last: Arc<[String]> = Arc::from([]);
    for event in playback.events() {
        listener.dispatch(event);
        let chords = listener.chord_estimate(&channel);
        if !chords.is_empty() && chords != last {
            log::info!("tick {}: {}", event.timestamp, chords.join(" | "));
        }
        last = chords;
    }
    listener.dispatch(&playback.stop_event());

    let total = listener.channel(&channel).map_or(0, |c| c.total_note_count());
    println!("{} note-ons in {}", total, playback.source().name);
    if total == 0 {
        return Ok(());
    }
    let prevalence = listener.key_prevalence(&channel);
    let mut ranked: Vec<_> = prevalence.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));
    for (key, share) in ranked {
        println!("{key:>3} major  {:5.1}%", share * 100.0);
    }
    let best = prevalence.argmax();
    let scale: Vec<_> = diatonic_classes(best).iter().map(ToString::to_string).collect();
    println!("Most prevalent key: {best} major ({})", scale.join(" "));
    Ok(())
}
