//! flora - plays a short chord progression through the default output.
//!
//! Run with: cargo run --bin flora
//! Log with: RUST_LOG=hyperflora=debug cargo run --bin flora

use std::thread;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use hyperflora::{
    display::DisplayEvent, runtime::FloraHost, ChordQuality, EngineConfig, PitchClass, Snapshot,
};

/// (root, quality, octave, beats)
const PROGRESSION: &[(PitchClass, ChordQuality, i32, u32)] = &[
    (PitchClass::C, ChordQuality::Maj7, 4, 2),
    (PitchClass::A, ChordQuality::Min7, 3, 2),
    (PitchClass::F, ChordQuality::Maj7, 3, 2),
    (PitchClass::G, ChordQuality::Major, 3, 1),
    (PitchClass::G, ChordQuality::Major, 4, 1),
];

const BEAT: Duration = Duration::from_millis(400);

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hyperflora=info")),
        )
        .init();

    let mut host = match FloraHost::open(EngineConfig::default()) {
        Ok(host) => host,
        Err(err) => {
            println!("{}", err.status_line());
            return Err(err).wrap_err("failed to open audio output");
        }
    };

    println!("=== flora ===");
    println!("Device: {}", host.device_name());
    println!("Sample rate: {} Hz", host.controller().sample_rate());
    println!();

    host.controller().subscribe(|event: DisplayEvent| match event {
        DisplayEvent::Playing(playing) => println!("  playing: {playing}"),
        DisplayEvent::ActiveNote(Some(note)) => println!("  note: {}", note.name()),
        DisplayEvent::ActiveNote(None) => {}
    });

    let mut patch = Snapshot::default();
    host.controller().set_parameters(&patch);

    for (step, &(root, quality, octave, beats)) in PROGRESSION.iter().enumerate() {
        patch.quality = quality;
        // open the motor up as the progression goes on
        patch.flow = 0.35 + 0.1 * step as f32;
        host.controller().set_parameters(&patch);

        for _ in 0..beats {
            host.controller().trigger(root, octave, &patch);
            sleep_polling(&mut host, BEAT);
        }

        let peaks = host.analyser().peaks(3);
        let summary: Vec<String> = peaks
            .iter()
            .map(|(hz, db)| format!("{hz:.0} Hz {db:.1} dB"))
            .collect();
        println!("{} {}: {}", root.name(), quality.name(), summary.join(", "));
    }

    // let the last tails ring out and get collected
    sleep_polling(&mut host, Duration::from_millis(600));
    host.shutdown();

    Ok(())
}

fn sleep_polling(host: &mut FloraHost, total: Duration) {
    let tick = Duration::from_millis(20);
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        thread::sleep(tick);
        host.controller().poll();
        elapsed += tick;
    }
}
