//! Astro Belt entry point
//!
//! Runs a headless demo session: a scripted pilot spins, thrusts and
//! fires for up to two simulated minutes, then the final score is
//! reported and recorded. Useful as a smoke run and as a reference for
//! wiring the simulation into a real frontend.

use std::path::PathBuf;
use std::process::ExitCode;

use astro_belt::assets::AssetCatalog;
use astro_belt::audio::LogSink;
use astro_belt::consts::FRAME_INTERVAL_MS;
use astro_belt::sim::{GameSession, SessionInput, SessionStatus};
use astro_belt::{Difficulty, Settings, highscores};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional difficulty key on the command line; unknown keys are
    // fatal before the session starts
    let difficulty = match std::env::args().nth(1) {
        Some(key) => match Difficulty::from_key(&key) {
            Ok(difficulty) => difficulty,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => Difficulty::Medium,
    };

    let data_dir = PathBuf::from("data");
    let settings = Settings::load(&data_dir.join("settings.json"));
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut session = GameSession::new(
        difficulty,
        &settings,
        AssetCatalog::procedural(),
        Box::new(LogSink),
        seed,
    );

    // Scripted pilot: sweep the nose around while thrusting in short
    // pulses and firing continuously
    let max_frames = 2 * 60 * 60; // two simulated minutes
    let mut final_score = 0;
    for frame in 0..max_frames {
        let input = SessionInput {
            rotate_left: frame % 200 < 120,
            rotate_right: frame % 200 >= 160,
            thrust: frame % 90 < 30,
            fire: true,
        };
        match session.update(&input, FRAME_INTERVAL_MS) {
            SessionStatus::Running => {}
            SessionStatus::Ended { score } => {
                final_score = score;
                break;
            }
        }
        final_score = session.state.score;
    }

    println!(
        "final score: {final_score} (wave {}, {} lives left)",
        session.state.wave, session.state.lives
    );

    let score_path = data_dir.join("highscore.json");
    match highscores::record_score(&score_path, final_score) {
        Ok(true) => println!("new highscore!"),
        Ok(false) => println!(
            "highscore remains {}",
            highscores::load_highscore(&score_path)
        ),
        Err(err) => log::error!("could not save highscore: {err}"),
    }
    ExitCode::SUCCESS
}
