// Teaches the four-digit drawing-pad model a handful of hand-drawn glyphs,
// shows what it predicts, and saves the result.
//
//   cargo run -- [snapshot.json]
//
// Set RUST_LOG=debug to watch every replay-memory decision.
use ferrite_tutor::{LearnerConfig, Network};
use rand::Rng;

const GLYPHS: [[&str; 8]; 4] = [
    [
        "..####..",
        ".#....#.",
        ".#....#.",
        ".#....#.",
        ".#....#.",
        ".#....#.",
        ".#....#.",
        "..####..",
    ],
    [
        "...##...",
        "..###...",
        "...##...",
        "...##...",
        "...##...",
        "...##...",
        "...##...",
        "..####..",
    ],
    [
        "..####..",
        ".#....#.",
        "......#.",
        ".....#..",
        "....#...",
        "...#....",
        "..#.....",
        ".######.",
    ],
    [
        ".#####..",
        "......#.",
        "......#.",
        "..####..",
        "......#.",
        "......#.",
        "......#.",
        ".#####..",
    ],
];

fn glyph(digit: usize) -> Vec<Vec<f64>> {
    GLYPHS[digit]
        .iter()
        .map(|row| row.chars().map(|c| if c == '#' { 1.0 } else { 0.0 }).collect())
        .collect()
}

/// Flips a couple of random cells, like a sloppy stroke.
fn smudge(grid: &mut [Vec<f64>], rng: &mut impl Rng) {
    for _ in 0..2 {
        let (r, c) = (rng.gen_range(0..8), rng.gen_range(0..8));
        grid[r][c] = 1.0 - grid[r][c];
    }
}

fn main() -> ferrite_tutor::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ferrite-tutor-model.json".to_string());
    let mut network = Network::load_or_fresh(&path, LearnerConfig::default())?;
    let mut rng = rand::thread_rng();

    for round in 1..=8 {
        for digit in 0..4 {
            let mut grid = glyph(digit);
            smudge(&mut grid, &mut rng);
            let outcome = network.teach(&grid, digit)?;
            println!(
                "round {round} digit {digit}: loss = {:.4}, replay loss = {:.4}",
                outcome.loss, outcome.replay_loss
            );
        }
    }

    for digit in 0..4 {
        let prediction = network.get_predicted_label(&glyph(digit))?;
        println!(
            "drew {digit} -> guessed {} ({:.1}% sure)",
            prediction.label,
            prediction.confidence * 100.0
        );
    }
    println!(
        "remembered examples: {} {:?}",
        network.example_count(),
        network.memory().distribution()
    );

    network.save_json(&path)
}
