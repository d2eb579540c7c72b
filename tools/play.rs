/// Play: interactive terminal session for trying out quote data and mood chains.
///
/// Usage: play [--data <dir>] [--seed <n>] [--turns <n>] [--transcript <file.json>]
///
/// Each turn shows the drawn theme, its framing text and the quote choices.
/// Enter a choice number to play it, `r` to redraw the scene, `q` to quit.
/// Narration is echoed from the prompt; no external model is called.

use mood_chain::core::selector::SceneSelector;
use mood_chain::story::narrator::EchoNarrator;
use mood_chain::story::presentation::MoodLabels;
use mood_chain::story::session::{GameSession, DEFAULT_MAX_TURNS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut data_dir = PathBuf::from("data");
    let mut seed: Option<u64> = None;
    let mut turns = DEFAULT_MAX_TURNS;
    let mut transcript_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data" if i + 1 < args.len() => {
                i += 1;
                data_dir = PathBuf::from(&args[i]);
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = Some(args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be a number");
                    process::exit(1);
                }));
            }
            "--turns" if i + 1 < args.len() => {
                i += 1;
                turns = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --turns must be a number");
                    process::exit(1);
                });
            }
            "--transcript" if i + 1 < args.len() => {
                i += 1;
                transcript_path = Some(PathBuf::from(&args[i]));
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let selector = SceneSelector::builder()
        .data_dir(&data_dir)
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error loading game data from '{}': {}", data_dir.display(), e);
            process::exit(1);
        });

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!(
        "Loaded {} quotes from {} works",
        selector.catalog().len(),
        selector.catalog().works().len()
    );
    println!("Type a choice number, 'r' to redraw, 'q' to quit.\n");

    let labels = MoodLabels::default();
    let mut session = GameSession::new(turns);
    session.start();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut scene = session.offer(&selector, &mut rng);
    while !session.is_finished() {
        println!(
            "--- Turn {}/{} (mood: {}) ---",
            session.turn() + 1,
            session.max_turns(),
            labels.label_for(session.mood())
        );
        println!("[{}] {}", scene.next_theme, scene.context_text);

        if scene.choices.is_empty() {
            println!("(no quotes for this theme)");
        }
        for (n, choice) in scene.choices.iter().enumerate() {
            println!(
                "  {}. {}『{}』({})",
                n + 1,
                choice.text,
                choice.work_title,
                labels.label_for(&choice.mood)
            );
        }

        print!("play> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();

        match line {
            "q" | "quit" | "exit" => break,
            "r" | "redraw" | "" => {
                scene = session.offer(&selector, &mut rng);
                continue;
            }
            _ => {}
        }

        let index = match line.parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                println!("Enter a choice number.");
                continue;
            }
        };

        match session.choose(&scene, index, &EchoNarrator) {
            Ok(outcome) => {
                println!("\n{}\n", outcome.scene_text);
                save_transcript(&session, transcript_path.as_ref());
                scene = session.offer(&selector, &mut rng);
            }
            Err(e) => println!("{}", e),
        }
    }

    if session.is_finished() {
        match session.finish(&EchoNarrator) {
            Ok(ending) => println!("=== Ending ===\n{}", ending),
            Err(e) => eprintln!("Error: {}", e),
        }
        save_transcript(&session, transcript_path.as_ref());
    }

    println!("Goodbye.");
}

fn save_transcript(session: &GameSession, path: Option<&PathBuf>) {
    if let Some(path) = path {
        if let Err(e) = session.transcript().save(path) {
            eprintln!("Error saving transcript to '{}': {}", path.display(), e);
        }
    }
}

fn print_usage() {
    println!("Usage: play [--data <dir>] [--seed <n>] [--turns <n>] [--transcript <file.json>]");
}
