/// Five turns: plays a whole session against the bundled data with a fixed
/// seed, always taking the first choice, and prints the resulting story.
///
/// Run with: cargo run --example five_turns
use mood_chain::core::selector::SceneSelector;
use mood_chain::story::narrator::EchoNarrator;
use mood_chain::story::session::GameSession;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Draws per turn before giving up on the data.
const MAX_DRAWS: u32 = 20;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let selector = SceneSelector::builder().data_dir("data").build()?;
    let mut rng = StdRng::seed_from_u64(1905);

    let mut session = GameSession::new(5);
    session.start();

    while !session.is_finished() {
        let scene = session
            .offer_playable(&selector, &mut rng, MAX_DRAWS)
            .ok_or_else(|| format!("no playable quotes after {} draws; check data/quotes.csv", MAX_DRAWS))?;
        println!("== {} ==\n{}", scene.next_theme, scene.context_text);
        for choice in &scene.choices {
            println!("  - {}『{}』", choice.text, choice.work_title);
        }

        let outcome = session.choose(&scene, 0, &EchoNarrator)?;
        println!("> {}\n  mood is now {}\n", scene.choices[0].text, outcome.next_mood);
    }

    session.finish(&EchoNarrator)?;

    println!("=== Story ===");
    println!("{}", session.transcript().to_text());
    Ok(())
}
