/// Scene selection integration tests: shipped data and fixture scenarios.

use mood_chain::core::catalog::QuoteCatalog;
use mood_chain::core::chain::MoodChain;
use mood_chain::core::selector::SceneSelector;
use mood_chain::schema::scene::MAX_CHOICES;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::path::Path;

fn shipped_selector() -> SceneSelector {
    SceneSelector::builder().data_dir("data").build().unwrap()
}

fn scenario_selector() -> SceneSelector {
    let chain = MoodChain::load_from_ron(Path::new("tests/fixtures/scenario_mood_chain.ron")).unwrap();
    SceneSelector::builder()
        .quotes_path("tests/fixtures/quotes.csv")
        .with_mood_chain(chain)
        .build()
        .unwrap()
}

#[test]
fn shipped_data_loads() {
    let selector = shipped_selector();
    assert_eq!(selector.catalog().len(), 30);
    assert_eq!(selector.catalog().works().len(), 4);
    assert_eq!(selector.mood_chain(), &MoodChain::default());
}

#[test]
fn known_moods_draw_themes_from_their_candidates() {
    let selector = shipped_selector();
    let mut rng = StdRng::seed_from_u64(2024);

    for mood in selector.mood_chain().moods() {
        let candidates = selector.mood_chain().candidates(mood);
        for _ in 0..30 {
            let scene = selector.next_scene(mood, &mut rng);
            assert!(
                candidates.contains(&scene.next_theme),
                "mood '{}' produced theme '{}'",
                mood,
                scene.next_theme
            );
        }
    }
}

#[test]
fn unknown_moods_use_start_candidates() {
    let selector = shipped_selector();
    let mut rng = StdRng::seed_from_u64(8);
    for mood in ["neutral", "despair", "", "HOPEFUL"] {
        let scene = selector.next_scene(mood, &mut rng);
        assert!(
            scene.next_theme == "友情" || scene.next_theme == "希望",
            "mood '{}' produced theme '{}'",
            mood,
            scene.next_theme
        );
    }
}

#[test]
fn choices_are_bounded_and_from_distinct_works() {
    let selector = shipped_selector();
    let mut rng = StdRng::seed_from_u64(77);

    for mood in ["start", "hopeful", "angry", "anxious", "melancholic", "calm", "lost"] {
        for _ in 0..50 {
            let scene = selector.next_scene(mood, &mut rng);
            assert!(scene.choices.len() <= MAX_CHOICES);
            let works: HashSet<&str> = scene.choices.iter().map(|c| c.work_id.as_str()).collect();
            assert_eq!(works.len(), scene.choices.len(), "duplicate work in {:?}", scene.choices);
        }
    }
}

#[test]
fn shipped_themes_always_fill_three_choices() {
    // Every reachable theme in the shipped data has at least three works.
    let selector = shipped_selector();
    let mut rng = StdRng::seed_from_u64(31);
    for mood in selector.mood_chain().moods() {
        for _ in 0..20 {
            let scene = selector.next_scene(mood, &mut rng);
            assert_eq!(scene.choices.len(), 3, "theme '{}'", scene.next_theme);
        }
    }
}

#[test]
fn choice_count_matches_distinct_works_in_pool() {
    let selector = shipped_selector();
    let mut rng = StdRng::seed_from_u64(5150);
    for _ in 0..100 {
        let scene = selector.next_scene("calm", &mut rng);
        let pool_works: HashSet<&str> = selector
            .catalog()
            .filter_by_theme(&scene.next_theme)
            .into_iter()
            .map(|q| q.work_id.as_str())
            .collect();
        assert_eq!(scene.choices.len(), pool_works.len().min(MAX_CHOICES));
    }
}

#[test]
fn shipped_disabled_quotes_never_offered() {
    let selector = shipped_selector();
    let disabled: HashSet<&str> = selector
        .catalog()
        .quotes()
        .iter()
        .filter(|q| !q.allow_use)
        .map(|q| q.text.as_str())
        .collect();
    assert_eq!(disabled.len(), 2);

    let mut rng = StdRng::seed_from_u64(404);
    for _ in 0..300 {
        for mood in ["hopeful", "calm", "anxious"] {
            let scene = selector.next_scene(mood, &mut rng);
            for choice in &scene.choices {
                assert!(!disabled.contains(choice.text.as_str()));
            }
        }
    }
}

#[test]
fn start_scenario_bounds_choices_by_available_works() {
    let selector = scenario_selector();
    let mut rng = StdRng::seed_from_u64(100);
    let mut seen_themes = HashSet::new();

    for _ in 0..100 {
        let scene = selector.next_scene("start", &mut rng);
        assert!(scene.next_theme == "友情" || scene.next_theme == "希望");
        // Both themes have exactly two usable works
        assert_eq!(scene.choices.len(), 2);
        if scene.next_theme == "友情" {
            let works: HashSet<&str> = scene.choices.iter().map(|c| c.work_id.as_str()).collect();
            assert_eq!(works, HashSet::from(["A", "B"]));
        }
        seen_themes.insert(scene.next_theme);
    }

    assert_eq!(seen_themes.len(), 2);
}

#[test]
fn disabled_fixture_quote_never_offered() {
    let selector = scenario_selector();
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..200 {
        let scene = selector.next_scene("start", &mut rng);
        assert!(scene.choices.iter().all(|c| c.work_id != "C"));
    }
}

#[test]
fn absent_catalog_yields_scene_without_choices() {
    let catalog = QuoteCatalog::load(Path::new("tests/fixtures/missing.csv"));
    assert!(catalog.is_empty());

    let selector = SceneSelector::builder()
        .quotes_path("tests/fixtures/missing.csv")
        .build()
        .unwrap();
    let scene = selector.get_next_scene_data("start");
    assert!(scene.next_theme == "友情" || scene.next_theme == "希望");
    assert!(!scene.context_text.is_empty());
    assert!(scene.choices.is_empty());
}

#[test]
fn malformed_catalog_behaves_as_absent() {
    let selector = SceneSelector::builder()
        .quotes_path("tests/fixtures/malformed_quotes.csv")
        .build()
        .unwrap();
    assert!(selector.catalog().is_empty());
    let scene = selector.next_scene("anxious", &mut StdRng::seed_from_u64(0));
    assert!(scene.choices.is_empty());
}

#[test]
fn catalog_reload_yields_same_quotes() {
    let first = QuoteCatalog::load(Path::new("data/quotes.csv"));
    let second = QuoteCatalog::load(Path::new("data/quotes.csv"));
    assert_eq!(first.quotes(), second.quotes());
}
