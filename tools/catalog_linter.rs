/// Catalog Linter: checks quote data against the mood chain and theme contexts.
///
/// Usage: catalog_linter [<data_dir>]
///
/// Reads `quotes.csv`, `mood_chain.ron` and `theme_contexts.ron` from the data
/// directory (default `data`). Exits non-zero when errors are found.

use mood_chain::core::catalog::QuoteCatalog;
use mood_chain::core::chain::MoodChain;
use mood_chain::core::theme::ThemeContexts;
use mood_chain::schema::scene::MAX_CHOICES;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Usage: catalog_linter [<data_dir>]");
        process::exit(0);
    }

    let data_dir = Path::new(args.get(1).map(String::as_str).unwrap_or("data"));
    if !data_dir.is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", data_dir.display());
        process::exit(1);
    }

    // Unlike the game, the linter refuses to paper over unreadable data
    let catalog = match QuoteCatalog::try_load(&data_dir.join("quotes.csv")) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("ERROR: Failed to load quotes.csv: {}", e);
            process::exit(1);
        }
    };

    let chain_path = data_dir.join("mood_chain.ron");
    let chain = if chain_path.exists() {
        MoodChain::load_from_ron(&chain_path).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to load mood_chain.ron: {}", e);
            process::exit(1);
        })
    } else {
        println!("No mood_chain.ron, linting against the built-in table");
        MoodChain::default()
    };

    let contexts_path = data_dir.join("theme_contexts.ron");
    let contexts = if contexts_path.exists() {
        ThemeContexts::load_from_ron(&contexts_path).unwrap_or_else(|e| {
            eprintln!("ERROR: Failed to load theme_contexts.ron: {}", e);
            process::exit(1);
        })
    } else {
        println!("No theme_contexts.ron, linting against the built-in texts");
        ThemeContexts::default()
    };

    println!(
        "Loaded {} quotes, {} moods, {} theme contexts",
        catalog.len(),
        chain.moods().len(),
        contexts.contexts.len()
    );

    let (errors, warnings) = lint_catalog(&catalog, &chain, &contexts);

    println!("\n=== Catalog Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

fn lint_catalog(
    catalog: &QuoteCatalog,
    chain: &MoodChain,
    contexts: &ThemeContexts,
) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let reachable: BTreeSet<&str> = chain.themes().into_iter().collect();

    // Usable works per theme
    let mut works_by_theme: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for quote in catalog.quotes().iter().filter(|q| q.allow_use) {
        works_by_theme
            .entry(quote.theme_tags.as_str())
            .or_default()
            .insert(quote.work_id.as_str());
    }

    for theme in &reachable {
        match works_by_theme.get(theme) {
            None => errors.push(format!(
                "Theme '{}' is reachable from the mood chain but has no usable quotes",
                theme
            )),
            Some(works) if works.len() < MAX_CHOICES => warnings.push(format!(
                "Theme '{}' has usable quotes from only {} work(s); scenes will offer fewer than {} choices",
                theme,
                works.len(),
                MAX_CHOICES
            )),
            Some(_) => {}
        }

        if !contexts.has_context(theme) {
            warnings.push(format!(
                "Theme '{}' has no context text; the fallback will be shown",
                theme
            ));
        }
    }

    for theme in catalog.themes() {
        if !reachable.contains(theme) {
            warnings.push(format!(
                "Theme '{}' has quotes but no mood leads to it",
                theme
            ));
        }
    }

    // A quote's mood becomes the next turn's mood
    let mut unknown_moods: BTreeSet<&str> = BTreeSet::new();
    for quote in catalog.quotes() {
        if !chain.knows(&quote.mood) {
            unknown_moods.insert(quote.mood.as_str());
        }
    }
    for mood in unknown_moods {
        warnings.push(format!(
            "Mood '{}' appears on quotes but has no mood chain entry; it will use '{}'",
            mood,
            chain.default_mood()
        ));
    }

    // One work id must keep one title
    let mut titles: BTreeMap<&str, &str> = BTreeMap::new();
    for quote in catalog.quotes() {
        match titles.get(quote.work_id.as_str()) {
            Some(title) if *title != quote.work_title => errors.push(format!(
                "Work '{}' is titled both '{}' and '{}'",
                quote.work_id, title, quote.work_title
            )),
            Some(_) => {}
            None => {
                titles.insert(quote.work_id.as_str(), quote.work_title.as_str());
            }
        }
    }

    let mut seen_texts = HashSet::new();
    for quote in catalog.quotes() {
        if quote.text.trim().is_empty() {
            errors.push(format!("Empty quote text in work '{}'", quote.work_id));
        } else if !seen_texts.insert(quote.text.as_str()) {
            warnings.push(format!("Duplicate quote text: '{}'", quote.text));
        }
    }

    let disabled = catalog.quotes().iter().filter(|q| !q.allow_use).count();
    if disabled > 0 {
        println!("{} quote(s) are disabled and will never be offered", disabled);
    }

    (errors, warnings)
}
