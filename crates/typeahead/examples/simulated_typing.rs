//! Simulated typing against a console surface.
//!
//! Types "ap", pauses, continues to "apr", then accepts the single match with
//! Enter. Run with `RUST_LOG=typeahead=debug` to see the state machine.

use std::time::{Duration, Instant};

use typeahead::prelude::*;

/// Prints what a real drop-down would show.
struct ConsoleSurface;

impl PresentationSurface for ConsoleSurface {
    fn render_suggestions(&mut self, entries: &[SuggestionEntry]) {
        for entry in entries {
            println!("    [{}]{}", entry.bold_prefix.to_uppercase(), entry.remainder);
        }
    }

    fn set_drop_down_open(&mut self, open: bool) {
        println!("  drop-down {}", if open { "opened" } else { "closed" });
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        if let Some(index) = index {
            println!("  highlight row {index}");
        }
    }

    fn set_field_text(&mut self, text: &str) {
        println!("  field <- {text:?}");
    }
}

enum Step {
    Type(&'static str),
    Press(Key),
    Pause(Duration),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AutoCompleteConfig::default().with_delay_ms(300)?;
    let mut text_box = AutoCompleteTextBox::with_config(ConsoleSurface, config)?;
    text_box.set_candidates(vec![
        "apple",
        "apricot",
        "avocado",
        "banana",
        "blackberry",
        "cherry",
    ]);
    text_box.committed.connect(|value: &String| {
        tracing::info!(%value, "committed");
    });

    let script = [
        Step::Type("a"),
        Step::Pause(Duration::from_millis(120)),
        Step::Type("ap"),
        Step::Pause(Duration::from_millis(500)),
        Step::Type("apr"),
        Step::Pause(Duration::from_millis(500)),
        Step::Press(Key::Enter),
    ];

    for step in script {
        match step {
            Step::Type(text) => {
                println!("type {text:?}");
                text_box.on_user_input(text);
            }
            Step::Press(key) => {
                println!("press {key:?}");
                text_box.on_key_pressed(key);
            }
            Step::Pause(duration) => pump(&mut text_box, duration),
        }
    }

    println!("final text: {:?}", text_box.text());
    text_box.dispose();
    Ok(())
}

/// Run the owner-thread loop for `duration`.
fn pump(text_box: &mut AutoCompleteTextBox<ConsoleSurface>, duration: Duration) {
    let deadline = Instant::now() + duration;
    while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
        text_box.wait_for_events(remaining);
    }
}
