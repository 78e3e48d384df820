//! Line-oriented operator prompt.

use std::fs;
use std::io::{self, BufRead, Write};

use duelwatch_core::{Combo, ComboTable, SampleSet, ShutdownSignal};
use tracing::warn;

/// Run the prompt loop until the operator quits or shutdown is triggered.
///
/// `r` or an empty line drains the sample set and checks combos; `quit`
/// (or `q`) exits. Invalid input is reported once and the loop continues
/// with no state mutation.
pub fn run(seen: &SampleSet, combos: &ComboTable, shutdown: &ShutdownSignal) {
    while !shutdown.is_shutdown() {
        println!("Enter r to check combos, quit to exit.");
        print!("> ");
        io::stdout().flush().ok();

        let Some(line) = read_line() else {
            break;
        };

        match line.to_lowercase().as_str() {
            "r" | "" => {
                check_combos(seen, combos);
                println!("Combo check complete; card ID set cleared, monitoring continues.");
            }
            "quit" | "q" => {
                println!("Exiting.");
                break;
            }
            _ => println!("Invalid input, try again."),
        }
    }
}

/// Read one trimmed line from stdin; `None` on EOF or read error.
fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(e) => {
            warn!("Failed to read input: {}", e);
            None
        }
    }
}

fn check_combos(seen: &SampleSet, combos: &ComboTable) {
    let snapshot = seen.drain();
    println!(
        ">>> Checking combos against {} observed card IDs...",
        snapshot.len()
    );

    let available = combos.matches(&snapshot);
    if available.is_empty() {
        println!("No combo requirements are currently met.");
        return;
    }

    println!("Available combos:");
    for (i, combo) in available.iter().enumerate() {
        println!("{}) {}", i + 1, combo.name);
    }

    println!("Enter a number to view the combo notes, or anything else to continue.");
    print!("> ");
    io::stdout().flush().ok();

    let Some(line) = read_line() else {
        return;
    };

    match line.parse::<usize>() {
        Ok(choice) if (1..=available.len()).contains(&choice) => {
            show_notes(available[choice - 1]);
        }
        _ => println!("No combo selected."),
    }
}

fn show_notes(combo: &Combo) {
    match fs::read_to_string(&combo.file) {
        Ok(contents) => {
            println!("--- {} ---", combo.file.display());
            println!("{contents}");
        }
        Err(e) => warn!("Failed to read notes file {}: {}", combo.file.display(), e),
    }
}
