use crate::quiz::catalog::Catalog;
use crate::quiz::results::{review, ReviewEntry, Summary};
use crate::quiz::session::Session;
use crate::quiz::{Scenario, TriageCategory};

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

const INTRO_TITLE: &str = "=== Emergency Triage Decision-Making ===";
const HOW_TO_PLAY: [&str; 4] = [
    "You'll be presented with patient scenarios",
    "For each patient, you must decide their triage category",
    "Respond as quickly as possible - time affects your score",
    "At the end, you'll see how you performed and explanations",
];
const START_PROMPT: &str = "Press Enter to start the simulation (q to quit).";

const RESULTS_TITLE: &str = "=== Simulation Results ===";
const DEMO_NOTE: &str = "This is a simplified demo. Medical professionals use much more sophisticated \
VR training with realistic 3D environments and complex patient scenarios.";
const RETRY_PROMPT: &str = "Press Enter to try again (q to quit).";

pub fn intro(catalog: &Catalog) -> String {
    let steps = HOW_TO_PLAY
        .iter()
        .enumerate()
        .map(|(i, step)| format!("  {}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n");
    let legend = TriageCategory::ALL
        .iter()
        .map(|c| format!("  {:<6} - {}", c.as_str().to_uppercase(), c.legend()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\n\
         This mini-simulation will test your ability to quickly assess patients and assign\n\
         appropriate triage categories in an emergency setting ({} patients).\n\n\
         How to Play:\n{}\n\n\
         Triage Categories:\n{}\n\n\
         {}",
        INTRO_TITLE,
        catalog.len(),
        steps,
        legend,
        START_PROMPT
    )
}

pub fn scenario(index: usize, total: usize, scenario: &Scenario) -> String {
    let vitals = &scenario.vitals;
    let options = scenario
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("  [{}] {}", i + 1, option.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Scenario {} of {}    Decide quickly!\n\n\
         Patient Presentation:\n  {}\n\n\
         Vital Signs:\n  HR {}  BP {}  O2 {}  RESP {}  TEMP {}°C\n\n\
         Assign Triage Category:\n{}\n> ",
        index + 1,
        total,
        scenario.description,
        vitals.heart_rate,
        vitals.blood_pressure,
        vitals.oxygen_saturation,
        vitals.respiratory_rate,
        vitals.temperature,
        options
    )
}

pub fn results(session: &Session) -> String {
    let summary = Summary::of(session);
    let answers = review(session)
        .iter()
        .enumerate()
        .map(|(i, entry)| review_entry(i, entry))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{}\n\n\
         Final Score: {}    Accuracy: {}    Avg Response: {:.1}s\n\n\
         {}\n\n\
         Your Answers:\n\n{}\n\n\
         {}\n\n\
         {}",
        RESULTS_TITLE,
        summary.score,
        percent_label(summary.percent_correct),
        summary.avg_response_time,
        summary.tier.message(),
        answers,
        DEMO_NOTE,
        RETRY_PROMPT
    )
}

fn review_entry(index: usize, entry: &ReviewEntry<'_>) -> String {
    let answer = entry.answer;
    let verdict = if answer.is_correct {
        "Correct decision".to_string()
    } else {
        match entry.scenario.correct_option() {
            Some(correct) => format!(
                "Incorrect decision (you chose {}, expected {})",
                answer.selected.as_str().to_uppercase(),
                correct.id.as_str().to_uppercase()
            ),
            None => "Incorrect decision".to_string(),
        }
    };

    format!(
        "  Scenario {}    {:.1}s • {} pts\n  {}\n  {}\n  Why: {}",
        index + 1,
        answer.response_time,
        answer.points_earned,
        preview(&entry.scenario.description),
        verdict,
        entry.scenario.explanation
    )
}

/// Whole percent, halves rounded up.
fn percent_label(percent: f64) -> String {
    format!("{}%", percent.round())
}

/// First characters of a description followed by an ellipsis.
fn preview(description: &str) -> String {
    let head: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{}...", head)
}
