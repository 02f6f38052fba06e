//! Text rendering of match state.
//!
//! Everything here reads combatant state and returns a `String`; callers
//! decide where it is written.

use duelsters_core::action::Action;
use duelsters_core::batch::BatchResults;
use duelsters_core::combatant::{Combatant, Side};

/// Narrowest box the round header is drawn in.
const MIN_HEADER_WIDTH: usize = 36;

/// Boxed status header shown at the start of every round.
///
/// ```text
/// ************************************
/// *             ROUND #3             *
/// ************************************
/// * Ada            VS.            Bo *
/// * Balanced                 Support *
/// * Health: 20/20      Health: 25/25 *
/// *                    Heals left: 3 *
/// ************************************
/// ```
#[must_use]
pub fn round_header(round: u32, one: &Combatant, two: &Combatant) -> String {
    let mut rows = vec![
        (one.name().to_string(), two.name().to_string()),
        (one.archetype().to_string(), two.archetype().to_string()),
        (health_readout(one), health_readout(two)),
    ];
    if one.archetype().can_heal() || two.archetype().can_heal() {
        rows.push((heals_readout(one), heals_readout(two)));
    }

    // the name row also carries "VS." with a space either side
    let width = rows
        .iter()
        .map(|(left, right)| left.chars().count() + right.chars().count() + 5)
        .chain(std::iter::once(
            one.name().chars().count() + two.name().chars().count() + 9,
        ))
        .max()
        .unwrap_or(0)
        .max(MIN_HEADER_WIDTH);
    let border = "*".repeat(width);

    let mut lines = vec![
        border.clone(),
        centered(&format!("ROUND #{round}"), width),
        border.clone(),
    ];
    lines.push(spread(one.name(), "VS.", two.name(), width));
    lines.extend(rows.iter().skip(1).map(|(left, right)| spread(left, "", right, width)));
    lines.push(border);
    lines.join("\n")
}

/// Multi-line sheet of one combatant's stats.
#[must_use]
pub fn character_sheet(combatant: &Combatant) -> String {
    let stats = combatant.stats();
    let mut sheet = format!(
        "{name}\n{rule}\nClass:   {class}\nHealth:  {health}/{max}\nAttack:  {attack} | Defense: {defense} | Speed: {speed}",
        name = combatant.name(),
        rule = "-".repeat(combatant.name().chars().count()),
        class = combatant.archetype(),
        health = combatant.health(),
        max = stats.max_health,
        attack = stats.attack,
        defense = stats.defense,
        speed = stats.speed,
    );
    if combatant.archetype().can_heal() {
        sheet.push('\n');
        sheet.push_str(&heals_readout(combatant));
    }
    sheet
}

/// Numbered action menu, `1.` first, followed by the back option.
#[must_use]
pub fn action_menu(name: &str, actions: &[Action]) -> String {
    let mut lines = vec![format!("{name}, select an action:")];
    lines.extend(
        actions
            .iter()
            .enumerate()
            .map(|(i, action)| format!("{}. {}", i + 1, capitalize(&action.to_string()))),
    );
    lines.push("b. Back".to_string());
    lines.join("\n")
}

/// Human-readable summary of a batch run.
#[must_use]
pub fn batch_report(results: &BatchResults) -> String {
    let summary = &results.summary;
    let rule = "=".repeat(50);
    let mut lines = vec![
        rule.clone(),
        "BATCH COMPLETE".to_string(),
        rule,
        format!("Matches played:   {}", summary.matches),
        format!(
            "Player One wins:  {} ({:.1}%)",
            summary.wins_one,
            summary.win_rate(Side::One) * 100.0
        ),
        format!(
            "Player Two wins:  {} ({:.1}%)",
            summary.wins_two,
            summary.win_rate(Side::Two) * 100.0
        ),
        format!("Draws:            {}", summary.draws),
        format!("Unfinished:       {}", summary.unfinished),
    ];
    if !summary.rounds.is_empty() {
        lines.push(format!(
            "Rounds:           mean {:.1}, sd {:.1}, min {}, max {}",
            summary.rounds.mean,
            summary.rounds.std_dev(),
            summary.rounds.min,
            summary.rounds.max
        ));
    }
    lines.push(format!("Duration:         {:.2}s", results.duration_seconds));
    lines.join("\n")
}

fn health_readout(combatant: &Combatant) -> String {
    format!("Health: {}/{}", combatant.health(), combatant.max_health())
}

fn heals_readout(combatant: &Combatant) -> String {
    if combatant.archetype().can_heal() {
        format!("Heals left: {}", combatant.heals_remaining())
    } else {
        String::new()
    }
}

fn centered(text: &str, width: usize) -> String {
    let inner = width.saturating_sub(2);
    let len = text.chars().count();
    let left = inner.saturating_sub(len) / 2;
    let right = inner.saturating_sub(len + left);
    format!("*{}{text}{}*", " ".repeat(left), " ".repeat(right))
}

/// `* left ... middle ... right *`, padded to `width`.
fn spread(left: &str, middle: &str, right: &str, width: usize) -> String {
    let inner = width.saturating_sub(4);
    let used = left.chars().count() + middle.chars().count() + right.chars().count();
    let gap = inner.saturating_sub(used);
    let before = gap / 2;
    let after = gap - before;
    format!(
        "* {left}{}{middle}{}{right} *",
        " ".repeat(before),
        " ".repeat(after)
    )
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
