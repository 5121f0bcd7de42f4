use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use loto645_db::models::{DrawRecord, DrawResult, NumberStatistic, SimulatedDraw, MAIN_COUNT, MAX_NUMBER};

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[DrawRecord]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Tirage", "Date", "Numéros", "Bonus"]);

    for draw in draws {
        let mut sorted = draw.numbers;
        sorted.sort();

        table.add_row(vec![
            &draw.round.to_string(),
            &draw.date,
            &format_numbers(&sorted),
            &format!("{:2}", draw.bonus),
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

/// Vert au-dessus de 130 % de la fréquence uniforme, rouge sous 70 %.
fn tint(probability: f64) -> Color {
    let uniform = MAIN_COUNT as f64 / MAX_NUMBER as f64 * 100.0;
    let deviation = (probability - uniform) / uniform;
    if deviation > 0.3 {
        Color::Green
    } else if deviation < -0.3 {
        Color::Red
    } else {
        Color::White
    }
}

pub fn display_statistics(stats: &[NumberStatistic], total_draws: u32) {
    println!("\n📊 Statistiques sur {} tirages\n", total_draws);

    let mut table = new_table(vec!["Numéro", "Sorties", "Probabilité", "Bonus", "Probabilité bonus"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.draw_count.cmp(&a.draw_count).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)),
            Cell::new(stat.draw_count.to_string()),
            Cell::new(format!("{:.2} %", stat.probability)).fg(tint(stat.probability)),
            Cell::new(stat.bonus_count.to_string()),
            Cell::new(format!("{:.2} %", stat.bonus_probability)),
        ]);
    }
    println!("{table}");
}

pub fn display_tickets(tickets: &[DrawResult]) {
    println!("\n🎲 Grilles simulées\n");

    let mut table = new_table(vec!["#", "Numéros", "Bonus"]);

    for (i, ticket) in tickets.iter().enumerate() {
        table.add_row(vec![
            &format!("{}", i + 1),
            &format_numbers(&ticket.numbers),
            &format!("{:2}", ticket.bonus),
        ]);
    }
    println!("{table}");
}

pub fn display_history(draws: &[SimulatedDraw]) {
    if draws.is_empty() {
        println!("Aucune grille simulée enregistrée.");
        return;
    }

    let mut table = new_table(vec!["Id", "Créée le", "Numéros", "Bonus"]);

    for draw in draws {
        table.add_row(vec![
            &draw.id.to_string(),
            &draw.created_at,
            &format_numbers(&draw.result.numbers),
            &format!("{:2}", draw.result.bonus),
        ]);
    }
    println!("{table}");
}
