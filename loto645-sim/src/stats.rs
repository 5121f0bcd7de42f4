use loto645_db::models::{validate_draw, DrawRecord, NumberStatistic, MAX_NUMBER};

use crate::error::{Result, SimError};

/// Calcule une statistique par numéro (1-45), numéros jamais tirés compris.
///
/// Un historique vide donne des statistiques toutes nulles. Un tirage
/// invalide (hors limites, doublon, bonus parmi les numéros) est rejeté.
pub fn compute_statistics(corpus: &[DrawRecord]) -> Result<Vec<NumberStatistic>> {
    let mut stats: Vec<NumberStatistic> = (1..=MAX_NUMBER).map(NumberStatistic::zero).collect();

    for draw in corpus {
        validate_draw(&draw.numbers, draw.bonus).map_err(|e| SimError::InvalidDraw {
            round: draw.round,
            reason: e.to_string(),
        })?;
        for &n in &draw.numbers {
            stats[(n - 1) as usize].draw_count += 1;
        }
        stats[(draw.bonus - 1) as usize].bonus_count += 1;
    }

    let total_draws = corpus.len();
    for stat in &mut stats {
        stat.probability = percentage(stat.draw_count, total_draws);
        stat.bonus_probability = percentage(stat.bonus_count, total_draws);
    }

    log::debug!("Statistics computed over {total_draws} draws");
    Ok(stats)
}

fn percentage(count: u32, total_draws: usize) -> f64 {
    if total_draws == 0 {
        return 0.0;
    }
    count as f64 / total_draws as f64 * 100.0
}
