use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use loto645_db::models::{DrawResult, NumberStatistic};

use crate::config::SimConfig;
use crate::error::Result;
use crate::rng::SharedRng;
use crate::sampler::NumberSampler;

pub fn draw_ticket<R: Rng + ?Sized>(
    stats: &[NumberStatistic],
    config: &SimConfig,
    rng: &mut R,
) -> Result<DrawResult> {
    NumberSampler::from_statistics(stats, config)?.draw(rng)
}

/// `count` tirages indépendants sur un seul pool.
pub fn draw_tickets<R: Rng + ?Sized>(
    stats: &[NumberStatistic],
    count: usize,
    config: &SimConfig,
    rng: &mut R,
) -> Result<Vec<DrawResult>> {
    let sampler = NumberSampler::from_statistics(stats, config)?;
    (0..count).map(|_| sampler.draw(rng)).collect()
}

/// Comme [`draw_tickets`], avec le générateur partagé du processus.
///
/// Le verrou est pris pour chaque grille entière : plusieurs threads peuvent
/// appeler cette fonction en même temps, leurs grilles s'entrelacent mais
/// aucune ne mélange les tirages d'une autre. Les grilles d'un même appel
/// sont tirées séquentiellement ; pour du parallélisme, voir
/// [`draw_tickets_parallel`].
pub fn draw_tickets_shared(
    stats: &[NumberStatistic],
    count: usize,
    config: &SimConfig,
    rng: &SharedRng,
) -> Result<Vec<DrawResult>> {
    let sampler = NumberSampler::from_statistics(stats, config)?;
    (0..count).map(|_| rng.with(|r| sampler.draw(r))).collect()
}

/// Tirages en parallèle, un générateur par grille dérivé de `seed + i`.
/// Le résultat ne dépend que de `seed`, pas de l'ordonnancement.
pub fn draw_tickets_parallel(
    stats: &[NumberStatistic],
    count: usize,
    config: &SimConfig,
    seed: u64,
) -> Result<Vec<DrawResult>> {
    let sampler = NumberSampler::from_statistics(stats, config)?;
    log::info!("Drawing {count} tickets in parallel (seed {seed})");
    (0..count)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            sampler.draw(&mut rng)
        })
        .collect()
}
