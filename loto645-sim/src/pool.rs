use std::collections::HashSet;

use loto645_db::models::{in_range, NumberStatistic, MAX_NUMBER};

use crate::error::{Result, SimError};

// Absorbe l'erreur flottante : 0.07 × 100 doit donner 7, pas 6.
const WEIGHT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolEntry {
    pub number: u8,
    pub weight: u64,
}

/// Pool pondéré : chaque numéro compte pour `floor(probabilité × scale)`
/// unités. Les numéros de poids nul sont absents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedPool {
    entries: Vec<PoolEntry>,
}

impl WeightedPool {
    /// Pool pondéré par la fréquence en numéro principal.
    pub fn from_probability(stats: &[NumberStatistic], scale: u32) -> Result<Self> {
        Self::build(stats, scale, |s| s.probability)
    }

    /// Pool pondéré par la fréquence en bonus.
    pub fn from_bonus_probability(stats: &[NumberStatistic], scale: u32) -> Result<Self> {
        Self::build(stats, scale, |s| s.bonus_probability)
    }

    fn build(
        stats: &[NumberStatistic],
        scale: u32,
        probability: impl Fn(&NumberStatistic) -> f64,
    ) -> Result<Self> {
        if scale == 0 {
            return Err(SimError::InvalidConfig("scale must be at least 1".to_string()));
        }

        let mut seen = HashSet::with_capacity(stats.len());
        for stat in stats {
            if !in_range(stat.number) {
                return Err(SimError::InvalidDomainRange { number: stat.number, max: MAX_NUMBER });
            }
            if !seen.insert(stat.number) {
                return Err(SimError::DuplicateStatistic(stat.number));
            }
            for value in [stat.probability, stat.bonus_probability] {
                if !(0.0..=100.0).contains(&value) {
                    return Err(SimError::InvalidProbability { number: stat.number, value });
                }
            }
        }

        let mut entries: Vec<PoolEntry> = stats
            .iter()
            .map(|s| PoolEntry { number: s.number, weight: quantize(probability(s), scale) })
            .filter(|e| e.weight > 0)
            .collect();
        entries.sort_by_key(|e| e.number);

        let pool = Self { entries };
        log::debug!(
            "Weighted pool built: {} eligible numbers, total weight {}",
            pool.eligible(),
            pool.total_weight()
        );
        Ok(pool)
    }

    pub fn entries(&self) -> &[PoolEntry] {
        &self.entries
    }

    /// Nombre de numéros distincts de poids non nul.
    pub fn eligible(&self) -> usize {
        self.entries.len()
    }

    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    pub fn weight(&self, number: u8) -> u64 {
        self.entries
            .iter()
            .find(|e| e.number == number)
            .map_or(0, |e| e.weight)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Troncature volontaire : une probabilité sous 1/scale % donne un poids nul.
/// `probability` est déjà validée dans [0, 100].
fn quantize(probability: f64, scale: u32) -> u64 {
    (probability * scale as f64 + WEIGHT_EPSILON).floor() as u64
}
