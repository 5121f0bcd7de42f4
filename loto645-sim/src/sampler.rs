use std::collections::HashSet;

use rand::Rng;

use loto645_db::models::{DrawResult, NumberStatistic, MAIN_COUNT};

use crate::config::{BonusWeighting, SimConfig};
use crate::error::{Result, SimError};
use crate::pool::{PoolEntry, WeightedPool};

/// 6 numéros principaux + 1 bonus.
pub const REQUIRED_NUMBERS: usize = MAIN_COUNT + 1;

/// Tirage pondéré sans remise à partir d'un pool figé.
///
/// Le pool n'est jamais modifié : chaque `draw` travaille sur sa propre
/// copie, plusieurs tirages peuvent donc partager le même échantillonneur.
#[derive(Debug, Clone)]
pub struct NumberSampler {
    main: WeightedPool,
    bonus: Option<WeightedPool>,
}

impl NumberSampler {
    /// Numéros principaux et bonus tirés dans le même pool.
    pub fn new(pool: WeightedPool) -> Result<Self> {
        if pool.eligible() < REQUIRED_NUMBERS {
            return Err(SimError::InsufficientPool {
                available: pool.eligible(),
                required: REQUIRED_NUMBERS,
            });
        }
        Ok(Self { main: pool, bonus: None })
    }

    /// Bonus tiré dans un pool distinct, privé des 6 numéros principaux.
    ///
    /// Refusé si les 6 numéros principaux peuvent recouvrir tout le pool
    /// bonus (pool bonus inclus dans le pool principal et d'au plus 6
    /// numéros) : le tirage du bonus échouerait alors au hasard.
    pub fn with_bonus_pool(main: WeightedPool, bonus: WeightedPool) -> Result<Self> {
        if main.eligible() < MAIN_COUNT {
            return Err(SimError::InsufficientPool {
                available: main.eligible(),
                required: MAIN_COUNT,
            });
        }

        let main_numbers: HashSet<u8> = main.entries().iter().map(|e| e.number).collect();
        let bonus_only = bonus
            .entries()
            .iter()
            .filter(|e| !main_numbers.contains(&e.number))
            .count();
        if bonus_only == 0 && bonus.eligible() <= MAIN_COUNT {
            return Err(SimError::InsufficientPool {
                available: bonus.eligible(),
                required: REQUIRED_NUMBERS,
            });
        }
        Ok(Self { main, bonus: Some(bonus) })
    }

    pub fn from_statistics(stats: &[NumberStatistic], config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let main = WeightedPool::from_probability(stats, config.scale)?;
        match config.bonus_weighting {
            BonusWeighting::MainFrequency => Self::new(main),
            BonusWeighting::BonusFrequency => {
                let bonus = WeightedPool::from_bonus_probability(stats, config.scale)?;
                Self::with_bonus_pool(main, bonus)
            }
        }
    }

    pub fn main_pool(&self) -> &WeightedPool {
        &self.main
    }

    pub fn bonus_pool(&self) -> Option<&WeightedPool> {
        self.bonus.as_ref()
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<DrawResult> {
        let insufficient = || SimError::InsufficientPool {
            available: self.main.eligible(),
            required: REQUIRED_NUMBERS,
        };

        let mut remaining = Remaining::from(&self.main);
        let mut numbers = [0u8; MAIN_COUNT];
        for slot in numbers.iter_mut() {
            *slot = remaining.take(rng).ok_or_else(insufficient)?;
        }
        numbers.sort();

        let bonus = match &self.bonus {
            None => remaining.take(rng),
            Some(pool) => {
                let mut candidates = Remaining::from(pool);
                candidates.exclude(&numbers);
                candidates.take(rng)
            }
        }
        .ok_or_else(insufficient)?;

        Ok(DrawResult { numbers, bonus })
    }
}

/// Multiset de travail d'un tirage : un numéro sélectionné perd tout son poids.
struct Remaining {
    entries: Vec<PoolEntry>,
}

impl From<&WeightedPool> for Remaining {
    fn from(pool: &WeightedPool) -> Self {
        Self { entries: pool.entries().to_vec() }
    }
}

impl Remaining {
    /// Choisit une unité de poids uniformément dans `[0, total)` puis retire
    /// le numéro qui la porte.
    fn take<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u8> {
        let cumulative: Vec<u64> = self
            .entries
            .iter()
            .scan(0u64, |acc, e| {
                *acc += e.weight;
                Some(*acc)
            })
            .collect();
        let total = *cumulative.last()?;
        let pick = rng.random_range(0..total);
        let idx = cumulative.partition_point(|&c| c <= pick);
        Some(self.entries.remove(idx).number)
    }

    fn exclude(&mut self, numbers: &[u8]) {
        self.entries.retain(|e| !numbers.contains(&e.number));
    }
}
