use std::sync::{Arc, RwLock};

use loto645_db::models::NumberStatistic;

/// Jeu de statistiques courant, remplacé d'un bloc.
///
/// Un lecteur obtient toujours un jeu complet : jamais un mélange d'anciens
/// et de nouveaux comptages.
#[derive(Debug, Default)]
pub struct StatisticsStore {
    current: RwLock<Arc<Vec<NumberStatistic>>>,
}

impl StatisticsStore {
    pub fn new(stats: Vec<NumberStatistic>) -> Self {
        Self { current: RwLock::new(Arc::new(stats)) }
    }

    pub fn snapshot(&self) -> Arc<Vec<NumberStatistic>> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, stats: Vec<NumberStatistic>) {
        let next = Arc::new(stats);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = next;
        log::debug!("Statistics snapshot replaced ({} numbers)", guard.len());
    }
}
