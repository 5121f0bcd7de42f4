//! Statistiques de fréquence et simulation pondérée de tirages 6/45.
//!
//! historique → [`compute_statistics`] → [`WeightedPool`] → [`NumberSampler`] → grille.

pub mod config;
pub mod error;
pub mod pool;
pub mod rng;
pub mod sampler;
pub mod simulate;
pub mod stats;
pub mod store;

pub use config::{BonusWeighting, SimConfig};
pub use error::{Result, SimError};
pub use pool::WeightedPool;
pub use rng::SharedRng;
pub use sampler::NumberSampler;
pub use simulate::{draw_ticket, draw_tickets, draw_tickets_parallel, draw_tickets_shared};
pub use stats::compute_statistics;
pub use store::StatisticsStore;
