use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Pas assez de numéros pondérés pour compléter une grille.
    #[error("Insufficient pool: {available} eligible numbers, {required} required")]
    InsufficientPool { available: usize, required: usize },

    #[error("Number {number} outside domain 1..={max}")]
    InvalidDomainRange { number: u8, max: u8 },

    #[error("Probability {value} for number {number} outside 0..=100")]
    InvalidProbability { number: u8, value: f64 },

    #[error("Duplicate statistic for number {0}")]
    DuplicateStatistic(u8),

    #[error("Invalid draw record (round {round}): {reason}")]
    InvalidDraw { round: u32, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
