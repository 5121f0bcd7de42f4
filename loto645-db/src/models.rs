use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Plus grand numéro tirable (1-45).
pub const MAX_NUMBER: u8 = 45;

/// Nombre de numéros principaux par tirage.
pub const MAIN_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub round: u32,
    pub date: String,
    pub numbers: [u8; MAIN_COUNT],
    pub bonus: u8,
}

/// Fréquence historique d'un numéro. Les probabilités sont en pourcentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberStatistic {
    pub number: u8,
    pub draw_count: u32,
    pub bonus_count: u32,
    pub probability: f64,
    pub bonus_probability: f64,
}

impl NumberStatistic {
    pub fn zero(number: u8) -> Self {
        Self {
            number,
            draw_count: 0,
            bonus_count: 0,
            probability: 0.0,
            bonus_probability: 0.0,
        }
    }
}

/// Grille simulée : 6 numéros triés + 1 bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub numbers: [u8; MAIN_COUNT],
    pub bonus: u8,
}

#[derive(Debug, Clone)]
pub struct SimulatedDraw {
    pub id: i64,
    pub created_at: String,
    pub result: DrawResult,
}

pub fn in_range(n: u8) -> bool {
    (1..=MAX_NUMBER).contains(&n)
}

pub fn validate_draw(numbers: &[u8; MAIN_COUNT], bonus: u8) -> Result<()> {
    for &n in numbers {
        if !in_range(n) {
            bail!("Numéro {} hors limites (1-{})", n, MAX_NUMBER);
        }
    }
    if !in_range(bonus) {
        bail!("Bonus {} hors limites (1-{})", bonus, MAX_NUMBER);
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    if numbers.contains(&bonus) {
        bail!("Le bonus {} figure parmi les numéros principaux", bonus);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 7).is_ok());
        assert!(validate_draw(&[45, 44, 43, 42, 41, 40], 1).is_ok());
    }

    #[test]
    fn test_validate_draw_number_out_of_range() {
        assert!(validate_draw(&[0, 2, 3, 4, 5, 6], 7).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 46], 7).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_out_of_range() {
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 0).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 6], 46).is_err());
    }

    #[test]
    fn test_validate_draw_duplicate_numbers() {
        assert!(validate_draw(&[1, 1, 3, 4, 5, 6], 7).is_err());
    }

    #[test]
    fn test_validate_draw_bonus_among_numbers() {
        let err = validate_draw(&[1, 2, 3, 4, 5, 6], 6).unwrap_err();
        assert!(err.to_string().contains("bonus 6"), "message inattendu : {err}");
    }

    #[test]
    fn test_zero_statistic() {
        let stat = NumberStatistic::zero(12);
        assert_eq!(stat.number, 12);
        assert_eq!(stat.draw_count, 0);
        assert_eq!(stat.bonus_count, 0);
        assert_eq!(stat.probability, 0.0);
        assert_eq!(stat.bonus_probability, 0.0);
    }
}
