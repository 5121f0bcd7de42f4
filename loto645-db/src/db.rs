use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{DrawRecord, DrawResult, NumberStatistic, SimulatedDraw};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    round     INTEGER PRIMARY KEY,
    date      TEXT NOT NULL,
    n1        INTEGER NOT NULL,
    n2        INTEGER NOT NULL,
    n3        INTEGER NOT NULL,
    n4        INTEGER NOT NULL,
    n5        INTEGER NOT NULL,
    n6        INTEGER NOT NULL,
    bonus     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS number_statistics (
    number             INTEGER PRIMARY KEY,
    draw_count         INTEGER NOT NULL,
    bonus_count        INTEGER NOT NULL,
    probability        REAL NOT NULL,
    bonus_probability  REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS simulated_draws (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,
    n1          INTEGER NOT NULL,
    n2          INTEGER NOT NULL,
    n3          INTEGER NOT NULL,
    n4          INTEGER NOT NULL,
    n5          INTEGER NOT NULL,
    n6          INTEGER NOT NULL,
    bonus       INTEGER NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("loto645.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &DrawRecord) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (round, date, n1, n2, n3, n4, n5, n6, bonus)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            draw.round,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.numbers[5],
            draw.bonus,
        ],
    ).with_context(|| format!("Échec de l'insertion du tirage {}", draw.round))?;
    Ok(changed > 0)
}

fn read_numbers(row: &rusqlite::Row<'_>, first: usize) -> rusqlite::Result<[u8; 6]> {
    Ok([
        row.get(first)?,
        row.get(first + 1)?,
        row.get(first + 2)?,
        row.get(first + 3)?,
        row.get(first + 4)?,
        row.get(first + 5)?,
    ])
}

fn query_draws(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<DrawRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let draws = stmt.query_map(params, |row| {
        Ok(DrawRecord {
            round: row.get(0)?,
            date: row.get(1)?,
            numbers: read_numbers(row, 2)?,
            bonus: row.get(8)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Tout l'historique, du plus ancien au plus récent.
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<DrawRecord>> {
    query_draws(
        conn,
        "SELECT round, date, n1, n2, n3, n4, n5, n6, bonus FROM draws ORDER BY round ASC",
        [],
    )
    .context("Échec de la lecture des tirages")
}

pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<DrawRecord>> {
    query_draws(
        conn,
        "SELECT round, date, n1, n2, n3, n4, n5, n6, bonus FROM draws ORDER BY round DESC LIMIT ?1",
        [limit],
    )
    .context("Échec de la lecture des tirages")
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

/// Remplace intégralement les statistiques en une seule transaction.
pub fn replace_statistics(conn: &Connection, stats: &[NumberStatistic]) -> Result<()> {
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    tx.execute("DELETE FROM number_statistics", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO number_statistics (number, draw_count, bonus_count, probability, bonus_probability)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for stat in stats {
            stmt.execute(rusqlite::params![
                stat.number,
                stat.draw_count,
                stat.bonus_count,
                stat.probability,
                stat.bonus_probability,
            ])?;
        }
    }
    tx.commit().context("Échec du commit des statistiques")?;
    Ok(())
}

pub fn fetch_statistics(conn: &Connection) -> Result<Vec<NumberStatistic>> {
    let mut stmt = conn.prepare(
        "SELECT number, draw_count, bonus_count, probability, bonus_probability
         FROM number_statistics ORDER BY number ASC",
    )?;
    let stats = stmt.query_map([], |row| {
        Ok(NumberStatistic {
            number: row.get(0)?,
            draw_count: row.get(1)?,
            bonus_count: row.get(2)?,
            probability: row.get(3)?,
            bonus_probability: row.get(4)?,
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(stats)
}

pub fn insert_simulated_draws(conn: &Connection, results: &[DrawResult]) -> Result<usize> {
    let created_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO simulated_draws (created_at, n1, n2, n3, n4, n5, n6, bonus)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for r in results {
            stmt.execute(rusqlite::params![
                created_at,
                r.numbers[0],
                r.numbers[1],
                r.numbers[2],
                r.numbers[3],
                r.numbers[4],
                r.numbers[5],
                r.bonus,
            ])?;
        }
    }
    tx.commit().context("Échec du commit des grilles simulées")?;
    Ok(results.len())
}

pub fn fetch_simulated_draws(conn: &Connection, limit: u32) -> Result<Vec<SimulatedDraw>> {
    let mut stmt = conn.prepare(
        "SELECT id, created_at, n1, n2, n3, n4, n5, n6, bonus
         FROM simulated_draws ORDER BY id DESC LIMIT ?1",
    )?;
    let draws = stmt.query_map([limit], |row| {
        Ok(SimulatedDraw {
            id: row.get(0)?,
            created_at: row.get(1)?,
            result: DrawResult {
                numbers: read_numbers(row, 2)?,
                bonus: row.get(8)?,
            },
        })
    })?.collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(round: u32, date: &str) -> DrawRecord {
        DrawRecord {
            round,
            date: date.to_string(),
            numbers: [1, 2, 3, 4, 5, 6],
            bonus: 7,
        }
    }

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    #[test]
    fn test_insert_and_count() {
        let conn = memory_db();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw(1, "2002-12-07")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = memory_db();

        let inserted = insert_draw(&conn, &test_draw(1, "2002-12-07")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw(1, "2002-12-07")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_fetch_order() {
        let conn = memory_db();

        insert_draw(&conn, &test_draw(2, "2002-12-14")).unwrap();
        insert_draw(&conn, &test_draw(3, "2002-12-21")).unwrap();
        insert_draw(&conn, &test_draw(1, "2002-12-07")).unwrap();

        let all = fetch_all_draws(&conn).unwrap();
        assert_eq!(all.iter().map(|d| d.round).collect::<Vec<_>>(), vec![1, 2, 3]);

        let last = fetch_last_draws(&conn, 2).unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].round, 3);
        assert_eq!(last[1].round, 2);
        assert_eq!(last[0].numbers, [1, 2, 3, 4, 5, 6]);
        assert_eq!(last[0].bonus, 7);
    }

    #[test]
    fn test_replace_statistics_overwrites() {
        let conn = memory_db();

        let first: Vec<NumberStatistic> = (1..=45).map(NumberStatistic::zero).collect();
        replace_statistics(&conn, &first).unwrap();

        let mut second = first.clone();
        second[0].draw_count = 3;
        second[0].probability = 50.0;
        replace_statistics(&conn, &second).unwrap();

        let stored = fetch_statistics(&conn).unwrap();
        assert_eq!(stored.len(), 45, "le remplacement ne doit pas ajouter de lignes");
        assert_eq!(stored[0].draw_count, 3);
        assert!((stored[0].probability - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_simulated_draws_roundtrip() {
        let conn = memory_db();
        let results = vec![
            DrawResult { numbers: [1, 5, 12, 20, 33, 45], bonus: 9 },
            DrawResult { numbers: [2, 6, 13, 21, 34, 44], bonus: 10 },
        ];
        assert_eq!(insert_simulated_draws(&conn, &results).unwrap(), 2);

        let stored = fetch_simulated_draws(&conn, 10).unwrap();
        assert_eq!(stored.len(), 2);
        // Le plus récent en premier
        assert_eq!(stored[0].result, results[1]);
        assert_eq!(stored[1].result, results[0]);
        assert!(!stored[0].created_at.is_empty());
    }
}
