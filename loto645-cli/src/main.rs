mod display;
mod import;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use loto645_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_last_draws, fetch_simulated_draws,
    fetch_statistics, insert_draw, insert_simulated_draws, migrate, open_db, replace_statistics,
};
use loto645_db::models::{DrawRecord, NumberStatistic, validate_draw};
use loto645_db::rusqlite::Connection;
use loto645_sim::{BonusWeighting, SimConfig, compute_statistics, draw_tickets, draw_tickets_parallel};
use crate::display::{
    display_draws, display_history, display_import_summary, display_statistics, display_tickets,
};

#[derive(Parser)]
#[command(name = "loto645", about = "Statistiques et simulation de tirages Loto 6/45")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV (tirage;date;n1..n6;bonus)
        #[arg(short, long, default_value = "assets/loto645.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Recalculer les statistiques sur tout l'historique
    Stats {
        /// Enregistrer les statistiques (remplace les précédentes)
        #[arg(long)]
        save: bool,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Simuler des grilles pondérées par les fréquences historiques
    Draw {
        /// Nombre de grilles
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Fichier de configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Facteur de quantification des poids
        #[arg(long)]
        scale: Option<u32>,

        /// Pondération du numéro bonus
        #[arg(long)]
        bonus: Option<BonusWeighting>,

        /// Utiliser les statistiques enregistrées au lieu de les recalculer
        #[arg(long)]
        saved: bool,

        /// Tirer les grilles en parallèle
        #[arg(long)]
        parallel: bool,

        /// Enregistrer les grilles simulées
        #[arg(long)]
        save: bool,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Afficher les grilles simulées enregistrées
    History {
        /// Nombre de grilles à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Ajouter un tirage manuellement
    Add,
}

struct DrawOptions {
    count: usize,
    config: Option<PathBuf>,
    seed: Option<u64>,
    scale: Option<u32>,
    bonus: Option<BonusWeighting>,
    saved: bool,
    parallel: bool,
    save: bool,
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { save, json } => cmd_stats(&conn, save, json),
        Command::Draw {
            count,
            config,
            seed,
            scale,
            bonus,
            saved,
            parallel,
            save,
            json,
        } => cmd_draw(
            &conn,
            DrawOptions { count, config, seed, scale, bonus, saved, parallel, save, json },
        ),
        Command::History { last } => cmd_history(&conn, last),
        Command::Add => cmd_add(&conn),
    }
}

fn cmd_import(conn: &Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : loto645 import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, save: bool, json: bool) -> Result<()> {
    let draws = fetch_all_draws(conn)?;
    let stats = compute_statistics(&draws)?;

    if save {
        replace_statistics(conn, &stats)?;
        log::info!("Saved statistics for {} numbers", stats.len());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        display_statistics(&stats, draws.len() as u32);
    }
    Ok(())
}

fn load_config(opts: &DrawOptions) -> Result<SimConfig> {
    let mut config = match &opts.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("Configuration invalide : {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(scale) = opts.scale {
        config.scale = scale;
    }
    if let Some(bonus) = opts.bonus {
        config.bonus_weighting = bonus;
    }
    if opts.seed.is_some() {
        config.seed = opts.seed;
    }
    config.validate()?;
    Ok(config)
}

fn load_statistics(conn: &Connection, saved: bool) -> Result<Vec<NumberStatistic>> {
    if saved {
        let stats = fetch_statistics(conn)?;
        if stats.is_empty() {
            bail!("Aucune statistique enregistrée. Lancez d'abord : loto645 stats --save");
        }
        return Ok(stats);
    }
    let draws = fetch_all_draws(conn)?;
    Ok(compute_statistics(&draws)?)
}

fn cmd_draw(conn: &Connection, opts: DrawOptions) -> Result<()> {
    let config = load_config(&opts)?;
    let stats = load_statistics(conn, opts.saved)?;

    let tickets = if opts.parallel {
        let seed = config.seed.unwrap_or_else(rand::random);
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Style de progression invalide")?,
        );
        pb.set_message(format!("{} grilles en cours...", opts.count));
        pb.enable_steady_tick(Duration::from_millis(100));
        let tickets = draw_tickets_parallel(&stats, opts.count, &config, seed);
        pb.finish_and_clear();
        tickets?
    } else {
        let mut rng: StdRng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        draw_tickets(&stats, opts.count, &config, &mut rng)?
    };

    if opts.save {
        let n = insert_simulated_draws(conn, &tickets)?;
        log::info!("Saved {n} simulated tickets");
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
    } else {
        display_tickets(&tickets);
    }
    Ok(())
}

fn cmd_history(conn: &Connection, last: u32) -> Result<()> {
    let draws = fetch_simulated_draws(conn, last)?;
    display_history(&draws);
    Ok(())
}

fn cmd_add(conn: &Connection) -> Result<()> {
    println!("Ajout d'un tirage manuellement\n");

    let round: u32 = prompt("Numéro du tirage (ex: 1142) : ")?
        .parse()
        .context("Numéro de tirage invalide")?;
    let date = prompt("Date (AAAA-MM-JJ) : ")?;
    if date.split('-').count() != 3 {
        bail!("Format de date invalide");
    }

    let (numbers, bonus) = prompt_numbers()?;

    let draw = DrawRecord { round, date, numbers, bonus };

    println!("\nTirage à insérer :");
    display_draws(std::slice::from_ref(&draw));

    let confirm = prompt("\nConfirmer l'insertion ? (o/n) : ")?;
    if confirm.trim().to_lowercase() == "o" {
        let inserted = insert_draw(conn, &draw)?;
        if inserted {
            println!("Tirage inséré avec succès.");
        } else {
            println!("Ce tirage existe déjà (doublon ignoré).");
        }
    } else {
        println!("Insertion annulée.");
    }

    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_numbers() -> Result<([u8; 6], u8)> {
    loop {
        let input = prompt("6 numéros puis le bonus (séparés par des espaces, 1-45) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == 7 => {
                let numbers = [v[0], v[1], v[2], v[3], v[4], v[5]];
                match validate_draw(&numbers, v[6]) {
                    Ok(()) => return Ok((numbers, v[6])),
                    Err(e) => println!("{e}. Réessayez."),
                }
            }
            _ => println!("Entrez exactement 7 numéros. Réessayez."),
        }
    }
}
