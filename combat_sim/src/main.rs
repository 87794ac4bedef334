//! combat_sim - Headless duel runner for tuning combat_core configuration
//!
//! Usage: `combat_sim [CONFIG_DIR] [ITEMS_JSON]`
//!
//! CONFIG_DIR may hold `constants.toml`, `skills.toml` and `elements.toml`;
//! missing files fall back to the bundled defaults. ITEMS_JSON is a list of
//! items to equip on the hero before the duel.

mod simulation;

use anyhow::{Context, Result};
use combat_core::config::{load_constants, load_element_table, load_skill_configs};
use combat_core::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simulation::DuelSimulation;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DUEL_SECONDS: f64 = 60.0;
const ATTACK_INTERVAL: f64 = 0.4;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("combat_core=info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let config_dir = args.next().map(PathBuf::from);
    let items_path = args.next().map(PathBuf::from);

    let mut battle = build_battle(config_dir.as_deref())?;
    let progression = battle.constants().progression.clone();

    let hero = battle.spawn(Character::named("Hero", &progression));
    let enemy = battle.spawn(Character::from_config(
        CharacterConfig {
            name: "Orc Warrior".to_string(),
            kind: EntityKind::Enemy(EnemyProfile::default()),
            level: 3,
            element: Element::Earth,
            ..CharacterConfig::default()
        },
        &progression,
    ));

    if let Some(path) = items_path {
        for item in load_items(&path)? {
            let name = item.name.clone();
            match battle.equip(hero, item) {
                Ok(index) => info!(item = %name, index, "equipped"),
                Err(err) => warn!(item = %name, %err, "could not equip"),
            }
        }
    }

    let skill = SkillId::from("fire_bolt");
    let skill = battle.skills().contains(&skill).then_some(skill);

    let result = DuelSimulation::run(&mut battle, hero, enemy, skill.as_ref(), ATTACK_INTERVAL, DUEL_SECONDS);

    println!("=== Duel: Hero vs Orc Warrior ===");
    println!("Time:        {:.1}s", result.total_time);
    println!("Hits:        {}", result.hit_count);
    println!("Combo hits:  {}", result.combo_hits);
    println!("Casts:       {}", result.casts_resolved);
    println!("Damage:      {:.1}", result.total_damage);
    println!("DPS:         {:.2}", result.dps());
    println!("Avg hit:     {:.2}", result.avg_damage());
    println!("Crit rate:   {:.1}%", result.crit_rate());
    match result.kill_time {
        Some(time) => println!("Kill time:   {time:.1}s"),
        None => println!("Kill time:   survived"),
    }

    if let Some(hero) = battle.character(hero) {
        println!(
            "Hero:        Lv {} {:?}, {} exp, rage {}",
            hero.level, hero.job, hero.experience, hero.rage
        );
    }
    Ok(())
}

/// Build a battle from a config directory, or from bundled defaults
fn build_battle(config_dir: Option<&Path>) -> Result<Battle<StdRng>> {
    let rng = StdRng::from_entropy();
    let Some(dir) = config_dir else {
        return Ok(Battle::with_defaults(rng));
    };

    let constants = match existing(dir, "constants.toml") {
        Some(path) => load_constants(&path).with_context(|| format!("loading {}", path.display()))?,
        None => GameConstants::default(),
    };
    let skills = match existing(dir, "skills.toml") {
        Some(path) => load_skill_configs(&path).with_context(|| format!("loading {}", path.display()))?,
        None => default_skills(),
    };
    let elements = match existing(dir, "elements.toml") {
        Some(path) => load_element_table(&path).with_context(|| format!("loading {}", path.display()))?,
        None => ElementTable::with_defaults(),
    };

    info!(dir = %dir.display(), skills = skills.len(), "loaded configuration");
    Ok(Battle::new(constants, skills, elements, rng))
}

fn existing(dir: &Path, file: &str) -> Option<PathBuf> {
    let path = dir.join(file);
    path.exists().then_some(path)
}

fn load_items(path: &Path) -> Result<Vec<Item>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let items: Vec<Item> =
        serde_json::from_str(&content).with_context(|| format!("parsing items from {}", path.display()))?;
    Ok(items)
}
