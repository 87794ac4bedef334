//! Character progression - experience, level-ups, death, jobs, skills and rage

use crate::character::{Character, LifeState};
use crate::config::{ProgressionConstants, RageConstants};
use crate::error::ProgressionError;
use crate::skill::Skill;
use crate::stat_block::TimedBuff;
use crate::types::{Job, Stat};
use tracing::{debug, info};

/// Buff id used for berserk
pub const BERSERK_BUFF_ID: &str = "berserk";

/// Fixed attribute growth granted on every level-up
const LEVEL_UP_GROWTH: [(Stat, f64); 4] = [(Stat::Str, 2.0), (Stat::Vit, 1.0), (Stat::Dex, 1.0), (Stat::Int, 1.0)];

/// Experience needed to leave `level`: `floor(base × growth^(level − 1))`
pub fn exp_to_next_level(level: u32, progression: &ProgressionConstants) -> u64 {
    let exponent = level.saturating_sub(1) as i32;
    (progression.exp_base * progression.exp_growth.powi(exponent)).floor() as u64
}

/// Add experience, levelling up at most once
///
/// A gain that crosses several thresholds still advances a single level;
/// the overflow is discarded by the level-up reset. Returns true on level-up.
pub fn gain_experience(
    character: &mut Character,
    amount: u64,
    progression: &ProgressionConstants,
) -> bool {
    character.experience = character.experience.saturating_add(amount);
    if character.experience >= exp_to_next_level(character.level, progression) {
        level_up(character, progression);
        return true;
    }
    false
}

/// Advance one level: reset experience, grow attributes and refill resources
pub fn level_up(character: &mut Character, progression: &ProgressionConstants) {
    character.level += 1;
    character.experience = 0;

    for (stat, amount) in LEVEL_UP_GROWTH {
        character.stats.raise_base(stat, amount);
    }
    character.recompute_caps(progression);
    character.stats.refill();

    info!(
        entity = %character.id,
        level = character.level,
        max_hp = character.stats.max_hp(),
        max_sp = character.stats.max_sp(),
        "level up"
    );
}

/// Apply the death penalty and mark the character downed
///
/// Loses a fraction of the level's experience requirement (never below zero)
/// and comes back to a fraction of max HP/SP rather than zero.
pub fn on_death(character: &mut Character, progression: &ProgressionConstants) {
    let requirement = exp_to_next_level(character.level, progression);
    let penalty = (requirement as f64 * progression.death_exp_penalty).floor() as u64;
    character.experience = character.experience.saturating_sub(penalty);

    let hp = character.stats.max_hp() * progression.death_restore_fraction;
    let sp = character.stats.max_sp() * progression.death_restore_fraction;
    character.stats.set_current_hp(hp);
    character.stats.set_current_sp(sp);

    character.life_state = LifeState::Downed;
    character.is_attacking = false;
    character.target = None;
    character.move_target = None;

    info!(entity = %character.id, penalty, experience = character.experience, "downed");
}

/// Bring a downed character back into play
pub fn revive(character: &mut Character) -> bool {
    if character.life_state == LifeState::Alive {
        return false;
    }
    character.life_state = LifeState::Alive;
    debug!(entity = %character.id, "revived");
    true
}

/// Leave the novice job once the level requirement is met
pub fn change_job(
    character: &mut Character,
    job: Job,
    progression: &ProgressionConstants,
) -> Result<(), ProgressionError> {
    if character.job != Job::Novice || job == Job::Novice || character.level < progression.job_change_level {
        return Err(ProgressionError::JobChangeUnavailable {
            from: character.job,
            to: job,
            level: character.level,
        });
    }

    character.job = job;
    match job {
        Job::Swordsman => {
            character.stats.raise_base(Stat::Str, 5.0);
            character.stats.raise_base(Stat::Vit, 3.0);
        }
        Job::Mage => {
            character.stats.raise_base(Stat::Int, 5.0);
            character.stats.bonus_max_sp += 30.0;
        }
        Job::Novice => {}
    }
    character.recompute_caps(progression);

    info!(entity = %character.id, ?job, "job changed");
    Ok(())
}

/// Spend a skill point to raise a skill, returning its new level
pub fn level_up_skill(character: &mut Character, skill: &Skill) -> Result<u32, ProgressionError> {
    if character.skill_points == 0 {
        return Err(ProgressionError::NoSkillPoints);
    }
    character.skill_points -= 1;
    let level = character.skill_level(&skill.id) + 1;
    character.skill_levels.insert(skill.id.clone(), level);
    debug!(entity = %character.id, skill = %skill.id, level, "skill raised");
    Ok(level)
}

/// Effective power of a skill at the character's learned level
pub fn skill_power(character: &Character, skill: &Skill) -> f64 {
    skill.power_at(character.skill_level(&skill.id))
}

/// Grant rage, saturating at the berserk threshold's upper range
pub fn add_rage(character: &mut Character, amount: u32) {
    character.rage = character.rage.saturating_add(amount);
}

/// Enter berserk if enough rage has built up
///
/// Consumes all rage and applies a timed STR/VIT buff. Returns true if it
/// activated.
pub fn activate_berserk(
    character: &mut Character,
    rage: &RageConstants,
    progression: &ProgressionConstants,
) -> bool {
    if character.rage < rage.berserk_threshold || !character.is_alive() {
        return false;
    }
    character.rage = 0;
    character.stats.apply_buff(
        TimedBuff::new(BERSERK_BUFF_ID, "Berserk", rage.berserk_duration)
            .with_modifier(Stat::Str, rage.berserk_strength_more)
            .with_modifier(Stat::Vit, rage.berserk_vitality_more),
    );
    character.recompute_caps(progression);
    info!(entity = %character.id, "berserk");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SkillKind;

    fn progression() -> ProgressionConstants {
        ProgressionConstants::default()
    }

    fn hero() -> Character {
        Character::named("Hero", &progression())
    }

    #[test]
    fn test_exp_curve() {
        let p = progression();
        assert_eq!(exp_to_next_level(1, &p), 100);
        assert_eq!(exp_to_next_level(2, &p), 120);
        assert_eq!(exp_to_next_level(3, &p), 144);
        assert_eq!(exp_to_next_level(4, &p), 172);
    }

    #[test]
    fn test_exact_threshold_levels_once() {
        let mut hero = hero();
        assert!(gain_experience(&mut hero, 100, &progression()));
        assert_eq!(hero.level, 2);
        assert_eq!(hero.experience, 0);
    }

    #[test]
    fn test_large_gain_is_single_step() {
        let mut hero = hero();
        // Enough for several levels, still only one
        assert!(gain_experience(&mut hero, 1000, &progression()));
        assert_eq!(hero.level, 2);
        assert_eq!(hero.experience, 0);
    }

    #[test]
    fn test_below_threshold() {
        let mut hero = hero();
        assert!(!gain_experience(&mut hero, 99, &progression()));
        assert_eq!(hero.level, 1);
        assert_eq!(hero.experience, 99);
    }

    #[test]
    fn test_level_up_growth() {
        let mut hero = hero();
        hero.stats.set_current_hp(10.0);
        level_up(&mut hero, &progression());

        assert!((hero.stats.stat(Stat::Str) - 12.0).abs() < f64::EPSILON);
        assert!((hero.stats.stat(Stat::Vit) - 9.0).abs() < f64::EPSILON);
        assert!((hero.stats.stat(Stat::Dex) - 6.0).abs() < f64::EPSILON);
        assert!((hero.stats.stat(Stat::Int) - 4.0).abs() < f64::EPSILON);
        // 100 + 20 + 9 × 5
        assert!((hero.stats.max_hp() - 165.0).abs() < f64::EPSILON);
        // 50 + 10 + 4 × 3
        assert!((hero.stats.max_sp() - 72.0).abs() < f64::EPSILON);
        assert!((hero.stats.current_hp() - hero.stats.max_hp()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_death_penalty() {
        let mut hero = hero();
        hero.experience = 40;
        hero.stats.set_current_hp(0.0);
        on_death(&mut hero, &progression());

        assert_eq!(hero.experience, 35);
        assert!((hero.stats.current_hp() - 140.0 * 0.3).abs() < 1e-9);
        assert!((hero.stats.current_sp() - 59.0 * 0.3).abs() < 1e-9);
        assert_eq!(hero.life_state, LifeState::Downed);
    }

    #[test]
    fn test_fractional_death_penalty_rounds_down() {
        let mut hero = hero();
        hero.level = 3;
        hero.experience = 50;
        // 144 × 0.05 = 7.2, experience is whole so 7 is taken
        on_death(&mut hero, &progression());
        assert_eq!(hero.experience, 43);
    }

    #[test]
    fn test_death_penalty_floors_at_zero() {
        let mut hero = hero();
        hero.experience = 2;
        on_death(&mut hero, &progression());
        assert_eq!(hero.experience, 0);
    }

    #[test]
    fn test_revive() {
        let mut hero = hero();
        assert!(!revive(&mut hero));
        on_death(&mut hero, &progression());
        assert!(revive(&mut hero));
        assert!(hero.is_alive());
    }

    #[test]
    fn test_job_change_requires_level() {
        let mut hero = hero();
        let err = change_job(&mut hero, Job::Swordsman, &progression()).unwrap_err();
        assert!(matches!(err, ProgressionError::JobChangeUnavailable { level: 1, .. }));

        hero.level = 10;
        change_job(&mut hero, Job::Swordsman, &progression()).unwrap();
        assert_eq!(hero.job, Job::Swordsman);
        assert!((hero.stats.stat(Stat::Str) - 15.0).abs() < f64::EPSILON);
        assert!((hero.stats.stat(Stat::Vit) - 11.0).abs() < f64::EPSILON);

        // Only novices may change
        assert!(change_job(&mut hero, Job::Mage, &progression()).is_err());
    }

    #[test]
    fn test_mage_sp_bonus() {
        let mut hero = hero();
        hero.level = 10;
        change_job(&mut hero, Job::Mage, &progression()).unwrap();
        // 50 + 9 × 10 + 8 × 3 + 30
        assert!((hero.stats.max_sp() - 194.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_skill_levels() {
        let mut hero = hero();
        let skill = Skill::new("bash", "Bash", SkillKind::Damage, 20.0).with_power_per_level(5.0);
        assert_eq!(level_up_skill(&mut hero, &skill), Err(ProgressionError::NoSkillPoints));

        hero.skill_points = 2;
        assert_eq!(level_up_skill(&mut hero, &skill), Ok(2));
        assert_eq!(level_up_skill(&mut hero, &skill), Ok(3));
        assert_eq!(hero.skill_points, 0);
        assert!((skill_power(&hero, &skill) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_berserk() {
        let mut hero = hero();
        let rage = RageConstants::default();
        add_rage(&mut hero, 95);
        assert!(!activate_berserk(&mut hero, &rage, &progression()));

        add_rage(&mut hero, 5);
        assert!(activate_berserk(&mut hero, &rage, &progression()));
        assert_eq!(hero.rage, 0);
        assert!((hero.stats.stat(Stat::Str) - 15.0).abs() < 1e-9);
        assert!((hero.stats.stat(Stat::Vit) - 5.6).abs() < 1e-9);
        // 100 + 5.6 × 5
        assert!((hero.stats.max_hp() - 128.0).abs() < 1e-9);
    }
}
