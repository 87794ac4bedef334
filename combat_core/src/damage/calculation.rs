//! Damage calculation - turning attacker/target stats into hit damage
//!
//! The formula is pure: the critical roll and combo state are inputs, so the
//! same input always yields the same outcome. Randomness lives in
//! [`roll_critical`], which callers invoke beforehand.

use super::DamageOutcome;
use crate::combo::ComboHit;
use crate::config::CombatConstants;
use crate::element::ElementTable;
use crate::stat_block::StatBlock;
use crate::types::{Element, Stat};
use rand::Rng;

/// The parts of a skill the damage formula consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillStrike {
    /// Effective power (skill level already applied)
    pub power: f64,
    pub element: Option<Element>,
}

/// Everything the damage formula needs
#[derive(Debug, Clone, Copy)]
pub struct DamageInput<'a> {
    pub attacker: &'a StatBlock,
    pub target: &'a StatBlock,
    pub target_element: Element,
    /// `None` for a basic attack
    pub skill: Option<SkillStrike>,
    pub combo: ComboHit,
    pub is_critical: bool,
}

/// Calculate hit damage
///
/// Terms are composed in a fixed order:
/// 1. base power: skill power, or attacker STR for basic attacks
/// 2. skill bonus: attacker INT × scaling, skills only
/// 3. combo bonus: combo count × bonus per hit, combo hits only
/// 4. crit multiplier
/// 5. `(base + skill bonus) × (1 + combo bonus) × crit`
/// 6. element multiplier of the skill's element against the target
/// 7. defense: target VIT × defense per VIT
/// 8. `max(minimum, pre-mitigation × element − defense)`
pub fn calculate_damage(
    input: &DamageInput<'_>,
    constants: &CombatConstants,
    elements: &ElementTable,
) -> DamageOutcome {
    let base_power = match input.skill {
        Some(skill) => skill.power,
        None => input.attacker.stat(Stat::Str),
    };

    let skill_bonus = if input.skill.is_some() {
        input.attacker.stat(Stat::Int) * constants.skill_int_scaling
    } else {
        0.0
    };

    let combo_bonus = if input.combo.is_combo {
        input.combo.count as f64 * constants.combo_bonus_per_hit
    } else {
        0.0
    };

    let crit_multiplier = if input.is_critical {
        constants.crit_multiplier
    } else {
        1.0
    };

    let pre_mitigation = (base_power + skill_bonus) * (1.0 + combo_bonus) * crit_multiplier;

    let element_multiplier = match input.skill.and_then(|s| s.element) {
        Some(element) => elements.multiplier(element, input.target_element),
        None => 1.0,
    };

    let defense = input.target.defense(constants);
    let damage = (pre_mitigation * element_multiplier - defense).max(constants.minimum_damage);

    DamageOutcome {
        damage,
        is_critical: input.is_critical,
        is_combo: input.combo.is_combo,
        pre_mitigation,
        element_multiplier,
        defense,
    }
}

/// Roll for a critical hit using the attacker's DEX-based chance
pub fn roll_critical(attacker: &StatBlock, constants: &CombatConstants, rng: &mut impl Rng) -> bool {
    let chance = attacker.crit_chance(constants);
    chance > 0.0 && rng.gen::<f64>() < chance
}
