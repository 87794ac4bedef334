//! Pluggable buff and on-hit effects

use super::{OnHitEffect, Skill};
use crate::area::{AreaEffect, AreaEffectRegistry};
use crate::character::Character;
use crate::config::ProgressionConstants;
use crate::stat_block::TimedBuff;
use crate::types::EntityId;
use tracing::debug;

/// Battle state an effect may touch besides the characters themselves
pub struct EffectContext<'a> {
    pub now: f64,
    pub areas: &'a mut AreaEffectRegistry,
    pub progression: &'a ProgressionConstants,
}

/// Effects of buff skills and of damaging skills' on-hit descriptors
///
/// The battle resolves damage and heals itself and hands everything else to
/// this trait, so games can swap in their own buff semantics.
pub trait SkillEffects {
    /// Apply a buff skill to its target; returns true if anything changed
    fn apply_buff(&mut self, skill: &Skill, target: &mut Character, ctx: &mut EffectContext<'_>) -> bool;

    /// Apply a damaging skill's side effect after the hit landed
    ///
    /// Returns the ids of every area effect spawned into `ctx.areas`.
    fn apply_on_hit(
        &mut self,
        skill: &Skill,
        caster: EntityId,
        target: &mut Character,
        ctx: &mut EffectContext<'_>,
    ) -> Vec<u64>;
}

/// Timed attribute buffs and the built-in on-hit effects
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEffects;

impl SkillEffects for StandardEffects {
    fn apply_buff(&mut self, skill: &Skill, target: &mut Character, ctx: &mut EffectContext<'_>) -> bool {
        let Some(spec) = &skill.buff else {
            return false;
        };
        let mut buff = TimedBuff::new(skill.id.0.clone(), skill.name.clone(), spec.duration);
        buff.modifiers = spec.modifiers.clone();
        target.stats.apply_buff(buff);
        target.recompute_caps(ctx.progression);
        debug!(target = %target.id, skill = %skill.id, duration = spec.duration, "buff applied");
        true
    }

    fn apply_on_hit(
        &mut self,
        skill: &Skill,
        caster: EntityId,
        target: &mut Character,
        ctx: &mut EffectContext<'_>,
    ) -> Vec<u64> {
        match skill.on_hit {
            Some(OnHitEffect::AreaBurn {
                radius,
                damage_per_second,
                duration,
            }) => {
                let effect = AreaEffect::new(target.position, radius, damage_per_second, duration, ctx.now)
                    .with_owner(caster);
                vec![ctx.areas.spawn(effect)]
            }
            Some(OnHitEffect::SpDrain { amount }) => {
                let drained = amount.min(target.stats.current_sp());
                target.stats.set_current_sp(target.stats.current_sp() - drained);
                debug!(target = %target.id, drained, "sp drained");
                Vec::new()
            }
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Position;
    use crate::skill::BuffSpec;
    use crate::stat_block::BuffModifier;
    use crate::types::{SkillKind, Stat};

    fn progression() -> ProgressionConstants {
        ProgressionConstants::default()
    }

    #[test]
    fn test_buff_multiplies_and_refreshes_caps() {
        let p = progression();
        let mut areas = AreaEffectRegistry::new();
        let mut ctx = EffectContext {
            now: 0.0,
            areas: &mut areas,
            progression: &p,
        };
        let blessing = Skill::new("blessing", "Blessing", SkillKind::Buff, 0.0).with_buff(BuffSpec {
            modifiers: vec![BuffModifier {
                stat: Stat::Vit,
                more: 0.5,
            }],
            duration: 30.0,
        });
        let mut target = Character::named("Ally", &p);

        assert!(StandardEffects.apply_buff(&blessing, &mut target, &mut ctx));
        assert!((target.stats.stat(Stat::Vit) - 12.0).abs() < 1e-9);
        // 100 + 12 × 5
        assert!((target.stats.max_hp() - 160.0).abs() < 1e-9);
        assert!(target.stats.has_buff("blessing"));
    }

    #[test]
    fn test_buff_skill_without_spec_does_nothing() {
        let p = progression();
        let mut areas = AreaEffectRegistry::new();
        let mut ctx = EffectContext {
            now: 0.0,
            areas: &mut areas,
            progression: &p,
        };
        let empty = Skill::new("shout", "Shout", SkillKind::Buff, 0.0);
        let mut target = Character::named("Ally", &p);
        assert!(!StandardEffects.apply_buff(&empty, &mut target, &mut ctx));
    }

    #[test]
    fn test_area_burn_spawns_at_target() {
        let p = progression();
        let mut areas = AreaEffectRegistry::new();
        let meteor = Skill::new("meteor", "Meteor", SkillKind::Damage, 60.0).with_on_hit(OnHitEffect::AreaBurn {
            radius: 50.0,
            damage_per_second: 10.0,
            duration: 3.0,
        });
        let mut target = Character::named("Orc", &p);
        target.position = Position::new(40.0, 30.0);

        {
            let mut ctx = EffectContext {
                now: 2.0,
                areas: &mut areas,
                progression: &p,
            };
            let spawned = StandardEffects.apply_on_hit(&meteor, EntityId(1), &mut target, &mut ctx);
            assert_eq!(spawned, vec![1]);
        }

        let effect = areas.get(1).unwrap();
        assert_eq!(effect.origin, Position::new(40.0, 30.0));
        assert_eq!(effect.owner, Some(EntityId(1)));
        assert!((effect.created_at - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sp_drain_stops_at_zero() {
        let p = progression();
        let mut areas = AreaEffectRegistry::new();
        let mut ctx = EffectContext {
            now: 0.0,
            areas: &mut areas,
            progression: &p,
        };
        let drain = Skill::new("soul_strike", "Soul Strike", SkillKind::Damage, 10.0)
            .with_on_hit(OnHitEffect::SpDrain { amount: 100.0 });
        let mut target = Character::named("Mage", &p);

        assert!(StandardEffects.apply_on_hit(&drain, EntityId(1), &mut target, &mut ctx).is_empty());
        assert!(target.stats.current_sp().abs() < f64::EPSILON);
    }
}
