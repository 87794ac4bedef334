//! Damage system - Hit damage formula and its outcome

mod calculation;
mod outcome;

pub use calculation::{calculate_damage, roll_critical, DamageInput, SkillStrike};
pub use outcome::DamageOutcome;
