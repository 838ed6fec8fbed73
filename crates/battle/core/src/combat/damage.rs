//! Damage and heal calculation.

/// Calculate the damage of an attack.
///
/// # Formula
///
/// ```text
/// damage = attack × power / 100
/// ```
///
/// A hit with non-zero power always deals at least 1 damage.
pub fn calculate_damage(attack: u32, power: u32) -> u32 {
    scaled(attack, power)
}

/// Calculate the hp restored by a heal. Same scaling as damage.
pub fn calculate_heal(attack: u32, power: u32) -> u32 {
    scaled(attack, power)
}

/// Apply damage to current hp, clamped to 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Apply a heal to current hp, capped at `max_hp`.
pub fn apply_heal(current_hp: u32, max_hp: u32, heal: u32) -> u32 {
    current_hp.saturating_add(heal).min(max_hp)
}

fn scaled(attack: u32, power: u32) -> u32 {
    if power == 0 {
        return 0;
    }
    let value = u64::from(attack) * u64::from(power) / 100;
    u32::try_from(value).unwrap_or(u32::MAX).max(1)
}
