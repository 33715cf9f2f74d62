//! Experience and leveling
//!
//! XP curve, leveling formulas, and progression helpers.

/// XP needed to advance from `level` to `level + 1`:
/// `round(base * scaling^(level - 1))`, never less than 1.
pub fn xp_to_next_level(level: u32, base_xp: u32, scaling: f32) -> u32 {
    let exponent = level.max(1) - 1;
    let required = (base_xp as f64 * (scaling as f64).powi(exponent as i32)).round();
    if required >= u32::MAX as f64 {
        u32::MAX
    } else {
        (required as u32).max(1)
    }
}

/// Total XP needed from level 1 to reach a given level
pub fn total_xp_for_level(level: u32, base_xp: u32, scaling: f32) -> u64 {
    (1..level)
        .map(|l| xp_to_next_level(l, base_xp, scaling) as u64)
        .sum()
}

/// Scale an XP grant by a percentage bonus, rounding to the nearest point
pub fn apply_xp_bonus(amount: u32, bonus_percent: f32) -> u32 {
    let scaled = (amount as f32 * (1.0 + bonus_percent / 100.0)).round();
    scaled.max(0.0) as u32
}

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        0..=2 => "Novice",
        3..=4 => "Apprentice",
        5..=7 => "Journeyman",
        8..=10 => "Adept",
        11..=14 => "Expert",
        15..=18 => "Master",
        19..=24 => "Grandmaster",
        _ => "Foreseer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_curve() {
        assert_eq!(xp_to_next_level(1, 100, 1.2), 100);
        assert_eq!(xp_to_next_level(2, 100, 1.2), 120);
        assert_eq!(xp_to_next_level(3, 100, 1.2), 144);
        assert_eq!(xp_to_next_level(4, 100, 1.2), 173); // 172.8
    }

    #[test]
    fn test_xp_curve_never_zero() {
        assert_eq!(xp_to_next_level(5, 0, 1.2), 1);
        assert_eq!(xp_to_next_level(10, 100, 0.0), 1);
    }

    #[test]
    fn test_total_xp_for_level() {
        assert_eq!(total_xp_for_level(1, 100, 1.2), 0);
        assert_eq!(total_xp_for_level(4, 100, 1.2), 100 + 120 + 144);
    }

    #[test]
    fn test_xp_bonus_rounds() {
        assert_eq!(apply_xp_bonus(100, 10.0), 110);
        assert_eq!(apply_xp_bonus(15, 10.0), 17); // 16.5 rounds away from zero
        assert_eq!(apply_xp_bonus(40, 0.0), 40);
    }

    #[test]
    fn test_level_title() {
        assert_eq!(level_title(1), "Novice");
        assert_eq!(level_title(5), "Journeyman");
        assert_eq!(level_title(25), "Foreseer");
    }
}
