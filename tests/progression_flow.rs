//! End-to-end progression: earn XP, spend points, fight, save and reload.

use std::sync::Arc;

use glam::Vec3;
use hecs::World;
use rand::rngs::StdRng;
use rand::SeedableRng;

use visions_foretold::combat::{DamageMode, Damageable, Health, Projectile, ProjectileConfig};
use visions_foretold::ecs::{CharacterStats, Layer, Position, Tag};
use visions_foretold::progression::{
    default_catalog, EffectType, ProgressionConfig, ProgressionEvent, SkillManager,
};
use visions_foretold::SaveStore;

fn new_manager() -> SkillManager {
    SkillManager::new(
        Arc::new(default_catalog()),
        ProgressionConfig {
            starting_skill_points: 0,
            ..ProgressionConfig::default()
        },
        CharacterStats::new(100, 1.0),
    )
}

#[test]
fn three_level_ups_from_one_grant() {
    let mut manager = new_manager();
    manager.add_experience(100 + 120 + 144);

    let level_ups: Vec<_> = manager
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            ProgressionEvent::LevelUp { new_level } => Some(new_level),
            _ => None,
        })
        .collect();

    assert_eq!(level_ups, vec![2, 3, 4]);
    let state = manager.state();
    assert_eq!(state.experience, 0);
    assert!(state.experience < state.experience_to_next_level);
    assert_eq!(state.skill_points, 3);
}

#[test]
fn earned_points_buy_skills_that_change_damage() {
    let mut manager = new_manager();
    assert!(!manager.unlock_skill("power_strike"), "no points yet");

    manager.add_experience(100);
    assert!(manager.unlock_skill("power_strike"));

    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(manager.calculate_damage_with_bonuses(100, false, &mut rng), 105);
    assert_eq!(manager.get_total_bonus(EffectType::DamageBoost, false), 5.0);
}

#[test]
fn skill_boosted_projectile_damages_enemies() {
    let mut manager = new_manager();
    manager.add_experience(100);
    assert!(manager.unlock_skill("power_strike"));

    let mut world = World::new();
    let enemy = world.spawn((
        Position::new(4.0, 0.0, 0.0),
        Health::new(100),
        Layer(0),
        Tag::new("Enemy"),
    ));

    let mut rng = StdRng::seed_from_u64(9);
    let config = ProjectileConfig::new(20, DamageMode::SingleTarget, "Enemy")
        .with_skill_bonuses(&manager, &mut rng);
    let mut projectile = Projectile::new(config, Vec3::ZERO);
    projectile.move_to(Vec3::new(4.0, 0.0, 0.0));

    let impact = projectile.on_hit(&mut world, enemy, Vec3::new(4.0, 0.0, 0.0), &mut rng);
    assert!(impact.destroyed);
    assert_eq!(impact.hits[0].damage, 25);
    assert_eq!(world.get::<&Health>(enemy).unwrap().current_health(), 75);
}

#[test]
fn save_and_reload_restores_skills() {
    let dir = tempfile::tempdir().unwrap();
    let store = SaveStore::new(dir.path());

    let mut manager = new_manager();
    manager.add_experience(1_000);
    assert!(manager.unlock_skill("vitality"));
    assert!(manager.level_up_skill("vitality"));
    assert!(manager.unlock_skill("arcane_power"));
    store.save_manager(0, &manager).unwrap();

    let mut reloaded = new_manager();
    store.load_into(0, &mut reloaded).unwrap();

    assert_eq!(reloaded.get_skill_save_data(), manager.get_skill_save_data());
    let levels = |m: &SkillManager| -> Vec<(String, u32)> {
        m.unlocked_skills()
            .map(|s| (s.id().to_string(), s.current_level()))
            .collect()
    };
    assert_eq!(levels(&reloaded), levels(&manager));
    assert_eq!(reloaded.target().max_health(), manager.target().max_health());
}
