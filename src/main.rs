//! Visions Foretold - Entry Point
//!
//! Runs a short scripted session against a save slot: load progression,
//! fight a pack of enemies with projectiles, spend skill points, save.

use std::sync::Arc;

use anyhow::Result;
use glam::Vec3;
use hecs::World;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use visions_foretold::combat::{Damageable, Health, Projectile};
use visions_foretold::ecs::{CharacterStats, Layer, Name, Position, Tag};
use visions_foretold::progression::xp::level_title;
use visions_foretold::progression::{ProgressionEvent, SkillManager};
use visions_foretold::{DataManager, SaveStore};

const ENEMY_LAYER: u32 = 3;
const ENEMY_COUNT: usize = 6;
const XP_PER_KILL: u32 = 45;
const MAX_VOLLEYS: usize = 12;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Visions Foretold v{}", env!("CARGO_PKG_VERSION"));

    let slot: u8 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(0);

    let data = DataManager::new();
    let store = SaveStore::default();
    let mut skills = SkillManager::new(
        Arc::clone(&data.catalog),
        data.progression.clone(),
        CharacterStats::default(),
    );

    if store.exists(slot) {
        store.load_into(slot, &mut skills)?;
    } else {
        log::info!("Slot {} is empty, starting a new game", slot);
    }

    skills.subscribe(|event| match event {
        ProgressionEvent::LevelUp { new_level } => {
            println!("  * Level up! Now level {}", new_level)
        }
        ProgressionEvent::SkillUnlocked { skill_id, .. } => println!("  * Learned {}", skill_id),
        ProgressionEvent::SkillLeveledUp { skill_id, level } => {
            println!("  * {} is now level {}", skill_id, level)
        }
        _ => {}
    });

    let mut rng = StdRng::from_entropy();
    run_encounter(&mut skills, &data, &mut rng);
    spend_skill_points(&mut skills);

    store.save_manager(slot, &skills)?;

    let state = skills.state();
    println!(
        "Level {} {} | XP {}/{} | {} skill points | {} skills | HP {}/{}",
        state.level,
        level_title(state.level),
        state.experience,
        state.experience_to_next_level,
        state.skill_points,
        skills.unlocked_skills().count(),
        skills.target().current_health(),
        skills.target().max_health(),
    );
    for skill in skills.unlocked_skills() {
        let definition = skill.definition();
        let effects: Vec<_> = definition
            .effects
            .iter()
            .map(|effect| effect.describe(skill.current_level()))
            .collect();
        println!(
            "  {} [{} {}] lv {}: {}",
            skill.name(),
            definition.tier.name(),
            definition.category.name(),
            skill.current_level(),
            effects.join(", ")
        );
    }

    log::info!("Visions Foretold shut down cleanly");
    Ok(())
}

/// Fire volleys at a line of enemies until they are all dead
fn run_encounter(skills: &mut SkillManager, data: &DataManager, rng: &mut impl Rng) {
    let mut world = World::new();
    let enemies: Vec<_> = (0..ENEMY_COUNT)
        .map(|i| {
            world.spawn((
                Name(format!("Hollow Wretch {}", i + 1)),
                Position::new(8.0 + i as f32 * 1.5, 0.0, 0.0),
                Health::new(60),
                Layer(ENEMY_LAYER),
                Tag::new("Enemy"),
            ))
        })
        .collect();

    let rotation = ["fireball", "arcane_lance", "arrow"];
    for volley in 0..MAX_VOLLEYS {
        let alive: Vec<_> = enemies
            .iter()
            .copied()
            .filter(|&e| world.get::<&Health>(e).map(|h| !h.is_dead()).unwrap_or(false))
            .collect();
        if alive.is_empty() {
            break;
        }

        let preset = rotation[volley % rotation.len()];
        let Some(config) = data.projectile(preset) else {
            log::warn!("Missing projectile preset '{}'", preset);
            continue;
        };
        let mut config = config.clone().with_skill_bonuses(skills, rng);
        config.layer_mask = 1 << ENEMY_LAYER;

        let mut projectile = Projectile::new(config, Vec3::ZERO);
        for &target in &alive {
            let Ok(center) = world.get::<&Position>(target).map(|p| p.0) else {
                continue;
            };
            projectile.move_to(center);

            let impact = projectile.on_hit(&mut world, target, center, rng);
            for hit in &impact.hits {
                let healed = skills.life_steal_heal(hit.damage);
                skills.target_mut().heal(healed);
                if hit.killed {
                    let name = world
                        .get::<&Name>(hit.target)
                        .map(|n| n.0.clone())
                        .unwrap_or_default();
                    println!("{} falls to your {}", name, preset);
                    skills.add_experience(XP_PER_KILL);
                }
            }
            if projectile.is_destroyed() {
                break;
            }
        }

        let incoming = skills.mitigate_incoming_damage(rng.gen_range(4..10));
        skills.target_mut().take_damage(incoming);
    }
}

/// Unlock whatever is affordable, then pour the rest into levels
fn spend_skill_points(skills: &mut SkillManager) {
    loop {
        let next_unlock = skills
            .available_skills()
            .first()
            .map(|skill| skill.id().to_string());
        if let Some(id) = next_unlock {
            if skills.unlock_skill(&id) {
                continue;
            }
        }

        let next_level = skills
            .unlocked_skills()
            .filter(|skill| skill.can_level_up(skills.state()))
            .min_by_key(|skill| skill.level_up_cost())
            .map(|skill| skill.id().to_string());
        match next_level {
            Some(id) if skills.level_up_skill(&id) => continue,
            _ => break,
        }
    }
}
