//! System status dashboard command.

use anyhow::Result;
use console::style;

use firstgame_types::equipment::EquipmentKind;

use crate::state::AppState;

/// Totals shown by `firstgame status`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub characters: usize,
    pub weapons: usize,
    pub armors: usize,
    pub skills: usize,
    pub highest_level: i64,
}

/// Walk every character's loadout and tally what is equipped.
pub async fn gather(state: &AppState) -> Result<StatusCounts> {
    let characters = state.registrar.list(None).await?;
    let mut counts = StatusCounts {
        characters: characters.len(),
        highest_level: characters.iter().map(|c| c.level).max().unwrap_or(0),
        ..Default::default()
    };

    for character in &characters {
        let loadout = state.ledger.get_loadout(&character.id).await?;
        for kind in EquipmentKind::ALL {
            if loadout.slot(kind).is_some() {
                match kind {
                    EquipmentKind::Weapon => counts.weapons += 1,
                    EquipmentKind::Armor => counts.armors += 1,
                    EquipmentKind::Skill => counts.skills += 1,
                }
            }
        }
    }

    Ok(counts)
}

/// Display system status dashboard.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let counts = gather(state).await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "characters": counts.characters,
            "highest_level": counts.highest_level,
            "equipment": {
                "weapons": counts.weapons,
                "armors": counts.armors,
                "skills": counts.skills,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} firstgame v{}",
        style("⚔").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Characters ──").dim());
    println!("  Total:         {}", style(counts.characters).bold());
    println!("  Highest level: {}", style(counts.highest_level).green());
    println!();

    println!("  {}", style("── Equipment ──").dim());
    println!("  Weapons: {}", counts.weapons);
    println!("  Armors:  {}", counts.armors);
    println!("  Skills:  {}", counts.skills);
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!(
        "  Skill detach reverses stats: {}",
        state.config.ledger.reverse_skill_modifiers
    );
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::test_support::{register_and_login, test_state};
    use firstgame_types::equipment::NewEquipment;

    #[tokio::test]
    async fn test_gather_counts_equipped_slots() {
        let (_tmp, state) = test_state().await;
        let (hero, _) = register_and_login(&state, "Hero", "hero@example.com").await;
        register_and_login(&state, "Sidekick", "sidekick@example.com").await;

        state
            .ledger
            .equip(&hero.id, EquipmentKind::Weapon, NewEquipment::new("Sword", 5, 0))
            .await
            .unwrap();
        state
            .ledger
            .equip(&hero.id, EquipmentKind::Skill, NewEquipment::new("Focus", 0, 0))
            .await
            .unwrap();

        let counts = gather(&state).await.unwrap();
        assert_eq!(
            counts,
            StatusCounts {
                characters: 2,
                weapons: 1,
                armors: 0,
                skills: 1,
                highest_level: 1,
            }
        );
    }
}
