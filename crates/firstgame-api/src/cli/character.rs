//! Character inspection commands: list, show.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use firstgame_core::repository::character::CharacterFilter;
use firstgame_types::character::{Character, CharacterId};
use firstgame_types::equipment::{EquipmentKind, Loadout};

use crate::state::AppState;

/// List characters in a table.
pub async fn list_characters(
    state: &AppState,
    level: Option<i64>,
    limit: Option<i64>,
    offset: Option<i64>,
    json: bool,
) -> Result<()> {
    let filter = CharacterFilter {
        level,
        limit,
        offset,
        ..Default::default()
    };
    let characters = state.registrar.list(Some(filter)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&characters)?);
        return Ok(());
    }

    if characters.is_empty() {
        println!();
        println!(
            "  {} No characters found. Register one with: {}",
            style("i").blue().bold(),
            style("POST /characters").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Name").fg(Color::White),
        Cell::new("Email").fg(Color::White),
        Cell::new("Level").fg(Color::White),
        Cell::new("Exp").fg(Color::White),
        Cell::new("HP").fg(Color::White),
        Cell::new("MP").fg(Color::White),
        Cell::new("Atk/Def").fg(Color::White),
    ]);

    for character in &characters {
        table.add_row(vec![
            Cell::new(&character.name).fg(Color::Cyan),
            Cell::new(&character.email),
            Cell::new(character.level).fg(Color::Green),
            Cell::new(format!(
                "{}/{}",
                character.current_exp, character.next_level_exp
            )),
            Cell::new(format!(
                "{}/{}",
                character.current_health, character.max_health
            )),
            Cell::new(format!(
                "{}/{}",
                character.current_mana, character.max_mana
            )),
            Cell::new(format!("{}/{}", character.attack, character.defence)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} character{}",
        style(characters.len()).bold(),
        if characters.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Look a character up by id, falling back to an exact email match.
pub async fn resolve_character(state: &AppState, target: &str) -> Result<Character> {
    if let Ok(id) = target.parse::<CharacterId>() {
        return Ok(state.registrar.get(&id).await?);
    }

    let filter = CharacterFilter {
        email: Some(target.to_string()),
        ..Default::default()
    };
    state
        .registrar
        .list(Some(filter))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no character with id or email '{target}'"))
}

/// Show one character's profile and loadout.
pub async fn show_character(state: &AppState, target: &str, json: bool) -> Result<()> {
    let character = resolve_character(state, target).await?;
    let loadout = state.ledger.get_loadout(&character.id).await?;

    if json {
        let out = serde_json::json!({
            "character": character,
            "loadout": loadout,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {}  {}",
        style(&character.name).cyan().bold(),
        style(format!("Lv {}", character.level)).green()
    );
    println!();
    println!("  {}  {}", style("Email:").bold(), character.email);
    println!(
        "  {}  {}/{}",
        style("Exp:").bold(),
        character.current_exp,
        character.next_level_exp
    );
    println!(
        "  {}  {}/{}  {}  {}/{}",
        style("HP:").bold(),
        character.current_health,
        character.max_health,
        style("MP:").bold(),
        character.current_mana,
        character.max_mana
    );
    println!(
        "  {}  {}  {}  {}",
        style("Attack:").bold(),
        character.attack,
        style("Defence:").bold(),
        character.defence
    );
    let permissions: Vec<String> = character
        .permissions
        .iter()
        .map(|p| p.to_string())
        .collect();
    println!(
        "  {}  {}",
        style("Permissions:").bold(),
        style(permissions.join(", ")).dim()
    );
    println!(
        "  {}  {}",
        style("ID:").bold(),
        style(character.id.to_string()).dim()
    );
    println!();

    println!("  {}", style("── Loadout ──").dim());
    print_loadout(&loadout);
    println!();

    Ok(())
}

fn print_loadout(loadout: &Loadout) {
    for kind in EquipmentKind::ALL {
        let label = kind.to_string();
        match loadout.slot(kind) {
            Some(item) => println!(
                "  {:<7} {} {}",
                label,
                style(&item.name).cyan(),
                style(format!("(+{} atk, +{} def)", item.attack, item.defence)).dim()
            ),
            None => println!("  {:<7} {}", label, style("empty").dim()),
        }
    }
}
