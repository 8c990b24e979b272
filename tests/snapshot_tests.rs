use rand::{rngs::SmallRng, Rng, SeedableRng};
use seabattle::snapshot::{deserialize_field, serialize_field};
use seabattle::{
    place_fleet, Ability, AbilityManager, BattleError, CellStatus, GameField, GameSnapshot,
    Orientation, ShipId, ShipManager, BOARD_HEIGHT, BOARD_WIDTH, FLEET, MAX_ABILITIES,
};

fn played_field(seed: u64) -> (GameField, ShipManager) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&FLEET).unwrap();
    place_fleet(&mut rng, &mut field, &mut fleet).unwrap();
    for _ in 0..40 {
        let x = rng.random_range(0..BOARD_WIDTH);
        let y = rng.random_range(0..BOARD_HEIGHT);
        field.attack_cell(x, y, &mut fleet).unwrap();
    }
    (field, fleet)
}

fn display_grid(field: &GameField, fleet: &ShipManager) -> Vec<char> {
    (0..BOARD_HEIGHT)
        .flat_map(|y| (0..BOARD_WIDTH).map(move |x| (x, y)))
        .map(|(x, y)| field.display_char_at(x, y, fleet).unwrap())
        .collect()
}

fn sample_snapshot(seed: u64) -> GameSnapshot {
    let (user_field, user_fleet) = played_field(seed);
    let (computer_field, computer_fleet) = played_field(seed.wrapping_add(1));
    let mut abilities = AbilityManager::empty();
    abilities.push(Ability::Scanner);
    abilities.push(Ability::Barrage);
    abilities.push(Ability::Scanner);
    GameSnapshot::capture(
        &user_field,
        &user_fleet,
        &computer_field,
        &computer_fleet,
        &abilities,
    )
    .unwrap()
}

#[test]
fn test_field_roundtrip_keeps_display() {
    for seed in 0..20 {
        let (field, fleet) = played_field(seed);
        let data = serialize_field(&field, &fleet).unwrap();
        assert_eq!(data.ships.len(), FLEET.len());

        let mut restored_fleet = ShipManager::new(&FLEET).unwrap();
        let restored = deserialize_field(&data, &mut restored_fleet).unwrap();
        assert_eq!(display_grid(&field, &fleet), display_grid(&restored, &restored_fleet));
        assert_eq!(restored_fleet.remaining(), fleet.remaining());
    }
}

#[test]
fn test_text_roundtrip() {
    let snapshot = sample_snapshot(11);
    let text = snapshot.to_string();
    assert!(text.starts_with("10 10\n"));
    let parsed: GameSnapshot = text.parse().unwrap();
    assert_eq!(parsed, snapshot);
    assert_eq!(parsed.abilities.scanner, 2);
    assert_eq!(parsed.abilities.barrage, 1);
    assert_eq!(parsed.abilities.double_damage, 0);
}

#[test]
fn test_wrong_dimensions_rejected() {
    let text = sample_snapshot(12).to_string();
    let resized = text.replacen("10 10", "8 8", 1);
    assert!(matches!(
        resized.parse::<GameSnapshot>().unwrap_err(),
        BattleError::FileFormat(_)
    ));
}

#[test]
fn test_truncated_and_garbage_rejected() {
    let text = sample_snapshot(13).to_string();
    let truncated = &text[..text.len() / 2];
    assert!(matches!(
        truncated.parse::<GameSnapshot>().unwrap_err(),
        BattleError::FileFormat(_)
    ));
    assert!(matches!(
        "not a save file".parse::<GameSnapshot>().unwrap_err(),
        BattleError::FileFormat(_)
    ));
    let trailing = format!("{}7\n", text);
    assert!(matches!(
        trailing.parse::<GameSnapshot>().unwrap_err(),
        BattleError::FileFormat(_)
    ));
}

#[test]
fn test_bad_ordinals_rejected() {
    let mut text = String::from("10 10\n");
    text.push_str(&"5 ".repeat(BOARD_WIDTH * BOARD_HEIGHT));
    assert!(matches!(
        text.parse::<GameSnapshot>().unwrap_err(),
        BattleError::FileFormat(_)
    ));
}

#[test]
fn test_unmatched_ship_length_rejected() -> Result<(), BattleError> {
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[1]).unwrap();
    field.place_ship(&mut fleet, ShipId(0), 0, 0, Orientation::Horizontal)?;
    let data = serialize_field(&field, &fleet)?;

    // a fleet with no ship of length 1 cannot take the record
    let mut other = ShipManager::new(&[2]).unwrap();
    assert!(matches!(
        deserialize_field(&data, &mut other).unwrap_err(),
        BattleError::FileFormat(_)
    ));
    Ok(())
}

#[test]
fn test_orphan_ship_cell_rejected() {
    let mut data = serialize_field(&GameField::default(), &ShipManager::new(&[1]).unwrap()).unwrap();
    data.cells[5] = CellStatus::Ship;
    let mut fleet = ShipManager::new(&FLEET).unwrap();
    assert!(matches!(
        deserialize_field(&data, &mut fleet).unwrap_err(),
        BattleError::FileFormat(_)
    ));
}

#[test]
fn test_bincode_roundtrip() {
    let snapshot = sample_snapshot(14);
    let bytes = bincode::serialize(&snapshot).unwrap();
    let decoded: GameSnapshot = bincode::deserialize(&bytes).unwrap();
    assert_eq!(decoded, snapshot);
}

#[test]
fn test_file_roundtrip() {
    let snapshot = sample_snapshot(15);
    let path = std::env::temp_dir().join(format!("seabattle_snapshot_{}.sav", std::process::id()));
    seabattle::snapshot::save_to_file(&path, &snapshot).unwrap();
    let loaded = seabattle::snapshot::load_from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, snapshot);

    assert!(seabattle::snapshot::load_from_file(&path).is_err());
}

#[test]
fn test_oversized_ability_counts_rejected() {
    let text = sample_snapshot(16).to_string();
    let body = text.trim_end().rsplit_once('\n').unwrap().0;
    for counts in ["18446744073709551615 0 0", "0 1024 1", "600 600 0"] {
        let forged = format!("{}\n{}\n", body, counts);
        assert!(matches!(
            forged.parse::<GameSnapshot>().unwrap_err(),
            BattleError::FileFormat(_)
        ));
    }
    let fine = format!("{}\n{} 0 0\n", body, MAX_ABILITIES);
    assert_eq!(fine.parse::<GameSnapshot>().unwrap().abilities.double_damage, MAX_ABILITIES);
}
