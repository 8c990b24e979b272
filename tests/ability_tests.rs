use rand::{rngs::SmallRng, SeedableRng};
use seabattle::{
    Ability, AbilityAction, AbilityCounts, AbilityInput, AbilityManager, AbilityOutcome,
    BattleError, CellStatus, Coord, GameField, Orientation, ScanReading, ShipId, ShipManager,
    MAX_ABILITIES,
};

#[test]
fn test_prepare_asks_only_scanner_for_input() {
    let mut asked = 0;
    let mut input = || {
        asked += 1;
        (3usize, 4usize)
    };
    assert_eq!(Ability::DoubleDamage.prepare(&mut input), Some(AbilityAction::DoubleDamage));
    assert_eq!(Ability::Barrage.prepare(&mut input), Some(AbilityAction::Barrage));
    assert_eq!(
        Ability::Scanner.prepare(&mut input),
        Some(AbilityAction::Scan { x: 3, y: 4 })
    );
    assert_eq!(asked, 1);
}

#[test]
fn test_scan_reports_ship_cells() -> Result<(), BattleError> {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[2]).unwrap();
    field.place_ship(&mut fleet, ShipId(0), 1, 1, Orientation::Horizontal)?;

    let outcome = AbilityAction::Scan { x: 0, y: 0 }.apply(&mut field, &mut fleet, &mut rng)?;
    assert_eq!(
        outcome,
        AbilityOutcome::Scanned(vec![
            ScanReading { x: 0, y: 0, ship: false },
            ScanReading { x: 1, y: 0, ship: false },
            ScanReading { x: 0, y: 1, ship: false },
            ScanReading { x: 1, y: 1, ship: true },
        ])
    );
    // scanning reveals without changing anything
    assert_eq!(field.cell_status(0, 0)?, CellStatus::Empty);
    Ok(())
}

#[test]
fn test_scan_clips_at_edge() -> Result<(), BattleError> {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[1]).unwrap();
    let outcome = AbilityAction::Scan { x: 9, y: 9 }.apply(&mut field, &mut fleet, &mut rng)?;
    assert_eq!(
        outcome,
        AbilityOutcome::Scanned(vec![ScanReading { x: 9, y: 9, ship: false }])
    );

    assert_eq!(
        AbilityAction::Scan { x: 10, y: 0 }
            .apply(&mut field, &mut fleet, &mut rng)
            .unwrap_err(),
        BattleError::OutOfBounds { x: 10, y: 0 }
    );
    Ok(())
}

#[test]
fn test_double_damage_arms_field() -> Result<(), BattleError> {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[1]).unwrap();
    let outcome = AbilityAction::DoubleDamage.apply(&mut field, &mut fleet, &mut rng)?;
    assert_eq!(outcome, AbilityOutcome::DoubleDamageArmed);
    assert!(field.is_double_damage_armed());
    Ok(())
}

#[test]
fn test_barrage_damages_one_segment() -> Result<(), BattleError> {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[4]).unwrap();
    field.place_ship(&mut fleet, ShipId(0), 0, 0, Orientation::Horizontal)?;

    let outcome = AbilityAction::Barrage.apply(&mut field, &mut fleet, &mut rng)?;
    let AbilityOutcome::Barrage(Some(hit)) = outcome else {
        panic!("barrage should strike the only ship, got {:?}", outcome);
    };
    assert_eq!(hit.ship, ShipId(0));
    assert!(!hit.sunk);
    let damaged = fleet
        .ship(ShipId(0))?
        .segments()
        .iter()
        .filter(|s| s.ordinal() > 0)
        .count();
    assert_eq!(damaged, 1);
    Ok(())
}

#[test]
fn test_barrage_can_sink() -> Result<(), BattleError> {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[1]).unwrap();
    field.place_ship(&mut fleet, ShipId(0), 0, 0, Orientation::Horizontal)?;

    let first = AbilityAction::Barrage.apply(&mut field, &mut fleet, &mut rng)?;
    assert!(matches!(first, AbilityOutcome::Barrage(Some(hit)) if !hit.sunk));
    let second = AbilityAction::Barrage.apply(&mut field, &mut fleet, &mut rng)?;
    assert!(matches!(second, AbilityOutcome::Barrage(Some(hit)) if hit.sunk));
    assert!(fleet.all_sunk());
    Ok(())
}

#[test]
fn test_barrage_on_empty_field() -> Result<(), BattleError> {
    let mut rng = SmallRng::seed_from_u64(6);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[1]).unwrap();
    let outcome = AbilityAction::Barrage.apply(&mut field, &mut fleet, &mut rng)?;
    assert_eq!(outcome, AbilityOutcome::Barrage(None));
    Ok(())
}

#[test]
fn test_manager_starts_with_one() {
    let mut rng = SmallRng::seed_from_u64(7);
    let manager = AbilityManager::new(&mut rng);
    assert_eq!(manager.len(), 1);
    assert!(manager.front().is_some());
}

#[test]
fn test_queue_is_fifo() -> Result<(), BattleError> {
    let mut rng = SmallRng::seed_from_u64(8);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[1]).unwrap();
    let mut manager = AbilityManager::empty();
    manager.push(Ability::DoubleDamage);
    manager.push(Ability::Scanner);

    let mut input = || (0usize, 0usize);
    let first = manager.use_ability(&mut field, &mut fleet, &mut input, &mut rng)?;
    assert_eq!(first, AbilityOutcome::DoubleDamageArmed);
    assert_eq!(manager.front(), Some(Ability::Scanner));
    let second = manager.use_ability(&mut field, &mut fleet, &mut input, &mut rng)?;
    assert!(matches!(second, AbilityOutcome::Scanned(_)));

    assert_eq!(
        manager
            .use_ability(&mut field, &mut fleet, &mut input, &mut rng)
            .unwrap_err(),
        BattleError::NoAbilityAvailable
    );
    Ok(())
}

#[test]
fn test_failed_ability_is_still_spent() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[1]).unwrap();
    let mut manager = AbilityManager::empty();
    manager.push(Ability::Scanner);

    let mut input = || (42usize, 0usize);
    assert!(manager
        .use_ability(&mut field, &mut fleet, &mut input, &mut rng)
        .is_err());
    assert!(manager.is_empty());
}

#[test]
fn test_random_abilities_cover_all_kinds() {
    let mut rng = SmallRng::seed_from_u64(10);
    let mut manager = AbilityManager::empty();
    for _ in 0..300 {
        manager.add_random_ability(&mut rng);
    }
    let counts = manager.counts();
    assert!(counts.double_damage > 0);
    assert!(counts.scanner > 0);
    assert!(counts.barrage > 0);
    assert_eq!(counts.double_damage + counts.scanner + counts.barrage, 300);
}

#[test]
fn test_counts_rebuild_grouped() {
    let mut manager = AbilityManager::empty();
    for ability in [Ability::Barrage, Ability::DoubleDamage, Ability::Scanner, Ability::Barrage] {
        manager.push(ability);
    }
    let counts = manager.counts();
    assert_eq!(
        counts,
        AbilityCounts {
            double_damage: 1,
            scanner: 1,
            barrage: 2
        }
    );
    let rebuilt = AbilityManager::from_counts(counts).unwrap();
    assert_eq!(
        rebuilt.iter().collect::<Vec<_>>(),
        vec![Ability::DoubleDamage, Ability::Scanner, Ability::Barrage, Ability::Barrage]
    );
}

#[test]
fn test_display_names() {
    assert_eq!(Ability::DoubleDamage.to_string(), "Double damage");
    assert_eq!(Ability::Scanner.to_string(), "Scanner");
    assert_eq!(Ability::Barrage.to_string(), "Barrage");
}

struct NoAnswer;

impl AbilityInput for NoAnswer {
    fn scan_origin(&mut self) -> Option<Coord> {
        None
    }
}

#[test]
fn test_cancelled_input_keeps_ability() {
    let mut rng = SmallRng::seed_from_u64(11);
    let mut field = GameField::default();
    let mut fleet = ShipManager::new(&[1]).unwrap();
    let mut manager = AbilityManager::empty();
    manager.push(Ability::Scanner);
    manager.push(Ability::Barrage);

    assert!(matches!(
        manager
            .use_ability(&mut field, &mut fleet, &mut NoAnswer, &mut rng)
            .unwrap_err(),
        BattleError::InvalidArgument(_)
    ));
    assert_eq!(
        manager.iter().collect::<Vec<_>>(),
        vec![Ability::Scanner, Ability::Barrage]
    );
}

#[test]
fn test_oversized_counts_rejected() {
    let at_cap = AbilityCounts {
        double_damage: MAX_ABILITIES,
        scanner: 0,
        barrage: 0,
    };
    assert_eq!(AbilityManager::from_counts(at_cap).unwrap().len(), MAX_ABILITIES);

    let over = AbilityCounts {
        scanner: 1,
        ..at_cap
    };
    assert!(AbilityManager::from_counts(over).is_err());

    let huge = AbilityCounts {
        double_damage: usize::MAX,
        scanner: 1,
        barrage: 0,
    };
    assert!(AbilityManager::from_counts(huge).is_err());
}
