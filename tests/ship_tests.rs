use seabattle::{BattleError, Orientation, SegmentStatus, Ship};
use proptest::prelude::*;

#[test]
fn test_new_ship_is_intact() -> Result<(), BattleError> {
    let ship = Ship::new(3, Orientation::Vertical)?;
    assert_eq!(ship.length(), 3);
    assert_eq!(ship.orientation(), Orientation::Vertical);
    assert_eq!(ship.segments(), &[SegmentStatus::Intact; 3]);
    assert!(!ship.is_sunk());
    Ok(())
}

#[test]
fn test_invalid_lengths_rejected() {
    assert_eq!(
        Ship::new(0, Orientation::Horizontal).unwrap_err(),
        BattleError::InvalidShipLength(0)
    );
    assert_eq!(
        Ship::new(5, Orientation::Horizontal).unwrap_err(),
        BattleError::InvalidShipLength(5)
    );
    assert!(Ship::new(1, Orientation::Horizontal).is_ok());
    assert!(Ship::new(4, Orientation::Horizontal).is_ok());
}

#[test]
fn test_damage_progression() -> Result<(), BattleError> {
    let mut ship = Ship::new(2, Orientation::Horizontal)?;
    ship.apply_damage(0, 1)?;
    assert_eq!(ship.segment_status(0)?, SegmentStatus::Damaged);
    assert_eq!(ship.segment_status(1)?, SegmentStatus::Intact);

    ship.apply_damage(0, 1)?;
    assert_eq!(ship.segment_status(0)?, SegmentStatus::Destroyed);
    assert!(!ship.is_sunk());

    // past destroyed nothing changes
    ship.apply_damage(0, 5)?;
    assert_eq!(ship.segment_status(0)?, SegmentStatus::Destroyed);

    ship.apply_damage(1, 2)?;
    assert!(ship.is_sunk());
    Ok(())
}

#[test]
fn test_zero_damage_is_noop() -> Result<(), BattleError> {
    let mut ship = Ship::new(1, Orientation::Horizontal)?;
    ship.apply_damage(0, 0)?;
    assert_eq!(ship.segment_status(0)?, SegmentStatus::Intact);
    Ok(())
}

#[test]
fn test_damage_argument_errors() -> Result<(), BattleError> {
    let mut ship = Ship::new(3, Orientation::Horizontal)?;
    assert_eq!(
        ship.apply_damage(3, 1).unwrap_err(),
        BattleError::IndexOutOfRange { index: 3, length: 3 }
    );
    assert!(matches!(
        ship.apply_damage(0, -1).unwrap_err(),
        BattleError::InvalidArgument(_)
    ));
    assert_eq!(
        ship.segment_status(7).unwrap_err(),
        BattleError::IndexOutOfRange { index: 7, length: 3 }
    );
    assert_eq!(ship.segments(), &[SegmentStatus::Intact; 3]);
    Ok(())
}

proptest! {
    #[test]
    fn damage_is_monotonic(
        length in 1usize..=4,
        hits in proptest::collection::vec((0usize..4, 0i32..4), 0..20),
    ) {
        let mut ship = Ship::new(length, Orientation::Horizontal).unwrap();
        for (index, amount) in hits {
            let before = ship.segments().to_vec();
            let res = ship.apply_damage(index, amount);
            prop_assert_eq!(res.is_ok(), index < length);
            for (old, new) in before.iter().zip(ship.segments()) {
                prop_assert!(new >= old);
            }
            let all_destroyed = ship.segments().iter().all(|s| *s == SegmentStatus::Destroyed);
            prop_assert_eq!(ship.is_sunk(), all_destroyed);
        }
    }
}
