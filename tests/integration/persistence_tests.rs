//! Selected-speed storage against a mock NVS.

use battfan::app::persistence::{
    SPEED_KEY, SPEED_NAMESPACE, load_speed, load_speed_or_default, save_speed,
};
use battfan::app::ports::StorageError;
use battfan::error::PersistenceError;
use battfan::speed::SpeedState;

use crate::mock_hw::MockNvs;

#[test]
fn medium_round_trips_as_decimal() {
    let mut nvs = MockNvs::new();
    save_speed(&mut nvs, SpeedState::Medium).unwrap();

    assert_eq!(nvs.raw(SPEED_NAMESPACE, SPEED_KEY), Some(&b"3"[..]));
    assert_eq!(load_speed_or_default(&nvs), SpeedState::Medium);
}

#[test]
fn every_level_round_trips() {
    let mut nvs = MockNvs::new();
    for speed in SpeedState::ALL {
        save_speed(&mut nvs, speed).unwrap();
        assert_eq!(load_speed(&nvs), Ok(speed));
    }
}

#[test]
fn corrupted_value_loads_idle() {
    let nvs = MockNvs::with(SPEED_NAMESPACE, SPEED_KEY, b"high");
    assert_eq!(load_speed(&nvs), Err(PersistenceError::Malformed));
    assert_eq!(load_speed_or_default(&nvs), SpeedState::Idle);
}

#[test]
fn oversized_value_loads_idle() {
    // Starts with a valid digit; must not be cut down to one.
    let nvs = MockNvs::with(SPEED_NAMESPACE, SPEED_KEY, b"3       garbage");
    assert_eq!(load_speed(&nvs), Err(PersistenceError::Malformed));
    assert_eq!(load_speed_or_default(&nvs), SpeedState::Idle);
}

#[test]
fn empty_value_loads_idle() {
    let nvs = MockNvs::with(SPEED_NAMESPACE, SPEED_KEY, b"");
    assert_eq!(load_speed(&nvs), Err(PersistenceError::Malformed));
    assert_eq!(load_speed_or_default(&nvs), SpeedState::Idle);
}

#[test]
fn out_of_range_loads_idle() {
    let nvs = MockNvs::with(SPEED_NAMESPACE, SPEED_KEY, b"42");
    assert_eq!(load_speed(&nvs), Err(PersistenceError::OutOfRange(42)));
    assert_eq!(load_speed_or_default(&nvs), SpeedState::Idle);
}

#[test]
fn read_failure_loads_idle() {
    let mut nvs = MockNvs::with(SPEED_NAMESPACE, SPEED_KEY, b"2");
    nvs.fail_reads = true;
    assert_eq!(
        load_speed(&nvs),
        Err(PersistenceError::Read(StorageError::IoError))
    );
    assert_eq!(load_speed_or_default(&nvs), SpeedState::Idle);
}

#[test]
fn write_failure_is_reported_once() {
    let mut nvs = MockNvs::new();
    nvs.fail_writes = true;
    assert_eq!(
        save_speed(&mut nvs, SpeedState::Low),
        Err(PersistenceError::Write(StorageError::Full))
    );
    assert_eq!(nvs.writes, 0);
}
