//! Verify `Timing` and `PoolConfig` round-trip through JSON the way an
//! external collaborator loading them from a config file would.
//!
//! Run with: cargo test --test config_serialization

use flowstep::executor::PoolConfig;
use flowstep::scheduler::Timing;

#[test]
fn timing_round_trips_through_json() {
    let timing = Timing {
        offset: 10,
        interval: 5,
        sleep: 3,
    };

    let json = serde_json::to_string(&timing).expect("Timing should serialize");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
    assert_eq!(parsed["offset"], 10);
    assert_eq!(parsed["interval"], 5);
    assert_eq!(parsed["sleep"], 3);

    let round_tripped: Timing = serde_json::from_str(&json).expect("Timing should deserialize");
    assert_eq!(round_tripped.offset, timing.offset);
    assert_eq!(round_tripped.interval, timing.interval);
    assert_eq!(round_tripped.sleep, timing.sleep);
}

#[test]
fn pool_config_round_trips_through_json() {
    let config = PoolConfig { worker_count: 8 };

    let json = serde_json::to_string(&config).expect("PoolConfig should serialize");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("should be valid JSON");
    assert_eq!(parsed["worker_count"], 8);

    let round_tripped: PoolConfig =
        serde_json::from_str(&json).expect("PoolConfig should deserialize");
    assert_eq!(round_tripped.worker_count, config.worker_count);
}

#[test]
fn pool_config_loads_from_config_file_json() {
    let raw = r#"{ "worker_count": 4 }"#;
    let config: PoolConfig = serde_json::from_str(raw).expect("should parse a hand-written config");
    assert_eq!(config.worker_count, 4);
}
