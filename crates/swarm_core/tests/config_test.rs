//! Integration tests for loading configuration files.

use std::path::PathBuf;

use swarm_core::{SimdBackend, SwarmConfig, SwarmError, World};

fn temp_config_path() -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_swarm_{id}.toml"))
}

#[test]
fn test_load_config_file() {
    let path = temp_config_path();
    std::fs::write(
        &path,
        "[storage]\nchunk_capacity = 512\n\n[executor]\nvector_width = 4\nallow_intrinsics = false\nworker_count = 2\n",
    )
    .unwrap();

    let config = SwarmConfig::load(&path).unwrap();
    assert_eq!(config.storage.chunk_capacity, 512);
    assert_eq!(config.storage.initial_chunk_slots, 16);
    assert_eq!(config.executor.worker_count, Some(2));

    let world = World::new(&config).unwrap();
    assert_eq!(world.executor().backend(), SimdBackend::Lanes4);
    assert_eq!(world.executor().worker_count(), 2);
    assert_eq!(world.archetype().chunk_capacity(), 512);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let path = temp_config_path();
    assert!(matches!(SwarmConfig::load(&path), Err(SwarmError::Io(_))));
}

#[test]
fn test_bad_values_are_rejected() {
    let path = temp_config_path();
    std::fs::write(&path, "[executor]\nvector_width = 3\n").unwrap();
    assert!(matches!(
        SwarmConfig::load(&path),
        Err(SwarmError::InvalidConfig(_))
    ));

    std::fs::write(&path, "[storage]\nchunk_size = 10\n").unwrap();
    assert!(matches!(
        SwarmConfig::load(&path),
        Err(SwarmError::ConfigParse(_))
    ));

    std::fs::remove_file(&path).ok();
}
