//! Tests for EventDataset construction
//!
//! These tests verify:
//! - Selection window validation (fail fast)
//! - Index map layout across files and directories
//! - Name filter and per-directory cap
//! - Empty windows
//! - Errors surfaced at construction (missing files, missing payload array)

use std::fs;
use std::path::{Path, PathBuf};

use eventset::backend::NativeBackend;
use eventset::container::ContainerBuilder;
use eventset::discovery::FileDiscovery;
use eventset::{DatasetConfig, DatasetError, EventDataset};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Write a container whose event `i` is `[tag, i]` and label is `tag * 1000 + i`
fn write_container(path: &Path, records: usize, tag: usize) {
    let mut payload = Vec::with_capacity(records * 2);
    for i in 0..records {
        payload.extend_from_slice(&[tag as f32, i as f32]);
    }
    let labels: Vec<i64> = (0..records).map(|i| (tag * 1000 + i) as i64).collect();

    let mut builder = ContainerBuilder::new(path).unwrap();
    builder.add_array("event_data", &[2], &payload).unwrap();
    builder.add_array("labels", &[], &labels).unwrap();
    builder.finish().unwrap();
}

fn config_for(dir: &Path, start: f64, use_: f64) -> DatasetConfig {
    DatasetConfig::builder()
        .directory(dir)
        .start_fraction(start)
        .use_fraction(use_)
        .build()
}

/// Discovery that returns a fixed list of names for every directory
struct FixedDiscovery(Vec<String>);

impl FileDiscovery for FixedDiscovery {
    fn list(&self, _dir: &Path) -> eventset::Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

// =============================================================================
// Selection Window Tests
// =============================================================================

#[test]
fn test_invalid_fractions_fail_construction() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("a.evd"), 10, 0);

    for (start, use_) in [(-0.1, 0.5), (1.0, 0.5), (0.0, 0.0), (0.0, 1.1), (0.51, 0.5)] {
        let result = EventDataset::open(config_for(temp.path(), start, use_));
        match result {
            Err(DatasetError::Validation(_)) => {}
            Err(e) => panic!("({}, {}) gave {}", start, use_, e),
            Ok(_) => panic!("({}, {}) was accepted", start, use_),
        }
    }
}

#[test]
fn test_validation_precedes_discovery() {
    // Directory does not exist; the bad window must still be reported
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp.path().join("missing"), 1.0, 0.5);

    let err = EventDataset::open(config).err().unwrap();
    assert!(err.is_validation());
}

#[test]
fn test_length_is_sum_of_floored_windows() {
    let temp = TempDir::new().unwrap();
    let sizes = [100usize, 50, 7, 33];
    for (i, size) in sizes.iter().enumerate() {
        write_container(&temp.path().join(format!("f{}.evd", i)), *size, i);
    }

    for (start, use_) in [(0.0, 1.0), (0.2, 0.3), (0.5, 0.5), (0.1, 0.25), (0.0, 0.01)] {
        let dataset = EventDataset::open(config_for(temp.path(), start, use_)).unwrap();
        let expected: usize = sizes
            .iter()
            .map(|&n| (use_ * n as f64).floor() as usize)
            .sum();
        assert_eq!(dataset.len(), expected, "start={} use={}", start, use_);
    }
}

// =============================================================================
// Index Layout Tests
// =============================================================================

#[test]
fn test_two_files_full_window() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("a.evd"), 100, 0);
    write_container(&temp.path().join("b.evd"), 50, 1);

    let dataset = EventDataset::open(config_for(temp.path(), 0.0, 1.0)).unwrap();

    assert_eq!(dataset.len(), 150);
    assert_eq!(dataset.files().len(), 2);
    assert_eq!(dataset.files()[0].path, temp.path().join("a.evd"));
    assert_eq!(dataset.files()[1].path, temp.path().join("b.evd"));

    for i in 0..100 {
        assert_eq!(dataset.locate(i), Some((0, i as u64)));
    }
    for i in 100..150 {
        assert_eq!(dataset.locate(i), Some((1, (i - 100) as u64)));
    }
    assert_eq!(dataset.locate(150), None);
}

#[test]
fn test_partial_window_offsets() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("a.evd"), 100, 0);

    let dataset = EventDataset::open(config_for(temp.path(), 0.2, 0.3)).unwrap();

    assert_eq!(dataset.len(), 30);
    let offsets: Vec<u64> = (0..dataset.len())
        .map(|i| dataset.locate(i).unwrap().1)
        .collect();
    assert_eq!(offsets, (20..50).collect::<Vec<u64>>());

    let file = dataset.source_file(0).unwrap();
    assert_eq!(file.record_count, 100);
    assert_eq!(file.selected, 20..50);
    assert_eq!(file.selected_count(), 30);
}

#[test]
fn test_empty_window_contributes_nothing() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("a_small.evd"), 3, 0);
    write_container(&temp.path().join("b_large.evd"), 40, 1);

    // 10% of 3 floors to zero
    let dataset = EventDataset::open(config_for(temp.path(), 0.0, 0.1)).unwrap();

    assert_eq!(dataset.files().len(), 2);
    assert_eq!(dataset.files()[0].selected_count(), 0);
    assert_eq!(dataset.len(), 4);
    assert_eq!(dataset.locate(0), Some((1, 0)));
}

#[test]
fn test_directories_are_concatenated_in_order() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("run_b");
    let second = temp.path().join("run_a");
    fs::create_dir(&first).unwrap();
    fs::create_dir(&second).unwrap();

    write_container(&first.join("x.evd"), 5, 0);
    write_container(&second.join("x.evd"), 8, 1);
    write_container(&second.join("y.evd"), 2, 2);

    let config = DatasetConfig::builder()
        .directories([&first, &second])
        .build();
    let dataset = EventDataset::open(config).unwrap();

    let ids: Vec<(usize, PathBuf)> = dataset
        .files()
        .iter()
        .map(|f| (f.file_id, f.path.clone()))
        .collect();
    assert_eq!(
        ids,
        vec![
            (0, first.join("x.evd")),
            (1, second.join("x.evd")),
            (2, second.join("y.evd")),
        ]
    );
    assert_eq!(dataset.len(), 15);
    assert_eq!(dataset.locate(5), Some((1, 0)));
    assert_eq!(dataset.locate(13), Some((2, 0)));
}

#[test]
fn test_empty_directory_gives_empty_dataset() {
    let temp = TempDir::new().unwrap();

    let dataset = EventDataset::open(config_for(temp.path(), 0.0, 1.0)).unwrap();

    assert!(dataset.is_empty());
    assert!(dataset.files().is_empty());
}

// =============================================================================
// Filter and Cap Tests
// =============================================================================

#[test]
fn test_name_filter_selects_matching_files() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("run1_train.evd"), 10, 0);
    write_container(&temp.path().join("run1_test.evd"), 20, 1);
    write_container(&temp.path().join("run2_train.evd"), 30, 2);

    let config = DatasetConfig::builder()
        .directory(temp.path())
        .name_filter("train")
        .build();
    let dataset = EventDataset::open(config).unwrap();

    assert_eq!(dataset.files().len(), 2);
    assert_eq!(dataset.len(), 40);
    assert!(dataset
        .files()
        .iter()
        .all(|f| f.path.to_string_lossy().contains("train")));
}

#[test]
fn test_max_files_per_directory() {
    let temp = TempDir::new().unwrap();
    for i in 0..5 {
        write_container(&temp.path().join(format!("events_{}.evd", i)), 10, i);
    }
    fs::write(temp.path().join("notes.txt"), b"not a container").unwrap();

    let config = DatasetConfig::builder()
        .directory(temp.path())
        .name_filter("events")
        .max_files_per_directory(2)
        .build();
    let dataset = EventDataset::open(config).unwrap();

    let names: Vec<PathBuf> = dataset.files().iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        names,
        vec![
            temp.path().join("events_0.evd"),
            temp.path().join("events_1.evd"),
        ]
    );
    assert_eq!(dataset.len(), 20);
}

#[test]
fn test_cap_follows_discovery_order() {
    let temp = TempDir::new().unwrap();
    for name in ["c.evd", "a.evd", "b.evd"] {
        write_container(&temp.path().join(name), 4, 0);
    }

    let discovery = FixedDiscovery(vec!["c.evd".into(), "a.evd".into(), "b.evd".into()]);
    let config = DatasetConfig::builder()
        .directory(temp.path())
        .max_files_per_directory(2)
        .build();
    let dataset = EventDataset::with_collaborators(config, &discovery, NativeBackend).unwrap();

    assert_eq!(dataset.files()[0].path, temp.path().join("c.evd"));
    assert_eq!(dataset.files()[1].path, temp.path().join("a.evd"));
    assert_eq!(dataset.files().len(), 2);
}

#[test]
fn test_zero_cap_keeps_all_files() {
    let temp = TempDir::new().unwrap();
    for i in 0..4 {
        write_container(&temp.path().join(format!("e{}.evd", i)), 1, i);
    }

    let config = DatasetConfig::builder()
        .directory(temp.path())
        .max_files_per_directory(0)
        .build();
    let dataset = EventDataset::open(config).unwrap();

    assert_eq!(dataset.files().len(), 4);
}

// =============================================================================
// Construction Error Tests
// =============================================================================

#[test]
fn test_missing_directory_is_not_found() {
    let temp = TempDir::new().unwrap();

    let err = EventDataset::open(config_for(&temp.path().join("nope"), 0.0, 1.0))
        .err()
        .unwrap();
    assert!(err.is_not_found());
}

#[test]
fn test_missing_file_at_probe_is_not_found() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("real.evd"), 4, 0);

    let discovery = FixedDiscovery(vec!["real.evd".into(), "ghost.evd".into()]);
    let result = EventDataset::with_collaborators(
        config_for(temp.path(), 0.0, 1.0),
        &discovery,
        NativeBackend,
    );

    match result {
        Err(DatasetError::NotFound { path, .. }) => assert_eq!(path, temp.path().join("ghost.evd")),
        Err(e) => panic!("expected NotFound, got {}", e),
        Ok(_) => panic!("expected NotFound"),
    }
}

#[test]
fn test_missing_payload_array_fails_probe() {
    let temp = TempDir::new().unwrap();
    let mut builder = ContainerBuilder::new(&temp.path().join("labels_only.evd")).unwrap();
    builder.add_array("labels", &[], &[1i64, 2, 3]).unwrap();
    builder.finish().unwrap();

    let err = EventDataset::open(config_for(temp.path(), 0.0, 1.0))
        .err()
        .unwrap();
    assert!(err.is_format());
}

#[test]
fn test_custom_array_names() {
    let temp = TempDir::new().unwrap();
    let mut builder = ContainerBuilder::new(&temp.path().join("custom.evd")).unwrap();
    builder.add_array("hits", &[], &[1.0f64, 2.0, 3.0, 4.0]).unwrap();
    builder.add_array("truth", &[], &[0u8, 1, 0, 1]).unwrap();
    builder.finish().unwrap();

    let config = DatasetConfig::builder()
        .directory(temp.path())
        .payload_array("hits")
        .label_array("truth")
        .build();
    let dataset = EventDataset::open(config).unwrap();

    assert_eq!(dataset.len(), 4);
    let sample = dataset.get(3).unwrap();
    assert_eq!(sample.payload.scalar::<f64>(), Some(4.0));
    assert_eq!(sample.label.scalar::<u8>(), Some(1));
}
