//! Tests for single-image lookups

use std::fs;
use std::io::Write;
use image::GenericImageView;

use super::test_utils::{image_path, sample_entries, tar_bytes, tiff_bytes, write_archive, write_archive_as, Packing};
use crate::dataset::{DatasetAccessor, DatasetConfig, DatasetError, ImageKey, MemberKind};

#[test]
fn fetch_one_resolves_reference_member() {
    let archive = write_archive(&sample_entries(), Packing::Gzip);
    let mut accessor = archive.open();

    let key = ImageKey::new("adrenoceptor", "P1", 1, 1, "C10", 1);
    assert_eq!(
        accessor.member_path(&key).unwrap(),
        "training/adrenoceptor/211_11_17_X_Man_LOPAC_X5_LP_S1_1_C10_1_1.tiff"
    );

    let img = accessor.fetch_one("adrenoceptor", "P1", 1, 1, "C10", 1).unwrap();
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(img.to_luma8().get_pixel(0, 0).0, [10]);
    assert_eq!(img.to_luma8().get_pixel(3, 2).0, [15]);
}

#[test]
fn every_indexed_image_can_be_fetched() {
    for packing in [Packing::Plain, Packing::Gzip, Packing::Zstd] {
        let archive = write_archive(&sample_entries(), packing);
        let mut accessor = archive.open();

        let keys: Vec<ImageKey> = accessor
            .index()
            .members()
            .iter()
            .filter_map(|m| match &m.kind {
                MemberKind::Image(key) => Some(key.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(keys.len(), 3, "{:?}", packing);

        for key in &keys {
            let img = accessor.fetch(key).unwrap();
            assert!(img.width() > 0, "{:?} {}", packing, key);
        }

        // Lookups are independent of the order they are made in
        let img = accessor.fetch(&keys[0]).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
    }
}

#[test]
fn missing_member_is_not_found() {
    let archive = write_archive(&sample_entries(), Packing::Gzip);
    let mut accessor = archive.open();

    match accessor.fetch_one("adrenoceptor", "P1", 99, 1, "C10", 1) {
        Err(DatasetError::NotFound(path)) => {
            assert_eq!(path, image_path("adrenoceptor", "S1", 1, "C10", 1, 99));
        }
        other => panic!("expected NotFound, got {:?}", other.map(|i| i.dimensions())),
    }
}

#[test]
fn plate_in_archive_form_is_rejected() {
    let archive = write_archive(&sample_entries(), Packing::Plain);
    let mut accessor = archive.open();

    assert!(matches!(
        accessor.fetch_one("adrenoceptor", "S1", 1, 1, "C10", 1),
        Err(DatasetError::InvalidPlate(_))
    ));
}

#[test]
fn undecodable_member_reports_decode_error() {
    let entries = vec![(image_path("kinase", "S1", 1, "A01", 1, 1), b"II*\0garbage".to_vec())];
    let archive = write_archive(&entries, Packing::Gzip);
    let mut accessor = archive.open();

    assert!(matches!(
        accessor.fetch_one("kinase", "P1", 1, 1, "A01", 1),
        Err(DatasetError::DecodeError(_))
    ));
}

#[test]
fn compression_is_detected_from_magic_bytes() {
    let entries = vec![(image_path("kinase", "S1", 1, "A01", 1, 1), tiff_bytes(3, 3, 1))];

    for (packing, name) in [(Packing::Gzip, "Gzip"), (Packing::Zstd, "ZSTD"), (Packing::Plain, "Uncompressed")] {
        let archive = write_archive_as(&entries, packing, "training.bin");
        let mut accessor = archive.open();
        assert_eq!(accessor.compression_name(), name);
        assert!(accessor.fetch_one("kinase", "P1", 1, 1, "A01", 1).is_ok());
    }
}

#[test]
fn configured_compression_overrides_detection() {
    let entries = vec![(image_path("kinase", "S1", 1, "A01", 1, 1), tiff_bytes(3, 3, 1))];
    let archive = write_archive_as(&entries, Packing::Plain, "training.tar.gz");

    let mut config = DatasetConfig::for_archive(&archive.path);
    config.compression = "none".to_string();
    let mut accessor = DatasetAccessor::open(config).unwrap();
    assert_eq!(accessor.compression_name(), "Uncompressed");
    assert!(accessor.fetch_one("kinase", "P1", 1, 1, "A01", 1).is_ok());
}

#[test]
fn zstd_window_limit_applies_to_the_decoder() {
    let entries = vec![(image_path("kinase", "S1", 1, "A01", 1, 1), tiff_bytes(3, 3, 1))];
    let mut encoder = zstd::stream::write::Encoder::new(Vec::new(), 3).unwrap();
    encoder.window_log(20).unwrap();
    encoder.write_all(&tar_bytes(&entries)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("training.tar.zst");
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    // The frame declares a 1 MiB window
    let mut config = DatasetConfig::for_archive(&path);
    config.zstd_window_log_max = Some(10);
    assert!(DatasetAccessor::open(config.clone()).is_err());

    config.zstd_window_log_max = Some(20);
    let mut accessor = DatasetAccessor::open(config).unwrap();
    assert_eq!(accessor.index().image_count(), 1);
    assert!(accessor.fetch_one("kinase", "P1", 1, 1, "A01", 1).is_ok());
}

#[test]
fn summary_reports_index_contents() {
    let archive = write_archive(&sample_entries(), Packing::Gzip);
    let accessor = archive.open();

    let summary = accessor.summary();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "Dataset Summary:");
    assert_eq!(lines[1], format!("  Archive: {}", archive.path.display()));
    assert_eq!(
        &lines[2..],
        &[
            "  Compression: Gzip",
            "  Members: 6",
            "  Images: 3",
            "  Malformed image names: 1",
            "  Targets (2): adrenoceptor, kinase",
            "  Plates (2): P1, P2",
        ]
    );
}

#[test]
fn missing_archive_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatasetConfig::for_archive(dir.path().join("absent.tar.gz"));
    assert!(matches!(DatasetAccessor::open(config), Err(DatasetError::IoError(_))));
}
