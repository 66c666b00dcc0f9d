//! Tests for archive indexing

use super::test_utils::{image_path, sample_entries, tar_bytes, tiff_bytes, write_archive, Packing};
use crate::dataset::{ArchiveIndex, DatasetConfig, FilenameCodec, ImageKey, MemberKind};

fn build(entries: &[(String, Vec<u8>)]) -> ArchiveIndex {
    let tar = tar_bytes(entries);
    ArchiveIndex::build(tar.as_slice(), &FilenameCodec::new(&DatasetConfig::default())).unwrap()
}

#[test]
fn indexes_regular_files_only() {
    let index = build(&sample_entries());

    // Two directory entries are left out
    assert_eq!(index.len(), 6);
    assert_eq!(index.image_count(), 3);
    assert_eq!(index.malformed_count(), 1);
    assert_eq!(index.targets(), vec!["adrenoceptor", "kinase"]);
    assert_eq!(index.plates(), vec!["P1", "P2"]);
}

#[test]
fn offsets_point_at_member_data() {
    let entries = sample_entries();
    let tar = tar_bytes(&entries);
    let index = ArchiveIndex::build(tar.as_slice(), &FilenameCodec::new(&DatasetConfig::default())).unwrap();

    for member in index.members() {
        let (_, data) = entries.iter().find(|(path, _)| *path == member.path).unwrap();
        let start = member.offset as usize;
        assert_eq!(&tar[start..start + member.size as usize], data.as_slice(), "{}", member.path);
    }
}

#[test]
fn lookups_by_path_and_key_agree() {
    let index = build(&sample_entries());
    let key = ImageKey::new("kinase", "P2", 7, 3, "D04", 2);

    let by_key = index.get_by_key(&key).unwrap();
    let by_path = index.get_by_path(&image_path("kinase", "S2", 3, "D04", 2, 7)).unwrap();
    assert_eq!(by_key, by_path);
    assert_eq!(by_key.kind, MemberKind::Image(key));
    assert!(index.get_by_key(&ImageKey::new("kinase", "P2", 8, 3, "D04", 2)).is_none());
}

#[test]
fn leading_dot_slash_is_stripped() {
    let path = image_path("kinase", "S1", 1, "A01", 1, 1);
    let index = build(&[(format!("./{}", path), tiff_bytes(2, 2, 0))]);
    assert!(index.get_by_path(&path).is_some());
    assert_eq!(index.image_count(), 1);
}

#[test]
fn repeated_path_resolves_to_last_occurrence() {
    let path = image_path("kinase", "S1", 1, "A01", 1, 1);
    let index = build(&[
        (path.clone(), tiff_bytes(2, 2, 0)),
        (path.clone(), tiff_bytes(7, 7, 0)),
    ]);

    assert_eq!(index.len(), 2);
    assert_eq!(index.image_count(), 1);
    let member = index.get_by_path(&path).unwrap();
    assert_eq!(member.offset, index.members()[1].offset);
}

#[test]
fn custom_layout_is_honoured() {
    let config = DatasetConfig::from_str(
        "[archive]\nroot_dir = \"validation\"\n[filename]\nprefix = \"LP\"\nsuffix = \".tif\"\n[plate]\narchive_letter = \"Q\"\n",
    )
    .unwrap();
    let codec = FilenameCodec::new(&config);
    let key = ImageKey::new("opioid", "P4", 12, 2, "B03", 5);
    assert_eq!(codec.member_path(&key).unwrap(), "validation/opioid/LP_Q4_2_B03_5_12.tif");

    let entries = vec![("validation/opioid/LP_Q4_2_B03_5_12.tif".to_string(), tiff_bytes(2, 2, 0))];
    let archive = write_archive(&entries, Packing::Plain);
    let mut config = config;
    config.archive_path = archive.path.clone();
    let mut accessor = crate::dataset::DatasetAccessor::open(config).unwrap();
    assert!(accessor.fetch(&key).is_ok());
}
