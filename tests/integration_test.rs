//! Integration tests for the dataset workflow

use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};

use cellkit::utils::logger::Logger;
use cellkit::{CellKit, DatasetAccessor, DatasetConfig, MetadataTable};

const PREFIX: &str = "211_11_17_X_Man_LOPAC_X5_LP";

fn tiff(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 7]));
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img).write_to(&mut cursor, ImageFormat::Tiff).unwrap();
    cursor.into_inner()
}

fn write_training_archive(path: &Path) {
    let members = [
        (format!("training/adrenoceptor/{}_S1_1_C10_1_1.tiff", PREFIX), tiff(8, 4)),
        (format!("training/adrenoceptor/{}_S1_1_C10_1_2.tiff", PREFIX), tiff(3, 3)),
        ("training/README".to_string(), b"LOPAC screen".to_vec()),
        (format!("training/opioid/{}_S4_2_B03_5_12.tiff", PREFIX), tiff(5, 6)),
    ];

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in &members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, name.as_str(), data.as_slice()).unwrap();
    }
    let gz = builder.into_inner().unwrap().finish().unwrap();
    fs::write(path, gz).unwrap();
}

#[test]
fn test_complete_dataset_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("training.tar.gz");
    write_training_archive(&archive);

    let mut accessor = DatasetAccessor::open(DatasetConfig::for_archive(&archive)).unwrap();
    assert_eq!(accessor.index().image_count(), 3);

    // Single lookup for the reference image
    let img = accessor.fetch_one("adrenoceptor", "P1", 1, 1, "C10", 1).unwrap();
    assert_eq!(img.dimensions(), (8, 4));
    assert_eq!(img.to_rgb8().get_pixel(7, 3).0, [7, 3, 7]);

    // Bulk lookup driven by a metadata CSV
    let csv = "\
target,cell_id,well,plate,field,replicate,cell_code
opioid,12,B03,P4,5,2,opi-12
adrenoceptor,1,C10,P1,1,1,adr-1
adrenoceptor,9,C10,P1,1,1,adr-9
";
    let table = MetadataTable::from_reader(csv.as_bytes()).unwrap();
    let fetched: Vec<_> = accessor
        .fetch_all(&table)
        .unwrap()
        .map(|r| r.unwrap())
        .map(|f| (f.cell_code, f.target, f.image.dimensions()))
        .collect();

    assert_eq!(
        fetched,
        vec![
            ("adr-1".to_string(), "adrenoceptor".to_string(), (8, 4)),
            ("opi-12".to_string(), "opioid".to_string(), (5, 6)),
        ]
    );
}

#[test]
fn test_facade_exports_matches() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("training.tar.gz");
    write_training_archive(&archive);

    let metadata = dir.path().join("training_data.csv");
    let mut file = fs::File::create(&metadata).unwrap();
    writeln!(file, ",target,cell_id,well,plate,field,replicate,cell_code").unwrap();
    writeln!(file, "0,adrenoceptor,2,C10,P1,1,1,adr/2").unwrap();
    writeln!(file, "1,opioid,12,B03,P4,5,2,opi-12").unwrap();
    writeln!(file, "2,opioid,12,B03,P4,5,2,opi-dup").unwrap();
    drop(file);

    let log_file = dir.path().join("cellkit.log");
    let mut kit = CellKit::open(&archive, log_file.to_str()).unwrap();

    let summary = kit.summary();
    assert!(summary.contains("Compression: Gzip"));
    assert!(summary.contains("Images: 3"));
    assert!(summary.contains("Targets (2): adrenoceptor, opioid"));
    assert!(summary.contains("Plates (2): P1, P4"));

    let out = dir.path().join("out");
    let result = kit.fetch_all_into(&metadata, &out, "png").unwrap();
    assert_eq!(result.written, 2);
    assert_eq!(result.failed, 0);
    assert_eq!(result.ambiguous, 1);

    let adr = image::open(out.join("adrenoceptor").join("adr_2.png")).unwrap();
    assert_eq!(adr.dimensions(), (3, 3));
    assert!(out.join("opioid").join("opi-12.png").exists());
    assert!(!out.join("opioid").join("opi-dup.png").exists());

    let img = kit.fetch_one("opioid", "P4", 12, 2, "B03", 5).unwrap();
    assert_eq!(img.dimensions(), (5, 6));
    assert!(kit.fetch_one("opioid", "P4", 13, 2, "B03", 5).is_err());

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("Export:"));
    assert!(log.contains("written: 2"));
}

#[test]
fn test_global_logger_records_library_messages() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("cellkit-global.log");
    Logger::init_global_logger(log_file.to_str().unwrap(), false).unwrap();

    let archive = dir.path().join("training.tar.gz");
    write_training_archive(&archive);
    DatasetAccessor::open(DatasetConfig::for_archive(&archive)).unwrap();

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("[INFO] Indexed 4 members (3 images, 0 malformed)"), "{}", log);
}
