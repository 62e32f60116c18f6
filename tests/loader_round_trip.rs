use std::io::Write;

use insurance_dash::csv_reader::{read_data, write_records};
use insurance_dash::{DashError, Dataset, Record, Region, Sex, Smoker};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn random_records(n: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Record {
            age: rng.gen_range(18..=64),
            sex: *Sex::ALL.choose(&mut rng).expect("non-empty"),
            bmi: rng.gen_range(15.0..53.0),
            children: rng.gen_range(0..=5),
            smoker: *Smoker::ALL.choose(&mut rng).expect("non-empty"),
            region: *Region::ALL.choose(&mut rng).expect("non-empty"),
            charges: rng.gen_range(1_100.0..64_000.0),
        })
        .collect()
}

#[test]
fn written_rows_load_back_unchanged() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("insurance.csv");

    let records = random_records(250, 42);
    let file = std::fs::File::create(&path).expect("create");
    write_records(file, &records).expect("write");

    let loaded = read_data(&path).expect("load");
    assert_eq!(loaded.len(), records.len());
    assert_eq!(loaded, records);
}

#[test]
fn dataset_handle_reports_source() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("insurance.csv");
    let records = random_records(5, 7);
    write_records(std::fs::File::create(&path).expect("create"), &records).expect("write");

    let dataset = Dataset::load(&path).expect("load");
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.records(), records.as_slice());
    assert!(dataset.source().ends_with("insurance.csv"));
}

#[test]
fn hand_written_file_with_integer_floats() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("insurance.csv");
    let mut file = std::fs::File::create(&path).expect("create");
    writeln!(file, "age,sex,bmi,children,smoker,region,charges").expect("write");
    writeln!(file, "28,male,33,3,no,southeast,4449.462").expect("write");
    writeln!(file, "60,female,25.84,0,no,northwest,28923.13692").expect("write");
    drop(file);

    let loaded = read_data(&path).expect("load");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].bmi, 33.0);
    assert_eq!(loaded[1].sex, Sex::Female);
    assert_eq!(loaded[1].charges, 28923.13692);
}

#[test]
fn malformed_row_is_data_unavailable_with_location() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let path = tmp.path().join("insurance.csv");
    std::fs::write(
        &path,
        "age,sex,bmi,children,smoker,region,charges\n19,female,27.9,0,yes,southwest,16884.924\n33,male,n/a,0,no,northwest,21984.47\n",
    )
    .expect("write");

    match read_data(&path) {
        Err(DashError::DataUnavailable { source_name, reason }) => {
            assert!(source_name.ends_with("insurance.csv"));
            assert!(reason.contains("line: 3"), "reason was: {reason}");
        }
        other => panic!("expected DataUnavailable, got {other:?}"),
    }
}

#[test]
fn missing_file_is_data_unavailable() {
    let tmp = tempfile::tempdir().expect("tmpdir");
    let err = Dataset::load(tmp.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, DashError::DataUnavailable { .. }));
}

#[test]
fn bundled_sample_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/insurance.csv");
    let dataset = Dataset::load(path).expect("load");
    assert_eq!(dataset.len(), 300);
}
