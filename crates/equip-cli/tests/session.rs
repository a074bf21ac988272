//! Integration tests for CLI session setup and file handling.

use std::fs;

use equip_cli::session::{ReportFormat, ReportOutput, Session, SessionOptions, load_config};
use equip_model::RETENTION_LIMIT;

const CSV: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature
Pump-1,Centrifugal,120.5,3.2,45.0
Valve-2,Gate,0,1.1,20.0
";

fn write_csv(dir: &std::path::Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, CSV).unwrap();
    path
}

#[test]
fn config_file_in_data_dir_is_picked_up() {
    let data = tempfile::tempdir().unwrap();
    fs::write(
        data.path().join("equipment.toml"),
        "max_upload_bytes = 4096\n\n[auth.tokens]\n\"tok\" = \"alice\"\n",
    )
    .unwrap();

    let options = SessionOptions {
        data_dir: Some(data.path().to_path_buf()),
        ..SessionOptions::default()
    };
    let config = load_config(&options).unwrap();
    assert_eq!(config.max_upload_bytes, 4096);
    assert_eq!(config.data_dir.as_deref(), Some(data.path()));
    assert_eq!(config.auth.tokens.get("tok").map(String::as_str), Some("alice"));
}

#[test]
fn flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("custom.toml");
    fs::write(&config_path, "max_upload_bytes = 4096\n").unwrap();

    let options = SessionOptions {
        config: Some(config_path),
        max_upload_bytes: Some(10),
        ..SessionOptions::default()
    };
    assert_eq!(load_config(&options).unwrap().max_upload_bytes, 10);
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let options = SessionOptions {
        config: Some(dir.path().join("missing.toml")),
        ..SessionOptions::default()
    };
    assert!(load_config(&options).is_err());
}

#[test]
fn history_survives_between_sessions() {
    let data = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    let options = SessionOptions {
        data_dir: Some(data.path().to_path_buf()),
        ..SessionOptions::default()
    };

    {
        let session = Session::open(&options).unwrap();
        for idx in 0..7 {
            let path = write_csv(input.path(), &format!("plant-{idx}.csv"));
            session.upload(&path, None).unwrap();
        }
    }

    let session = Session::open(&options).unwrap();
    let history = session.history();
    assert_eq!(history.len(), RETENTION_LIMIT);
    assert_eq!(history[0].filename, "plant-6.csv");
    assert_eq!(history[0].aggregates.avg_flowrate, 60.25);
}

#[test]
fn upload_name_override_and_size_limit() {
    let input = tempfile::tempdir().unwrap();
    let path = write_csv(input.path(), "raw.csv");

    let session = Session::open(&SessionOptions::default()).unwrap();
    let dataset = session.upload(&path, Some("plant.csv")).unwrap();
    assert_eq!(dataset.filename, "plant.csv");

    let limited = Session::open(&SessionOptions {
        max_upload_bytes: Some(8),
        ..SessionOptions::default()
    })
    .unwrap();
    let err = limited.upload(&path, None).unwrap_err();
    assert!(err.to_string().contains("upload is too large"));
    assert!(limited.history().is_empty());
}

#[test]
fn token_scopes_history() {
    let data = tempfile::tempdir().unwrap();
    let input = tempfile::tempdir().unwrap();
    fs::write(
        data.path().join("equipment.toml"),
        "[auth.tokens]\n\"tok-alice\" = \"alice\"\n",
    )
    .unwrap();
    let path = write_csv(input.path(), "plant.csv");

    let alice = Session::open(&SessionOptions {
        data_dir: Some(data.path().to_path_buf()),
        token: Some("tok-alice".to_string()),
        ..SessionOptions::default()
    })
    .unwrap();
    let dataset = alice.upload(&path, None).unwrap();
    assert_eq!(alice.whoami().unwrap().as_str(), "alice");

    let anonymous = Session::open(&SessionOptions {
        data_dir: Some(data.path().to_path_buf()),
        ..SessionOptions::default()
    })
    .unwrap();
    assert!(anonymous.history().is_empty());
    assert!(anonymous.dataset(dataset.id).is_err());
    assert!(anonymous.whoami().is_err());
}

#[test]
fn report_goes_to_stdout_file_or_directory() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let session = Session::open(&SessionOptions::default()).unwrap();
    let dataset = session
        .upload(&write_csv(input.path(), "plant.csv"), None)
        .unwrap();

    match session.report(dataset.id, ReportFormat::Text, None).unwrap() {
        ReportOutput::Bytes(bytes) => {
            let text = String::from_utf8(bytes).unwrap();
            assert!(text.contains("Chemical Equipment Analysis Report"));
            assert!(text.contains("60.25 L/min"));
        }
        ReportOutput::File(path) => panic!("unexpected file output {}", path.display()),
    }

    let file = out.path().join("report.json");
    match session
        .report(dataset.id, ReportFormat::Json, Some(&file))
        .unwrap()
    {
        ReportOutput::File(path) => assert_eq!(path, file),
        ReportOutput::Bytes(_) => panic!("expected file output"),
    }
    let json = fs::read_to_string(&file).unwrap();
    assert!(json.contains("\"avg_flowrate\": 60.25"));

    match session
        .report(dataset.id, ReportFormat::Text, Some(out.path()))
        .unwrap()
    {
        ReportOutput::File(path) => {
            assert_eq!(
                path,
                out.path().join(format!("equipment_report_{}.txt", dataset.id))
            );
            assert!(path.exists());
        }
        ReportOutput::Bytes(_) => panic!("expected file output"),
    }
}

#[test]
fn deleted_dataset_is_gone() {
    let input = tempfile::tempdir().unwrap();
    let session = Session::open(&SessionOptions::default()).unwrap();
    let dataset = session
        .upload(&write_csv(input.path(), "plant.csv"), None)
        .unwrap();

    let removed = session.delete(dataset.id).unwrap();
    assert_eq!(removed.filename, "plant.csv");
    assert!(session.summary(dataset.id).is_err());
    assert!(session.delete(dataset.id).is_err());
}
