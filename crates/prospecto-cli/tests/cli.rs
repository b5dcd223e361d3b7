use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const BACKENDS: &[&str] = &["json", "sqlite"];

fn db_path_for(temp: &TempDir, backend: &str) -> PathBuf {
    match backend {
        "json" => temp.path().join("leads.json"),
        _ => temp.path().join("prospecto.sqlite3"),
    }
}

fn base_cmd(temp: &TempDir, backend: &str, db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("prospecto").expect("binary");
    cmd.env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env("XDG_DATA_HOME", temp.path().join("data"))
        .args([
            "--backend",
            backend,
            "--db-path",
            db_path.to_str().expect("db path"),
        ]);
    cmd
}

fn run_cmd(temp: &TempDir, backend: &str, db_path: &Path, args: &[&str]) -> String {
    let output = base_cmd(temp, backend, db_path)
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(temp: &TempDir, backend: &str, db_path: &Path, args: &[&str]) -> Value {
    let output = base_cmd(temp, backend, db_path)
        .arg("--json")
        .args(args)
        .output()
        .expect("run command");
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

#[test]
fn cli_add_move_schedule_flow() {
    for backend in BACKENDS {
        let temp = TempDir::new().expect("temp dir");
        let db = db_path_for(&temp, backend);

        run_cmd(
            &temp,
            backend,
            &db,
            &[
                "add-lead",
                "--name",
                "Ada Lovelace",
                "--phone",
                "555-123-4567",
                "--source",
                "02",
            ],
        );

        let list = run_cmd_json(&temp, backend, &db, &["list"]);
        let items = list.as_array().expect("array");
        assert_eq!(items.len(), 1, "backend {backend}");
        assert_eq!(items[0]["name"], "Ada Lovelace");
        assert_eq!(items[0]["phone"], "5551234567");
        assert_eq!(items[0]["status"], "new");
        let id = items[0]["id"].as_str().expect("id").to_string();

        run_cmd(&temp, backend, &db, &["move", &id, "contacted"]);
        run_cmd(&temp, backend, &db, &["schedule", &id, "--at", "2099-01-01"]);

        let detail = run_cmd_json(&temp, backend, &db, &["show", &id]);
        assert_eq!(detail["status"], "contacted");
        assert!(detail["scheduled_at"].is_number());
        assert_eq!(detail["source_name"], "Recomendación");

        let board = run_cmd_json(&temp, backend, &db, &["board"]);
        let contacted = board
            .as_array()
            .expect("array")
            .iter()
            .find(|column| column["status"] == "contacted")
            .expect("contacted column");
        assert_eq!(contacted["count"], 1);
    }
}

#[test]
fn cli_import_counts_added_and_duplicates() {
    for backend in BACKENDS {
        let temp = TempDir::new().expect("temp dir");
        let db = db_path_for(&temp, backend);

        // Row 2 of the file duplicates this lead by phone.
        run_cmd(
            &temp,
            backend,
            &db,
            &["add-lead", "--name", "Luis Perez", "--phone", "5553334444"],
        );

        let csv = temp.path().join("leads.csv");
        fs::write(
            &csv,
            "Nombre,Correo,Telefono\n\
             ana garcia,ana@x.com,5551112222\n\
             luis,,(555) 333-4444\n\
             maria,,5557778888\n",
        )
        .expect("write csv");

        let report = run_cmd_json(
            &temp,
            backend,
            &db,
            &["import", csv.to_str().expect("csv path")],
        );
        assert_eq!(report["added"], 2, "backend {backend}");
        assert_eq!(report["duplicates"], 1, "backend {backend}");

        let list = run_cmd_json(&temp, backend, &db, &["list"]);
        let items = list.as_array().expect("array");
        assert_eq!(items.len(), 3);
        let ana = items
            .iter()
            .find(|item| item["name"] == "Ana Garcia")
            .expect("imported lead, name normalized");
        assert_eq!(ana["tags"][0], "imported");
    }
}

#[test]
fn cli_not_found_and_invalid_input_exit_codes() {
    let temp = TempDir::new().expect("temp dir");
    let db = db_path_for(&temp, "json");

    let output = base_cmd(&temp, "json", &db)
        .args([
            "edit-lead",
            "00000000-0000-0000-0000-000000000000",
            "--status",
            "contacted",
        ])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(2));

    let output = base_cmd(&temp, "json", &db)
        .args(["add-lead", "--name", "Jane", "--phone", "123"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));

    let output = base_cmd(&temp, "json", &db)
        .args(["add-lead", "--name", "Jane", "--phone", "5551234567", "--source", "facebook"])
        .output()
        .expect("run command");
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn cli_message_log_and_mark_read() {
    for backend in BACKENDS {
        let temp = TempDir::new().expect("temp dir");
        let db = db_path_for(&temp, backend);

        run_cmd(
            &temp,
            backend,
            &db,
            &["add-lead", "--name", "Ada Lovelace", "--phone", "5551234567"],
        );
        let list = run_cmd_json(&temp, backend, &db, &["list"]);
        let id = list[0]["id"].as_str().expect("id").to_string();

        run_cmd(
            &temp,
            backend,
            &db,
            &["message", "log", &id, "hola, quiero informes", "--from", "prospect"],
        );

        let detail = run_cmd_json(&temp, backend, &db, &["show", &id]);
        assert_eq!(detail["has_unread_messages"], true);
        assert_eq!(detail["history"][0]["sender"], "prospect");

        run_cmd(&temp, backend, &db, &["message", "mark-read", &id]);
        let detail = run_cmd_json(&temp, backend, &db, &["show", &id]);
        assert_eq!(detail["has_unread_messages"], false);
    }
}

#[test]
fn cli_backup_writes_snapshot() {
    for backend in BACKENDS {
        let temp = TempDir::new().expect("temp dir");
        let db = db_path_for(&temp, backend);

        run_cmd(
            &temp,
            backend,
            &db,
            &["add-lead", "--name", "Ada Lovelace", "--phone", "5551234567"],
        );

        let out = temp.path().join(format!("snapshot-{backend}"));
        let report = run_cmd_json(
            &temp,
            backend,
            &db,
            &["backup", "--out", out.to_str().expect("out path")],
        );
        assert!(out.exists());
        assert!(report["size_bytes"].as_u64().expect("size") > 0);
    }
}

#[test]
fn cli_clean_removes_empty_leads() {
    let temp = TempDir::new().expect("temp dir");
    let db = db_path_for(&temp, "json");

    // A phone cell with no digits normalizes to nothing, so this import
    // writes an all-empty lead (the default policy) with a warning.
    let csv = temp.path().join("empty.csv");
    fs::write(&csv, "Telefono\n---\n").expect("write csv");
    let report = run_cmd_json(&temp, "json", &db, &["import", csv.to_str().expect("csv path")]);
    assert_eq!(report["added"], 1);
    assert!(report["warnings"][0]
        .as_str()
        .expect("warning")
        .contains("no contact fields"));

    run_cmd(
        &temp,
        "json",
        &db,
        &["add-lead", "--name", "Ada Lovelace", "--phone", "5551234567"],
    );

    let report = run_cmd_json(&temp, "json", &db, &["clean"]);
    assert_eq!(report["removed"], 1);

    let list = run_cmd_json(&temp, "json", &db, &["list"]);
    let items = list.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Ada Lovelace");
}

#[test]
fn cli_import_skip_empty_flag() {
    let temp = TempDir::new().expect("temp dir");
    let db = db_path_for(&temp, "json");

    let csv = temp.path().join("empty.csv");
    fs::write(&csv, "Telefono\n---\n5551234567\n").expect("write csv");
    let report = run_cmd_json(
        &temp,
        "json",
        &db,
        &["import", csv.to_str().expect("csv path"), "--skip-empty"],
    );
    assert_eq!(report["added"], 1);
    assert_eq!(report["skipped_empty"], 1);
}
