mod common;
use common::cli::{EqtWorkspace, add_item, run_eqt, run_ok};
use equipment_tracker::SqliteStorage;

#[test]
fn backup_is_a_complete_openable_copy() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    let id = add_item(&workspace, "Compressor", 4, &["-c", "Air"]);
    run_ok(&workspace, ["adjust", &id, "--remove", "1"], "adjust");

    let dest = workspace.path("snap.db");
    let out = run_ok(
        &workspace,
        ["--json", "backup", dest.to_str().unwrap()],
        "backup",
    )
    .json();
    assert!(out["bytes"].as_u64().unwrap() > 0);

    // Later writes must not reach the copy.
    run_ok(&workspace, ["adjust", &id, "--add", "10"], "adjust after");

    let copy = SqliteStorage::open(&dest).unwrap();
    let item = copy.get_equipment(&id).unwrap().unwrap();
    assert_eq!(item.quantity, 3);
    assert_eq!(copy.equipment_history(&id).unwrap().len(), 2);
    assert!(copy.verify_audit_trail().unwrap().is_empty());
}

#[test]
fn default_backups_are_listed_newest_first() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    add_item(&workspace, "Pump", 1, &[]);

    let out = run_ok(&workspace, ["--json", "backup"], "backup").json();
    let path = out["path"].as_str().unwrap();
    assert!(path.contains("equipment_backup_"), "{path}");
    assert!(workspace.data_dir().join("backups").is_dir());

    let listing = run_ok(&workspace, ["--json", "backup", "--list"], "list").json();
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[test]
fn backup_onto_the_live_database_is_refused() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    add_item(&workspace, "Jack", 2, &[]);

    let db = workspace.db_path();
    let run = run_eqt(&workspace, ["backup", db.to_str().unwrap()], "self backup");
    assert!(!run.status.success());
    assert!(run.stderr.contains("Backup failed"), "{}", run.stderr);

    let list = run_ok(&workspace, ["--json", "list"], "list after").json();
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn export_writes_quoted_csv() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    add_item(&workspace, "Saw, circular", 2, &["-c", "Power"]);
    add_item(&workspace, "Axe", 5, &[]);

    let dest = workspace.path("out.csv");
    let out = run_ok(
        &workspace,
        ["--json", "export", dest.to_str().unwrap()],
        "export",
    )
    .json();
    assert_eq!(out["rows"], 2);

    let csv = std::fs::read_to_string(&dest).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Name,Quantity,Category,MinStockLevel,LastUpdated");
    assert!(lines[1].starts_with("Axe,5,,0,"), "{}", lines[1]);
    assert!(lines[2].starts_with("\"Saw, circular\",2,Power,0,"), "{}", lines[2]);
}

#[test]
fn doctor_passes_on_healthy_workspace() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    let id = add_item(&workspace, "Level", 3, &[]);
    run_ok(&workspace, ["adjust", &id, "--remove", "2"], "adjust");

    let report = run_ok(&workspace, ["--json", "doctor"], "doctor").json();
    assert_eq!(report["ok"], true);
}

#[test]
fn doctor_fails_without_workspace() {
    let workspace = EqtWorkspace::new();
    let run = run_eqt(&workspace, ["doctor"], "doctor");
    assert!(!run.status.success());
    assert!(run.stdout.contains("ERROR data_dir"), "{}", run.stdout);
}
