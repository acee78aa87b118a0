mod common;
use common::cli::{EqtWorkspace, add_item, eqt_cmd, run_eqt, run_eqt_in, run_ok};
use predicates::prelude::*;

#[test]
fn commands_fail_before_init() {
    let workspace = EqtWorkspace::new();
    let list = run_eqt(&workspace, ["list"], "list");
    assert!(!list.status.success());
    assert!(list.stderr.contains("Not initialized"), "{}", list.stderr);
}

#[test]
fn init_creates_workspace_and_refuses_rerun() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    assert!(workspace.db_path().is_file());
    assert!(workspace.data_dir().join("config.yaml").is_file());

    let again = run_eqt(&workspace, ["init"], "init again");
    assert!(!again.status.success());
    assert!(again.stderr.contains("Already initialized"), "{}", again.stderr);

    run_ok(&workspace, ["init", "--force"], "init force");
}

#[test]
fn adjustments_are_logged_and_clamped() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    let id = add_item(&workspace, "Hammer", 10, &["-c", "Tools", "-m", "2"]);

    let added = run_ok(
        &workspace,
        ["--json", "adjust", &id, "--add", "5", "--notes", "restock"],
        "adjust add",
    );
    assert_eq!(added.json()["new_quantity"], 15);

    let removed = run_ok(
        &workspace,
        ["--json", "adjust", &id, "--remove", "40"],
        "adjust remove",
    );
    let removed = removed.json();
    assert_eq!(removed["new_quantity"], 0);
    assert_eq!(removed["low_stock"], true);

    let history = run_ok(&workspace, ["--json", "history", &id], "history");
    let entries = history.json();
    let entries = entries.as_array().expect("history array");
    let kinds: Vec<&str> = entries
        .iter()
        .map(|e| e["change_type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, ["Create", "Add", "Remove"]);
    assert_eq!(entries[1]["notes"], "restock");
    assert_eq!(entries[2]["old_quantity"], 15);
    assert_eq!(entries[2]["new_quantity"], 0);
    assert!(!entries[2]["notes"].as_str().unwrap().is_empty());

    let total: i64 = entries
        .iter()
        .map(|e| e["new_quantity"].as_i64().unwrap() - e["old_quantity"].as_i64().unwrap())
        .sum();
    assert_eq!(total, 0);
}

#[test]
fn invalid_adjustments_write_nothing() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    let id = add_item(&workspace, "Saw", 3, &[]);

    let zero = run_eqt(&workspace, ["adjust", &id, "--add", "0"], "zero");
    assert!(!zero.status.success());
    let negative = run_eqt(&workspace, ["adjust", &id, "--remove", "-2"], "negative");
    assert!(!negative.status.success());
    let missing = run_eqt(&workspace, ["adjust", "eq-nope", "--add", "1"], "missing");
    assert!(!missing.status.success());
    assert!(missing.stderr.contains("eq-nope"), "{}", missing.stderr);

    let page = run_ok(&workspace, ["--json", "history"], "history").json();
    assert_eq!(page["total"], 1);
}

#[test]
fn list_filters_and_orders_by_name() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    add_item(&workspace, "wrench", 1, &["-c", "Tools", "-m", "5"]);
    add_item(&workspace, "Drill", 8, &["-c", "Power"]);
    add_item(&workspace, "anvil", 2, &["-c", "Tools"]);

    let all = run_ok(&workspace, ["--json", "list"], "list").json();
    let names: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["anvil", "Drill", "wrench"]);

    let tools = run_ok(&workspace, ["--json", "list", "-c", "tools"], "list tools").json();
    assert_eq!(tools.as_array().unwrap().len(), 2);

    let low = run_ok(&workspace, ["--json", "list", "--low-stock"], "list low").json();
    let low = low.as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["name"], "wrench");

    let search = run_ok(&workspace, ["--json", "list", "-s", "DRI"], "search").json();
    assert_eq!(search.as_array().unwrap().len(), 1);

    let text = run_ok(&workspace, ["list"], "list text");
    assert!(text.stdout.contains("Low Stock Alerts: 1"), "{}", text.stdout);
}

#[test]
fn update_changes_metadata_without_logging() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    let id = add_item(&workspace, "Ladder", 4, &["-c", "Access"]);

    run_ok(
        &workspace,
        ["update", &id, "--name", "Step Ladder", "--no-category", "-m", "1"],
        "update",
    );
    let shown = run_ok(&workspace, ["--json", "show", &id], "show").json();
    assert_eq!(shown["name"], "Step Ladder");
    assert!(shown.get("category").is_none());
    assert_eq!(shown["min_stock_level"], 1);
    assert_eq!(shown["quantity"], 4);
    assert_eq!(shown["history"].as_array().unwrap().len(), 1);

    let blank = run_eqt(&workspace, ["update", &id, "--name", "  "], "blank name");
    assert!(!blank.status.success());
}

#[test]
fn deleted_items_keep_their_history() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    let id = add_item(&workspace, "Generator", 2, &[]);

    let out = run_ok(&workspace, ["--json", "delete", &id, "eq-missing"], "delete").json();
    assert_eq!(out["deleted"][0], id.as_str());
    assert_eq!(out["skipped"][0], "eq-missing");

    let show = run_eqt(&workspace, ["show", &id], "show deleted");
    assert!(!show.status.success());

    let history = run_ok(&workspace, ["--json", "history", &id], "history").json();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["change_type"], "Delete");
    assert_eq!(history[1]["equipment_name"], "Generator");
    assert_eq!(history[1]["new_quantity"], 0);
}

#[test]
fn history_pages_newest_first() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    let id = add_item(&workspace, "Rope", 1, &[]);
    for _ in 0..4 {
        run_ok(&workspace, ["adjust", &id, "--add", "1"], "adjust");
    }

    let first = run_ok(&workspace, ["--json", "history", "--page-size", "2"], "page 1").json();
    assert_eq!(first["total"], 5);
    let ids: Vec<i64> = first["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids[0] > ids[1]);

    let last = run_ok(
        &workspace,
        ["--json", "history", "--page", "3", "--page-size", "2"],
        "page 3",
    )
    .json();
    assert_eq!(last["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(last["transactions"][0]["change_type"], "Create");

    let beyond = run_ok(&workspace, ["--json", "history", "--page", "9"], "page 9").json();
    assert!(beyond["transactions"].as_array().unwrap().is_empty());

    let zero = run_eqt(&workspace, ["history", "--page", "0"], "page 0");
    assert!(!zero.status.success());
}

#[test]
fn workspace_is_found_from_subdirectory() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    add_item(&workspace, "Clamp", 6, &[]);

    let nested = workspace.path("bay/shelf");
    std::fs::create_dir_all(&nested).unwrap();
    let list = run_eqt_in(&workspace, &nested, ["--json", "list"], "nested list");
    assert!(list.status.success(), "{}", list.stderr);
    assert_eq!(list.json().as_array().unwrap().len(), 1);
}

#[test]
fn explicit_db_works_without_workspace() {
    let workspace = EqtWorkspace::new();
    let db = workspace.path("standalone.db");
    let db = db.to_str().unwrap();

    let added = run_ok(&workspace, ["--json", "--db", db, "add", "Tarp", "-n", "3"], "add");
    let id = added.json()["id"].as_str().unwrap().to_string();
    let stats = run_ok(&workspace, ["--json", "--db", db, "stats"], "stats").json();
    assert_eq!(stats["total_items"], 1);
    assert_eq!(stats["total_units"], 3);
    assert_eq!(stats["transactions"], 1);
    assert!(id.starts_with("eq-"));
}

#[test]
fn config_set_and_get_round_trip() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    run_ok(&workspace, ["config", "set", "history_page_size", "7"], "set");
    let got = run_ok(&workspace, ["config", "get", "history_page_size"], "get");
    assert_eq!(got.stdout.trim(), "7");

    let bad = run_eqt(&workspace, ["config", "set", "no_such_key", "1"], "bad key");
    assert!(!bad.status.success());

    let page = run_ok(&workspace, ["--json", "history"], "history").json();
    assert_eq!(page["page_size"], 7);
}

#[test]
fn text_output_shows_low_stock_warning() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    let id = add_item(&workspace, "Hammer", 10, &["-m", "5"]);

    eqt_cmd(&workspace, &workspace.root)
        .args(["adjust", &id, "--remove", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("now 3").and(predicate::str::contains("Low stock")));

    eqt_cmd(&workspace, &workspace.root)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("LOW STOCK"))
        .stdout(predicate::str::contains("Equipment created"));
}

#[test]
fn version_prints_package_version() {
    let workspace = EqtWorkspace::new();
    eqt_cmd(&workspace, &workspace.root)
        .args(["version", "--short"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn malformed_ids_are_rejected_before_lookup() {
    let workspace = EqtWorkspace::new();
    run_ok(&workspace, ["init"], "init");
    add_item(&workspace, "Hammer", 1, &[]);

    for args in [
        vec!["show", "Hammer"],
        vec!["adjust", "not an id", "--add", "1"],
        vec!["update", "x", "--name", "Mallet"],
        vec!["history", "eq_1"],
    ] {
        eqt_cmd(&workspace, &workspace.root)
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Validation failed: id"));
    }

    let page = run_ok(&workspace, ["--json", "history"], "history").json();
    assert_eq!(page["total"], 1);
}
