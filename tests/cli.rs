use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn ledger(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cycle-ledger").unwrap();
    cmd.env("CYCLE_LEDGER_DATA_DIR", dir.path())
        .env_remove("CYCLE_LEDGER_USER")
        .env_remove("RUST_LOG");
    cmd
}

fn add(dir: &TempDir, args: &[&str]) {
    ledger(dir)
        .args(["--user", "alice", "transaction", "add"])
        .args(args)
        .assert()
        .success()
        .stdout(contains("Recorded txn-"));
}

#[test]
fn cycle_stats_split_window_on_anchor_day() {
    let dir = TempDir::new().unwrap();

    let output = ledger(&dir)
        .args([
            "--json", "cycle", "stats", "--from", "2025-01-01", "--to", "2025-01-31", "--anchor", "15",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let cycles: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cycles = cycles.as_array().unwrap();
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0]["startDate"], "2025-01-01");
    assert_eq!(cycles[0]["endDate"], "2025-01-14");
    assert_eq!(cycles[1]["startDate"], "2025-01-15");
    assert_eq!(cycles[1]["endDate"], "2025-01-31");
    assert_eq!(cycles[1]["expense"], "0.00");
    assert!(cycles[1]["expectedIncome"].is_null());
}

#[test]
fn usd_expense_and_budget_show_up_in_cycle() {
    let dir = TempDir::new().unwrap();

    add(&dir, &["expense", "100", "USD", "--at", "2025-03-10 14:00"]);
    ledger(&dir)
        .args(["--user", "alice", "budget", "set", "2025-03-01", "--expense", "500"])
        .assert()
        .success();

    let output = ledger(&dir)
        .args([
            "--user", "alice", "--json", "cycle", "stats", "--from", "2025-03-01", "--to",
            "2025-03-31", "--anchor", "1",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let cycles: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cycles[0]["expense"], "79.00");
    assert_eq!(cycles[0]["balance"], "-79.00");
    assert_eq!(cycles[0]["expectedExpense"], "500.00");
    assert!(cycles[0]["expectedIncome"].is_null());

    // other users see nothing
    ledger(&dir)
        .args([
            "--user", "bob", "cycle", "stats", "--from", "2025-03-01", "--to", "2025-03-31",
            "--anchor", "1",
        ])
        .assert()
        .success()
        .stdout(contains("£0.00"));
}

#[test]
fn invalid_inputs_fail() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .args(["cycle", "stats", "--from", "2025-01-01", "--to", "2025-01-31", "--anchor", "0"])
        .assert()
        .failure()
        .stderr(contains("Invalid anchor day"));

    ledger(&dir)
        .args(["cycle", "stats", "--from", "2025-02-01", "--to", "2025-01-01"])
        .assert()
        .failure()
        .stderr(contains("Invalid date range"));

    ledger(&dir)
        .args(["txn", "add", "income", "50000000000000000000000000000", "GBP"])
        .assert()
        .failure()
        .stderr(contains("Amount must not exceed"));

    ledger(&dir)
        .args(["transaction", "add", "expense", "50", "XYZ"])
        .assert()
        .failure()
        .stderr(contains("Unsupported currency: XYZ"));
}

#[test]
fn preferences_drive_default_anchor() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .args(["--user", "alice", "prefs", "anchor-day", "45"])
        .assert()
        .success()
        .stdout(contains("Anchor day: 31"));

    ledger(&dir)
        .args([
            "--user", "alice", "cycle", "ranges", "--from", "2025-02-01", "--to", "2025-02-28",
        ])
        .assert()
        .success()
        .stdout(contains("2025-02-01 - 2025-02-27"))
        .stdout(contains("2025-02-28 - 2025-02-28"));

    ledger(&dir)
        .args(["--user", "alice", "prefs", "timezone", ""])
        .assert()
        .success()
        .stdout(contains("Europe/London"));
}

#[test]
fn currency_commands() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .args(["currency", "normalize", "100", "usd"])
        .assert()
        .success()
        .stdout(contains("100.00 USD = 79.00 GBP"));

    ledger(&dir)
        .args(["currency", "normalize", "50", "XYZ"])
        .assert()
        .failure()
        .stderr(contains("Unsupported currency"));

    ledger(&dir)
        .args(["currency", "list"])
        .assert()
        .success()
        .stdout(contains("Base currency: GBP"))
        .stdout(contains("CNY"));
}

#[test]
fn stats_and_audit_after_writes() {
    let dir = TempDir::new().unwrap();

    add(&dir, &["income", "2500", "GBP", "--at", "2025-03-01"]);
    add(&dir, &["expense", "1000", "CNY", "--at", "2025-03-12 08:00", "--category", "Rent"]);

    ledger(&dir)
        .args(["--user", "alice", "report", "stats"])
        .assert()
        .success()
        .stdout(contains("Total income:  £2500.00"))
        .stdout(contains("Total expense: £110.00"))
        .stdout(contains("Balance:       £2390.00"));

    ledger(&dir)
        .args(["--user", "alice", "report", "audit"])
        .assert()
        .success()
        .stdout(contains("CREATE Transaction"));
}

#[test]
fn edit_transaction_changes_amount_and_currency() {
    let dir = TempDir::new().unwrap();

    let output = ledger(&dir)
        .args([
            "--user", "alice", "--json", "txn", "add", "expense", "10", "GBP", "--at", "2025-03-10",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let txn: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = txn["id"].as_str().unwrap().to_string();

    ledger(&dir)
        .args(["--user", "alice", "txn", "edit", &id, "--currency", "XYZ"])
        .assert()
        .failure()
        .stderr(contains("XYZ"));

    ledger(&dir)
        .args(["--user", "bob", "txn", "edit", &id, "--amount", "5"])
        .assert()
        .failure();

    ledger(&dir)
        .args(["--user", "alice", "txn", "edit", &id, "--amount", "12.5", "--currency", "usd"])
        .assert()
        .success()
        .stdout(contains("Updated txn-"));

    ledger(&dir)
        .args(["--user", "alice", "txn", "show", &id])
        .assert()
        .success()
        .stdout(contains("12.50 USD"));

    ledger(&dir)
        .args(["--user", "alice", "report", "audit"])
        .assert()
        .success()
        .stdout(contains("UPDATE Transaction"));
}

#[test]
fn category_commands() {
    let dir = TempDir::new().unwrap();

    ledger(&dir)
        .args(["--user", "alice", "category", "add", "Food"])
        .assert()
        .success()
        .stdout(contains("Created category Food (cat-"));
    ledger(&dir)
        .args(["--user", "alice", "category", "add", "Food"])
        .assert()
        .failure()
        .stderr(contains("already exists"));
    ledger(&dir)
        .args(["--user", "alice", "category", "rename", "Food", "Groceries"])
        .assert()
        .success();

    ledger(&dir)
        .args(["--user", "alice", "category", "list"])
        .assert()
        .success()
        .stdout(contains("Groceries"));
    ledger(&dir)
        .args(["--user", "bob", "category", "list"])
        .assert()
        .success()
        .stdout(contains("No categories yet"));

    ledger(&dir)
        .args(["--user", "alice", "category", "delete", "Groceries"])
        .assert()
        .success();
    ledger(&dir)
        .args(["--user", "alice", "category", "delete", "Groceries"])
        .assert()
        .failure();
}
