use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const BIN_NAME: &str = "cyclebook";

fn cyclebook(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("CYCLEBOOK_DATA_DIR", dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(dir: &TempDir, args: &[&str]) -> String {
    let output = cyclebook(dir).args(args).output().expect("command runs");
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 output")
}

fn added_id(stdout: &str) -> String {
    stdout
        .lines()
        .find(|line| line.trim_start().starts_with("ID:"))
        .and_then(|line| line.split_whitespace().last())
        .expect("ID line")
        .to_string()
}

#[test]
fn status_on_empty_ledger() {
    let dir = TempDir::new().unwrap();
    cyclebook(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Company - "))
        .stdout(contains("No budget set for this cycle."));
}

#[test]
fn add_and_list_transactions() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["cycle", "set-start", "2024-01-15"]);

    cyclebook(&dir)
        .args(["txn", "add", "expense", "100", "rent", "Office", "rent", "--date", "2024-01-20"])
        .assert()
        .success()
        .stdout(contains("Recorded expense"))
        .stdout(contains("Rent / Lease"))
        .stdout(contains("Office rent"));

    run(&dir, &["txn", "add", "income", "500", "sales", "Invoice 42", "--date", "2024-01-22"]);

    let listing = run(&dir, &["txn", "list"]);
    assert!(listing.find("2024-01-22").unwrap() < listing.find("2024-01-20").unwrap());
    assert!(listing.contains("Showing 2 transactions"));

    cyclebook(&dir)
        .args(["txn", "list", "--type", "income"])
        .assert()
        .success()
        .stdout(contains("Invoice 42"))
        .stdout(contains("Office rent").not());

    cyclebook(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("January 2024"))
        .stdout(contains("₱400.00"));
}

#[test]
fn invalid_category_is_rejected() {
    let dir = TempDir::new().unwrap();
    cyclebook(&dir)
        .args(["txn", "add", "expense", "10", "lunch", "Sandwich"])
        .assert()
        .failure()
        .stderr(contains("Unknown category"));

    cyclebook(&dir)
        .args(["txn", "add", "income", "10", "rent", "Refund"])
        .assert()
        .failure()
        .stderr(contains("Validation error"));

    cyclebook(&dir)
        .args(["txn", "add", "expense", "0", "rent", "Nothing"])
        .assert()
        .failure()
        .stderr(contains("Validation error"));

    cyclebook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(contains("No transactions recorded"));
}

#[test]
fn oversized_amounts_are_rejected() {
    let dir = TempDir::new().unwrap();

    cyclebook(&dir)
        .args(["txn", "add", "expense", "100000000000000000", "rent", "Huge"])
        .assert()
        .failure()
        .stderr(contains("Validation error"))
        .stderr(contains("out of range"));

    cyclebook(&dir)
        .args(["txn", "add", "expense", "₱-5.50", "rent", "Signed twice"])
        .assert()
        .failure()
        .stderr(contains("Invalid amount"));

    cyclebook(&dir)
        .args(["budget", "set", "rent=100000000000000000"])
        .assert()
        .failure()
        .stderr(contains("Validation error"));

    cyclebook(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("No budget set for this cycle."));
}

#[test]
fn delete_transaction() {
    let dir = TempDir::new().unwrap();
    let stdout = run(&dir, &["txn", "add", "expense", "25", "marketing", "Flyers"]);
    let id = added_id(&stdout);

    cyclebook(&dir)
        .args(["txn", "delete", "txn-ffffffff", "--yes"])
        .assert()
        .failure()
        .stderr(contains("not found"));

    cyclebook(&dir)
        .args(["txn", "delete", &id])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Deletion cancelled."));

    cyclebook(&dir)
        .args(["txn", "delete", &id, "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted transaction"));

    cyclebook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(contains("Flyers").not());
}

#[test]
fn budgets_feed_the_dashboard() {
    let dir = TempDir::new().unwrap();
    cyclebook(&dir)
        .args(["budget", "set", "rent=1500", "sales=9000"])
        .assert()
        .success()
        .stdout(contains("Budgets saved."));

    run(&dir, &["txn", "add", "expense", "300", "rent", "Deposit"]);

    cyclebook(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("REMAINING: ₱1,200.00 of ₱1,500.00"));

    cyclebook(&dir)
        .args(["budget", "set", "rent=-5"])
        .assert()
        .failure()
        .stderr(contains("Validation error"));

    cyclebook(&dir)
        .args(["budget", "show"])
        .assert()
        .success()
        .stdout(contains("₱1,500.00"))
        .stdout(contains("₱9,000.00"));
}

#[test]
fn finalize_archives_the_cycle() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["cycle", "set-start", "2024-01-15"]);
    run(&dir, &["budget", "set", "rent=100"]);
    run(&dir, &["txn", "add", "expense", "100", "rent", "Rent", "--date", "2024-01-15"]);
    run(&dir, &["txn", "add", "income", "500", "sales", "Sales", "--date", "2024-01-16"]);

    cyclebook(&dir)
        .args(["cycle", "finalize"])
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(contains("Finalize cancelled."));

    cyclebook(&dir)
        .args(["cycle", "finalize", "--yes"])
        .assert()
        .success()
        .stdout(contains("Finalized January 2024."))
        .stdout(contains("Net Flow: ₱400.00"))
        .stdout(contains("Current cycle: February 2024"));

    cyclebook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(contains("No transactions recorded"));

    cyclebook(&dir)
        .args(["history", "list"])
        .assert()
        .success()
        .stdout(contains("  1  January 2024"));

    cyclebook(&dir)
        .args(["history", "show", "1"])
        .assert()
        .success()
        .stdout(contains("Rent / Lease"))
        .stdout(contains("Above Forecast"))
        .stdout(contains("Transactions (2)"));

    cyclebook(&dir)
        .args(["history", "show", "2"])
        .assert()
        .failure()
        .stderr(contains("not found"));

    cyclebook(&dir)
        .args(["export", "history"])
        .assert()
        .success()
        .stdout(contains("January 2024,monthly,2024-01-15,100.00,500.00,100.00,400.00,2"));
}

#[test]
fn cycle_next_lists_upcoming_starts() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["cycle", "set-start", "2024-01-31"]);

    cyclebook(&dir)
        .args(["cycle", "next", "-n", "2"])
        .assert()
        .success()
        .stdout(contains("Ends:   2024-03-01"))
        .stdout(contains("starts 2024-03-02"))
        .stdout(contains("starts 2024-04-02"));
}

#[test]
fn settings_update_company_and_cycle() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["txn", "add", "expense", "10", "admin", "Stamps"]);

    cyclebook(&dir)
        .args(["settings", "set", "--company", "Acme Foods"])
        .assert()
        .success()
        .stdout(contains("Company name set to 'Acme Foods'."));

    cyclebook(&dir)
        .args(["settings", "set", "--cycle", "weekly", "--yes"])
        .assert()
        .success()
        .stdout(contains("Cycle restarted today"));

    cyclebook(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(contains("Acme Foods"))
        .stdout(contains("weekly"))
        .stdout(contains("Week of"));

    cyclebook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(contains("No transactions recorded"));

    cyclebook(&dir)
        .args(["settings", "set", "--cycle", "fortnightly"])
        .assert()
        .failure();
}

#[test]
fn export_transactions_to_file() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["txn", "add", "expense", "12.50", "transport", "Fuel, diesel"]);

    let out = dir.path().join("out").join("txns.csv");
    cyclebook(&dir)
        .args(["export", "transactions", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Exported 1 transactions"));

    let csv = std::fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("ID,Date,Type,Category,Description,Amount,Created At"));
    assert!(csv.contains("Transportation / Logistics,\"Fuel, diesel\",12.50,"));
}

#[test]
fn categories_audit_and_config() {
    let dir = TempDir::new().unwrap();

    cyclebook(&dir)
        .arg("categories")
        .assert()
        .success()
        .stdout(contains("Sales / Revenue"))
        .stdout(contains("Salaries & Benefits"));

    run(&dir, &["txn", "add", "expense", "10", "inventory", "Stock"]);

    cyclebook(&dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(contains("CREATE Transaction"));

    cyclebook(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Cyclebook Configuration"))
        .stdout(contains("ledger.json"));
}

#[test]
fn corrupt_ledger_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("ledger.json"), "{ not json").unwrap();

    cyclebook(&dir)
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Company - "))
        .stderr(contains("ledger.json.corrupt-"));

    run(&dir, &["txn", "add", "expense", "10", "marketing", "Ads"]);
    cyclebook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(contains("Ads"));

    let backups: Vec<_> = std::fs::read_dir(&data)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("ledger.json.corrupt-")
        })
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(std::fs::read_to_string(&backups[0]).unwrap(), "{ not json");
}

#[test]
fn invalid_date_format_in_settings_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"date_format": "%Q"}"#).unwrap();

    cyclebook(&dir)
        .args(["txn", "list"])
        .assert()
        .failure()
        .stderr(contains("Invalid date_format '%Q'"));
}
