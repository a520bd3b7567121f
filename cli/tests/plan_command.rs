use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HOLIDAYS_YAML: &str = "- 2099-12-24\n- 2099-12-25\n";

const RESOURCES_YAML: &str = r#"
max_molds_per_day: 10
max_same_part_molds_per_day: 10
max_pouring_tons_per_day: 50.0
max_patterns_per_day: 2
max_staging_molds: 40
flask_limits:
  F105: 8
  F120: 4
  F143: 2
product_family_max_mix:
  pumps: "60%"
"#;

const ORDERS_YAML: &str = r#"
- order_id: ORD-1
  part_number: P-100
  product_family: pumps
  alloy: CM2
  flask_size: F105
  quantity: 12
  parts_per_mold: 2
  part_weight: 0.5
  due_date: 2099-06-30
  cooling_days: 1
  strategy: ASAP
  order_type: recurrent
  finishing_time:
    nominal: 3
    minimum: 2
- order_id: ORD-2
  part_number: P-200
  product_family: pumps
  alloy: SP1
  flask_size: F120
  quantity: 8
  parts_per_mold: 1
  part_weight: 1.5
  due_date: 2099-05-31
  cooling_days: 2
  strategy: JIT
  order_type: recurrent
  finishing_time:
    nominal: 4
    minimum: 2
"#;

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let orders = dir.join("orders.yaml");
    let resources = dir.join("resources.yaml");
    let holidays = dir.join("holidays.yaml");
    std::fs::write(&orders, ORDERS_YAML).unwrap();
    std::fs::write(&resources, RESOURCES_YAML).unwrap();
    std::fs::write(&holidays, HOLIDAYS_YAML).unwrap();
    (orders, resources, holidays)
}

fn plan_command(orders: &Path, resources: &Path, holidays: &Path) -> Command {
    let mut command = Command::cargo_bin("castplan").unwrap();
    command
        .arg("plan")
        .arg("--orders")
        .arg(orders)
        .arg("--resources")
        .arg(resources)
        .arg("--holidays")
        .arg(holidays)
        .arg("--quiet");
    command
}

#[test]
fn plan_writes_the_full_plan_to_a_file() {
    let dir = TempDir::new().unwrap();
    let (orders, resources, holidays) = write_inputs(dir.path());
    let out = dir.path().join("full_plan.json");

    plan_command(&orders, &resources, &holidays)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let json = std::fs::read_to_string(&out).unwrap();
    let plan: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(plan["ORD-1"]["status"], "ONTIME");
    assert_eq!(plan["ORD-2"]["status"], "ONTIME");
    assert!(plan["ORD-1"]["schedule"]["molding"].is_array());
    assert!(plan["ORD-1"]["schedule"]["finishing"].is_array());
}

#[test]
fn plan_prints_json_to_stdout_without_out() {
    let dir = TempDir::new().unwrap();
    let (orders, resources, holidays) = write_inputs(dir.path());

    plan_command(&orders, &resources, &holidays)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"ONTIME\""));
}

#[test]
fn unknown_flask_size_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let (orders, resources, holidays) = write_inputs(dir.path());
    std::fs::write(&resources, RESOURCES_YAML.replace("F143", "F999")).unwrap();

    plan_command(&orders, &resources, &holidays)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading resources"));
}

#[test]
fn missing_orders_file_fails_the_run() {
    let dir = TempDir::new().unwrap();
    let (_, resources, holidays) = write_inputs(dir.path());
    let missing = dir.path().join("nope.yaml");

    plan_command(&missing, &resources, &holidays)
        .assert()
        .failure()
        .stderr(predicate::str::contains("loading orders"));
}
