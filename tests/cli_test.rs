// ==========================================
// 命令行入口测试
// ==========================================
// 测试范围: kinds / template 不访问数据库
// ==========================================

use std::path::Path;
use std::process::{Command, Output};

fn run_cli(db_path: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_betaflow-import"))
        .args(args)
        .env("BETAFLOW_DB_PATH", db_path)
        .env("RUST_LOG", "off")
        .output()
        .expect("无法启动 betaflow-import")
}

#[test]
fn test_kinds_does_not_create_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("betaflow.db");

    let output = run_cli(&db_path, &["kinds"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("raw-materials"));
    assert!(lines[3].ends_with("name,type,location,status"));
    assert!(!db_path.exists());
    assert!(!db_path.parent().unwrap().exists());
}

#[test]
fn test_template_does_not_create_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("betaflow.db");
    let out_dir = dir.path().to_str().unwrap();

    let output = run_cli(&db_path, &["template", "products", out_dir]);

    assert!(output.status.success());
    let written = std::fs::read_to_string(dir.path().join("products_template.csv")).unwrap();
    assert_eq!(written, "name,sku,category,unit_price\n");
    assert!(!db_path.exists());
}

#[test]
fn test_template_for_unknown_kind_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("betaflow.db");

    let output = run_cli(&db_path, &["template", "suppliers", dir.path().to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(!db_path.exists());
}
