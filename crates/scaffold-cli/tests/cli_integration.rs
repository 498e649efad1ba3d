//! End-to-end tests for the `scaffold` binary.

use std::path::Path;
use std::process::{Command, Output};

fn scaffold_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_scaffold"))
}

fn run(args: &[&str]) -> Output {
    scaffold_bin().args(args).output().expect("run binary")
}

fn path_str(p: &Path) -> &str {
    p.to_str().expect("utf-8 path")
}

const MODEL: &str = r#"{
    "name": "Shop",
    "entities": [
        { "name": "Order", "members": [
            { "name": "id", "type": "i64", "sequence": 1 },
            { "name": "note", "type": "String", "nullable": true }
        ]},
        { "name": "Customer", "members": [] }
    ]
}"#;

#[test]
fn render_with_vars() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("model.rs.tmpl");
    std::fs::write(
        &template,
        "// #if Public\npub struct T_Name_;\n// #else\nstruct T_Name_;\n// #endif\n",
    )
    .expect("write template");

    let output = run(&[
        "render",
        path_str(&template),
        "--var",
        "Name=Order",
        "--var",
        "Public=true",
    ]);
    assert!(
        output.status.success(),
        "render should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout), "pub struct Order;\n");
}

#[test]
fn render_vars_file_and_output_file() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("t.py");
    let vars = dir.path().join("vars.json");
    let out = dir.path().join("out.py");
    std::fs::write(&template, "# @if Count > 1\nT_Name_s = []\n# @endif\n").expect("write template");
    std::fs::write(&vars, r#"{"Name": "order", "Count": 3}"#).expect("write vars");

    let output = run(&[
        "render",
        path_str(&template),
        "--lang",
        "python",
        "--vars",
        path_str(&vars),
        "-o",
        path_str(&out),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(std::fs::read_to_string(&out).expect("read output"), "orders = []\n");
}

#[test]
fn render_custom_prefixes() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("t.ini");
    std::fs::write(&template, "; !if false\nhidden\n; !endif\nshown\n").expect("write template");

    let output = run(&["render", path_str(&template), "--comment", ";", "--directive", "!"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "shown\n");
}

#[test]
fn render_error_reports_file_and_line() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("bad.rs");
    std::fs::write(&template, "ok\n// #elif X\n").expect("write template");

    let output = run(&["render", path_str(&template)]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("bad.rs:2: 'elif' with no matching if"),
        "stderr: {}",
        stderr
    );
    assert!(output.stdout.is_empty(), "no partial output on failure");
}

#[test]
fn render_unresolved_placeholder_policies() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("t.rs");
    std::fs::write(&template, "struct T_Missing_;\n").expect("write template");

    let strict = run(&["render", path_str(&template)]);
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("t.rs:1:"));

    let lenient = run(&["render", path_str(&template), "--pass-through"]);
    assert!(lenient.status.success());
    assert_eq!(String::from_utf8_lossy(&lenient.stdout), "struct T_Missing_;\n");
}

#[test]
fn render_rejects_oversized_template() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("huge.txt");
    std::fs::write(&template, "x".repeat(1_000_001)).expect("write template");

    let output = run(&["render", path_str(&template)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("1MB limit"));
}

#[test]
fn render_unknown_language() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("t.txt");
    std::fs::write(&template, "x\n").expect("write template");

    let output = run(&["render", path_str(&template), "--lang", "cobol"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cobol"));
}

#[test]
fn generate_member_files() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("field.rs");
    let model = dir.path().join("model.json");
    let out = dir.path().join("gen");
    std::fs::write(
        &template,
        "// #if Nullable\npub T_Name_: Option<T_Type_>, // T_Entity_\n// #else\npub T_Name_: T_Type_, // T_Entity_\n// #endif\n",
    )
    .expect("write template");
    std::fs::write(&model, MODEL).expect("write model");

    let output = run(&[
        "generate",
        path_str(&template),
        "--model",
        path_str(&model),
        "--level",
        "member",
        "-o",
        path_str(&out),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        std::fs::read_to_string(out.join("Order.id.rs")).expect("read id"),
        "pub id: i64, // Order\n"
    );
    assert_eq!(
        std::fs::read_to_string(out.join("Order.note.rs")).expect("read note"),
        "pub note: Option<String>, // Order\n"
    );
}

#[test]
fn generate_entities_to_stdout() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let template = dir.path().join("entity.rs");
    let model = dir.path().join("model.json");
    std::fs::write(&template, "// #eval Empty := MemberCount == 0\n// #if !Empty\nstruct T_Name_; // in T_Domain_\n// #endif\n")
        .expect("write template");
    std::fs::write(&model, MODEL).expect("write model");

    let output = run(&["generate", path_str(&template), "--model", path_str(&model)]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "==> Order <==\nstruct Order; // in Shop\n==> Customer <==\n"
    );
}

#[test]
fn eval_prints_values() {
    let output = run(&["eval", "1 + 2 * 3"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "7");

    let output = run(&["eval", "Name + \"s\"", "--var", "Name=order"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "\"orders\"");

    let output = run(&["eval", "Undefined"]);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "null");
}

#[test]
fn eval_error_exits_nonzero() {
    let output = run(&["eval", "1 / 0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Division by zero"));
}

#[test]
fn parse_json_dump() {
    let output = run(&["parse", "a := 1 + 2", "--format", "json"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert!(json.get("Assignment").is_some(), "json: {}", json);
}

#[test]
fn parse_error_exits_nonzero() {
    let output = run(&["parse", "null is null"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not all source matched"));
}

#[test]
fn tokens_listing() {
    let output = run(&["tokens", "a >= 1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("Ident\ta"));
    assert!(lines[1].contains("Gt"));
    assert!(lines[2].contains("Eq"));
}
