use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(parts: &[&str]) -> String {
    let mut path = repo_root().join("fixtures");
    for p in parts {
        path = path.join(p);
    }
    assert!(path.exists(), "fixture missing: {}", path.display());
    path.to_string_lossy().to_string()
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("deparc-cli"));
    cmd.current_dir(repo_root()).env_remove("DEPARC_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run deparc-cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("JSON on stdout")
}

#[test]
fn stats_prints_a_table_by_default() {
    let output = cli()
        .args(["stats", fixture(&["canonical", "wo_chi_mian.json"]).as_str()])
        .output()
        .expect("run deparc-cli");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8");
    assert!(stdout.starts_with("Word  POS"));
    assert!(stdout.contains("TDD 2  n 2  MDD 1.00"));
}

#[test]
fn stats_json_for_every_backend() {
    let cases = [
        ("canonical", fixture(&["canonical", "wo_chi_mian.json"])),
        ("hanlp", fixture(&["hanlp", "wo_chi_mian.json"])),
        ("spacy", fixture(&["spacy", "she_eats_noodles.json"])),
        ("stanza", fixture(&["stanza", "wo_chi_mian.json"])),
        ("conllu", fixture(&["conllu", "wo_chi_mian.conllu"])),
    ];
    for (backend, path) in cases {
        let stats = stdout_json(cli().args(["stats", "--json", "--backend", backend, path.as_str()]));
        assert_eq!(stats["n"], 2, "{backend}");
        assert_eq!(stats["tdd"], 2, "{backend}");
        assert_eq!(stats["rows"].as_array().map(Vec::len), Some(3), "{backend}");
        assert_eq!(stats["rows"][1]["out_degree"], 2, "{backend}");
    }
}

#[test]
fn stats_reads_stdin() {
    let json = r#"[{"id":1,"text":"好","pos":"ADJ","head":0,"rel":"root"}]"#;
    let output = cli()
        .args(["stats", "--json", "-"])
        .write_stdin(json)
        .output()
        .expect("run deparc-cli");
    assert!(output.status.success());
    let stats: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(stats["n"], 0);
    assert_eq!(stats["tdd"], 0);
    assert_eq!(stats["mdd"], 0.0);
    assert_eq!(stats["mdd_label"], "0.00");
}

#[test]
fn malformed_input_exits_with_code_3() {
    let output = cli()
        .args(["stats", fixture(&["canonical", "head_out_of_range.json"]).as_str()])
        .output()
        .expect("run deparc-cli");
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Malformed input: token 3 has head 99 (head out of range)"),
        "stderr: {stderr}"
    );
}

#[test]
fn lenient_mode_flags_instead_of_failing() {
    let stats = stdout_json(cli().args([
        "stats",
        "--json",
        "--lenient",
        fixture(&["canonical", "head_out_of_range.json"]).as_str(),
    ]));
    assert_eq!(stats["n"], 1);
    assert_eq!(stats["rows"][2]["head_word"], "?99");
    assert_eq!(stats["rows"][2]["distance"], Value::Null);
}

#[test]
fn normalize_emits_canonical_tokens() {
    let tokens = stdout_json(cli().args([
        "normalize",
        "--backend",
        "spacy",
        fixture(&["spacy", "she_eats_noodles.json"]).as_str(),
    ]));
    let tokens = tokens.as_array().expect("array");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0]["text"], "She");
    assert_eq!(tokens[0]["head"], 2);
    assert_eq!(tokens[1]["head"], 0);
    assert_eq!(tokens[2]["text"], "noodles");
}

#[test]
fn layout_honours_theme_and_config() {
    let path = fixture(&["canonical", "wo_chi_mian.json"]);

    let layout = stdout_json(cli().args(["layout", "--theme", "desktop", path.as_str()]));
    assert_eq!(layout["tokens"][0]["x"], 60.0);

    let layout = stdout_json(cli().args([
        "layout",
        "--config",
        fixture(&["theme_overrides.json"]).as_str(),
        path.as_str(),
    ]));
    assert_eq!(layout["arcs"][0]["height"], 50.0);
}

#[test]
fn render_svg_to_stdout_with_focus() {
    let output = cli()
        .args([
            "render",
            "--focus-token",
            "2",
            "--id",
            "demo",
            fixture(&["canonical", "wo_chi_mian.json"]).as_str(),
        ])
        .output()
        .expect("run deparc-cli");
    assert!(output.status.success());
    let svg = String::from_utf8(output.stdout).expect("utf-8");
    assert!(svg.starts_with(r#"<svg id="demo""#));
    assert!(svg.contains(r#"<g class="diagram hover-mode">"#));
}

#[test]
fn render_html_to_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("page.html");
    cli()
        .args([
            "render",
            "--format",
            "html",
            "--title",
            "我吃面",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture(&["canonical", "wo_chi_mian.json"]).as_str(),
        ])
        .assert()
        .success();

    let html = fs::read_to_string(&out).expect("read html");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>我吃面</title>"));
    assert!(html.contains("Mean Distance (MDD)"));
}

#[test]
fn usage_errors_exit_with_code_2() {
    cli().args(["stats", "--nope"]).assert().code(2);
    cli()
        .args(["stats", "--backend", "corenlp", "x.json"])
        .assert()
        .code(2);
    cli().args(["render", "--format", "gif", "x.json"]).assert().code(2);
    cli()
        .args(["render", "--focus-edge", "2-1", "x.json"])
        .assert()
        .code(2);
}

#[test]
fn runtime_errors_exit_with_code_1() {
    cli()
        .args(["stats"])
        .write_stdin("not json")
        .assert()
        .code(1);
    cli()
        .args(["stats", "does/not/exist.json"])
        .assert()
        .code(1);
}
