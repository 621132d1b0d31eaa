use std::fs;
use std::path::Path;
use std::process::Command;

fn render_diff_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_render-diff"))
}

/// Write a raster whose columns follow `patterns`: character `1` at row `r`
/// of pattern `x` makes pixel (x, r) black.
fn write_png(path: &Path, patterns: &[&str]) {
    let width = patterns.len() as u32;
    let height = patterns[0].len() as u32;
    let luma = image::GrayImage::from_fn(width, height, |x, y| {
        let ink = patterns[x as usize].as_bytes()[y as usize] == b'1';
        if ink {
            image::Luma([0u8])
        } else {
            image::Luma([255u8])
        }
    });
    luma.save(path).expect("write test raster");
}

const INK: &str = "0111110000000000";
const OTHER_INK: &str = "0000000000011111";
const BLANK: &str = "0000000000000000";

#[test]
fn identical_directories_exit_0_with_full_accuracy() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold_dir = dir.path().join("gold");
    let pred_dir = dir.path().join("pred");
    fs::create_dir_all(&gold_dir).expect("create gold dir");
    fs::create_dir_all(&pred_dir).expect("create pred dir");

    for name in ["a.png", "b.png"] {
        write_png(&gold_dir.join(name), &[BLANK, INK, INK, BLANK]);
        write_png(&pred_dir.join(name), &[BLANK, INK, INK, BLANK]);
    }

    let output = render_diff_cmd()
        .args([
            "evaluate",
            "--gold-dir",
            gold_dir.to_str().unwrap(),
            "--pred-dir",
            pred_dir.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run render-diff");

    assert!(
        output.status.success(),
        "identical directories should exit 0: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pairs evaluated:          2"));
    assert!(stdout.contains("Strict accuracy:          1.000000"));
}

#[test]
fn differing_pair_exits_1() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold_dir = dir.path().join("gold");
    let pred_dir = dir.path().join("pred");
    fs::create_dir_all(&gold_dir).expect("create gold dir");
    fs::create_dir_all(&pred_dir).expect("create pred dir");

    write_png(&gold_dir.join("x.png"), &[INK; 6]);
    write_png(&pred_dir.join("x.png"), &[OTHER_INK; 6]);

    let output = render_diff_cmd()
        .args([
            "evaluate",
            "--gold-dir",
            gold_dir.to_str().unwrap(),
            "--pred-dir",
            pred_dir.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run render-diff");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Strict accuracy:          0.000000"));
}

#[test]
fn missing_predicted_file_counts_as_a_full_mismatch() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold_dir = dir.path().join("gold");
    let pred_dir = dir.path().join("pred");
    fs::create_dir_all(&gold_dir).expect("create gold dir");
    fs::create_dir_all(&pred_dir).expect("create pred dir");

    write_png(&gold_dir.join("only.png"), &[INK, INK, BLANK]);

    let output = render_diff_cmd()
        .args([
            "evaluate",
            "--gold-dir",
            gold_dir.to_str().unwrap(),
            "--pred-dir",
            pred_dir.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run render-diff");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pairs evaluated:          1"));
    assert!(stdout.contains("Total edit distance:      3"));
}

#[test]
fn corrupt_predicted_file_is_excluded_and_the_batch_completes() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold_dir = dir.path().join("gold");
    let pred_dir = dir.path().join("pred");
    fs::create_dir_all(&gold_dir).expect("create gold dir");
    fs::create_dir_all(&pred_dir).expect("create pred dir");

    write_png(&gold_dir.join("good.png"), &[INK, INK]);
    write_png(&pred_dir.join("good.png"), &[INK, INK]);
    write_png(&gold_dir.join("bad.png"), &[INK, INK]);
    fs::write(pred_dir.join("bad.png"), b"not a raster").expect("write corrupt file");

    let output = render_diff_cmd()
        .args([
            "evaluate",
            "--gold-dir",
            gold_dir.to_str().unwrap(),
            "--pred-dir",
            pred_dir.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run render-diff");

    assert_eq!(output.status.code(), Some(1), "excluded pairs fail the batch");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pairs evaluated:          1"));
    assert!(stdout.contains("Pairs excluded (failed):  1"));
    assert!(stdout.contains("Strict accuracy:          1.000000"));
}

#[test]
fn json_report_is_machine_readable() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold_dir = dir.path().join("gold");
    let pred_dir = dir.path().join("pred");
    fs::create_dir_all(&gold_dir).expect("create gold dir");
    fs::create_dir_all(&pred_dir).expect("create pred dir");

    write_png(&gold_dir.join("a.png"), &[BLANK, INK]);
    write_png(&pred_dir.join("a.png"), &[BLANK, INK]);

    let output = render_diff_cmd()
        .args([
            "evaluate",
            "--format",
            "json",
            "--gold-dir",
            gold_dir.to_str().unwrap(),
            "--pred-dir",
            pred_dir.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run render-diff");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is valid json");
    assert_eq!(report["total_pairs"], 1);
    assert_eq!(report["strict_accuracy"], 1.0);
}

#[test]
fn compare_identical_pair_exits_0() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold = dir.path().join("gold.png");
    let pred = dir.path().join("pred.png");
    write_png(&gold, &[BLANK, INK, BLANK]);
    write_png(&pred, &[BLANK, INK, BLANK]);

    let output = render_diff_cmd()
        .args(["compare", gold.to_str().unwrap(), pred.to_str().unwrap()])
        .output()
        .expect("failed to run render-diff");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Match (strict):          yes"));
}

#[test]
fn compare_writes_the_diagnostic_raster() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold = dir.path().join("gold.png");
    let pred = dir.path().join("pred.png");
    let diff = dir.path().join("diff.png");
    write_png(&gold, &[INK; 6]);
    write_png(&pred, &[OTHER_INK; 6]);

    let output = render_diff_cmd()
        .args([
            "compare",
            gold.to_str().unwrap(),
            pred.to_str().unwrap(),
            "--diff-image",
            diff.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run render-diff");

    assert_eq!(output.status.code(), Some(1));
    let written = image::open(&diff).expect("diff image was written").to_rgb8();
    assert_eq!(written.dimensions(), (6, 16));
}

#[test]
fn invalid_threshold_override_exits_2() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold_dir = dir.path().join("gold");
    let pred_dir = dir.path().join("pred");
    fs::create_dir_all(&gold_dir).expect("create gold dir");
    fs::create_dir_all(&pred_dir).expect("create pred dir");

    let output = render_diff_cmd()
        .args([
            "evaluate",
            "--gold-dir",
            gold_dir.to_str().unwrap(),
            "--pred-dir",
            pred_dir.to_str().unwrap(),
            "--span-tolerance",
            "0",
        ])
        .output()
        .expect("failed to run render-diff");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("span_tolerance"));
}

#[test]
fn config_file_thresholds_are_honored() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let gold = dir.path().join("gold.png");
    let pred = dir.path().join("pred.png");
    // Two replaced columns: tolerated at the default span tolerance of 5,
    // rejected once the config file lowers it to 2.
    write_png(&gold, &[INK, INK, INK, OTHER_INK, OTHER_INK]);
    write_png(&pred, &[INK, INK, INK, "0000011111000000", "0000011111000000"]);

    let config_path = dir.path().join("thresholds.json");
    fs::write(&config_path, r#"{ "span_tolerance": 2 }"#).expect("write config");

    let default_run = render_diff_cmd()
        .args(["compare", gold.to_str().unwrap(), pred.to_str().unwrap()])
        .output()
        .expect("failed to run render-diff");
    assert_eq!(default_run.status.code(), Some(0));

    let strict_run = render_diff_cmd()
        .args([
            "compare",
            gold.to_str().unwrap(),
            pred.to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
        ])
        .output()
        .expect("failed to run render-diff");
    assert_eq!(strict_run.status.code(), Some(1));
}
