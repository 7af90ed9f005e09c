use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Helper function to run hovergraph with arguments and CSV input
fn run_hovergraph(args: &[&str], csv_content: &str) -> Result<Vec<u8>, String> {
    let mut cargo_args = vec!["run", "--bin", "hovergraph", "--"];
    cargo_args.extend_from_slice(args);

    let mut child = Command::new("cargo")
        .args(&cargo_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && &bytes[0..8] == &[137, 80, 78, 71, 13, 10, 26, 10]
}

fn fines_csv() -> String {
    fs::read_to_string("test/fines_by_year.csv").expect("Failed to read test CSV")
}

fn age_groups_csv() -> String {
    fs::read_to_string("test/age_groups.csv").expect("Failed to read test CSV")
}

#[test]
fn test_end_to_end_stacked_series() {
    let result = run_hovergraph(
        &["-x", "YEAR", "-m", "Camera_Issued,Police_Issued"],
        &fines_csv(),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_line_percent() {
    let result = run_hovergraph(
        &[
            "-x",
            "YEAR",
            "-m",
            "Camera_Issued,Police_Issued",
            "--kind",
            "line",
            "--percent",
            "-t",
            "Share of fines by issuer",
        ],
        &fines_csv(),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_hover_overlay() {
    let result = run_hovergraph(
        &[
            "-x",
            "YEAR",
            "-m",
            "Camera_Issued,Police_Issued",
            "--hover",
            "300,150",
        ],
        &fines_csv(),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_hover_near_right_edge() {
    // exercises the tooltip flip/clamp path
    let result = run_hovergraph(
        &[
            "-x",
            "YEAR",
            "-m",
            "Camera_Issued,Police_Issued",
            "--percent",
            "--hover",
            "758,45",
        ],
        &fines_csv(),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_bar_chart() {
    let result = run_hovergraph(
        &["-x", "AGE_GROUP", "-m", "Total_Fines", "--view", "bar"],
        &age_groups_csv(),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_heatmap() {
    let result = run_hovergraph(
        &[
            "-x",
            "AGE_GROUP",
            "-m",
            "Total_Fines",
            "--view",
            "heatmap",
            "--width",
            "480",
            "--height",
            "480",
        ],
        &age_groups_csv(),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_single_record_series() {
    let result = run_hovergraph(
        &["-x", "YEAR", "-m", "A,B", "--hover", "400,200"],
        "YEAR,A,B\n2020,10,0\n",
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_error_unknown_column() {
    let result = run_hovergraph(&["-x", "YEAR", "-m", "Nope,Police_Issued"], &fines_csv());
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("not found"));
}

#[test]
fn test_error_series_needs_two_measures() {
    let result = run_hovergraph(&["-x", "YEAR", "-m", "Camera_Issued"], &fines_csv());
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("at least two"));
}

#[test]
fn test_error_duplicate_keys() {
    let result = run_hovergraph(
        &["-x", "YEAR", "-m", "A,B"],
        "YEAR,A,B\n2020,1,2\n2020,3,4\n",
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Duplicate key"));
}

#[test]
fn test_error_non_numeric_measure() {
    let result = run_hovergraph(
        &["-x", "YEAR", "-m", "A,B"],
        "YEAR,A,B\n2020,one,2\n",
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to parse"));
}

#[test]
fn test_error_bar_takes_one_measure() {
    let result = run_hovergraph(
        &["-x", "AGE_GROUP", "-m", "Total_Fines,Total_Fines", "--view", "bar"],
        &age_groups_csv(),
    );
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("exactly one"));
}
