use assert_cmd::Command;
use predicates::prelude::*;
use rust_xlsxwriter::Workbook;

use std::path::{Path, PathBuf};

const ENRICHMENT_HEADERS: [&str; 5] = ["GroupID", "Term", "Description", "LogP", "Genes"];

fn cmd() -> Command {
    Command::cargo_bin("meta-reg").unwrap()
}

/// Two summary clusters (one down-, one up-regulated) plus one member
/// row that must be ignored.
fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
    let enrichment_path = dir.join("enrichment.xlsx");
    let mut workbook = Workbook::new();

    let annotation = workbook.add_worksheet();
    annotation.set_name("Annotation").unwrap();
    annotation.write_string(0, 0, "Input ID").unwrap();
    annotation.write_string(0, 1, "Gene ID").unwrap();
    annotation.write_string(1, 0, "ENSG001").unwrap();
    annotation.write_string(1, 1, "GENEA").unwrap();
    annotation.write_string(2, 0, "ENSG002").unwrap();
    annotation.write_string(2, 1, "GENEB").unwrap();

    let enrichment = workbook.add_worksheet();
    enrichment.set_name("Enrichment").unwrap();
    for (col, header) in ENRICHMENT_HEADERS.iter().enumerate() {
        enrichment.write_string(0, col as u16, *header).unwrap();
    }
    enrichment.write_string(1, 0, "1_Summary").unwrap();
    enrichment.write_string(1, 1, "GO:0001").unwrap();
    enrichment.write_string(1, 2, "pathway one").unwrap();
    enrichment.write_number(1, 3, -12.4).unwrap();
    enrichment.write_string(1, 4, "GENEA,GENEC").unwrap();
    enrichment.write_string(2, 0, "1_Member").unwrap();
    enrichment.write_string(2, 1, "GO:0001").unwrap();
    enrichment.write_string(2, 2, "member row").unwrap();
    enrichment.write_number(2, 3, -11.0).unwrap();
    enrichment.write_string(2, 4, "GENEA").unwrap();
    enrichment.write_string(3, 0, "2_Summary").unwrap();
    enrichment.write_string(3, 1, "GO:0002").unwrap();
    enrichment.write_string(3, 2, "pathway two").unwrap();
    enrichment.write_number(3, 3, -4.2).unwrap();
    enrichment.write_string(3, 4, "GENEB").unwrap();

    workbook.save(&enrichment_path).unwrap();

    let foldchange_path = dir.join("foldchange.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "ensembl_gene_id").unwrap();
    sheet.write_string(0, 1, "FoldChange").unwrap();
    sheet.write_string(1, 0, "ENSG001").unwrap();
    sheet.write_number(1, 1, 0.5).unwrap();
    sheet.write_string(2, 0, "ENSG002").unwrap();
    sheet.write_number(2, 1, 2.0).unwrap();
    workbook.save(&foldchange_path).unwrap();

    (foldchange_path, enrichment_path)
}

fn combined_output(cmd: &mut Command) -> (bool, String) {
    let output = cmd.output().unwrap();
    let all = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (output.status.success(), all)
}

#[test]
fn prints_usage_on_help() {
    for flag in ["-h", "--help"] {
        cmd()
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

#[test]
fn fails_with_usage_on_missing_args() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn fails_on_bad_foldchange_extension() {
    let (success, out) = combined_output(cmd().args(["bad.txt", "enr.xlsx", "out.csv"]));
    assert!(!success);
    assert!(out.contains("file1 \"bad.txt\" must be an excel file"));
}

#[test]
fn fails_on_bad_enrichment_extension() {
    let (success, out) = combined_output(cmd().args(["fc.xlsx", "bad", "out.csv"]));
    assert!(!success);
    assert!(out.contains("file2 \"bad\" must be an excel file"));
}

#[test]
fn fails_on_bad_outfile_extension() {
    let (success, out) = combined_output(cmd().args(["fc.xlsx", "enr.xlsx", "out"]));
    assert!(!success);
    assert!(out.contains("outfile \"out\" must be a csv file"));
}

#[test]
fn fails_on_wrong_sheet_set() {
    let dir = tempfile::tempdir().unwrap();
    let (foldchange, _) = write_fixtures(dir.path());

    let bad_enrichment = dir.path().join("single_sheet.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Enrichment").unwrap();
    sheet.write_string(0, 0, "GroupID").unwrap();
    workbook.save(&bad_enrichment).unwrap();

    let (success, out) = combined_output(cmd().current_dir(dir.path()).args([
        foldchange.to_str().unwrap(),
        bad_enrichment.to_str().unwrap(),
        "out.csv",
    ]));
    assert!(!success);
    assert!(out.contains("does not contain required sheets."));
}

#[test]
fn full_run_writes_summary_and_plots() {
    let dir = tempfile::tempdir().unwrap();
    let (foldchange, enrichment) = write_fixtures(dir.path());

    cmd()
        .current_dir(dir.path())
        .args([
            foldchange.to_str().unwrap(),
            enrichment.to_str().unwrap(),
            "out.csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("See summary in \"out.csv\""))
        .stdout(predicate::str::contains(
            "See plots in \"up_reg.png\" and \"down_reg.png\" files.",
        ));

    assert!(dir.path().join("up_reg.png").is_file());
    assert!(dir.path().join("down_reg.png").is_file());

    let summary = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();

    assert_eq!(lines[0], ",Pathway,LogP,Gene,ensemble_ID,FoldChange,Decision");
    assert_eq!(
        lines[1],
        "0,GO:0001: pathway one,-12.4,\"GENEA,GENEC\",ENSG001,0.5,down_reg"
    );
    assert_eq!(lines[2], "1,GO:0002: pathway two,-4.2,GENEB,ENSG002,2,up_reg");
    assert_eq!(lines.len(), 3); // member row never makes it in
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let (foldchange, enrichment) = write_fixtures(dir.path());
    let args = [
        foldchange.to_str().unwrap().to_string(),
        enrichment.to_str().unwrap().to_string(),
        "out.csv".to_string(),
    ];

    cmd().current_dir(dir.path()).args(&args).assert().success();
    let first = std::fs::read(dir.path().join("out.csv")).unwrap();

    cmd().current_dir(dir.path()).args(&args).assert().success();
    let second = std::fs::read(dir.path().join("out.csv")).unwrap();

    assert_eq!(first, second);
}
