//! Table loading, summary output, and the shared error type.

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use log::info;
use thiserror::Error;

use std::path::Path;

use crate::core::{AnnotationRow, EnrichmentRow, FoldChangeRow, SummaryRecord};
use crate::{ANNOTATION_SHEET, ENRICHMENT_SHEET};

pub const ANNOTATION_COLUMNS: [&str; 2] = ["Input ID", "Gene ID"];
pub const ENRICHMENT_COLUMNS: [&str; 5] = ["GroupID", "Term", "Description", "LogP", "Genes"];
pub const FOLD_CHANGE_COLUMNS: [&str; 2] = ["ensembl_gene_id", "FoldChange"];

/// error handling for the whole pipeline
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Excel error: {0}")]
    ExcelError(#[from] calamine::XlsxError),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Plot error: {0}")]
    PlotError(String),
}

/// Case-sensitive suffix check on the raw file name.
pub fn validate_suffix(arg: &Path, suffix: &str, label: &str, kind: &str) -> Result<(), CliError> {
    if !arg.to_string_lossy().ends_with(suffix) {
        return Err(CliError::InvalidInput(format!(
            "{} \"{}\" must be {}",
            label,
            arg.display(),
            kind
        )));
    }

    Ok(())
}

/// The three fully loaded input tables, in file order.
#[derive(Debug, Clone)]
pub struct Tables {
    pub annotation: Vec<AnnotationRow>,
    pub enrichment: Vec<EnrichmentRow>,
    pub fold_change: Vec<FoldChangeRow>,
}

/// Loads the enrichment workbook (sheets must be exactly Annotation +
/// Enrichment) and the fold-change workbook (first sheet). Column
/// checks short-circuit in a fixed order so error messages stay
/// deterministic: Annotation, then Enrichment, then fold change.
pub fn load_tables(foldchange: &Path, enrichment: &Path) -> Result<Tables, CliError> {
    let mut workbook: Xlsx<_> = open_workbook(enrichment).map_err(|e| {
        CliError::InvalidInput(format!(
            "file2 \"{}\" could not be read -> {e}",
            enrichment.display()
        ))
    })?;

    let mut sheets = workbook.sheet_names().to_owned();
    sheets.sort();
    if sheets != [ANNOTATION_SHEET, ENRICHMENT_SHEET] {
        return Err(CliError::InvalidInput(format!(
            "file2 \"{}\" does not contain required sheets.",
            enrichment.display()
        )));
    }

    let annotation_range = workbook.worksheet_range(ANNOTATION_SHEET)?;
    let enrichment_range = workbook.worksheet_range(ENRICHMENT_SHEET)?;

    let mut fold_workbook: Xlsx<_> = open_workbook(foldchange).map_err(|e| {
        CliError::InvalidInput(format!(
            "file1 \"{}\" could not be read -> {e}",
            foldchange.display()
        ))
    })?;
    let fold_sheet = fold_workbook.sheet_names().first().cloned().ok_or_else(|| {
        CliError::InvalidInput(format!(
            "file1 \"{}\" does not contain any sheets.",
            foldchange.display()
        ))
    })?;
    let fold_range = fold_workbook.worksheet_range(&fold_sheet)?;

    let annotation_headers = headers(&annotation_range);
    let enrichment_headers = headers(&enrichment_range);
    let fold_headers = headers(&fold_range);

    let (Some(input_idx), Some(gene_idx)) = (
        column(&annotation_headers, ANNOTATION_COLUMNS[0]),
        column(&annotation_headers, ANNOTATION_COLUMNS[1]),
    ) else {
        return Err(CliError::InvalidInput(format!(
            "file2 \"{}\" does not contain required columns.",
            enrichment.display()
        )));
    };

    let (Some(group_idx), Some(term_idx), Some(desc_idx), Some(logp_idx), Some(genes_idx)) = (
        column(&enrichment_headers, ENRICHMENT_COLUMNS[0]),
        column(&enrichment_headers, ENRICHMENT_COLUMNS[1]),
        column(&enrichment_headers, ENRICHMENT_COLUMNS[2]),
        column(&enrichment_headers, ENRICHMENT_COLUMNS[3]),
        column(&enrichment_headers, ENRICHMENT_COLUMNS[4]),
    ) else {
        return Err(CliError::InvalidInput(format!(
            "file2 \"{}\" does not contain required columns.",
            enrichment.display()
        )));
    };

    let (Some(ensembl_idx), Some(fold_idx)) = (
        column(&fold_headers, FOLD_CHANGE_COLUMNS[0]),
        column(&fold_headers, FOLD_CHANGE_COLUMNS[1]),
    ) else {
        return Err(CliError::InvalidInput(format!(
            "file1 \"{}\" does not contain required columns.",
            foldchange.display()
        )));
    };

    let annotation = annotation_range
        .rows()
        .skip(1)
        .map(|row| AnnotationRow {
            input_id: cell_to_string(cell(row, input_idx)),
            gene_id: cell_to_string(cell(row, gene_idx)),
        })
        .collect();

    let enrichment = enrichment_range
        .rows()
        .skip(1)
        .map(|row| EnrichmentRow {
            group_id: cell_to_string(cell(row, group_idx)),
            term: cell_to_string(cell(row, term_idx)),
            description: cell_to_string(cell(row, desc_idx)),
            log_p: cell_to_f64(cell(row, logp_idx)).unwrap_or(f64::NAN),
            genes: cell_to_string(cell(row, genes_idx)),
        })
        .collect();

    let fold_change = fold_range
        .rows()
        .skip(1)
        .map(|row| FoldChangeRow {
            ensembl_gene_id: cell_to_string(cell(row, ensembl_idx)),
            fold_change: cell_to_f64(cell(row, fold_idx)).unwrap_or(f64::NAN),
        })
        .collect();

    Ok(Tables {
        annotation,
        enrichment,
        fold_change,
    })
}

fn headers(range: &Range<Data>) -> Vec<String> {
    range
        .rows()
        .next()
        .map(|row| row.iter().map(cell_to_string).collect())
        .unwrap_or_default()
}

fn column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

static EMPTY_CELL: Data = Data::Empty;

fn cell<'a>(row: &'a [Data], idx: usize) -> &'a Data {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Writes the summary table with a leading row-index column.
pub fn write_summary(summary: &[SummaryRecord], outfile: &Path) -> Result<(), CliError> {
    info!("Rows in {}: {}. Writing...", outfile.display(), summary.len());

    let mut writer = csv::Writer::from_path(outfile)?;
    writer.write_record([
        "",
        "Pathway",
        "LogP",
        "Gene",
        "ensemble_ID",
        "FoldChange",
        "Decision",
    ])?;

    for (idx, record) in summary.iter().enumerate() {
        writer.write_record([
            idx.to_string(),
            record.pathway.clone(),
            record.log_p.to_string(),
            record.genes.join(","),
            record.ensembl_id.clone(),
            record.fold_change.to_string(),
            record.decision.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
