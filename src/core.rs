//! Core module for building the regulation summary
//!
//! Each enrichment row whose GroupID marks it as a "summary" row is
//! resolved to a representative gene (the first gene of its cluster),
//! mapped to an Ensembl identifier through the annotation table, and
//! matched against the fold-change table. Rows that resolve both
//! lookups are classified as up- or down-regulated around a 1.2 fold
//! ratio; rows that miss either lookup are skipped with a warning.

use hashbrown::HashMap;
use log::{info, warn};

use std::fmt;
use std::path::Path;

use crate::cli::Args;
use crate::plot::{plot_fig, PlotConfig};
use crate::utils::{load_tables, write_summary, CliError};
use crate::{
    AXIS_STEP, DEFAULT_AXIS_BOUND, DOWN_REG_PNG, FOLD_CHANGE_THRESHOLD, SUMMARY_TAG, UP_REG_PNG,
};

/// Row of the Annotation sheet: external input id -> gene symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRow {
    pub input_id: String,
    pub gene_id: String,
}

/// Row of the Enrichment sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRow {
    pub group_id: String,
    pub term: String,
    pub description: String,
    pub log_p: f64,
    /// Raw comma-separated gene list, kept verbatim.
    pub genes: String,
}

/// Row of the fold-change table: Ensembl id -> expression ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldChangeRow {
    pub ensembl_gene_id: String,
    pub fold_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    UpReg,
    DownReg,
}

impl Decision {
    /// The threshold applies to the expression ratio itself, not a
    /// log fold change; exactly 1.2 counts as up-regulated.
    pub fn from_fold_change(fold_change: f64) -> Self {
        if fold_change < FOLD_CHANGE_THRESHOLD {
            Self::DownReg
        } else {
            Self::UpReg
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpReg => "up_reg",
            Self::DownReg => "down_reg",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One fully resolved summary pathway; constructed once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub pathway: String,
    pub log_p: f64,
    pub genes: Vec<String>,
    pub ensembl_id: String,
    pub fold_change: f64,
    pub decision: Decision,
}

/// Builds the ordered summary from the three input tables.
///
/// Both lookups are first-match-in-table-order scans; duplicate keys
/// keep their earliest value. The maps below preserve that exactly
/// because insertion only happens on the first occurrence.
pub fn create_summary(
    annotation: &[AnnotationRow],
    enrichment: &[EnrichmentRow],
    fold_change: &[FoldChangeRow],
) -> Vec<SummaryRecord> {
    let mut xrefs: HashMap<&str, &str> = HashMap::new();
    for row in annotation {
        xrefs.entry(row.gene_id.as_str()).or_insert(row.input_id.as_str());
    }

    let mut folds: HashMap<&str, f64> = HashMap::new();
    for row in fold_change {
        folds.entry(row.ensembl_gene_id.as_str()).or_insert(row.fold_change);
    }

    let mut summary = Vec::new();
    for row in enrichment.iter().filter(|r| r.group_id.contains(SUMMARY_TAG)) {
        let pathway = format!("{}: {}", row.term, row.description);
        // verbatim split: no trimming, no deduplication
        let genes: Vec<String> = row.genes.split(',').map(|g| g.to_owned()).collect();
        let representative = genes[0].as_str();

        let Some(ensembl_id) = xrefs.get(representative).copied() else {
            warn!(
                "No annotation match for gene '{}' (group '{}'). Skipping...",
                representative, row.group_id
            );
            continue;
        };

        let Some(fold) = folds.get(ensembl_id).copied() else {
            warn!(
                "No fold change for id '{}' (group '{}'). Skipping...",
                ensembl_id, row.group_id
            );
            continue;
        };

        summary.push(SummaryRecord {
            pathway,
            log_p: row.log_p,
            genes,
            ensembl_id: ensembl_id.to_owned(),
            fold_change: fold,
            decision: Decision::from_fold_change(fold),
        });
    }

    summary
}

/// Shared x-axis upper bound for both charts: the smallest multiple of
/// 5 at or above the maximum of -LogP over the whole summary. `None`
/// when the summary is empty.
pub fn axis_upper_bound(summary: &[SummaryRecord]) -> Option<f64> {
    summary
        .iter()
        .map(|r| -r.log_p)
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| match acc {
            Some(m) => Some(m.max(v)),
            None => Some(v),
        })
        .map(|m| (m / AXIS_STEP).ceil() * AXIS_STEP)
}

/// Full pipeline: load, summarize, plot both directions, write the CSV.
pub fn run(args: Args) -> Result<(), CliError> {
    info!("Loading tables...");
    let tables = load_tables(&args.foldchange, &args.enrichment)?;
    info!(
        "Rows: {} annotation, {} enrichment, {} fold change",
        tables.annotation.len(),
        tables.enrichment.len(),
        tables.fold_change.len()
    );

    let summary = create_summary(&tables.annotation, &tables.enrichment, &tables.fold_change);
    info!("Resolved summary pathways: {}", summary.len());

    let (up, down): (Vec<SummaryRecord>, Vec<SummaryRecord>) = summary
        .iter()
        .cloned()
        .partition(|r| r.decision == Decision::UpReg);

    let max_x_plot = axis_upper_bound(&summary).unwrap_or(DEFAULT_AXIS_BOUND);
    let config = PlotConfig::default();

    plot_fig(&up, max_x_plot, Path::new(UP_REG_PNG), &config)?;
    plot_fig(&down, max_x_plot, Path::new(DOWN_REG_PNG), &config)?;

    write_summary(&summary, &args.outfile)?;

    println!("See summary in \"{}\"", args.outfile.display());
    println!("See plots in \"{}\" and \"{}\" files.", UP_REG_PNG, DOWN_REG_PNG);

    Ok(())
}
