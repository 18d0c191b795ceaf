//! Core module for labeling pathway enrichment summaries by regulation
//!
//! This crate joins an RNA-seq fold-change table onto Metascape
//! enrichment output. Each "summary" enrichment row is resolved to a
//! representative gene, mapped to its Ensembl identifier through the
//! annotation sheet, matched against the fold-change table, and labeled
//! as up- or down-regulated. The result is written as a summary table
//! plus two horizontal bar charts of -logP per pathway.

pub mod cli;
pub mod core;
pub mod plot;
pub mod utils;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// numeric values
pub const FOLD_CHANGE_THRESHOLD: f64 = 1.2;
pub const AXIS_STEP: f64 = 5.0;
pub const DEFAULT_AXIS_BOUND: f64 = 5.0;

// file names
pub const UP_REG_PNG: &str = "up_reg.png";
pub const DOWN_REG_PNG: &str = "down_reg.png";

// sheet and group markers
pub const ANNOTATION_SHEET: &str = "Annotation";
pub const ENRICHMENT_SHEET: &str = "Enrichment";
pub const SUMMARY_TAG: &str = "Summary";
