//! Fold-change labeling of Metascape enrichment results
//!
//! This tool takes an RNA-seq fold-change workbook and a Metascape
//! enrichment workbook, builds a per-pathway summary of the merged
//! clusters, and classifies each summary pathway as up- or
//! down-regulated based on the fold change of its representative gene.
//!
//! In essence, the pipeline extracts the "summary" rows from the
//! Enrichment sheet, resolves the first gene of each cluster to its
//! Ensembl identifier through the Annotation sheet, looks that
//! identifier up in the fold-change table, and applies a 1.2 ratio
//! threshold. The final output is a CSV summary table plus two bar
//! charts of -logP per pathway, one per regulation direction.

use clap::{self, Parser};
use log::{error, info, Level};
use simple_logger::init_with_level;

use meta_reg::cli::Args;
use meta_reg::core::run;

fn main() {
    let start = std::time::Instant::now();
    init_with_level(Level::Info).unwrap();

    let args: Args = Args::parse();

    args.check().unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    run(args).unwrap_or_else(|e| {
        error!("{}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();
    info!("Elapsed time: {:.3?}", elapsed);
}
