use clap::Parser;
use std::path::PathBuf;

use crate::utils::{validate_suffix, CliError};

#[derive(Debug, Parser)]
#[command(about = "Fold change of RNAseq data", long_about = None)]
pub struct Args {
    #[arg(
        value_name = "file1.xlsx",
        help = "Input file with fold change [columns: ensembl_gene_id, FoldChange]"
    )]
    pub foldchange: PathBuf,

    #[arg(
        value_name = "file2.xlsx",
        help = "Input file with LogP and geneID [sheets: Annotation, Enrichment]"
    )]
    pub enrichment: PathBuf,

    #[arg(value_name = "outfile.csv", help = "Output file name")]
    pub outfile: PathBuf,
}

impl Args {
    /// Suffix checks run before any file is opened, in argument order,
    /// so the first violation decides the error message.
    pub fn check(&self) -> Result<(), CliError> {
        validate_suffix(&self.foldchange, ".xlsx", "file1", "an excel file")?;
        validate_suffix(&self.enrichment, ".xlsx", "file2", "an excel file")?;
        validate_suffix(&self.outfile, ".csv", "outfile", "a csv file")?;

        Ok(())
    }
}
