//! Horizontal bar charts of -logP per pathway.

use plotters::prelude::*;

use std::path::Path;

use crate::core::SummaryRecord;
use crate::utils::CliError;
use crate::DEFAULT_AXIS_BOUND;

/// Explicit styling for the chart renderer; callers pass one instead
/// of relying on ambient figure state.
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub label_size: u32,
    pub x_desc: &'static str,
    pub bar_color: RGBColor,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            margin: 20,
            x_label_area: 60,
            y_label_area: 420,
            label_size: 20,
            x_desc: "-logP",
            bar_color: RGBColor(31, 119, 180),
        }
    }
}

/// Renders one horizontal bar chart (x = -LogP, y = pathway) and
/// overwrites `figure_name`. An empty record set still produces a
/// valid image with bare axes.
pub fn plot_fig(
    records: &[SummaryRecord],
    xlimit_right: f64,
    figure_name: &Path,
    config: &PlotConfig,
) -> Result<(), CliError> {
    let root = BitMapBackend::new(figure_name, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| CliError::PlotError(e.to_string()))?;

    let n_bars = records.len().max(1) as u32;
    let x_right = if xlimit_right > 0.0 {
        xlimit_right
    } else {
        DEFAULT_AXIS_BOUND
    };

    let mut chart = ChartBuilder::on(&root)
        .margin(config.margin)
        .x_label_area_size(config.x_label_area)
        .y_label_area_size(config.y_label_area)
        .build_cartesian_2d(0f64..x_right, (0u32..n_bars).into_segmented())
        .map_err(|e| CliError::PlotError(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(config.x_desc)
        .axis_desc_style(("sans-serif", config.label_size))
        .label_style(("sans-serif", config.label_size))
        .y_labels(n_bars as usize)
        .y_label_formatter(&|value| match value {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i)
                if (*i as usize) < records.len() =>
            {
                records[*i as usize].pathway.clone()
            }
            _ => String::new(),
        })
        .draw()
        .map_err(|e| CliError::PlotError(e.to_string()))?;

    chart
        .draw_series(records.iter().enumerate().map(|(i, record)| {
            Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(i as u32)),
                    (-record.log_p, SegmentValue::Exact(i as u32 + 1)),
                ],
                config.bar_color.filled(),
            )
        }))
        .map_err(|e| CliError::PlotError(e.to_string()))?;

    root.present().map_err(|e| CliError::PlotError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Decision;

    fn record(pathway: &str, log_p: f64) -> SummaryRecord {
        SummaryRecord {
            pathway: pathway.to_string(),
            log_p,
            genes: vec!["GENEA".to_string()],
            ensembl_id: "ENSG001".to_string(),
            fold_change: 0.5,
            decision: Decision::DownReg,
        }
    }

    #[test]
    fn test_plot_fig_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("up_reg.png");

        let records = vec![record("T1: D1", -10.0), record("T2: D2", -3.5)];
        plot_fig(&records, 10.0, &path, &PlotConfig::default()).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_plot_fig_handles_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("down_reg.png");

        plot_fig(&[], 0.0, &path, &PlotConfig::default()).unwrap();

        assert!(path.is_file());
    }
}
