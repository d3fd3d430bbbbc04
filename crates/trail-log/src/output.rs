use crate::analysis::{ChartData, TripAnalysis};
use crate::error::Result;
use crate::settings::OutputFormat;
use std::io::Write;

/// Write all analyses in the requested format
pub fn write_report<W: Write>(
    out: &mut W,
    analyses: &[TripAnalysis],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (i, analysis) in analyses.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write_text(out, analysis)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, analyses)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn write_text<W: Write>(out: &mut W, analysis: &TripAnalysis) -> Result<()> {
    let summary = &analysis.summary;

    writeln!(out, "{}", analysis.file.display())?;
    if let Some(error) = &analysis.error {
        writeln!(out, "  warning:         {error}")?;
    }
    writeln!(out, "  distance:        {:.2} km", summary.total_distance_km)?;
    writeln!(
        out,
        "  elevation gain:  {:.0} m",
        summary.total_elevation_gain_m
    )?;
    if summary.start_location.is_empty() {
        writeln!(out, "  start:           -")?;
    } else {
        writeln!(out, "  start:           {}", summary.start_location)?;
    }
    writeln!(
        out,
        "  points:          {} ({} with elevation)",
        analysis.point_count, analysis.points_with_elevation
    )?;

    match &analysis.chart {
        Some(ChartData::Series { points }) => {
            writeln!(out, "  profile:         {} samples", points.len())?;
            for p in points {
                writeln!(
                    out,
                    "    {:>9.2} km  {:>6} m",
                    p.cumulative_distance_km, p.elevation_m
                )?;
            }
        }
        Some(ChartData::NoData) => writeln!(out, "  profile:         no elevation data available")?,
        None => {}
    }
    Ok(())
}
