//! Handles displaying the output of various commands in a human readable format.

use std::fmt::Write;

use mviz_analysis::{TempoCategory, Visualization};

/// The category label and the hex colors of its palette, one per line.
pub fn tempo_category(bpm: f64, category: TempoCategory) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{category}: {bpm:.1} BPM")?;
    writeln!(output, "Palette:")?;
    for color in category.palette() {
        writeln!(output, "\t{}", color.to_hex())?;
    }

    Ok(output)
}

/// One line summary of a generated document, for stderr.
pub fn visualization_summary(visualization: &Visualization) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    write!(
        output,
        "{}: {} bars",
        visualization.filename,
        visualization.bar_values.len()
    )?;
    if let Some(category) = visualization.tempo_category {
        write!(output, ", {category}")?;
    }
    if let Some(duration) = visualization.duration {
        write!(output, ", {duration:.1}s")?;
    }

    Ok(output)
}
