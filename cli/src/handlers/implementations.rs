use std::path::Path;

use anyhow::Context as _;
use mviz_analysis::{BarCount, TempoCategory, Visualization, bars::extract_bar_count};
use mviz_core::{config::OutputFormat, expand_path, file_uri};

use super::{BarsArgs, Command, CommandHandler, Context, printing, utils};

impl CommandHandler for Command {
    type Output = anyhow::Result<()>;

    fn handle<W1: std::fmt::Write, W2: std::fmt::Write>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        stderr: &mut W2,
    ) -> Self::Output {
        match self {
            Self::Bars(args) => args.handle(ctx, stdout, stderr),
            Self::Tempo { bpm } => {
                if let Some(category) = TempoCategory::from_bpm(*bpm) {
                    write!(stdout, "{}", printing::tempo_category(*bpm, category)?)?;
                } else {
                    writeln!(stdout, "Tempo not found")?;
                }
                Ok(())
            }
            Self::Config => {
                writeln!(stdout, "{}", ctx.config_path.display())?;
                Ok(())
            }
        }
    }
}

impl CommandHandler for BarsArgs {
    type Output = anyhow::Result<()>;

    fn handle<W1: std::fmt::Write, W2: std::fmt::Write>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        stderr: &mut W2,
    ) -> Self::Output {
        let num_bars = match self.num_bars {
            Some(n) => BarCount::try_from(n)?,
            None => ctx.settings.bars.num_bars,
        };
        let format = self
            .format
            .map_or(ctx.settings.output.format, OutputFormat::from);

        let input = expand_path(&self.input);
        let matrix = utils::load_feature_matrix(&input)?;
        let bar_values = extract_bar_count(&matrix, num_bars)
            .with_context(|| format!("failed to extract bars from {}", input.display()))?;

        let visualization = self.visualization(&input, bar_values)?;
        let document = match format {
            OutputFormat::Json => format!("{}\n", visualization.to_json()?),
            OutputFormat::Js => visualization.to_js_module()?,
        };

        if let Some(output) = &self.output {
            let output = expand_path(output);
            write_document(&output, &document)?;
            writeln!(
                stderr,
                "Wrote {} to {}",
                printing::visualization_summary(&visualization)?,
                output.display()
            )?;
        } else {
            write!(stdout, "{document}")?;
        }

        Ok(())
    }
}

impl BarsArgs {
    /// Bundle `bar_values` with whatever metadata was given on the command line.
    fn visualization(&self, input: &Path, bar_values: Vec<f64>) -> anyhow::Result<Visualization> {
        let audio = self.audio.as_deref().map(expand_path);
        let filename = audio
            .as_deref()
            .unwrap_or(input)
            .file_name()
            .map_or_else(
                || input.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            );

        let mut visualization = Visualization::new(filename, bar_values);

        match (&self.title, &self.artist) {
            (Some(title), Some(artist)) => {
                visualization = visualization.with_track(title, artist);
            }
            (title, artist) => {
                visualization.title.clone_from(title);
                visualization.artist.clone_from(artist);
            }
        }
        if let Some(audio) = audio {
            let uri = file_uri(&audio)
                .with_context(|| format!("failed to resolve {}", audio.display()))?;
            visualization = visualization.with_audio(uri);
        }
        if let Some(bpm) = self.tempo {
            visualization = visualization.with_tempo(bpm);
        }
        if let Some(seconds) = self.duration {
            visualization = visualization.with_duration(seconds);
        }
        if let Some(spectrogram) = &self.spectrogram {
            visualization = visualization.with_spectrogram(spectrogram_uri(spectrogram)?);
        }

        Ok(visualization)
    }
}

/// Data and other URIs are passed through, anything else is taken as a local file.
fn spectrogram_uri(reference: &str) -> anyhow::Result<String> {
    if reference.starts_with("data:") || reference.contains("://") {
        return Ok(reference.to_owned());
    }
    file_uri(Path::new(reference)).with_context(|| format!("failed to resolve {reference}"))
}

fn write_document(path: &Path, document: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, document).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Wrote visualization to {}", path.display());
    Ok(())
}
