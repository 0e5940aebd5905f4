use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;

use flatseq_io::{ConversionConfig, EntryWriter, OutputFormat, WriterOptions, open_entries};

use crate::utils::{input_paths, output_path, resolve_format};

struct Conversion {
    to: OutputFormat,
    from: Option<String>,
    options: WriterOptions,
    max_entries: Option<usize>,
}

#[derive(Default)]
struct ConvertStats {
    entries: usize,
    messages: usize,
}

impl Conversion {
    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let config = match matches.get_one::<String>("config") {
            Some(path) => ConversionConfig::try_from(Path::new(path))
                .with_context(|| format!("Failed to read config file: {}", path))?,
            None => ConversionConfig::default(),
        };

        let to = match matches.get_one::<String>("to") {
            Some(to) => to.parse::<OutputFormat>().map_err(anyhow::Error::msg)?,
            None => config
                .output_format()?
                .context("No output format: pass --to or set `format` in the [writer] table")?,
        };
        let from = matches
            .get_one::<String>("from")
            .cloned()
            .or_else(|| config.input_format().map(str::to_string));

        let mut options = config.writer_options();
        if matches.get_flag("sort") {
            options.sort_features = true;
        }

        Ok(Conversion {
            to,
            from,
            options,
            max_entries: config.max_entries(),
        })
    }

    /// Stream every record of `input` through `writer`.
    fn convert_file(&self, input: &Path, writer: &mut dyn EntryWriter, out: &mut dyn Write) -> Result<ConvertStats> {
        let format = resolve_format(input, self.from.as_deref())?;
        let entries = open_entries(input, format)?;

        let mut stats = ConvertStats::default();
        for record in entries.take(self.max_entries.unwrap_or(usize::MAX)) {
            let (entry, result) = record.with_context(|| format!("Failed to read {}", input.display()))?;
            for message in result.messages() {
                warn!("{}: {}", input.display(), message);
            }
            stats.messages += result.len();
            writer.write(out, &entry)?;
            stats.entries += 1;
        }
        Ok(stats)
    }

    fn convert_to_stdout(&self, inputs: &[PathBuf]) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let mut writer = self.to.writer(self.options.clone());

        writer.write_header(&mut out)?;
        for input in inputs {
            let stats = self.convert_file(input, writer.as_mut(), &mut out)?;
            info!(
                "{}: {} records converted to {}, {} messages",
                input.display(),
                stats.entries,
                self.to,
                stats.messages
            );
        }
        writer.write_footer(&mut out)?;
        out.flush()?;
        Ok(())
    }

    fn convert_to_file(&self, input: &Path, outdir: &Path) -> Result<ConvertStats> {
        let output = output_path(input, outdir, self.to.extension());
        let file = File::create(&output).with_context(|| format!("Failed to create file: {:?}", output))?;
        let mut out = BufWriter::new(file);
        let mut writer = self.to.writer(self.options.clone());

        writer.write_header(&mut out)?;
        let stats = self.convert_file(input, writer.as_mut(), &mut out)?;
        writer.write_footer(&mut out)?;
        out.flush()?;
        Ok(stats)
    }

    /// One file per input, converted in parallel.
    fn convert_to_dir(&self, inputs: &[PathBuf], outdir: &Path) -> Result<()> {
        create_dir_all(outdir).with_context(|| format!("Failed to create directory: {:?}", outdir))?;

        let pb = ProgressBar::new(inputs.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?,
        );
        pb.set_message(format!("Converting to {}", self.to));

        let stats = inputs
            .par_iter()
            .map(|input| {
                let stats = self.convert_to_file(input, outdir);
                pb.inc(1);
                stats
            })
            .collect::<Result<Vec<ConvertStats>>>()?;
        pb.finish_with_message("Done");

        let entries: usize = stats.iter().map(|s| s.entries).sum();
        let messages: usize = stats.iter().map(|s| s.messages).sum();
        info!(
            "{} files, {} records converted into {:?}, {} messages",
            inputs.len(),
            entries,
            outdir,
            messages
        );
        Ok(())
    }
}

pub fn run_convert(matches: &ArgMatches) -> Result<()> {
    let inputs = input_paths(matches);
    let conversion = Conversion::from_matches(matches)?;

    match matches.get_one::<String>("outdir") {
        Some(outdir) => conversion.convert_to_dir(&inputs, Path::new(outdir)),
        None => conversion.convert_to_stdout(&inputs),
    }
}
