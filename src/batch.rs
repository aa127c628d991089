//! Batch driver: extract, fill and visualize every form in a directory.
//!
//! Each input runs through the pipeline in sequence. A failure in one stage
//! stops that input only; the batch always moves on to the next file.

use crate::config::{ArtifactNames, FillOptions};
use crate::error::Result;
use crate::extract::{log_summary, FieldExtractor};
use crate::fill::{FakeData, FormFiller};
use crate::visualize::FieldVisualizer;
use rand::RngCore;
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix of filled outputs.
pub const FILLED_SUFFIX: &str = "_Filled.pdf";

/// Legacy filled-output name fragment.
pub const LEGACY_FILLED_MARKER: &str = "Filled_Form";

/// Pipeline stage of one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Field extraction and JSON export
    Extract,
    /// Form filling
    Fill,
    /// Page-1 highlight image
    Visualize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Extract => "extract",
            Stage::Fill => "fill",
            Stage::Visualize => "visualize",
        })
    }
}

/// What happened to one input PDF.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    /// Input PDF
    pub input: PathBuf,
    /// Extracted record, when extraction succeeded
    pub fields_json: Option<PathBuf>,
    /// Filled PDF, when filling succeeded
    pub filled_pdf: Option<PathBuf>,
    /// Highlight image, when visualization succeeded
    pub visualization: Option<PathBuf>,
    /// Fields extracted
    pub fields: usize,
    /// Widgets filled
    pub filled: usize,
    /// Stage failures, in order
    pub errors: Vec<(Stage, String)>,
}

impl FileOutcome {
    /// Extraction and filling both succeeded. A failed visualization does
    /// not count against the file.
    pub fn is_success(&self) -> bool {
        self.fields_json.is_some() && self.filled_pdf.is_some()
    }
}

/// Outcome of a whole batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// One entry per processed input, in processing order
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    /// Inputs that were extracted and filled.
    pub fn succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.is_success()).count()
    }

    /// Inputs that stopped at extraction or filling.
    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }
}

/// Whether a file name looks like an output of an earlier run.
///
/// # Examples
///
/// ```
/// use pdf_formkit::batch::is_generated_output;
///
/// assert!(is_generated_output("form_Filled.pdf"));
/// assert!(is_generated_output("RF401_Filled_Form.pdf"));
/// assert!(!is_generated_output("form.pdf"));
/// ```
pub fn is_generated_output(file_name: &str) -> bool {
    file_name.ends_with(FILLED_SUFFIX) || file_name.contains(LEGACY_FILLED_MARKER)
}

/// Keep the names that are not generated outputs, in the given order.
pub fn select_inputs<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    names.into_iter().filter(|name| !is_generated_output(name)).collect()
}

/// PDFs directly inside `dir` (non-recursive) that are not generated
/// outputs, sorted by file name.
pub fn discover_pdfs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_pdf = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if is_pdf && !is_generated_output(&name) {
            found.push(path);
        }
    }
    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(found)
}

/// Runs the pipeline over inputs.
pub struct BatchProcessor<'a> {
    fill_options: FillOptions,
    fake: Option<&'a dyn FakeData>,
}

impl<'a> BatchProcessor<'a> {
    /// Create a processor; `fake` supplies realistic values when present.
    pub fn new(fake: Option<&'a dyn FakeData>) -> Self {
        Self {
            fill_options: FillOptions::default(),
            fake,
        }
    }

    /// Replace the fill options.
    pub fn with_fill_options(mut self, options: FillOptions) -> Self {
        self.fill_options = options;
        self
    }

    /// Extract → save `<stem>_fields.json` → fill to `<stem>_Filled.pdf` →
    /// simple highlight of page 1.
    pub fn process_pdf(&self, input: &Path, rng: &mut dyn RngCore) -> FileOutcome {
        log::info!("Processing: {}", input.display());
        let names = ArtifactNames::for_input(input);
        let mut outcome = FileOutcome {
            input: input.to_path_buf(),
            ..FileOutcome::default()
        };

        let json = names.fields_json();
        let record = match FieldExtractor::extract(input).and_then(|record| {
            record.save_json(&json)?;
            Ok(record)
        }) {
            Ok(record) => record,
            Err(e) => {
                log::error!("Error extracting fields from {}: {}", input.display(), e);
                outcome.errors.push((Stage::Extract, e.to_string()));
                return outcome;
            },
        };
        log_summary(&record, &json);
        outcome.fields = record.total_fields();
        outcome.fields_json = Some(json);

        let filled_pdf = names.filled_pdf();
        let filled = FormFiller::open(input, record).and_then(|filler| {
            filler
                .with_options(self.fill_options.clone())
                .fill(&filled_pdf, rng, self.fake)
        });
        match filled {
            Ok(report) => {
                outcome.filled = report.filled;
                outcome.filled_pdf = Some(filled_pdf);
            },
            Err(e) => {
                log::error!("Error filling form {}: {}", input.display(), e);
                outcome.errors.push((Stage::Fill, e.to_string()));
                return outcome;
            },
        }

        match FieldVisualizer::open(input).and_then(|viz| viz.highlight_simple()) {
            Ok(report) => outcome.visualization = Some(report.output),
            Err(e) => {
                log::error!("Error visualizing fields of {}: {}", input.display(), e);
                outcome.errors.push((Stage::Visualize, e.to_string()));
            },
        }

        log::info!("Successfully processed {}", input.display());
        outcome
    }

    /// Process every input in order.
    pub fn run(&self, inputs: &[PathBuf], rng: &mut dyn RngCore) -> BatchReport {
        let mut report = BatchReport::default();
        for input in inputs {
            report.files.push(self.process_pdf(input, rng));
        }
        log::info!(
            "Batch complete: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }
}

/// Discover the PDFs in `dir` and process them all.
///
/// Only an unreadable directory is an error; per-file failures are in the
/// report.
pub fn run_batch(dir: impl AsRef<Path>, rng: &mut dyn RngCore, fake: Option<&dyn FakeData>) -> Result<BatchReport> {
    let inputs = discover_pdfs(dir)?;
    if inputs.is_empty() {
        log::info!("No new PDF files found to process.");
    } else {
        log::info!("Found {} PDF(s) to process.", inputs.len());
    }
    Ok(BatchProcessor::new(fake).run(&inputs, rng))
}
