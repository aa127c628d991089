//! Configuration for filling and visualization, plus output naming.

use std::path::{Path, PathBuf};

/// Form filling configuration.
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// Non-button widgets smaller than this on both sides get an "X" mark.
    pub checkbox_threshold: f64,

    /// Font size of the stamped "X".
    pub stamp_font_size: f32,

    /// Probability that a button is checked.
    pub checked_probability: f64,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FillOptions {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            checkbox_threshold: 30.0,
            stamp_font_size: 10.0,
            checked_probability: 0.7,
        }
    }

    /// Set the checkbox-shape threshold.
    pub fn with_checkbox_threshold(mut self, threshold: f64) -> Self {
        self.checkbox_threshold = threshold;
        self
    }

    /// Set the stamp font size.
    pub fn with_stamp_font_size(mut self, size: f32) -> Self {
        self.stamp_font_size = size;
        self
    }

    /// Set the probability that a button is checked (clamped to 0..=1).
    pub fn with_checked_probability(mut self, probability: f64) -> Self {
        self.checked_probability = probability.clamp(0.0, 1.0);
        self
    }
}

/// Visualization configuration.
#[derive(Debug, Clone)]
pub struct VisualizeOptions {
    /// Zoom factor; 1.0 renders one pixel per point. `None` keeps each
    /// visualization's own default.
    pub zoom: Option<f32>,

    /// 1-indexed page to render.
    pub page_number: u32,

    /// Explicit output path; derived from the input name when `None`.
    pub output: Option<PathBuf>,
}

impl Default for VisualizeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualizeOptions {
    /// Page 1 at the default zoom, default output name.
    pub fn new() -> Self {
        Self {
            zoom: None,
            page_number: 1,
            output: None,
        }
    }

    /// Set the zoom factor. Non-positive values are ignored.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = (zoom > 0.0).then_some(zoom);
        self
    }

    /// The configured zoom, or `default` when none was set.
    pub fn zoom_or(&self, default: f32) -> f32 {
        self.zoom.unwrap_or(default)
    }

    /// Set the page to render.
    pub fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    /// Write to an explicit path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// The explicit output, or `fallback` when none was set.
    pub fn output_or(&self, fallback: PathBuf) -> PathBuf {
        self.output.clone().unwrap_or(fallback)
    }
}

/// Names of every artifact derived from one input PDF.
///
/// All artifacts land next to the input, named after its stem.
///
/// # Examples
///
/// ```
/// use pdf_formkit::config::ArtifactNames;
///
/// let names = ArtifactNames::for_input("forms/RF401.pdf");
/// assert_eq!(names.fields_json().to_str(), Some("forms/RF401_fields.json"));
/// assert_eq!(names.filled_pdf().to_str(), Some("forms/RF401_Filled.pdf"));
/// assert_eq!(
///     names.highlighted_png(1).to_str(),
///     Some("forms/RF401_page1_fields_highlighted.png")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    dir: PathBuf,
    stem: String,
}

impl ArtifactNames {
    /// Derive names from an input PDF path.
    pub fn for_input(input: impl AsRef<Path>) -> Self {
        let input = input.as_ref();
        Self {
            dir: input.parent().map(Path::to_path_buf).unwrap_or_default(),
            stem: input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Input file stem.
    pub fn stem(&self) -> &str {
        &self.stem
    }

    fn join(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.stem, suffix))
    }

    /// `<stem>_fields.json`
    pub fn fields_json(&self) -> PathBuf {
        self.join("_fields.json")
    }

    /// `<stem>_field_names.json`
    pub fn field_names_json(&self) -> PathBuf {
        self.join("_field_names.json")
    }

    /// `<stem>_hierarchical.json`
    pub fn hierarchical_json(&self) -> PathBuf {
        self.join("_hierarchical.json")
    }

    /// `<stem>_full_extraction.json`
    pub fn full_extraction_json(&self) -> PathBuf {
        self.join("_full_extraction.json")
    }

    /// `<stem>_Filled.pdf`
    pub fn filled_pdf(&self) -> PathBuf {
        self.join("_Filled.pdf")
    }

    /// `<stem>_page<N>_fields_highlighted.png`
    pub fn highlighted_png(&self, page: u32) -> PathBuf {
        self.join(&format!("_page{}_fields_highlighted.png", page))
    }

    /// `<stem>_page<N>_field_list.png`
    pub fn field_list_png(&self, page: u32) -> PathBuf {
        self.join(&format!("_page{}_field_list.png", page))
    }

    /// `<stem>_page<N>_comprehensive.png`
    pub fn comprehensive_png(&self, page: u32) -> PathBuf {
        self.join(&format!("_page{}_comprehensive.png", page))
    }

    /// `<stem>_page<N>_fields_only.png`
    pub fn fields_only_png(&self, page: u32) -> PathBuf {
        self.join(&format!("_page{}_fields_only.png", page))
    }

    /// `<stem>_page<N>_filled_crop.png`
    pub fn filled_crop_png(&self, page: u32) -> PathBuf {
        self.join(&format!("_page{}_filled_crop.png", page))
    }
}
