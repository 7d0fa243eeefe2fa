//! Document surface — the page elements a submission writes into
//!
//! The controller never touches markup directly. It talks to a [`Document`],
//! which a browser host backs with real elements and the CLI and tests back
//! with the in-memory [`Page`].
//!
//! Fading the content during a submission is a single class toggle on the
//! content root; the stylesheet decides what "blank" looks like.

use serde::Serialize;

/// Writable view of the page
///
/// In the browser these map to `.smoothieName` (headline), `.smoothiePicture`
/// (image), `.smoothieButton` (category) and `.smoothieIngredientsList`.
pub trait Document {
    fn set_headline(&mut self, text: &str);

    /// Image source plus the label used for both alt and title text
    fn set_image(&mut self, src: &str, label: &str);

    fn set_category(&mut self, text: &str);

    /// Replace every child of the ingredient list
    fn replace_ingredients(&mut self, items: &[String]);

    /// Toggle the neutral "blank" class on the content root
    fn set_blank(&mut self, blank: bool);

    fn set_pulse(&mut self, on: bool);

    /// Show the progress overlay at `percent`
    fn show_progress(&mut self, percent: u8);

    fn hide_progress(&mut self);
}

/// Image element state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: String,
}

/// In-memory page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub headline: String,
    pub image: Image,
    pub category: String,
    pub ingredients: Vec<String>,
    pub blank: bool,
    pub pulsing: bool,
    /// `Some(percent)` while the overlay is visible
    pub progress: Option<u8>,
    /// Every percentage the overlay displayed, in order
    #[serde(skip)]
    pub progress_history: Vec<u8>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing rendered yet
    pub fn is_empty(&self) -> bool {
        self.headline.is_empty() && self.image.src.is_empty() && self.ingredients.is_empty()
    }
}

impl Document for Page {
    fn set_headline(&mut self, text: &str) {
        self.headline = text.to_string();
    }

    fn set_image(&mut self, src: &str, label: &str) {
        self.image = Image {
            src: src.to_string(),
            alt: label.to_string(),
            title: label.to_string(),
        };
    }

    fn set_category(&mut self, text: &str) {
        self.category = text.to_string();
    }

    fn replace_ingredients(&mut self, items: &[String]) {
        self.ingredients = items.to_vec();
    }

    fn set_blank(&mut self, blank: bool) {
        self.blank = blank;
    }

    fn set_pulse(&mut self, on: bool) {
        self.pulsing = on;
    }

    fn show_progress(&mut self, percent: u8) {
        self.progress = Some(percent);
        self.progress_history.push(percent);
    }

    fn hide_progress(&mut self) {
        self.progress = None;
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{}", self.headline)?;
        writeln!(f, "  taste: {}", self.category)?;
        writeln!(f, "  image: {}", self.image.src)?;
        writeln!(f, "  ingredients:")?;
        for item in &self.ingredients {
            writeln!(f, "    - {}", item)?;
        }
        Ok(())
    }
}
