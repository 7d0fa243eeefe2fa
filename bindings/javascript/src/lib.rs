//! JavaScript bindings for the Smoothie Mixer
//!
//! Thin wrapper around `smoothie-core` compiled to WebAssembly for the page
//! script. ZERO logic here — all behavior from the Rust implementation.
//! Lists cross the boundary as JSON array strings.

use smoothie_core::progress::{Phase, ProgressSimulator};
use smoothie_core::{extract_tokens, prepare_ingredients, Normalizer};
use wasm_bindgen::prelude::*;

fn parse_list(json: &str) -> Result<Vec<String>, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Expected a JSON string array: {}", e)))
}

fn to_json(items: &[String]) -> Result<String, JsError> {
    serde_json::to_string(items).map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Reference dictionary loaded by the page.
///
/// Construct once after fetching `ingredients.json`. Malformed text gives a
/// normalizer without dictionary: every token invalid, canonicalization a
/// passthrough.
#[wasm_bindgen(js_name = "IngredientNormalizer")]
pub struct IngredientNormalizer {
    inner: Normalizer,
}

#[wasm_bindgen(js_class = "IngredientNormalizer")]
impl IngredientNormalizer {
    /// @param dictionaryJson - `{ zutaten: [{ standard, eingabe: [...] }] }`
    #[wasm_bindgen(constructor)]
    pub fn new(dictionary_json: &str) -> IngredientNormalizer {
        IngredientNormalizer {
            inner: Normalizer::from_json(dictionary_json),
        }
    }

    /// Normalizer used before the dictionary has arrived
    pub fn unavailable() -> IngredientNormalizer {
        IngredientNormalizer {
            inner: Normalizer::unavailable(),
        }
    }

    #[wasm_bindgen(js_name = "isAvailable")]
    pub fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    #[wasm_bindgen(js_name = "isValid")]
    pub fn is_valid(&self, token: &str) -> bool {
        self.inner.is_valid(token)
    }

    /// @param tokensJson - JSON string array
    /// @returns JSON string array of standard forms
    pub fn canonicalize(&self, tokens_json: &str) -> Result<String, JsError> {
        let tokens = parse_list(tokens_json)?;
        to_json(&self.inner.canonicalize(&tokens))
    }

    /// @param text - first `ingredients` field of a lookup response
    /// @returns JSON string array of recognized tokens
    #[wasm_bindgen(js_name = "extractTokens")]
    pub fn extract_tokens(&self, text: &str) -> Result<String, JsError> {
        to_json(&extract_tokens(text, &self.inner))
    }

    /// @param ingredientsJson - the full `ingredients` array of a response
    /// @returns JSON string array ready to render
    #[wasm_bindgen(js_name = "prepareIngredients")]
    pub fn prepare_ingredients(&self, ingredients_json: &str) -> Result<String, JsError> {
        let ingredients = parse_list(ingredients_json)?;
        to_json(&prepare_ingredients(&ingredients, &self.inner))
    }
}

/// Capitalize each space-separated word and join with hyphens.
#[wasm_bindgen(js_name = "titleCaseHyphenJoin")]
pub fn title_case_hyphen_join(text: &str) -> String {
    smoothie_core::title_case_hyphen_join(text)
}

/// Progress bar state machine driven from `requestAnimationFrame`.
#[wasm_bindgen(js_name = "ProgressSimulator")]
pub struct Progress {
    inner: ProgressSimulator,
}

#[wasm_bindgen(js_class = "ProgressSimulator")]
impl Progress {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Progress {
        Progress {
            inner: ProgressSimulator::new(),
        }
    }

    pub fn start(&mut self) {
        self.inner.start();
    }

    #[wasm_bindgen(js_name = "lookupCompleted")]
    pub fn lookup_completed(&mut self) {
        self.inner.lookup_completed();
    }

    #[wasm_bindgen(js_name = "preloadResolved")]
    pub fn preload_resolved(&mut self) {
        self.inner.preload_resolved();
    }

    /// @param factor - `0.5 + Math.random()`
    /// @returns whole-number percentage to display
    pub fn tick(&mut self, factor: f64) -> u8 {
        self.inner.tick(factor);
        self.inner.display_percent()
    }

    #[wasm_bindgen(js_name = "holdElapsed")]
    pub fn hold_elapsed(&mut self) {
        self.inner.hold_elapsed();
    }

    /// One of `idle`, `running`, `catchup`, `holding`, `done`
    pub fn phase(&self) -> String {
        match self.inner.phase() {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Catchup => "catchup",
            Phase::Holding => "holding",
            Phase::Done => "done",
        }
        .to_string()
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}
