//! Smoothie Mixer Core - browser-side smoothie lookup and ingredient normalization
//!
//! A user types a smoothie name; the controller queries the lookup endpoint,
//! cleans up the returned ingredient list against a reference dictionary and
//! writes the record into the page.
//!
//! # Architecture
//!
//! ```text
//! input → Lookup → LookupResult → tokenizer → Normalizer → Document
//!                       ↓
//!                 ImagePreloader ──┐
//!                                  ├→ progress choreography
//!            ProgressSimulator ────┘
//! ```
//!
//! The pure parts (`dictionary`, `tokenizer`, `text`, `progress`, `document`)
//! build for any target, including `wasm32-unknown-unknown`. Network, storage,
//! timers and the controller sit behind the default `client` feature.

pub mod dictionary;
pub mod document;
pub mod error;
pub mod progress;
pub mod text;
pub mod tokenizer;

#[cfg(feature = "client")]
pub mod config;
#[cfg(feature = "client")]
pub mod controller;
#[cfg(feature = "client")]
pub mod lookup;
#[cfg(feature = "client")]
pub mod preload;
#[cfg(feature = "client")]
pub mod storage;

pub use dictionary::{DictionarySource, Normalizer, ReferenceDictionary, ReferenceEntry};
pub use document::{Document, Page};
pub use error::{Error, Result};
pub use text::title_case_hyphen_join;
pub use tokenizer::{extract_tokens, prepare_ingredients};

#[cfg(feature = "client")]
pub use controller::{ControllerState, InputEvent, SubmissionController, SubmitOutcome};
#[cfg(feature = "client")]
pub use lookup::{HttpLookup, Lookup, LookupResult};
