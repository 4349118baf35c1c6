//! Vision label detection
//!
//! Client for the cloud vision `images:annotate` API and the ranking of
//! the returned label annotations.

mod client;

pub use client::{join_top_labels, GoogleVisionClient, LabelAnnotation, LabelDetector, MAX_LABELS};
