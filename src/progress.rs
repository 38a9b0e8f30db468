//! Progress-callback trait for session events.
//!
//! Inject an [`Arc<dyn SessionProgressCallback>`] via
//! [`crate::config::SummaizeConfigBuilder::progress_callback`] to be told when
//! extraction and analysis start and finish. The CLI drives its spinner from
//! these events; library callers can forward them anywhere.
//!
//! # Example
//!
//! ```rust
//! use summaize::{SessionProgressCallback, SummaizeConfig};
//! use std::sync::Arc;
//!
//! struct Announce;
//!
//! impl SessionProgressCallback for Announce {
//!     fn on_analysis_start(&self, model: &str, text_chars: usize) {
//!         eprintln!("Analyzing {text_chars} chars with {model}...");
//!     }
//! }
//!
//! let config = SummaizeConfig::builder()
//!     .progress_callback(Arc::new(Announce))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the session as it moves through its steps.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SessionProgressCallback: Send + Sync {
    /// Called before text extraction begins.
    ///
    /// # Arguments
    /// * `source` — file name or URL being processed
    fn on_extraction_start(&self, source: &str) {
        let _ = source;
    }

    /// Called once text has been extracted.
    ///
    /// # Arguments
    /// * `source` — file name or URL
    /// * `chars`  — number of characters extracted
    fn on_extraction_complete(&self, source: &str, chars: usize) {
        let _ = (source, chars);
    }

    /// Called just before the chat model is invoked.
    fn on_analysis_start(&self, model: &str, text_chars: usize) {
        let _ = (model, text_chars);
    }

    /// Called when the model has answered.
    ///
    /// # Arguments
    /// * `split` — whether the response contained the bias marker
    fn on_analysis_complete(&self, split: bool) {
        let _ = split;
    }

    /// Called when any step fails.
    fn on_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SessionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaizeConfig`].
pub type ProgressCallback = Arc<dyn SessionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        extracted_chars: AtomicUsize,
        analyses: AtomicUsize,
        errors: Mutex<Vec<String>>,
    }

    impl SessionProgressCallback for TrackingCallback {
        fn on_extraction_complete(&self, _source: &str, chars: usize) {
            self.extracted_chars.store(chars, Ordering::SeqCst);
        }

        fn on_analysis_complete(&self, _split: bool) {
            self.analyses.fetch_add(1, Ordering::SeqCst);
        }

        fn on_error(&self, error: &str) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start("a.pdf");
        cb.on_extraction_complete("a.pdf", 10);
        cb.on_analysis_start("gpt-4o", 10);
        cb.on_analysis_complete(true);
        cb.on_error("boom");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_extraction_start("notes.txt");
        tracker.on_extraction_complete("notes.txt", 42);
        tracker.on_analysis_complete(false);
        tracker.on_error("LLM error");

        assert_eq!(tracker.extracted_chars.load(Ordering::SeqCst), 42);
        assert_eq!(tracker.analyses.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.lock().unwrap().as_slice(), ["LLM error"]);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_analysis_start("gpt-4o", 2000);
    }
}
