//! Pipeline stages for a summaize session.
//!
//! Each submodule implements exactly one step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ pdf | ocr | (utf-8) | article ──▶ normalize ──▶ llm
//! (path/URL)     (format-specific)            (cleanup)    (chat model)
//! ```
//!
//! 1. [`input`]     — classify the argument and dispatch on file extension
//! 2. [`pdf`]       — pdfium text layer; runs in `spawn_blocking`
//! 3. [`ocr`]       — decode the image, then Tesseract or a vision model
//! 4. [`article`]   — fetch a web page and keep its readable text
//! 5. [`normalize`] — deterministic whitespace / invisible-char cleanup
//! 6. [`llm`]       — provider resolution and the single chat call

pub mod article;
pub mod input;
pub mod llm;
pub mod normalize;
pub mod ocr;
pub mod pdf;
