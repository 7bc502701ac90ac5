// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for mit-tools.

use thiserror::Error;

/// Top-level error type for all mit-tools operations.
#[derive(Debug, Error)]
pub enum MitToolsError {
    // -- Image errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("unsupported number of channels: {0}")]
    UnsupportedChannels(usize),

    #[error("image buffer has {actual} bytes, expected {expected}")]
    InvalidBuffer { expected: usize, actual: usize },

    #[error("image discovery failed: {0}")]
    FileDiscovery(String),

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- Rendering errors --
    #[error("no canvas: set a background or pass explicit output dimensions")]
    NoCanvas,

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("no font available for style {0}")]
    FontUnavailable(String),

    #[error("font could not be loaded: {0}")]
    FontError(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    // -- Translation errors --
    #[error("language does not exist: {0}")]
    UnknownLanguage(String),

    #[error("translator format wrong: {0}")]
    UnknownTranslator(String),

    #[error("translation failed: {0}")]
    Translation(String),

    #[error("translation backend unavailable: {0}")]
    BackendUnavailable(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MitToolsError>;
