// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mittools-image — Image handling for mit-tools.
//
// Provides decoding of raw and encoded image buffers with normalisation to
// three-channel colour, filtered scaling, SHA-256 fingerprints of image files,
// and recursive discovery of images with their planned output paths.

pub mod finder;
pub mod integrity;
pub mod processor;

pub use finder::{ImageJob, find_images, output_path_for, plan_outputs};
pub use integrity::{file_digest, hash_bytes, hash_file, sha256_scale, verify_hash};
pub use processor::{ImageProcessor, MAX_PIXELS, scale_down};
