// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image discovery — recursive search for image files and planning of the
// output path each one is written to.

use std::path::{Path, PathBuf};

use mittools_core::error::MitToolsError;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

/// An input image paired with the path its result is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Recursively collect files under `root` whose extension is in `file_types`.
///
/// Extensions are compared case-insensitively against the text after the
/// last `.`; names without a `.` never match. `root` may itself be a file.
#[instrument(skip(file_types), fields(root = %root.display()))]
pub fn find_images(root: &Path, file_types: &[&str]) -> Result<Vec<PathBuf>, MitToolsError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry =
            entry.map_err(|err| MitToolsError::FileDiscovery(format!("Failed to get entry: {}", err)))?;
        let name = entry.file_name().to_str().unwrap_or("");
        if entry.file_type().is_file() && has_image_extension(name, file_types) {
            found.push(entry.into_path());
        }
    }
    found.sort();
    debug!(count = found.len(), "Images found");
    Ok(found)
}

/// Compute where the result for `file` goes.
///
/// * `root` that is a file is replaced by its parent directory.
/// * Without `output_dir` the results go to a sibling of `root` named
///   `<root>-output`.
/// * When several files were found, each keeps its path relative to `root`.
/// * For a single file, an `output_dir` whose name has no `.` is treated as a
///   directory and the file is named `<stem>-output.<ext>` inside it;
///   otherwise `output_dir` is the output file itself.
/// * `ending` replaces the extension.
pub fn output_path_for(
    root: &Path,
    file: &Path,
    output_dir: Option<&Path>,
    multiple: bool,
    ending: Option<&str>,
) -> Result<PathBuf, MitToolsError> {
    let root = if root.is_file() {
        root.parent().unwrap_or(Path::new("."))
    } else {
        root
    };
    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_dir(root));
    let relative = file
        .strip_prefix(root)
        .map_err(|err| MitToolsError::FileDiscovery(format!("Failed to strip prefix: {}", err)))?;

    let mut result = if multiple {
        output_dir.join(relative)
    } else {
        match output_dir.file_name().and_then(|n| n.to_str()) {
            Some(name) if !name.contains('.') => {
                let target = output_dir.join(relative);
                let stem = target
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("")
                    .to_string();
                let renamed = match target.extension().and_then(|e| e.to_str()) {
                    Some(ext) => format!("{stem}-output.{ext}"),
                    None => format!("{stem}-output"),
                };
                target.with_file_name(renamed)
            }
            _ => output_dir,
        }
    };

    if let Some(ending) = ending {
        result.set_extension(ending);
    }
    Ok(result)
}

/// Find every image under `root` and plan its output.
///
/// Jobs whose output already exists are skipped; the parent directory of
/// every remaining output is created.
#[instrument(skip(file_types), fields(root = %root.display()))]
pub fn plan_outputs(
    root: &Path,
    output_dir: Option<&Path>,
    file_types: &[&str],
    ending: Option<&str>,
) -> Result<Vec<ImageJob>, MitToolsError> {
    let files = find_images(root, file_types)?;
    let multiple = files.len() != 1;

    let mut jobs = Vec::with_capacity(files.len());
    for input in files {
        let output = output_path_for(root, &input, output_dir, multiple, ending)?;
        if output.exists() {
            info!(output = %output.display(), "Skipping because it already exists");
            continue;
        }
        std::fs::create_dir_all(output.parent().unwrap_or(Path::new(".")))
            .map_err(|err| MitToolsError::FileDiscovery(format!("Failed to create dir: {}", err)))?;
        jobs.push(ImageJob { input, output });
    }
    info!(jobs = jobs.len(), "Output plan ready");
    Ok(jobs)
}

/// `<root>-output`, built from the last component of `root`.
fn default_output_dir(root: &Path) -> PathBuf {
    let mut parts: Vec<String> = root
        .iter()
        .map(|part| part.to_str().unwrap_or("").to_string())
        .collect();
    let last = parts.pop().unwrap_or_else(|| "unknown_file".to_string());
    parts.push(format!("{last}-output"));
    PathBuf::from_iter(parts)
}

fn has_image_extension(name: &str, file_types: &[&str]) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_lowercase();
            file_types.iter().any(|t| t.eq_ignore_ascii_case(&ext))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPES: &[&str] = &["png", "jpg"];

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn extension_matching() {
        assert!(has_image_extension("a.PNG", TYPES));
        assert!(has_image_extension("archive.tar.jpg", TYPES));
        assert!(!has_image_extension("png", TYPES));
        assert!(!has_image_extension("notes.txt", TYPES));
    }

    #[test]
    fn finds_images_recursively_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.png"));
        touch(&dir.path().join("nested/a.JPG"));
        touch(&dir.path().join("nested/readme.md"));

        let found = find_images(dir.path(), TYPES).unwrap();
        assert_eq!(
            found,
            vec![dir.path().join("b.png"), dir.path().join("nested/a.JPG")]
        );
    }

    #[test]
    fn default_output_dir_is_a_sibling() {
        assert_eq!(
            default_output_dir(Path::new("/data/scans")),
            PathBuf::from("/data/scans-output")
        );
        assert_eq!(default_output_dir(Path::new("")), PathBuf::from("unknown_file-output"));
    }

    #[test]
    fn multiple_files_keep_relative_layout() {
        let out = output_path_for(
            Path::new("/data/in"),
            Path::new("/data/in/ch1/p1.png"),
            Some(Path::new("/data/out")),
            true,
            None,
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("/data/out/ch1/p1.png"));
    }

    #[test]
    fn single_file_into_directory_gets_suffix() {
        let out = output_path_for(
            Path::new("/data/in"),
            Path::new("/data/in/p1.png"),
            Some(Path::new("/data/out")),
            false,
            Some("webp"),
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("/data/out/p1-output.webp"));
    }

    #[test]
    fn single_file_with_file_target() {
        let out = output_path_for(
            Path::new("/data/in"),
            Path::new("/data/in/p1.png"),
            Some(Path::new("/data/result.png")),
            false,
            None,
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("/data/result.png"));
    }

    #[test]
    fn file_outside_root_is_rejected() {
        let result = output_path_for(
            Path::new("/data/in"),
            Path::new("/elsewhere/p1.png"),
            None,
            true,
            None,
        );
        assert!(matches!(result, Err(MitToolsError::FileDiscovery(_))));
    }

    #[test]
    fn plan_skips_existing_outputs_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        touch(&input.join("a.png"));
        touch(&input.join("deep/b.png"));
        touch(&output.join("a.png"));

        let jobs = plan_outputs(&input, Some(&output), TYPES, None).unwrap();

        assert_eq!(
            jobs,
            vec![ImageJob {
                input: input.join("deep/b.png"),
                output: output.join("deep/b.png"),
            }]
        );
        assert!(output.join("deep").is_dir());
    }

    #[test]
    fn plan_for_a_single_file_root() {
        // The default output directory name must not contain a '.'.
        let dir = tempfile::Builder::new().prefix("scans").tempdir().unwrap();
        let file = dir.path().join("page.png");
        touch(&file);

        let jobs = plan_outputs(&file, None, TYPES, None).unwrap();

        let expected_dir = default_output_dir(dir.path());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].output, expected_dir.join("page-output.png"));
    }
}
