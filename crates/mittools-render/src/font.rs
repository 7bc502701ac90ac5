// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font lookup for raster output. Configured files are tried first, then
// configured directories (matching the style against file names), then a
// short list of well-known system locations.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use mittools_core::config::RenderConfig;
use mittools_core::error::{MitToolsError, Result};
use mittools_core::{FontFamily, TextStyle};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const SANS_SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const SERIF_SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    "C:\\Windows\\Fonts\\times.ttf",
];

const MONO_SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Courier New.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Finds an `ab_glyph` font for a text style.
#[derive(Debug, Clone, Default)]
pub struct FontResolver {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
    system: bool,
}

impl FontResolver {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            files: config.font_files.clone(),
            dirs: config.font_dirs.clone(),
            system: config.system_fonts,
        }
    }

    /// Parse a font file.
    pub fn load(path: &Path) -> Result<FontVec> {
        let data = std::fs::read(path)?;
        FontVec::try_from_vec(data).map_err(|_| {
            MitToolsError::FontError(format!("failed to parse font file: {}", path.display()))
        })
    }

    /// First usable font for `style`, or `None` when every source fails.
    pub fn resolve(&self, style: &TextStyle) -> Option<FontVec> {
        for path in &self.files {
            match Self::load(path) {
                Ok(font) => {
                    info!(path = %path.display(), "Loaded configured font");
                    return Some(font);
                }
                Err(err) => warn!(path = %path.display(), error = %err, "Skipping font file"),
            }
        }

        for dir in &self.dirs {
            if let Some(font) = self.search_dir(dir, style) {
                return Some(font);
            }
        }

        if self.system {
            for path in system_candidates(&style.family) {
                if let Ok(font) = Self::load(Path::new(path)) {
                    info!(path, "Loaded system font");
                    return Some(font);
                }
            }
        }

        debug!(%style, "No font found");
        None
    }

    fn search_dir(&self, dir: &Path, style: &TextStyle) -> Option<FontVec> {
        let mut candidates: Vec<(u32, PathBuf)> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_font_file(e.path()))
            .map(|e| {
                let name = e.file_name().to_string_lossy().to_ascii_lowercase();
                (match_score(&name, style), e.into_path())
            })
            .filter(|(score, _)| *score > 0)
            .collect();

        // Highest score first; ties broken by path for a stable choice.
        candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        candidates
            .into_iter()
            .find_map(|(score, path)| match Self::load(&path) {
                Ok(font) => {
                    info!(path = %path.display(), score, "Loaded font from directory");
                    Some(font)
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Skipping font file");
                    None
                }
            })
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
}

fn system_candidates(family: &FontFamily) -> &'static [&'static str] {
    match family {
        FontFamily::Serif => SERIF_SYSTEM_FONTS,
        FontFamily::Monospace => MONO_SYSTEM_FONTS,
        FontFamily::Sans | FontFamily::Named(_) => SANS_SYSTEM_FONTS,
    }
}

/// How well a lowercase font file name matches a style. Zero means no match.
fn match_score(name: &str, style: &TextStyle) -> u32 {
    let family_hit = match &style.family {
        FontFamily::Named(family) => {
            let wanted: String = family
                .to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();
            let compact: String = name.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            compact.contains(&wanted)
        }
        FontFamily::Monospace => name.contains("mono") || name.contains("cour"),
        FontFamily::Serif => {
            (name.contains("serif") && !name.contains("sans")) || name.contains("times")
        }
        FontFamily::Sans => {
            (!name.contains("serif") && !name.contains("mono")) || name.contains("sans")
        }
    };
    if !family_hit {
        return 0;
    }

    let bold = name.contains("bold");
    let italic = name.contains("italic") || name.contains("oblique");
    let mut score = 1;
    if bold == style.bold {
        score += 2;
    }
    if italic == style.italic {
        score += 2;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(s: &str) -> TextStyle {
        s.parse().unwrap()
    }

    #[test]
    fn scores_prefer_matching_weight() {
        let bold = style("sans-bold");
        assert!(match_score("dejavusans-bold.ttf", &bold) > match_score("dejavusans.ttf", &bold));
        assert_eq!(match_score("dejavusansmono.ttf", &style("serif")), 0);
        assert!(match_score("dejavusansmono.ttf", &style("mono")) > 0);
    }

    #[test]
    fn named_family_matches_compacted_file_name() {
        let named = style("Noto Sans CJK JP");
        assert!(match_score("notosanscjkjp-regular.otf", &named) > 0);
        assert_eq!(match_score("dejavusans.ttf", &named), 0);
    }

    #[test]
    fn unreadable_sources_resolve_to_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken-Sans.ttf"), b"not a font").unwrap();

        let resolver = FontResolver {
            files: vec![dir.path().join("missing.ttf")],
            dirs: vec![dir.path().to_path_buf()],
            system: false,
        };
        assert!(resolver.resolve(&TextStyle::default()).is_none());
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.ttf");
        std::fs::write(&path, b"garbage").unwrap();
        assert!(matches!(FontResolver::load(&path), Err(MitToolsError::FontError(_))));
    }
}
