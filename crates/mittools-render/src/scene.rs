// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scene files — a whole composition described in TOML:
//
//     style = "serif bold"
//     vertical = false
//     background = "page.png"
//
//     [[blocks]]
//     text = "Hello"
//     rect = [10.0, 10.0, 200.0, 40.0]
//     font_size = 24.0
//     alignment = "center"
//     foreground = "#202020"
//     background = "white"
//     draw_background = true

use std::path::{Path, PathBuf};

use mittools_core::config::RenderConfig;
use mittools_core::error::{MitToolsError, Result};
use mittools_core::{Alignment, Color, Rect, TextColors};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::block::TextBlock;
use crate::renderer::Renderer;

fn default_style() -> String {
    "sans".into()
}

fn default_alignment() -> String {
    "top left".into()
}

/// A composition loaded from a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub vertical: bool,
    /// Background image; relative paths resolve against the scene file.
    #[serde(default)]
    pub background: Option<PathBuf>,
    #[serde(default)]
    pub blocks: Vec<SceneBlock>,
}

/// One text block of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBlock {
    pub text: String,
    /// `[x, y, width, height]` in canvas pixels.
    pub rect: [f32; 4],
    pub font_size: f32,
    #[serde(default = "default_alignment")]
    pub alignment: String,
    #[serde(default = "default_foreground")]
    pub foreground: Color,
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(default)]
    pub draw_background: bool,
}

fn default_foreground() -> Color {
    Color::BLACK
}

impl SceneBlock {
    pub fn to_block(&self) -> Result<TextBlock> {
        let alignment: Alignment = self.alignment.parse()?;
        let mut block = TextBlock::new(self.text.clone(), Rect::from(self.rect), self.font_size);
        block.alignment = alignment;
        block.colors = TextColors::from((self.foreground, self.background));
        block.draw_background = self.draw_background;
        Ok(block)
    }
}

impl Scene {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Read a scene file, resolving its background path against the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            MitToolsError::Config(format!("reading scene {}: {}", path.display(), err))
        })?;
        let mut scene = Self::from_toml_str(&raw)?;
        if let (Some(bg), Some(dir)) = (&scene.background, path.parent()) {
            if bg.is_relative() {
                scene.background = Some(dir.join(bg));
            }
        }
        info!(path = %path.display(), blocks = scene.blocks.len(), "Scene loaded");
        Ok(scene)
    }
}

impl Renderer {
    /// Build a renderer holding the scene's background and blocks.
    pub fn from_scene(scene: &Scene, config: RenderConfig) -> Result<Self> {
        let mut renderer = Renderer::new(&scene.style, scene.vertical)?.with_config(config);
        if let Some(bg) = &scene.background {
            renderer.set_background_file(bg)?;
        }
        for block in &scene.blocks {
            renderer.add_block(block.to_block()?)?;
        }
        Ok(renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mittools_core::{HorizontalAlign, VerticalAlign};

    const SCENE: &str = r##"
style = "serif bold"
vertical = false
background = "page.png"

[[blocks]]
text = "Hello"
rect = [10.0, 10.0, 200.0, 40.0]
font_size = 24.0
alignment = "center"
foreground = "#202020"
background = "white"
draw_background = true

[[blocks]]
text = "footer"
rect = [0, 80, 100, 20]
font_size = 10
"##;

    #[test]
    fn parses_blocks_with_defaults() {
        let scene = Scene::from_toml_str(SCENE).unwrap();
        assert_eq!(scene.style, "serif bold");
        assert_eq!(scene.blocks.len(), 2);

        let first = scene.blocks[0].to_block().unwrap();
        assert_eq!(first.alignment, Alignment::centered());
        assert_eq!(first.colors.foreground, Color::rgb(0x20, 0x20, 0x20));
        assert_eq!(first.fill(), Some(Color::WHITE));

        let second = scene.blocks[1].to_block().unwrap();
        assert_eq!(
            second.alignment,
            Alignment::new(HorizontalAlign::Left, VerticalAlign::Top)
        );
        assert_eq!(second.colors.foreground, Color::BLACK);
        assert_eq!(second.fill(), None);
    }

    #[test]
    fn load_resolves_background_relative_to_scene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, SCENE).unwrap();

        let scene = Scene::load(&path).unwrap();
        assert_eq!(scene.background, Some(dir.path().join("page.png")));
    }

    #[test]
    fn from_scene_loads_background_and_blocks() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(120, 100)
            .save(dir.path().join("page.png"))
            .unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, SCENE).unwrap();

        let scene = Scene::load(&path).unwrap();
        let renderer = Renderer::from_scene(&scene, RenderConfig::default()).unwrap();
        assert_eq!(renderer.blocks().len(), 2);
        assert_eq!(renderer.canvas_size(None).unwrap(), (120, 100));
        assert!(renderer.style().bold);
    }

    #[test]
    fn bad_alignment_is_reported() {
        let raw = r#"
[[blocks]]
text = "x"
rect = [0, 0, 10, 10]
font_size = 5
alignment = "sideways"
"#;
        let scene = Scene::from_toml_str(raw).unwrap();
        let renderer = Renderer::from_scene(&scene, RenderConfig::default());
        assert!(matches!(renderer, Err(MitToolsError::InvalidArgument(_))));
    }
}
