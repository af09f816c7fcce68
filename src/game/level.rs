//! Static platform geometry loaded from a level file.
//!
//! A level file is plain text: one platform per non-empty line, four
//! whitespace-separated numbers `x y w h` in world units. Blank lines and
//! lines starting with `#` are skipped.

use std::fs;
use std::path::Path;

use crate::error::GameError;
use crate::game::camera::Camera;
use crate::math::Rect;
use crate::renderer::DrawTarget;

/// Fill color for platform rectangles (RGBA).
const PLATFORM_COLOR: [f32; 4] = [0.31, 0.70, 0.40, 1.0];

/// The platform layout of one level.
#[derive(Debug, Clone)]
pub struct Level {
    platforms: Vec<Rect>,
}

impl Level {
    /// Loads a level from `path`.
    ///
    /// Safe to call any number of times with the same or different paths;
    /// this is what both session construction and live reload go through.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|err| GameError::load(path, err.to_string()))?;

        let mut platforms = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields = line
                .split_whitespace()
                .map(str::parse::<f32>)
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|err| {
                    GameError::load(path, format!("line {}: {err}", index + 1))
                })?;
            if fields.len() != 4 {
                return Err(GameError::load(
                    path,
                    format!("line {}: expected 4 fields, found {}", index + 1, fields.len()),
                ));
            }

            platforms.push(Rect::new(fields[0], fields[1], fields[2], fields[3]));
        }

        log::info!(
            "loaded {} platforms from '{}'",
            platforms.len(),
            path.display()
        );
        Ok(Self { platforms })
    }

    /// The platform rectangles, in file order.
    pub fn platforms(&self) -> &[Rect] {
        &self.platforms
    }

    /// Draws every platform through the camera transform.
    pub fn render(&self, target: &mut dyn DrawTarget, camera: &Camera) -> Result<(), GameError> {
        let viewport = target.size();
        for platform in &self.platforms {
            target.fill_rect(camera.to_screen(*platform, viewport), PLATFORM_COLOR)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn level_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write level");
        file
    }

    #[test]
    fn loads_platforms_and_skips_comments() {
        let file = level_file("# ground\n0 500 640 40\n\n100 400 120 20\n");
        let level = Level::load(file.path()).unwrap();
        assert_eq!(level.platforms().len(), 2);
        assert_eq!(level.platforms()[0], Rect::new(0.0, 500.0, 640.0, 40.0));
    }

    #[test]
    fn malformed_line_is_a_load_error() {
        let file = level_file("0 500 640 forty\n");
        let err = Level::load(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn wrong_field_count_is_a_load_error() {
        let file = level_file("0 500 640\n");
        let err = Level::load(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = Level::load("definitely/not/here.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }
}
