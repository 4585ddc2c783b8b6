use std::fmt;
use std::path::Path;

use super::ShaderError;

const SPRITE_VERTEX: &str = include_str!("../render/shaders/sprite.vert.wgsl");
const SPRITE_FRAGMENT: &str = include_str!("../render/shaders/sprite.frag.wgsl");

/// Pipeline stage a source is written for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn as_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// WGSL source text for one stage.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    /// Used in diagnostics and as the wgpu label.
    pub label: String,
    pub code: String,
}

impl ShaderSource {
    pub fn new(stage: ShaderStage, label: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            stage,
            label: label.into(),
            code: code.into(),
        }
    }

    /// Reads a WGSL file for `stage`.
    pub fn from_path(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let code = std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
            stage,
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("read {stage} shader {} ({} bytes)", path.display(), code.len());
        Ok(Self::new(stage, path.display().to_string(), code))
    }

    /// The embedded sprite shader for `stage`.
    pub fn builtin(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => Self::new(stage, "sprite.vert.wgsl", SPRITE_VERTEX),
            ShaderStage::Fragment => Self::new(stage, "sprite.frag.wgsl", SPRITE_FRAGMENT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.wgsl");
        std::fs::write(&path, SPRITE_FRAGMENT).unwrap();

        let src = ShaderSource::from_path(ShaderStage::Fragment, &path).unwrap();
        assert_eq!(src.stage, ShaderStage::Fragment);
        assert!(src.label.ends_with("custom.wgsl"));
        assert_eq!(src.code, SPRITE_FRAGMENT);
    }

    #[test]
    fn from_path_missing_file() {
        let err = ShaderSource::from_path(ShaderStage::Vertex, "nope/missing.wgsl").unwrap_err();
        assert!(matches!(err, ShaderError::Read { stage: ShaderStage::Vertex, .. }));
        assert!(err.to_string().starts_with("failed to read vertex shader"));
    }

    #[test]
    fn builtins_are_tagged_with_their_stage() {
        assert_eq!(ShaderSource::builtin(ShaderStage::Vertex).stage, ShaderStage::Vertex);
        assert!(ShaderSource::builtin(ShaderStage::Fragment).code.contains("@fragment"));
    }
}
