use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Plate {0} has no image asset")]
    NoImage(u32),

    #[error("Asset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_messages() {
        assert_eq!(AssetError::NoImage(4).to_string(), "Plate 4 has no image asset");
        assert_eq!(
            AssetError::NotFound(PathBuf::from("plates/4.png")).to_string(),
            "Asset not found: plates/4.png"
        );
    }

    #[test]
    fn test_render_error_unsupported_dimensions() {
        let error = RenderError::UnsupportedDimensions {
            width: 0,
            height: 0,
        };
        assert_eq!(error.to_string(), "Unsupported dimensions: 0x0");
    }
}
