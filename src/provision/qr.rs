//! QR Payload Rendering
//!
//! QR bitmap generation is an external concern; this module defines the
//! seam and ships an SVG data-URI implementation over the `qrcode` crate.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use super::{ProvisionError, ProvisionResult};

/// Renders a provisioning payload as a displayable image
pub trait QrRenderer {
    /// Render the payload, returning a data URI suitable for an `img` tag
    fn render(&self, payload: &str) -> ProvisionResult<String>;
}

/// SVG renderer producing a `data:image/svg+xml;base64,...` URI
pub struct SvgQrRenderer {
    /// Error correction level (default: M)
    pub ec_level: EcLevel,
    /// Minimum rendered dimensions in pixels
    pub min_size: u32,
}

impl Default for SvgQrRenderer {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::M,
            min_size: 200,
        }
    }
}

impl QrRenderer for SvgQrRenderer {
    fn render(&self, payload: &str) -> ProvisionResult<String> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), self.ec_level)
            .map_err(|e| ProvisionError::QrFailed(e.to_string()))?;

        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.min_size, self.min_size)
            .build();

        Ok(format!(
            "data:image/svg+xml;base64,{}",
            STANDARD.encode(image)
        ))
    }
}
