//! Label rendering and export adapters.
//!
//! - [`QrCodeRenderer`] implements [`CodeRenderer`] with the `qrcode` crate:
//!   dense unicode blocks for terminals, SVG for exported labels.
//! - [`sink`] holds the file-system [`LabelSink`] and the directory-based
//!   permission check the CLI uses in place of a gallery prompt.
//!
//! # Exported SVG layout
//!
//! ```text
//! ┌──────────────┐
//! │   QR code    │  side = (modules + 8) × module_px
//! │              │
//! ├──────────────┤
//! │ Main 10 - 4B │  caption band, only when an address line is shown
//! └──────────────┘
//! ```
//!
//! [`LabelSink`]: crate::application::export_label::LabelSink

pub mod sink;

use qrcode::render::{svg, unicode};
use qrcode::QrCode;

use crate::application::export_label::{CodeRenderer, LabelError};

/// Quiet-zone width in modules on each side of a normal QR code.
const QUIET_ZONE_MODULES: u32 = 4;

/// Height of the caption band under the code, in pixels.
const CAPTION_BAND_PX: u32 = 48;

/// Renders QR codes with the `qrcode` crate.
#[derive(Debug, Clone)]
pub struct QrCodeRenderer {
    /// Target side length of the SVG code in pixels (rounded down to whole modules).
    size_px: u32,
}

impl Default for QrCodeRenderer {
    fn default() -> Self {
        Self::new(320)
    }
}

impl QrCodeRenderer {
    pub fn new(size_px: u32) -> Self {
        Self { size_px }
    }

    fn encode(data: &str) -> Result<QrCode, LabelError> {
        QrCode::new(data.as_bytes()).map_err(|e| LabelError::Encode(e.to_string()))
    }
}

impl CodeRenderer for QrCodeRenderer {
    fn render_text(&self, data: &str) -> Result<String, LabelError> {
        let code = Self::encode(data)?;
        Ok(code.render::<unicode::Dense1x2>().build())
    }

    fn render_svg(&self, data: &str, caption: Option<&str>) -> Result<String, LabelError> {
        let code = Self::encode(data)?;

        let modules = code.width() as u32 + 2 * QUIET_ZONE_MODULES;
        let module_px = (self.size_px / modules).max(1);
        let side = modules * module_px;

        let qr_svg = code
            .render::<svg::Color>()
            .quiet_zone(true)
            .module_dimensions(module_px, module_px)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();
        // Drop the XML prolog so the code can be nested inside the label.
        let qr_element = qr_svg
            .find("<svg")
            .map_or(qr_svg.as_str(), |start| &qr_svg[start..]);

        let Some(caption) = caption.filter(|c| !c.is_empty()) else {
            return Ok(format!(
                "<?xml version=\"1.0\" standalone=\"yes\"?>\
                 <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
                 width=\"{side}\" height=\"{side}\">{qr_element}</svg>"
            ));
        };

        let height = side + CAPTION_BAND_PX;
        let text_x = side / 2;
        let text_y = side + CAPTION_BAND_PX * 2 / 3;
        Ok(format!(
            "<?xml version=\"1.0\" standalone=\"yes\"?>\
             <svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" \
             width=\"{side}\" height=\"{height}\">\
             <rect width=\"{side}\" height=\"{height}\" fill=\"#ffffff\"/>\
             {qr_element}\
             <text x=\"{text_x}\" y=\"{text_y}\" text-anchor=\"middle\" \
             font-family=\"sans-serif\" font-size=\"20\">{}</text></svg>",
            escape_xml(caption)
        ))
    }
}

/// Escapes the five XML special characters.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_render_is_multiline() {
        let qr = QrCodeRenderer::default()
            .render_text("https://wa.me/5491112345678")
            .unwrap();
        assert!(!qr.is_empty());
        assert!(qr.contains('\n'));
    }

    #[test]
    fn test_svg_without_caption_has_single_prolog() {
        let svg = QrCodeRenderer::default()
            .render_svg("tel:+5491112345678", None)
            .unwrap();
        assert!(svg.starts_with("<?xml"));
        assert_eq!(svg.matches("<?xml").count(), 1);
        assert!(!svg.contains("<text"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_with_caption_escapes_text() {
        let svg = QrCodeRenderer::default()
            .render_svg("tel:+5491112345678", Some("Main 10 - <B&C>"))
            .unwrap();
        assert!(svg.contains("<text"));
        assert!(svg.contains("Main 10 - &lt;B&amp;C&gt;"));
    }

    #[test]
    fn test_payload_too_large_is_encode_error() {
        let huge = "9".repeat(10_000);
        let result = QrCodeRenderer::default().render_text(&huge);
        assert!(matches!(result, Err(LabelError::Encode(_))));
    }

    #[test]
    fn test_tiny_size_still_renders_one_pixel_modules() {
        let svg = QrCodeRenderer::new(1).render_svg("https://qring.app", None).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_escape_xml_leaves_plain_text_untouched() {
        assert_eq!(escape_xml("Av. Corrientes 1234"), "Av. Corrientes 1234");
        assert_eq!(escape_xml("O'Higgins"), "O&apos;Higgins");
    }
}
