//! Raster output: a tiny-skia drawing surface, PNG encoding and `data:` URIs.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bellows_core::{Affine, DrawingSurface, PendingPath, Point2, Rgba, TextStyle, rect_corners};
use bellows_export::{SvgError, text_element};
use bellows_layout::Generator;
use resvg::usvg;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash, Transform};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to create pixmap with dimensions {width}x{height}")]
    PixmapCreation { width: f64, height: f64 },
    #[error("invalid dash pattern {on}/{off}")]
    InvalidDash { on: f64, off: f64 },
    #[error("text layout error: {0}")]
    Text(#[from] SvgError),
    #[error("text rendering error: {0}")]
    TextRender(#[from] usvg::Error),
    #[error("PNG encoding error: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// Canvas line width in dots.
const LINE_WIDTH: f32 = 1.0;

/// Drawing surface backed by an RGBA pixmap, one pixel per dot.
pub struct PixmapSurface {
    pixmap: Pixmap,
    transform: Affine,
    path: PendingPath,
    /// Loaded on the first `fill_text`.
    fonts: Option<Arc<usvg::fontdb::Database>>,
}

impl PixmapSurface {
    pub fn new(width: f64, height: f64) -> Result<Self, RasterError> {
        let err = RasterError::PixmapCreation { width, height };
        if !(width.is_finite() && height.is_finite() && width >= 1.0 && height >= 1.0) {
            return Err(err);
        }
        let pixmap = Pixmap::new(width.round() as u32, height.round() as u32).ok_or(err)?;
        debug!(
            width = pixmap.width(),
            height = pixmap.height(),
            "allocated pixmap"
        );
        Ok(Self {
            pixmap,
            transform: Affine::IDENTITY,
            path: PendingPath::default(),
            fonts: None,
        })
    }

    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    #[must_use]
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        encode_png(&self.pixmap)
    }

    fn stroke_path(&mut self, color: Rgba, dash: Option<[f64; 2]>) -> Result<(), RasterError> {
        let mut stroke = Stroke {
            width: LINE_WIDTH,
            ..Default::default()
        };
        if let Some([on, off]) = dash {
            stroke.dash = Some(
                StrokeDash::new(vec![on as f32, off as f32], 0.0)
                    .ok_or(RasterError::InvalidDash { on, off })?,
            );
        }
        let paint = paint(color);
        for points in self.path.take() {
            if let Some(path) = build_path(&points, false) {
                self.pixmap
                    .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        Ok(())
    }
}

impl DrawingSurface for PixmapSurface {
    type Error = RasterError;

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform.rotate(radians);
    }

    fn move_to(&mut self, p: Point2) {
        self.path.move_to(self.transform.apply(p));
    }

    fn line_to(&mut self, p: Point2) {
        self.path.line_to(self.transform.apply(p));
    }

    fn stroke(&mut self, color: Rgba) -> Result<(), RasterError> {
        self.stroke_path(color, None)
    }

    fn stroke_dashed(&mut self, color: Rgba, dash: [f64; 2]) -> Result<(), RasterError> {
        self.stroke_path(color, Some(dash))
    }

    fn fill_rect(
        &mut self,
        origin: Point2,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), RasterError> {
        let corners = rect_corners(origin, width, height).map(|p| self.transform.apply(p));
        if let Some(path) = build_path(&corners, true) {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
        Ok(())
    }

    /// Text is laid out by resvg from a one-element SVG the size of the pixmap, using the
    /// system font database.
    fn fill_text(&mut self, text: &str, at: Point2, style: &TextStyle) -> Result<(), RasterError> {
        let element = text_element(text, at, &self.transform, style)?;
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">{element}</svg>",
            w = self.pixmap.width(),
            h = self.pixmap.height(),
        );
        let fontdb = self.fonts.get_or_insert_with(system_fonts).clone();
        let opt = usvg::Options {
            fontdb,
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opt)?;
        resvg::render(&tree, Transform::identity(), &mut self.pixmap.as_mut());
        Ok(())
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn build_path(points: &[Point2], closed: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

fn system_fonts() -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    // Route the sans-serif fallback to whatever is installed when Arial is not.
    let has_arial = db
        .faces()
        .any(|face| face.families.iter().any(|(name, _)| name == "Arial"));
    if !has_arial {
        let fallback = db
            .faces()
            .next()
            .and_then(|face| face.families.first().map(|(name, _)| name.clone()));
        match fallback {
            Some(name) => db.set_sans_serif_family(name),
            None => warn!("no system fonts found; legend text will be missing"),
        }
    }
    debug!(faces = db.len(), "loaded system fonts");
    Arc::new(db)
}

pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RasterError> {
    use image::{ImageBuffer, Rgba};

    let width = pixmap.width();
    let height = pixmap.height();
    let data = pixmap.data();

    // tiny-skia uses premultiplied alpha, convert to straight alpha
    let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let idx = (y * width + x) as usize * 4;
        let r = data[idx];
        let g = data[idx + 1];
        let b = data[idx + 2];
        let a = data[idx + 3];

        let (r, g, b) = if a == 0 {
            (0, 0, 0)
        } else if a == 255 {
            (r, g, b)
        } else {
            let af = a as f32 / 255.0;
            (
                (r as f32 / af).min(255.0) as u8,
                (g as f32 / af).min(255.0) as u8,
                (b as f32 / af).min(255.0) as u8,
            )
        };

        *pixel = Rgba([r, g, b, a]);
    }

    let mut buf = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buf);
    img.write_to(&mut cursor, image::ImageFormat::Png)?;
    Ok(buf)
}

/// `data:image/png;base64,...` for embedding a PNG in HTML or CSS.
#[must_use]
pub fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Draw `generator` onto a page-sized pixmap.
pub fn render(generator: &Generator) -> Result<PixmapSurface, RasterError> {
    let page = generator.page();
    let mut surface = PixmapSurface::new(page.width, page.height)?;
    generator.render(&mut surface)?;
    Ok(surface)
}

/// Render and encode as PNG.
pub fn render_png(generator: &Generator) -> Result<Vec<u8>, RasterError> {
    render(generator)?.encode_png()
}

/// Render, encode and wrap as a `data:` URI.
pub fn render_data_uri(generator: &Generator) -> Result<String, RasterError> {
    Ok(data_uri(&render_png(generator)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bellows_core::{Segment, SegmentKind};

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn white(width: f64, height: f64) -> PixmapSurface {
        let mut s = PixmapSurface::new(width, height).unwrap();
        s.fill_rect(Point2::new(0.0, 0.0), width, height, Rgba::WHITE)
            .unwrap();
        s
    }

    #[test]
    fn zero_sized_pixmap_is_rejected() {
        assert!(matches!(
            PixmapSurface::new(0.0, 10.0),
            Err(RasterError::PixmapCreation { .. })
        ));
        assert!(matches!(
            PixmapSurface::new(f64::NAN, 10.0),
            Err(RasterError::PixmapCreation { .. })
        ));
    }

    #[test]
    fn background_fill_covers_the_page() {
        let s = white(8.0, 8.0);
        let px = s.pixmap().pixel(7, 7).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 255, 255, 255));
    }

    #[test]
    fn cut_line_is_painted_black() {
        let mut s = white(20.0, 20.0);
        s.translate(0.0, 5.0);
        let seg = Segment::cut(Point2::new(0.0, 0.5), Point2::new(20.0, 0.5));
        s.draw_segment(&seg, [3.0, 1.0]).unwrap();
        let on = s.pixmap().pixel(10, 5).unwrap();
        assert!(on.red() < 16 && on.green() < 16 && on.blue() < 16);
        let off = s.pixmap().pixel(10, 12).unwrap();
        assert_eq!(off.red(), 255);
    }

    #[test]
    fn fold_line_is_dashed() {
        let mut s = white(40.0, 10.0);
        let seg = Segment::new(
            SegmentKind::FoldAway,
            Point2::new(0.0, 4.5),
            Point2::new(40.0, 4.5),
        );
        s.draw_segment(&seg, [4.0, 4.0]).unwrap();
        let dash = s.pixmap().pixel(1, 4).unwrap();
        assert!(dash.blue() > 200 && dash.red() < 16);
        let gap = s.pixmap().pixel(6, 4).unwrap();
        assert_eq!((gap.red(), gap.blue()), (255, 255));
    }

    #[test]
    fn negative_dash_is_an_error() {
        let mut s = white(10.0, 10.0);
        s.move_to(Point2::new(0.0, 0.0));
        s.line_to(Point2::new(5.0, 0.0));
        assert!(matches!(
            s.stroke_dashed(Rgba::RED, [-1.0, 1.0]),
            Err(RasterError::InvalidDash { .. })
        ));
    }

    #[test]
    fn text_renders_without_error() {
        let mut s = white(200.0, 60.0);
        s.fill_text("Cut lines", Point2::new(10.0, 40.0), &TextStyle::default())
            .unwrap();
        assert!(s.fonts.is_some());
    }

    #[test]
    fn png_and_data_uri() {
        let png = white(4.0, 4.0).encode_png().unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);

        let uri = data_uri(&png);
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
        let decoded = STANDARD
            .decode(uri.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        assert_eq!(decoded, png);
    }
}
