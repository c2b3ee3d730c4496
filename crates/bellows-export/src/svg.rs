use bellows_core::{
    Affine, DrawingSurface, MM_PER_INCH, PendingPath, Point2, Rgba, TextStyle, rect_corners,
};

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("SVG export requires a positive page size (got {width}x{height})")]
    EmptyPage { width: f64, height: f64 },
    #[error("SVG export requires a positive resolution (got {0})")]
    InvalidResolution(f64),
    #[error("SVG export got a non-finite coordinate for {what}")]
    NonFinite { what: &'static str },
}

/// Page-sized SVG document in dot units; the outer size is given in millimetres so the
/// file prints at the configured resolution.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    resolution: f64,
    transform: Affine,
    path: PendingPath,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64, resolution: f64) -> Result<Self, SvgError> {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(SvgError::EmptyPage { width, height });
        }
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(SvgError::InvalidResolution(resolution));
        }
        Ok(Self {
            width,
            height,
            resolution,
            transform: Affine::IDENTITY,
            path: PendingPath::default(),
            body: String::new(),
        })
    }

    #[must_use]
    pub fn finish(self) -> String {
        format!(
            "<svg width=\"{wm}mm\" height=\"{hm}mm\" viewBox=\"0 0 {w} {h}\" xmlns=\"http://www.w3.org/2000/svg\"><g stroke-width=\"1\" fill=\"none\">{body}</g></svg>",
            wm = fmt_num(self.width * MM_PER_INCH / self.resolution),
            hm = fmt_num(self.height * MM_PER_INCH / self.resolution),
            w = fmt_num(self.width),
            h = fmt_num(self.height),
            body = self.body
        )
    }

    fn stroke_path(&mut self, color: Rgba, dash: Option<[f64; 2]>) -> Result<(), SvgError> {
        for points in self.path.take() {
            let d = path_data(&points, false)?;
            self.body.push_str(&format!("<path d=\"{d}\" stroke=\"{}\"", svg_color(color)));
            push_opacity(&mut self.body, "stroke-opacity", color);
            if let Some([on, off]) = dash {
                self.body.push_str(&format!(
                    " stroke-dasharray=\"{} {}\"",
                    fmt_num(on),
                    fmt_num(off)
                ));
            }
            self.body.push_str("/>");
        }
        Ok(())
    }
}

impl DrawingSurface for SvgSurface {
    type Error = SvgError;

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

    fn stroke(&mut self, color: Rgba) -> Result<(), SvgError> {
        self.stroke_path(color, None)
    }

    fn stroke_dashed(&mut self, color: Rgba, dash: [f64; 2]) -> Result<(), SvgError> {
        self.stroke_path(color, Some(dash))
    }

    fn fill_rect(
        &mut self,
        origin: Point2,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), SvgError> {
        let corners = rect_corners(origin, width, height).map(|p| self.transform.apply(p));
        let d = path_data(&corners, true)?;
        self.body
            .push_str(&format!("<path d=\"{d}\" fill=\"{}\"", svg_color(color)));
        push_opacity(&mut self.body, "fill-opacity", color);
        self.body.push_str("/>");
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point2, style: &TextStyle) -> Result<(), SvgError> {
        let element = text_element(text, at, &self.transform, style)?;
        self.body.push_str(&element);
        Ok(())
    }
}

/// A `<text>` element placed by `transform`, with a generic sans-serif fallback family.
pub fn text_element(
    text: &str,
    at: Point2,
    transform: &Affine,
    style: &TextStyle,
) -> Result<String, SvgError> {
    if !at.is_finite() {
        return Err(SvgError::NonFinite { what: "text anchor" });
    }
    let m = transform.as_array();
    if m.iter().any(|v| !v.is_finite()) {
        return Err(SvgError::NonFinite { what: "transform" });
    }
    let matrix = m.map(fmt_num).join(" ");
    let mut out = format!(
        "<text x=\"{}\" y=\"{}\" transform=\"matrix({matrix})\" font-family=\"{}, sans-serif\" font-size=\"{}\" fill=\"{}\"",
        fmt_num(at.x),
        fmt_num(at.y),
        escape_xml(style.family),
        fmt_num(style.size),
        svg_color(style.color),
    );
    push_opacity(&mut out, "fill-opacity", style.color);
    out.push_str(&format!(">{}</text>", escape_xml(text)));
    Ok(out)
}

fn path_data(points: &[Point2], closed: bool) -> Result<String, SvgError> {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        if !p.is_finite() {
            return Err(SvgError::NonFinite { what: "path point" });
        }
        if i > 0 {
            d.push(' ');
        }
        let op = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{op} {} {}", fmt_num(p.x), fmt_num(p.y)));
    }
    if closed {
        d.push_str(" Z");
    }
    Ok(d)
}

fn svg_color(c: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

fn push_opacity(out: &mut String, attr: &str, c: Rgba) {
    if c.a != u8::MAX {
        out.push_str(&format!(" {attr}=\"{}\"", fmt_num(f64::from(c.a) / 255.0)));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn fmt_num(v: f64) -> String {
    let v = if v.abs() < 1e-9 { 0.0 } else { v };
    let mut buf = ryu::Buffer::new();
    let s = buf.format(v);
    s.strip_suffix(".0").unwrap_or(s).to_string()
}
