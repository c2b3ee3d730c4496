use bellows_core::{
    Affine, DrawingSurface, MM_PER_INCH, PendingPath, Point2, Rgba, SegmentKind, TextStyle,
};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DxfError {
    #[error("DXF export requires a positive resolution (got {0})")]
    InvalidResolution(f64),
    #[error("DXF write error: non-finite value for {what}")]
    NonFinite { what: &'static str },
}

/// Layer a stroke lands on, chosen by its palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Default,
    Cut,
    FoldAway,
    FoldToward,
    Legend,
}

impl Layer {
    const ALL: [Layer; 5] = [
        Layer::Default,
        Layer::Cut,
        Layer::FoldAway,
        Layer::FoldToward,
        Layer::Legend,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Layer::Default => "0",
            Layer::Cut => "CUT",
            Layer::FoldAway => "FOLD_AWAY",
            Layer::FoldToward => "FOLD_TOWARD",
            Layer::Legend => "LEGEND",
        }
    }

    fn for_color(color: Rgba) -> Self {
        match SegmentKind::from_color(color) {
            Some(SegmentKind::Cut) => Layer::Cut,
            Some(SegmentKind::FoldAway) => Layer::FoldAway,
            Some(SegmentKind::FoldToward) => Layer::FoldToward,
            None => Layer::Default,
        }
    }

    /// AutoCAD color index.
    const fn aci(self) -> u8 {
        match self {
            Layer::Default | Layer::Cut | Layer::Legend => 7,
            Layer::FoldAway => 5,
            Layer::FoldToward => 1,
        }
    }

    const fn linetype(self) -> &'static str {
        match self {
            Layer::FoldAway | Layer::FoldToward => "DASHED",
            _ => "CONTINUOUS",
        }
    }
}

#[derive(Debug, Clone)]
enum Entity {
    Line {
        layer: Layer,
        start: Point2,
        end: Point2,
    },
    Text {
        at: Point2,
        height: f64,
        rotation_deg: f64,
        text: String,
    },
}

/// Collects strokes and legend text as DXF entities in millimetres, Y up.
///
/// Background fills have no DXF counterpart and are skipped.
#[derive(Debug, Clone)]
pub struct DxfSurface {
    mm_per_dot: f64,
    page_height: f64,
    transform: Affine,
    path: PendingPath,
    dash: Option<[f64; 2]>,
    entities: Vec<Entity>,
}

impl DxfSurface {
    pub fn new(resolution: f64, page_height: f64) -> Result<Self, DxfError> {
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(DxfError::InvalidResolution(resolution));
        }
        if !page_height.is_finite() {
            return Err(DxfError::NonFinite { what: "page height" });
        }
        Ok(Self {
            mm_per_dot: MM_PER_INCH / resolution,
            page_height,
            transform: Affine::IDENTITY,
            path: PendingPath::default(),
            dash: None,
            entities: Vec::new(),
        })
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| matches!(e, Entity::Line { .. }))
            .count()
    }

    /// Page dots to DXF millimetres.
    fn to_model(&self, p: Point2) -> Point2 {
        Point2::new(
            p.x * self.mm_per_dot,
            (self.page_height - p.y) * self.mm_per_dot,
        )
    }

    fn stroke_path(&mut self, color: Rgba) {
        let layer = Layer::for_color(color);
        for points in self.path.take() {
            for pair in points.windows(2) {
                let start = self.to_model(pair[0]);
                let end = self.to_model(pair[1]);
                self.entities.push(Entity::Line { layer, start, end });
            }
        }
    }

    pub fn to_dxf_string(&self) -> Result<String, DxfError> {
        let mut out = String::new();
        push_pair(&mut out, 0, "SECTION");
        push_pair(&mut out, 2, "HEADER");
        push_pair(&mut out, 9, "$INSUNITS");
        push_pair(&mut out, 70, "4"); // millimeters
        push_pair(&mut out, 0, "ENDSEC");

        push_pair(&mut out, 0, "SECTION");
        push_pair(&mut out, 2, "TABLES");
        self.push_linetypes(&mut out)?;
        push_layers(&mut out);
        push_pair(&mut out, 0, "ENDSEC");

        push_pair(&mut out, 0, "SECTION");
        push_pair(&mut out, 2, "ENTITIES");
        for entity in &self.entities {
            match entity {
                Entity::Line { layer, start, end } => {
                    push_pair(&mut out, 0, "LINE");
                    push_pair(&mut out, 8, layer.name());
                    push_pair_f64(&mut out, 10, start.x)?;
                    push_pair_f64(&mut out, 20, start.y)?;
                    push_pair_f64(&mut out, 30, 0.0)?;
                    push_pair_f64(&mut out, 11, end.x)?;
                    push_pair_f64(&mut out, 21, end.y)?;
                    push_pair_f64(&mut out, 31, 0.0)?;
                }
                Entity::Text {
                    at,
                    height,
                    rotation_deg,
                    text,
                } => {
                    push_pair(&mut out, 0, "TEXT");
                    push_pair(&mut out, 8, Layer::Legend.name());
                    push_pair_f64(&mut out, 10, at.x)?;
                    push_pair_f64(&mut out, 20, at.y)?;
                    push_pair_f64(&mut out, 30, 0.0)?;
                    push_pair_f64(&mut out, 40, *height)?;
                    push_pair(&mut out, 1, text);
                    push_pair_f64(&mut out, 50, *rotation_deg)?;
                }
            }
        }
        push_pair(&mut out, 0, "ENDSEC");
        push_pair(&mut out, 0, "EOF");
        debug!(entities = self.entities.len(), "wrote DXF");
        Ok(out)
    }

    fn push_linetypes(&self, out: &mut String) -> Result<(), DxfError> {
        push_pair(out, 0, "TABLE");
        push_pair(out, 2, "LTYPE");
        push_pair(out, 70, "2");

        push_pair(out, 0, "LTYPE");
        push_pair(out, 2, "CONTINUOUS");
        push_pair(out, 70, "0");
        push_pair(out, 3, "Solid line");
        push_pair(out, 72, "65");
        push_pair(out, 73, "0");
        push_pair(out, 40, "0");

        // Fold pattern; the first dashed stroke decides it, 1 mm on / 0.5 mm off otherwise.
        let [on, off] = self
            .dash
            .map_or([1.0, 0.5], |[on, off]| [on * self.mm_per_dot, off * self.mm_per_dot]);
        push_pair(out, 0, "LTYPE");
        push_pair(out, 2, "DASHED");
        push_pair(out, 70, "0");
        push_pair(out, 3, "Fold line");
        push_pair(out, 72, "65");
        push_pair(out, 73, "2");
        push_pair_f64(out, 40, on + off)?;
        push_pair_f64(out, 49, on)?;
        push_pair_f64(out, 49, -off)?;

        push_pair(out, 0, "ENDTAB");
        Ok(())
    }
}

fn push_layers(out: &mut String) {
    push_pair(out, 0, "TABLE");
    push_pair(out, 2, "LAYER");
    push_pair(out, 70, Layer::ALL.len().to_string());
    for layer in Layer::ALL {
        push_pair(out, 0, "LAYER");
        push_pair(out, 2, layer.name());
        push_pair(out, 70, "0");
        push_pair(out, 62, layer.aci().to_string());
        push_pair(out, 6, layer.linetype());
    }
    push_pair(out, 0, "ENDTAB");
}

impl DrawingSurface for DxfSurface {
    type Error = DxfError;

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

    fn stroke(&mut self, color: Rgba) -> Result<(), DxfError> {
        self.stroke_path(color);
        Ok(())
    }

    fn stroke_dashed(&mut self, color: Rgba, dash: [f64; 2]) -> Result<(), DxfError> {
        if !(dash[0].is_finite() && dash[1].is_finite()) {
            return Err(DxfError::NonFinite { what: "dash" });
        }
        self.dash.get_or_insert(dash);
        self.stroke_path(color);
        Ok(())
    }

    fn fill_rect(&mut self, _: Point2, _: f64, _: f64, _: Rgba) -> Result<(), DxfError> {
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point2, style: &TextStyle) -> Result<(), DxfError> {
        let at = self.to_model(self.transform.apply(at));
        // Baseline direction on the page, mirrored into the Y-up model space.
        let mut rotation_deg = (-self.transform.b).atan2(self.transform.a).to_degrees();
        if rotation_deg.abs() < 1e-9 {
            rotation_deg = 0.0;
        }
        self.entities.push(Entity::Text {
            at,
            height: style.size * self.mm_per_dot,
            rotation_deg,
            text: text.to_string(),
        });
        Ok(())
    }
}

fn push_pair(out: &mut String, code: i32, value: impl AsRef<str>) {
    out.push_str(&code.to_string());
    out.push('\n');
    out.push_str(value.as_ref());
    out.push('\n');
}

fn push_pair_f64(out: &mut String, code: i32, value: f64) -> Result<(), DxfError> {
    if !value.is_finite() {
        return Err(DxfError::NonFinite { what: "float" });
    }
    let mut buf = ryu::Buffer::new();
    push_pair(out, code, buf.format(value));
    Ok(())
}
