use bellows_core::{DrawingSurface, Point2, Segment, SegmentKind, TextStyle};

/// Gap between a legend label's baseline and its sample line.
const SAMPLE_DROP: f64 = 10.0;

/// Line-style key in the top-left corner of the page, in page coordinates.
///
/// Rows start half an inch in and are a sixth of an inch apart; each sample line is
/// half an inch long.
pub fn draw_legend<S: DrawingSurface>(
    surface: &mut S,
    resolution: f64,
    dash: [f64; 2],
) -> Result<(), S::Error> {
    let left = resolution / 2.0;
    let style = TextStyle::default();
    let rows = [
        (SegmentKind::Cut, 0.0),
        (SegmentKind::FoldAway, resolution / 6.0),
        (SegmentKind::FoldToward, resolution / 3.0),
    ];
    for (kind, drop) in rows {
        let baseline = resolution / 2.0 + drop;
        surface.fill_text(kind.label(), Point2::new(left, baseline), &style)?;
        let sample = Segment::new(
            kind,
            Point2::new(left, baseline + SAMPLE_DROP),
            Point2::new(resolution, baseline + SAMPLE_DROP),
        );
        surface.draw_segment(&sample, dash)?;
    }
    Ok(())
}
