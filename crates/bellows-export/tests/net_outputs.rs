use bellows_core::{AxisExtents, BellowsSpec, PageSetup, PartCount};
use bellows_export::{DxfSurface, SvgSurface};
use bellows_layout::Generator;

fn letter() -> Generator {
    let spec = BellowsSpec {
        resolution: 300.0,
        max_length: 3307.0,
        align: 0.0,
        parts: PartCount::One,
        width: AxisExtents::straight(472.0, 591.0),
        height: AxisExtents::straight(472.0, 591.0),
    };
    Generator::new(spec, PageSetup::letter(300.0)).unwrap()
}

// 3 legend samples, 10 outline cuts and 54 + 110 fold lines per panel.
const STROKES: usize = 3 + 10 + 4 * 164;

#[test]
fn svg_has_one_path_per_stroke_plus_background() {
    let generator = letter();
    let mut svg = SvgSurface::new(2550.0, 3300.0, 300.0).unwrap();
    generator.render(&mut svg).unwrap();
    let out = svg.finish();

    assert!(out.starts_with("<svg width=\""));
    assert!(out.contains("viewBox=\"0 0 2550 3300\""));
    assert!(out.ends_with("</g></svg>"));
    assert_eq!(out.matches("<path ").count(), STROKES + 1);
    assert_eq!(out.matches("<text ").count(), 3);
    assert_eq!(out.matches("stroke-dasharray=").count(), 2 + 4 * 164);
    assert!(out.contains(">Fold toward</text>"));
    assert!(out.contains("fill=\"#ffffff\""));
}

#[test]
fn dxf_puts_every_stroke_on_a_palette_layer() {
    let generator = letter();
    let mut dxf = DxfSurface::new(300.0, 3300.0).unwrap();
    generator.render(&mut dxf).unwrap();
    assert_eq!(dxf.line_count(), STROKES);

    let out = dxf.to_dxf_string().unwrap();
    assert_eq!(out.matches("0\nLINE\n8\nCUT\n").count(), 11);
    assert_eq!(out.matches("0\nTEXT\n").count(), 3);
    assert_eq!(out.matches("0\nLINE\n8\n0\n").count(), 0);
    assert!(out.starts_with("0\nSECTION\n2\nHEADER\n9\n$INSUNITS\n70\n4\n"));
}

#[test]
fn split_nets_add_cut_edges() {
    let spec = BellowsSpec {
        parts: PartCount::Four,
        ..letter().spec().clone()
    };
    let generator = Generator::new(spec, PageSetup::letter(300.0)).unwrap();
    let mut one = DxfSurface::new(300.0, 3300.0).unwrap();
    letter().render(&mut one).unwrap();
    let mut four = DxfSurface::new(300.0, 3300.0).unwrap();
    generator.render(&mut four).unwrap();

    let cuts = |s: &DxfSurface| {
        s.to_dxf_string()
            .unwrap()
            .matches("0\nLINE\n8\nCUT\n")
            .count()
    };
    assert!(cuts(&four) > cuts(&one));
}
