use approx::assert_abs_diff_eq;
use bellows_core::{
    AxisExtents, BellowsSpec, ConfigurationError, DrawCommand, PageSetup, PartCount, Recorder,
    Rgba, SegmentKind,
};
use bellows_layout::{
    AxisDescriptor, FoldSchedule, GenerateError, Generator, PanelLayout, TaperProfile, generate,
};

fn letter_spec() -> BellowsSpec {
    BellowsSpec {
        resolution: 300.0,
        max_length: 3307.0,
        align: 0.0,
        parts: PartCount::One,
        width: AxisExtents::straight(472.0, 591.0),
        height: AxisExtents::straight(472.0, 591.0),
    }
}

fn strokes(commands: &[DrawCommand]) -> usize {
    commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Stroke { .. }))
        .count()
}

#[test]
fn fold_rows_are_evenly_spaced_from_back_to_front() {
    let spec = letter_spec();
    let generator = Generator::new(spec, PageSetup::letter(300.0)).unwrap();
    let schedule = *generator.schedule();
    assert_abs_diff_eq!(schedule.pitch, 59.5);
    assert_eq!(schedule.fold_count, 55);
    assert_abs_diff_eq!(schedule.length, 3272.5);

    for panel in generator.panel_segments() {
        let mut ys: Vec<f64> = panel
            .iter()
            .filter(|s| s.kind != SegmentKind::Cut && s.from.y == s.to.y)
            .map(|s| s.from.y)
            .collect();
        ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(ys.len(), schedule.fold_count as usize - 1);

        let mut prev = -schedule.length / 2.0;
        for y in ys {
            assert_abs_diff_eq!(y - prev, schedule.pitch, epsilon = 1e-9);
            prev = y;
        }
        assert_abs_diff_eq!(schedule.length / 2.0 - prev, schedule.pitch, epsilon = 1e-9);

        let cut_ys: Vec<f64> = panel
            .iter()
            .filter(|s| s.kind == SegmentKind::Cut && s.from.y == s.to.y)
            .map(|s| s.from.y)
            .collect();
        assert_eq!(cut_ys, vec![-schedule.length / 2.0, schedule.length / 2.0]);
    }
}

#[test]
fn asymmetric_inner_width_tapers_monotonically() {
    let mut spec = letter_spec();
    spec.width.back_inner = 400.0;
    let schedule = FoldSchedule::derive(&spec.width, spec.max_length).unwrap();
    let profile = TaperProfile::new(spec.width.back_inner, spec.width.front_inner, schedule.length);

    let offsets: Vec<f64> = (1..=schedule.fold_count)
        .map(|i| profile.at(schedule.row(i)))
        .collect();
    assert!(offsets.iter().any(|t| *t != 0.0));
    // back narrower than front: the inner edge widens, so offsets grow more negative.
    assert!(offsets.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(*offsets.last().unwrap(), -36.0);

    let descriptor = AxisDescriptor::width(spec.width);
    let layout = PanelLayout::new(&descriptor, 1, spec.parts, &schedule);
    let valleys: Vec<_> = layout
        .fold_lines()
        .into_iter()
        .filter(|s| s.kind == SegmentKind::FoldAway)
        .collect();
    let widths: Vec<f64> = valleys.iter().map(|s| s.to.x - s.from.x).collect();
    assert!(widths.windows(2).all(|w| w[1] >= w[0]));
    assert!(widths.last().unwrap() > widths.first().unwrap());
}

#[test]
fn rendering_twice_is_identical() {
    let mut spec = letter_spec();
    spec.width = AxisExtents::new(472.0, 591.0, 520.0, 640.0);
    spec.parts = PartCount::Four;
    let generator = Generator::new(spec.clone(), PageSetup::letter(300.0)).unwrap();
    let first = generator.record();
    let second = Generator::new(spec, PageSetup::letter(300.0))
        .unwrap()
        .record();
    assert_eq!(first, second);
}

#[test]
fn full_page_command_counts() {
    let spec = letter_spec();
    let folds = 55usize;
    let commands = Generator::new(spec, PageSetup::letter(300.0))
        .unwrap()
        .record();

    assert!(matches!(
        commands[0],
        DrawCommand::FillRect {
            color: Rgba::WHITE,
            ..
        }
    ));
    let texts = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Text { .. }))
        .count();
    assert_eq!(texts, 3);

    // One-piece mode: 3 + 2 + 2 + 3 outline cuts, 3 legend samples.
    let dashed_per_panel = (folds - 1) + 2 * folds;
    assert_eq!(strokes(&commands), 3 + 10 + 4 * dashed_per_panel);
}

#[test]
fn legend_can_be_omitted() {
    let page = PageSetup {
        legend: false,
        ..PageSetup::letter(300.0)
    };
    let commands = Generator::new(letter_spec(), page).unwrap().record();
    assert!(
        !commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { .. }))
    );
}

#[test]
fn too_short_max_length_fails_before_drawing() {
    let mut spec = letter_spec();
    spec.max_length = 40.0;
    let mut recorder = Recorder::new();
    let err = generate(spec, PageSetup::letter(300.0), &mut recorder).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::Configuration(ConfigurationError::NoFolds { .. })
    ));
    assert!(recorder.commands().is_empty());
}

#[test]
fn panels_are_centered_on_the_page_before_rotation() {
    let commands = Generator::new(letter_spec(), PageSetup::letter(300.0))
        .unwrap()
        .record();
    // First panel stroke after the legend: W1 left edge at the page center shifted by
    // -backOuterW - backOuterH/2 - backOuterW/2.
    let first_panel_stroke = commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Stroke { points, .. } => Some(points[0]),
            _ => None,
        })
        .nth(3)
        .unwrap();
    assert_abs_diff_eq!(first_panel_stroke.x, 1275.0 - 591.0 - 295.5 - 295.5);
    assert_abs_diff_eq!(first_panel_stroke.y, 1650.0 - 3272.5 / 2.0);
}
