use approx::assert_relative_eq;
use boxplot_rs::ChartError;
use boxplot_rs::api::{
    BoxPlotConfig, ChartController, InitOptions, LifecycleState, SkipReason, UpdateOptions,
    UpdateOutcome,
};
use boxplot_rs::core::{BandScale, Column, DataTable, Viewport};
use boxplot_rs::render::Shape;
use boxplot_rs::render::NullRenderer;

fn viewport() -> Viewport {
    Viewport::new(400, 300)
}

fn sample_table() -> DataTable {
    DataTable::from_dense(
        ["A", "B"],
        vec![
            vec![1.0, 2.0],
            vec![2.0, 3.0],
            vec![3.0, 4.0],
            vec![4.0, 5.0],
            vec![5.0, 6.0],
        ],
    )
}

fn ready_controller() -> ChartController<NullRenderer> {
    let mut controller =
        ChartController::new(NullRenderer::default(), BoxPlotConfig::default()).expect("new");
    controller
        .initialize(InitOptions::new("chart", viewport()))
        .expect("initialize");
    controller
}

#[test]
fn lifecycle_walks_through_every_state() {
    let mut controller =
        ChartController::new(NullRenderer::default(), BoxPlotConfig::default()).expect("new");
    assert_eq!(controller.state(), LifecycleState::Uninitialized);

    controller
        .initialize(InitOptions::new("chart", viewport()))
        .expect("initialize");
    assert_eq!(controller.state(), LifecycleState::Initialized);
    assert_eq!(controller.surface().expect("surface").element_count(), 0);

    let outcome = controller.on_update(UpdateOptions::new(viewport(), sample_table()));
    assert!(outcome.is_rendered());
    assert_eq!(controller.state(), LifecycleState::Rendered);
    assert_eq!(controller.renderer().render_count, 1);

    controller.on_destroy().expect("destroy");
    assert_eq!(controller.state(), LifecycleState::Destroyed);
    assert!(controller.surface().is_none());
    assert!(controller.groups().is_empty());
    assert!(controller.entity_cache().is_empty());
}

#[test]
fn lifecycle_misuse_is_reported() {
    let mut controller =
        ChartController::new(NullRenderer::default(), BoxPlotConfig::default()).expect("new");
    assert_eq!(
        controller.on_update(UpdateOptions::new(viewport(), sample_table())),
        UpdateOutcome::Skipped(SkipReason::NotReady(LifecycleState::Uninitialized))
    );

    let err = controller
        .initialize(InitOptions::new("chart", Viewport::new(0, 300)))
        .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { width: 0, .. }));
    assert!(
        controller
            .initialize(InitOptions::new("  ", viewport()))
            .is_err()
    );

    controller
        .initialize(InitOptions::new("chart", viewport()))
        .expect("initialize");
    let err = controller
        .initialize(InitOptions::new("chart", viewport()))
        .expect_err("double initialize");
    assert!(matches!(
        err,
        ChartError::InvalidLifecycle {
            operation: "initialize",
            ..
        }
    ));

    controller.on_destroy().expect("destroy");
    assert!(controller.on_destroy().is_err());
    assert_eq!(
        controller.on_update(UpdateOptions::new(viewport(), sample_table())),
        UpdateOutcome::Skipped(SkipReason::NotReady(LifecycleState::Destroyed))
    );
}

#[test]
fn missing_data_leaves_surface_untouched() {
    let mut controller = ready_controller();
    controller.on_update(UpdateOptions::new(viewport(), sample_table()));
    let before = controller.surface().cloned();

    let outcome = controller.on_update(UpdateOptions::without_data(viewport()));
    assert_eq!(outcome, UpdateOutcome::Skipped(SkipReason::MissingData));
    assert_eq!(controller.surface().cloned(), before);
    assert_eq!(controller.renderer().render_count, 1);
    assert_eq!(controller.groups().len(), 2);
}

#[test]
fn empty_dataset_is_skipped() {
    let mut controller = ready_controller();
    let table = DataTable::new(vec![Column::new("A")], vec![vec![None], vec![None]]);

    let outcome = controller.on_update(UpdateOptions::new(viewport(), table));
    assert_eq!(outcome, UpdateOutcome::Skipped(SkipReason::EmptyDataset));
    assert_eq!(controller.state(), LifecycleState::Initialized);
    assert_eq!(controller.renderer().render_count, 0);
}

#[test]
fn viewports_without_plot_room_are_skipped() {
    let mut controller = ready_controller();
    assert_eq!(
        controller.on_update(UpdateOptions::new(Viewport::new(50, 300), sample_table())),
        UpdateOutcome::Skipped(SkipReason::ViewportTooSmall)
    );
    assert_eq!(
        controller.on_update(UpdateOptions::new(Viewport::new(400, 0), sample_table())),
        UpdateOutcome::Skipped(SkipReason::InvalidViewport)
    );
}

#[test]
fn repeated_identical_update_is_idempotent() {
    let mut controller = ready_controller();
    let first = controller
        .on_update(UpdateOptions::new(viewport(), sample_table()))
        .report()
        .expect("first report");
    assert!(first.entered > 0);
    assert_eq!(first.entities_entered, 2);
    let snapshot = controller.surface().cloned();

    let second = controller
        .on_update(UpdateOptions::new(viewport(), sample_table()))
        .report()
        .expect("second report");
    assert_eq!(second.entered, 0);
    assert_eq!(second.exited, 0);
    assert_eq!(second.updated, first.entered);
    assert_eq!(controller.surface().cloned(), snapshot);
}

#[test]
fn departed_groups_are_removed() {
    let mut controller = ready_controller();
    controller.on_update(UpdateOptions::new(viewport(), sample_table()));

    let only_a = DataTable::from_dense(["A"], vec![vec![1.0], vec![5.0]]);
    let report = controller
        .on_update(UpdateOptions::new(viewport(), only_a))
        .report()
        .expect("report");

    assert_eq!(report.entities_exited, 1);
    let surface = controller.surface().expect("surface");
    assert!(surface.entity("B").is_none());
    assert!(surface.entity("A").is_some());
    assert!(controller.entity_cache().get("B").is_none());
    assert_eq!(controller.groups().len(), 1);
}

#[test]
fn entities_follow_group_order() {
    let mut controller = ready_controller();
    controller.on_update(UpdateOptions::new(viewport(), sample_table()));

    let reordered = DataTable::from_dense(["B", "C", "A"], vec![vec![1.0, 2.0, 3.0]]);
    controller.on_update(UpdateOptions::new(viewport(), reordered));

    let names: Vec<&str> = controller
        .surface()
        .expect("surface")
        .entities()
        .map(|node| node.name())
        .collect();
    assert_eq!(names, vec!["B", "C", "A"]);
}

#[test]
fn chart_state_tracks_last_update() {
    let mut controller = ready_controller();
    controller.on_update(UpdateOptions::new(viewport(), sample_table()));

    let state = controller.chart_state().expect("chart state");
    assert_eq!(state.viewport, viewport());
    assert_eq!(state.global_min, Some(1.0));
    assert_eq!(state.global_max, Some(6.0));
    assert_eq!(state.margin.left, 60.0);
}

fn box_rect(controller: &ChartController<NullRenderer>, name: &str) -> (f64, f64, f64, f64) {
    let element = controller
        .surface()
        .and_then(|surface| surface.entity(name))
        .and_then(|node| node.element("box"))
        .expect("box element");
    match element.shape() {
        Shape::Rect {
            x,
            y,
            width,
            height,
        } => (*x, *y, *width, *height),
        other => panic!("unexpected box shape: {other:?}"),
    }
}

fn axis_baseline(controller: &ChartController<NullRenderer>, axis: &str) -> Shape {
    controller
        .surface()
        .and_then(|surface| surface.axis(axis))
        .and_then(|node| node.element("baseline"))
        .map(|element| element.shape().clone())
        .expect("baseline")
}

#[test]
fn subnormal_domain_renders_without_ticks() {
    let mut controller = ready_controller();
    let table = DataTable::from_dense(["A"], vec![vec![0.0], vec![5e-324]]);

    let outcome = controller.on_update(UpdateOptions::new(viewport(), table));
    assert!(outcome.is_rendered());
    let axis = controller
        .surface()
        .and_then(|surface| surface.axis("y-axis"))
        .expect("value axis");
    assert!(axis.elements().all(|element| !element.key().starts_with("tick")));
    assert!(controller.surface().expect("surface").validate().is_ok());
}

#[test]
fn extreme_finite_values_keep_boxes_visible() {
    let mut controller = ready_controller();
    let table = DataTable::from_dense(
        ["A", "B"],
        vec![vec![-1e308, 5e307], vec![-5e307, 1e308]],
    );

    assert!(
        controller
            .on_update(UpdateOptions::new(viewport(), table))
            .is_rendered()
    );
    let (_, a_y, _, a_height) = box_rect(&controller, "A");
    let (_, b_y, _, b_height) = box_rect(&controller, "B");
    assert!(a_height > 1.0 && b_height > 1.0);
    assert!(b_y < a_y);
    assert!(b_y >= 0.0 && a_y + a_height <= 260.0);

    let axis = controller
        .surface()
        .and_then(|surface| surface.axis("y-axis"))
        .expect("value axis");
    assert!(axis.elements().any(|element| element.key().starts_with("tick-")));
    assert_eq!(controller.renderer().render_count, 1);
}

#[test]
fn viewport_resize_moves_existing_elements() {
    let table = || {
        DataTable::from_dense(
            ["A", "B"],
            vec![
                vec![0.0, 4.0],
                vec![5.0, 6.0],
                vec![10.0, 8.0],
                vec![15.0, 10.0],
                vec![20.0, 12.0],
            ],
        )
    };
    let mut controller = ready_controller();
    controller.on_update(UpdateOptions::new(viewport(), table()));
    let (small_x, small_y, small_width, small_height) = box_rect(&controller, "A");
    assert_relative_eq!(small_y, 65.0, epsilon = 1e-9);
    assert_relative_eq!(small_height, 130.0, epsilon = 1e-9);

    let large = Viewport::new(800, 600);
    let report = controller
        .on_update(UpdateOptions::new(large, table()))
        .report()
        .expect("resized report");
    assert_eq!(report.entered, 0);
    assert_eq!(report.exited, 0);
    assert_eq!(report.entities_entered, 0);
    assert_eq!(report.entities_exited, 0);
    assert!(report.updated > 0);

    let bands = BandScale::new(&["A", "B"], 0.0, 740.0).expect("bands");
    let (x, y, width, height) = box_rect(&controller, "A");
    assert_relative_eq!(x, bands.band_start("A").expect("A"), epsilon = 1e-9);
    assert_relative_eq!(width, bands.band_width(), epsilon = 1e-9);
    assert_relative_eq!(y, 140.0, epsilon = 1e-9);
    assert_relative_eq!(height, 280.0, epsilon = 1e-9);
    assert!(x > small_x && width > small_width);

    assert_eq!(
        axis_baseline(&controller, "x-axis"),
        Shape::line(0.0, 560.0, 740.0, 560.0)
    );
    assert_eq!(
        axis_baseline(&controller, "y-axis"),
        Shape::line(0.0, 0.0, 0.0, 560.0)
    );
    assert_eq!(
        controller.surface().expect("surface").viewport(),
        large
    );
}
