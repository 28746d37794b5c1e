use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use boxplot_rs::ChartError;
use boxplot_rs::api::{BoxPlotConfig, ChartController, InitOptions, LifecycleState, UpdateOptions};
use boxplot_rs::core::{DataTable, Viewport};
use boxplot_rs::extensions::{ChartPlugin, PluginContext, PluginEvent};
use boxplot_rs::render::NullRenderer;

type Recorded = Rc<RefCell<Vec<(PluginEvent, PluginContext)>>>;

struct RecordingPlugin {
    id: String,
    events: Recorded,
}

impl RecordingPlugin {
    fn new(id: impl Into<String>, events: Recorded) -> Self {
        Self {
            id: id.into(),
            events,
        }
    }
}

impl ChartPlugin for RecordingPlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &PluginEvent, context: PluginContext) {
        self.events.borrow_mut().push((event.clone(), context));
    }
}

fn event_kind(event: &PluginEvent) -> &'static str {
    match event {
        PluginEvent::Initialized => "initialized",
        PluginEvent::DataUpdated { .. } => "data",
        PluginEvent::HighlightChanged { .. } => "highlight",
        PluginEvent::TransitionsSettled => "settled",
        PluginEvent::Rendered => "rendered",
        PluginEvent::Destroyed => "destroyed",
    }
}

fn viewport() -> Viewport {
    Viewport::new(400, 300)
}

fn table() -> DataTable {
    DataTable::from_dense(["A", "B"], vec![vec![1.0, 2.0], vec![3.0, 4.0]])
}

#[test]
fn plugin_receives_deterministic_event_sequence() {
    let config = BoxPlotConfig::builder()
        .transition_duration(Duration::from_millis(200))
        .build()
        .expect("config");
    let mut controller = ChartController::new(NullRenderer::default(), config).expect("new");
    let events: Recorded = Rc::new(RefCell::new(Vec::new()));
    controller
        .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
        .expect("register plugin");

    controller
        .initialize(InitOptions::new("chart", viewport()))
        .expect("initialize");
    controller.on_update(UpdateOptions::new(viewport(), table()));
    assert!(!controller.advance(Duration::from_millis(100)));
    assert!(controller.advance(Duration::from_millis(100)));
    controller.click_group("A").expect("click");
    controller.finish_transitions();
    controller.on_destroy().expect("destroy");

    let events = events.borrow();
    let kinds: Vec<&'static str> = events.iter().map(|(event, _)| event_kind(event)).collect();
    assert_eq!(
        kinds,
        vec![
            "initialized",
            "data",
            "rendered",
            "settled",
            "highlight",
            "settled",
            "destroyed"
        ]
    );

    assert_eq!(events[1].0, PluginEvent::DataUpdated { groups_len: 2 });
    assert_eq!(
        events[4].0,
        PluginEvent::HighlightChanged {
            name: "A".to_owned(),
            highlighted: true
        }
    );

    let context = events[4].1;
    assert_eq!(context.state, LifecycleState::Rendered);
    assert_eq!(context.groups_len, 2);
    assert_eq!(context.highlighted_len, 1);
    assert_eq!(context.value_domain, Some((1.0, 4.0)));
    assert_eq!(events[6].1.state, LifecycleState::Destroyed);
    assert_eq!(controller.plugin_count(), 0);
}

#[test]
fn plugin_ids_must_be_unique_and_non_empty() {
    let mut controller =
        ChartController::new(NullRenderer::default(), BoxPlotConfig::default()).expect("new");
    let events: Recorded = Rc::new(RefCell::new(Vec::new()));

    controller
        .register_plugin(Box::new(RecordingPlugin::new("one", events.clone())))
        .expect("register");
    assert!(
        controller
            .register_plugin(Box::new(RecordingPlugin::new("one", events.clone())))
            .is_err()
    );
    assert!(
        controller
            .register_plugin(Box::new(RecordingPlugin::new("", events.clone())))
            .is_err()
    );
    assert!(
        controller
            .register_plugin(Box::new(RecordingPlugin::new("  ", events.clone())))
            .is_err()
    );
    assert!(controller.has_plugin("one"));
    assert!(controller.unregister_plugin("one"));
    assert!(!controller.unregister_plugin("one"));
    assert_eq!(controller.plugin_count(), 0);
}

#[test]
fn destroyed_chart_rejects_new_plugins() {
    let mut controller =
        ChartController::new(NullRenderer::default(), BoxPlotConfig::default()).expect("new");
    controller
        .initialize(InitOptions::new("chart", viewport()))
        .expect("initialize");
    controller.on_destroy().expect("destroy");

    let events: Recorded = Rc::new(RefCell::new(Vec::new()));
    let err = controller
        .register_plugin(Box::new(RecordingPlugin::new("late", events)))
        .expect_err("destroyed chart");
    assert!(matches!(err, ChartError::InvalidLifecycle { .. }));
    assert_eq!(controller.plugin_count(), 0);
}
