use std::time::Duration;

use boxplot_rs::api::{
    BoxPlotConfig, InitOptions, TickFormat, UpdateOptions, capabilities,
};
use boxplot_rs::interaction::HighlightPolicy;
use boxplot_rs::render::{Color, Easing};

#[test]
fn config_json_overrides_and_keeps_defaults() {
    let config = BoxPlotConfig::from_json(
        r#"{
            "whisker_factor": 3.0,
            "tick_format": "Auto",
            "transition_duration_ms": 250,
            "easing": "Linear",
            "highlight_policy": "Retain",
            "fill_color": {"red": 1.0, "green": 0.0, "blue": 0.0, "alpha": 1.0}
        }"#,
    )
    .expect("config json");

    assert_eq!(config.whisker_factor(), 3.0);
    assert_eq!(config.tick_format(), &TickFormat::Auto);
    assert_eq!(config.transition_duration(), Duration::from_millis(250));
    assert_eq!(config.easing(), Easing::Linear);
    assert_eq!(config.highlight_policy(), HighlightPolicy::Retain);
    assert_eq!(config.fill_color(), Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(config.stroke_color(), Color::BLACK);
    assert!(config.show_labels());
    assert_eq!(config.dimmed_opacity(), 0.3);
}

#[test]
fn config_json_is_validated() {
    assert!(BoxPlotConfig::from_json(r#"{"dimmed_opacity": 1.5}"#).is_err());
    assert!(BoxPlotConfig::from_json(r#"{"whisker_factor": -1.0}"#).is_err());
    assert!(BoxPlotConfig::from_json(r#"{"inner_padding": 1.0}"#).is_err());
    assert!(BoxPlotConfig::from_json(r#"{"tick_format": {"Fixed": {"precision": 40}}}"#).is_err());
    assert!(BoxPlotConfig::from_json("not json").is_err());
}

#[test]
fn default_config_round_trips_through_json() {
    let config = BoxPlotConfig::default();
    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"whisker_factor\": 1.5"));
    assert_eq!(BoxPlotConfig::from_json(&json).expect("parse"), config);
}

#[test]
fn custom_label_formatter_has_no_json_form() {
    let config = BoxPlotConfig::builder()
        .label_formatter(|value| format!("{value:.0}%"))
        .build()
        .expect("config");
    assert_eq!(config.tick_format().format(42.4, None), "42%");
    assert!(config.to_json_pretty().is_err());
}

#[test]
fn builder_rejects_invalid_settings() {
    assert!(BoxPlotConfig::builder().dimmed_opacity(-0.1).build().is_err());
    assert!(BoxPlotConfig::builder().whisker_factor(f64::NAN).build().is_err());
    assert!(BoxPlotConfig::builder().band_padding(0.5, -1.0).build().is_err());
    assert!(BoxPlotConfig::builder().label_font_size_px(0.0).build().is_err());
    assert!(BoxPlotConfig::builder().outlier_radius_px(-2.0).build().is_err());
    assert!(
        BoxPlotConfig::builder()
            .fill_color(Color::rgba(2.0, 0.0, 0.0, 1.0))
            .build()
            .is_err()
    );

    let config = BoxPlotConfig::builder()
        .band_padding(0.5, 0.0)
        .whisker_factor(0.0)
        .build()
        .expect("config");
    assert_eq!(config.inner_padding(), 0.5);
    assert_eq!(config.outer_padding(), 0.0);
    assert_eq!(config.whisker_factor(), 0.0);
}

#[test]
fn tick_format_fixed_precision() {
    assert_eq!(TickFormat::default().format(4.5, Some(1.0)), "4.50");
    assert_eq!(TickFormat::Fixed { precision: 0 }.format(4.4, None), "4");
}

#[test]
fn capabilities_describe_the_values_role_and_objects() {
    let caps = capabilities();
    assert_eq!(caps.data_roles.len(), 1);
    assert_eq!(caps.data_roles[0].name, "Values");
    assert_eq!(caps.table_mapping.role, "Values");
    assert!(caps.table_mapping.windowed_reduction);
    assert!(caps.object("general").is_some());
    assert!(caps.object("missing").is_none());

    let json = caps.to_json_pretty().expect("capabilities json");
    assert!(json.contains("\"formatString\""));
    assert!(json.contains("\"SolidColorFill\""));
}

#[test]
fn init_options_parse_from_json() {
    let options = InitOptions::from_json(
        r#"{"element_id": "chart", "viewport": {"width": 640, "height": 480}}"#,
    )
    .expect("init json");
    assert_eq!(options.element_id, "chart");
    assert_eq!(options.viewport.width, 640);
    assert!(InitOptions::from_json(r#"{"element_id": "chart"}"#).is_err());
}

#[test]
fn update_options_accept_null_cells_and_missing_data() {
    let options = UpdateOptions::from_json(
        r#"{
            "viewport": {"width": 400, "height": 300},
            "data": {
                "columns": [{"name": "A"}, {"name": "B"}],
                "rows": [[1.0, null], [2.0, 3.0]]
            }
        }"#,
    )
    .expect("update json");
    let data = options.data.as_ref().expect("data");
    assert_eq!(data.columns.len(), 2);
    assert_eq!(data.rows[0], vec![Some(1.0), None]);

    let json = options.to_json_pretty().expect("serialize");
    assert_eq!(UpdateOptions::from_json(&json).expect("reparse"), options);

    let bare = UpdateOptions::from_json(r#"{"viewport": {"width": 400, "height": 300}}"#)
        .expect("bare update json");
    assert!(bare.data.is_none());
}
