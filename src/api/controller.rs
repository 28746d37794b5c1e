use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    BandScale, DataTable, Group, LinearScale, Margin, Viewport, WhiskerFn, convert, tukey_whiskers,
};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{ChartPlugin, PluginEvent};
use crate::interaction::HighlightState;
use crate::render::{Renderer, Surface};

use super::axis_renderer::{AxisPass, render_axes, tick_count};
use super::box_renderer::{BoxPass, RenderReport, render_boxes};
use super::{BoxPlotConfig, EntityCache};

/// Host-visible lifecycle of a chart instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    Uninitialized,
    Initialized,
    Rendered,
    Destroyed,
}

impl LifecycleState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Rendered => "rendered",
            Self::Destroyed => "destroyed",
        }
    }

    fn accepts_updates(self) -> bool {
        matches!(self, Self::Initialized | Self::Rendered)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitOptions {
    pub element_id: String,
    pub viewport: Viewport,
}

impl InitOptions {
    #[must_use]
    pub fn new(element_id: impl Into<String>, viewport: Viewport) -> Self {
        Self {
            element_id: element_id.into(),
            viewport,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOptions {
    pub viewport: Viewport,
    #[serde(default)]
    pub data: Option<DataTable>,
}

impl UpdateOptions {
    #[must_use]
    pub fn new(viewport: Viewport, data: DataTable) -> Self {
        Self {
            viewport,
            data: Some(data),
        }
    }

    /// Update that carries no data view.
    #[must_use]
    pub fn without_data(viewport: Viewport) -> Self {
        Self {
            viewport,
            data: None,
        }
    }
}

/// Why an update left the surface untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotReady(LifecycleState),
    InvalidViewport,
    MissingData,
    EmptyDataset,
    /// The viewport leaves no room inside the fixed margin.
    ViewportTooSmall,
    InvalidScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Rendered(RenderReport),
    Skipped(SkipReason),
}

impl UpdateOutcome {
    #[must_use]
    pub fn is_rendered(self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    #[must_use]
    pub fn report(self) -> Option<RenderReport> {
        match self {
            Self::Rendered(report) => Some(report),
            Self::Skipped(_) => None,
        }
    }
}

/// State of the last successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub viewport: Viewport,
    pub margin: Margin,
    pub global_min: Option<f64>,
    pub global_max: Option<f64>,
    pub groups: Vec<Group>,
}

/// Box-plot visual driven by host lifecycle callbacks.
///
/// `ChartController` owns the retained surface, the per-entity rendering
/// memory and the highlight state, and hands every frame to `R`.
pub struct ChartController<R: Renderer> {
    pub(super) renderer: R,
    pub(super) config: BoxPlotConfig,
    pub(super) whiskers: WhiskerFn,
    pub(super) state: LifecycleState,
    pub(super) surface: Option<Surface>,
    pub(super) chart_state: Option<ChartState>,
    pub(super) cache: EntityCache,
    pub(super) highlight: HighlightState,
    pub(super) plugins: Vec<Box<dyn ChartPlugin>>,
}

impl<R: Renderer> ChartController<R> {
    pub fn new(renderer: R, config: BoxPlotConfig) -> ChartResult<Self> {
        config.validate()?;
        let whiskers = tukey_whiskers(config.whisker_factor());
        Ok(Self {
            renderer,
            config,
            whiskers,
            state: LifecycleState::Uninitialized,
            surface: None,
            chart_state: None,
            cache: EntityCache::new(),
            highlight: HighlightState::new(),
            plugins: Vec::new(),
        })
    }

    /// Replaces the whisker rule used by subsequent updates. The rule takes
    /// precedence over `whisker_factor` from the config.
    pub fn set_whisker_fn(&mut self, whiskers: WhiskerFn) {
        debug!("custom whisker rule installed");
        self.whiskers = whiskers;
    }

    pub fn initialize(&mut self, options: InitOptions) -> ChartResult<()> {
        if self.state != LifecycleState::Uninitialized {
            return Err(ChartError::InvalidLifecycle {
                operation: "initialize",
                state: self.state.as_str(),
            });
        }
        let InitOptions {
            element_id,
            viewport,
        } = options;
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if element_id.trim().is_empty() {
            return Err(ChartError::InvalidInput(
                "element id must not be empty".to_owned(),
            ));
        }

        debug!(
            element_id = %element_id,
            width = viewport.width,
            height = viewport.height,
            "chart initialized"
        );
        self.surface = Some(Surface::new(element_id, viewport, Margin::DEFAULT));
        self.state = LifecycleState::Initialized;
        self.emit_plugin_event(PluginEvent::Initialized);
        Ok(())
    }

    /// Runs conversion, scaling and reconciliation for new data.
    ///
    /// Never fails: anything that prevents drawing is reported as
    /// [`UpdateOutcome::Skipped`] and leaves the surface as it was.
    pub fn on_update(&mut self, options: UpdateOptions) -> UpdateOutcome {
        if !self.state.accepts_updates() {
            debug!(state = self.state.as_str(), "update ignored");
            return UpdateOutcome::Skipped(SkipReason::NotReady(self.state));
        }
        let UpdateOptions { viewport, data } = options;
        if !viewport.is_valid() {
            warn!(
                width = viewport.width,
                height = viewport.height,
                "update with invalid viewport skipped"
            );
            return UpdateOutcome::Skipped(SkipReason::InvalidViewport);
        }
        let Some(table) = data else {
            debug!("update without data skipped");
            return UpdateOutcome::Skipped(SkipReason::MissingData);
        };

        let conversion = convert(Some(&table), &self.whiskers);
        let Some((global_min, global_max)) = conversion.value_domain() else {
            debug!(columns = table.columns.len(), "empty dataset skipped");
            return UpdateOutcome::Skipped(SkipReason::EmptyDataset);
        };

        let margin = Margin::DEFAULT;
        let plot_width = margin.inner_width(viewport);
        let plot_height = margin.inner_height(viewport);
        if plot_width <= 0.0 || plot_height <= 0.0 {
            debug!(plot_width, plot_height, "viewport too small for margin");
            return UpdateOutcome::Skipped(SkipReason::ViewportTooSmall);
        }

        let bands = match BandScale::with_padding(
            &conversion.names(),
            0.0,
            plot_width,
            self.config.inner_padding(),
            self.config.outer_padding(),
        ) {
            Ok(bands) => bands,
            Err(err) => {
                warn!(error = %err, "band scale rejected; update skipped");
                return UpdateOutcome::Skipped(SkipReason::InvalidScale);
            }
        };
        let scale = match LinearScale::new(global_min, global_max, plot_height, 0.0) {
            Ok(scale) => scale,
            Err(err) => {
                warn!(error = %err, "value scale rejected; update skipped");
                return UpdateOutcome::Skipped(SkipReason::InvalidScale);
            }
        };

        let mut groups = conversion.groups;
        self.highlight.apply_policy(
            self.config.highlight_policy(),
            groups.iter().map(Group::name),
        );
        for group in &mut groups {
            group.highlighted = self.highlight.is_highlighted(group.name());
        }

        let ticks_wanted = tick_count(plot_height);
        let ticks = scale.ticks(ticks_wanted);
        let label_step = scale.tick_step(ticks_wanted);

        let Some(surface) = self.surface.as_mut() else {
            return UpdateOutcome::Skipped(SkipReason::NotReady(self.state));
        };
        surface.set_viewport(viewport);
        let mut report = render_boxes(
            surface,
            &mut self.cache,
            &groups,
            &BoxPass {
                bands: &bands,
                scale,
                config: &self.config,
                highlight: &self.highlight,
                label_step,
            },
        );
        report.absorb(render_axes(
            surface,
            &mut self.cache,
            &AxisPass {
                bands: &bands,
                scale,
                config: &self.config,
                ticks: &ticks,
                label_step,
            },
        ));
        surface.prune();

        debug!(
            groups = groups.len(),
            global_min,
            global_max,
            entered = report.entered,
            updated = report.updated,
            exited = report.exited,
            "chart updated"
        );
        let groups_len = groups.len();
        self.chart_state = Some(ChartState {
            viewport,
            margin,
            global_min: Some(global_min),
            global_max: Some(global_max),
            groups,
        });
        self.state = LifecycleState::Rendered;

        self.render_frame();
        self.emit_plugin_event(PluginEvent::DataUpdated { groups_len });
        self.emit_plugin_event(PluginEvent::Rendered);
        UpdateOutcome::Rendered(report)
    }

    /// Tears the chart down; later updates are ignored.
    pub fn on_destroy(&mut self) -> ChartResult<()> {
        if self.state == LifecycleState::Destroyed {
            return Err(ChartError::InvalidLifecycle {
                operation: "destroy",
                state: self.state.as_str(),
            });
        }
        self.state = LifecycleState::Destroyed;
        self.emit_plugin_event(PluginEvent::Destroyed);
        self.surface = None;
        self.chart_state = None;
        self.cache.clear();
        self.highlight.reset();
        self.plugins.clear();
        debug!("chart destroyed");
        Ok(())
    }

    /// Steps running transitions by `elapsed` and redraws.
    ///
    /// Returns `true` once nothing is left animating.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return true;
        };
        let was_animating = surface.is_animating();
        let settled = surface.advance(elapsed);
        trace!(elapsed_ms = elapsed.as_millis() as u64, settled, "transitions advanced");
        self.render_frame();
        if was_animating && settled {
            self.emit_plugin_event(PluginEvent::TransitionsSettled);
        }
        settled
    }

    /// Jumps every running transition to its end state and redraws.
    pub fn finish_transitions(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let was_animating = surface.is_animating();
        surface.finish_transitions();
        self.render_frame();
        if was_animating {
            self.emit_plugin_event(PluginEvent::TransitionsSettled);
        }
    }

    /// Hands the current surface to the backend. Backend failures are
    /// logged and absorbed.
    pub(super) fn render_frame(&mut self) -> bool {
        let Some(surface) = self.surface.as_ref() else {
            return false;
        };
        match self.renderer.render(surface) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "renderer failed; frame dropped");
                false
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &BoxPlotConfig {
        &self.config
    }

    /// Groups of the last rendered update, in drawing order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        self.chart_state
            .as_ref()
            .map(|state| state.groups.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn chart_state(&self) -> Option<&ChartState> {
        self.chart_state.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn entity_cache(&self) -> &EntityCache {
        &self.cache
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
