use serde::{Deserialize, Serialize};

/// Host-supplied drawable size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around the plot area for axes and labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    /// Fixed chart margin: room for the value axis on the left and the
    /// category labels below.
    pub const DEFAULT: Self = Self {
        top: 20.0,
        right: 0.0,
        bottom: 20.0,
        left: 60.0,
    };

    /// Plot-area width left over after margins, in pixels.
    #[must_use]
    pub fn inner_width(self, viewport: Viewport) -> f64 {
        f64::from(viewport.width) - self.left - self.right
    }

    #[must_use]
    pub fn inner_height(self, viewport: Viewport) -> f64 {
        f64::from(viewport.height) - self.top - self.bottom
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::DEFAULT
    }
}
