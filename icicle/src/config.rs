//! Chart configuration types.

use crate::aggregate::ValueMode;
use crate::layout::{FamilyConfig, LayoutOptions, MarkerPad, Packing, TilingConfig};
use crate::text::TextPosition;
use crate::transition::TransitionConfig;

/// Already-coerced options for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub layout: LayoutOptions,

    /// How values aggregate. `None` picks [`ValueMode::Remainder`] when the
    /// data carries values and [`ValueMode::CountLeaves`] otherwise.
    pub value_mode: Option<ValueMode>,

    /// Id of the initial entry (`None` = hierarchy root).
    pub level: Option<String>,

    /// When false, pointer events are ignored entirely.
    pub hover_enabled: bool,

    pub transition: TransitionConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            value_mode: None,
            level: None,
            hover_enabled: true,
            transition: TransitionConfig::default(),
        }
    }
}

impl ChartConfig {
    pub fn treemap() -> Self {
        Self::default()
    }

    pub fn sunburst() -> Self {
        Self::default().family(FamilyConfig::sunburst())
    }

    pub fn family(mut self, family: FamilyConfig) -> Self {
        self.layout.family = family;
        self
    }

    /// Levels shown, including the entry.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.layout.max_depth = Some(max_depth);
        self
    }

    pub fn value_mode(mut self, mode: ValueMode) -> Self {
        self.value_mode = Some(mode);
        self
    }

    pub fn level(mut self, id: impl Into<String>) -> Self {
        self.level = Some(id.into());
        self
    }

    pub fn font_size(mut self, font_size: f64) -> Self {
        self.layout.font_size = font_size;
        self
    }

    pub fn text_position(mut self, position: TextPosition) -> Self {
        self.layout.text_position = position;
        self
    }

    pub fn text_pad(mut self, pad: f64) -> Self {
        self.layout.text_pad = pad;
        self
    }

    pub fn hover_enabled(mut self, enabled: bool) -> Self {
        self.hover_enabled = enabled;
        self
    }

    pub fn transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = transition;
        self
    }

    /// Replace the tiling of a treemap; no effect on a sunburst.
    pub fn tiling(mut self, tiling: TilingConfig) -> Self {
        if let FamilyConfig::Treemap { tiling: current, .. } = &mut self.layout.family {
            *current = tiling;
        }
        self
    }

    /// Shorthand for the tiling packing of a treemap.
    pub fn packing(self, packing: Packing) -> Self {
        let tiling = match &self.layout.family {
            FamilyConfig::Treemap { tiling, .. } => tiling.packing(packing),
            FamilyConfig::Sunburst { .. } => return self,
        };
        self.tiling(tiling)
    }

    /// Replace the marker padding of a treemap; no effect on a sunburst.
    pub fn marker_pad(mut self, pad: MarkerPad) -> Self {
        if let FamilyConfig::Treemap { marker_pad, .. } = &mut self.layout.family {
            *marker_pad = pad;
        }
        self
    }

    /// Angular gap between sunburst siblings; no effect on a treemap.
    pub fn angular_pad(mut self, radians: f64) -> Self {
        if let FamilyConfig::Sunburst { pad } = &mut self.layout.family {
            *pad = radians;
        }
        self
    }
}
