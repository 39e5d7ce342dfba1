//! Animated hierarchical treemap and sunburst layouts.
//!
//! Flat label/parent rows become a [`Tree`], values are aggregated
//! bottom-up, the subtree under the current entry is partitioned into
//! rectangles or ring segments, and every change of entry, depth or data
//! is bridged by a [`TransitionPlan`] the caller samples once per frame.

pub mod aggregate;
pub mod animation;
pub mod chart;
pub mod config;
pub mod error;
pub mod event;
pub mod hierarchy;
pub mod hit;
pub mod interaction;
pub mod layout;
pub mod text;
pub mod transition;

pub use aggregate::{aggregate, ValueMode};
pub use animation::Animation;
pub use chart::{Chart, TraceData};
pub use config::ChartConfig;
pub use error::{Diagnostics, HierarchyError, TraceError, ValueInconsistency};
pub use event::{ClickHandler, HoverInfo, Notification};
pub use hierarchy::{HierarchyBuilder, IdValue, NodeIdx, Tree, ROOT_KEY};
pub use hit::hit_test;
pub use interaction::{Interaction, InteractionState};
pub use layout::{
    layout, Arc, Extent, FamilyConfig, FamilyKind, LayoutOptions, Packing, PartitionFamily,
    PositionedNode, PositionedTree, Rect, Viewport,
};
pub use text::{CellMeasure, MonospaceMeasure, TextMeasure, TextPosition, TextTransform};
pub use transition::{
    interpolate, Easing, FrameNode, Phase, PrevLookup, TransitionConfig, TransitionContext,
    TransitionPlan,
};
