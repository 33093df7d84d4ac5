// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sparse, composable fixed-function state: toggle groups that only
//! overwrite what they mark changed, and the priority stack that resolves
//! overlapping overrides.

use std::collections::BTreeMap;

/// The vertex winding order that determines the front face of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrontFace {
    /// Counter-clockwise winding is the front face.
    #[default]
    Ccw,
    /// Clockwise winding is the front face.
    Cw,
}

/// The face culling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No faces are culled.
    #[default]
    None,
    /// Front-facing triangles are culled.
    Front,
    /// Back-facing triangles are culled.
    Back,
}

/// The rasterization mode for polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Polygons are filled.
    #[default]
    Fill,
    /// Polygon edges are drawn as lines.
    Line,
    /// Polygon vertices are drawn as points.
    Point,
}

/// A blend factor applied to the source or destination color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// Factor 0.
    Zero,
    /// Factor 1.
    One,
    /// The source color.
    SrcColor,
    /// One minus the source color.
    OneMinusSrcColor,
    /// The source alpha.
    SrcAlpha,
    /// One minus the source alpha.
    OneMinusSrcAlpha,
    /// The destination alpha.
    DstAlpha,
    /// One minus the destination alpha.
    OneMinusDstAlpha,
}

/// Depth test and write state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    /// Enables the depth test.
    pub test: bool,
    /// Enables writes to the depth buffer.
    pub write: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            test: false,
            write: true,
        }
    }
}

/// Polygon rasterization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolygonState {
    /// Enables face culling with the configured mode.
    pub cull: CullMode,
    /// The winding order that counts as front-facing.
    pub front_face: FrontFace,
    /// The rasterization mode.
    pub fill: FillMode,
}

/// Color blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    /// Enables blending.
    pub enable: bool,
    /// The factor applied to the fragment's color.
    pub src_factor: BlendFactor,
    /// The factor applied to the color already in the framebuffer.
    pub dst_factor: BlendFactor,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            enable: false,
            src_factor: BlendFactor::One,
            dst_factor: BlendFactor::Zero,
        }
    }
}

/// Scissor test state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScissorState {
    /// Enables the scissor test.
    pub enable: bool,
    /// The scissor rectangle as (x, y, width, height).
    pub rect: (u32, u32, u32, u32),
}

/// One toggle group: a state value plus the flag saying whether applying
/// the surrounding set touches this group at all.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Toggle<T> {
    /// If `false`, applying the set leaves the prior group value in place.
    pub do_change: bool,
    /// The group value applied when `do_change` is set.
    pub state: T,
}

impl<T> Toggle<T> {
    /// Creates a toggle that applies `state`.
    pub fn change(state: T) -> Self {
        Self {
            do_change: true,
            state,
        }
    }
}

/// A sparse bundle of fixed-function toggle groups.
///
/// Applying a bundle only mutates the groups it marks changed, so a root
/// set can establish defaults and per-draw overrides touch only the groups
/// they care about.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderStates {
    /// Depth test/write group.
    pub depth: Toggle<DepthState>,
    /// Polygon cull/winding/fill group.
    pub polygon: Toggle<PolygonState>,
    /// Blend group.
    pub blend: Toggle<BlendState>,
    /// Scissor group.
    pub scissor: Toggle<ScissorState>,
}

impl RenderStates {
    /// Returns `true` if any group is marked changed.
    pub fn has_changes(&self) -> bool {
        self.depth.do_change
            || self.polygon.do_change
            || self.blend.do_change
            || self.scissor.do_change
    }

    /// Overwrites the groups of `effective` this bundle marks changed.
    pub fn apply_to(&self, effective: &mut EffectiveStates) {
        if self.depth.do_change {
            effective.depth = self.depth.state;
        }
        if self.polygon.do_change {
            effective.polygon = self.polygon.state;
        }
        if self.blend.do_change {
            effective.blend = self.blend.state;
        }
        if self.scissor.do_change {
            effective.scissor = self.scissor.state;
        }
    }
}

/// Fully-resolved fixed-function state, as handed to a concrete backend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectiveStates {
    /// Resolved depth state.
    pub depth: DepthState,
    /// Resolved polygon state.
    pub polygon: PolygonState,
    /// Resolved blend state.
    pub blend: BlendState,
    /// Resolved scissor state.
    pub scissor: ScissorState,
}

/// A named, configurable render-state set.
///
/// A descriptor whose bundle marks no group changed is the *default state*:
/// pushing it through `use_states` clears every override at or below the
/// given priority instead of adding one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateSetDescriptor {
    /// The resource name, empty for ad-hoc sets.
    pub name: String,
    /// The toggle-group bundle.
    pub states: RenderStates,
}

impl StateSetDescriptor {
    /// Creates a descriptor with no changed groups.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: RenderStates::default(),
        }
    }

    /// Replaces the bundle, returning the descriptor for chaining.
    pub fn with_states(mut self, states: RenderStates) -> Self {
        self.states = states;
        self
    }
}

/// The per-backend stack of active state overrides.
///
/// Overrides compose over the baseline defaults in ascending priority
/// order, so a group changed at a higher priority wins over the same group
/// changed below it. At equal priority, the most recent `use` replaces the
/// previous one.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    overrides: BTreeMap<u32, RenderStates>,
}

impl StateStack {
    /// Creates a stack with no active overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `states` at `priority`, or clears when `states` marks no
    /// group changed (the default-state idiom): clearing removes every
    /// override at or below `priority`, restoring whatever was effective
    /// before those overrides were pushed.
    pub fn apply(&mut self, states: &RenderStates, priority: u32) {
        if states.has_changes() {
            self.overrides.insert(priority, *states);
        } else {
            self.overrides.retain(|&p, _| p > priority);
        }
    }

    /// Resolves the effective state: baseline defaults, then the active
    /// overrides in ascending priority, then the draw's transient override.
    pub fn effective(&self, transient: Option<&RenderStates>) -> EffectiveStates {
        let mut effective = EffectiveStates::default();
        for states in self.overrides.values() {
            states.apply_to(&mut effective);
        }
        if let Some(states) = transient {
            states.apply_to(&mut effective);
        }
        effective
    }

    /// Returns `true` if no overrides are active.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
