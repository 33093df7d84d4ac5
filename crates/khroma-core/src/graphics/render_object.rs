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

//! The render object: the named aggregate of one geometry, one shader, and
//! the variable-set variants drawn from it.

use crate::graphics::state::RenderStates;
use crate::graphics::variable::VariableSet;

/// A named aggregate linking one geometry and one shader by name, carrying
/// optional state overrides and an ordered list of draw variants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderObjectDescriptor {
    /// The resource name draws are issued against.
    pub name: String,
    geometry: String,
    shader: String,
    state_overrides: Vec<RenderStates>,
    variable_sets: Vec<VariableSet>,
}

impl RenderObjectDescriptor {
    /// Creates an empty render object.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Links the geometry resource with `name`.
    pub fn link_geometry(&mut self, name: impl Into<String>) -> &mut Self {
        self.geometry = name.into();
        self
    }

    /// Links the shader resource with `name`.
    pub fn link_shader(&mut self, name: impl Into<String>) -> &mut Self {
        self.shader = name.into();
        self
    }

    /// Appends a render-state override owned by this object.
    pub fn add_state_override(&mut self, states: RenderStates) -> &mut Self {
        self.state_overrides.push(states);
        self
    }

    /// Appends a variable set; its position is the variant index draws
    /// select through [`RenderDetail::varset`].
    pub fn add_variable_set(&mut self, set: VariableSet) -> &mut Self {
        self.variable_sets.push(set);
        self
    }

    /// Returns the linked geometry name.
    pub fn geometry(&self) -> &str {
        &self.geometry
    }

    /// Returns the linked shader name.
    pub fn shader(&self) -> &str {
        &self.shader
    }

    /// Returns the owned state overrides.
    pub fn state_overrides(&self) -> &[RenderStates] {
        &self.state_overrides
    }

    /// Returns the variable set at `index`, if any.
    pub fn variable_set(&self, index: usize) -> Option<&VariableSet> {
        self.variable_sets.get(index)
    }

    /// Returns the number of draw variants this object owns.
    pub fn variable_set_count(&self) -> usize {
        self.variable_sets.len()
    }

    /// Visits every variable set in variant order, passing its index.
    ///
    /// This is the per-frame mutation hook: the dispatch loop rewrites
    /// frame-dependent variables here, then re-pushes the object with an
    /// `update`.
    pub fn for_each_variable_set(&mut self, mut f: impl FnMut(usize, &mut VariableSet)) {
        for (i, set) in self.variable_sets.iter_mut().enumerate() {
            f(i, set);
        }
    }
}

/// Per-draw parameters: where to start, how much to draw, which variant,
/// and an optional transient state override for just this draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderDetail {
    /// The first index to draw from.
    pub start: usize,
    /// The number of indices to draw; `None` draws to the end.
    pub num_elems: Option<usize>,
    /// The variable-set index selecting the draw variant.
    pub varset: usize,
    /// A transient state override applied after every active `use_states`.
    pub states: Option<RenderStates>,
}

impl RenderDetail {
    /// Creates a detail drawing everything with variant `varset`.
    pub fn with_varset(varset: usize) -> Self {
        Self {
            varset,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::variable::VariableValue;

    #[test]
    fn links_and_variants_accumulate() {
        let mut ro = RenderObjectDescriptor::new("quad");
        ro.link_geometry("quad_geo").link_shader("quad_shader");

        for quad in 0..2 {
            let mut vars = VariableSet::new();
            vars.set("u_quad", quad as i32).unwrap();
            ro.add_variable_set(vars);
        }

        assert_eq!(ro.geometry(), "quad_geo");
        assert_eq!(ro.shader(), "quad_shader");
        assert_eq!(ro.variable_set_count(), 2);
        assert_eq!(
            ro.variable_set(1).unwrap().get("u_quad"),
            Some(&VariableValue::Int(1))
        );
        assert!(ro.variable_set(2).is_none());
    }

    #[test]
    fn for_each_variable_set_mutates_every_variant() {
        let mut ro = RenderObjectDescriptor::new("quad");
        for _ in 0..3 {
            let mut vars = VariableSet::new();
            vars.set("u_texture", 0i32).unwrap();
            ro.add_variable_set(vars);
        }

        ro.for_each_variable_set(|_, vars| {
            vars.set("u_texture", 2i32).unwrap();
        });

        for i in 0..3 {
            assert_eq!(
                ro.variable_set(i).unwrap().get("u_texture"),
                Some(&VariableValue::Int(2))
            );
        }
    }
}
