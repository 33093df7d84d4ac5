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

//! A pinhole camera producing the per-frame view context.

use crate::graphics::ViewInfo;
use crate::math::{Mat4, Vec3};

/// A pinhole camera: a position, a view matrix, and a projection.
///
/// The dispatch loop publishes its [`ViewInfo`] through `prepare_frame`
/// each frame; window-resize glue recomputes the projection with the new
/// aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct PinholeCamera {
    position: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Default for PinholeCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl PinholeCamera {
    /// Creates a camera at the origin with identity matrices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a perspective projection.
    ///
    /// ## Arguments
    /// * `fov_y_radians` - vertical field of view in radians.
    /// * `aspect_ratio` - viewport width divided by height.
    /// * `z_near` / `z_far` - clip plane distances.
    pub fn perspective_fov(
        &mut self,
        fov_y_radians: f32,
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    ) -> &mut Self {
        self.projection = Mat4::perspective_rh_zo(fov_y_radians, aspect_ratio, z_near, z_far);
        self
    }

    /// Sets an orthographic projection of `width * height` centered on the
    /// view axis.
    pub fn orthographic(&mut self, width: f32, height: f32, z_near: f32, z_far: f32) -> &mut Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        self.projection = Mat4::orthographic_rh_zo(-hw, hw, -hh, hh, z_near, z_far);
        self
    }

    /// Places the camera at `eye` looking towards `target`.
    ///
    /// Degenerate inputs (eye on target, up parallel to the view
    /// direction) leave the previous view matrix in place.
    pub fn look_at(&mut self, eye: Vec3, up: Vec3, target: Vec3) -> &mut Self {
        if let Some(view) = Mat4::look_at_rh(eye, target, up) {
            self.position = eye;
            self.view = view;
        } else {
            log::warn!("Degenerate look_at inputs, keeping previous view");
        }
        self
    }

    /// Moves the camera by `offset` in world space, keeping orientation.
    pub fn translate_by(&mut self, offset: Vec3) -> &mut Self {
        self.position = self.position + offset;
        // The view matrix is the inverse transform: shift by -offset.
        self.view = self.view * Mat4::from_translation(-offset);
        self
    }

    /// Returns the camera's world-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Returns the world-to-view matrix.
    pub fn mat_view(&self) -> Mat4 {
        self.view
    }

    /// Returns the view-to-clip matrix.
    pub fn mat_proj(&self) -> Mat4 {
        self.projection
    }

    /// Bundles the camera's matrices into the per-frame view context.
    pub fn view_info(&self) -> ViewInfo {
        ViewInfo::new(self.view, self.projection, self.position)
    }
}
