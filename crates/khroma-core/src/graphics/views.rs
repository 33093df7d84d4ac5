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

//! The fan-out over an ordered collection of async views: one request,
//! broadcast to every registered backend executor.

use crate::graphics::backend::ViewInfo;
use crate::graphics::descriptor::ResourceDescriptor;
use crate::graphics::render_object::RenderDetail;
use crate::graphics::state::StateSetDescriptor;
use crate::graphics::view::AsyncView;

/// An ordered collection of [`AsyncView`]s sharing one resource namespace.
///
/// Broadcasts visit views in registration order and only enqueue; nothing
/// waits for completion. Each broadcast hands every view its own copy of
/// the descriptor, so no descriptor is shared across backend threads.
///
/// Configuring different content under the same name on different views is
/// a caller error the core does not detect.
#[derive(Debug, Clone, Default)]
pub struct AsyncViews {
    views: Vec<AsyncView>,
}

impl AsyncViews {
    /// Creates a fan-out over `views`, keeping their order.
    pub fn new(views: Vec<AsyncView>) -> Self {
        Self { views }
    }

    /// Appends a view at the end of the registration order.
    pub fn push(&mut self, view: AsyncView) {
        self.views.push(view);
    }

    /// Invokes `f` once per view, in registration order.
    pub fn for_each(&self, mut f: impl FnMut(&AsyncView)) {
        for view in &self.views {
            f(view);
        }
    }

    /// Iterates the views in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &AsyncView> {
        self.views.iter()
    }

    /// Returns the number of registered views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if no views are registered.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Broadcasts a configure of `descriptor` to every view.
    pub fn configure(&self, descriptor: impl Into<ResourceDescriptor>) {
        let descriptor = descriptor.into();
        self.for_each(|view| view.configure(descriptor.clone()));
    }

    /// Broadcasts an update of `descriptor` to every view.
    pub fn update(&self, descriptor: impl Into<ResourceDescriptor>) {
        let descriptor = descriptor.into();
        self.for_each(|view| view.update(descriptor.clone()));
    }

    /// Broadcasts the view context to every view.
    pub fn prepare_frame(&self, view_info: ViewInfo) {
        self.for_each(|view| view.prepare_frame(view_info.clone()));
    }

    /// Broadcasts one draw of the render object named `object`.
    pub fn render(&self, object: &str, detail: &RenderDetail) {
        self.for_each(|view| view.render(object, detail.clone()));
    }

    /// Broadcasts a state override at `priority`.
    pub fn use_states(&self, states: &StateSetDescriptor, priority: u32) {
        self.for_each(|view| view.use_states(states.clone(), priority));
    }

    /// Blocks until every view has applied all previously enqueued
    /// requests.
    pub fn wait_idle(&self) {
        self.for_each(|view| view.wait_idle());
    }
}

impl From<Vec<AsyncView>> for AsyncViews {
    fn from(views: Vec<AsyncView>) -> Self {
        Self::new(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::backend::{BackendType, GraphicsBackend};
    use crate::graphics::error::{RenderError, ResourceError};
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct NameBackend {
        tag: &'static str,
        seen: Arc<Mutex<Vec<(&'static str, String)>>>,
        names: Vec<String>,
    }

    impl GraphicsBackend for NameBackend {
        fn backend_type(&self) -> BackendType {
            BackendType::OpenGl
        }

        fn configure(&mut self, descriptor: ResourceDescriptor) -> Result<(), ResourceError> {
            self.seen
                .lock()
                .unwrap()
                .push((self.tag, descriptor.name().to_string()));
            self.names.push(descriptor.name().to_string());
            Ok(())
        }

        fn update(&mut self, _descriptor: ResourceDescriptor) -> Result<(), ResourceError> {
            Ok(())
        }

        fn prepare_frame(&mut self, _view: ViewInfo) {}

        fn render(&mut self, _object: &str, _detail: &RenderDetail) -> Result<(), RenderError> {
            Ok(())
        }

        fn use_states(&mut self, _states: &StateSetDescriptor, _priority: u32) {}

        fn contains(&self, name: &str) -> bool {
            self.names.iter().any(|n| n == name)
        }
    }

    fn fan_out(tags: &[&'static str]) -> (AsyncViews, Arc<Mutex<Vec<(&'static str, String)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let views = tags
            .iter()
            .map(|&tag| {
                AsyncView::spawn(Box::new(NameBackend {
                    tag,
                    seen: Arc::clone(&seen),
                    names: Vec::new(),
                }))
            })
            .collect();
        (AsyncViews::new(views), seen)
    }

    #[test]
    fn for_each_visits_in_registration_order() {
        let (views, _) = fan_out(&["first", "second", "third"]);
        let mut order = Vec::new();
        views.for_each(|view| order.push(view.id()));

        let ids: Vec<_> = views.iter().map(|v| v.id()).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn broadcast_reaches_every_backend() {
        let (views, seen) = fan_out(&["a", "b"]);
        views.configure(StateSetDescriptor::new("root"));
        views.wait_idle();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&("a", "root".to_string())));
        assert!(seen.contains(&("b", "root".to_string())));
    }

    #[test]
    fn existence_agrees_across_backends_after_broadcast() {
        let (views, _) = fan_out(&["a", "b"]);
        views.configure(StateSetDescriptor::new("root"));
        views.wait_idle();

        let answers: Vec<bool> = views.iter().map(|v| v.contains("root")).collect();
        assert_eq!(answers, vec![true, true]);
        let absent: Vec<bool> = views.iter().map(|v| v.contains("missing")).collect();
        assert_eq!(absent, vec![false, false]);
    }
}
