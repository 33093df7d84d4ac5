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

//! A `GraphicsBackend` that realizes resources into a core registry and
//! executes draws by journaling their fully-resolved form.

use crate::graphics::headless::journal::{TraceEvent, TraceLog};
use khroma_core::graphics::{
    resolve_draw, BackendType, GraphicsBackend, RenderDetail, RenderError, ResourceDescriptor,
    ResourceError, ResourceStore, StateSetDescriptor, StateStack, ViewInfo,
};

/// The headless backend used by demos and integration tests.
///
/// It runs the exact configure/update/resolve pipeline a native backend
/// runs - same registry, same state stack, same binding resolution - and
/// stops where a native implementation would start encoding API calls,
/// recording the resolved draw instead.
#[derive(Debug)]
pub struct HeadlessBackend {
    backend_type: BackendType,
    store: ResourceStore,
    stack: StateStack,
    view: ViewInfo,
    log: TraceLog,
}

impl HeadlessBackend {
    /// Creates a backend claiming `backend_type` as its family, returning
    /// it together with the journal it records into.
    pub fn new(backend_type: BackendType) -> (Self, TraceLog) {
        let log = TraceLog::new();
        (
            Self {
                backend_type,
                store: ResourceStore::new(),
                stack: StateStack::new(),
                view: ViewInfo::default(),
                log: log.clone(),
            },
            log,
        )
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn backend_type(&self) -> BackendType {
        self.backend_type
    }

    fn configure(&mut self, descriptor: ResourceDescriptor) -> Result<(), ResourceError> {
        let name = descriptor.name().to_string();
        self.store.configure(self.backend_type, descriptor)?;
        log::debug!("Headless {:?}: configured '{}'", self.backend_type, name);
        self.log.push(TraceEvent::Configured { name });
        Ok(())
    }

    fn update(&mut self, descriptor: ResourceDescriptor) -> Result<(), ResourceError> {
        let name = descriptor.name().to_string();
        self.store.update(self.backend_type, descriptor)?;
        self.log.push(TraceEvent::Updated { name });
        Ok(())
    }

    fn prepare_frame(&mut self, view: ViewInfo) {
        self.view = view;
        self.log.push(TraceEvent::FramePrepared);
    }

    fn render(&mut self, object: &str, detail: &RenderDetail) -> Result<(), RenderError> {
        let draw = resolve_draw(&mut self.store, &self.stack, &self.view, object, detail)?;
        log::trace!(
            "Headless {:?}: draw '{}' varset {} ({} indices)",
            self.backend_type,
            draw.object,
            draw.varset,
            draw.count
        );
        self.log.push(TraceEvent::Draw(draw));
        Ok(())
    }

    fn use_states(&mut self, states: &StateSetDescriptor, priority: u32) {
        self.stack.apply(&states.states, priority);
        self.log.push(TraceEvent::StatesUsed {
            name: states.name.clone(),
            priority,
            cleared: !states.states.has_changes(),
        });
    }

    fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }
}
