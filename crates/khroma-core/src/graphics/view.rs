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

//! The async view: the non-blocking handle through which a client submits
//! requests to one backend executor running on its own thread.

use crate::graphics::backend::{BackendType, GraphicsBackend, ViewInfo};
use crate::graphics::descriptor::ResourceDescriptor;
use crate::graphics::render_object::RenderDetail;
use crate::graphics::state::StateSetDescriptor;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use uuid::Uuid;

/// The opaque identity of one backend executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(Uuid);

impl ViewId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ViewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The first uuid group is enough to tell workers apart in logs.
        let text = self.0.to_string();
        f.write_str(text.split('-').next().unwrap_or(&text))
    }
}

#[derive(Debug)]
enum ViewRequest {
    Configure(ResourceDescriptor),
    Update(ResourceDescriptor),
    PrepareFrame(ViewInfo),
    Render {
        object: String,
        detail: RenderDetail,
    },
    UseStates {
        states: StateSetDescriptor,
        priority: u32,
    },
    Probe {
        name: String,
        reply: flume::Sender<bool>,
    },
    Fence {
        reply: flume::Sender<()>,
    },
    Shutdown,
}

#[derive(Debug)]
struct ViewShared {
    id: ViewId,
    backend_type: BackendType,
    sender: flume::Sender<ViewRequest>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// A cloneable, non-blocking handle to one backend executor.
///
/// Every call enqueues a request and returns immediately; the executor
/// applies requests in submission order on its own thread. No ordering
/// holds *across* different views. When the last clone of a view is
/// dropped, the channel disconnects and the worker exits, reclaiming the
/// backend's resource store asynchronously.
#[derive(Debug, Clone)]
pub struct AsyncView {
    inner: Arc<ViewShared>,
}

impl AsyncView {
    /// Moves `backend` onto a fresh worker thread and returns the handle
    /// feeding it.
    pub fn spawn(backend: Box<dyn GraphicsBackend>) -> Self {
        let (sender, receiver) = flume::unbounded();
        let id = ViewId::new();
        let backend_type = backend.backend_type();

        let handle = thread::spawn(move || run_worker(backend, receiver, id));

        Self {
            inner: Arc::new(ViewShared {
                id,
                backend_type,
                sender,
                handle: Mutex::new(Some(handle)),
            }),
        }
    }

    /// Returns this executor's identity.
    pub fn id(&self) -> ViewId {
        self.inner.id
    }

    /// Returns the API family of the backend behind this view.
    pub fn backend_type(&self) -> BackendType {
        self.inner.backend_type
    }

    /// Enqueues a configure of `descriptor`.
    pub fn configure(&self, descriptor: impl Into<ResourceDescriptor>) {
        self.send(ViewRequest::Configure(descriptor.into()));
    }

    /// Enqueues an update of `descriptor`.
    pub fn update(&self, descriptor: impl Into<ResourceDescriptor>) {
        self.send(ViewRequest::Update(descriptor.into()));
    }

    /// Enqueues the view context for subsequent draws.
    pub fn prepare_frame(&self, view: ViewInfo) {
        self.send(ViewRequest::PrepareFrame(view));
    }

    /// Enqueues one draw of the render object named `object`.
    pub fn render(&self, object: impl Into<String>, detail: RenderDetail) {
        self.send(ViewRequest::Render {
            object: object.into(),
            detail,
        });
    }

    /// Enqueues a state override at `priority`.
    pub fn use_states(&self, states: StateSetDescriptor, priority: u32) {
        self.send(ViewRequest::UseStates { states, priority });
    }

    /// Asks the executor whether a resource named `name` exists.
    ///
    /// This is a synchronous probe for tools and tests: it round-trips
    /// through the request queue, so it observes every request enqueued
    /// before it. The render path never needs it.
    pub fn contains(&self, name: &str) -> bool {
        let (reply, result) = flume::bounded(1);
        self.send(ViewRequest::Probe {
            name: name.to_string(),
            reply,
        });
        result.recv().unwrap_or(false)
    }

    /// Blocks until every previously enqueued request has been applied.
    pub fn wait_idle(&self) {
        let (reply, result) = flume::bounded(1);
        self.send(ViewRequest::Fence { reply });
        let _ = result.recv();
    }

    /// Drains the queue and joins the worker thread.
    ///
    /// Later calls on this view (from any clone) are dropped with a log.
    pub fn shutdown(&self) {
        let handle = self
            .inner
            .handle
            .lock()
            .ok()
            .and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            self.send(ViewRequest::Shutdown);
            if handle.join().is_err() {
                log::error!("View {}: backend worker panicked", self.inner.id);
            }
        }
    }

    fn send(&self, request: ViewRequest) {
        if self.inner.sender.send(request).is_err() {
            log::error!(
                "View {}: backend worker is gone, request dropped",
                self.inner.id
            );
        }
    }
}

fn run_worker(
    mut backend: Box<dyn GraphicsBackend>,
    receiver: flume::Receiver<ViewRequest>,
    id: ViewId,
) {
    log::info!(
        "View {id}: backend worker started ({:?})",
        backend.backend_type()
    );

    // Errors stay local to the request that raised them; the loop keeps
    // consuming so one bad configure or draw never wedges the backend.
    for request in receiver.iter() {
        match request {
            ViewRequest::Configure(descriptor) => {
                let name = descriptor.name().to_string();
                if let Err(err) = backend.configure(descriptor) {
                    log::warn!("View {id}: configure of '{name}' failed: {err}");
                }
            }
            ViewRequest::Update(descriptor) => {
                let name = descriptor.name().to_string();
                if let Err(err) = backend.update(descriptor) {
                    log::warn!("View {id}: update of '{name}' failed: {err}");
                }
            }
            ViewRequest::PrepareFrame(view) => backend.prepare_frame(view),
            ViewRequest::Render { object, detail } => {
                if let Err(err) = backend.render(&object, &detail) {
                    log::warn!("View {id}: draw of '{object}' aborted: {err}");
                }
            }
            ViewRequest::UseStates { states, priority } => {
                backend.use_states(&states, priority);
            }
            ViewRequest::Probe { name, reply } => {
                let _ = reply.send(backend.contains(&name));
            }
            ViewRequest::Fence { reply } => {
                let _ = reply.send(());
            }
            ViewRequest::Shutdown => break,
        }
    }

    log::info!("View {id}: backend worker stopped, store reclaimed");
}
