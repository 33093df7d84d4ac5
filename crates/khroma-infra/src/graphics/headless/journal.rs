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

//! The shared journal a headless backend records applied requests into.

use khroma_core::graphics::ResolvedDraw;
use std::sync::{Arc, Mutex};

/// One applied request, as observed by the headless backend.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// A resource was registered.
    Configured {
        /// The registered resource name.
        name: String,
    },
    /// A resource was reconciled in place.
    Updated {
        /// The updated resource name.
        name: String,
    },
    /// A view context was published.
    FramePrepared,
    /// A state override was pushed (or, for a default set, cleared).
    StatesUsed {
        /// The state set's name, empty for ad-hoc sets.
        name: String,
        /// The priority the override was pushed at.
        priority: u32,
        /// `true` if the set had no changed groups and cleared instead.
        cleared: bool,
    },
    /// A draw resolved and executed.
    Draw(ResolvedDraw),
}

/// A cloneable, thread-safe view into one backend's applied requests.
///
/// The backend lives on its worker thread; tests and demos hold the other
/// clone and read what actually got applied.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    events: Arc<Mutex<Vec<TraceEvent>>>,
}

impl TraceLog {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, event: TraceEvent) {
        self.events.lock().unwrap().push(event);
    }

    /// Returns a snapshot of every recorded event, in application order.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns a snapshot of the executed draws, in application order.
    pub fn draws(&self) -> Vec<ResolvedDraw> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                TraceEvent::Draw(draw) => Some(draw.clone()),
                _ => None,
            })
            .collect()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns `true` if nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    /// Drops all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}
