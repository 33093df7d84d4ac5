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

//! # Khroma Core
//!
//! Foundational crate containing the backend-agnostic resource descriptors,
//! the backend executor contract, and the asynchronous dispatch machinery
//! that fans one resource description out to any number of concrete
//! graphics backends.

#![warn(missing_docs)]

pub mod asset;
pub mod camera;
pub mod graphics;
pub mod math;

pub use camera::PinholeCamera;
