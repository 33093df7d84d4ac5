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

//! Asynchronous image imports and array-slice assembly.

use crate::graphics::error::ImportError;
use crate::graphics::image::Image;
use std::sync::Arc;
use std::thread;

/// The import collaborator: given a logical path, produce a decoded image.
///
/// Implementations decode however they like (files, archives, procedural
/// sources); the core only consumes the resulting pixel payload.
pub trait ImageImporter: Send + Sync + 'static {
    /// Decodes the image at `location`.
    ///
    /// ## Errors
    /// * [`ImportError`] - the location yielded no decodable payload.
    fn import(&self, location: &str) -> Result<Image, ImportError>;
}

/// A pending import: a handle whose [`get`](FutureImage::get) blocks until
/// the worker delivers the payload.
#[derive(Debug)]
pub struct FutureImage {
    location: String,
    receiver: flume::Receiver<Result<Image, ImportError>>,
}

impl FutureImage {
    /// Returns the logical path this import was requested for.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Blocks until the payload arrives and returns it.
    ///
    /// ## Errors
    /// * [`ImportError`] - the importer failed, or its worker died before
    ///   delivering anything.
    pub fn get(self) -> Result<Image, ImportError> {
        self.receiver
            .recv()
            .unwrap_or_else(|_| {
                Err(ImportError::NoPayload {
                    location: self.location,
                })
            })
    }
}

/// Kicks off `importer.import(location)` on its own worker thread and
/// returns the handle to the pending payload.
pub fn import_async(importer: Arc<dyn ImageImporter>, location: impl Into<String>) -> FutureImage {
    let location = location.into();
    let (sender, receiver) = flume::bounded(1);

    let requested = location.clone();
    thread::spawn(move || {
        let _ = sender.send(importer.import(&requested));
    });

    FutureImage { location, receiver }
}

/// Collects pending imports into one layered image, in request order.
///
/// A failed import drops only its own slice: the image keeps every slice
/// that did resolve, in the order the imports were requested, and the
/// failure is logged. Mismatched slices (wrong dimensions or format) are
/// dropped the same way.
pub fn assemble_array(imports: Vec<FutureImage>) -> Image {
    let mut image = Image::new();
    for pending in imports {
        let location = pending.location().to_string();
        match pending.get() {
            Ok(slice) => {
                if let Err(err) = image.append(slice) {
                    log::warn!("Slice '{location}' dropped: {err}");
                }
            }
            Err(err) => {
                log::warn!("Slice '{location}' dropped: {err}");
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::image::PixelFormat;

    /// Produces a 2x2 image whose first byte tags the slice, or fails for
    /// locations marked bad.
    #[derive(Debug)]
    struct StubImporter;

    impl ImageImporter for StubImporter {
        fn import(&self, location: &str) -> Result<Image, ImportError> {
            if let Some(tag) = location.strip_prefix("slice.") {
                let tag: u8 = tag.parse().map_err(|_| ImportError::Decode {
                    location: location.to_string(),
                    details: "bad tag".to_string(),
                })?;
                let mut img = Image::with_dims(2, 2, PixelFormat::Rgba8Unorm);
                img.write_layer(0, |px: &mut [[u8; 4]], _, _| px.fill([tag, 0, 0, 255]))
                    .unwrap();
                Ok(img)
            } else {
                Err(ImportError::NoPayload {
                    location: location.to_string(),
                })
            }
        }
    }

    #[test]
    fn import_async_delivers_payload() {
        let importer: Arc<dyn ImageImporter> = Arc::new(StubImporter);
        let image = import_async(Arc::clone(&importer), "slice.7").get().unwrap();
        assert_eq!(image.bytes()[0], 7);
    }

    #[test]
    fn failed_slice_is_dropped_others_keep_order() {
        let importer: Arc<dyn ImageImporter> = Arc::new(StubImporter);
        let imports = vec![
            import_async(Arc::clone(&importer), "slice.1"),
            import_async(Arc::clone(&importer), "slice.2"),
            import_async(Arc::clone(&importer), "broken.png"),
            import_async(Arc::clone(&importer), "slice.4"),
        ];

        let image = assemble_array(imports);

        assert_eq!(image.layer_count(), 3);
        let layer_bytes = 2 * 2 * 4;
        assert_eq!(image.bytes()[0], 1);
        assert_eq!(image.bytes()[layer_bytes], 2);
        assert_eq!(image.bytes()[2 * layer_bytes], 4);
    }

    #[test]
    fn all_failed_slices_yield_an_empty_image() {
        let importer: Arc<dyn ImageImporter> = Arc::new(StubImporter);
        let image = assemble_array(vec![
            import_async(Arc::clone(&importer), "broken.a"),
            import_async(Arc::clone(&importer), "broken.b"),
        ]);

        assert_eq!(image.layer_count(), 0);
        assert!(image.format().is_none());
    }

    #[test]
    fn mismatched_slice_is_dropped() {
        #[derive(Debug)]
        struct Mixed;
        impl ImageImporter for Mixed {
            fn import(&self, location: &str) -> Result<Image, ImportError> {
                let size = if location == "big" { 4 } else { 2 };
                Ok(Image::with_dims(size, size, PixelFormat::Rgba8Unorm))
            }
        }

        let importer: Arc<dyn ImageImporter> = Arc::new(Mixed);
        let image = assemble_array(vec![
            import_async(Arc::clone(&importer), "small.1"),
            import_async(Arc::clone(&importer), "big"),
            import_async(Arc::clone(&importer), "small.2"),
        ]);

        assert_eq!(image.layer_count(), 2);
        assert_eq!((image.width(), image.height()), (2, 2));
    }
}
