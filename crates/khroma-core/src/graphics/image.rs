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

//! Backend-neutral image descriptors: layered pixel storage plus sampling,
//! wrap, and filter configuration.

use crate::graphics::error::ImageError;
use std::mem;

/// The memory format of pixels in an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Four 8-bit unsigned normalized components (RGBA).
    Rgba8Unorm,
    /// Four 32-bit float components.
    Rgba32Float,
}

impl PixelFormat {
    /// Returns the size in bytes of a single pixel for this format.
    pub const fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Rgba8Unorm => 4,
            PixelFormat::Rgba32Float => 16,
        }
    }
}

/// How texture coordinates outside `[0, 1]` are handled when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    /// Coordinates wrap around. `1.1` becomes `0.1`.
    #[default]
    Repeat,
    /// Coordinates are clamped to the edge. `1.1` becomes `1.0`.
    ClampToEdge,
    /// Coordinates wrap around, mirroring at each integer boundary.
    MirrorRepeat,
    /// Coordinates outside the range are given a fixed border color.
    ClampToBorder,
}

/// The filtering mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling. Returns the value of the nearest texel.
    #[default]
    Nearest,
    /// Linear interpolation over the nearest texels.
    Linear,
}

/// The texture kind a backend should realize for an image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureKind {
    /// A plain two-dimensional texture.
    #[default]
    D2,
    /// An array of equally-sized two-dimensional layers.
    D2Array,
    /// A cubemap (six faces of a 2D texture).
    Cube,
}

/// Layered pixel storage.
///
/// An image is one or more equally-sized 2-D layers stored contiguously;
/// an array texture is the ordered concatenation of its layers. The first
/// appended layer establishes dimensions and format for the whole image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    format: Option<PixelFormat>,
    layers: u32,
    data: Vec<u8>,
}

impl Image {
    /// Creates an empty image with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a single-layer image of `width * height` zeroed pixels.
    pub fn with_dims(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format: Some(format),
            layers: 1,
            data: vec![0; width as usize * height as usize * format.bytes_per_pixel()],
        }
    }

    /// Creates a single-layer image from raw pixel bytes.
    ///
    /// The byte length must equal `width * height * bytes_per_pixel`; excess
    /// bytes are truncated and missing bytes zero-filled, so a short decoder
    /// payload cannot corrupt neighbouring layers.
    pub fn from_pixels(width: u32, height: u32, format: PixelFormat, mut data: Vec<u8>) -> Self {
        data.resize(
            width as usize * height as usize * format.bytes_per_pixel(),
            0,
        );
        Self {
            width,
            height,
            format: Some(format),
            layers: 1,
            data,
        }
    }

    /// Returns the width of every layer, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of every layer, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel format, or `None` for an empty image.
    pub fn format(&self) -> Option<PixelFormat> {
        self.format
    }

    /// Returns the number of layers.
    pub fn layer_count(&self) -> u32 {
        self.layers
    }

    /// Returns the raw bytes of every layer, concatenated in append order.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Appends `other`'s layers to this image.
    ///
    /// The first append into an empty image adopts `other`'s dimensions and
    /// format; afterwards every appended layer must match them.
    ///
    /// ## Errors
    /// * [`ImageError::LayerDimensionMismatch`] - dimensions differ.
    /// * [`ImageError::FormatMismatch`] - pixel formats differ.
    pub fn append(&mut self, other: Image) -> Result<&mut Self, ImageError> {
        let Some(format) = other.format else {
            // Appending an empty image is a no-op.
            return Ok(self);
        };

        match self.format {
            None => {
                *self = other;
            }
            Some(own_format) => {
                if (self.width, self.height) != (other.width, other.height) {
                    return Err(ImageError::LayerDimensionMismatch {
                        expected: (self.width, self.height),
                        actual: (other.width, other.height),
                    });
                }
                if own_format != format {
                    return Err(ImageError::FormatMismatch {
                        expected: own_format,
                        actual: format,
                    });
                }
                self.layers += other.layers;
                self.data.extend_from_slice(&other.data);
            }
        }
        Ok(self)
    }

    /// Gives `f` a typed, mutable window over one layer's pixels.
    ///
    /// The window is staged in an aligned buffer of `P`, so the byte
    /// storage itself never needs `P`'s alignment.
    ///
    /// ## Errors
    /// * [`ImageError::PixelSizeMismatch`] - if `size_of::<P>()` differs
    ///   from the format's pixel size.
    pub fn write_layer<P: bytemuck::Pod>(
        &mut self,
        layer: u32,
        f: impl FnOnce(&mut [P], u32, u32),
    ) -> Result<&mut Self, ImageError> {
        let Some(format) = self.format else {
            return Ok(self);
        };
        if mem::size_of::<P>() != format.bytes_per_pixel() {
            return Err(ImageError::PixelSizeMismatch {
                expected: format.bytes_per_pixel(),
                actual: mem::size_of::<P>(),
            });
        }

        let layer_bytes = self.width as usize * self.height as usize * format.bytes_per_pixel();
        let start = layer as usize * layer_bytes;
        if let Some(slice) = self.data.get_mut(start..start + layer_bytes) {
            let mut staging =
                vec![<P as bytemuck::Zeroable>::zeroed(); self.width as usize * self.height as usize];
            bytemuck::cast_slice_mut::<P, u8>(&mut staging).copy_from_slice(slice);
            f(&mut staging, self.width, self.height);
            slice.copy_from_slice(bytemuck::cast_slice(&staging));
        }
        Ok(self)
    }
}

/// A named, backend-neutral image description.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    /// The resource name variable sets reference.
    pub name: String,
    /// The layered pixel storage.
    pub image: Image,
    /// The texture kind to realize.
    pub kind: TextureKind,
    /// Wrap mode along the S (horizontal) axis.
    pub wrap_s: WrapMode,
    /// Wrap mode along the T (vertical) axis.
    pub wrap_t: WrapMode,
    /// Filter applied when the texture is minified.
    pub min_filter: FilterMode,
    /// Filter applied when the texture is magnified.
    pub mag_filter: FilterMode,
}

impl ImageDescriptor {
    /// Creates a descriptor over `image` with default sampling state.
    pub fn new(name: impl Into<String>, image: Image) -> Self {
        Self {
            name: name.into(),
            image,
            kind: TextureKind::default(),
            wrap_s: WrapMode::default(),
            wrap_t: WrapMode::default(),
            min_filter: FilterMode::default(),
            mag_filter: FilterMode::default(),
        }
    }

    /// Sets the texture kind, returning the descriptor for chaining.
    pub fn with_kind(mut self, kind: TextureKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets both wrap axes, returning the descriptor for chaining.
    pub fn with_wrap(mut self, wrap_s: WrapMode, wrap_t: WrapMode) -> Self {
        self.wrap_s = wrap_s;
        self.wrap_t = wrap_t;
        self
    }

    /// Sets both filters, returning the descriptor for chaining.
    pub fn with_filter(mut self, min_filter: FilterMode, mag_filter: FilterMode) -> Self {
        self.min_filter = min_filter;
        self.mag_filter = mag_filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_append_adopts_dimensions() {
        let mut img = Image::new();
        img.append(Image::with_dims(8, 8, PixelFormat::Rgba8Unorm))
            .unwrap();

        assert_eq!((img.width(), img.height()), (8, 8));
        assert_eq!(img.layer_count(), 1);
        assert_eq!(img.bytes().len(), 8 * 8 * 4);
    }

    #[test]
    fn append_concatenates_layers_in_order() {
        let mut first = Image::with_dims(2, 2, PixelFormat::Rgba8Unorm);
        first
            .write_layer(0, |px: &mut [[u8; 4]], _, _| px.fill([1, 1, 1, 1]))
            .unwrap();
        let mut second = Image::with_dims(2, 2, PixelFormat::Rgba8Unorm);
        second
            .write_layer(0, |px: &mut [[u8; 4]], _, _| px.fill([2, 2, 2, 2]))
            .unwrap();

        let mut img = Image::new();
        img.append(first).unwrap();
        img.append(second).unwrap();

        assert_eq!(img.layer_count(), 2);
        assert_eq!(img.bytes()[0], 1);
        assert_eq!(img.bytes()[2 * 2 * 4], 2);
    }

    #[test]
    fn append_rejects_mismatched_dimensions() {
        let mut img = Image::with_dims(8, 8, PixelFormat::Rgba8Unorm);
        let err = img
            .append(Image::with_dims(4, 4, PixelFormat::Rgba8Unorm))
            .unwrap_err();

        assert_eq!(
            err,
            ImageError::LayerDimensionMismatch {
                expected: (8, 8),
                actual: (4, 4),
            }
        );
    }

    #[test]
    fn append_rejects_mismatched_format() {
        let mut img = Image::with_dims(8, 8, PixelFormat::Rgba8Unorm);
        let err = img
            .append(Image::with_dims(8, 8, PixelFormat::Rgba32Float))
            .unwrap_err();

        assert!(matches!(err, ImageError::FormatMismatch { .. }));
    }

    #[test]
    fn short_payload_is_zero_filled() {
        let img = Image::from_pixels(4, 1, PixelFormat::Rgba8Unorm, vec![9; 3]);
        assert_eq!(img.bytes().len(), 16);
        assert_eq!(&img.bytes()[..4], &[9, 9, 9, 0]);
    }

    #[test]
    fn checker_board_write() {
        let mut img = Image::with_dims(4, 4, PixelFormat::Rgba8Unorm);
        img.write_layer(0, |px: &mut [[u8; 4]], w, _| {
            for (i, p) in px.iter_mut().enumerate() {
                let (x, y) = (i as u32 % w, i as u32 / w);
                *p = if (x + y) % 2 == 0 {
                    [255, 255, 255, 255]
                } else {
                    [0, 0, 0, 255]
                };
            }
        })
        .unwrap();

        assert_eq!(img.bytes()[0], 255);
        assert_eq!(img.bytes()[4], 0);
    }
}
