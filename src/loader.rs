// Copyright (c) 2023 Jean-Daniel Michaud
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Image loading: decode the first frame of a file and window it down to an
//! 8 bits grayscale raster.

use std::path::Path;

use dicom_dictionary_std::tags;
use dicom_object::{DefaultDicomObject, Tag};
use dicom_pixeldata::{ConvertOptions, DecodedPixelData};
use log::debug;

use crate::codecs::{can_decode, DecoderSession};
use crate::error::DicomError;
use crate::instance::transfer_syntax_label;
use crate::window::{Voi, Window};

/// An 8 bits grayscale raster, row major with a stride equal to `width`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<u8>,
  /// The transformation that produced `pixels`
  pub voi: Voi,
}

impl DecodedImage {
  pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
    if x >= self.width || y >= self.height {
      return None;
    }
    self.pixels.get((y as usize) * (self.width as usize) + x as usize).copied()
  }
}

/// Load the image at `path`. Any failure, whether the file cannot be parsed
/// or its pixel data cannot be rendered, gives `None`.
pub fn load_image<P: AsRef<Path>>(path: P) -> Option<DecodedImage> {
  let path = path.as_ref();
  match try_load_image(path) {
    Ok(image) => Some(image),
    Err(e) => {
      debug!("Could not load {}: {}", path.display(), e);
      None
    }
  }
}

/// Same as [`load_image`] but reports why the image could not be loaded.
pub fn try_load_image<P: AsRef<Path>>(path: P) -> Result<DecodedImage, DicomError> {
  let session = DecoderSession::open(path)?;
  let transfer_syntax = session.transfer_syntax();
  if !can_decode(transfer_syntax) {
    return Err(DicomError::new(&format!(
      "No decoder for {} ({})",
      transfer_syntax,
      transfer_syntax_label(transfer_syntax)
    )));
  }

  let decoded = session.decode()?;
  let (width, height) = (decoded.columns(), decoded.rows());
  if width == 0 || height == 0 {
    return Err(DicomError::new(&format!("Invalid image size {}x{}", width, height)));
  }

  let voi = select_voi(session.object(), &decoded)?;
  let options = ConvertOptions::new().with_voi_lut(voi.lut_option()).force_8bit();
  let pixels = decoded
    .to_dynamic_image_with_options(0, &options)?
    .into_luma8()
    .into_raw();
  if pixels.len() != width as usize * height as usize {
    return Err(DicomError::new("No pixel data rendered"));
  }
  debug!("Loaded {}x{} image with {:?}", width, height, voi);
  Ok(DecodedImage { width, height, pixels, voi })
}

// The range used without a preset is the one of the modality values, the
// rescale is applied before the extremes are taken.
fn select_voi(obj: &DefaultDicomObject, decoded: &DecodedPixelData<'_>) -> Result<Voi, DicomError> {
  if !decoded.photometric_interpretation().is_monochrome() {
    return Ok(Voi::Native);
  }
  if let Some(window) = first_window(obj) {
    return Ok(Voi::Linear(window));
  }
  let values: Vec<f64> = decoded.to_vec_frame(0)?;
  Ok(Voi::min_max(&values))
}

fn element_f64(obj: &DefaultDicomObject, tag: Tag) -> Option<f64> {
  obj.element(tag).ok()?.to_multi_float64().ok()?.first().copied()
}

// Window presets are multi valued, only the first one is used.
fn first_window(obj: &DefaultDicomObject) -> Option<Window> {
  let center = element_f64(obj, tags::WINDOW_CENTER)?;
  let width = element_f64(obj, tags::WINDOW_WIDTH)?;
  let window = Window::new(center, width);
  if window.is_none() {
    debug!("Ignoring window preset {}/{}", center, width);
  }
  window
}
