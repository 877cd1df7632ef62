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

//! Contrast selection: the first window stored in the file when there is a
//! usable one, otherwise the observed range of the modality values.

use dicom_pixeldata::{VoiLutOption, WindowLevel};

/// A window center/width preset as stored in (0028,1050) and (0028,1051).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
  pub center: f64,
  pub width: f64,
}

impl Window {
  /// A window can only be applied with a width of at least 1.
  pub fn new(center: f64, width: f64) -> Option<Window> {
    if center.is_finite() && width.is_finite() && width >= 1.0 {
      Some(Window { center, width })
    } else {
      None
    }
  }
}

/// The value of interest transformation used to produce the 8 bits output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Voi {
  /// Linear function of a stored preset.
  /// https://dicom.nema.org/medical/dicom/current/output/chtml/part03/sect_C.11.2.html#sect_C.11.2.1.2.1
  Linear(Window),
  /// Observed minimum goes to 0, observed maximum to 255.
  MinMax { min: f64, max: f64 },
  /// Color samples, displayed as stored.
  Native,
}

impl Voi {
  pub fn min_max(values: &[f64]) -> Voi {
    let (min, max) = values
      .iter()
      .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| (min.min(v), max.max(v)));
    if min > max {
      // No values
      Voi::MinMax { min: 0.0, max: 0.0 }
    } else {
      Voi::MinMax { min, max }
    }
  }

  /// The window handed to the pixel data conversion.
  ///
  /// Min/max goes through the linear function with a width of
  /// `max - min + 1` centered on the range: the minimum lands on 0 and the
  /// maximum on the top of the output range. A flat image gets a width of 1
  /// and renders black.
  pub fn window_level(&self) -> Option<WindowLevel> {
    match *self {
      Voi::Linear(Window { center, width }) => Some(WindowLevel { center, width }),
      Voi::MinMax { min, max } => Some(WindowLevel {
        center: (min + max) / 2.0,
        width: max - min + 1.0,
      }),
      Voi::Native => None,
    }
  }

  pub fn lut_option(&self) -> VoiLutOption {
    match self.window_level() {
      Some(window) => VoiLutOption::Custom(window),
      None => VoiLutOption::Identity,
    }
  }
}
