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

//! Pan and zoom state of the image view.
//!
//! The image is placed in scene coordinates with its center at the origin.
//! The viewport looks at `center` with a magnification of `scale` screen
//! pixels per image pixel.

use serde::Deserialize;

use crate::loader::DecodedImage;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ZoomSettings {
  pub button_in: f64,
  pub button_out: f64,
  pub shortcut_in: f64,
  pub shortcut_out: f64,
  /// Fraction of the view used by a freshly opened image
  pub fit_margin: f64,
}

impl Default for ZoomSettings {
  fn default() -> Self {
    ZoomSettings {
      button_in: 1.25,
      button_out: 0.8,
      shortcut_in: 1.20,
      shortcut_out: 0.8,
      fit_margin: 0.95,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomStep {
  ButtonIn,
  ButtonOut,
  ShortcutIn,
  ShortcutOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
  pub view_width: u32,
  pub view_height: u32,
  pub scale: f64,
  pub center: (f64, f64),
  settings: ZoomSettings,
}

impl Viewport {
  pub fn new(view_width: u32, view_height: u32, settings: ZoomSettings) -> Self {
    Viewport {
      view_width,
      view_height,
      scale: 1.0,
      center: (0.0, 0.0),
      settings,
    }
  }

  /// Scale the image to fit the view, keeping its aspect ratio, and look at
  /// its center.
  pub fn fit(&mut self, image_width: u32, image_height: u32) {
    if image_width == 0 || image_height == 0 {
      return;
    }
    let horizontal = self.view_width as f64 / image_width as f64;
    let vertical = self.view_height as f64 / image_height as f64;
    self.scale = horizontal.min(vertical);
    self.center = (0.0, 0.0);
  }

  /// Initial placement of a newly opened image: fitted, with a margin.
  pub fn open(&mut self, image_width: u32, image_height: u32) {
    self.fit(image_width, image_height);
    self.scale *= self.settings.fit_margin;
  }

  pub fn zoom(&mut self, step: ZoomStep) {
    self.scale *= match step {
      ZoomStep::ButtonIn => self.settings.button_in,
      ZoomStep::ButtonOut => self.settings.button_out,
      ZoomStep::ShortcutIn => self.settings.shortcut_in,
      ZoomStep::ShortcutOut => self.settings.shortcut_out,
    };
  }

  /// Drag the scene by (`dx`, `dy`) screen pixels.
  pub fn pan(&mut self, dx: f64, dy: f64) {
    self.center.0 -= dx / self.scale;
    self.center.1 -= dy / self.scale;
  }

  /// Image coordinates under the screen position (`x`, `y`).
  pub fn view_to_image(&self, x: f64, y: f64, image_width: u32, image_height: u32) -> (f64, f64) {
    let scene_x = self.center.0 + (x - self.view_width as f64 / 2.0) / self.scale;
    let scene_y = self.center.1 + (y - self.view_height as f64 / 2.0) / self.scale;
    (scene_x + image_width as f64 / 2.0, scene_y + image_height as f64 / 2.0)
  }

  /// Sample `image` into a view sized raster. Screen pixels outside of the
  /// image are set to `background`.
  pub fn render(&self, image: &DecodedImage, background: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(self.view_width as usize * self.view_height as usize);
    for y in 0..self.view_height {
      for x in 0..self.view_width {
        let (ix, iy) =
          self.view_to_image(x as f64 + 0.5, y as f64 + 0.5, image.width, image.height);
        let level = if ix >= 0.0 && iy >= 0.0 {
          image.pixel(ix.floor() as u32, iy.floor() as u32).unwrap_or(background)
        } else {
          background
        };
        out.push(level);
      }
    }
    out
  }
}
