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

//! Writes small DICOM part 10 files for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";
pub const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
pub const EXPLICIT_VR_BIG_ENDIAN: &str = "1.2.840.10008.1.2.2";
pub const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";

const LONG_VRS: [&str; 6] = ["OB", "OW", "SQ", "UN", "UT", "UC"];

pub struct DicomBuilder {
  transfer_syntax: String,
  elements: Vec<(u16, u16, &'static str, Vec<u8>)>,
  // Encapsulated pixel data, one fragment per frame
  fragments: Vec<Vec<u8>>,
  // Raw bytes written after the data set
  trailer: Vec<u8>,
}

fn padded(vr: &str, value: &[u8]) -> Vec<u8> {
  let mut value = value.to_vec();
  if value.len() % 2 == 1 {
    value.push(if vr == "UI" || vr == "OB" { 0 } else { b' ' });
  }
  value
}

fn encode_explicit(out: &mut Vec<u8>, group: u16, element: u16, vr: &str, value: &[u8]) {
  out.extend_from_slice(&group.to_le_bytes());
  out.extend_from_slice(&element.to_le_bytes());
  out.extend_from_slice(vr.as_bytes());
  if LONG_VRS.contains(&vr) {
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&(value.len() as u32).to_le_bytes());
  } else {
    out.extend_from_slice(&(value.len() as u16).to_le_bytes());
  }
  out.extend_from_slice(value);
}

// Values are kept little endian, binary ones are swapped word by word.
fn encode_big_endian(out: &mut Vec<u8>, group: u16, element: u16, vr: &str, value: &[u8]) {
  out.extend_from_slice(&group.to_be_bytes());
  out.extend_from_slice(&element.to_be_bytes());
  out.extend_from_slice(vr.as_bytes());
  if LONG_VRS.contains(&vr) {
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&(value.len() as u32).to_be_bytes());
  } else {
    out.extend_from_slice(&(value.len() as u16).to_be_bytes());
  }
  let word = match vr {
    "US" | "SS" | "OW" => 2,
    "UL" | "SL" | "FL" => 4,
    "FD" => 8,
    _ => 1,
  };
  for chunk in value.chunks(word) {
    out.extend(chunk.iter().rev());
  }
}

fn encode_implicit(out: &mut Vec<u8>, group: u16, element: u16, value: &[u8]) {
  out.extend_from_slice(&group.to_le_bytes());
  out.extend_from_slice(&element.to_le_bytes());
  out.extend_from_slice(&(value.len() as u32).to_le_bytes());
  out.extend_from_slice(value);
}

fn encode_item(out: &mut Vec<u8>, element: u16, value: &[u8]) {
  out.extend_from_slice(&0xFFFEu16.to_le_bytes());
  out.extend_from_slice(&element.to_le_bytes());
  out.extend_from_slice(&(value.len() as u32).to_le_bytes());
  out.extend_from_slice(value);
}

// PackBits with literal runs only.
fn pack_bits(bytes: &[u8]) -> Vec<u8> {
  let mut out = vec![];
  for run in bytes.chunks(128) {
    out.push((run.len() - 1) as u8);
    out.extend_from_slice(run);
  }
  out
}

/// One RLE Lossless frame of 16 bits samples: a 64 bytes header, then the
/// segment of the high bytes and the one of the low bytes.
pub fn rle_frame_u16(pixels: &[u16]) -> Vec<u8> {
  let high: Vec<u8> = pixels.iter().map(|p| (p >> 8) as u8).collect();
  let low: Vec<u8> = pixels.iter().map(|p| (p & 0xFF) as u8).collect();
  let segments = [pack_bits(&high), pack_bits(&low)];

  let mut frame = vec![0u8; 64];
  frame[0..4].copy_from_slice(&(segments.len() as u32).to_le_bytes());
  let mut offset = 64u32;
  for (i, segment) in segments.iter().enumerate() {
    frame[4 + 4 * i..8 + 4 * i].copy_from_slice(&offset.to_le_bytes());
    offset += segment.len() as u32;
  }
  for segment in segments {
    frame.extend(segment);
  }
  if frame.len() % 2 == 1 {
    // No-op run
    frame.push(0x80);
  }
  frame
}

impl DicomBuilder {
  pub fn new(transfer_syntax: &str) -> Self {
    DicomBuilder {
      transfer_syntax: transfer_syntax.to_string(),
      elements: vec![],
      fragments: vec![],
      trailer: vec![],
    }
  }

  pub fn explicit() -> Self {
    DicomBuilder::new(EXPLICIT_VR_LITTLE_ENDIAN)
  }

  pub fn implicit() -> Self {
    DicomBuilder::new(IMPLICIT_VR_LITTLE_ENDIAN)
  }

  pub fn element(mut self, group: u16, element: u16, vr: &'static str, value: &[u8]) -> Self {
    self.elements.retain(|(g, e, _, _)| (*g, *e) != (group, element));
    self.elements.push((group, element, vr, padded(vr, value)));
    self
  }

  pub fn text(self, group: u16, element: u16, vr: &'static str, value: &str) -> Self {
    self.element(group, element, vr, value.as_bytes())
  }

  pub fn us(self, group: u16, element: u16, value: u16) -> Self {
    self.element(group, element, "US", &value.to_le_bytes())
  }

  pub fn without(mut self, group: u16, element: u16) -> Self {
    self.elements.retain(|(g, e, _, _)| (*g, *e) != (group, element));
    self
  }

  pub fn study(self) -> Self {
    self
      .text(0x0008, 0x0016, "UI", "1.2.840.10008.5.1.4.1.1.7")
      .text(0x0008, 0x0018, "UI", "1.2.826.0.1.3680043.2.1125.1")
      .text(0x0008, 0x0020, "DA", "20230115")
      .text(0x0008, 0x0060, "CS", "CT")
      .text(0x0008, 0x0080, "LO", "General Hospital")
      .text(0x0010, 0x0010, "PN", "Doe^Jane")
      .text(0x0010, 0x0020, "LO", "PAT-0042")
  }

  fn image_header(self, columns: u16, rows: u16, bits: u16, signed: bool) -> Self {
    self
      .us(0x0028, 0x0002, 1)
      .text(0x0028, 0x0004, "CS", "MONOCHROME2")
      .us(0x0028, 0x0010, rows)
      .us(0x0028, 0x0011, columns)
      .us(0x0028, 0x0100, bits)
      .us(0x0028, 0x0101, bits)
      .us(0x0028, 0x0102, bits - 1)
      .us(0x0028, 0x0103, if signed { 1 } else { 0 })
  }

  pub fn image_u16(self, columns: u16, rows: u16, pixels: &[u16]) -> Self {
    let data: Vec<u8> = pixels.iter().flat_map(|p| p.to_le_bytes()).collect();
    self
      .image_header(columns, rows, 16, false)
      .element(0x7FE0, 0x0010, "OW", &data)
  }

  pub fn image_i16(self, columns: u16, rows: u16, pixels: &[i16]) -> Self {
    let data: Vec<u8> = pixels.iter().flat_map(|p| p.to_le_bytes()).collect();
    self
      .image_header(columns, rows, 16, true)
      .element(0x7FE0, 0x0010, "OW", &data)
  }

  /// Same image as `image_u16`, RLE Lossless compressed.
  pub fn image_rle_u16(mut self, columns: u16, rows: u16, pixels: &[u16]) -> Self {
    self.transfer_syntax = RLE_LOSSLESS.to_string();
    self.fragments = vec![rle_frame_u16(pixels)];
    self.image_header(columns, rows, 16, false).without(0x7FE0, 0x0010)
  }

  /// Append `bytes` as is after the data set.
  pub fn trailer(mut self, bytes: &[u8]) -> Self {
    self.trailer = bytes.to_vec();
    self
  }

  pub fn image_u8(self, columns: u16, rows: u16, pixels: &[u8]) -> Self {
    self
      .image_header(columns, rows, 8, false)
      .element(0x7FE0, 0x0010, "OB", pixels)
  }

  pub fn window(self, center: &str, width: &str) -> Self {
    self
      .text(0x0028, 0x1050, "DS", center)
      .text(0x0028, 0x1051, "DS", width)
  }

  pub fn rescale(self, intercept: &str, slope: &str) -> Self {
    self
      .text(0x0028, 0x1052, "DS", intercept)
      .text(0x0028, 0x1053, "DS", slope)
  }

  pub fn build(&self) -> Vec<u8> {
    let mut meta = vec![];
    encode_explicit(&mut meta, 0x0002, 0x0001, "OB", &[0, 1]);
    encode_explicit(&mut meta, 0x0002, 0x0002, "UI", &padded("UI", b"1.2.840.10008.5.1.4.1.1.7"));
    encode_explicit(&mut meta, 0x0002, 0x0003, "UI", &padded("UI", b"1.2.826.0.1.3680043.2.1125.1"));
    encode_explicit(&mut meta, 0x0002, 0x0010, "UI", &padded("UI", self.transfer_syntax.as_bytes()));
    encode_explicit(&mut meta, 0x0002, 0x0012, "UI", &padded("UI", b"1.2.826.0.1.3680043.2.1125"));

    let mut buffer = vec![0u8; 128];
    buffer.extend_from_slice(b"DICM");
    encode_explicit(&mut buffer, 0x0002, 0x0000, "UL", &(meta.len() as u32).to_le_bytes());
    buffer.extend(meta);

    let mut elements = self.elements.clone();
    elements.sort_by_key(|(group, element, _, _)| (*group, *element));
    for (group, element, vr, value) in &elements {
      match self.transfer_syntax.as_str() {
        IMPLICIT_VR_LITTLE_ENDIAN => encode_implicit(&mut buffer, *group, *element, value),
        EXPLICIT_VR_BIG_ENDIAN => encode_big_endian(&mut buffer, *group, *element, vr, value),
        _ => encode_explicit(&mut buffer, *group, *element, vr, value),
      }
    }
    if !self.fragments.is_empty() {
      buffer.extend_from_slice(&0x7FE0u16.to_le_bytes());
      buffer.extend_from_slice(&0x0010u16.to_le_bytes());
      buffer.extend_from_slice(b"OB\0\0");
      buffer.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
      // Empty basic offset table
      encode_item(&mut buffer, 0xE000, &[]);
      for fragment in &self.fragments {
        encode_item(&mut buffer, 0xE000, fragment);
      }
      encode_item(&mut buffer, 0xE0DD, &[]);
    }
    buffer.extend_from_slice(&self.trailer);
    buffer
  }

  pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, self.build()).unwrap();
    path
  }
}
