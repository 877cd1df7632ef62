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

//! Process wide decoder registration and bookkeeping of decoder sessions.
//!
//! Codecs are linked in with the transfer syntax registry. Registration
//! checks that the compressed syntaxes the viewer promises are decodable and
//! brackets the application lifetime: it happens once at start up and is
//! released when the returned guard is dropped.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dicom_encoding::transfer_syntax::TransferSyntaxIndex;
use dicom_object::{open_file, DefaultDicomObject};
use dicom_pixeldata::{DecodedPixelData, PixelDecoder};
use dicom_transfer_syntax_registry::TransferSyntaxRegistry;
use log::{debug, info, warn};

use crate::error::DicomError;

pub const JPEG_BASELINE: &str = "1.2.840.10008.1.2.4.50";
pub const JPEG_EXTENDED: &str = "1.2.840.10008.1.2.4.51";
pub const JPEG_LOSSLESS_SV1: &str = "1.2.840.10008.1.2.4.70";
pub const JPEG_LS_LOSSLESS: &str = "1.2.840.10008.1.2.4.80";
pub const JPEG_LS_NEAR_LOSSLESS: &str = "1.2.840.10008.1.2.4.81";
pub const RLE_LOSSLESS: &str = "1.2.840.10008.1.2.5";

const COMPRESSED_SYNTAXES: [(&str, &str); 6] = [
  (JPEG_BASELINE, "JPEG Baseline"),
  (JPEG_EXTENDED, "JPEG Extended"),
  (JPEG_LOSSLESS_SV1, "JPEG Lossless"),
  (JPEG_LS_LOSSLESS, "JPEG-LS Lossless"),
  (JPEG_LS_NEAR_LOSSLESS, "JPEG-LS Near-Lossless"),
  (RLE_LOSSLESS, "RLE Lossless"),
];

static REGISTERED: AtomicBool = AtomicBool::new(false);
static SESSIONS: AtomicUsize = AtomicUsize::new(0);

/// Whether pixel data in `transfer_syntax_uid` can be decoded.
pub fn can_decode(transfer_syntax_uid: &str) -> bool {
  let uid = transfer_syntax_uid.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
  TransferSyntaxRegistry
    .get(uid)
    .map(|ts| ts.can_decode_all())
    .unwrap_or(false)
}

#[derive(Debug)]
pub struct CodecRegistration {
  decoders: Vec<&'static str>,
}

impl Drop for CodecRegistration {
  fn drop(&mut self) {
    REGISTERED.store(false, Ordering::SeqCst);
    info!("Decoders released: {}", self.decoders.join(", "));
  }
}

/// Register the decoders. Only one registration can be alive at a time.
pub fn register() -> Result<CodecRegistration, DicomError> {
  if REGISTERED.swap(true, Ordering::SeqCst) {
    return Err(DicomError::new("Decoders are already registered"));
  }
  let mut decoders = vec![];
  for (uid, name) in COMPRESSED_SYNTAXES {
    if can_decode(uid) {
      decoders.push(name);
    } else {
      warn!("No decoder available for {} ({})", name, uid);
    }
  }
  info!("Decoders registered: {}", decoders.join(", "));
  Ok(CodecRegistration { decoders })
}

/// A file opened for decoding. The whole object, pixel data included, lives
/// as long as the session and decoded pixel data borrow from it.
#[derive(Debug)]
pub struct DecoderSession {
  object: DefaultDicomObject,
}

impl DecoderSession {
  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DicomError> {
    let object = open_file(path.as_ref())?;
    let count = SESSIONS.fetch_add(1, Ordering::SeqCst) + 1;
    debug!("Decoder session opened for {} ({} live)", path.as_ref().display(), count);
    Ok(DecoderSession { object })
  }

  pub fn object(&self) -> &DefaultDicomObject {
    &self.object
  }

  pub fn transfer_syntax(&self) -> &str {
    self.object.meta().transfer_syntax()
  }

  /// Decode the first frame.
  pub fn decode(&self) -> Result<DecodedPixelData<'_>, DicomError> {
    Ok(self.object.decode_pixel_data_frame(0)?)
  }
}

impl Drop for DecoderSession {
  fn drop(&mut self) {
    SESSIONS.fetch_sub(1, Ordering::SeqCst);
  }
}

/// Number of decoder sessions currently open.
pub fn live_sessions() -> usize {
  SESSIONS.load(Ordering::SeqCst)
}
