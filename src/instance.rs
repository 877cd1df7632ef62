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

//! Header reader for DICOM part 10 files.
//!
//! The data set is parsed up to the pixel data attribute and no further: the
//! pixel stream is neither read from disk nor kept in memory. Text values are
//! decoded with the character set the file declares, ISO 8859-1 when it
//! declares none.

use std::borrow::Cow;
use std::path::Path;

use dicom_dictionary_std::tags;
use dicom_encoding::transfer_syntax::TransferSyntaxIndex;
use dicom_object::{DefaultDicomObject, OpenFileOptions, Tag};
use dicom_transfer_syntax_registry::TransferSyntaxRegistry;
use log::debug;

use crate::error::DicomError;

#[derive(Debug)]
pub struct Instance {
  object: DefaultDicomObject,
}

impl Instance {
  pub fn from_filepath<P: AsRef<Path>>(filepath: P) -> Result<Self, DicomError> {
    let object = OpenFileOptions::new()
      .read_until(tags::PIXEL_DATA)
      .open_file(filepath.as_ref())?;
    let instance = Instance { object };
    debug!(
      "Header of {} loaded ({})",
      filepath.as_ref().display(),
      transfer_syntax_label(instance.transfer_syntax())
    );
    Ok(instance)
  }

  pub fn transfer_syntax(&self) -> &str {
    self.object.meta().transfer_syntax()
  }

  /// Text value of the top level attribute `tag` without its padding, `None`
  /// when the attribute is absent.
  pub fn get_text(&self, tag: Tag) -> Result<Option<String>, DicomError> {
    let element = match self.object.get(tag) {
      Some(element) => element,
      None => return Ok(None),
    };
    let value = element
      .to_str()
      .map_err(|e| DicomError::new(&format!("{} is not text: {}", tag, e)))?;
    Ok(Some(trim_padding(value)))
  }

  pub fn get_u16(&self, tag: Tag) -> Result<Option<u16>, DicomError> {
    match self.object.get(tag) {
      Some(element) => element
        .to_int::<u16>()
        .map(Some)
        .map_err(|e| DicomError::new(&format!("{} is not an unsigned short: {}", tag, e))),
      None => Ok(None),
    }
  }
}

fn trim_padding(value: Cow<'_, str>) -> String {
  value
    .trim_matches(|c: char| c == '\0' || c.is_whitespace())
    .to_string()
}

/// Human readable name of a transfer syntax.
pub fn transfer_syntax_label(uid: &str) -> &'static str {
  let uid = uid.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());
  TransferSyntaxRegistry
    .get(uid)
    .map(|ts| ts.name())
    .unwrap_or("Unknown Transfer Syntax")
}
