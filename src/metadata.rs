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

//! Study metadata shown as an overlay next to the image.

use std::path::Path;

use dicom_dictionary_std::tags;
use dicom_object::Tag;
use log::{debug, warn};

use crate::instance::Instance;

/// Displayed in place of any attribute missing from the header.
pub const NOT_AVAILABLE: &str = "N/A";

/// Header fields of a study, formatted for display. When `is_valid` is false
/// the header could not be loaded and every text field is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyMetadata {
  pub patient_name: String,
  pub patient_id: String,
  pub study_date: String,
  pub modality: String,
  pub institution: String,
  pub dimensions: String,
  pub is_valid: bool,
}

impl StudyMetadata {
  pub fn invalid() -> Self {
    StudyMetadata::default()
  }

  pub fn from_instance(instance: &Instance) -> Self {
    let or_placeholder = |tag: Tag| text_field(instance, tag).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    StudyMetadata {
      patient_name: or_placeholder(tags::PATIENT_NAME),
      patient_id: or_placeholder(tags::PATIENT_ID),
      study_date: text_field(instance, tags::STUDY_DATE)
        .map(|date| format_study_date(&date))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
      modality: or_placeholder(tags::MODALITY),
      institution: or_placeholder(tags::INSTITUTION_NAME),
      dimensions: format_dimensions(
        u16_field(instance, tags::COLUMNS),
        u16_field(instance, tags::ROWS),
      ),
      is_valid: true,
    }
  }

  /// Label/value pairs in overlay order. Empty for an invalid record so that
  /// nothing is displayed as if it were real data.
  pub fn overlay(&self) -> Vec<(&'static str, &str)> {
    if !self.is_valid {
      return vec![];
    }
    vec![
      ("Patient", self.patient_name.as_str()),
      ("ID", self.patient_id.as_str()),
      ("Date", self.study_date.as_str()),
      ("Modality", self.modality.as_str()),
      ("Institution", self.institution.as_str()),
      ("Dimensions", self.dimensions.as_str()),
    ]
  }
}

/// Read the overlay fields of the file at `path`. Reading stops at the pixel
/// data attribute, whatever the transfer syntax.
pub fn extract_metadata<P: AsRef<Path>>(path: P) -> StudyMetadata {
  let path = path.as_ref();
  match Instance::from_filepath(path) {
    Ok(instance) => StudyMetadata::from_instance(&instance),
    Err(e) => {
      warn!("Could not load the header of {}: {}", path.display(), e);
      StudyMetadata::invalid()
    }
  }
}

fn text_field(instance: &Instance, tag: Tag) -> Option<String> {
  instance.get_text(tag).unwrap_or_else(|e| {
    debug!("{}", e);
    None
  })
}

fn u16_field(instance: &Instance, tag: Tag) -> Option<u16> {
  instance.get_u16(tag).unwrap_or_else(|e| {
    debug!("{}", e);
    None
  })
}

/// `YYYYMMDD` becomes `DD/MM/YYYY`. Values of any other length are returned
/// unchanged.
pub fn format_study_date(raw: &str) -> String {
  let chars: Vec<char> = raw.chars().collect();
  if chars.len() != 8 {
    return raw.to_string();
  }
  let part = |range: std::ops::Range<usize>| chars[range].iter().collect::<String>();
  format!("{}/{}/{}", part(6..8), part(4..6), part(0..4))
}

pub fn format_dimensions(columns: Option<u16>, rows: Option<u16>) -> String {
  match (columns, rows) {
    (Some(columns), Some(rows)) => format!("{} x {} px", columns, rows),
    _ => NOT_AVAILABLE.to_string(),
  }
}
