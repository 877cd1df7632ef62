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

use std::error::Error;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use dicomview::codecs;
use dicomview::config::{self, ViewerConfig};
use dicomview::viewport::{Viewport, ZoomStep};
use dicomview::{extract_metadata, try_load_image, DecodedImage};

#[derive(Debug)]
struct ZoomSteps(Vec<ZoomStep>);

fn parse_zoom(steps: &str) -> Result<ZoomSteps, String> {
  steps
    .chars()
    .map(|c| match c {
      '+' => Ok(ZoomStep::ButtonIn),
      '-' => Ok(ZoomStep::ButtonOut),
      '*' => Ok(ZoomStep::ShortcutIn),
      '/' => Ok(ZoomStep::ShortcutOut),
      _ => Err(format!("unexpected zoom step '{}', use '+', '-', '*' or '/'", c)),
    })
    .collect::<Result<Vec<_>, _>>()
    .map(ZoomSteps)
}

fn parse_pan(value: &str) -> Result<(f64, f64), String> {
  let (dx, dy) = value
    .split_once(',')
    .ok_or_else(|| format!("{} is not of the form dx,dy", value))?;
  let parse = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("{}: {}", v, e));
  Ok((parse(dx)?, parse(dy)?))
}

#[derive(Debug, StructOpt)]
/// Open a DICOM file, print its study information and export the view
struct Opt {
  /// DICOM file to open
  filepath: PathBuf,
  /// Write the view to this PNG file
  #[structopt(short, long)]
  output: Option<PathBuf>,
  /// Export the decoded image at its own size instead of the view
  #[structopt(long)]
  raw: bool,
  /// Zoom steps applied once the image is fitted: '+' and '-' for the zoom
  /// buttons, '*' and '/' for the keyboard shortcuts, e.g. "++-*"
  #[structopt(long, parse(try_from_str = parse_zoom), default_value = "")]
  zoom: ZoomSteps,
  /// Drag the view by dx,dy screen pixels
  #[structopt(long, parse(try_from_str = parse_pan))]
  pan: Option<(f64, f64)>,
  /// Configuration file (defaults to $XDG_CONFIG_HOME/dicomview/config.yaml)
  #[structopt(short, long)]
  config: Option<PathBuf>,
  /// Log debug information
  #[structopt(short, long)]
  verbose: bool,
}

fn save_png(path: &Path, width: u32, height: u32, pixels: Vec<u8>) -> Result<(), Box<dyn Error>> {
  let buffer = image::GrayImage::from_raw(width, height, pixels)
    .ok_or_else(|| format!("{}x{} does not match the buffer size", width, height))?;
  buffer.save(path)?;
  info!("View written to {}", path.display());
  Ok(())
}

fn export(opt: &Opt, config: &ViewerConfig, image: DecodedImage, output: &Path) -> Result<(), Box<dyn Error>> {
  if opt.raw {
    return save_png(output, image.width, image.height, image.pixels);
  }
  let mut viewport = Viewport::new(config.viewport.width, config.viewport.height, config.zoom);
  viewport.open(image.width, image.height);
  for step in &opt.zoom.0 {
    viewport.zoom(*step);
  }
  if let Some((dx, dy)) = opt.pan {
    viewport.pan(dx, dy);
  }
  debug!("Viewport: scale {:.3}, center {:?}", viewport.scale, viewport.center);
  let pixels = viewport.render(&image, config.background);
  save_png(output, viewport.view_width, viewport.view_height, pixels)
}

fn run(opt: &Opt, config: &ViewerConfig) -> Result<bool, Box<dyn Error>> {
  let metadata = extract_metadata(&opt.filepath);
  let image = match try_load_image(&opt.filepath) {
    Ok(image) => image,
    Err(e) => {
      error!("{}: {}", opt.filepath.display(), e);
      eprintln!("Failed to process image. Check that the file is a valid DICOM file.");
      return Ok(false);
    }
  };

  for (label, value) in metadata.overlay() {
    println!("{: <12} {}", label, value);
  }
  println!("{: <12} {:?}", "Window", image.voi);

  if let Some(output) = &opt.output {
    export(opt, config, image, output)?;
  }
  Ok(true)
}

fn main() -> Result<(), Box<dyn Error>> {
  let opt = Opt::from_args();
  let (config, provenance) = config::load(&opt.config)?;
  let level = if opt.verbose { LevelFilter::Debug } else { config.level() };
  TermLogger::init(level, simplelog::Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;
  debug!("Configuration: {:?}", provenance);

  let registration = codecs::register()?;
  let loaded = run(&opt, &config)?;
  drop(registration);
  if !loaded {
    std::process::exit(1);
  }
  Ok(())
}
