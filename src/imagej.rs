//! ImageJ ROI files
//!
//! Binary ROI records as written by ImageJ / Fiji, and `.zip` archives
//! of them as written by the ROI Manager.
//!
//! Record layout, big-endian:
//!
//! | Offset | Size | Field                                          |
//! |--------|------|------------------------------------------------|
//! | 0      | 4    | magic `Iout`                                   |
//! | 4      | 2    | version                                        |
//! | 6      | 1    | type                                           |
//! | 8      | 2x4  | top, left, bottom, right                       |
//! | 16     | 2    | number of coordinates                          |
//! | 18     | 4x4  | x1, y1, x2, y2 (lines, sub-pixel rectangles)   |
//! | 36     | 4    | composite shape size                           |
//! | 50     | 2    | options                                        |
//! | 64     |      | x then y coordinates, i16 relative to left/top |
//!
//! With the sub-pixel option the i16 block is followed by absolute
//! f32 x then y coordinates.

use std::convert::TryFrom;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::polygon::Polygon;

const MAGIC: &[u8; 4] = b"Iout";
const HEADER_SIZE: usize = 64;
const SUB_PIXEL_RESOLUTION: u16 = 128;
const VERSION: u16 = 228;
/// Upper bound on the vertices of an oval outline
const MAX_OVAL_VERTICES: usize = 1 << 16;

/// Type of ROI record
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum RoiType {
    Polygon,
    Rect,
    Oval,
    Line,
    Freeline,
    Polyline,
    NoRoi,
    Freehand,
    Traced,
    Angle,
    Point,
}

impl RoiType {
    fn from_code(code: u8) -> Option<Self> {
        let t = match code {
            0 => RoiType::Polygon,
            1 => RoiType::Rect,
            2 => RoiType::Oval,
            3 => RoiType::Line,
            4 => RoiType::Freeline,
            5 => RoiType::Polyline,
            6 => RoiType::NoRoi,
            7 => RoiType::Freehand,
            8 => RoiType::Traced,
            9 => RoiType::Angle,
            10 => RoiType::Point,
            _ => return None,
        };
        Some(t)
    }
    /// Record carries a coordinate list
    fn has_coordinates(self) -> bool {
        match self {
            RoiType::Rect | RoiType::Oval | RoiType::Line | RoiType::NoRoi => false,
            _ => true,
        }
    }
}

/// Bounds checked big-endian reads
struct Record<'a> {
    name: &'a str,
    data: &'a [u8],
}

impl<'a> Record<'a> {
    fn bytes<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let end = offset.checked_add(N)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| Error::invalid_roi(self.name, format!("truncated at offset {}", offset)))?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[offset .. end]);
        Ok(out)
    }
    fn u8(&self, offset: usize) -> Result<u8> {
        Ok(self.bytes::<1>(offset)?[0])
    }
    fn u16(&self, offset: usize) -> Result<u16> {
        self.bytes(offset).map(u16::from_be_bytes)
    }
    fn i16(&self, offset: usize) -> Result<i16> {
        self.bytes(offset).map(i16::from_be_bytes)
    }
    fn i32(&self, offset: usize) -> Result<i32> {
        self.bytes(offset).map(i32::from_be_bytes)
    }
    fn f32(&self, offset: usize) -> Result<f32> {
        self.bytes(offset).map(f32::from_be_bytes)
    }
}

/// Decode one ROI record into a polygon
///
/// - polygon, freehand, traced, polyline, freeline, angle and point
///   records give their vertices
/// - rectangles give their four corners
/// - ovals give a polygon inscribed in their bounds
/// - lines give their two end points
/// - composite shapes and `noRoi` give an empty polygon
///
/// The last three are degenerate and cover no pixels. `name` is only
/// used for error messages.
pub fn decode(name: &str, data: &[u8]) -> Result<Polygon> {
    let rec = Record { name, data };
    if data.len() < HEADER_SIZE {
        return Err(Error::invalid_roi(name, format!("{} bytes is shorter than the header", data.len())));
    }
    if &rec.bytes::<4>(0)? != MAGIC {
        return Err(Error::invalid_roi(name, "missing 'Iout' magic"));
    }
    let version = rec.u16(4)?;
    let code = rec.u8(6)?;
    let kind = RoiType::from_code(code)
        .ok_or_else(|| Error::invalid_roi(name, format!("unknown roi type {}", code)))?;
    let top    = f64::from(rec.i16(8)?);
    let left   = f64::from(rec.i16(10)?);
    let bottom = f64::from(rec.i16(12)?);
    let right  = f64::from(rec.i16(14)?);
    let options = rec.u16(50)?;
    let sub_pixel = options & SUB_PIXEL_RESOLUTION != 0;

    if rec.i32(36)? > 0 {
        debug!("{}: composite roi has no polygon", name);
        return Ok(Polygon::new());
    }

    let poly = match kind {
        RoiType::NoRoi => Polygon::new(),
        RoiType::Rect => {
            let (x1, y1, x2, y2) = if sub_pixel && version >= 223 {
                let (x, y) = (f64::from(rec.f32(18)?), f64::from(rec.f32(22)?));
                let (w, h) = (f64::from(rec.f32(26)?), f64::from(rec.f32(30)?));
                (x, y, x + w, y + h)
            } else {
                (left, top, right, bottom)
            };
            Polygon::from_xy(&[(x1,y1), (x2,y1), (x2,y2), (x1,y2)])
        }
        RoiType::Oval => {
            let (x, y, w, h) = if sub_pixel && version >= 223 {
                (f64::from(rec.f32(18)?), f64::from(rec.f32(22)?),
                 f64::from(rec.f32(26)?), f64::from(rec.f32(30)?))
            } else {
                (left, top, right - left, bottom - top)
            };
            oval(name, x, y, w, h)?
        }
        RoiType::Line => {
            let x1 = f64::from(rec.f32(18)?);
            let y1 = f64::from(rec.f32(22)?);
            let x2 = f64::from(rec.f32(26)?);
            let y2 = f64::from(rec.f32(30)?);
            Polygon::from_xy(&[(x1,y1), (x2,y2)])
        }
        _ => {
            debug_assert!(kind.has_coordinates());
            let mut n = usize::from(rec.u16(16)?);
            if n == 0 && version >= 228 {
                n = usize::try_from(rec.i32(18)?).unwrap_or(0);
            }
            coordinates(&rec, n, left, top, sub_pixel && version >= 222)?
        }
    };
    debug!("{}: {:?} with {} vertices", name, kind, poly.len());
    Ok(poly)
}

fn coordinates(rec: &Record, n: usize, left: f64, top: f64, sub_pixel: bool) -> Result<Polygon> {
    let per_point = if sub_pixel { 12 } else { 4 };
    let needed = n.checked_mul(per_point).and_then(|len| len.checked_add(HEADER_SIZE));
    if needed.map(|len| len > rec.data.len()).unwrap_or(true) {
        return Err(Error::invalid_roi(rec.name, format!("{} coordinates do not fit in {} bytes", n, rec.data.len())));
    }
    let xs = HEADER_SIZE;
    let ys = xs + 2 * n;
    let mut poly = Polygon { vertices: Vec::with_capacity(n) };
    if sub_pixel {
        let xf = HEADER_SIZE + 4 * n;
        let yf = xf + 4 * n;
        for i in 0 .. n {
            poly.push(f64::from(rec.f32(xf + 4 * i)?), f64::from(rec.f32(yf + 4 * i)?));
        }
    } else {
        for i in 0 .. n {
            poly.push(left + f64::from(rec.i16(xs + 2 * i)?), top + f64::from(rec.i16(ys + 2 * i)?));
        }
    }
    Ok(poly)
}

/// Polygon inscribed in the ellipse bounded by (x,y,w,h)
///
/// One vertex per pixel of circumference, at least 8 and at most
/// MAX_OVAL_VERTICES
fn oval(name: &str, x: f64, y: f64, w: f64, h: f64) -> Result<Polygon> {
    if ! [x, y, w, h].iter().all(|v| v.is_finite()) {
        return Err(Error::invalid_roi(name, "oval bounds are not finite"));
    }
    let (rx, ry) = (w / 2.0, h / 2.0);
    let (cx, cy) = (x + rx, y + ry);
    let (ax, ay) = (rx.abs(), ry.abs());
    let circumference = std::f64::consts::PI * (3.0 * (ax + ay) - ((3.0 * ax + ay) * (ax + 3.0 * ay)).sqrt());
    let n = if circumference.is_finite() {
        circumference.ceil().max(8.0).min(MAX_OVAL_VERTICES as f64) as usize
    } else {
        MAX_OVAL_VERTICES
    };
    let mut poly = Polygon { vertices: Vec::with_capacity(n) };
    for i in 0 .. n {
        let t = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
        poly.push(cx + rx * t.cos(), cy + ry * t.sin());
    }
    Ok(poly)
}

/// Encode a polygon as an ImageJ polygon record
///
/// Fractional coordinates are stored with sub-pixel resolution.
///
///     use roimask::{imagej, Polygon};
///
///     let tri = Polygon::from_xy(&[(1.,1.), (8.,2.), (4.,9.)]);
///     let data = imagej::encode(&tri);
///     assert_eq!(&data[0..4], b"Iout");
///     assert_eq!(imagej::decode("tri.roi", &data).unwrap(), tri);
///
pub fn encode(polygon: &Polygon) -> Vec<u8> {
    let n = polygon.len().min(usize::from(u16::MAX));
    let pts = &polygon.vertices[.. n];
    let sub_pixel = pts.iter().any(|v| v.x.fract() != 0.0 || v.y.fract() != 0.0);
    let clamp = |v: f64| v.floor().max(f64::from(i16::MIN)).min(f64::from(i16::MAX)) as i16;
    let left   = pts.iter().map(|v| clamp(v.x)).min().unwrap_or(0);
    let top    = pts.iter().map(|v| clamp(v.y)).min().unwrap_or(0);
    let right  = pts.iter().map(|v| clamp(v.x)).max().unwrap_or(0);
    let bottom = pts.iter().map(|v| clamp(v.y)).max().unwrap_or(0);

    let mut out = vec![0u8; HEADER_SIZE];
    out[0..4].copy_from_slice(MAGIC);
    out[4..6].copy_from_slice(&VERSION.to_be_bytes());
    out[8..10].copy_from_slice(&top.to_be_bytes());
    out[10..12].copy_from_slice(&left.to_be_bytes());
    out[12..14].copy_from_slice(&bottom.to_be_bytes());
    out[14..16].copy_from_slice(&right.to_be_bytes());
    out[16..18].copy_from_slice(&(n as u16).to_be_bytes());
    if sub_pixel {
        out[50..52].copy_from_slice(&SUB_PIXEL_RESOLUTION.to_be_bytes());
    }
    for v in pts {
        out.extend_from_slice(&clamp(v.x).wrapping_sub(left).to_be_bytes());
    }
    for v in pts {
        out.extend_from_slice(&clamp(v.y).wrapping_sub(top).to_be_bytes());
    }
    if sub_pixel {
        for v in pts {
            out.extend_from_slice(&(v.x as f32).to_be_bytes());
        }
        for v in pts {
            out.extend_from_slice(&(v.y as f32).to_be_bytes());
        }
    }
    out
}

/// Read an ordered ROI collection
///
/// `.zip` archives give every `.roi` entry in archive order; any other
/// file is decoded as a single ROI record.
pub fn read_archive<P: AsRef<Path>>(path: P) -> Result<Vec<Polygon>> {
    let path = path.as_ref();
    let is_zip = path.extension()
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if ! is_zip {
        let data = std::fs::read(path)?;
        return Ok(vec![decode(&path.display().to_string(), &data)?]);
    }
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut rois = Vec::with_capacity(archive.len());
    for i in 0 .. archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || ! entry.name().to_ascii_lowercase().ends_with(".roi") {
            continue;
        }
        let name = entry.name().to_string();
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        rois.push(decode(&name, &data)?);
    }
    debug!("{}: {} rois", path.display(), rois.len());
    Ok(rois)
}
