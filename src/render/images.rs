//! Image XObject decoding.
//!
//! JPEG data goes through the `image` crate; everything lopdf can decompress
//! is unpacked here for gray, RGB, CMYK and indexed color at 1 to 16 bits per
//! component. JPEG 2000, JBIG2 and CCITT images are reported as unsupported.

use super::cmyk_to_rgb;
use crate::error::{Error, Result};
use crate::pdf::FormDocument;
use lopdf::{Object, Stream};
use tiny_skia::{IntSize, Pixmap};

/// Largest image, in pixels, that will be decoded.
pub(crate) const MAX_IMAGE_PIXELS: usize = 1 << 26;

/// Color model of an image's samples.
#[derive(Debug, Clone, PartialEq)]
enum ImageColors {
    Gray,
    Rgb,
    Cmyk,
    /// Palette lookup; entries are in the base color model, 8 bits each
    Indexed { base: Box<ImageColors>, palette: Vec<u8> },
}

impl ImageColors {
    fn components(&self) -> usize {
        match self {
            ImageColors::Gray | ImageColors::Indexed { .. } => 1,
            ImageColors::Rgb => 3,
            ImageColors::Cmyk => 4,
        }
    }

    /// RGB for normalized component values.
    fn to_rgb(&self, values: &[f32]) -> [u8; 3] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match (self, values) {
            (ImageColors::Gray, [g, ..]) => [channel(*g); 3],
            (ImageColors::Rgb, [r, g, b, ..]) => [channel(*r), channel(*g), channel(*b)],
            (ImageColors::Cmyk, [c, m, y, k, ..]) => {
                let (r, g, b) = cmyk_to_rgb(*c, *m, *y, *k);
                [channel(r), channel(g), channel(b)]
            },
            _ => [0, 0, 0],
        }
    }
}

/// Decode an image XObject into an opaque (or soft-masked) pixmap.
pub(crate) fn decode_image(doc: &FormDocument, stream: &Stream) -> Result<Pixmap> {
    let filters = filter_names(doc, stream);
    let mut rgba = match filters.last().map(Vec::as_slice) {
        Some(b"DCTDecode") | Some(b"DCT") => decode_jpeg(stream, filters.len())?,
        Some(b"JPXDecode") | Some(b"JBIG2Decode") | Some(b"CCITTFaxDecode") | Some(b"CCF") => {
            let name = filters.last().map(|f| String::from_utf8_lossy(f).into_owned());
            return Err(Error::Render(format!("unsupported image filter {}", name.unwrap_or_default())));
        },
        _ => decode_samples(doc, stream)?,
    };

    if let Some(mask) = doc.get_resolved(&stream.dict, b"SMask").and_then(|o| o.as_stream().ok()) {
        match decode_samples(doc, mask) {
            Ok(alpha) if alpha.width == rgba.width && alpha.height == rgba.height => {
                apply_soft_mask(&mut rgba.data, &alpha.data);
            },
            Ok(_) => log::debug!("Soft mask size differs from its image, ignoring it"),
            Err(e) => log::debug!("Soft mask could not be decoded: {}", e),
        }
    }

    let size = IntSize::from_wh(rgba.width, rgba.height)
        .ok_or_else(|| Error::Render("image has zero size".to_string()))?;
    Pixmap::from_vec(rgba.data, size).ok_or_else(|| Error::Render("image data size mismatch".to_string()))
}

/// Premultiplied RGBA pixels.
struct RgbaData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

fn filter_names(doc: &FormDocument, stream: &Stream) -> Vec<Vec<u8>> {
    match doc.get_resolved(&stream.dict, b"Filter") {
        Some(Object::Name(name)) => vec![name.clone()],
        Some(Object::Array(items)) => items
            .iter()
            .filter_map(|item| doc.resolve(item)?.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

fn decode_jpeg(stream: &Stream, filter_count: usize) -> Result<RgbaData> {
    // Filters before DCTDecode (rare) have to be undone first
    let bytes = if filter_count > 1 {
        let mut outer = stream.clone();
        strip_last_filter(&mut outer);
        outer.decompressed_content()?
    } else {
        stream.content.clone()
    };

    let image = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg)?.to_rgba8();
    Ok(RgbaData {
        width: image.width(),
        height: image.height(),
        data: image.into_raw(),
    })
}

fn strip_last_filter(stream: &mut Stream) {
    if let Ok(Object::Array(filters)) = stream.dict.get_mut(b"Filter") {
        filters.pop();
    }
}

fn decode_samples(doc: &FormDocument, stream: &Stream) -> Result<RgbaData> {
    let dict = &stream.dict;
    let number = |key: &[u8]| doc.get_resolved(dict, key).and_then(|o| o.as_i64().ok());
    let width = number(b"Width").filter(|w| *w > 0).ok_or_else(|| Error::Render("image has no width".into()))?;
    let height = number(b"Height").filter(|h| *h > 0).ok_or_else(|| Error::Render("image has no height".into()))?;
    let bpc = number(b"BitsPerComponent").unwrap_or(8);
    if !matches!(bpc, 1 | 2 | 4 | 8 | 16) {
        return Err(Error::Render(format!("unsupported bits per component {}", bpc)));
    }
    let colors = match doc.get_resolved(dict, b"ColorSpace") {
        Some(obj) => image_colors(doc, obj).ok_or_else(|| Error::Render("unsupported image color space".into()))?,
        None => ImageColors::Gray,
    };

    let data = stream.get_plain_content()?;
    let (width, height, bpc) = (width as usize, height as usize, bpc as usize);
    let comps = colors.components();
    check_sample_size(width, height, comps, bpc, data.len())?;
    let samples = unpack_samples(&data, width, height, comps, bpc);
    let max = ((1u32 << bpc) - 1) as f32;

    let mut rgba = Vec::with_capacity(width * height * 4);
    let mut values = [0.0f32; 4];
    for pixel in samples.chunks(comps) {
        let rgb = match &colors {
            ImageColors::Indexed { base, palette } => {
                let n = base.components();
                let start = pixel[0] as usize * n;
                match palette.get(start..start + n) {
                    Some(entry) => {
                        for (slot, byte) in values.iter_mut().zip(entry) {
                            *slot = f32::from(*byte) / 255.0;
                        }
                        base.to_rgb(&values[..n])
                    },
                    None => [0, 0, 0],
                }
            },
            _ => {
                for (slot, sample) in values.iter_mut().zip(pixel) {
                    *slot = f32::from(*sample) / max;
                }
                colors.to_rgb(&values[..comps])
            },
        };
        rgba.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }

    Ok(RgbaData {
        width: width as u32,
        height: height as u32,
        data: rgba,
    })
}

fn image_colors(doc: &FormDocument, obj: &Object) -> Option<ImageColors> {
    match obj {
        Object::Name(name) => match name.as_slice() {
            b"DeviceGray" | b"CalGray" | b"G" => Some(ImageColors::Gray),
            b"DeviceRGB" | b"CalRGB" | b"RGB" => Some(ImageColors::Rgb),
            b"DeviceCMYK" | b"CMYK" => Some(ImageColors::Cmyk),
            _ => None,
        },
        Object::Array(items) => {
            let family = items.first().and_then(|o| o.as_name().ok())?;
            match family {
                b"ICCBased" => {
                    let profile = doc.resolve(items.get(1)?)?.as_stream().ok()?;
                    match profile.dict.get(b"N").and_then(Object::as_i64).unwrap_or(3) {
                        1 => Some(ImageColors::Gray),
                        4 => Some(ImageColors::Cmyk),
                        _ => Some(ImageColors::Rgb),
                    }
                },
                b"CalGray" => Some(ImageColors::Gray),
                b"CalRGB" => Some(ImageColors::Rgb),
                b"Indexed" | b"I" => {
                    let base = image_colors(doc, doc.resolve(items.get(1)?)?)?;
                    let palette = match doc.resolve(items.get(3)?)? {
                        Object::String(bytes, _) => bytes.clone(),
                        Object::Stream(s) => s.get_plain_content().ok()?,
                        _ => return None,
                    };
                    Some(ImageColors::Indexed {
                        base: Box::new(base),
                        palette,
                    })
                },
                _ => None,
            }
        },
        _ => None,
    }
}

/// Reject declared dimensions that overflow, exceed [`MAX_IMAGE_PIXELS`] or
/// need more bytes than the stream holds.
fn check_sample_size(width: usize, height: usize, comps: usize, bpc: usize, available: usize) -> Result<()> {
    let pixels = width
        .checked_mul(height)
        .filter(|p| *p <= MAX_IMAGE_PIXELS)
        .ok_or_else(|| Error::Render(format!("image of {}x{} pixels is too large", width, height)))?;
    let needed = width
        .checked_mul(comps)
        .and_then(|n| n.checked_mul(bpc))
        .map(|bits| bits.div_ceil(8))
        .and_then(|stride| stride.checked_mul(height))
        .ok_or_else(|| Error::Render(format!("image of {} pixels is too large", pixels)))?;
    if needed > available {
        return Err(Error::Render(format!(
            "image needs {} bytes of samples but the stream has {}",
            needed, available
        )));
    }
    Ok(())
}

/// Raw sample values, row by row. Rows start on byte boundaries; short data
/// reads as zero.
fn unpack_samples(data: &[u8], width: usize, height: usize, comps: usize, bpc: usize) -> Vec<u16> {
    let per_row = width * comps;
    let stride = (per_row * bpc).div_ceil(8);
    let mut out = Vec::with_capacity(per_row * height);

    for row in 0..height {
        let row_data = data.get(row * stride..).unwrap_or(&[]);
        let byte = |i: usize| u16::from(row_data.get(i).copied().unwrap_or(0));
        for i in 0..per_row {
            let value = match bpc {
                8 => byte(i),
                16 => (byte(2 * i) << 8) | byte(2 * i + 1),
                _ => {
                    let bit = i * bpc;
                    let shift = 8 - bpc - (bit % 8);
                    (byte(bit / 8) >> shift) & ((1 << bpc) - 1)
                },
            };
            out.push(value);
        }
    }
    out
}

/// Use a decoded soft mask's gray level as alpha and premultiply.
fn apply_soft_mask(rgba: &mut [u8], mask_rgba: &[u8]) {
    for (pixel, mask) in rgba.chunks_exact_mut(4).zip(mask_rgba.chunks_exact(4)) {
        let alpha = u16::from(mask[0]);
        for channel in &mut pixel[..3] {
            *channel = ((u16::from(*channel) * alpha + 127) / 255) as u8;
        }
        pixel[3] = alpha as u8;
    }
}
