use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use byteorder::{ReadBytesExt, WriteBytesExt};
use image::{ImageFormat, RgbaImage};
use std::io::{Cursor, Read};

use crate::error::WatermarkError;
use crate::result::Result;

/// The content of an invisible watermark, also what a detection recovers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Image(RgbaImage),
}

/// Outcome of a successful detection, exactly one kind of payload
pub type DetectionResult = Payload;

impl Payload {
    pub fn text(&self) -> Option<&str> {
        match self {
            Payload::Text(t) => Some(t.as_str()),
            Payload::Image(_) => None,
        }
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            Payload::Text(_) => None,
            Payload::Image(i) => Some(i),
        }
    }

    /// serializes the payload into the bytes that get framed
    ///
    /// - text: the UTF-8 bytes as is
    /// - image: 32 bit big endian length header followed by the PNG encoded image
    pub fn to_body_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Payload::Text(text) => Ok(text.as_bytes().to_vec()),
            Payload::Image(image) => {
                let mut png = Cursor::new(Vec::new());
                image.write_to(&mut png, ImageFormat::Png).map_err(|e| {
                    log::error!("Error encoding image payload: {e}");
                    WatermarkError::ImageEncodingError
                })?;
                let png = png.into_inner();

                let mut buffer = Vec::with_capacity(png.len() + 4);
                buffer.write_u32::<byteorder::BigEndian>(png.len() as u32)?;
                buffer.extend_from_slice(&png[..]);

                Ok(buffer)
            }
        }
    }

    pub fn text_from_body_bytes(body: Vec<u8>) -> Result<Self> {
        let text = String::from_utf8(body)
            .map_err(|e| WatermarkError::DecodeMalformed(format!("invalid text data: {e}")))?;

        Ok(Payload::Text(text))
    }

    pub fn image_from_body_bytes(body: &[u8]) -> Result<Self> {
        let mut content = Cursor::new(body);
        let len = content
            .read_u32::<byteorder::BigEndian>()
            .map_err(|_| WatermarkError::DecodeMalformed("missing image length header".into()))?
            as usize;
        let remaining = body.len() - content.position() as usize;
        if len > remaining {
            return Err(WatermarkError::DecodeMalformed(format!(
                "image length {len} exceeds the {remaining} bytes available"
            )));
        }
        let mut png = vec![0; len];
        content.read_exact(&mut png)?;

        let image = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .map_err(|e| WatermarkError::DecodeMalformed(format!("invalid image data: {e}")))?
            .to_rgba8();

        Ok(Payload::Image(image))
    }
}

/// splits bytes into bits, most significant bit first, one bit per `u8`
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut reader = BitReader::endian(Cursor::new(bytes), BigEndian);
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    while let Ok(bit) = reader.read_bit() {
        bits.push(u8::from(bit));
    }

    bits
}

/// the inverse of `bytes_to_bits`
pub fn bits_to_bytes(bits: &[u8]) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(WatermarkError::DecodeMalformed(format!(
            "{} bits do not form whole bytes",
            bits.len()
        )));
    }
    let mut writer = BitWriter::endian(Vec::with_capacity(bits.len() / 8), BigEndian);
    for bit in bits {
        match bit {
            0 => writer.write_bit(false)?,
            1 => writer.write_bit(true)?,
            other => {
                return Err(WatermarkError::DecodeMalformed(format!(
                    "symbol {other} is not a bit"
                )))
            }
        }
    }

    Ok(writer.into_writer())
}
