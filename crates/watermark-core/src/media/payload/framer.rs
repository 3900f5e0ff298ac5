//! Wraps payload bits between marker sequences and finds them again.
//!
//! A frame is `prefix + body + suffix`, every element one symbol (`u8`). The
//! body consists of bits only. The LSB codec carries bits, so its markers are
//! bit patterns; the DCT codec carries decimal digits, so its markers use the
//! digits 2-9 that never occur inside a body.
//!
//! Markers are not escaped: a body that literally contains the suffix ends
//! the frame early.

use log::debug;

use super::codec::{bits_to_bytes, bytes_to_bits, Payload};
use crate::error::WatermarkError;
use crate::result::Result;

/// the four delimiters of one codec, written as strings of decimal digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMarkers {
    pub text_prefix: &'static str,
    pub text_suffix: &'static str,
    pub image_prefix: &'static str,
    pub image_suffix: &'static str,
}

pub const LSB_MARKERS: FrameMarkers = FrameMarkers {
    text_prefix: "11100010101101001100101011100101",
    text_suffix: "10011101010010110011010100011010",
    image_prefix: "11001010011100011010110001110010",
    image_suffix: "00110101100011100101001110001101",
};

pub const DCT_MARKERS: FrameMarkers = FrameMarkers {
    text_prefix: "5678567856",
    text_suffix: "8765876587",
    image_prefix: "3949394939",
    image_suffix: "9393929392",
};

fn symbols(marker: &str) -> Vec<u8> {
    marker.bytes().map(|b| b - b'0').collect()
}

/// turns a payload into the full symbol sequence to embed
pub fn frame(payload: &Payload, markers: &FrameMarkers) -> Result<Vec<u8>> {
    let (prefix, suffix) = match payload {
        Payload::Text(_) => (markers.text_prefix, markers.text_suffix),
        Payload::Image(_) => (markers.image_prefix, markers.image_suffix),
    };
    let body = bytes_to_bits(&payload.to_body_bytes()?);

    let mut framed = symbols(prefix);
    framed.reserve(body.len() + suffix.len());
    framed.extend(body);
    framed.extend(symbols(suffix));

    Ok(framed)
}

/// finds the first frame in `candidate` and decodes its body,
/// text frames take precedence over image frames
pub fn unframe(candidate: &[u8], markers: &FrameMarkers) -> Result<Payload> {
    if let Some(body) = between(candidate, markers.text_prefix, markers.text_suffix) {
        debug!("found a text frame with {} body symbols", body.len());
        return match Payload::text_from_body_bytes(bits_to_bytes(body)?)? {
            Payload::Text(text) if text.is_empty() => Err(WatermarkError::MarkersNotFound),
            payload => Ok(payload),
        };
    }
    if let Some(body) = between(candidate, markers.image_prefix, markers.image_suffix) {
        debug!("found an image frame with {} body symbols", body.len());
        return Payload::image_from_body_bytes(&bits_to_bytes(body)?);
    }

    Err(WatermarkError::MarkersNotFound)
}

/// the symbols strictly between the first `prefix` and the first `suffix` after it
fn between<'a>(candidate: &'a [u8], prefix: &str, suffix: &str) -> Option<&'a [u8]> {
    let prefix = symbols(prefix);
    let suffix = symbols(suffix);
    let start = find(candidate, &prefix)? + prefix.len();
    let len = find(&candidate[start..], &suffix)?;

    Some(&candidate[start..start + len])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::prepare_5x5_image;

    #[test]
    fn should_wrap_text_bits_between_the_text_markers() {
        let framed = frame(&Payload::Text("A".into()), &LSB_MARKERS).unwrap();

        assert_eq!(framed.len(), 32 + 8 + 32);
        assert_eq!(&framed[..32], &symbols(LSB_MARKERS.text_prefix)[..]);
        assert_eq!(&framed[32..40], &[0, 1, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&framed[40..], &symbols(LSB_MARKERS.text_suffix)[..]);
    }

    #[test]
    fn should_find_a_frame_surrounded_by_noise() {
        for markers in [LSB_MARKERS, DCT_MARKERS] {
            let mut candidate = vec![0, 0, 1, 0];
            candidate.extend(frame(&Payload::Text("hello".into()), &markers).unwrap());
            candidate.extend([1, 1, 0, 1, 0, 0]);

            let payload = unframe(&candidate, &markers).unwrap();
            assert_eq!(payload.text(), Some("hello"));
        }
    }

    #[test]
    fn should_find_image_frames() {
        let image = prepare_5x5_image();
        let framed = frame(&Payload::Image(image.clone()), &DCT_MARKERS).unwrap();

        let payload = unframe(&framed, &DCT_MARKERS).unwrap();
        assert_eq!(payload.image(), Some(&image));
    }

    #[test]
    fn should_prefer_the_text_frame() {
        let mut candidate = frame(&Payload::Image(prepare_5x5_image()), &DCT_MARKERS).unwrap();
        candidate.extend(frame(&Payload::Text("text wins".into()), &DCT_MARKERS).unwrap());

        let payload = unframe(&candidate, &DCT_MARKERS).unwrap();
        assert_eq!(payload.text(), Some("text wins"));
    }

    #[test]
    fn should_take_the_first_prefix_and_the_first_suffix_after_it() {
        let mut candidate = symbols(DCT_MARKERS.text_suffix);
        candidate.extend(frame(&Payload::Text("a".into()), &DCT_MARKERS).unwrap());
        candidate.extend(frame(&Payload::Text("b".into()), &DCT_MARKERS).unwrap());

        let payload = unframe(&candidate, &DCT_MARKERS).unwrap();
        assert_eq!(payload.text(), Some("a"));
    }

    #[test]
    fn should_not_guess_without_a_suffix() {
        let mut candidate = frame(&Payload::Text("hello".into()), &LSB_MARKERS).unwrap();
        candidate.truncate(candidate.len() - 1);

        let result = unframe(&candidate, &LSB_MARKERS);
        assert!(matches!(result, Err(WatermarkError::MarkersNotFound)));
    }

    #[test]
    fn should_report_nothing_found_for_plain_data() {
        let result = unframe(&[0; 4096], &LSB_MARKERS);
        assert!(matches!(result, Err(WatermarkError::MarkersNotFound)));

        let result = unframe(&[], &DCT_MARKERS);
        assert!(matches!(result, Err(WatermarkError::MarkersNotFound)));
    }

    #[test]
    fn should_treat_an_empty_text_as_not_found() {
        let mut candidate = symbols(DCT_MARKERS.text_prefix);
        candidate.extend(symbols(DCT_MARKERS.text_suffix));

        let result = unframe(&candidate, &DCT_MARKERS);
        assert!(matches!(result, Err(WatermarkError::MarkersNotFound)));
    }

    #[test]
    fn should_fail_on_a_malformed_body() {
        let mut candidate = symbols(DCT_MARKERS.text_prefix);
        candidate.extend([0, 1, 1]);
        candidate.extend(symbols(DCT_MARKERS.text_suffix));

        let result = unframe(&candidate, &DCT_MARKERS);
        assert!(matches!(result, Err(WatermarkError::DecodeMalformed(_))));
    }
}
