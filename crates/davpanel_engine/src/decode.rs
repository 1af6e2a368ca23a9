use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode a listing body into UTF-8 using: BOM -> Content-Type charset -> chardetng guess.
///
/// Directory pages from older servers are often served in legacy encodings
/// (GBK, Shift_JIS, windows-1252) without a charset parameter.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedBody, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

/// Like [`decode_body`], but never fails: undecodable input is replaced lossily.
pub(crate) fn decode_body_lossy(bytes: &[u8], content_type: Option<&str>) -> String {
    match decode_body(bytes, content_type) {
        Ok(decoded) => decoded.text,
        Err(err) => {
            panel_logging::panel_warn!("{}; falling back to lossy utf-8", err);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let part = part.trim();
            let (key, value) = part.split_once('=')?;
            if !key.trim().eq_ignore_ascii_case("charset") {
                return None;
            }
            Some(value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedBody, DecodeError> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "decoding error".into(),
        });
    }
    Ok(DecodedBody {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_from_content_type_wins_over_detection() {
        let bytes = [0xC4, 0xE3, 0xBA, 0xC3]; // "你好" in GBK
        let decoded = decode_body(&bytes, Some("text/html; Charset=\"gbk\"")).unwrap();
        assert_eq!(decoded.text, "你好");
        assert_eq!(decoded.encoding_label, "GBK");
    }

    #[test]
    fn bom_selects_utf8() {
        let bytes = b"\xEF\xBB\xBF<a href=\"x\">x</a>";
        let decoded = decode_body(bytes, Some("text/html; charset=iso-8859-1")).unwrap();
        assert_eq!(decoded.encoding_label, "UTF-8");
        assert_eq!(decoded.text, "<a href=\"x\">x</a>");
    }

    #[test]
    fn invalid_utf8_is_replaced_lossily() {
        let bytes = b"ok \xFF\xFE\xFD";
        let text = decode_body_lossy(bytes, Some("text/html; charset=utf-8"));
        assert!(text.starts_with("ok "));
    }
}
