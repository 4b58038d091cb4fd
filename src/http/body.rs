use crate::collection::{Body, BodyMode, Field};

/// 编码后的请求体
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedBody {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// 按声明的 mode 编码请求体
///
/// - raw: 逐字节透传
/// - formdata: multipart 编码，只写入 enabled 字段，保持声明顺序
/// - urlencoded: 标准表单编码，只写入 enabled 字段，同名 key 保留多值
/// - none: 无请求体
pub fn encode_body(body: &Body, boundary: &str) -> Option<EncodedBody> {
    match body.mode {
        BodyMode::None => None,
        BodyMode::Raw => Some(EncodedBody {
            content_type: None,
            bytes: body.raw.clone().into_bytes(),
        }),
        BodyMode::Formdata => Some(encode_multipart(&body.formdata, boundary)),
        BodyMode::Urlencoded => Some(encode_urlencoded(&body.urlencoded)),
    }
}

fn enabled(fields: &[Field]) -> impl Iterator<Item = &Field> {
    fields.iter().filter(|field| field.enabled)
}

fn encode_urlencoded(fields: &[Field]) -> EncodedBody {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for field in enabled(fields) {
        serializer.append_pair(&field.key, &field.value);
    }
    EncodedBody {
        content_type: Some("application/x-www-form-urlencoded".to_string()),
        bytes: serializer.finish().into_bytes(),
    }
}

fn encode_multipart(fields: &[Field], boundary: &str) -> EncodedBody {
    let mut bytes = Vec::new();
    for field in enabled(fields) {
        bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        bytes.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                field.key.replace('"', "\\\"")
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(field.value.as_bytes());
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    EncodedBody {
        content_type: Some(format!("multipart/form-data; boundary={boundary}")),
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str, value: &str, enabled: bool) -> Field {
        Field {
            key: key.to_string(),
            value: value.to_string(),
            enabled,
        }
    }

    #[test]
    fn test_none_mode_has_no_body() {
        assert_eq!(encode_body(&Body::default(), "b"), None);
    }

    #[test]
    fn test_raw_passthrough() {
        let body = Body {
            mode: BodyMode::Raw,
            raw: "{\"a\": 1}".to_string(),
            ..Body::default()
        };
        let encoded = encode_body(&body, "b").unwrap();
        assert_eq!(encoded.bytes, b"{\"a\": 1}");
        assert_eq!(encoded.content_type, None);
    }

    #[test]
    fn test_urlencoded_enabled_only_in_order() {
        let body = Body {
            mode: BodyMode::Urlencoded,
            urlencoded: vec![
                field("a", "1", true),
                field("skip", "x", false),
                field("b", "2", true),
            ],
            ..Body::default()
        };
        let encoded = encode_body(&body, "b").unwrap();
        assert_eq!(encoded.bytes, b"a=1&b=2");
        assert_eq!(
            encoded.content_type.as_deref(),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_urlencoded_is_idempotent() {
        let body = Body {
            mode: BodyMode::Urlencoded,
            urlencoded: vec![field("k", "v 1", true), field("k", "v 2", true)],
            ..Body::default()
        };
        let first = encode_body(&body, "b").unwrap();
        let second = encode_body(&body, "b").unwrap();
        assert_eq!(first, second);
        // 同名 key 多值保留
        assert_eq!(first.bytes, b"k=v+1&k=v+2");
    }

    #[test]
    fn test_multipart_enabled_only_with_closing_boundary() {
        let body = Body {
            mode: BodyMode::Formdata,
            formdata: vec![
                field("a", "1", true),
                field("skip", "x", false),
                field("b", "2", true),
            ],
            ..Body::default()
        };
        let encoded = encode_body(&body, "XYZ").unwrap();
        let text = String::from_utf8(encoded.bytes).unwrap();

        assert_eq!(
            text,
            "--XYZ\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n\
             --XYZ\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\n2\r\n\
             --XYZ--\r\n"
        );
        assert_eq!(
            encoded.content_type.as_deref(),
            Some("multipart/form-data; boundary=XYZ")
        );
        assert!(!text.contains("skip"));
    }
}
