use segtrie::server::decode_body;
use segtrie::{Params, Value};

#[test]
fn test_json_body_reachable_through_data() {
    let payload = decode_body(
        br#"{"state_hash":"7amada","retries":3,"ratio":0.5}"#,
        Some("application/json; charset=utf-8"),
    );
    let p = Params::new(payload);
    assert_eq!(p.data().get("state_hash").unwrap().as_str(), Ok("7amada"));
    assert_eq!(p.data().get("retries").unwrap().long(), Ok(3));
    assert_eq!(p.data().get("ratio").unwrap().double(), Ok(0.5));
}

#[test]
fn test_scalar_json_body() {
    let p = Params::new(decode_body(b"42", Some("application/json")));
    assert_eq!(p.data().long(), Ok(42));
}

#[test]
fn test_multipart_fields_are_strings() {
    let body = b"--b0\r\n\
Content-Disposition: form-data; name=\"count\"\r\n\r\n\
12\r\n\
--b0\r\n\
Content-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\n\
Content-Type: image/png\r\n\r\n\
\x89PNG\r\n\
--b0--\r\n";
    let p = Params::new(decode_body(body, Some("multipart/form-data; boundary=b0")));
    let count = p.data().get("count").unwrap();
    assert_eq!(count.as_str(), Ok("12"));
    assert_eq!(count.as_integer(), Ok(12));
    assert!(p.data().get("avatar").unwrap().is_null());
}

#[test]
fn test_raw_body_is_string_payload() {
    let p = Params::new(decode_body(b"hello", Some("text/plain; charset=utf-8")));
    assert_eq!(p.data().as_str(), Ok("hello"));
}

#[test]
fn test_invalid_utf8_raw_body_is_lossy() {
    let payload = decode_body(&[0x66, 0x6f, 0xff], Some("application/octet-stream"));
    assert_eq!(payload, Value::from("fo\u{fffd}"));
}

#[test]
fn test_empty_raw_body_is_empty_string() {
    assert_eq!(decode_body(b"", Some("text/plain")), Value::from(""));

    let p = Params::new(decode_body(b"", None));
    assert_eq!(p.data().as_str(), Ok(""));
    assert_eq!(p.data().to_string_lossy(), "");
}

#[test]
fn test_empty_json_body_is_null() {
    let p = Params::new(decode_body(b"", Some("application/json; charset=utf-8")));
    assert!(p.data().is_null());
}
