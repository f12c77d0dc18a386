//! End-to-end vectors: operation descriptor through builder and signer.

use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, DATE};
use http::Method;
use pretty_assertions::assert_eq;
use qingstor_signer::{Config, Credential, Operation, RequestBuilder, Signer};

fn test_config() -> Config {
    Config::default()
}

fn test_credential() -> Credential {
    Credential::new("ACCESS_KEY_ID", "SECRET_ACCESS_KEY")
}

/// A GET on an object, with the `Date` pinned through the descriptor so the
/// signature is reproducible.
fn get_object_operation() -> Operation {
    Operation::new(Method::GET, "/<bucket-name>/<object-key>")
        .with_header("Date", "Wed, 10 Dec 2014 17:20:31 GMT")
        .with_property("zone", "pek3a")
        .with_property("bucket-name", "test_bucket")
        .with_property("object-key", "test_object")
}

#[test]
fn test_build_then_sign() {
    let config = test_config();
    let operation = get_object_operation();

    let (mut parts, body) = RequestBuilder::new(&config, &operation)
        .parse()
        .unwrap()
        .into_parts();

    assert!(body.is_none());
    assert_eq!(
        parts.uri.to_string(),
        "https://pek3a.qingstor.com:443/test_bucket/test_object"
    );

    Signer::new(test_credential()).sign(&mut parts).unwrap();

    // string to sign:
    //   GET\n\napplication/octet-stream\nWed, 10 Dec 2014 17:20:31 GMT\n
    //   /test_bucket/test_object
    assert_eq!(
        parts.headers.get(AUTHORIZATION).unwrap(),
        "QS ACCESS_KEY_ID:RUsxZg5iWkWmYaE5CJJKzBjpA1xZrRz8s/tJBmS2uek="
    );
}

#[test]
fn test_build_then_query_sign() {
    let config = test_config();
    let operation = get_object_operation();

    let (mut parts, _) = RequestBuilder::new(&config, &operation)
        .parse()
        .unwrap()
        .into_parts();

    Signer::new(test_credential())
        .query_sign(&mut parts, 1640587200)
        .unwrap();

    assert_eq!(
        parts.uri.to_string(),
        "https://pek3a.qingstor.com:443/test_bucket/test_object\
         ?signature=WHtr6Vo4IImvXZKkkReNuVK%2B0rH5OJd5L9X9kTO1Wrg%3D\
         &access_key_id=ACCESS_KEY_ID\
         &expires=1640587200"
    );
    assert!(!parts.headers.contains_key(AUTHORIZATION));
}

#[test]
fn test_put_object_with_copy_source() {
    let config = test_config();
    let operation = Operation::new(Method::PUT, "/<bucket-name>/<object-key>?acl")
        .with_header("Date", "Wed, 10 Dec 2014 17:20:31 GMT")
        .with_header("x-qs-copy-source", "/mybucket/music.mp3")
        .with_property("zone", "pek3a")
        .with_property("bucket-name", "mybucket")
        .with_property("object-key", "photo.jpeg");

    let (mut parts, _) = RequestBuilder::new(&config, &operation)
        .parse()
        .unwrap()
        .into_parts();

    // Content type is inferred from the object key's extension.
    assert_eq!(parts.headers.get(CONTENT_TYPE).unwrap(), "image/jpeg");

    Signer::new(test_credential()).sign(&mut parts).unwrap();

    assert_eq!(
        parts.headers.get(AUTHORIZATION).unwrap(),
        "QS ACCESS_KEY_ID:C/XKyD/75nozRb7TRqEeUfAkgUASyUd3v57k2n8XXwc="
    );
}

#[test]
fn test_elements_become_json_body() {
    let config = test_config();
    let operation = Operation::new(Method::POST, "/<bucket-name>?delete")
        .with_header("Date", "Wed, 10 Dec 2014 17:20:31 GMT")
        .with_property("zone", "pek3a")
        .with_property("bucket-name", "mybucket")
        .with_element("quiet", serde_json::json!(false));

    let request = RequestBuilder::new(&config, &operation).parse().unwrap();

    let body = request.body().as_ref().unwrap();
    assert_eq!(body.as_ref(), br#"{"quiet":false}"#);
    assert_eq!(
        request.headers().get(CONTENT_LENGTH).unwrap(),
        &body.len().to_string()
    );
}

#[test]
fn test_descriptor_date_survives_to_signature() {
    let config = test_config();
    let operation = get_object_operation();

    let request = RequestBuilder::new(&config, &operation).parse().unwrap();

    assert_eq!(
        request.headers().get(DATE).unwrap(),
        "Wed, 10 Dec 2014 17:20:31 GMT"
    );
}

#[test]
fn test_presigned_url_keeps_sub_resource_params() {
    let config = test_config();
    let operation = Operation::new(Method::GET, "/<bucket-name>?uploads")
        .with_header("Date", "Wed, 10 Dec 2014 17:20:31 GMT")
        .with_property("zone", "pek3a")
        .with_property("bucket-name", "mybucket");

    let (mut parts, _) = RequestBuilder::new(&config, &operation)
        .parse()
        .unwrap()
        .into_parts();

    Signer::new(test_credential())
        .query_sign(&mut parts, 1640587200)
        .unwrap();

    let uri = parts.uri.to_string();
    assert!(uri.contains("?uploads&signature="));
    assert!(uri.ends_with("&access_key_id=ACCESS_KEY_ID&expires=1640587200"));
}
