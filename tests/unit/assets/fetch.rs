use super::*;
use crate::assets::handles::{Blob, BlobRegistry};

fn fetcher() -> (Arc<BlobRegistry>, UriFetcher) {
    let reg = Arc::new(BlobRegistry::new());
    let f = UriFetcher::new(reg.clone());
    (reg, f)
}

#[test]
fn data_uri_base64_and_plain() {
    let (media, bytes) = parse_data_uri("data:image/png;base64,AQID").unwrap();
    assert_eq!(media, "image/png");
    assert_eq!(bytes, vec![1, 2, 3]);

    let (media, bytes) = parse_data_uri("data:,hello%20world").unwrap();
    assert_eq!(media, "text/plain;charset=US-ASCII");
    assert_eq!(bytes, b"hello world");

    assert!(parse_data_uri("data:image/png;base64").is_err());
    assert!(parse_data_uri("data:image/png;base64,@@@").unwrap_err().is_load());
}

#[test]
fn to_data_uri_roundtrips_through_fetch() {
    let (_, f) = fetcher();
    let uri = to_data_uri("image/png", &[9, 8, 7]);
    assert!(uri.starts_with("data:image/png;base64,"));
    assert_eq!(f.fetch(&uri).unwrap(), vec![9, 8, 7]);
}

#[test]
fn blob_urls_resolve_until_revoked() {
    let (reg, f) = fetcher();
    let url = reg.allocate(Blob::new(vec![4u8, 5], "image/png"));
    assert_eq!(f.fetch(url.as_str()).unwrap(), vec![4, 5]);

    reg.revoke(&url);
    let err = f.fetch(url.as_str()).unwrap_err();
    assert!(err.is_load());
}

#[test]
fn file_uri_and_plain_path() {
    let tmp = std::env::temp_dir().join(format!(
        "image_wire_fetch_test_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("a b.bin");
    std::fs::write(&path, [1u8, 2]).unwrap();

    let (_, f) = fetcher();
    assert_eq!(f.fetch(path.to_str().unwrap()).unwrap(), vec![1, 2]);

    if cfg!(unix) {
        let uri = format!("file://{}", path.to_str().unwrap().replace(' ', "%20"));
        assert_eq!(f.fetch(&uri).unwrap(), vec![1, 2]);
        let uri = format!("file://localhost{}", path.to_str().unwrap().replace(' ', "%20"));
        assert_eq!(f.fetch(&uri).unwrap(), vec![1, 2]);
    }

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_file_is_load_error() {
    let (_, f) = fetcher();
    let err = f.fetch("definitely/not/here.png").unwrap_err();
    assert!(err.is_load());
    assert!(err.to_string().contains("definitely/not/here.png"));
}

#[test]
fn remote_file_host_is_rejected() {
    let (_, f) = fetcher();
    assert!(f.fetch("file://example.com/x.png").unwrap_err().is_load());
}

#[test]
fn host_that_merely_starts_with_localhost_is_remote() {
    let (_, f) = fetcher();
    let err = f.fetch("file://localhostevil/x.png").unwrap_err();
    assert!(err.is_load(), "{err}");
    assert!(file_uri_to_path("file://localhostevil/x.png").is_err());
    assert!(file_uri_to_path("file://localhost/tmp/x.png").is_ok() || cfg!(windows));
}

#[test]
fn percent_escapes_decode_in_data_payloads() {
    assert_eq!(percent_decode("a%2Cb%zz%4"), b"a,b%zz%4");
    let (_, bytes) = parse_data_uri("data:text/plain,%F0%9F%8E%A8").unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "\u{1F3A8}");
}

#[cfg(not(feature = "http"))]
#[test]
fn http_without_feature_is_load_error() {
    let (_, f) = fetcher();
    assert!(f.fetch("https://example.com/x.png").unwrap_err().is_load());
}
