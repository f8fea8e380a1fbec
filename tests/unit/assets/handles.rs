use super::*;

#[test]
fn allocate_resolve_revoke() {
    let reg = BlobRegistry::new();
    assert!(reg.is_empty());

    let url = reg.allocate(Blob::new(vec![1u8, 2, 3], "image/png"));
    assert!(url.as_str().starts_with("blob:image-wire/"));
    assert_eq!(reg.len(), 1);

    let blob = reg.resolve(&url).unwrap();
    assert_eq!(blob.as_bytes(), &[1, 2, 3]);
    assert_eq!(blob.mime, "image/png");

    assert!(reg.revoke(&url));
    assert!(!reg.revoke(&url));
    assert!(reg.resolve(&url).is_none());
    assert!(reg.is_empty());
}

#[test]
fn urls_are_unique_per_allocation() {
    let reg = BlobRegistry::with_origin("test");
    let a = reg.allocate(Blob::new(vec![0u8], "image/png"));
    let b = reg.allocate(Blob::new(vec![0u8], "image/png"));
    assert_ne!(a, b);
    assert_eq!(a.as_str(), "blob:test/0");
    assert_eq!(b.as_str(), "blob:test/1");
}

#[test]
fn object_url_parse_requires_blob_scheme() {
    assert!(ObjectUrl::parse("blob:x/1").is_some());
    assert!(ObjectUrl::parse("data:,x").is_none());
}
