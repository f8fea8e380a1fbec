use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        WireError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        WireError::load("a.png", "boom")
            .to_string()
            .contains("load error:")
    );
    assert!(WireError::encode("x").to_string().contains("encode error:"));
    assert!(
        WireError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn load_error_names_the_source() {
    let err = WireError::load("data:image/png;base64,AAAA", "truncated");
    let msg = err.to_string();
    assert!(msg.contains("data:image/png;base64,AAAA"));
    assert!(msg.contains("truncated"));
    assert!(err.is_load());
    assert!(!WireError::validation("x").is_load());
}

#[test]
fn long_data_uris_are_shortened() {
    let uri = format!("data:image/png;base64,{}", "A".repeat(500));
    let WireError::Load { source_uri, .. } = WireError::load(uri, "bad") else {
        panic!("expected load error");
    };
    assert!(source_uri.len() < 80);
    assert!(source_uri.ends_with("..."));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = WireError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
