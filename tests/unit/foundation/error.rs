use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BrandframeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(BrandframeError::asset("x").to_string().contains("asset error:"));
    assert!(
        BrandframeError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        BrandframeError::export("x")
            .to_string()
            .contains("export error:")
    );
    assert!(
        BrandframeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk gone");
    let err = BrandframeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk gone"));
}
