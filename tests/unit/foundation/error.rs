use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VizError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        VizError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(VizError::render("x").to_string().contains("render error:"));
    assert!(VizError::encode("x").to_string().contains("encode error:"));
    assert!(
        VizError::analysis("x")
            .to_string()
            .contains("analysis error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VizError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(!err.is_config());
}
