use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CutplayError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CutplayError::animation("x")
            .to_string()
            .contains("animation error:")
    );
    assert!(
        CutplayError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(CutplayError::asset("x").to_string().contains("asset error:"));
    assert!(
        CutplayError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk gone");
    let err = CutplayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk gone"));
}
