use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FanwallError::image_load("x")
            .to_string()
            .contains("image load error:")
    );
    assert!(
        FanwallError::theme_resolution("x")
            .to_string()
            .contains("theme resolution error:")
    );
    assert!(
        FanwallError::font_load("x")
            .to_string()
            .contains("font load error:")
    );
    assert!(
        FanwallError::date_parse("x")
            .to_string()
            .contains("date parse error:")
    );
    assert!(
        FanwallError::surface_unavailable("x")
            .to_string()
            .contains("surface unavailable:")
    );
    assert!(
        FanwallError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        FanwallError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn only_surface_errors_are_fatal() {
    assert!(FanwallError::surface_unavailable("0x0").is_fatal());
    assert!(!FanwallError::image_load("logo").is_fatal());
    assert!(!FanwallError::theme_resolution("nope").is_fatal());
    assert!(!FanwallError::font_load("bebas").is_fatal());
    assert!(!FanwallError::date_parse("??").is_fatal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FanwallError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
