use super::*;
use serde_json::json;

#[test]
fn gradient_theme_parses_with_flattened_kind() {
    let theme: ThemeDescriptor = serde_json::from_value(json!({
        "id": "timbers",
        "label": "Timbers",
        "kind": "gradient",
        "shape": "linear",
        "direction": "to-bottom-right",
        "stops": [
            {"position": 0.0, "color": "#d69a00"},
            {"position": 1.0, "color": "#00482b"}
        ],
        "effects_tag": "arcs"
    }))
    .unwrap();
    let ThemeKind::Gradient(spec) = &theme.kind else {
        panic!("expected gradient theme");
    };
    assert_eq!(spec.direction, GradientDirection::ToBottomRight);
    assert_eq!(spec.stops.len(), 2);
    assert_eq!(spec.stops[1].color, Rgba8::rgb(0x00, 0x48, 0x2b));
    assert_eq!(theme.effects_tag, Some(EffectsTag::Arcs));
}

#[test]
fn image_theme_and_unknown_effect_tag() {
    let theme: ThemeDescriptor = serde_json::from_value(json!({
        "id": "stadium",
        "kind": "image",
        "file_ref": "themes/stadium.jpg",
        "effects_tag": "confetti"
    }))
    .unwrap();
    assert_eq!(
        theme.kind,
        ThemeKind::Image {
            file_ref: "themes/stadium.jpg".to_string()
        }
    );
    assert_eq!(theme.effects_tag, Some(EffectsTag::Unknown));
}

#[test]
fn unknown_theme_is_resolution_error() {
    let cat = Catalog::default();
    assert!(matches!(
        cat.theme("missing"),
        Err(FanwallError::ThemeResolution(_))
    ));
    assert!(cat.patch("missing").is_none());
}

struct BrokenCatalog;

impl ThemeCatalog for BrokenCatalog {
    fn list_themes(&self) -> FanwallResult<Vec<ThemeDescriptor>> {
        Err(FanwallError::validation("manifest fetch failed"))
    }
}

#[test]
fn failing_provider_contributes_empty_list() {
    let patches = vec![PatchDescriptor {
        id: "p1".to_string(),
        file_ref: "patches/p1.png".to_string(),
        label: "Patch".to_string(),
    }];
    let cat = Catalog::from_providers(&BrokenCatalog, &patches);
    assert!(cat.themes().is_empty());
    assert_eq!(cat.patch("p1").map(|p| p.file_ref.as_str()), Some("patches/p1.png"));
}

#[test]
fn vec_match_provider_truncates() {
    let m = Match {
        opponent_name: "LA".to_string(),
        opponent_short_code: "LA".to_string(),
        logo_ref: None,
        kickoff: None,
        is_home: true,
    };
    let all = vec![m.clone(), m.clone(), m];
    assert_eq!(all.next_matches(2).unwrap().len(), 2);
    assert_eq!(all.next_matches(10).unwrap().len(), 3);
}
