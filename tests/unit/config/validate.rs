use super::*;

fn text_template(id: &str) -> TemplateDef {
    TemplateDef {
        id: id.to_string(),
        name: Some("Post".to_string()),
        width: 768,
        height: 960,
        has_text: true,
        photo_area: Some(480),
        overlay: Some("assets/overlays/post.png".to_string()),
        font_size: Some(36.0),
        line_height: Some(1.2),
        max_lines: Some(3),
        text_x: Some(25.0),
        text_y: Some(530.0),
        max_width: Some(668.0),
    }
}

fn messages(def: &RegistryDef) -> Vec<String> {
    validate_registry(def)
        .unwrap_err()
        .errors
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn well_formed_registry_passes() {
    let def = RegistryDef {
        formats: vec![
            text_template("POST"),
            TemplateDef {
                id: "WEB".to_string(),
                width: 1080,
                height: 720,
                ..TemplateDef::default()
            },
        ],
        archive_prefix: None,
    };
    validate_registry(&def).unwrap();
}

#[test]
fn empty_registry_is_rejected() {
    let msgs = messages(&RegistryDef::default());
    assert_eq!(msgs, vec!["$.formats: at least one format is required"]);
}

#[test]
fn duplicate_ids_are_reported_with_index() {
    let def = RegistryDef {
        formats: vec![text_template("POST"), text_template("POST")],
        archive_prefix: None,
    };
    let msgs = messages(&def);
    assert_eq!(msgs, vec!["$.formats[1].id: duplicate format id 'POST'"]);
}

#[test]
fn text_fields_are_required_when_has_text() {
    let mut t = text_template("POST");
    t.font_size = None;
    t.max_lines = Some(0);
    t.max_width = None;
    let def = RegistryDef {
        formats: vec![t],
        archive_prefix: None,
    };
    let msgs = messages(&def);
    assert!(msgs.contains(&"$.formats[0].font_size: required when has_text".to_string()));
    assert!(msgs.contains(&"$.formats[0].max_lines: must be >= 1".to_string()));
    assert!(msgs.contains(&"$.formats[0].max_width: required when has_text".to_string()));
    assert_eq!(msgs.len(), 3);
}

#[test]
fn geometry_bounds_are_checked() {
    let mut t = text_template("POST");
    t.width = 0;
    t.photo_area = Some(961);
    t.overlay = Some("../outside.png".to_string());
    let def = RegistryDef {
        formats: vec![t],
        archive_prefix: None,
    };
    let msgs = messages(&def);
    assert!(msgs.iter().any(|m| m.starts_with("$.formats[0].width:")));
    assert!(msgs.contains(&"$.formats[0].photo_area: must be in 1..=960".to_string()));
    assert!(msgs.iter().any(|m| m.starts_with("$.formats[0].overlay:")));
}

#[test]
fn text_fields_are_ignored_without_has_text() {
    let def = RegistryDef {
        formats: vec![TemplateDef {
            id: "EVENT".to_string(),
            width: 1200,
            height: 628,
            max_lines: Some(0),
            ..TemplateDef::default()
        }],
        archive_prefix: None,
    };
    validate_registry(&def).unwrap();
}

#[test]
fn ids_that_would_escape_a_directory_are_rejected() {
    for bad in ["../POST", "a/b", "a\\b", "..", "TAB\tID"] {
        let def = RegistryDef {
            formats: vec![TemplateDef {
                id: bad.to_string(),
                width: 10,
                height: 10,
                ..TemplateDef::default()
            }],
            archive_prefix: None,
        };
        let msgs = messages(&def);
        assert_eq!(msgs.len(), 1, "{bad}: {msgs:?}");
        assert!(msgs[0].starts_with("$.formats[0].id: "), "{msgs:?}");
    }

    let ok = RegistryDef {
        formats: vec![TemplateDef {
            id: "EVENT.v2".to_string(),
            width: 10,
            height: 10,
            ..TemplateDef::default()
        }],
        archive_prefix: None,
    };
    validate_registry(&ok).unwrap();
}
