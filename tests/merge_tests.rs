use serde_isc::{isc, parse_str, Error, Kind, MergeOptions, Value};

const DEFAULTS: &str = r#"
CGI { logdir "/var/log/cgi"; };
RADIUS { server { port 1812; }; };
"#;

const CONFIG: &str = r#"
CGI { logdir "/srv/logs"; };
RADIUS { secret "s3cr3t"; };
"#;

#[test]
fn test_defaults_workflow() {
    let defaults = parse_str(DEFAULTS).unwrap();
    let mut settings = parse_str(CONFIG).unwrap();

    settings.fill_defaults(&defaults).unwrap();

    // Keys from the defaults replace the user's sections wholesale.
    assert_eq!(
        settings,
        isc!({
            "CGI": { "logdir": "/var/log/cgi" },
            "RADIUS": { "server": { "port": 1812 } }
        })
    );
    assert_eq!(
        settings.lookup("RADIUS/server/port").and_then(Value::as_i64),
        Some(1812)
    );
}

#[test]
fn test_fill_defaults_keeps_user_only_keys() {
    let defaults = isc!({ "timeout": 30 });
    let mut settings = parse_str("logdir \"/tmp\";").unwrap();

    settings.fill_defaults(&defaults).unwrap();
    assert_eq!(settings, isc!({ "logdir": "/tmp", "timeout": 30 }));
}

#[test]
fn test_overlay_discards_target_keys() {
    let mut settings = isc!({ "logdir": "/tmp", "timeout": 5 });
    settings.overlay(&isc!({ "timeout": 30 })).unwrap();
    assert_eq!(settings, isc!({ "timeout": 30 }));
}

#[test]
fn test_merge_is_deep_copy() {
    let source = isc!({ "a": { "b": ["x", "y"] } });
    let mut target = Value::empty_of(Kind::Map);
    target.fill_defaults(&source).unwrap();

    drop(source);
    assert_eq!(target, isc!({ "a": { "b": ["x", "y"] } }));
}

#[test]
fn test_type_mismatch_path() {
    let defaults = parse_str("RADIUS { server { port 1812; }; };").unwrap();
    let mut settings = parse_str("RADIUS { server { port \"radius\"; }; };").unwrap();

    let err = settings.fill_defaults(&defaults).unwrap_err();
    assert_eq!(
        err,
        Error::TypeMismatch {
            path: "RADIUS/server/port".to_string(),
            expected: "text".to_string(),
            found: "integer".to_string(),
        }
    );
    assert_eq!(
        err.to_string(),
        "Type mismatch at `RADIUS/server/port`: expected text, found integer"
    );
}

#[test]
fn test_section_versus_scalar_mismatch() {
    let mut settings = parse_str("CGI \"off\";").unwrap();
    let err = settings
        .fill_defaults(&parse_str("CGI { logdir \"/x\"; };").unwrap())
        .unwrap_err();
    assert_eq!(err.path(), Some("CGI"));
}

#[test]
fn test_typecheck_disabled_takes_source_kind() {
    let mut settings = parse_str("CGI \"off\";").unwrap();
    let options = MergeOptions::new().with_typecheck(false);

    settings
        .merge_with(&parse_str("CGI { logdir \"/x\"; };").unwrap(), &options)
        .unwrap();
    assert_eq!(settings, isc!({ "CGI": { "logdir": "/x" } }));
}

#[test]
fn test_lists_are_replaced() {
    let mut settings = parse_str("clients { \"a\"; \"b\"; \"c\"; };").unwrap();
    settings
        .fill_defaults(&parse_str("clients { \"z\"; };").unwrap())
        .unwrap();
    assert_eq!(settings, isc!({ "clients": ["z"] }));
}

#[test]
fn test_merged_with_is_all_or_nothing() {
    let settings = isc!({ "a": 1, "b": { "c": 2 } });
    let source = isc!({ "a": 5, "b": { "c": "two" } });

    assert!(settings.merged_with(&source, &MergeOptions::overlay()).is_err());
    assert_eq!(settings, isc!({ "a": 1, "b": { "c": 2 } }));
}

#[test]
fn test_merge_of_clone_is_identity() {
    let settings = parse_str(DEFAULTS).unwrap();
    let copy = settings.clone();

    let mut target = settings.clone();
    target.overlay(&copy).unwrap();
    assert_eq!(target, settings);

    let mut target = settings.clone();
    target.fill_defaults(&copy).unwrap();
    assert_eq!(target, settings);
}

#[test]
fn test_clear_then_merge() {
    let mut settings = parse_str(CONFIG).unwrap();
    settings.clear();
    assert_eq!(settings, Value::Empty);

    // Type checking treats Empty as a kind of its own.
    let err = settings.fill_defaults(&isc!({ "a": 1 })).unwrap_err();
    assert_eq!(err, Error::type_mismatch(Kind::Empty, Kind::Map));

    settings.merge(&isc!({ "a": 1 }), false, false).unwrap();
    assert_eq!(settings, isc!({ "a": 1 }));
}
