use nanocad::errors::{CommandError, CoordinateError, UnitError, VariableError};
use nanocad::{
    CadError, Coordinate, ErrorPolicy, Length, Limits, ObjectId, ObjectKind, Outcome, Session,
    SessionConfig, Value,
};

#[test]
fn sample_document() {
    let session = nanocad::parse(
        r#"# sample
line x0mm;y0mm, w10mm=&a
line x5mm;y5mm, h20mm
"#,
    )
    .unwrap();

    insta::assert_snapshot!(session.summary(), @r"
    objects (2):
      #0 line (0, 0) -> (10, 0)
      #1 line (5, 5) -> (5, 25)
    variables (1):
      &a = #0
    ");
}

#[test]
fn ids_follow_creation_order_across_failures() {
    let config = SessionConfig::default().with_error_policy(ErrorPolicy::Continue);
    let mut session = Session::with_config(config);
    let source = [
        "line x0;y0, w1",
        "circle x0;y0, w1",
        "line x0;y0, w2",
        "line x0;y0, w2xyz",
        "line x0;y0, w3",
    ]
    .join("\n");

    let report = session.parse_source("ids", &source).unwrap();
    assert_eq!(report.statements, 3);
    assert_eq!(report.failures.len(), 2);

    let ends: Vec<_> = session
        .objects()
        .iter()
        .map(|(id, o)| (id, o.points()[1]))
        .collect();
    assert_eq!(
        ends,
        [
            (ObjectId(0), Coordinate::new(1, 0)),
            (ObjectId(1), Coordinate::new(2, 0)),
            (ObjectId(2), Coordinate::new(3, 0)),
        ]
    );
}

#[test]
fn every_line_adds_exactly_one_object() {
    let mut session = Session::new();
    for n in 0..25 {
        let before = session.objects().len();
        let outcome = session
            .execute(&format!("line x{n};y0, h{n}cm"))
            .unwrap();
        assert_eq!(session.objects().len(), before + 1);
        assert_eq!(
            outcome,
            Outcome::Object {
                id: ObjectId(n),
                variable: None
            }
        );
    }
}

#[test]
fn error_kinds_surface_per_line() {
    let mut session = Session::new();
    assert!(matches!(
        session.execute("line x0;y0, w10yd"),
        Err(CadError::Unit(UnitError::UnknownUnit { .. }))
    ));
    assert!(matches!(
        session.execute("line x0;y0, v10"),
        Err(CadError::Coordinate(CoordinateError::Syntax { .. }))
    ));
    assert!(matches!(
        session.execute("set ?x, 1"),
        Err(CadError::Variable(VariableError::UnknownType { tag: '?', .. }))
    ));
    assert!(matches!(
        session.execute("rect x0;y0, x1;y1"),
        Err(CadError::Command(CommandError::UnsupportedObjectKind {
            kind: ObjectKind::Rect
        }))
    ));
    assert!(matches!(
        session.execute("polygon x0;y0"),
        Err(CadError::Command(CommandError::UnknownCommand { .. }))
    ));
    assert!(session.snapshot().is_empty());
}

#[test]
fn object_variables_dereference() {
    let mut session = Session::new();
    session.execute("line x1cm;y1cm, w2cm = &beam").unwrap();
    session.execute("set &alias, 0").unwrap();

    let beam = session.object("beam").unwrap();
    assert_eq!(beam, session.object("alias").unwrap());
    assert_eq!(beam.points(), &[Coordinate::new(10, 10), Coordinate::new(30, 10)]);

    session.execute("set &broken, 9").unwrap();
    assert_eq!(
        session.object("broken"),
        Err(VariableError::DanglingReference { index: 9, len: 1 })
    );
}

#[test]
fn redeclaration_shadows() {
    let mut session = Session::new();
    session.execute("set $w, 1").unwrap();
    session.execute("set $w, 2").unwrap();
    assert_eq!(session.scalar("w"), Ok(2.0));
    assert_eq!(session.variables().history("w").count(), 2);
    assert_eq!(
        session.variables().lookup("w").map(|v| v.value),
        Some(Value::Scalar(2.0))
    );
}

#[test]
fn tighter_limits_apply_to_every_line() {
    let limits = Limits {
        max_keyword_len: 4,
        max_argument_len: 12,
        max_arguments: 3,
    };
    let mut session = Session::with_config(SessionConfig::default().with_limits(limits));
    assert!(session.execute("line x0;y0, w1 = &a").is_ok());
    assert!(session.execute("line x0;y0, w1, &a, &b").is_err());
    assert!(session.execute("line x0;y0, w1234567890123").is_err());
    assert!(session.execute("circle x0;y0").is_err());
}

#[test]
fn continue_policy_collects_every_failure() {
    let config = SessionConfig::default().with_error_policy(ErrorPolicy::Continue);
    let mut session = Session::with_config(config);
    let report = session
        .parse_source("mixed", "set $a, nope\nline x0;y0, w1\nset @p, h1\n")
        .unwrap();

    let failures: Vec<_> = report
        .failures
        .iter()
        .map(|f| format!("{}: {}", f.line, f.error))
        .collect();
    insta::assert_snapshot!(failures.join("\n"), @r#"
    1: cannot use "nope" as a scalar value
    3: relative coordinate "h1" has no base point
    "#);
}

#[test]
fn relative_end_past_i64_is_an_error() {
    let mut session = Session::new();
    assert!(matches!(
        session.execute("line x9000000000000000m;y0, w9000000000000000m"),
        Err(CadError::Coordinate(CoordinateError::OutOfRange { .. }))
    ));
    assert!(matches!(
        session.execute("line x0;y-9000000000000000m, h-9000000000000000m = &a"),
        Err(CadError::Coordinate(CoordinateError::OutOfRange { .. }))
    ));
    assert!(session.snapshot().is_empty());
    assert!(session.variables().is_empty());

    session
        .execute("line x9000000000000000m;y0, w-9000000000000000m")
        .unwrap();
    assert_eq!(
        session.objects().last().map(|(_, o)| o.points()[1]),
        Some(Coordinate::new(0, 0))
    );
}

#[test]
fn extreme_bounds_report_instead_of_wrapping() {
    let mut session = Session::new();
    session
        .execute("line x-9000000000000000m;y0, x9000000000000000m;y0")
        .unwrap();

    let bounds = session.snapshot().bounds().unwrap();
    assert_eq!(bounds.min, Coordinate::new(-9_000_000_000_000_000_000, 0));
    assert_eq!(bounds.width(), None);
    assert_eq!(bounds.height(), Some(Length::ZERO));
}

#[test]
fn most_negative_length_is_rejected() {
    let mut session = Session::new();
    assert!(matches!(
        session.execute("line x-9223372036854775808;y0, w1"),
        Err(CadError::Unit(UnitError::OutOfRange { .. }))
    ));
    session
        .execute("line x-9223372036854774784;y0, w1")
        .unwrap();
}
