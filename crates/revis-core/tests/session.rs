use pretty_assertions::assert_eq;
use revis_core::{
    Diagnostic, DiagnosticCode, DiagnosticKey, DiagnosticRange, DiagnosticSeverity, HeadlessHost,
    LineIndex, LineToggle, Position, QuickFix, SessionOptions, ToggleOutcome, VizConfig,
    VizSession,
};
use std::time::{Duration, Instant};

const SOURCE: &str = "\
fn main() {
    let mut x = 1;
    let r = &x;
    x += 1;
    println!(\"{r}\");
}
";

fn borrowed_assign() -> Diagnostic {
    Diagnostic::rustc_error(
        "E0506",
        "cannot assign to `x` because it is borrowed",
        DiagnosticRange::on_line(3, 4, 10),
    )
    .with_related("`x` is borrowed here", DiagnosticRange::on_line(2, 12, 14))
    .with_related("borrow later used here", DiagnosticRange::on_line(4, 14, 17))
}

fn session() -> VizSession {
    VizSession::new(VizConfig::default(), SessionOptions::default())
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_rebuild_waits_for_quiet_period() {
    let document = LineIndex::from_text(SOURCE);
    let diagnostics = vec![borrowed_assign()];
    let mut host = HeadlessHost::new();
    let mut session = session();
    let t0 = Instant::now();

    assert!(session.diagnostics_changed("rust", t0));
    assert_eq!(session.rebuild_due(), Some(t0 + ms(200)));
    assert!(!session
        .poll(&mut host, &document, &diagnostics, t0 + ms(100))
        .unwrap());

    // a second change pushes the deadline out
    assert!(session.diagnostics_changed("rust", t0 + ms(150)));
    assert!(!session
        .poll(&mut host, &document, &diagnostics, t0 + ms(250))
        .unwrap());
    assert!(session.store().is_empty());

    assert!(session
        .poll(&mut host, &document, &diagnostics, t0 + ms(350))
        .unwrap());
    assert_eq!(session.store().len(), 1);
    assert_eq!(session.rebuild_due(), None);

    // nothing pending anymore
    assert!(!session
        .poll(&mut host, &document, &diagnostics, t0 + ms(1000))
        .unwrap());
}

#[test]
fn test_other_languages_are_ignored() {
    let document = LineIndex::from_text(SOURCE);
    let mut host = HeadlessHost::new();
    let mut session = session();

    assert!(!session.diagnostics_changed("python", Instant::now()));
    assert_eq!(session.rebuild_due(), None);
    assert!(!session
        .update_interventions(&mut host, "python", &document, &[borrowed_assign()])
        .unwrap());
    assert!(session.store().is_empty());
    assert_eq!(host.created_count(), 0);
}

#[test]
fn test_only_compiler_errors_are_tracked() {
    let document = LineIndex::from_text(SOURCE);
    let mut host = HeadlessHost::new();
    let mut session = session();

    let mut from_clippy = borrowed_assign();
    from_clippy.source = Some("clippy".to_string());
    let mut as_warning = borrowed_assign();
    as_warning.range = DiagnosticRange::on_line(1, 4, 9);
    as_warning.severity = Some(DiagnosticSeverity::Warning);

    session
        .update_interventions(&mut host, "rust", &document, &[from_clippy, as_warning])
        .unwrap();
    assert!(session.store().is_empty());
}

#[test]
fn test_toggle_at_line() {
    let document = LineIndex::from_text(SOURCE);
    let mut host = HeadlessHost::new();
    let mut session = session();
    session
        .update_interventions(&mut host, "rust", &document, &[borrowed_assign()])
        .unwrap();

    assert_eq!(
        session.toggle_at_line(&mut host, &document, 0),
        LineToggle::Nothing
    );
    assert_eq!(
        session.toggle_at_line(&mut host, &document, 3),
        LineToggle::Toggled(DiagnosticKey::new(3, "E0506"), ToggleOutcome::Shown)
    );
    assert_eq!(host.visible_visualizations().len(), 1);
    assert_eq!(
        session.toggle_at_line(&mut host, &document, 3),
        LineToggle::Toggled(DiagnosticKey::new(3, "E0506"), ToggleOutcome::Hidden)
    );
    assert!(host.visible_visualizations().is_empty());
}

#[test]
fn test_toggle_at_line_with_several_diagnostics_asks() {
    let document = LineIndex::from_text(SOURCE);
    let mut host = HeadlessHost::new();
    let mut session = session();
    let mut second = borrowed_assign();
    second.code = Some(DiagnosticCode::wrapped("E0503"));
    second.message = "cannot use `x` because it was mutably borrowed".to_string();
    session
        .update_interventions(&mut host, "rust", &document, &[borrowed_assign(), second])
        .unwrap();

    let keys = vec![DiagnosticKey::new(3, "E0503"), DiagnosticKey::new(3, "E0506")];
    assert_eq!(
        session.toggle_at_line(&mut host, &document, 3),
        LineToggle::Choose(keys.clone())
    );
    assert!(host.visible_visualizations().is_empty());

    assert_eq!(
        session.toggle(&mut host, &document, &keys[0]),
        ToggleOutcome::Shown
    );
    assert_eq!(session.store().displayed_keys(), vec![keys[0].clone()]);
}

#[test]
fn test_autoderef_hint_inserts_star() {
    let mut document = LineIndex::from_text("fn set(r: &mut i32) {\n    r = 5;\n}\n");
    let mismatch = Diagnostic::rustc_error(
        "E0308",
        "mismatched types\nexpected `&mut i32`, found integer",
        DiagnosticRange::on_line(1, 8, 9),
    )
    .with_related(
        "consider dereferencing here to assign to the mutably borrowed value: `*r`",
        DiagnosticRange::new(Position::new(1, 4), Position::new(1, 4)),
    );
    let mut host = HeadlessHost::new();
    let mut session = session();
    session
        .update_interventions(&mut host, "rust", &document, &[mismatch])
        .unwrap();

    let hints = session.inline_hints().to_vec();
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].range, DiagnosticRange::on_line(1, 4, 5));
    assert_eq!(
        hints[0].hover_message,
        "consider dereferencing here to assign to the mutably borrowed value (click to accept)"
    );
    assert_eq!(
        hints[0].fix,
        QuickFix::InsertText {
            line: 1,
            character: 4,
            text: "*".to_string(),
        }
    );

    assert_eq!(
        session.toggle_at_line(&mut host, &document, 1),
        LineToggle::Toggled(DiagnosticKey::new(1, "E0308"), ToggleOutcome::Inline)
    );
    assert!(host.visible_visualizations().is_empty());

    assert!(hints[0].fix.apply(&mut document));
    assert_eq!(document.text(), "fn set(r: &mut i32) {\n    *r = 5;\n}\n");
}

#[test]
fn test_clear_all_and_dispose() {
    let document = LineIndex::from_text(SOURCE);
    let mut host = HeadlessHost::new();
    let mut session = session();
    session
        .update_interventions(&mut host, "rust", &document, &[borrowed_assign()])
        .unwrap();
    session.toggle(&mut host, &document, &DiagnosticKey::new(3, "E0506"));
    assert_eq!(host.visible_visualizations().len(), 1);

    session.clear_all(&mut host);
    assert!(host.visible_visualizations().is_empty());
    assert_eq!(session.store().len(), 1);

    session.diagnostics_changed("rust", Instant::now());
    session.dispose(&mut host);
    assert_eq!(session.rebuild_due(), None);
    assert!(host.live_types().is_empty());
    assert!(session.inline_hints().is_empty());
}
