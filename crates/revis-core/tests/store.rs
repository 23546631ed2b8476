use pretty_assertions::assert_eq;
use revis_core::host::HeadlessHost;
use revis_core::triangle::{triangle_available, triangle_shown};
use revis_core::{
    DecorationHost, DecorationTypeId, DecorationTypeOptions, Diagnostic, DiagnosticCode,
    DiagnosticKey, DiagnosticRange, ErrorvizRegistry, HandlerResult, InlineRegistry,
    Interventions, LineIndex, RenderContext, RenderEnv, RenderResult, ToggleOutcome, VizConfig,
    VizError, VizStore, svg_to_data_uri,
};

fn on(line: usize) -> DiagnosticRange {
    DiagnosticRange::on_line(line, 4, 8)
}

fn e0502(line: usize) -> Diagnostic {
    Diagnostic::rustc_error("E0502", "cannot borrow `x` as mutable", on(line))
        .with_related("immutable borrow occurs here", on(line - 2))
        .with_related("immutable borrow later used here", on(line + 2))
}

fn e0506(line: usize) -> Diagnostic {
    Diagnostic::rustc_error("E0506", "cannot assign to `y` because it is borrowed", on(line))
        .with_related("`y` is borrowed here", on(line - 1))
        .with_related("borrow later used here", on(line + 1))
}

fn e0308(line: usize) -> Diagnostic {
    Diagnostic::rustc_error(
        "E0308",
        "mismatched types\nexpected `&mut i32`, found integer",
        on(line),
    )
}

struct Fixture {
    host: HeadlessHost,
    store: VizStore,
    interventions: Interventions,
    document: LineIndex,
    config: VizConfig,
}

impl Fixture {
    fn new() -> Self {
        Self::with_interventions(Interventions::default())
    }

    fn with_interventions(interventions: Interventions) -> Self {
        Self {
            host: HeadlessHost::new(),
            store: VizStore::new(),
            interventions,
            document: LineIndex::from_text(&"let a = 1;\n".repeat(20)),
            config: VizConfig::default(),
        }
    }

    fn rebuild(&mut self, diagnostics: &[Diagnostic]) -> Result<(), VizError> {
        let env = RenderEnv {
            interventions: &self.interventions,
            document: &self.document,
            config: &self.config,
        };
        self.store.rebuild(&mut self.host, &env, diagnostics)
    }

    fn toggle(&mut self, key: &DiagnosticKey) -> ToggleOutcome {
        let env = RenderEnv {
            interventions: &self.interventions,
            document: &self.document,
            config: &self.config,
        };
        self.store.toggle(&mut self.host, &env, key)
    }

    fn show(&mut self, key: &DiagnosticKey) -> ToggleOutcome {
        let env = RenderEnv {
            interventions: &self.interventions,
            document: &self.document,
            config: &self.config,
        };
        self.store.show(&mut self.host, &env, key)
    }

    fn triangle_type(&self, icon: &str) -> DecorationTypeId {
        self.host
            .live_types()
            .into_iter()
            .find(|ty| {
                self.host.decoration_type(*ty).map(|state| &state.options)
                    == Some(&DecorationTypeOptions::GutterIcon {
                        icon_uri: icon.to_string(),
                    })
            })
            .expect("triangle decoration type")
    }

    fn triangle_lines(&self, icon: &str) -> Vec<usize> {
        self.host
            .decorations(self.triangle_type(icon))
            .iter()
            .map(|d| d.range.start.line)
            .collect()
    }
}

fn key(line: usize, code: &str) -> DiagnosticKey {
    DiagnosticKey::new(line, code)
}

#[test]
fn test_key_display() {
    assert_eq!(key(5, "E0502").to_string(), "5_E0502");
}

#[test]
fn test_unsupported_codes_never_create_entries_or_decorations() {
    let mut fx = Fixture::new();
    let unsupported = Diagnostic::rustc_error("E0425", "cannot find value `z`", on(3));
    fx.rebuild(&[unsupported]).expect("rebuild");

    assert!(fx.store.is_empty());
    // only the two gutter triangle types
    assert_eq!(fx.host.created_count(), 2);
    assert_eq!(fx.toggle(&key(3, "E0425")), ToggleOutcome::Missing);
    assert_eq!(fx.host.created_count(), 2);
}

#[test]
fn test_at_most_one_visualization_is_displayed() {
    let mut fx = Fixture::new();
    fx.rebuild(&[e0502(5), e0506(10)]).expect("rebuild");

    assert_eq!(fx.toggle(&key(5, "E0502")), ToggleOutcome::Shown);
    assert_eq!(fx.show(&key(10, "E0506")), ToggleOutcome::Shown);
    assert_eq!(fx.store.displayed_keys(), vec![key(10, "E0506")]);
    assert_eq!(fx.host.visible_visualizations().len(), 1);

    assert_eq!(fx.toggle(&key(5, "E0502")), ToggleOutcome::Shown);
    assert_eq!(fx.store.displayed_keys(), vec![key(5, "E0502")]);
    assert_eq!(fx.host.visible_visualizations().len(), 1);
}

#[test]
fn test_double_toggle_leaves_no_decoration_and_reuses_type() {
    let mut fx = Fixture::new();
    fx.rebuild(&[e0502(5)]).expect("rebuild");
    let k = key(5, "E0502");

    assert_eq!(fx.toggle(&k), ToggleOutcome::Shown);
    let ty = fx
        .store
        .get(&k)
        .and_then(|entry| entry.decoration_type())
        .expect("decoration type");
    assert_eq!(fx.host.decorations(ty).len(), 1);

    assert_eq!(fx.toggle(&k), ToggleOutcome::Hidden);
    assert!(!fx.store.get(&k).expect("entry").is_displayed());
    assert!(fx.host.decorations(ty).is_empty());
    assert!(fx.host.visible_visualizations().is_empty());

    let created = fx.host.created_count();
    assert_eq!(fx.toggle(&k), ToggleOutcome::Shown);
    assert_eq!(fx.store.get(&k).and_then(|e| e.decoration_type()), Some(ty));
    assert_eq!(fx.host.created_count(), created);
}

#[test]
fn test_displayed_entry_survives_rebuild() {
    let mut fx = Fixture::new();
    fx.rebuild(&[e0502(5), e0506(10)]).expect("rebuild");
    assert_eq!(fx.toggle(&key(5, "E0502")), ToggleOutcome::Shown);
    let old_ty = fx
        .store
        .get(&key(5, "E0502"))
        .and_then(|e| e.decoration_type())
        .expect("decoration type");

    fx.rebuild(&[e0502(5), e0506(10)]).expect("rebuild");

    assert_eq!(fx.store.displayed_keys(), vec![key(5, "E0502")]);
    assert!(!fx.store.get(&key(10, "E0506")).expect("entry").is_displayed());
    // the old entry's decoration type is released, a fresh one carries the image
    assert!(fx.host.decoration_type(old_ty).expect("known").disposed);
    assert_eq!(fx.host.visible_visualizations().len(), 1);
    assert_eq!(fx.host.live_types().len(), 3);
}

#[test]
fn test_rebuild_drops_display_for_vanished_keys() {
    let mut fx = Fixture::new();
    fx.rebuild(&[e0502(5)]).expect("rebuild");
    assert_eq!(fx.toggle(&key(5, "E0502")), ToggleOutcome::Shown);

    // the error moved one line down
    fx.rebuild(&[e0502(6)]).expect("rebuild");
    assert!(fx.store.displayed_keys().is_empty());
    assert!(fx.host.visible_visualizations().is_empty());
}

#[test]
fn test_duplicate_keys_collapse_to_the_later_diagnostic() {
    let mut fx = Fixture::new();
    let mut later = e0502(5);
    later.message = "cannot borrow `w` as mutable".to_string();
    fx.rebuild(&[e0502(5), later]).expect("rebuild");

    assert_eq!(fx.store.len(), 1);
    assert_eq!(
        fx.store
            .get(&key(5, "E0502"))
            .map(|e| e.diagnostic().message.as_str()),
        Some("cannot borrow `w` as mutable")
    );
}

#[test]
fn test_inapplicable_diagnostic_is_tracked_but_not_shown() {
    let mut fx = Fixture::new();
    let bare = Diagnostic::rustc_error("E0502", "cannot borrow `x` as immutable", on(5));
    fx.rebuild(&[bare]).expect("rebuild");

    assert_eq!(fx.store.len(), 1);
    assert_eq!(
        fx.toggle(&key(5, "E0502")),
        ToggleOutcome::Inapplicable(Some("cannot parse related diagnostics".to_string()))
    );
    assert!(fx.store.displayed_keys().is_empty());
    assert!(fx.host.error_messages().is_empty());
}

fn exploding(_: &RenderContext<'_>, _: &Diagnostic) -> RenderResult {
    HandlerResult::failed("boom")
}

#[test]
fn test_render_failure_is_reported_to_the_user() {
    let interventions = Interventions::new(
        ErrorvizRegistry::empty().with("E0502", exploding),
        InlineRegistry::empty(),
    );
    let mut fx = Fixture::with_interventions(interventions);
    fx.rebuild(&[e0502(5)]).expect("rebuild");

    assert_eq!(
        fx.toggle(&key(5, "E0502")),
        ToggleOutcome::Failed("boom".to_string())
    );
    assert_eq!(
        fx.host.error_messages(),
        &["SVG generation failed: boom".to_string()]
    );
    assert!(fx.store.displayed_keys().is_empty());
}

#[test]
fn test_unexpected_code_shape_aborts_the_batch() {
    let mut fx = Fixture::new();
    fx.rebuild(&[e0502(5)]).expect("rebuild");

    let mut odd = e0506(10);
    odd.code = Some(DiagnosticCode::Unrecognized("[\"E0506\"]".to_string()));
    assert_eq!(
        fx.rebuild(&[e0506(12), odd]),
        Err(VizError::UnexpectedCode("[\"E0506\"]".to_string()))
    );
    // previous state untouched
    assert_eq!(
        fx.store.entries().map(|(k, _)| k.clone()).collect::<Vec<_>>(),
        vec![key(5, "E0502")]
    );
}

#[test]
fn test_triangles_split_available_and_shown() {
    let mut fx = Fixture::new();
    fx.rebuild(&[e0502(5), e0506(10), e0308(14)]).expect("rebuild");
    let shown = svg_to_data_uri(&triangle_shown());
    let available = svg_to_data_uri(&triangle_available());

    // inline diagnostics never get a toggle triangle
    assert_eq!(fx.triangle_lines(&shown), vec![14]);
    assert_eq!(fx.triangle_lines(&available), vec![5, 10]);

    assert_eq!(fx.toggle(&key(10, "E0506")), ToggleOutcome::Shown);
    assert_eq!(fx.triangle_lines(&shown), vec![10, 14]);
    assert_eq!(fx.triangle_lines(&available), vec![5]);

    assert_eq!(fx.toggle(&key(14, "E0308")), ToggleOutcome::Inline);
    assert_eq!(fx.store.displayed_keys(), vec![key(10, "E0506")]);

    fx.store.hide_all(&mut fx.host);
    assert_eq!(fx.triangle_lines(&shown), vec![14]);
    assert_eq!(fx.triangle_lines(&available), vec![5, 10]);

    fx.store.hide_triangles(&mut fx.host);
    assert!(fx.triangle_lines(&shown).is_empty());
    assert!(fx.triangle_lines(&available).is_empty());
}

#[test]
fn test_keys_on_line_and_dispose() {
    let mut fx = Fixture::new();
    fx.rebuild(&[e0502(5), e0506(5), e0506(10)]).expect("rebuild");
    assert_eq!(
        fx.store.keys_on_line(5),
        vec![key(5, "E0502"), key(5, "E0506")]
    );
    assert!(fx.store.keys_on_line(7).is_empty());

    assert_eq!(fx.toggle(&key(10, "E0506")), ToggleOutcome::Shown);
    fx.store.dispose(&mut fx.host);
    assert!(fx.store.is_empty());
    assert!(fx.host.live_types().is_empty());
}

#[test]
fn test_host_error_messages_only_come_from_failures() {
    let mut fx = Fixture::new();
    fx.rebuild(&[e0502(5)]).expect("rebuild");
    fx.host.show_error_message("unrelated");
    assert_eq!(fx.toggle(&key(5, "E0502")), ToggleOutcome::Shown);
    assert_eq!(fx.host.error_messages(), &["unrelated".to_string()]);
}
