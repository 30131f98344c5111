//! End-to-end tests for options rows and their selection screens.

use std::sync::Arc;

use horizon_forms::MainLoop;
use horizon_forms::headless::{self, HeadlessListWidget, NavigationStack, WidgetEvent};
use horizon_forms::prelude::*;
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: &'static str,
    team: &'static str,
}

impl OptionItem for Person {
    fn title(&self) -> String {
        self.name.to_string()
    }

    fn group_title(&self) -> String {
        self.team.to_string()
    }
}

struct Harness {
    main_loop: Arc<MainLoop>,
    stack: Arc<NavigationStack>,
}

impl Harness {
    fn new(rows: Vec<Row>) -> Self {
        let form = Form::new(headless::renderer_registry().unwrap())
            .with_title("Farm")
            .with_sections(vec![Section::new(rows)]);
        let main_loop = Arc::new(MainLoop::new());
        let stack = NavigationStack::new(main_loop.clone());
        stack.push(Arc::new(FormScreen::new(form)));
        Self { main_loop, stack }
    }

    fn root(&self) -> Arc<HeadlessListWidget> {
        self.stack.widget_at(0).unwrap()
    }

    fn top(&self) -> Arc<HeadlessListWidget> {
        self.stack.top_widget().unwrap()
    }
}

#[test]
fn test_pick_from_flat_list() {
    let animals = OptionsRow::builder("Animal", vec!["Cow", "Dog", "Sheep"])
        .with_selected("Dog")
        .build()
        .unwrap();
    let harness = Harness::new(vec![animals.row().clone()]);

    let root_row = harness.root().rendered(IndexPath::new(0, 0)).unwrap();
    assert_eq!(root_row.detail.as_deref(), Some("Dog"));
    assert!(root_row.disclosure);

    harness.root().tap(IndexPath::new(0, 0));
    assert_eq!(harness.stack.depth(), 2);
    assert_eq!(
        harness.stack.top_screen().unwrap().title().as_deref(),
        Some("Animal")
    );

    let picker = harness.top();
    assert_eq!(picker.section_count(), 1);
    assert_eq!(
        picker.rendered_titles(0),
        vec!["Cow".to_string(), "Dog".to_string(), "Sheep".to_string()]
    );
    let marks: Vec<bool> = (0..3)
        .map(|row| picker.rendered(IndexPath::new(0, row)).unwrap().checked)
        .collect();
    assert_eq!(marks, vec![false, true, false]);

    harness.main_loop.run_cycle();
    assert_eq!(picker.selected_path(), Some(IndexPath::new(0, 1)));

    picker.tap(IndexPath::new(0, 2));

    assert_eq!(animals.selected_option(), Some("Sheep"));
    assert_eq!(harness.stack.depth(), 1);
    assert!(!picker.is_attached());
    assert_eq!(
        harness
            .root()
            .rendered(IndexPath::new(0, 0))
            .unwrap()
            .detail
            .as_deref(),
        Some("Sheep")
    );
}

#[test]
fn test_empty_choice_leads_grouped_sections() {
    let people = vec![
        Person { name: "Ann", team: "1" },
        Person { name: "Bob", team: "2" },
        Person { name: "Cid", team: "1" },
    ];
    let owner = OptionsRow::builder("Owner", people)
        .with_group_order(["1", "2"])
        .with_empty_selection("Nobody")
        .build()
        .unwrap();
    let harness = Harness::new(vec![owner.row().clone()]);

    harness.root().tap(IndexPath::new(0, 0));
    let picker = harness.top();

    assert_eq!(picker.section_count(), 3);
    assert_eq!(picker.rendered_titles(0), vec!["Nobody".to_string()]);
    assert_eq!(
        picker.rendered_titles(1),
        vec!["Ann".to_string(), "Cid".to_string()]
    );
    assert_eq!(picker.rendered_titles(2), vec!["Bob".to_string()]);
    assert!(picker.rendered(IndexPath::new(0, 0)).unwrap().checked);

    let form = harness.stack.top_screen().unwrap().form();
    assert_eq!(form.section_title(0), None);
    assert_eq!(form.section_title(1).as_deref(), Some("1"));
    assert_eq!(form.section_title(2).as_deref(), Some("2"));

    harness.main_loop.run_cycle();
    assert_eq!(picker.selected_path(), Some(IndexPath::new(0, 0)));

    picker.tap(IndexPath::new(2, 0));
    assert_eq!(owner.selected_option().map(|p| p.name), Some("Bob"));
}

#[test]
fn test_choosing_empty_clears_selection() {
    let owner = OptionsRow::builder("Owner", vec!["Ann", "Bob"])
        .with_selected("Bob")
        .with_empty_selection("Nobody")
        .build()
        .unwrap();
    let harness = Harness::new(vec![owner.row().clone()]);

    harness.root().tap(IndexPath::new(0, 0));
    let picker = harness.top();
    assert_eq!(
        picker.rendered_titles(0),
        vec!["Nobody".to_string(), "Ann".to_string(), "Bob".to_string()]
    );

    picker.tap(IndexPath::new(0, 0));

    assert_eq!(owner.selected_option(), None);
    assert_eq!(
        harness
            .root()
            .rendered(IndexPath::new(0, 0))
            .unwrap()
            .detail
            .as_deref(),
        Some("Nobody")
    );
}

#[test]
fn test_host_slot_runs_before_presentation() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let animals = OptionsRow::builder("Animal", vec!["Cow"]).build().unwrap();
    let harness = Harness::new(vec![animals.row().clone()]);
    let stack = harness.stack.clone();
    let order_clone = order.clone();
    animals.row().signals().selected.connect(move |_| {
        order_clone.lock().push(format!("slot at depth {}", stack.depth()));
    });

    harness.root().tap(IndexPath::new(0, 0));
    order.lock().push(format!("after tap at depth {}", harness.stack.depth()));

    assert_eq!(
        *order.lock(),
        vec!["slot at depth 1".to_string(), "after tap at depth 2".to_string()]
    );
}

#[test]
fn test_value_changed_fires_once_per_pick() {
    let picks = Arc::new(Mutex::new(Vec::new()));
    let picks_clone = picks.clone();
    let animals = OptionsRow::builder("Animal", vec!["Cow", "Dog"])
        .with_selected("Cow")
        .build()
        .unwrap();
    animals
        .row()
        .signals()
        .value_changed
        .connect(move |row| picks_clone.lock().push(row.display_text()));
    let harness = Harness::new(vec![animals.row().clone()]);

    harness.root().tap(IndexPath::new(0, 0));
    harness.top().tap(IndexPath::new(0, 0));

    assert_eq!(*picks.lock(), vec![Some("Cow".to_string())]);
}

#[test]
fn test_highlight_is_programmatic() {
    let animals = OptionsRow::builder("Animal", vec!["Cow", "Dog", "Sheep"])
        .with_selected("Sheep")
        .build()
        .unwrap();
    let harness = Harness::new(vec![animals.row().clone()]);

    harness.root().tap(IndexPath::new(0, 0));
    let picker = harness.top();
    assert_eq!(picker.selected_path(), None);
    assert_eq!(harness.main_loop.pending_count(), 1);

    harness.main_loop.run_cycle();

    assert!(picker
        .events()
        .contains(&WidgetEvent::Select(Some(IndexPath::new(0, 2)))));
    assert_eq!(harness.stack.depth(), 2);
    assert_eq!(animals.selected_option(), Some("Sheep"));
}

#[test]
fn test_back_navigation_dismisses_without_choice() {
    let animals = OptionsRow::builder("Animal", vec!["Cow", "Dog"])
        .with_selected("Dog")
        .build()
        .unwrap();
    let harness = Harness::new(vec![animals.row().clone()]);

    harness.root().tap(IndexPath::new(0, 0));
    let picker = harness.top();
    harness.stack.pop();

    assert_eq!(harness.stack.depth(), 1);
    assert!(!picker.is_attached());
    assert_eq!(animals.selected_option(), Some("Dog"));
}

#[test]
fn test_options_row_without_navigator_stays_put() {
    let animals = OptionsRow::builder("Animal", vec!["Cow"]).build().unwrap();
    let form = Form::new(headless::renderer_registry().unwrap())
        .with_sections(vec![Section::new(vec![animals.row().clone()])]);
    let widget = Arc::new(HeadlessListWidget::new());
    form.attach_widget(widget.clone());

    widget.tap(IndexPath::new(0, 0));

    assert_eq!(animals.selected_option(), None);
    assert!(widget.is_attached());
}
