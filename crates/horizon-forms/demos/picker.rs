//! Drives a small profile form through the headless toolkit.
//!
//! Run with: cargo run -p horizon-forms --example picker
//!
//! Set `RUST_LOG=horizon_forms=debug` to see the form's own logging.

use std::sync::Arc;

use horizon_forms::MainLoop;
use horizon_forms::headless::{self, HeadlessListWidget, NavigationStack};
use horizon_forms::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct Animal {
    name: &'static str,
    class: &'static str,
}

impl OptionItem for Animal {
    fn title(&self) -> String {
        self.name.to_string()
    }

    fn group_title(&self) -> String {
        self.class.to_string()
    }
}

fn print_screen(label: &str, widget: &HeadlessListWidget) {
    println!("--- {label} ---");
    for path in widget.displayed_paths() {
        let Some(rendered) = widget.rendered(path) else {
            continue;
        };
        let mark = if rendered.checked { "x" } else { " " };
        let arrow = if rendered.disclosure { " >" } else { "" };
        println!(
            "{path} [{mark}] {:<14} {}{arrow}",
            rendered.title.unwrap_or_default(),
            rendered.detail.or(rendered.placeholder).unwrap_or_default(),
        );
    }
}

fn main() -> horizon_forms::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let animals = vec![
        Animal { name: "Cow", class: "Mammals" },
        Animal { name: "Sparrow", class: "Birds" },
        Animal { name: "Sheep", class: "Mammals" },
        Animal { name: "Owl", class: "Birds" },
    ];
    let pet = OptionsRow::builder("Pet", animals)
        .with_group_order(["Mammals", "Birds"])
        .with_empty_selection("None")
        .build()?;

    let name = Row::text_field("Name").with_placeholder("Your name");
    let newsletter = Row::switch("Newsletter").with_value(false);
    let email = Row::email("Email")
        .with_placeholder("name@example.com")
        .with_hidden(true);
    let email_row = email.clone();
    let newsletter = newsletter.on_value_changed(move |row| {
        let on = row.value().and_then(|value| value.as_bool()).unwrap_or(false);
        email_row.set_hidden(!on);
    });

    let form = Form::new(headless::renderer_registry()?)
        .with_title("Profile")
        .with_sections(vec![
            Section::new(vec![name.clone(), pet.row().clone()]).with_title("About you"),
            Section::new(vec![newsletter, email]).with_title("Updates"),
        ]);

    let main_loop = Arc::new(MainLoop::new());
    let stack = NavigationStack::new(main_loop.clone());
    stack.push(Arc::new(FormScreen::new(form)));

    let Some(root) = stack.top_widget() else {
        return Ok(());
    };
    print_screen("profile", &root);

    root.input(IndexPath::new(0, 0), "Ada");
    root.input(IndexPath::new(1, 0), true);
    print_screen("after typing", &root);

    root.tap(IndexPath::new(0, 1));
    main_loop.run_until_idle(4);
    if let Some(picker) = stack.top_widget() {
        print_screen("pet picker", &picker);
        println!("highlighted: {:?}", picker.selected_path());
        picker.tap(IndexPath::new(2, 0));
    }

    print_screen("profile again", &root);
    println!(
        "chosen pet: {}",
        pet.selected_option().map_or("none", |animal| animal.name)
    );
    Ok(())
}
