//! The selection screen an options row presents.
//!
//! A [`SelectionScreen`] lists every option of its originating
//! [`OptionsRow`] as a choice row, marks the currently selected one, and
//! writes the user's pick back into the originating row before dismissing
//! itself.
//!
//! # Layout
//!
//! * Ungrouped rows get a single untitled section.
//! * Grouped rows get one section per group title, configured titles first.
//! * When an empty selection is allowed, a "no selection" choice is added:
//!   at the top of the only section, or as its own leading section when
//!   there are several.
//!
//! # States
//!
//! ```text
//! Initializing --did_appear--> Displayed --choice/unload--> Dismissed
//! ```
//!
//! The screen is single use: once dismissed, further taps are ignored.

use std::fmt;
use std::sync::{Arc, Weak};

use horizon_forms_core::MainLoop;
use horizon_forms_core::logging::targets;
use parking_lot::Mutex;

use crate::form::Form;
use crate::kind::RowKind;
use crate::navigation::Screen;
use crate::options::{Grouping, OptionItem, OptionsRow};
use crate::renderer::{RendererRegistry, SharedRenderer};
use crate::row::Row;
use crate::section::Section;
use crate::value::Value;
use crate::widget::{IndexPath, ScrollPosition};

/// Lifecycle state of a [`SelectionScreen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// Built, not yet shown.
    Initializing,
    /// Shown; the selected choice has been highlighted.
    Displayed,
    /// A choice was made or the screen was removed.
    Dismissed,
}

/// A screen that picks one option for an [`OptionsRow`].
pub struct SelectionScreen<T: OptionItem> {
    origin: OptionsRow<T>,
    form: Form,
    highlighted: Option<IndexPath>,
    state: Mutex<SelectionState>,
}

impl<T: OptionItem> SelectionScreen<T> {
    /// Builds the screen for `origin`.
    pub fn new(origin: OptionsRow<T>, registry: Arc<RendererRegistry>) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<Self>| {
            let sections = build_sections(&origin, this);
            let highlighted = find_highlighted(&sections);

            let mut form = Form::new(registry);
            if let Some(title) = origin.row().title() {
                form = form.with_title(title);
            }
            let form = form.with_sections(sections);

            tracing::debug!(
                target: targets::SELECTION,
                origin = %origin.row().id(),
                sections = form.section_count(),
                highlighted = ?highlighted,
                "selection screen built"
            );

            Self {
                origin,
                form,
                highlighted,
                state: Mutex::new(SelectionState::Initializing),
            }
        })
    }

    pub fn origin(&self) -> &OptionsRow<T> {
        &self.origin
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn state(&self) -> SelectionState {
        *self.state.lock()
    }

    /// Position of the choice that renders the current selection.
    pub fn highlighted_path(&self) -> Option<IndexPath> {
        self.highlighted
    }

    /// Writes the pick into the originating row and dismisses the screen.
    fn choose(&self, index: Option<usize>) {
        {
            let mut state = self.state.lock();
            if *state == SelectionState::Dismissed {
                tracing::trace!(target: targets::SELECTION, "choice ignored after dismissal");
                return;
            }
            *state = SelectionState::Dismissed;
        }

        tracing::debug!(target: targets::SELECTION, origin = %self.origin.row().id(), choice = ?index, "option chosen");
        self.origin.set_selected_index(index);

        match self.form.navigator() {
            Some(navigator) => {
                navigator.pop();
            }
            None => {
                tracing::warn!(target: targets::SELECTION, "selection screen has no navigator to dismiss it");
            }
        }
    }
}

impl<T: OptionItem> Screen for SelectionScreen<T> {
    fn title(&self) -> Option<String> {
        self.origin.row().title()
    }

    fn form(&self) -> Form {
        self.form.clone()
    }

    /// Highlights the selected choice on the first appearance.
    ///
    /// The highlight is posted to the main loop so it lands after the widget
    /// has laid out its rows.
    fn did_appear(&self, main_loop: &MainLoop) {
        {
            let mut state = self.state.lock();
            if *state != SelectionState::Initializing {
                return;
            }
            *state = SelectionState::Displayed;
        }

        if let Some(path) = self.highlighted {
            let form = self.form.downgrade();
            main_loop.post(move || {
                if let Some(widget) = form.upgrade().and_then(|form| form.widget()) {
                    widget.select_row(Some(path), false, ScrollPosition::Middle);
                }
            });
        }
    }

    fn did_unload(&self) {
        *self.state.lock() = SelectionState::Dismissed;
        self.form.detach_widget();
    }
}

impl<T: OptionItem> fmt::Debug for SelectionScreen<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionScreen")
            .field("origin", &self.origin)
            .field("highlighted", &self.highlighted)
            .field("state", &self.state())
            .finish()
    }
}

/// A choice row; `index` is `None` for the "no selection" choice.
fn choice_row<T: OptionItem>(
    title: String,
    index: Option<usize>,
    selected: bool,
    screen: &Weak<SelectionScreen<T>>,
) -> Row {
    let row = Row::new(RowKind::Choice)
        .with_title(title)
        .with_value(Value::Bool(selected));
    let screen = screen.clone();
    row.set_activation_hook(Arc::new(move |_row: &Row, _renderer: &SharedRenderer| {
        if let Some(screen) = screen.upgrade() {
            screen.choose(index);
        }
    }));
    row
}

/// Option indices per section, with the section title.
fn group_indices<T: OptionItem>(
    options: &[T],
    grouping: &Grouping,
) -> Vec<(Option<String>, Vec<usize>)> {
    match grouping {
        Grouping::None if options.is_empty() => Vec::new(),
        Grouping::None => vec![(None, (0..options.len()).collect())],
        Grouping::ByGroupTitle { order } => {
            let mut groups: Vec<(String, Vec<usize>)> =
                order.iter().map(|title| (title.clone(), Vec::new())).collect();
            for (index, option) in options.iter().enumerate() {
                let title = option.group_title();
                match groups.iter_mut().find(|(group, _)| *group == title) {
                    Some((_, members)) => members.push(index),
                    None => groups.push((title, vec![index])),
                }
            }
            groups
                .into_iter()
                .filter(|(_, members)| !members.is_empty())
                .map(|(title, members)| (Some(title).filter(|t| !t.is_empty()), members))
                .collect()
        }
    }
}

fn build_sections<T: OptionItem>(
    origin: &OptionsRow<T>,
    screen: &Weak<SelectionScreen<T>>,
) -> Vec<Section> {
    let options = origin.options();
    let current = origin.selected_option();

    let mut sections: Vec<Section> = group_indices(options, origin.grouping())
        .into_iter()
        .map(|(title, members)| {
            let rows = members
                .into_iter()
                .map(|index| {
                    let option = &options[index];
                    let selected = current.as_ref() == Some(option);
                    choice_row(option.title(), Some(index), selected, screen)
                })
                .collect();
            let section = Section::new(rows);
            match title {
                Some(title) => section.with_title(title),
                None => section,
            }
        })
        .collect();

    if origin.allows_empty_selection() {
        let empty = choice_row(
            origin.empty_selection_label(),
            None,
            current.is_none(),
            screen,
        );
        match sections.len() {
            0 => sections.push(Section::new(vec![empty])),
            1 => sections[0].insert_row(0, empty),
            _ => sections.insert(0, Section::new(vec![empty])),
        }
    }

    sections
}

/// The first marked choice in the built sections.
fn find_highlighted(sections: &[Section]) -> Option<IndexPath> {
    sections.iter().enumerate().find_map(|(section, rows)| {
        rows.visible_rows()
            .iter()
            .position(|row| row.value() == Some(Value::Bool(true)))
            .map(|row| IndexPath::new(section, row))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless;

    #[derive(Debug, Clone, PartialEq)]
    struct Player {
        name: &'static str,
        team: &'static str,
    }

    impl OptionItem for Player {
        fn title(&self) -> String {
            self.name.to_string()
        }

        fn group_title(&self) -> String {
            self.team.to_string()
        }
    }

    fn players() -> Vec<Player> {
        vec![
            Player { name: "Ann", team: "2" },
            Player { name: "Bob", team: "1" },
            Player { name: "Cid", team: "2" },
            Player { name: "Dee", team: "3" },
        ]
    }

    fn screen<T: OptionItem>(origin: OptionsRow<T>) -> Arc<SelectionScreen<T>> {
        SelectionScreen::new(origin, headless::renderer_registry().unwrap())
    }

    fn layout<T: OptionItem>(screen: &SelectionScreen<T>) -> Vec<(Option<String>, Vec<String>)> {
        screen
            .form()
            .sections()
            .iter()
            .map(|section| {
                (
                    section.title().map(str::to_string),
                    section.rows().iter().filter_map(Row::title).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_ungrouped_layout_marks_selection() {
        let origin = OptionsRow::builder("Animal", vec!["Cow", "Dog", "Sheep"])
            .with_selected("Dog")
            .build()
            .unwrap();
        let screen = screen(origin);

        assert_eq!(
            layout(&screen),
            vec![(None, vec!["Cow".into(), "Dog".into(), "Sheep".into()])]
        );
        assert_eq!(screen.highlighted_path(), Some(IndexPath::new(0, 1)));
        assert_eq!(screen.state(), SelectionState::Initializing);
        assert_eq!(screen.title().as_deref(), Some("Animal"));

        let marks: Vec<_> = screen.form().rows().iter().map(Row::value).collect();
        assert_eq!(
            marks,
            vec![
                Some(Value::Bool(false)),
                Some(Value::Bool(true)),
                Some(Value::Bool(false)),
            ]
        );
    }

    #[test]
    fn test_grouping_in_discovery_order() {
        let origin = OptionsRow::builder("Player", players())
            .with_grouping()
            .build()
            .unwrap();
        assert_eq!(
            layout(&screen(origin)),
            vec![
                (Some("2".into()), vec!["Ann".into(), "Cid".into()]),
                (Some("1".into()), vec!["Bob".into()]),
                (Some("3".into()), vec!["Dee".into()]),
            ]
        );
    }

    #[test]
    fn test_grouping_with_configured_order() {
        let origin = OptionsRow::builder("Player", players())
            .with_group_order(["1", "9", "2"])
            .build()
            .unwrap();
        assert_eq!(
            layout(&screen(origin)),
            vec![
                (Some("1".into()), vec!["Bob".into()]),
                (Some("2".into()), vec!["Ann".into(), "Cid".into()]),
                (Some("3".into()), vec!["Dee".into()]),
            ]
        );
    }

    #[test]
    fn test_empty_choice_joins_single_section() {
        let origin = OptionsRow::builder("Animal", vec!["Cow", "Dog"])
            .with_empty_selection("None")
            .build()
            .unwrap();
        let screen = screen(origin);
        assert_eq!(
            layout(&screen),
            vec![(None, vec!["None".into(), "Cow".into(), "Dog".into()])]
        );
        assert_eq!(screen.highlighted_path(), Some(IndexPath::new(0, 0)));
    }

    #[test]
    fn test_empty_choice_leads_multiple_sections() {
        let origin = OptionsRow::builder("Player", players())
            .with_group_order(["1", "2"])
            .with_empty_selection("Nobody")
            .build()
            .unwrap();
        let origin_view = origin.clone();
        origin_view
            .set_selected_option(Some(players()[2].clone()))
            .unwrap();
        let screen = screen(origin);

        let layout = layout(&screen);
        assert_eq!(layout[0], (None, vec!["Nobody".to_string()]));
        assert_eq!(layout.len(), 4);
        let nobody_count = layout
            .iter()
            .flat_map(|(_, rows)| rows)
            .filter(|title| *title == "Nobody")
            .count();
        assert_eq!(nobody_count, 1);
        assert_eq!(screen.highlighted_path(), Some(IndexPath::new(2, 1)));
    }

    #[test]
    fn test_no_options_no_empty_choice() {
        let origin = OptionsRow::builder("Animal", Vec::<String>::new())
            .build()
            .unwrap();
        let screen = screen(origin);
        assert!(layout(&screen).is_empty());
        assert_eq!(screen.highlighted_path(), None);
    }

    #[test]
    fn test_did_appear_posts_highlight_once() {
        let origin = OptionsRow::builder("Animal", vec!["Cow", "Dog"])
            .with_selected("Cow")
            .build()
            .unwrap();
        let screen = screen(origin);
        let main_loop = MainLoop::new();

        screen.did_appear(&main_loop);
        screen.did_appear(&main_loop);

        assert_eq!(screen.state(), SelectionState::Displayed);
        assert_eq!(main_loop.pending_count(), 1);
    }

    #[test]
    fn test_choice_writes_back_and_is_single_use() {
        let origin = OptionsRow::builder("Animal", vec!["Cow", "Dog", "Sheep"])
            .with_selected("Dog")
            .build()
            .unwrap();
        let screen = screen(origin.clone());
        let renderer: SharedRenderer = Arc::new(headless::HeadlessRenderer::new(
            crate::kind::RendererKind::CHOICE,
        ));

        screen.form().did_select(IndexPath::new(0, 2), &renderer);
        assert_eq!(origin.selected_option(), Some("Sheep"));
        assert_eq!(screen.state(), SelectionState::Dismissed);

        screen.form().did_select(IndexPath::new(0, 0), &renderer);
        assert_eq!(origin.selected_option(), Some("Sheep"));
    }

    #[test]
    fn test_empty_choice_clears_selection() {
        let origin = OptionsRow::builder("Animal", vec!["Cow"])
            .with_selected("Cow")
            .with_empty_selection("None")
            .build()
            .unwrap();
        let screen = screen(origin.clone());
        let renderer: SharedRenderer = Arc::new(headless::HeadlessRenderer::new(
            crate::kind::RendererKind::CHOICE,
        ));

        screen.form().did_select(IndexPath::new(0, 0), &renderer);
        assert_eq!(origin.selected_option(), None);
        assert_eq!(origin.row().value(), None);
    }
}
