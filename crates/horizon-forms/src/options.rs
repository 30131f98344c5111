//! Options rows: pick one value from a list.
//!
//! An [`OptionsRow`] is a typed view over a [`Row`] of kind
//! [`RowKind::Selection`]. The row's value is a [`Choice`] pointing into the
//! option list; tapping the row pushes a [`SelectionScreen`] through the
//! form's navigator, and picking an option there writes it back through the
//! ordinary [`Row::set_value`] path.
//!
//! ```
//! use horizon_forms::prelude::*;
//!
//! let animals = OptionsRow::builder("Animal", vec!["Cow", "Dog", "Sheep"])
//!     .with_selected("Dog")
//!     .build()
//!     .unwrap();
//! assert_eq!(animals.selected_option(), Some("Dog"));
//! assert_eq!(animals.row().display_text().as_deref(), Some("Dog"));
//!
//! let err = OptionsRow::builder("Animal", vec!["Cow", "Dog"])
//!     .with_selected("Horse")
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, FormError::OptionNotFound { .. }));
//! ```
//!
//! [`SelectionScreen`]: crate::selection::SelectionScreen

use std::fmt;
use std::sync::Arc;

use horizon_forms_core::logging::targets;

use crate::error::{FormError, Result};
use crate::kind::{RowKind, SelectionConfig};
use crate::renderer::SharedRenderer;
use crate::row::Row;
use crate::selection::SelectionScreen;
use crate::value::{Choice, Value};

/// A value that can be offered by an options row.
///
/// Equality decides which option is currently selected.
pub trait OptionItem: Clone + PartialEq + Send + Sync + 'static {
    /// The text shown for this option.
    fn title(&self) -> String;

    /// The group this option is listed under when the row is grouped.
    fn group_title(&self) -> String {
        String::new()
    }
}

impl OptionItem for String {
    fn title(&self) -> String {
        self.clone()
    }
}

impl OptionItem for &'static str {
    fn title(&self) -> String {
        (*self).to_string()
    }
}

/// How a selection screen splits options into sections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Grouping {
    /// All options in one section.
    #[default]
    None,
    /// One section per group title. Titles in `order` come first in that
    /// order; other titles follow in the order they are first seen.
    ByGroupTitle { order: Vec<String> },
}

pub(crate) struct OptionsData<T> {
    options: Vec<T>,
    grouping: Grouping,
}

/// A selection row with a typed option list.
pub struct OptionsRow<T: OptionItem> {
    row: Row,
    data: Arc<OptionsData<T>>,
}

impl<T: OptionItem> Clone for OptionsRow<T> {
    fn clone(&self) -> Self {
        Self {
            row: self.row.clone(),
            data: self.data.clone(),
        }
    }
}

impl<T: OptionItem> OptionsRow<T> {
    pub fn builder(title: impl Into<String>, options: Vec<T>) -> OptionsRowBuilder<T> {
        OptionsRowBuilder::new(title, options)
    }

    /// The underlying row, for placing into a section.
    pub fn row(&self) -> &Row {
        &self.row
    }

    pub fn into_row(self) -> Row {
        self.row
    }

    pub fn options(&self) -> &[T] {
        &self.data.options
    }

    pub fn grouping(&self) -> &Grouping {
        &self.data.grouping
    }

    pub fn config(&self) -> SelectionConfig {
        match self.row.kind() {
            RowKind::Selection(config) => config,
            _ => SelectionConfig::default(),
        }
    }

    pub fn allows_empty_selection(&self) -> bool {
        self.config().allow_empty_selection
    }

    pub fn empty_selection_label(&self) -> String {
        self.config().empty_selection_label
    }

    /// Index of the selected option.
    pub fn selected_index(&self) -> Option<usize> {
        match self.row.value() {
            Some(Value::Choice(choice)) if choice.index < self.data.options.len() => {
                Some(choice.index)
            }
            _ => None,
        }
    }

    pub fn selected_option(&self) -> Option<T> {
        self.selected_index()
            .and_then(|index| self.data.options.get(index).cloned())
    }

    /// Selects `option`, or clears the selection with `None`.
    ///
    /// Goes through [`Row::set_value`], so the bound renderer refreshes and
    /// `value_changed` fires.
    pub fn set_selected_option(&self, option: Option<T>) -> Result<()> {
        let index = match option {
            Some(option) => Some(
                position_of(&self.data.options, &option)
                    .ok_or_else(|| FormError::option_not_found(option.title()))?,
            ),
            None => None,
        };
        self.set_selected_index(index);
        Ok(())
    }

    pub(crate) fn set_selected_index(&self, index: Option<usize>) {
        let value = index.map(|index| choice_value(&self.data.options, index));
        self.row.set_optional_value(value);
    }

    /// Pushes a selection screen through the form's navigator.
    pub fn present(&self) -> Result<Arc<SelectionScreen<T>>> {
        let no_navigator = || FormError::NoNavigator {
            title: self.row.title().unwrap_or_default(),
        };
        let form = self.row.form().ok_or_else(no_navigator)?;
        let navigator = form.navigator().ok_or_else(no_navigator)?;

        let screen = SelectionScreen::new(self.clone(), form.registry());
        screen.form().set_navigator(Arc::downgrade(&navigator));
        tracing::debug!(
            target: targets::SELECTION,
            row = %self.row.id(),
            options = self.data.options.len(),
            "presenting selection screen"
        );
        navigator.push(screen.clone());
        Ok(screen)
    }

    /// Shows the title of the option a choice names, so the row never
    /// displays a choice that [`selected_option`](Self::selected_option)
    /// does not resolve.
    fn install_display(&self) {
        let data = self.data.clone();
        self.row.set_display_hook(Arc::new(move |value: &Value| match value {
            Value::Choice(choice) => data.options.get(choice.index).map(OptionItem::title),
            _ => None,
        }));
    }

    fn install_activation(&self) {
        let data = self.data.clone();
        self.row
            .set_activation_hook(Arc::new(move |row: &Row, _renderer: &SharedRenderer| {
                let view = OptionsRow {
                    row: row.clone(),
                    data: data.clone(),
                };
                if let Err(err) = view.present() {
                    tracing::warn!(target: targets::SELECTION, row = %row.id(), error = %err, "cannot open selection screen");
                }
            }));
    }
}

impl<T: OptionItem> From<OptionsRow<T>> for Row {
    fn from(options: OptionsRow<T>) -> Self {
        options.row
    }
}

impl<T: OptionItem> fmt::Debug for OptionsRow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsRow")
            .field("row", &self.row)
            .field("options", &self.data.options.len())
            .field("grouping", &self.data.grouping)
            .finish()
    }
}

/// Builder for [`OptionsRow`].
pub struct OptionsRowBuilder<T> {
    title: String,
    options: Vec<T>,
    selected: Option<T>,
    grouping: Grouping,
    config: SelectionConfig,
    height: Option<f32>,
    hidden: bool,
}

impl<T: OptionItem> OptionsRowBuilder<T> {
    pub fn new(title: impl Into<String>, options: Vec<T>) -> Self {
        Self {
            title: title.into(),
            options,
            selected: None,
            grouping: Grouping::None,
            config: SelectionConfig::default(),
            height: None,
            hidden: false,
        }
    }

    /// The initially selected option. Must be one of the options.
    pub fn with_selected(mut self, option: T) -> Self {
        self.selected = Some(option);
        self
    }

    /// Group options by [`OptionItem::group_title`], in discovery order.
    pub fn with_grouping(mut self) -> Self {
        if self.grouping == Grouping::None {
            self.grouping = Grouping::ByGroupTitle { order: Vec::new() };
        }
        self
    }

    /// Group options with the given group titles first, in this order.
    pub fn with_group_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grouping = Grouping::ByGroupTitle {
            order: order.into_iter().map(Into::into).collect(),
        };
        self
    }

    /// Offer a "no selection" choice with this title.
    pub fn with_empty_selection(mut self, label: impl Into<String>) -> Self {
        self.config.allow_empty_selection = true;
        self.config.empty_selection_label = label.into();
        self
    }

    pub fn with_disclosure(mut self, show: bool) -> Self {
        self.config.show_disclosure = show;
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Builds the row.
    ///
    /// Fails with [`FormError::OptionNotFound`] if the selected option is not
    /// one of the options.
    pub fn build(self) -> Result<OptionsRow<T>> {
        let selected = match &self.selected {
            Some(option) => Some(
                position_of(&self.options, option)
                    .ok_or_else(|| FormError::option_not_found(option.title()))?,
            ),
            None => None,
        };

        let mut row = Row::new(RowKind::Selection(self.config))
            .with_title(self.title)
            .with_hidden(self.hidden);
        if let Some(height) = self.height {
            row = row.with_height(height);
        }
        if let Some(index) = selected {
            row = row.with_value(choice_value(&self.options, index));
        }

        let options = OptionsRow {
            row,
            data: Arc::new(OptionsData {
                options: self.options,
                grouping: self.grouping,
            }),
        };
        options.install_display();
        options.install_activation();
        Ok(options)
    }
}

/// First position of `option`; duplicates resolve to the earliest.
fn position_of<T: PartialEq>(options: &[T], option: &T) -> Option<usize> {
    options.iter().position(|candidate| candidate == option)
}

fn choice_value<T: OptionItem>(options: &[T], index: usize) -> Value {
    Value::Choice(Choice::new(index, options[index].title()))
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::form::Form;
    use crate::headless;
    use crate::section::Section;

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

    #[test]
    fn test_build_with_selection() {
        let row = OptionsRow::builder("Animal", vec!["Cow", "Dog", "Sheep"])
            .with_selected("Sheep")
            .build()
            .unwrap();
        assert_eq!(row.selected_index(), Some(2));
        assert_eq!(row.selected_option(), Some("Sheep"));
        assert_eq!(row.row().title().as_deref(), Some("Animal"));
        assert!(!row.allows_empty_selection());
    }

    #[test]
    fn test_build_rejects_unknown_selection() {
        let err = OptionsRow::builder("Animal", vec!["Cow".to_string()])
            .with_selected("Horse".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, FormError::OptionNotFound { ref title } if title == "Horse"));
    }

    #[test]
    fn test_set_selected_option_notifies() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let row = OptionsRow::builder("Animal", vec!["Cow", "Dog"]).build().unwrap();
        row.row()
            .signals()
            .value_changed
            .connect(move |row| seen_clone.lock().push(row.display_text()));

        row.set_selected_option(Some("Dog")).unwrap();
        row.set_selected_option(None).unwrap();
        assert!(row.set_selected_option(Some("Horse")).is_err());

        assert_eq!(*seen.lock(), vec![Some("Dog".to_string()), None]);
        assert_eq!(row.selected_option(), None);
    }

    #[test]
    fn test_duplicate_options_resolve_to_first() {
        let row = OptionsRow::builder("Pick", vec!["A", "B", "A"])
            .with_selected("A")
            .build()
            .unwrap();
        assert_eq!(row.selected_index(), Some(0));
    }

    #[test]
    fn test_out_of_range_choice_shows_nothing() {
        let row = OptionsRow::builder("Animal", vec!["Cow", "Dog"]).build().unwrap();
        row.row().set_value(Value::Choice(Choice::new(99, "Ghost")));

        assert_eq!(row.selected_option(), None);
        assert_eq!(row.row().display_text(), None);

        let optional = OptionsRow::builder("Animal", vec!["Cow", "Dog"])
            .with_empty_selection("None")
            .build()
            .unwrap();
        optional.row().set_value(Value::Choice(Choice::new(5, "Ghost")));
        assert_eq!(optional.selected_option(), None);
        assert_eq!(optional.row().display_text().as_deref(), Some("None"));
    }

    #[test]
    fn test_stale_choice_title_uses_option_title() {
        let row = OptionsRow::builder("Animal", vec!["Cow", "Dog"]).build().unwrap();
        row.row().set_value(Value::Choice(Choice::new(1, "Wolf")));

        assert_eq!(row.selected_option(), Some("Dog"));
        assert_eq!(row.row().display_text().as_deref(), Some("Dog"));
    }

    #[test]
    fn test_empty_selection_config() {
        let row = OptionsRow::builder("Owner", Vec::<String>::new())
            .with_empty_selection("Nobody")
            .build()
            .unwrap();
        assert!(row.allows_empty_selection());
        assert_eq!(row.empty_selection_label(), "Nobody");
        assert_eq!(row.row().display_text().as_deref(), Some("Nobody"));
    }

    #[test]
    fn test_grouping_builders() {
        let players = vec![Player {
            name: "Ann",
            team: "1",
        }];
        let row = OptionsRow::builder("Player", players.clone())
            .with_grouping()
            .build()
            .unwrap();
        assert_eq!(row.grouping(), &Grouping::ByGroupTitle { order: vec![] });

        let row = OptionsRow::builder("Player", players)
            .with_group_order(["2", "1"])
            .build()
            .unwrap();
        assert_eq!(
            row.grouping(),
            &Grouping::ByGroupTitle {
                order: vec!["2".to_string(), "1".to_string()]
            }
        );
    }

    #[test]
    fn test_present_without_navigator_fails() {
        let row = OptionsRow::builder("Animal", vec!["Cow"]).build().unwrap();
        assert!(matches!(row.present(), Err(FormError::NoNavigator { .. })));

        let _form = Form::new(headless::renderer_registry().unwrap())
            .with_sections(vec![Section::new(vec![row.row().clone()])]);
        assert!(matches!(row.present(), Err(FormError::NoNavigator { .. })));
    }

    #[test]
    fn test_into_row() {
        let options = OptionsRow::builder("Animal", vec!["Cow"]).build().unwrap();
        let id = options.row().id();
        let section = Section::default().with_row(options);
        assert_eq!(section.rows()[0].id(), id);
    }
}
