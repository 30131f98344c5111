//! Sections: titled, ordered groups of rows.

use crate::row::Row;

/// An ordered group of rows with an optional title.
///
/// Hidden rows stay in the section; they are skipped when the section is
/// asked for its visible rows. Visibility is evaluated on every call, so
/// positions always reflect the rows' current flags.
#[derive(Debug, Clone, Default)]
pub struct Section {
    title: Option<String>,
    rows: Vec<Row>,
}

impl Section {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { title: None, rows }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_row(mut self, row: impl Into<Row>) -> Self {
        self.rows.push(row.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// All rows, hidden ones included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn insert_row(&mut self, index: usize, row: Row) {
        self.rows.insert(index, row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows that are currently not hidden, in order.
    pub fn visible_rows(&self) -> Vec<Row> {
        self.rows
            .iter()
            .filter(|row| !row.is_hidden())
            .cloned()
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.is_hidden()).count()
    }

    /// The `index`-th visible row.
    pub fn visible_row(&self, index: usize) -> Option<Row> {
        self.rows
            .iter()
            .filter(|row| !row.is_hidden())
            .nth(index)
            .cloned()
    }

    /// Position of `row` among the visible rows, or `None` if it is hidden
    /// or not in this section.
    pub fn position_of(&self, row: &Row) -> Option<usize> {
        self.rows
            .iter()
            .filter(|candidate| !candidate.is_hidden())
            .position(|candidate| candidate == row)
    }

    pub fn contains(&self, row: &Row) -> bool {
        self.rows.iter().any(|candidate| candidate == row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(titles: &[&str]) -> Vec<Row> {
        titles.iter().map(|title| Row::label(*title)).collect()
    }

    fn titles(rows: &[Row]) -> Vec<String> {
        rows.iter().filter_map(Row::title).collect()
    }

    #[test]
    fn test_visible_rows_skip_hidden_and_keep_order() {
        let all = rows(&["a", "b", "c", "d", "e"]);
        all[1].set_hidden(true);
        all[3].set_hidden(true);
        let section = Section::new(all.clone());

        assert_eq!(section.len(), 5);
        assert_eq!(section.visible_count(), 3);
        assert_eq!(titles(&section.visible_rows()), vec!["a", "c", "e"]);
        assert_eq!(section.visible_row(1).and_then(|r| r.title()).as_deref(), Some("c"));
        assert!(section.visible_row(3).is_none());
    }

    #[test]
    fn test_visibility_is_live() {
        let all = rows(&["a", "b"]);
        let section = Section::new(all.clone());
        assert_eq!(section.visible_count(), 2);
        all[0].set_hidden(true);
        assert_eq!(section.visible_count(), 1);
        all[0].set_hidden(false);
        assert_eq!(titles(&section.visible_rows()), vec!["a", "b"]);
    }

    #[test]
    fn test_position_of() {
        let all = rows(&["a", "b", "c"]);
        all[0].set_hidden(true);
        let section = Section::new(all.clone());

        assert_eq!(section.position_of(&all[0]), None);
        assert_eq!(section.position_of(&all[1]), Some(0));
        assert_eq!(section.position_of(&all[2]), Some(1));
        assert_eq!(section.position_of(&Row::label("x")), None);
        assert!(section.contains(&all[0]));
    }

    #[test]
    fn test_builders() {
        let section = Section::default()
            .with_title("Account")
            .with_row(Row::email("Email"))
            .with_row(Row::password("Password"));
        assert_eq!(section.title(), Some("Account"));
        assert_eq!(section.len(), 2);
        assert!(!section.is_empty());
    }
}
