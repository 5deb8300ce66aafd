//! Tableau Table
//!
//! Converting a tableau into a printable table.
//!
//! A small wrapper on prettytable::Table, because it doesn't provide any public method to
//! retrieve the title row, which the JSON export needs.
//!

use super::Tableau;
use crate::util::*;
use prettytable::format::TableFormat;
use prettytable::*;

#[derive(Clone)]
pub struct VizTable {
    pub title: Row,
    pub rows: Vec<Row>,
}

impl VizTable {
    pub fn new(tableau: &Tableau) -> Self {
        Self::highlighted(tableau, None)
    }

    /// mark the pivot row and column, the pivot itself in bold
    pub fn highlighted(tableau: &Tableau, pivot: Option<(RowIndex, ColumnIndex)>) -> Self {
        let mut title = Row::empty();
        title.add_cell(Cell::new(""));
        for column in 0..tableau.width() {
            let cell = Cell::new(tableau.column_title(column).as_str());
            title.add_cell(match pivot {
                Some((_, pivot_column)) if pivot_column == column => cell.style_spec("bFr"),
                _ => cell.style_spec("bFm"),
            });
        }
        let mut rows: Vec<Row> = vec![];
        for row in 0..tableau.height() {
            let mut table_row = Row::empty();
            table_row.add_cell(Cell::new(tableau.row_title(row).as_str()).style_spec("bFb"));
            for column in 0..tableau.width() {
                let cell = Cell::new(pretty_coefficient(tableau.get(row, column)).as_str());
                table_row.add_cell(match pivot {
                    Some(position) if position == (row, column) => cell.style_spec("bFr"),
                    Some((pivot_row, pivot_column)) if pivot_row == row || pivot_column == column => cell.style_spec("Fr"),
                    _ => cell,
                });
            }
            rows.push(table_row);
        }
        Self { title, rows }
    }
}

lazy_static! {
    pub static ref DEFAULT_TABLE_FORMAT: TableFormat = {
        let mut format = TableFormat::new();
        format.padding(0, 0);
        format.column_separator('\u{250A}');
        format.borders('\u{250A}');
        use format::LinePosition::*;
        let separators = [
            (Intern, ['\u{2500}', '\u{253C}', '\u{251C}', '\u{2524}']),
            (Top, ['\u{2500}', '\u{252C}', '\u{250C}', '\u{2510}']),
            (Bottom, ['\u{2500}', '\u{2534}', '\u{2514}', '\u{2518}']),
            (Title, ['\u{2550}', '\u{256A}', '\u{255E}', '\u{2561}']),
        ];
        for (position, s) in separators {
            format.separators(&[position], format::LineSeparator::new(s[0], s[1], s[2], s[3]))
        }
        format
    };
}

impl From<VizTable> for Table {
    fn from(viz_table: VizTable) -> Table {
        let mut table = Table::new();
        table.set_format(*DEFAULT_TABLE_FORMAT);
        table.set_titles(viz_table.title.clone());
        for row in viz_table.rows.iter() {
            table.add_row(row.clone());
        }
        table
    }
}

impl From<VizTable> for serde_json::Value {
    fn from(viz_table: VizTable) -> serde_json::Value {
        let mut table_json = vec![];
        let mut title_json = vec![];
        for cell in viz_table.title.iter() {
            title_json.push(cell.get_content());
        }
        table_json.push(title_json);
        for row in viz_table.rows.iter() {
            let mut row_json = vec![];
            for cell in row {
                row_json.push(cell.get_content());
            }
            table_json.push(row_json);
        }
        json!(table_json)
    }
}

pub trait VizTrait {
    fn viz_table(&self) -> VizTable;
    fn printstd_str(&self) -> String {
        Table::from(self.viz_table()).to_string().replace('\r', "")
    }
    fn printstd(&self) {
        #[cfg(feature = "colorful")]
        Table::from(self.viz_table()).printstd();
        #[cfg(not(feature = "colorful"))]
        println!("{}", Table::from(self.viz_table()));
    }
}

impl VizTrait for VizTable {
    fn viz_table(&self) -> VizTable {
        self.clone()
    }
}

impl VizTrait for Tableau {
    fn viz_table(&self) -> VizTable {
        VizTable::new(self)
    }
}
