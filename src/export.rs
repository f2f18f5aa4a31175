//! Spreadsheet export.
//!
//! Renders the journal as a single-sheet `.xlsx` workbook, one row per
//! (record, event) pair.
use log::{debug, trace};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::{format_date_for_display, Record, Result};

pub const SHEET_NAME: &str = "Journal";

pub const HEADERS: [&str; 6] = [
    "Reception date-time",
    "Remedy",
    "Potency",
    "Event date",
    "Event time",
    "Event description",
];

/// Columns before this index describe the record, the rest the event.
const EVENT_COLUMN: usize = 3;

const MIN_COLUMN_WIDTH: usize = 10;

const RECORD_HEADER_FILL: u32 = 0xE6F0E6;
const EVENT_HEADER_FILL: u32 = 0xE6F0FF;
const EVENT_BODY_FILL: u32 = 0xFFE4E1;

/// Flattens the journal into spreadsheet rows.
///
/// Records without events produce a single row with blank event columns.
pub fn journal_rows(records: &[Record]) -> Vec<[String; 6]> {
    let mut rows = Vec::new();
    for record in records {
        let head = [
            record.date_time.clone(),
            record.remedy.clone(),
            record.potency.clone(),
        ];
        if record.events.is_empty() {
            let [date_time, remedy, potency] = head;
            rows.push([
                date_time,
                remedy,
                potency,
                String::new(),
                String::new(),
                String::new(),
            ]);
            continue;
        }
        for event in &record.events {
            let [date_time, remedy, potency] = head.clone();
            rows.push([
                date_time,
                remedy,
                potency,
                format_date_for_display(&event.date),
                event.time.clone(),
                event.description.clone(),
            ]);
        }
    }
    rows
}

fn header_format(fill: u32) -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_background_color(Color::RGB(fill))
        .set_border(FormatBorder::Thin)
}

/// Renders the records to `.xlsx` bytes.
pub fn render_workbook(records: &[Record]) -> Result<Vec<u8>> {
    let rows = journal_rows(records);
    debug!("Rendering workbook with {} data rows", rows.len());

    let record_header = header_format(RECORD_HEADER_FILL);
    let event_header = header_format(EVENT_HEADER_FILL);
    let record_body = Format::new().set_border(FormatBorder::Thin);
    let event_body = Format::new()
        .set_background_color(Color::RGB(EVENT_BODY_FILL))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Top)
        .set_text_wrap();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in HEADERS.iter().enumerate() {
        let format = if col < EVENT_COLUMN {
            &record_header
        } else {
            &event_header
        };
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_number = (i + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            let format = if col < EVENT_COLUMN {
                &record_body
            } else {
                &event_body
            };
            if value.is_empty() {
                sheet.write_blank(row_number, col as u16, format)?;
            } else {
                sheet.write_string_with_format(row_number, col as u16, value, format)?;
            }
        }
    }

    for (col, width) in column_widths(&rows).into_iter().enumerate() {
        trace!("Column {} width {}", col, width);
        sheet.set_column_width(col as u16, width as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Longest line per column plus padding, never below the minimum width.
fn column_widths(rows: &[[String; 6]]) -> [usize; 6] {
    let mut widths = [0usize; 6];
    let all_rows = std::iter::once(HEADERS.map(str::to_string)).chain(rows.iter().cloned());
    for row in all_rows {
        for (col, value) in row.iter().enumerate() {
            let longest = value.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            widths[col] = widths[col].max(longest);
        }
    }
    widths.map(|w| (w + 2).max(MIN_COLUMN_WIDTH))
}
