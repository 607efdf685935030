//! Fixture workbooks shared by the integration tests

#![allow(dead_code)]

use isbe_schools::normalize::RCD_HEADER;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use std::path::{Path, PathBuf};

pub const HEADER: &[&str] = &[
    RCD_HEADER,
    "RecType",
    "FacilityName",
    "Address",
    "City",
    "Zip",
    "CountyName",
    "GradeServed",
    "NCES ID",
];

pub fn add_sheet(book: &mut XlsxWorkbook, name: &str, rows: &[&[&str]]) {
    let sheet = book.add_worksheet();
    sheet.set_name(name).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            // Zip codes are stored as numbers, like the published workbook
            if let Ok(n) = cell.parse::<f64>() {
                if c == 5 && r > 0 {
                    sheet.write_number(r as u32, c as u16, n).unwrap();
                    continue;
                }
            }
            sheet.write_string(r as u32, c as u16, *cell).unwrap();
        }
    }
}

pub fn directory_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("dir_ed_entities.xlsx");
    let mut book = XlsxWorkbook::new();
    add_sheet(
        &mut book,
        "Read Me",
        &[&["Directory of Educational Entities"], &["Published by ISBE"]],
    );
    add_sheet(
        &mut book,
        "Public Dist & Schls",
        &[
            HEADER,
            &[
                "51084186002",
                "Public",
                "Lincoln Middle School",
                "300 S 11th St",
                "Springfield",
                "62703",
                "Sangamon",
                "6-8",
                "173708003774",
            ],
            &[
                "51084186000",
                "Dist",
                "Springfield SD 186",
                "1900 W Monroe St",
                "Springfield",
                "62704",
                "Sangamon",
                "P-12",
                "",
            ],
            &["", "", "", "", "", "", "", "", ""],
            &[
                "51000000000",
                "ROE",
                "ROE 51",
                "200 S 9th St",
                "Springfield",
                "62701",
                "Sangamon",
                "P-12",
                "",
            ],
        ],
    );
    book.save(&path).unwrap();
    path
}
