// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tabular export of element information and wall centerlines
//!
//! Rows use the column names of the element and wall tables. Wall rows are
//! rendered as JSON records, CSV, or a XAML resource dictionary.

use crate::attributes::ElementAttributesRow;
use crate::error::{Error, Result};
use crate::grouping::{round_to, StoreyGroup};
use ifc_plan_geometry::{ProjectedElement, WallSegment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::str::FromStr;

/// Output format for exported rows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Xaml,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xaml => "xaml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xaml" => Ok(ExportFormat::Xaml),
            other => Err(Error::Export(format!("unknown export format '{}'", other))),
        }
    }
}

/// A row that can be written as CSV
pub trait TableRow {
    const HEADER: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// One row of the element information table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementRow {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Elevation")]
    pub elevation: f64,
    #[serde(rename = "Vertex Count")]
    pub vertex_count: usize,
    #[serde(rename = "Face Count")]
    pub face_count: usize,
}

impl From<&ProjectedElement> for ElementRow {
    fn from(element: &ProjectedElement) -> Self {
        Self {
            kind: element.kind.name().to_string(),
            name: element.name.clone(),
            elevation: round_to(element.elevation, 2),
            vertex_count: element.vertex_count(),
            face_count: element.face_count(),
        }
    }
}

impl TableRow for ElementRow {
    const HEADER: &'static [&'static str] = &["Type", "Name", "Elevation", "Vertex Count", "Face Count"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.kind.clone(),
            self.name.clone(),
            format_number(self.elevation),
            self.vertex_count.to_string(),
            self.face_count.to_string(),
        ]
    }
}

/// One row of the simplified wall table, values rounded to 2 decimals
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSegmentRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Elevation")]
    pub elevation: f64,
    #[serde(rename = "Start_X")]
    pub start_x: f64,
    #[serde(rename = "Start_Y")]
    pub start_y: f64,
    #[serde(rename = "End_X")]
    pub end_x: f64,
    #[serde(rename = "End_Y")]
    pub end_y: f64,
    #[serde(rename = "Length")]
    pub length: f64,
}

impl From<&WallSegment> for WallSegmentRow {
    fn from(segment: &WallSegment) -> Self {
        Self {
            name: segment.name.clone(),
            elevation: round_to(segment.elevation, 2),
            start_x: round_to(segment.start.x, 2),
            start_y: round_to(segment.start.y, 2),
            end_x: round_to(segment.end.x, 2),
            end_y: round_to(segment.end.y, 2),
            length: round_to(segment.length, 2),
        }
    }
}

impl TableRow for WallSegmentRow {
    const HEADER: &'static [&'static str] =
        &["Name", "Elevation", "Start_X", "Start_Y", "End_X", "End_Y", "Length"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            format_number(self.elevation),
            format_number(self.start_x),
            format_number(self.start_y),
            format_number(self.end_x),
            format_number(self.end_y),
            format_number(self.length),
        ]
    }
}

/// Element rows of the given groups, in drawing order
pub fn element_rows(groups: &[StoreyGroup]) -> Vec<ElementRow> {
    groups
        .iter()
        .flat_map(|g| &g.elements)
        .map(ElementRow::from)
        .collect()
}

pub fn wall_rows(segments: &[WallSegment]) -> Vec<WallSegmentRow> {
    segments.iter().map(WallSegmentRow::from).collect()
}

/// Integral values keep one decimal ("5.0"), others print shortest
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Header line plus one line per row
pub fn to_csv<R: TableRow>(rows: &[R]) -> String {
    let mut out = R::HEADER.join(",");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row.cells().iter().map(|c| escape_csv(c)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// JSON array of records
pub fn to_json<R: Serialize>(rows: &[R]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// WPF resource dictionary holding a `WallData` collection
pub fn walls_to_xaml(rows: &[WallSegmentRow]) -> String {
    let mut out = String::from(
        "<ResourceDictionary\n    \
         xmlns=\"http://schemas.microsoft.com/winfx/2006/xaml/presentation\"\n    \
         xmlns:x=\"http://schemas.microsoft.com/winfx/2006/xaml\">\n",
    );
    out.push_str("    <CompositeCollection x:Key=\"WallData\">\n");
    for row in rows {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "        <Wall Name=\"{}\" Elevation=\"{}\">",
            escape_xml(&row.name),
            format_number(row.elevation)
        );
        let _ = writeln!(
            out,
            "            <Point Start=\"{},{}\" End=\"{},{}\" />",
            format_number(row.start_x),
            format_number(row.start_y),
            format_number(row.end_x),
            format_number(row.end_y)
        );
        let _ = writeln!(
            out,
            "            <Length Value=\"{}\" />",
            format_number(row.length)
        );
        out.push_str("        </Wall>\n");
    }
    out.push_str("    </CompositeCollection>\n");
    out.push_str("</ResourceDictionary>");
    out
}

/// Render wall rows in any export format
pub fn render_walls(rows: &[WallSegmentRow], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(rows),
        ExportFormat::Csv => Ok(to_csv(rows)),
        ExportFormat::Xaml => Ok(walls_to_xaml(rows)),
    }
}

/// Attribute table as CSV
///
/// Quantity columns follow the fixed columns, sorted by name, and cover
/// every quantity present in any row. Absent values are empty cells.
pub fn attributes_to_csv(rows: &[ElementAttributesRow]) -> String {
    let quantity_columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.quantities.keys().map(String::as_str))
        .collect();

    let mut header: Vec<String> = ElementAttributesRow::HEADER
        .iter()
        .map(|c| c.to_string())
        .collect();
    header.extend(quantity_columns.iter().map(|c| escape_csv(c)));
    let mut out = header.join(",");
    out.push('\n');

    for row in rows {
        let cells: Vec<String> = row
            .fixed_cells()
            .into_iter()
            .chain(
                quantity_columns
                    .iter()
                    .map(|column| row.quantities.get(*column).map(|v| format_number(*v))),
            )
            .map(|cell| cell.map(|c| escape_csv(&c)).unwrap_or_default())
            .collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

/// Render attribute rows; XAML is only defined for wall data
pub fn render_attributes(rows: &[ElementAttributesRow], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(rows),
        ExportFormat::Csv => Ok(attributes_to_csv(rows)),
        ExportFormat::Xaml => Err(Error::Export(
            "XAML export is only available for wall data".to_string(),
        )),
    }
}

/// Render element rows; XAML is only defined for wall data
pub fn render_elements(rows: &[ElementRow], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(rows),
        ExportFormat::Csv => Ok(to_csv(rows)),
        ExportFormat::Xaml => Err(Error::Export(
            "XAML export is only available for wall data".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_plan_core::EntityId;
    use ifc_plan_geometry::Point2;

    fn segment() -> WallSegment {
        WallSegment {
            id: EntityId(3),
            name: "Basic Wall, 200mm".to_string(),
            elevation: 0.0,
            start: Point2::new(0.504, 0.0),
            end: Point2::new(0.504, 4.996),
            length: 4.996,
        }
    }

    #[test]
    fn test_wall_row_rounding() {
        let row = WallSegmentRow::from(&segment());
        assert_eq!(row.start_x, 0.5);
        assert_eq!(row.end_y, 5.0);
        assert_eq!(row.length, 5.0);
    }

    #[test]
    fn test_json_uses_column_names() {
        let json = to_json(&wall_rows(&[segment()])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["Name"], "Basic Wall, 200mm");
        assert_eq!(value[0]["Start_X"], 0.5);
        assert_eq!(value[0]["Length"], 5.0);
    }

    #[test]
    fn test_csv_quotes_names() {
        let csv = to_csv(&wall_rows(&[segment()]));
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Name,Elevation,Start_X,Start_Y,End_X,End_Y,Length")
        );
        assert_eq!(
            lines.next(),
            Some("\"Basic Wall, 200mm\",0.0,0.5,0.0,0.5,5.0,5.0")
        );
    }

    #[test]
    fn test_xaml_layout() {
        let mut wall = segment();
        wall.name = "A&B".to_string();
        let xaml = walls_to_xaml(&wall_rows(&[wall]));

        assert!(xaml.starts_with("<ResourceDictionary"));
        assert!(xaml.contains("<CompositeCollection x:Key=\"WallData\">"));
        assert!(xaml.contains("<Wall Name=\"A&amp;B\" Elevation=\"0.0\">"));
        assert!(xaml.contains("<Point Start=\"0.5,0.0\" End=\"0.5,5.0\" />"));
        assert!(xaml.contains("<Length Value=\"5.0\" />"));
        assert!(xaml.ends_with("</ResourceDictionary>"));
    }

    #[test]
    fn test_element_xaml_rejected() {
        assert!(render_elements(&[], ExportFormat::Xaml).is_err());
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_attributes_csv_leaves_absent_cells_empty() {
        let mut wall = ElementAttributesRow {
            ifc_type: "IfcWall".to_string(),
            name: "Wall, North".to_string(),
            guid: Some("0xYz".to_string()),
            global_x: Some(1.0),
            global_y: Some(2.0),
            global_z: Some(0.0),
            ..Default::default()
        };
        wall.quantities.insert("Length_Width".to_string(), 0.2);
        let slab = ElementAttributesRow {
            ifc_type: "IfcSlab".to_string(),
            name: "Unnamed".to_string(),
            bbox_length: Some(4.0),
            ..Default::default()
        };

        let csv = attributes_to_csv(&[wall, slab]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Type,Name,GUID,Global X,Global Y,Global Z,\
             Bounding Box Length,Bounding Box Width,Bounding Box Height,Length_Width"
        );
        assert_eq!(lines[1], "IfcWall,\"Wall, North\",0xYz,1.0,2.0,0.0,,,,0.2");
        assert_eq!(lines[2], "IfcSlab,Unnamed,,,,,4.0,,,");
        assert!(render_attributes(&[], ExportFormat::Xaml).is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5.0");
        assert_eq!(format_number(0.15), "0.15");
        assert_eq!(format_number(-2.5), "-2.5");
    }
}
