use calamine::Data;
use species_map_common::CellValue;

/// calamine cell → shared cell value
pub fn to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Other(other.to_string()),
    }
}
