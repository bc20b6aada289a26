#![allow(dead_code)]

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::reader::{FileReader, SerializedFileReader};

pub fn write_players_csv(path: &Path, rows: usize) {
    let mut body = String::from("player_id,name,market_value_eur\n");
    for i in 1..=rows {
        body.push_str(&format!("{i},Player {i},{}.5\n", i * 1000));
    }
    fs::write(path, body).expect("write players csv");
}

pub fn write_clubs_csv(path: &Path, rows: usize) {
    let mut body = String::from("club_id,club_name\n");
    for i in 1..=rows {
        body.push_str(&format!("{i},Club {i}\n"));
    }
    fs::write(path, body).expect("write clubs csv");
}

/// Two columns (`id`, `name`) and `rows` rows.
pub fn write_parquet(path: &Path, rows: usize) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
    ]));
    let ids: ArrayRef = Arc::new(Int64Array::from_iter_values(0..rows as i64));
    let names: ArrayRef = Arc::new(StringArray::from_iter_values(
        (0..rows).map(|i| format!("row {i}")),
    ));
    let batch = RecordBatch::try_new(schema.clone(), vec![ids, names]).expect("build batch");

    let file = File::create(path).expect("create parquet");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("parquet writer");
    writer.write(&batch).expect("write batch");
    writer.close().expect("close parquet");
}

pub fn parquet_shape(path: &Path) -> (i64, usize) {
    let file = File::open(path).expect("open parquet");
    let reader = SerializedFileReader::new(file).expect("parquet reader");
    let meta = reader.metadata().file_metadata();
    (meta.num_rows(), meta.schema_descr().num_columns())
}

pub fn parquet_rows(path: &Path) -> Vec<String> {
    let file = File::open(path).expect("open parquet");
    let reader = SerializedFileReader::new(file).expect("parquet reader");
    reader
        .get_row_iter(None)
        .expect("row iter")
        .map(|row| row.expect("decode row").to_string())
        .collect()
}
