//! Pair and recommendation tables served as records.

use analytics_core::pipelines::records::{
    all_columns, key_and_top_columns, page, project, without_score_columns,
};
use analytics_core::{Error, OrderedMap, Result, Table};
use serde::Serialize;
use serde_json::Value;

use crate::engine::{body, Inputs};
use crate::view::{ViewName, ViewRequest};

#[derive(Serialize)]
struct Page {
    total: usize,
    offset: usize,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct TableMeta {
    rows: usize,
    columns: Vec<String>,
    etag: String,
    #[serde(flatten)]
    page: Option<Page>,
}

#[derive(Serialize)]
struct Records<'t> {
    data: Vec<OrderedMap<&'t str, Value>>,
    meta: TableMeta,
}

fn render(
    inputs: &Inputs,
    table: &Table,
    columns: &[usize],
    paged: Option<(usize, Option<usize>)>,
) -> Result<String> {
    let range = match paged {
        Some((offset, limit)) => page(table.len(), offset, limit),
        None => 0..table.len(),
    };
    let data = project(table, columns, range);
    body(&Records {
        meta: TableMeta {
            rows: data.len(),
            columns: columns.iter().map(|&i| table.headers()[i].clone()).collect(),
            etag: inputs.token(),
            page: paged.map(|(offset, limit)| Page {
                total: table.len(),
                offset,
                limit,
            }),
        },
        data,
    })
}

/// Every column in file order; the co-occurrence table is paginated.
pub fn records(inputs: &Inputs, request: &ViewRequest) -> Result<String> {
    let table = inputs.table(request.view.datasets()[0])?;
    let paged = match request.view {
        ViewName::Cooccurrence => Some((
            request.query.offset.unwrap_or(0) as usize,
            request.limit()?,
        )),
        _ => None,
    };
    render(inputs, table, &all_columns(table), paged)
}

/// `Product ID` followed by the `Top N` columns in numeric order.
pub fn basket_cf(inputs: &Inputs, _request: &ViewRequest) -> Result<String> {
    let table = inputs.table("basket_cf")?;
    let key = table
        .column_index("Product ID")
        .ok_or_else(|| Error::schema_mismatch(table.name(), ["Product ID"]))?;
    render(inputs, table, &key_and_top_columns(table, key), None)
}

/// Hybrid recommendations; score columns only on request.
pub fn hybrid(inputs: &Inputs, request: &ViewRequest) -> Result<String> {
    let table = inputs.table("hybrid")?;
    let columns = if request.query.include_scores {
        all_columns(table)
    } else {
        without_score_columns(table)
    };
    render(inputs, table, &columns, None)
}
