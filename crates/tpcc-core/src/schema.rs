//! The fixed TPC-C table schemas, denormalization layout, and benchmark
//! constants.
//!
//! Flat tuples arrive from the load harness with columns in exactly the order
//! listed here. Two tables are never stored on their own: `order_line` rows
//! are embedded in their `orders` parent and `delivery_orders` rows in their
//! `delivery` parent, grouped by a fixed prefix of their leading columns.

// ─── Collection names ────────────────────────────────────────────────────────

pub const ITEM: &str = "item";
pub const WAREHOUSE: &str = "warehouse";
pub const DISTRICT: &str = "district";
pub const CUSTOMER: &str = "customer";
pub const STOCK: &str = "stock";
pub const ORDERS: &str = "orders";
pub const ORDER_LINE: &str = "order_line";
pub const DELIVERY: &str = "delivery";
pub const DELIVERY_ORDERS: &str = "delivery_orders";
pub const HISTORY: &str = "history";

/// Per-district delivery cursors; written by the engine, never by the load.
pub const DELIVERY_CURSOR: &str = "delivery_cursor";

// ─── Benchmark constants ─────────────────────────────────────────────────────

pub const MIN_QUANTITY: i64 = 10;
pub const MAX_QUANTITY: i64 = 100;
/// Width of the stock quantity band, inclusive of both ends.
pub const QUANTITY_RANGE: i64 = MAX_QUANTITY - MIN_QUANTITY + 1;

pub const DISTRICTS_PER_WAREHOUSE: i64 = 10;

/// Marker substring distinguishing "brand" items and stock.
pub const ORIGINAL_STRING: &str = "ORIGINAL";

/// Credit flag marking a customer as a credit risk.
pub const BAD_CREDIT: &str = "BC";

/// Maximum length of the concatenated customer payment-history blob.
pub const CUSTOMER_DATA_MAX: usize = 500;

/// StockLevel examines the last 20 orders of a district.
pub const STOCK_LEVEL_ORDERS: i64 = 20;

// ─── Table specs ─────────────────────────────────────────────────────────────

/// How a table's tuples relate to stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Embedding {
  /// One stored document per flat tuple.
  Flat,
  /// Buffered at load time; children are merged in before the document is
  /// persisted. The first `split` columns form the grouping key.
  Parent {
    split:    usize,
    children: &'static [&'static str],
  },
  /// Never stored on its own. The first `split` columns identify the parent;
  /// the remaining columns become one embedded record.
  Child {
    parent: &'static str,
    split:  usize,
  },
}

/// One table of the fixed schema: its name, ordered columns, and how it is
/// denormalized into documents.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
  pub name:      &'static str,
  pub columns:   &'static [&'static str],
  pub embedding: Embedding,
}

pub const TABLES: &[TableSpec] = &[
  TableSpec {
    name:      ITEM,
    columns:   &["i_id", "i_im_id", "i_name", "i_price", "i_data"],
    embedding: Embedding::Flat,
  },
  TableSpec {
    name:      WAREHOUSE,
    columns:   &[
      "w_id", "w_name", "w_street_1", "w_street_2", "w_city", "w_state",
      "w_zip", "w_tax",
    ],
    embedding: Embedding::Flat,
  },
  TableSpec {
    name:      DISTRICT,
    columns:   &[
      "d_id", "d_w_id", "d_name", "d_street_1", "d_street_2", "d_city",
      "d_state", "d_zip", "d_tax",
    ],
    embedding: Embedding::Flat,
  },
  TableSpec {
    name:      CUSTOMER,
    columns:   &[
      "c_id", "c_d_id", "c_w_id", "c_first", "c_middle", "c_last",
      "c_street_1", "c_street_2", "c_city", "c_state", "c_zip", "c_phone",
      "c_since", "c_credit", "c_credit_lim", "c_discount", "c_data",
    ],
    embedding: Embedding::Flat,
  },
  TableSpec {
    name:      STOCK,
    columns:   &[
      "s_i_id", "s_w_id", "s_dist_01", "s_dist_02", "s_dist_03", "s_dist_04",
      "s_dist_05", "s_dist_06", "s_dist_07", "s_dist_08", "s_dist_09",
      "s_dist_10", "s_data",
    ],
    embedding: Embedding::Flat,
  },
  TableSpec {
    name:      ORDERS,
    columns:   &["o_id", "o_d_id", "o_w_id", "o_c_id", "o_ol_cnt", "o_entry_d"],
    embedding: Embedding::Parent { split: 3, children: &[ORDER_LINE] },
  },
  TableSpec {
    name:      ORDER_LINE,
    columns:   &[
      "ol_o_id", "ol_d_id", "ol_w_id", "ol_number", "ol_i_id",
      "ol_supply_w_id", "ol_quantity", "ol_amount", "ol_dist_info",
    ],
    embedding: Embedding::Child { parent: ORDERS, split: 3 },
  },
  TableSpec {
    name:      DELIVERY,
    columns:   &["dl_delivery_d", "dl_w_id", "dl_carrier_id"],
    embedding: Embedding::Parent { split: 2, children: &[DELIVERY_ORDERS] },
  },
  TableSpec {
    name:      DELIVERY_ORDERS,
    columns:   &["dlo_delivery_d", "dlo_w_id", "dlo_o_id", "dlo_d_id"],
    embedding: Embedding::Child { parent: DELIVERY, split: 2 },
  },
  TableSpec {
    name:      HISTORY,
    columns:   &[
      "h_c_id", "h_c_d_id", "h_c_w_id", "h_d_id", "h_w_id", "h_date",
      "h_amount", "h_data",
    ],
    embedding: Embedding::Flat,
  },
];

/// Look up a table spec by name. Unknown names are a load-harness bug.
pub fn table(name: &str) -> Option<&'static TableSpec> {
  TABLES.iter().find(|t| t.name == name)
}

/// The stock column carrying the info string for a given district.
pub fn stock_dist_column(d_id: i64) -> String {
  format!("s_dist_{d_id:02}")
}

/// Map a cumulative sold quantity onto the `[MIN_QUANTITY, MAX_QUANTITY]`
/// band. Stock holds no mutable quantity field; the remaining quantity is
/// defined as the original band floor minus everything sold, wrapped so it
/// never leaves the band.
pub fn wrap_quantity(sold: i64) -> i64 {
  MIN_QUANTITY + (-sold).rem_euclid(QUANTITY_RANGE)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wrap_quantity_stays_in_band() {
    for sold in [0, 1, 42, QUANTITY_RANGE - 1, QUANTITY_RANGE, 10_000] {
      let q = wrap_quantity(sold);
      assert!((MIN_QUANTITY..=MAX_QUANTITY).contains(&q), "sold={sold} q={q}");
    }
  }

  #[test]
  fn wrap_quantity_zero_sold_is_band_floor() {
    assert_eq!(wrap_quantity(0), MIN_QUANTITY);
  }

  #[test]
  fn wrap_quantity_wraps_past_band_width() {
    // One unit sold lands at the top of the band; a full band width of
    // sales returns to the floor.
    assert_eq!(wrap_quantity(1), MAX_QUANTITY);
    assert_eq!(wrap_quantity(QUANTITY_RANGE), MIN_QUANTITY);
    assert_eq!(wrap_quantity(QUANTITY_RANGE + 1), MAX_QUANTITY);
  }

  #[test]
  fn table_lookup() {
    assert_eq!(table(ORDERS).map(|t| t.name), Some(ORDERS));
    assert!(table("no_such_table").is_none());
  }

  #[test]
  fn stock_dist_column_is_zero_padded() {
    assert_eq!(stock_dist_column(3), "s_dist_03");
    assert_eq!(stock_dist_column(10), "s_dist_10");
  }
}
