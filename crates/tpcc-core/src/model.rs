//! Typed views of the stored documents.
//!
//! Field names are the TPC-C column names, so these structs (de)serialize
//! directly against the documents the load phase produces. Item, Warehouse,
//! District, Customer, and Stock are bulk-created once and never mutated by
//! the engine. Order, History, and Delivery documents are created exactly
//! once by a transaction and never updated or deleted; every running total
//! is derived from them at read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
  pub i_id:    i64,
  pub i_im_id: i64,
  pub i_name:  String,
  pub i_price: f64,
  pub i_data:  String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
  pub w_id:       i64,
  pub w_name:     String,
  pub w_street_1: String,
  pub w_street_2: String,
  pub w_city:     String,
  pub w_state:    String,
  pub w_zip:      String,
  pub w_tax:      f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct District {
  pub d_id:       i64,
  pub d_w_id:     i64,
  pub d_name:     String,
  pub d_street_1: String,
  pub d_street_2: String,
  pub d_city:     String,
  pub d_state:    String,
  pub d_zip:      String,
  pub d_tax:      f64,
}

/// Only `c_data` ever changes in a returned customer, and only in the copy
/// handed back by Payment — the stored document is never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
  pub c_id:         i64,
  pub c_d_id:       i64,
  pub c_w_id:       i64,
  pub c_first:      String,
  pub c_middle:     String,
  pub c_last:       String,
  pub c_street_1:   String,
  pub c_street_2:   String,
  pub c_city:       String,
  pub c_state:      String,
  pub c_zip:        String,
  pub c_phone:      String,
  pub c_since:      DateTime<Utc>,
  pub c_credit:     String,
  pub c_credit_lim: f64,
  pub c_discount:   f64,
  pub c_data:       String,
}

/// One line of an order, embedded in its [`Order`] document. Quantity and
/// amount are immutable once written; `ol_amount = ol_quantity × i_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
  pub ol_number:      i64,
  pub ol_i_id:        i64,
  pub ol_supply_w_id: i64,
  pub ol_quantity:    i64,
  pub ol_amount:      f64,
  pub ol_dist_info:   String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
  pub o_id:       i64,
  pub o_d_id:     i64,
  pub o_w_id:     i64,
  pub o_c_id:     i64,
  pub o_ol_cnt:   i64,
  pub o_entry_d:  DateTime<Utc>,
  #[serde(default)]
  pub order_line: Vec<OrderLine>,
}

/// One fulfilled order, embedded in its [`DeliveryBatch`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeliveryOrder {
  pub dlo_o_id: i64,
  pub dlo_d_id: i64,
}

/// One carrier run over a warehouse: at most one fulfilled order per
/// district. Districts with nothing to deliver are simply absent from the
/// embedded list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryBatch {
  pub dl_delivery_d:   DateTime<Utc>,
  pub dl_w_id:         i64,
  pub dl_carrier_id:   i64,
  #[serde(default)]
  pub delivery_orders: Vec<DeliveryOrder>,
}

/// An immutable payment event. Customer year-to-date and balance are derived
/// by scanning these records, never by updating a counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
  pub h_c_id:   i64,
  pub h_c_d_id: i64,
  pub h_c_w_id: i64,
  pub h_d_id:   i64,
  pub h_w_id:   i64,
  pub h_date:   DateTime<Utc>,
  pub h_amount: f64,
  pub h_data:   String,
}

/// The highest order id delivered so far in one district — the explicit form
/// of the "max delivered id" scan. Absence means the district has never been
/// delivered and fulfillment starts from order id 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeliveryCursor {
  pub dc_w_id:      i64,
  pub dc_d_id:      i64,
  pub dc_last_o_id: i64,
}
