//! Parameter and result types of the five transaction profiles.
//!
//! Parameters arrive from an external workload harness as opaque structures;
//! nothing here generates ids or randomizes distributions. Results carry the
//! display fields each profile is required to hand back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Customer, District, Order, OrderLine, Warehouse};

// ─── Customer selection ──────────────────────────────────────────────────────

/// Payment and OrderStatus address a customer either by id or by last name.
/// Last-name selection picks the middle customer (`(count − 1) / 2`, integer
/// division) of all matches in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CustomerSelector {
  Id(i64),
  LastName(String),
}

impl std::fmt::Display for CustomerSelector {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Id(id) => write!(f, "c_id={id}"),
      Self::LastName(last) => write!(f, "c_last={last:?}"),
    }
  }
}

// ─── NewOrder ────────────────────────────────────────────────────────────────

/// The three item arrays are parallel and must be the same length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderParams {
  pub w_id:      i64,
  pub d_id:      i64,
  pub c_id:      i64,
  pub o_entry_d: DateTime<Utc>,
  pub i_ids:     Vec<i64>,
  pub i_w_ids:   Vec<i64>,
  pub i_qtys:    Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrandGeneric {
  Brand,
  Generic,
}

impl BrandGeneric {
  pub fn as_char(self) -> char {
    match self {
      Self::Brand => 'B',
      Self::Generic => 'G',
    }
  }
}

/// Per-line display data returned by NewOrder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderLine {
  pub i_name:        String,
  pub s_quantity:    i64,
  pub brand_generic: BrandGeneric,
  pub i_price:       f64,
  pub ol_amount:     f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderOutput {
  pub customer: Customer,
  pub w_tax:    f64,
  pub d_tax:    f64,
  pub o_id:     i64,
  /// `sum(ol_amount) × (1 − c_discount) × (1 + w_tax + d_tax)`.
  pub total:    f64,
  pub lines:    Vec<NewOrderLine>,
}

// ─── Payment ─────────────────────────────────────────────────────────────────

/// `(w_id, d_id)` is where the payment is made; `(c_w_id, c_d_id)` is where
/// the customer lives — the two differ for remote payments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentParams {
  pub w_id:     i64,
  pub d_id:     i64,
  pub h_amount: f64,
  pub c_w_id:   i64,
  pub c_d_id:   i64,
  pub customer: CustomerSelector,
  pub h_date:   DateTime<Utc>,
}

/// The customer's `c_data` holds the concatenated payment history for
/// credit-risk customers and is empty otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
  pub warehouse: Warehouse,
  pub district:  District,
  pub customer:  Customer,
}

// ─── OrderStatus ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusParams {
  pub w_id:     i64,
  pub d_id:     i64,
  pub customer: CustomerSelector,
}

/// The district's most recent order with its delivery status resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastOrder {
  pub order:        Order,
  /// `None` until a delivery batch records the order as fulfilled.
  pub o_carrier_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusOutput {
  pub customer: Customer,
  /// Derived: delivered order-line totals minus payment totals.
  pub balance:  f64,
  pub order:    Option<LastOrder>,
  pub lines:    Vec<OrderLine>,
}

// ─── StockLevel ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockLevelParams {
  pub w_id:      i64,
  pub d_id:      i64,
  pub threshold: i64,
}

// ─── Delivery ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryParams {
  pub w_id:          i64,
  pub o_carrier_id:  i64,
  pub ol_delivery_d: DateTime<Utc>,
}

/// One district's fulfilled order from a Delivery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredOrder {
  pub d_id: i64,
  pub o_id: i64,
}
