//! Read-time aggregation over the append-only collections.
//!
//! The store has no counters and no server-side pipelines, so every running
//! total of the original schema is recomputed here from immutable documents:
//! stock quantities from order lines, customer balance from delivered orders
//! and payment history, and the credit-risk data blob from the history rows
//! themselves.

use std::collections::{HashMap, HashSet};

use tpcc_core::{
  Error, Result,
  model::{Customer, History, Order},
  schema,
  store::{Document, DocumentStore, Filter, FindOptions, from_doc, get_i64},
};

pub struct Aggregator<'a, S> {
  store: &'a S,
}

impl<'a, S: DocumentStore> Aggregator<'a, S> {
  pub fn new(store: &'a S) -> Self {
    Self { store }
  }

  // ─── Stock quantities ──────────────────────────────────────────────────────

  /// Remaining stock quantity for each `(warehouse, item)` pair, derived from
  /// every order line ever written against that pair.
  ///
  /// Pairs with no stock document are absent from the result; callers decide
  /// whether that is fatal.
  pub async fn stock_quantities(
    &self,
    pairs: &[(i64, i64)],
  ) -> Result<HashMap<(i64, i64), i64>> {
    let wanted: HashSet<(i64, i64)> = pairs.iter().copied().collect();
    if wanted.is_empty() {
      return Ok(HashMap::new());
    }
    let i_ids: HashSet<i64> = wanted.iter().map(|&(_, i)| i).collect();

    // Which of the wanted pairs actually have a stock document.
    let stock_filter =
      Filter::new().is_in("s_i_id", i_ids.iter().copied().collect::<Vec<_>>());
    let stocked: HashSet<(i64, i64)> = self
      .store
      .find(schema::STOCK, &stock_filter, FindOptions::default())
      .await
      .map_err(Error::store)?
      .iter()
      .map(|doc| stock_key(doc))
      .collect::<Result<HashSet<_>>>()?
      .intersection(&wanted)
      .copied()
      .collect();

    // Total quantity sold per pair, summed over every order line that names
    // one of the wanted items.
    let order_filter = Filter::new()
      .is_in("order_line.ol_i_id", i_ids.iter().copied().collect::<Vec<_>>());
    let orders = self
      .store
      .find(schema::ORDERS, &order_filter, FindOptions::default())
      .await
      .map_err(Error::store)?;

    let mut sold: HashMap<(i64, i64), i64> = HashMap::new();
    for doc in orders {
      let order: Order = from_doc(doc)?;
      for line in &order.order_line {
        let pair = (line.ol_supply_w_id, line.ol_i_id);
        if stocked.contains(&pair) {
          *sold.entry(pair).or_insert(0) += line.ol_quantity;
        }
      }
    }

    Ok(
      stocked
        .into_iter()
        .map(|pair| {
          let total = sold.get(&pair).copied().unwrap_or(0);
          (pair, schema::wrap_quantity(total))
        })
        .collect(),
    )
  }

  /// Remaining quantity of one item at one warehouse. Missing stock here is a
  /// fatal inconsistency.
  pub async fn stock_quantity(&self, w_id: i64, i_id: i64) -> Result<i64> {
    self
      .stock_quantities(&[(w_id, i_id)])
      .await?
      .get(&(w_id, i_id))
      .copied()
      .ok_or(Error::StockNotFound { w_id, i_id })
  }

  // ─── Delivery status ───────────────────────────────────────────────────────

  /// The carrier that delivered an order, or `None` if no delivery batch has
  /// fulfilled it yet. The order and district ids must match within a single
  /// embedded record of one batch.
  pub async fn order_carrier(
    &self,
    w_id: i64,
    d_id: i64,
    o_id: i64,
  ) -> Result<Option<i64>> {
    let filter = Filter::new().eq("dl_w_id", w_id).elem_match(
      schema::DELIVERY_ORDERS,
      Filter::new().eq("dlo_d_id", d_id).eq("dlo_o_id", o_id),
    );
    let batch = self
      .store
      .find_one(schema::DELIVERY, &filter)
      .await
      .map_err(Error::store)?;
    match batch {
      Some(doc) => Ok(Some(get_i64(&doc, schema::DELIVERY, "dl_carrier_id")?)),
      None => Ok(None),
    }
  }

  // ─── Customer aggregates ───────────────────────────────────────────────────

  /// Sum of the order-line amounts of the customer's *delivered* orders.
  pub async fn customer_total_amount(&self, customer: &Customer) -> Result<f64> {
    let filter = Filter::new()
      .eq("o_w_id", customer.c_w_id)
      .eq("o_d_id", customer.c_d_id)
      .eq("o_c_id", customer.c_id);
    let orders = self
      .store
      .find(schema::ORDERS, &filter, FindOptions::default())
      .await
      .map_err(Error::store)?;

    let mut total = 0.0;
    for doc in orders {
      let order: Order = from_doc(doc)?;
      let delivered = self
        .order_carrier(order.o_w_id, order.o_d_id, order.o_id)
        .await?
        .is_some();
      if delivered {
        total += order.order_line.iter().map(|l| l.ol_amount).sum::<f64>();
      }
    }
    Ok(total)
  }

  /// Sum of the customer's payment amounts.
  pub async fn customer_ytd(&self, customer: &Customer) -> Result<f64> {
    Ok(self.history_of(customer).await?.iter().map(|h| h.h_amount).sum())
  }

  /// Derived balance: delivered order totals minus payments.
  pub async fn customer_balance(&self, customer: &Customer) -> Result<f64> {
    Ok(
      self.customer_total_amount(customer).await?
        - self.customer_ytd(customer).await?,
    )
  }

  /// The credit-risk data blob: the stored `c_data` followed by one line per
  /// payment in insertion order, `|`-separated and capped at
  /// [`schema::CUSTOMER_DATA_MAX`] characters.
  pub async fn customer_data(&self, customer: &Customer) -> Result<String> {
    let history = self.history_of(customer).await?;
    let mut parts = Vec::with_capacity(history.len() + 1);
    if !customer.c_data.is_empty() {
      parts.push(customer.c_data.clone());
    }
    for h in &history {
      parts.push(format!(
        "{} {} {} {} {} {}",
        h.h_c_id, h.h_c_d_id, h.h_c_w_id, h.h_d_id, h.h_w_id, h.h_amount
      ));
    }
    let joined = parts.join("|");
    Ok(joined.chars().take(schema::CUSTOMER_DATA_MAX).collect())
  }

  async fn history_of(&self, customer: &Customer) -> Result<Vec<History>> {
    let filter = Filter::new()
      .eq("h_c_w_id", customer.c_w_id)
      .eq("h_c_d_id", customer.c_d_id)
      .eq("h_c_id", customer.c_id);
    self
      .store
      .find(schema::HISTORY, &filter, FindOptions::default())
      .await
      .map_err(Error::store)?
      .into_iter()
      .map(from_doc)
      .collect()
  }
}

fn stock_key(doc: &Document) -> Result<(i64, i64)> {
  let w = get_i64(doc, schema::STOCK, "s_w_id")?;
  let i = get_i64(doc, schema::STOCK, "s_i_id")?;
  Ok((w, i))
}
