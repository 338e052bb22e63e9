/********************************************************************************
 * Copyright (c) 2026 Contributors to the Feedlink project
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Market-data mapping for the demo quote adapter.
//!
//! Binds the full 12-field quote schema to a typed [`Quote`] record:
//! prices decode as decimals, quantities as integers, the rest as text. An
//! unparseable field never drops the record; it is logged and keeps its
//! previous value.
//!
//! ```
//! use feedlink::{FieldChange, FieldMapper, RawFieldUpdate};
//! use quote_feed::QuoteMapper;
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let update = RawFieldUpdate::new("item1")
//!     .with_field("stock_name", FieldChange::changed(None, Some("Anduct")))
//!     .with_field("last_price", FieldChange::changed(None, Some("3.04")));
//!
//! let quote = QuoteMapper.map(&update);
//! assert_eq!(quote.item, "item1");
//! assert_eq!(quote.stock_name.as_deref(), Some("Anduct"));
//! assert_eq!(quote.last_price, Some(Decimal::from_str("3.04").unwrap()));
//! assert_eq!(quote.bid, None);
//! ```

use feedlink::mapping::{decimal_field, quantity_field, text_field};
use feedlink::{
    FeedSubscription, FieldMapper, RawFieldUpdate, SubscriptionDescriptor, SubscriptionMode,
    TypedStream,
};
use rust_decimal::Decimal;

/// Schema field names, in wire order.
pub const QUOTE_FIELDS: [&str; 12] = [
    "stock_name",
    "last_price",
    "time",
    "pct_change",
    "bid_quantity",
    "bid",
    "ask",
    "ask_quantity",
    "min",
    "max",
    "ref_price",
    "open_price",
];

/// One instrument's current quote state. Fields are `None` until the feed
/// first delivers them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Quote {
    pub item: String,
    pub stock_name: Option<String>,
    pub last_price: Option<Decimal>,
    pub time: Option<String>,
    pub pct_change: Option<Decimal>,
    pub bid_quantity: Option<i64>,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub ask_quantity: Option<i64>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub ref_price: Option<Decimal>,
    pub open_price: Option<Decimal>,
}

/// Field mapper for the quote schema.
pub struct QuoteMapper;

impl FieldMapper for QuoteMapper {
    type Record = Quote;

    fn blank_record(&self, item_key: &str) -> Quote {
        Quote {
            item: item_key.to_owned(),
            ..Quote::default()
        }
    }

    fn apply(&self, record: &mut Quote, update: &RawFieldUpdate) {
        if let Some(value) = text_field(update, "stock_name") {
            record.stock_name = Some(value);
        }
        if let Some(value) = decimal_field(update, "last_price") {
            record.last_price = Some(value);
        }
        if let Some(value) = text_field(update, "time") {
            record.time = Some(value);
        }
        if let Some(value) = decimal_field(update, "pct_change") {
            record.pct_change = Some(value);
        }
        if let Some(value) = quantity_field(update, "bid_quantity") {
            record.bid_quantity = Some(value);
        }
        if let Some(value) = decimal_field(update, "bid") {
            record.bid = Some(value);
        }
        if let Some(value) = decimal_field(update, "ask") {
            record.ask = Some(value);
        }
        if let Some(value) = quantity_field(update, "ask_quantity") {
            record.ask_quantity = Some(value);
        }
        if let Some(value) = decimal_field(update, "min") {
            record.min = Some(value);
        }
        if let Some(value) = decimal_field(update, "max") {
            record.max = Some(value);
        }
        if let Some(value) = decimal_field(update, "ref_price") {
            record.ref_price = Some(value);
        }
        if let Some(value) = decimal_field(update, "open_price") {
            record.open_price = Some(value);
        }
    }
}

/// Ready-made descriptor for the demo quote adapter: ten items, the full
/// schema, snapshot on.
pub fn quote_descriptor() -> SubscriptionDescriptor {
    SubscriptionDescriptor::new(
        SubscriptionMode::Merge,
        "QUOTE_ADAPTER",
        (1..=10).map(|n| format!("item{n}")),
        QUOTE_FIELDS,
        true,
    )
}

/// Typed view over one subscription's event stream.
pub type QuoteStream = TypedStream<QuoteMapper>;

/// Attaches a typed quote consumer to the subscription's current cycle.
pub async fn quote_stream<S>(subscription: &S) -> QuoteStream
where
    S: FeedSubscription + ?Sized,
{
    QuoteStream::new(subscription.events().await, QuoteMapper)
}
