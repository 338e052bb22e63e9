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

//! Transport-neutral update records and typed-record construction.
//!
//! Both transport variants funnel their native update callbacks into
//! [`RawFieldUpdate`], so everything downstream of the variant glue is
//! transport-agnostic. A [`FieldMapper`] turns raw updates into a typed
//! record; [`TypedStream`] applies one mapper to a raw event stream.

mod decode;
mod field_mapper;
mod raw_update;
mod typed_stream;

pub use decode::{decimal_field, quantity_field, text_field};
pub use field_mapper::FieldMapper;
pub use raw_update::{FieldChange, RawFieldUpdate};
pub use typed_stream::TypedStream;
