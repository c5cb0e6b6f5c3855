// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Identity and persistence for the shape model

pub mod document;
pub mod entity_id;

pub use document::ShapeDocument;
pub use entity_id::EntityId;
