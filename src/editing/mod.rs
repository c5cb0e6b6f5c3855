// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod pointer;
pub mod selection;
pub mod session;

pub use hit_test::{HitOptions, HitPriority, HitResult, HitTarget};
pub use pointer::{KeyCommand, Modifiers, PointerDelegate, PointerEvent, PointerSample, Ray};
pub use selection::{ActiveDrag, AnchorRef, Selection, SelectionState};
pub use session::{ChangeSet, DeleteEffect, EditSession};
