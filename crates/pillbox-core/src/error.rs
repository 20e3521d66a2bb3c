// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PickerError {
    #[error("selection index {index} is out of bounds for {len} candidates")]
    InvalidIndex { index: isize, len: usize },

    #[error("no candidate is selected")]
    NoSelection,

    #[error("picker is not open")]
    NotOpen,
}
