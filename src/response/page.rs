// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Pagination metadata and the page capability consumed by the builder.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current page number (0-based).
    pub number: u32,
    /// Number of items per page.
    pub size: u32,
    /// Total number of items across all pages.
    pub total_elements: u64,
    /// Total number of pages.
    pub total_pages: u32,
}

impl PageInfo {
    /// Zeroed page info for an empty result.
    pub fn empty(size: u32) -> Self {
        Self {
            number: 0,
            size,
            total_elements: 0,
            total_pages: 0,
        }
    }

    pub fn from_page<P: PageSource + ?Sized>(page: &P) -> Self {
        Self {
            number: page.number(),
            size: page.size(),
            total_elements: page.total_elements(),
            total_pages: page.total_pages(),
        }
    }
}

/// A page of results produced by some data source.
pub trait PageSource {
    type Item;

    fn number(&self) -> u32;
    fn size(&self) -> u32;
    fn total_elements(&self) -> u64;
    fn total_pages(&self) -> u32;
    /// Consume the page and return its items.
    fn into_content(self) -> Vec<Self::Item>
    where
        Self: Sized;
}

/// An in-memory page cut out of a fully materialized collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SlicePage<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    total_elements: u64,
}

impl<T> SlicePage<T> {
    /// Cut page `number` (0-based) of `size` items out of `items`.
    ///
    /// A size of zero is treated as one.
    pub fn new(items: Vec<T>, number: u32, size: u32) -> Self {
        let size = size.max(1);
        let total_elements = items.len() as u64;
        let start = (number as usize).saturating_mul(size as usize);
        let content = items
            .into_iter()
            .skip(start)
            .take(size as usize)
            .collect();
        Self {
            content,
            number,
            size,
            total_elements,
        }
    }

    pub fn content(&self) -> &[T] {
        &self.content
    }
}

impl<T> PageSource for SlicePage<T> {
    type Item = T;

    fn number(&self) -> u32 {
        self.number
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn total_elements(&self) -> u64 {
        self.total_elements
    }

    fn total_pages(&self) -> u32 {
        let pages = self.total_elements.div_ceil(u64::from(self.size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    fn into_content(self) -> Vec<T> {
        self.content
    }
}
