//! Set operations over posting lists.
//!
//! A posting list here is a strictly increasing slice of `NewsId`s. None of the
//! functions sort their inputs; callers hand in sorted, deduplicated lists and
//! get sorted, deduplicated lists back.

use crate::NewsId;
use std::cmp::Ordering;

/// Skip stride for a list of `len` elements: `floor(sqrt(len))`, at least 1.
fn skip_len(len: usize) -> usize { ((len as f64).sqrt() as usize).max(1) }

/// Move `at` forward in `list` towards `target`, jumping `skip` elements at a
/// time while the landing element is still below `target`.
#[inline]
fn advance(list: &[NewsId], mut at: usize, skip: usize, target: NewsId) -> usize {
    if at + skip < list.len() && list[at + skip] < target {
        while at + skip < list.len() && list[at + skip] < target {
            at += skip;
        }
        at
    } else {
        at + 1
    }
}

/// Elements present in both lists.
pub fn intersect(p1: &[NewsId], p2: &[NewsId]) -> Vec<NewsId> {
    let (skip1, skip2) = (skip_len(p1.len()), skip_len(p2.len()));
    let mut out = Vec::with_capacity(p1.len().min(p2.len()));
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match p1[i].cmp(&p2[j]) {
            Ordering::Equal => {
                out.push(p1[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => i = advance(p1, i, skip1, p2[j]),
            Ordering::Greater => j = advance(p2, j, skip2, p1[i]),
        }
    }
    out
}

/// Elements present in either list.
pub fn union(p1: &[NewsId], p2: &[NewsId]) -> Vec<NewsId> {
    let mut out = Vec::with_capacity(p1.len() + p2.len());
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match p1[i].cmp(&p2[j]) {
            Ordering::Equal => {
                out.push(p1[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(p1[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(p2[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&p1[i..]);
    out.extend_from_slice(&p2[j..]);
    out
}

/// Elements of `p1` that are not in `p2`.
pub fn difference(p1: &[NewsId], p2: &[NewsId]) -> Vec<NewsId> {
    let mut out = Vec::with_capacity(p1.len());
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match p1[i].cmp(&p2[j]) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(p1[i]);
                i += 1;
            }
            Ordering::Greater => j += 1,
        }
    }
    out.extend_from_slice(&p1[i..]);
    out
}

/// Every id of `universe` that is not in `p`.
pub fn complement(universe: &[NewsId], p: &[NewsId]) -> Vec<NewsId> { difference(universe, p) }
