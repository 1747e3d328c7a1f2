// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Helpers for dotted variable paths.
//!
//! A path is zero or more component segments followed by a variable name:
//! `"x"` is a boundary variable of the current assembly, `"comp.x"` is
//! variable `x` of child `comp`, `"sub.inner.x"` reaches one level deeper.

/// Split a path at its first dot into `(owner, rest)`.
///
/// ```
/// use the_assembly::graph::path::split;
///
/// assert_eq!(split("comp.x"), (Some("comp"), "x"));
/// assert_eq!(split("sub.inner.x"), (Some("sub"), "inner.x"));
/// assert_eq!(split("x"), (None, "x"));
/// ```
pub fn split(path: &str) -> (Option<&str>, &str) {
    match path.split_once('.') {
        Some((owner, rest)) => (Some(owner), rest),
        None => (None, path),
    }
}

/// The child component owning `path`, or `None` for a boundary variable.
pub fn owner(path: &str) -> Option<&str> {
    split(path).0
}

pub fn join(owner: &str, name: &str) -> String {
    format!("{}.{}", owner, name)
}

/// The last segment of a path.
pub fn leaf(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}

/// True when both ends belong to the same child component. Such edges come
/// from a child's own input-to-output dependencies, never from a connection.
pub fn is_internal_edge(src: &str, dst: &str) -> bool {
    match (owner(src), owner(dst)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Names must be non-empty and free of dots.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_edges_share_an_owner() {
        assert!(is_internal_edge("q.in", "q.out"));
        assert!(!is_internal_edge("p.out", "q.in"));
        assert!(!is_internal_edge("x", "y"));
        assert!(!is_internal_edge("x", "q.in"));
    }

    #[test]
    fn leaf_is_last_segment() {
        assert_eq!(leaf("a.b.c"), "c");
        assert_eq!(leaf("c"), "c");
    }

    #[test]
    fn names_reject_dots() {
        assert!(is_valid_name("comp1"));
        assert!(!is_valid_name("a.b"));
        assert!(!is_valid_name(""));
    }
}
