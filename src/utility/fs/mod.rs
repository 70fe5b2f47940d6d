// repoman-rs: Repository Maintenance Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities with parallel traversal.
//!
//! ```text
//! walk:  parallel_walk()  ignore::WalkParallel (multi-core)
//!        find_files()     glob pattern matching
//!        WalkOptions      max_depth, hidden, gitignore, skip_dirs
//! path:  normalize()      absolute + lexical `.`/`..` folding
//! ```

pub mod path;
pub mod walk;

#[cfg(test)]
mod tests;
