// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GeoLife-Tracker: load GPS trajectory recordings into a relational store
//! and analyse them.
//!
//! Raw trajectory files are split into activities using the users'
//! transportation-mode labels, stored in SQLite and queried for summary
//! reports, including which users were close to each other in space and
//! time.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;
