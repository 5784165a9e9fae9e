// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod activity;
pub mod colocation;
pub mod label;
pub mod report;
pub mod trackpoint;
pub mod user;

pub use activity::Activity;
pub use colocation::{ColocationConfig, ColocationRecord, ColocationResult, EARTH_MEAN_RADIUS_M};
pub use label::LabelInterval;
pub use trackpoint::{RawPoint, TrackPoint};
pub use user::User;
