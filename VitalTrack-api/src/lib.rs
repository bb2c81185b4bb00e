// VitalTrack API
//
// HTTP surface over the VitalTrack domain: reading management, dashboard,
// reports, CSV export and backup/restore.

pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
