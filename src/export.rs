//! CSV export of event lists and position tables.
//!
//! Events and GRS transits are written through flat `serde` row structs, one line
//! per record with a header. The position table has one line per scan step with the
//! `X, Y, Z` of every moon disk and shadow (`io_disk_x`, …, `callisto_shadow_z`).

use std::io::Write;

use serde::Serialize;

use crate::{
    calculator::PositionRecord,
    constants::JD,
    events::JovianEvent,
    grs::GrsEvent,
    jovian_errors::JovianError,
    satellites::{Moon, ViewKind},
};

#[derive(Debug, Serialize)]
struct EventRow<'a> {
    jd_begin: JD,
    jd_max: JD,
    jd_end: JD,
    code: &'a str,
    moon: u8,
    description: &'a str,
    hidden_at_begin: bool,
    hidden_at_end: bool,
    sun_alt_begin: f64,
    sun_alt_end: f64,
    jupiter_alt_begin: f64,
    jupiter_alt_end: f64,
}

impl<'a> From<&'a JovianEvent> for EventRow<'a> {
    fn from(e: &'a JovianEvent) -> Self {
        EventRow {
            jd_begin: e.jd_begin,
            jd_max: e.jd_max,
            jd_end: e.jd_end,
            code: &e.code,
            moon: e.moon.number(),
            description: &e.description,
            hidden_at_begin: e.is_eclipsed_at_begin,
            hidden_at_end: e.is_eclipsed_at_end,
            sun_alt_begin: e.alt_begin.sun,
            sun_alt_end: e.alt_end.sun,
            jupiter_alt_begin: e.alt_begin.jupiter,
            jupiter_alt_end: e.alt_end.jupiter,
        }
    }
}

#[derive(Debug, Serialize)]
struct GrsRow {
    jd_appear: JD,
    jd_transit: JD,
    jd_disappear: JD,
    sun_alt_appear: f64,
    sun_alt_transit: f64,
    sun_alt_disappear: f64,
    jupiter_alt_appear: f64,
    jupiter_alt_transit: f64,
    jupiter_alt_disappear: f64,
}

impl From<&GrsEvent> for GrsRow {
    fn from(e: &GrsEvent) -> Self {
        GrsRow {
            jd_appear: e.jd_appear,
            jd_transit: e.jd_transit,
            jd_disappear: e.jd_disappear,
            sun_alt_appear: e.alt_appear.sun,
            sun_alt_transit: e.alt_transit.sun,
            sun_alt_disappear: e.alt_disappear.sun,
            jupiter_alt_appear: e.alt_appear.jupiter,
            jupiter_alt_transit: e.alt_transit.jupiter,
            jupiter_alt_disappear: e.alt_disappear.jupiter,
        }
    }
}

/// Write `events` as CSV with a header line.
pub fn write_events_csv<W: Write>(writer: W, events: &[JovianEvent]) -> Result<(), JovianError> {
    let mut csv = csv::Writer::from_writer(writer);
    for event in events {
        csv.serialize(EventRow::from(event))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write GRS transits as CSV with a header line.
pub fn write_grs_csv<W: Write>(writer: W, transits: &[GrsEvent]) -> Result<(), JovianError> {
    let mut csv = csv::Writer::from_writer(writer);
    for transit in transits {
        csv.serialize(GrsRow::from(transit))?;
    }
    csv.flush()?;
    Ok(())
}

fn position_header() -> Vec<String> {
    let mut header = vec!["jd".to_string()];
    for moon in Moon::ALL {
        for view in ViewKind::ALL {
            let view = match view {
                ViewKind::Disk => "disk",
                ViewKind::Shadow => "shadow",
            };
            for axis in ["x", "y", "z"] {
                header.push(format!("{}_{view}_{axis}", moon.name().to_lowercase()));
            }
        }
    }
    header
}

/// Write the hourly position table as CSV: `jd` then 24 coordinate columns.
pub fn write_positions_csv<W: Write>(
    writer: W,
    table: &[PositionRecord],
) -> Result<(), JovianError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(position_header())?;

    for row in table {
        let mut record = Vec::with_capacity(25);
        record.push(row.jd.to_string());
        for moon in Moon::ALL {
            for view in ViewKind::ALL {
                let p = row.frame.get(moon, view);
                record.extend([p.x, p.y, p.z].iter().map(|v| format!("{v:.6}")));
            }
        }
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}
