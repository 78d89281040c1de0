use hifitime::{Duration, Epoch, TimeScale, Unit};

use crate::constants::{Second, DPI, T2000};

/// Modified Julian Date of an epoch, UTC time scale.
///
/// UT1 − UTC stays below 0.9 s, well inside the time certainty of a hand-held
/// sight, so the UTC date stands in for UT1 wherever Earth rotation is needed.
pub fn mjd_utc(epoch: &Epoch) -> f64 {
    epoch.to_mjd_utc_days()
}

/// Modified Julian Date of an epoch, TT time scale.
pub fn mjd_tt(epoch: &Epoch) -> f64 {
    epoch.to_mjd_tt_days()
}

/// Shift an epoch by a signed number of seconds.
pub fn offset_epoch(epoch: &Epoch, seconds: Second) -> Epoch {
    *epoch + Duration::from_seconds(seconds)
}

/// Calendar year plus the elapsed fraction of that year.
///
/// This is the date argument of secular-variation models such as IGRF.
pub fn decimal_year(epoch: &Epoch) -> f64 {
    let (year, ..) = epoch.to_gregorian_utc();
    let start = Epoch::from_gregorian_utc_at_midnight(year, 1, 1);
    let end = Epoch::from_gregorian_utc_at_midnight(year + 1, 1, 1);
    let elapsed = (*epoch - start).to_unit(Unit::Day);
    let length = (end - start).to_unit(Unit::Day);
    year as f64 + elapsed / length
}

/// Build a UTC epoch from calendar fields.
pub fn utc_epoch(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Epoch {
    Epoch::from_gregorian(year, month, day, hour, minute, second, 0, TimeScale::UTC)
}

/// Greenwich mean sidereal time, in radians within [0, 2π).
///
/// `mjd` is a Modified Julian Date on the UT1 scale (UTC is accepted, see
/// [`mjd_utc`]). The 0h value uses the IAU 1982 polynomial in Julian centuries
/// from J2000; the time of day is then advanced at the sidereal rate.
pub fn gmst(mjd: f64) -> f64 {
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;
    const SIDEREAL_RATE: f64 = 1.00273790934;

    let day = mjd.floor();
    let centuries = (day - T2000) / 36525.0;

    // seconds of sidereal time at 0h UT1
    let at_midnight = ((C3 * centuries + C2) * centuries + C1) * centuries + C0;
    let angle = at_midnight * DPI / 86400.0 + mjd.fract() * DPI * SIDEREAL_RATE;

    angle.rem_euclid(DPI)
}
