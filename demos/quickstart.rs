//! Compute Fajr bands over Île-de-France on the June solstice.
//!
//! Run with `RUST_LOG=debug` to see the pipeline steps.

use std::time::Duration;

use isochron::{CalendarDate, EngineConfig, GeoBounds, IsochroneError, IsochroneRequest, IsochroneWorker};

fn main() -> Result<(), IsochroneError> {
    env_logger::init();

    let request = IsochroneRequest::new(
        "fajr",
        GeoBounds::new(1.4, 3.6, 48.1, 49.3)?,
        CalendarDate::new(2024, 6, 21)?,
    )
    .with_timezone(1.0);

    let worker = IsochroneWorker::spawn(EngineConfig::default())?;
    let bands = worker.submit(request)?.wait(Duration::from_secs(30))?;

    for band in &bands {
        println!(
            "{:>4}  {}  {:>3} pts  {}",
            band.minute,
            band.color(),
            band.polygon.len(),
            band.label.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
