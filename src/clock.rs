use chrono::{Local, NaiveDate, Utc};

/// Reloj inyectable: fecha de calendario para rachas y milisegundos para duraciones.
pub trait Clock {
    fn now_ms(&self) -> i64;
    fn today(&self) -> NaiveDate;
}

#[derive(Default, Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    // Día local del usuario, no UTC
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
