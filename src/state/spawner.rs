// Fixed-period mole spawner. Owns the interval; dropping or stopping it cancels the timer.
use gloo_timers::callback::Interval;
use yew::Callback;

use crate::model::SpawnEvent;

/// Map a unit sample in `[0, 1)` onto `0..cells`, uniformly.
pub fn cell_from_unit(r: f64, cells: u8) -> u8 {
    let cells = cells.max(1);
    let idx = (r.clamp(0.0, 1.0) * cells as f64).floor() as u8;
    idx.min(cells - 1)
}

pub fn random_cell(cells: u8) -> u8 {
    cell_from_unit(js_sys::Math::random(), cells)
}

#[derive(Default)]
pub struct Spawner {
    interval: Option<Interval>,
}

impl Spawner {
    /// Start emitting ticks for `run_id`. Any previous interval is cancelled first.
    pub fn start(&mut self, run_id: u32, period_ms: u32, cells: u8, emit: Callback<SpawnEvent>) {
        self.stop();
        self.interval = Some(Interval::new(period_ms, move || {
            emit.emit(SpawnEvent {
                run_id,
                cell: random_cell(cells),
            });
        }));
    }

    pub fn stop(&mut self) {
        // Interval's Drop clears the browser timer.
        self.interval.take();
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }
}
