//! Core data models for Whack-a-Mole.
//! The session is a plain value reduced by `Start`, `Tick` and `Hit` actions; yew's
//! reducer dispatch queue applies them strictly in arrival order.

use std::rc::Rc;
use yew::Reducible;

use crate::chain::Account;
use crate::error::GameError;
use crate::util::{clog, cwarn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Ended,
}

/// One spawner tick: the freshly sampled cell for the run that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEvent {
    pub run_id: u32,
    pub cell: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    GameOver { run_id: u32, score: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, stale run, or out-of-grid cell. Nothing changed.
    Ignored,
    Spawned { missed: bool },
    GameOver { score: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub score: u32,
    pub missed_count: u32,
    pub status: SessionStatus,
    /// Only `Some` while running.
    pub active_cell: Option<u8>,
    pub max_misses: u32,
    pub grid_cells: u8,
    /// Bumped on every start; ticks from older runs are discarded.
    pub run_id: u32,
    pub last_event: Option<GameEvent>,
}

impl Session {
    pub fn new(max_misses: u32, grid_cells: u8) -> Self {
        Self {
            score: 0,
            missed_count: 0,
            status: SessionStatus::Idle,
            active_cell: None,
            max_misses: max_misses.max(1),
            grid_cells: grid_cells.max(1),
            run_id: 0,
            last_event: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    /// Begin a fresh run for a connected `account`. `Ok(false)` if a run is already going;
    /// in both that case and the `NotConnected` error nothing changes.
    pub fn start(&mut self, account: &Account) -> Result<bool, GameError> {
        account.require()?;
        if self.is_running() {
            return Ok(false);
        }
        self.score = 0;
        self.missed_count = 0;
        self.active_cell = None;
        self.status = SessionStatus::Running;
        self.run_id = self.run_id.wrapping_add(1);
        self.last_event = None;
        Ok(true)
    }

    /// Miss check for the cell still up from the previous tick, then activate `tick.cell`.
    pub fn on_tick(&mut self, tick: SpawnEvent) -> TickOutcome {
        if !self.is_running() || tick.run_id != self.run_id || tick.cell >= self.grid_cells {
            return TickOutcome::Ignored;
        }
        let missed = self.active_cell.is_some();
        if missed {
            self.missed_count = self.missed_count.saturating_add(1);
        }
        if self.missed_count >= self.max_misses {
            self.status = SessionStatus::Ended;
            self.active_cell = None;
            self.last_event = Some(GameEvent::GameOver {
                run_id: self.run_id,
                score: self.score,
            });
            return TickOutcome::GameOver { score: self.score };
        }
        self.active_cell = Some(tick.cell);
        TickOutcome::Spawned { missed }
    }

    /// Whack `cell`. Only the currently active cell scores; everything else is a no-op.
    pub fn on_hit(&mut self, cell: u8) -> bool {
        if !self.is_running() || self.active_cell != Some(cell) {
            return false;
        }
        self.score = self.score.saturating_add(1);
        self.active_cell = None;
        true
    }
}

// ---------------- Reducer & Actions -----------------
#[derive(Clone, Debug)]
pub enum SessionAction {
    Start(Account),
    Tick(SpawnEvent),
    Hit { cell: u8 },
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use SessionAction::*;
        let mut new = (*self).clone();
        match action {
            Start(account) => match new.start(&account) {
                Ok(true) => clog(&format!("session start run_id={}", new.run_id)),
                Ok(false) => {
                    clog(&format!("session start ignored: run_id={} already running", new.run_id));
                    return self;
                }
                Err(e) => {
                    cwarn(&format!("session start refused: {}", e));
                    return self;
                }
            },
            Tick(tick) => match new.on_tick(tick) {
                TickOutcome::Ignored => return self,
                TickOutcome::Spawned { missed: false } => {}
                TickOutcome::Spawned { missed: true } => {
                    clog(&format!("session miss run_id={} missed={}", new.run_id, new.missed_count));
                }
                TickOutcome::GameOver { score } => {
                    clog(&format!("session game_over run_id={} score={}", new.run_id, score));
                }
            },
            Hit { cell } => {
                if !new.on_hit(cell) {
                    return self;
                }
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Address;

    fn player() -> Account {
        Account {
            address: Some(Address::from_bytes(&[0x11; 20])),
            chain_id: Some(84532),
        }
    }

    fn running() -> Session {
        let mut s = Session::new(5, 9);
        assert_eq!(s.start(&player()), Ok(true));
        s
    }

    fn tick(s: &mut Session, cell: u8) -> TickOutcome {
        let run_id = s.run_id;
        s.on_tick(SpawnEvent { run_id, cell })
    }

    #[test]
    fn first_tick_is_never_a_miss() {
        let mut s = running();
        assert_eq!(tick(&mut s, 4), TickOutcome::Spawned { missed: false });
        assert_eq!(s.active_cell, Some(4));
        assert_eq!(s.missed_count, 0);
    }

    #[test]
    fn unresolved_tick_counts_one_miss() {
        let mut s = running();
        tick(&mut s, 2);
        assert_eq!(tick(&mut s, 2), TickOutcome::Spawned { missed: true });
        assert_eq!(s.missed_count, 1);
    }

    #[test]
    fn hit_before_tick_prevents_miss() {
        let mut s = running();
        tick(&mut s, 7);
        assert!(s.on_hit(7));
        assert_eq!(s.active_cell, None);
        assert_eq!(tick(&mut s, 1), TickOutcome::Spawned { missed: false });
        assert_eq!((s.score, s.missed_count), (1, 0));
    }

    #[test]
    fn wrong_cell_or_idle_hits_are_noops() {
        let mut s = Session::new(5, 9);
        assert!(!s.on_hit(0));
        s.start(&player()).unwrap();
        assert!(!s.on_hit(0));
        tick(&mut s, 3);
        assert!(!s.on_hit(4));
        assert!(s.on_hit(3));
        assert!(!s.on_hit(3));
        assert_eq!(s.score, 1);
    }

    #[test]
    fn three_hits_then_unresolved_ticks() {
        let mut s = running();
        for cell in [0, 5, 8] {
            tick(&mut s, cell);
            assert!(s.on_hit(cell));
        }
        tick(&mut s, 1);
        tick(&mut s, 2);
        tick(&mut s, 3);
        assert!(s.is_running());
        assert_eq!((s.score, s.missed_count), (3, 2));
        tick(&mut s, 4);
        assert!(s.is_running());
        assert_eq!(s.missed_count, 3);
    }

    #[test]
    fn fifth_miss_ends_in_same_tick() {
        let mut s = running();
        tick(&mut s, 0);
        assert!(s.on_hit(0));
        tick(&mut s, 0);
        for _ in 0..4 {
            assert!(matches!(tick(&mut s, 6), TickOutcome::Spawned { missed: true }));
        }
        assert_eq!(tick(&mut s, 6), TickOutcome::GameOver { score: 1 });
        assert_eq!(s.status, SessionStatus::Ended);
        assert_eq!(s.missed_count, 5);
        assert_eq!(s.active_cell, None);
        assert_eq!(
            s.last_event,
            Some(GameEvent::GameOver {
                run_id: s.run_id,
                score: 1
            })
        );
        assert_eq!(tick(&mut s, 6), TickOutcome::Ignored);
        assert_eq!(s.missed_count, 5);
    }

    #[test]
    fn stale_ticks_are_discarded() {
        let mut s = running();
        let old_run = s.run_id;
        tick(&mut s, 0);
        for _ in 0..5 {
            tick(&mut s, 0);
        }
        assert_eq!(s.start(&player()), Ok(true));
        let stale = s.on_tick(SpawnEvent {
            run_id: old_run,
            cell: 2,
        });
        assert_eq!(stale, TickOutcome::Ignored);
        assert_eq!(s.active_cell, None);
        assert_eq!(
            s.on_tick(SpawnEvent {
                run_id: s.run_id,
                cell: 9
            }),
            TickOutcome::Ignored
        );
    }

    #[test]
    fn start_resets_counters_and_ignores_restart_while_running() {
        let mut s = running();
        tick(&mut s, 1);
        s.on_hit(1);
        tick(&mut s, 2);
        tick(&mut s, 2);
        assert_eq!(s.start(&player()), Ok(false));
        assert_eq!((s.score, s.missed_count), (1, 1));
        for _ in 0..4 {
            tick(&mut s, 2);
        }
        assert_eq!(s.status, SessionStatus::Ended);
        assert_eq!(s.start(&player()), Ok(true));
        assert_eq!((s.score, s.missed_count, s.active_cell), (0, 0, None));
        assert_eq!(s.status, SessionStatus::Running);
        assert_eq!(s.last_event, None);
    }

    #[test]
    fn reducer_applies_actions_in_order() {
        let s = Rc::new(Session::new(5, 9));
        let s = s.reduce(SessionAction::Start(player()));
        let run_id = s.run_id;
        let s = s.reduce(SessionAction::Tick(SpawnEvent { run_id, cell: 4 }));
        // hit arriving before the next tick is applied first
        let s = s.reduce(SessionAction::Hit { cell: 4 });
        let s = s.reduce(SessionAction::Tick(SpawnEvent { run_id, cell: 4 }));
        assert_eq!((s.score, s.missed_count, s.active_cell), (1, 0, Some(4)));
        let before = Rc::clone(&s);
        let s = s.reduce(SessionAction::Hit { cell: 0 });
        assert!(Rc::ptr_eq(&before, &s));
    }

    #[test]
    fn disconnected_start_is_refused_and_changes_nothing() {
        let mut s = Session::new(5, 9);
        let before = s.clone();
        assert_eq!(s.start(&Account::default()), Err(GameError::NotConnected));
        assert_eq!(s, before);

        // also after a finished run: counters and run_id stay put
        let mut s = running();
        for _ in 0..6 {
            tick(&mut s, 0);
        }
        assert_eq!(s.status, SessionStatus::Ended);
        let before = s.clone();
        assert_eq!(s.start(&Account::default()), Err(GameError::NotConnected));
        assert_eq!(s, before);

        let s = Rc::new(s);
        let after = Rc::clone(&s).reduce(SessionAction::Start(Account::default()));
        assert!(Rc::ptr_eq(&s, &after));
    }
}
