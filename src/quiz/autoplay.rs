use std::time::Duration;

use crate::quiz::settings::Settings;


/// Identifies the question and arming a scheduled step belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket {
    pub index: usize,
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Cue {
    Narrate(Ticket),
    Advance(Ticket),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum TimerKind {
    BeforeNarration,
    AfterNarration,
    Fallback,
}

#[derive(Debug)]
struct Timer {
    kind: TimerKind,
    ticket: Ticket,
    time_elapsed: Duration,
    time_to_wait: Duration,
}

impl Timer {
    fn on_tick(&mut self, dt: Duration) {
        self.time_elapsed += dt;
    }

    fn is_over(&self) -> bool {
        self.time_elapsed >= self.time_to_wait
    }
}

#[derive(Debug)]
enum Step {
    Waiting(Timer),
    Narrating(Ticket),
    Idle,
}

#[derive(Debug)]
enum Phase {
    Stopped,
    Running(Step),
}

/// Single-shot timer loop behind auto-play: reveal, wait, narrate, wait,
/// advance. At most one timer is armed at a time and it is consumed when
/// it fires.
#[derive(Debug)]
pub struct Sequencer {
    narration_delay: Duration,
    completion_delay: Duration,
    fallback_duration: Duration,
    phase: Phase,
    generation: u64,
}

impl Sequencer {
    pub fn new(settings: &Settings) -> Self {
        Sequencer {
            narration_delay: settings.narration_delay,
            completion_delay: settings.completion_delay,
            fallback_duration: settings.fallback_duration,
            phase: Phase::Stopped,
            generation: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    pub fn start(&mut self, index: usize) {
        if self.is_running() {
            return;
        }
        self.arm(TimerKind::BeforeNarration, index);
    }

    pub fn stop(&mut self) {
        self.generation += 1;
        self.phase = Phase::Stopped;
    }

    /// Restarts the cycle on `index`, replacing whatever was pending.
    pub fn rearm(&mut self, index: usize) {
        if self.is_running() {
            self.arm(TimerKind::BeforeNarration, index);
        }
    }

    pub fn narration_finished(&mut self, ticket: Ticket) {
        if self.is_narrating(ticket) {
            self.arm(TimerKind::AfterNarration, ticket.index);
        } else {
            log::debug!("Ignoring completion of stale narration {:?}", ticket);
        }
    }

    /// Narration could not start or broke off. A longer timer stands in for it.
    pub fn narration_unavailable(&mut self, ticket: Ticket) {
        if self.is_narrating(ticket) {
            self.arm(TimerKind::Fallback, ticket.index);
        } else {
            log::debug!("Ignoring failure of stale narration {:?}", ticket);
        }
    }

    pub fn tick(&mut self, dt: Duration, current_index: usize) -> Option<Cue> {
        let timer = match &mut self.phase {
            Phase::Running(Step::Waiting(timer)) => timer,
            _ => return None,
        };
        timer.on_tick(dt);
        if !timer.is_over() {
            return None;
        }

        let (kind, ticket) = (timer.kind, timer.ticket);
        if ticket.generation != self.generation || ticket.index != current_index {
            log::debug!(
                "Discarding stale {:?} timer for question {} (now on {})",
                kind,
                ticket.index,
                current_index
            );
            self.arm(TimerKind::BeforeNarration, current_index);
            return None;
        }

        log::debug!("{:?} timer fired for question {}", kind, ticket.index);
        match kind {
            TimerKind::BeforeNarration => {
                self.phase = Phase::Running(Step::Narrating(ticket));
                Some(Cue::Narrate(ticket))
            }
            TimerKind::AfterNarration | TimerKind::Fallback => {
                self.phase = Phase::Running(Step::Idle);
                Some(Cue::Advance(ticket))
            }
        }
    }

    fn is_narrating(&self, ticket: Ticket) -> bool {
        match &self.phase {
            Phase::Running(Step::Narrating(current)) => *current == ticket,
            _ => false,
        }
    }

    fn arm(&mut self, kind: TimerKind, index: usize) {
        self.generation += 1;
        let time_to_wait = match kind {
            TimerKind::BeforeNarration => self.narration_delay,
            TimerKind::AfterNarration => self.completion_delay,
            TimerKind::Fallback => self.fallback_duration,
        };
        self.phase = Phase::Running(Step::Waiting(Timer {
            kind,
            ticket: Ticket {
                index,
                generation: self.generation,
            },
            time_elapsed: Duration::default(),
            time_to_wait,
        }));
    }
}
