//! Recording fake of the panel connection, only compiled for tests

extern crate std;

use std::collections::VecDeque;
use std::vec::Vec;

use crate::error::ErrorKind;
use crate::traits::{Command, PanelInterface};

/// Everything the refresh logic did to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    Command(u8),
    Data(u8),
    Reset,
    ShortReset,
    Busy,
    Delay(u32),
}

pub(crate) struct RecordingInterface {
    events: Vec<Event>,
    /// `false` entries make the matching busy wait time out, an empty schedule is always idle
    busy_schedule: VecDeque<bool>,
}

impl RecordingInterface {
    pub(crate) fn new() -> Self {
        Self::with_busy_schedule(&[])
    }

    pub(crate) fn with_busy_schedule(schedule: &[bool]) -> Self {
        RecordingInterface {
            events: Vec::new(),
            busy_schedule: schedule.iter().copied().collect(),
        }
    }

    pub(crate) fn events(&self) -> &[Event] {
        &self.events
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Command addresses in the order they were sent
    pub(crate) fn commands(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Command(address) => Some(*address),
                _ => None,
            })
            .collect()
    }

    /// Data bytes sent directly after the first `command`, up to the next command
    pub(crate) fn data_after(&self, command: u8) -> Vec<u8> {
        self.data_after_nth(command, 0)
    }

    /// Same as `data_after`, for the `nth` occurrence of `command`
    pub(crate) fn data_after_nth(&self, command: u8, nth: usize) -> Vec<u8> {
        let start = self
            .events
            .iter()
            .enumerate()
            .filter(|(_, event)| **event == Event::Command(command))
            .nth(nth)
            .map(|(index, _)| index + 1);
        let Some(start) = start else {
            return Vec::new();
        };
        self.events[start..]
            .iter()
            .take_while(|event| !matches!(event, Event::Command(_)))
            .filter_map(|event| match event {
                Event::Data(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }
}

impl PanelInterface for RecordingInterface {
    fn send_command<T: Command>(&mut self, command: T) {
        self.events.push(Event::Command(command.address()));
    }

    fn send_data(&mut self, data: u8) {
        self.events.push(Event::Data(data));
    }

    fn reset(&mut self) {
        self.events.push(Event::Reset);
    }

    fn short_reset(&mut self) {
        self.events.push(Event::ShortReset);
    }

    fn read_busy(&mut self) -> Result<(), ErrorKind> {
        if self.busy_schedule.pop_front().unwrap_or(true) {
            self.events.push(Event::Busy);
            Ok(())
        } else {
            Err(ErrorKind::PanelUnresponsive)
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        self.events.push(Event::Delay(ms));
    }
}
