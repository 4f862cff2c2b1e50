//! Test doubles: a fake sysfs tree and a scripted GPIO line.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::HardwareError;
use crate::gpio::{Direction, Line};

static NEXT: AtomicUsize = AtomicUsize::new(0);

pub(crate) struct FakeSysfs {
    root: PathBuf,
    gpio: PathBuf,
    w1: PathBuf,
}

impl FakeSysfs {
    pub(crate) fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "champlain-{name}-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::SeqCst)
        ));
        let gpio = root.join("class/gpio");
        let w1 = root.join("bus/w1/devices");
        std::fs::create_dir_all(&gpio).unwrap();
        std::fs::create_dir_all(&w1).unwrap();
        std::fs::write(gpio.join("export"), "").unwrap();
        std::fs::write(gpio.join("unexport"), "").unwrap();
        Self { root, gpio, w1 }
    }

    pub(crate) fn gpio_root(&self) -> &Path {
        &self.gpio
    }

    pub(crate) fn w1_dir(&self) -> &Path {
        &self.w1
    }

    /// Pretend the kernel already created `gpio{pin}`.
    pub(crate) fn add_pin(&self, pin: u32) {
        let dir = self.gpio.join(format!("gpio{pin}"));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("direction"), "in").unwrap();
        std::fs::write(dir.join("value"), "0").unwrap();
    }

    pub(crate) fn direction(&self, pin: u32) -> String {
        std::fs::read_to_string(self.gpio.join(format!("gpio{pin}/direction"))).unwrap()
    }

    pub(crate) fn value(&self, pin: u32) -> String {
        std::fs::read_to_string(self.gpio.join(format!("gpio{pin}/value"))).unwrap()
    }

    pub(crate) fn set_value(&self, pin: u32, value: &str) {
        std::fs::write(self.gpio.join(format!("gpio{pin}/value")), value).unwrap();
    }

    pub(crate) fn exported(&self) -> String {
        std::fs::read_to_string(self.gpio.join("export")).unwrap()
    }

    pub(crate) fn unexported(&self) -> String {
        std::fs::read_to_string(self.gpio.join("unexport")).unwrap()
    }

    /// Create a one-wire device directory holding `w1_slave`.
    pub(crate) fn add_w1_device(&self, name: &str, w1_slave: &str) {
        let dir = self.w1.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("w1_slave"), w1_slave).unwrap();
    }
}

impl Drop for FakeSysfs {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Something a [`FakeLine`] was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineEvent {
    Direction(Direction),
    Write(bool),
    Read,
}

#[derive(Debug, Default)]
struct LineState {
    events: Vec<LineEvent>,
    reads: VecDeque<bool>,
    failing: bool,
}

/// In-memory line; clones share the same log.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeLine {
    state: Arc<Mutex<LineState>>,
}

impl FakeLine {
    /// A line that returns `reads` in order, then fails.
    pub(crate) fn with_reads(reads: Vec<bool>) -> Self {
        let line = Self::default();
        line.state.lock().unwrap().reads = reads.into();
        line
    }

    pub(crate) fn events(&self) -> Vec<LineEvent> {
        self.state.lock().unwrap().events.clone()
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    fn check(state: &LineState) -> Result<(), HardwareError> {
        if state.failing {
            return Err(HardwareError::InvalidValue {
                pin: 0,
                value: "failing".to_string(),
            });
        }
        Ok(())
    }
}

impl Line for FakeLine {
    fn set_direction(&mut self, direction: Direction) -> Result<(), HardwareError> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state)?;
        state.events.push(LineEvent::Direction(direction));
        Ok(())
    }

    fn write(&mut self, high: bool) -> Result<(), HardwareError> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state)?;
        state.events.push(LineEvent::Write(high));
        Ok(())
    }

    fn read(&mut self) -> Result<bool, HardwareError> {
        let mut state = self.state.lock().unwrap();
        Self::check(&state)?;
        state.events.push(LineEvent::Read);
        state
            .reads
            .pop_front()
            .ok_or_else(|| HardwareError::InvalidValue {
                pin: 0,
                value: "exhausted".to_string(),
            })
    }
}
