//! Scripted bus for exercising chip drivers without hardware.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Read { addr: u16, len: usize },
    Write { addr: u16, data: Vec<u8> },
    Delay { ms: u32 },
}

#[derive(Debug)]
struct State {
    registers: HashMap<u16, Vec<u8>>,
    events: Vec<Event>,
    fail_write: Option<(u16, i32)>,
    fail_read: Option<(u16, i32)>,
}

/// Register file keyed by address. Reading a register never written returns zeros.
#[derive(Debug)]
pub struct MockDriver {
    state: RefCell<State>,
}

impl MockDriver {
    pub fn new() -> MockDriver {
        MockDriver {
            state: RefCell::new(State {
                registers: HashMap::new(),
                events: Vec::new(),
                fail_write: None,
                fail_read: None,
            })
        }
    }

    pub fn preload(&self, addr: u16, data: &[u8]) {
        self.state.borrow_mut().registers.insert(addr, data.to_vec());
    }

    pub fn peek(&self, addr: u16) -> Vec<u8> {
        self.state.borrow().registers.get(&addr).cloned().unwrap_or_default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear()
    }

    pub fn writes(&self) -> Vec<(u16, Vec<u8>)> {
        self.events().into_iter().filter_map(|event| match event {
            Event::Write { addr, data } => Some((addr, data)),
            _ => None,
        }).collect()
    }

    /// Fail the next write to `addr` with OS error `errno`.
    pub fn fail_next_write(&self, addr: u16, errno: i32) {
        self.state.borrow_mut().fail_write = Some((addr, errno))
    }

    /// Fail the next read from `addr` with OS error `errno`.
    pub fn fail_next_read(&self, addr: u16, errno: i32) {
        self.state.borrow_mut().fail_read = Some((addr, errno))
    }
}

impl super::Driver for MockDriver {
    fn read_register(&self, addr: u16, data: &mut [u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some((fail_addr, errno)) = state.fail_read {
            if fail_addr == addr {
                state.fail_read = None;
                return Err(io::Error::from_raw_os_error(errno).into())
            }
        }
        state.events.push(Event::Read { addr, len: data.len() });
        data.fill(0);
        if let Some(value) = state.registers.get(&addr) {
            let count = value.len().min(data.len());
            data[..count].copy_from_slice(&value[..count]);
        }
        Ok(())
    }

    fn write_register(&self, addr: u16, data: &[u8]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some((fail_addr, errno)) = state.fail_write {
            if fail_addr == addr {
                state.fail_write = None;
                return Err(io::Error::from_raw_os_error(errno).into())
            }
        }
        state.events.push(Event::Write { addr, data: data.to_vec() });
        state.registers.insert(addr, data.to_vec());
        Ok(())
    }

    fn delay_ms(&self, ms: u32) {
        self.state.borrow_mut().events.push(Event::Delay { ms })
    }
}
