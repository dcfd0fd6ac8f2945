//! Scripted bus master for exercising the command engine without hardware.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::gateway::I2cMaster;
use crate::transaction::Message;

/// Replays a fixed script of per-transaction outcomes and records every
/// submission for later inspection.
pub struct ScriptedMaster {
    script: VecDeque<Result<Vec<u8>>>,
    submissions: Vec<Vec<Message>>,
}

impl ScriptedMaster {
    /// Master whose every transfer succeeds with zeroed read data.
    pub fn new() -> Self {
        ScriptedMaster {
            script: VecDeque::new(),
            submissions: Vec::new(),
        }
    }

    /// Master that answers successive transfers with the given read data.
    pub fn replying(replies: Vec<Vec<u8>>) -> Self {
        let mut master = ScriptedMaster::new();
        for reply in replies {
            master.push_reply(reply);
        }
        master
    }

    /// Queues a successful transfer serving `bytes` to the read message.
    pub fn push_reply(&mut self, bytes: Vec<u8>) {
        self.script.push_back(Ok(bytes));
    }

    /// Queues a failing transfer.
    pub fn push_failure(&mut self, err: Error) {
        self.script.push_back(Err(err));
    }

    /// Everything submitted so far, in order, as handed to the bus.
    pub fn submissions(&self) -> &[Vec<Message>] {
        &self.submissions
    }
}

impl I2cMaster for ScriptedMaster {
    fn transfer(&mut self, msgs: &mut [Message]) -> Result<()> {
        self.submissions.push(msgs.to_vec());
        match self.script.pop_front() {
            None => Ok(()),
            Some(Ok(bytes)) => {
                if let Some(msg) = msgs.iter_mut().rev().find(|m| m.is_read()) {
                    let n = msg.buf.len().min(bytes.len());
                    msg.buf[..n].copy_from_slice(&bytes[..n]);
                }
                Ok(())
            }
            Some(Err(err)) => Err(err),
        }
    }
}
