/*!
 * Shell Session
 * Executes commands against an owned allocator
 */

use super::command::{Command, ParseError, HELP};
use crate::memory::{BuddyAllocator, MemoryError};
use crate::monitoring::CommandSpan;
use std::fmt::Write;
use thiserror::Error;

/// Command execution errors
#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error("Failed to render snapshot: {0}")]
    Render(#[from] serde_json::Error),
}

/// Result of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Interactive session over one allocator
#[derive(Debug)]
pub struct Session {
    allocator: BuddyAllocator,
}

impl Session {
    pub fn new(allocator: BuddyAllocator) -> Self {
        Self { allocator }
    }

    pub fn allocator(&self) -> &BuddyAllocator {
        &self.allocator
    }

    /// Parse and execute one input line
    pub fn run_line(&mut self, line: &str) -> Result<Reply, ShellError> {
        let command: Command = line.parse()?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply, ShellError> {
        let span = CommandSpan::new(command.name());
        let result = {
            let _entered = span.span().enter();
            self.dispatch(command)
        };
        span.finish(result.is_ok());
        result
    }

    fn dispatch(&mut self, command: Command) -> Result<Reply, ShellError> {
        let text = match command {
            Command::Alloc { pid, size } => {
                let allocation = self.allocator.allocate(pid, size)?;
                format!(
                    "pid {pid}: {size} units placed in block {} @{}",
                    allocation.block_size, allocation.offset
                )
            }
            Command::Free { pid } => {
                let size = self.allocator.release(pid)?;
                format!("pid {pid}: released block of {size} units")
            }
            Command::FreeAll { pid } => match self.allocator.free_process_memory(pid) {
                0 => return Err(MemoryError::NotFound(pid).into()),
                freed => format!("pid {pid}: released {freed} units"),
            },
            Command::Stats => self.render_stats(),
            Command::Show => self.allocator.to_string().trim_end().to_string(),
            Command::List => self.render_list(),
            Command::Json => self.allocator.snapshot_json()?,
            Command::Reset => {
                self.allocator.reset();
                format!("pool reset to {} units", self.allocator.max_size())
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    fn render_stats(&self) -> String {
        let stats = self.allocator.stats();
        format!(
            "used {} / {} ({:.1}%), free {}\nblocks: {} allocated, {} free, {} split, depth {}\npressure: {}",
            stats.used_memory,
            stats.total_memory,
            stats.usage_percentage,
            stats.free_memory,
            stats.allocated_blocks,
            stats.free_blocks,
            stats.split_blocks,
            stats.depth,
            stats.memory_pressure()
        )
    }

    /// Allocated blocks ordered by pid, then size and offset
    fn render_list(&self) -> String {
        let mut held: Vec<_> = self
            .allocator
            .allocations()
            .filter_map(|(_, block)| block.owner().map(|pid| (pid, block.size(), block.offset())))
            .collect();
        if held.is_empty() {
            return "no allocations".to_string();
        }
        held.sort_unstable();

        let mut out = String::new();
        for (pid, size, offset) in held {
            let _ = writeln!(out, "pid {pid}: {size} units @{offset}");
        }
        out.trim_end().to_string()
    }
}
