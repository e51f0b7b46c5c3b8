/*!
 * Shell Module
 * Line-oriented front end over the allocator
 */

pub mod command;
pub mod session;

pub use command::{Command, ParseError, HELP};
pub use session::{Reply, Session, ShellError};
