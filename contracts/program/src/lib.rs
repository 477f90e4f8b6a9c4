//! SessionKit program entrypoint.
//!
//! Lets an authority hand out scoped, expiring session keys and lets those
//! keys act within their grant: lamport transfers from the account vault,
//! sub-delegation, custom-program gates and SPL transfers through a
//! per-mint delegate.

pub mod actions;
pub mod events;
pub mod instruction;
pub mod processor;
pub mod token;

use pinocchio_pubkey::declare_id;

declare_id!("CjYkGtwAohtY7MxShPujpbttg9HHTtetno8t6VGhCmU9");

#[cfg(not(feature = "no-entrypoint"))]
use processor::process_instruction;

#[cfg(not(feature = "no-entrypoint"))]
pinocchio::entrypoint!(process_instruction);
