use borsh::{io, BorshDeserialize, BorshSerialize};
use no_padding::NoPadding;

use crate::constants::UNLIMITED_TRANSFER_AMOUNT;

/// Capabilities granted to a session key.
///
/// `max_transfer_amount == 0` means unlimited. A key therefore cannot be
/// restricted to zero-value transfers; revoke it or clear `can_transfer`
/// instead.
///
/// Flags live in bytes so the struct can be read straight from account
/// data; any non-zero byte reads as `true`.
#[repr(C, align(8))]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, NoPadding)]
pub struct Permissions {
    pub max_transfer_amount: u64,
    /// Application-defined bits, never interpreted by the program.
    pub custom_flags: u32,
    can_transfer: u8,
    can_delegate: u8,
    can_execute_custom: u8,
    _reserved: u8,
}

impl Permissions {
    pub const LEN: usize = core::mem::size_of::<Self>();

    pub const fn new(
        can_transfer: bool,
        can_delegate: bool,
        can_execute_custom: bool,
        max_transfer_amount: u64,
        custom_flags: u32,
    ) -> Self {
        Self {
            max_transfer_amount,
            custom_flags,
            can_transfer: can_transfer as u8,
            can_delegate: can_delegate as u8,
            can_execute_custom: can_execute_custom as u8,
            _reserved: 0,
        }
    }

    #[inline]
    pub fn can_transfer(&self) -> bool {
        self.can_transfer != 0
    }

    #[inline]
    pub fn can_delegate(&self) -> bool {
        self.can_delegate != 0
    }

    #[inline]
    pub fn can_execute_custom(&self) -> bool {
        self.can_execute_custom != 0
    }

    #[inline]
    pub fn is_unlimited(&self) -> bool {
        self.max_transfer_amount == UNLIMITED_TRANSFER_AMOUNT
    }

    /// Whether a single transfer of `amount` fits these permissions.
    pub fn allows_transfer(&self, amount: u64) -> bool {
        self.can_transfer() && (self.is_unlimited() || amount <= self.max_transfer_amount)
    }

    /// True when every bit of `flags` is set in `custom_flags`.
    pub fn has_flags(&self, flags: u32) -> bool {
        self.custom_flags & flags == flags
    }

    /// Whether `self` grants nothing beyond `creator`.
    ///
    /// A boolean capability may only be kept or dropped. A limited creator
    /// can only hand out a limited ceiling no larger than its own, and
    /// `custom_flags` must be a bitwise subset.
    pub fn is_attenuation_of(&self, creator: &Permissions) -> bool {
        if self.can_transfer() && !creator.can_transfer() {
            return false;
        }
        if self.can_delegate() && !creator.can_delegate() {
            return false;
        }
        if self.can_execute_custom() && !creator.can_execute_custom() {
            return false;
        }
        if !creator.is_unlimited()
            && (self.is_unlimited() || self.max_transfer_amount > creator.max_transfer_amount)
        {
            return false;
        }
        self.custom_flags & !creator.custom_flags == 0
    }
}

// Wire order: can_transfer, can_delegate, can_execute_custom,
// max_transfer_amount, custom_flags.
impl BorshSerialize for Permissions {
    fn serialize<W: io::Write>(&self, writer: &mut W) -> io::Result<()> {
        self.can_transfer().serialize(writer)?;
        self.can_delegate().serialize(writer)?;
        self.can_execute_custom().serialize(writer)?;
        self.max_transfer_amount.serialize(writer)?;
        self.custom_flags.serialize(writer)
    }
}

impl BorshDeserialize for Permissions {
    fn deserialize_reader<R: io::Read>(reader: &mut R) -> io::Result<Self> {
        let can_transfer = bool::deserialize_reader(reader)?;
        let can_delegate = bool::deserialize_reader(reader)?;
        let can_execute_custom = bool::deserialize_reader(reader)?;
        let max_transfer_amount = u64::deserialize_reader(reader)?;
        let custom_flags = u32::deserialize_reader(reader)?;
        Ok(Self::new(
            can_transfer,
            can_delegate,
            can_execute_custom,
            max_transfer_amount,
            custom_flags,
        ))
    }
}
