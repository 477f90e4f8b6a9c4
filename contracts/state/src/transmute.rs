use pinocchio::program_error::ProgramError;

/// Marker trait for types that can be safely cast from account bytes.
///
/// Implementors must be `#[repr(C, align(8))]`, free of padding and free of
/// fields with invalid bit patterns (see `no_padding::NoPadding`).
pub trait Transmutable: Sized {
    /// The length of the type in bytes.
    const LEN: usize;

    /// Creates a reference to `Self` from a byte slice.
    ///
    /// Fails with `InvalidAccountData` when the slice is too short or not
    /// aligned for `Self`.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `bytes` contains a valid representation of
    /// the implementing type.
    #[inline(always)]
    unsafe fn load_unchecked(bytes: &[u8]) -> Result<&Self, ProgramError> {
        if bytes.len() < Self::LEN || !is_aligned::<Self>(bytes.as_ptr()) {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(&*(bytes.as_ptr() as *const Self))
    }
}

/// Marker trait for types that can be mutably cast from account bytes.
pub trait TransmutableMut: Transmutable {
    /// Creates a mutable reference to `Self` from a mutable byte slice.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `bytes` contains a valid representation of
    /// the implementing type.
    #[inline(always)]
    unsafe fn load_mut_unchecked(bytes: &mut [u8]) -> Result<&mut Self, ProgramError> {
        if bytes.len() < Self::LEN || !is_aligned::<Self>(bytes.as_ptr()) {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(&mut *(bytes.as_mut_ptr() as *mut Self))
    }
}

#[inline(always)]
fn is_aligned<T>(ptr: *const u8) -> bool {
    (ptr as usize) % core::mem::align_of::<T>() == 0
}
